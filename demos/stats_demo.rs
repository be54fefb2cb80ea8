use clap::Parser;
use clap::ValueEnum;
use probe_hash::ChainedTable;
use probe_hash::DoubleHashTable;
use probe_hash::LinearProbeTable;
use probe_hash::QuadraticProbeTable;
use probe_hash::Table;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    Linear,
    Quadratic,
    Double,
    Chained,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1000)]
    capacity: usize,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Linear)]
    strategy: Strategy,

    /// Percentage of the inserted values removed again before refilling.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 50)]
    remove_percent: u64,
}

fn churn(table: &mut dyn Table<u64>, remove_percent: u64) -> (usize, usize) {
    let num_values = table.capacity() as u64 + table.capacity() as u64 / 10;

    let mut first_pass_failures = 0;
    for value in 0..num_values {
        if table.try_insert(value).is_err() {
            first_pass_failures += 1;
        }
    }

    println!(
        "Inserted {} of {} values into {} slots",
        table.len(),
        num_values,
        table.capacity()
    );

    for value in (0..num_values).filter(|v| v % 100 < remove_percent) {
        table.remove(&value);
    }
    println!("After removals: {} values", table.len());

    let mut refill_failures = 0;
    for value in num_values..num_values * 2 {
        if table.try_insert(value).is_err() {
            refill_failures += 1;
        }
    }

    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    (first_pass_failures, refill_failures)
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating {:?} table with requested capacity: {}",
        args.strategy, args.capacity
    );

    let (first, refill) = match args.strategy {
        Strategy::Linear => {
            let mut table: LinearProbeTable<u64> = LinearProbeTable::new(args.capacity);
            let failures = churn(&mut table, args.remove_percent);
            table.print_probe_histogram();
            table.debug_stats().print();
            failures
        }
        Strategy::Quadratic => {
            let mut table: QuadraticProbeTable<u64> = QuadraticProbeTable::new(args.capacity);
            let failures = churn(&mut table, args.remove_percent);
            table.print_probe_histogram();
            table.debug_stats().print();
            failures
        }
        Strategy::Double => {
            let mut table: DoubleHashTable<u64> = DoubleHashTable::new(args.capacity);
            println!(
                "Allocated {} slots, step modulus {}",
                table.capacity(),
                table.step_modulus()
            );
            let failures = churn(&mut table, args.remove_percent);
            table.print_probe_histogram();
            table.debug_stats().print();
            failures
        }
        Strategy::Chained => {
            let mut table: ChainedTable<u64> = ChainedTable::new(args.capacity);
            let failures = churn(&mut table, args.remove_percent);
            table.print_chain_histogram();
            table.debug_stats().print();
            failures
        }
    };

    println!("Dropped inserts: {} on first fill, {} on refill", first, refill);
}
