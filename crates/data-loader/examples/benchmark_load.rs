use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data");

    println!("Loading wholesale dataset...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_files(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (companies, customers, transactions) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Companies: {}", companies);
    println!("Customers: {}", customers);
    println!("Transactions: {}", transactions);
    println!("Distinct items: {}", index.item_names().count());
    println!("\nPerformance: {:.0} transactions/second",
             transactions as f64 / elapsed.as_secs_f64());
}
