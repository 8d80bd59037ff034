use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::catalog::is_catalog_item;
use data_loader::{CustomerId, DataIndex, ITEM_CATALOG};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use server::RecommendationEngine;
use similarity::{ItemCandidate, RecommendationRequest};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// Wholesale Recs - item recommendations from purchase-history similarity
#[derive(Parser)]
#[command(name = "wholesale-recs")]
#[command(about = "Wholesale item recommendations from customer similarity", long_about = None)]
struct Cli {
    /// Directory holding the wholesale CSV files
    #[arg(short, long, env = "WHOLESALE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get item recommendations for a customer
    Recommend {
        /// Customer ID to get recommendations for
        #[arg(long)]
        customer_id: CustomerId,

        /// Neighborhood size and number of items to return
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
        top_n: u32,

        /// Only recommend items stocked at least this much on some transaction
        #[arg(long, default_value = "0")]
        min_inventory: f64,

        /// Show the neighborhood score of each item
        #[arg(long)]
        explain: bool,
    },

    /// Show a customer's profile, purchases and closest neighbors
    Customer {
        /// Customer ID to display
        #[arg(long)]
        customer_id: CustomerId,
    },

    /// List the customers most similar to a customer
    Similar {
        /// Customer ID to compare against
        #[arg(long)]
        customer_id: CustomerId,

        /// Number of neighbors to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Rewrite a transactions CSV, giving every row a random catalog item name
    AssignItems {
        /// Transactions CSV to read
        #[arg(long)]
        input: PathBuf,

        /// Where to write the rewritten CSV
        #[arg(long)]
        output: PathBuf,

        /// Seed for a reproducible assignment
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dataset preparation works on raw files; it must not require a valid dataset
    if let Commands::AssignItems { input, output, seed } = &cli.command {
        return handle_assign_items(input, output, *seed);
    }

    let engine = load_engine(&cli.data_dir)?;

    match cli.command {
        Commands::Recommend {
            customer_id,
            top_n,
            min_inventory,
            explain,
        } => handle_recommend(&engine, customer_id, top_n as usize, min_inventory, explain)?,
        Commands::Customer { customer_id } => handle_customer(&engine, customer_id)?,
        Commands::Similar { customer_id, limit } => handle_similar(&engine, customer_id, limit)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
        Commands::AssignItems { .. } => unreachable!("handled before loading the dataset"),
    }

    Ok(())
}

/// Load the dataset and build the similarity index
fn load_engine(data_dir: &Path) -> Result<RecommendationEngine> {
    println!("Loading wholesale dataset from {}...", data_dir.display());
    let start = Instant::now();
    let data_index =
        DataIndex::load_from_files(data_dir).context("Failed to load wholesale dataset")?;
    let (companies, customers, transactions) = data_index.counts();
    info!(companies, customers, transactions, "Loaded wholesale dataset");
    let engine = RecommendationEngine::build(Arc::new(data_index));
    println!(
        "{} Built similarity index for {} customers in {:?}",
        "✓".green(),
        engine.similarity().len(),
        start.elapsed()
    );
    Ok(engine)
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    customer_id: CustomerId,
    top_n: usize,
    min_inventory: f64,
    explain: bool,
) -> Result<()> {
    let request = RecommendationRequest::new(customer_id)
        .with_top_n(top_n)
        .with_min_inventory(min_inventory);
    let recommendations = engine.recommend_scored(&request)?;
    info!(
        customer_id,
        top_n,
        min_inventory,
        returned = recommendations.len(),
        "Generated recommendations"
    );

    print_recommendations(engine.data_index(), customer_id, &recommendations, explain);
    Ok(())
}

/// Handle the 'customer' command
fn handle_customer(engine: &RecommendationEngine, customer_id: CustomerId) -> Result<()> {
    let index = engine.data_index();
    let customer = index
        .get_customer(customer_id)
        .ok_or_else(|| anyhow!("Customer {} not found", customer_id))?;

    println!("{}", format!("Customer ID: {}", customer_id).bold().blue());
    println!("{}Name: {}", "• ".green(), customer.name);
    println!("{}Location: {}", "• ".green(), customer.location);
    println!("{}Business type: {}", "• ".green(), customer.business_type);
    if let Some(limit) = customer.credit_limit {
        println!("{}Credit limit: {:.2}", "• ".green(), limit);
    }

    let transactions = index.get_customer_transactions(customer_id);
    let spent: f64 = transactions.iter().map(|t| t.total_amount).sum();
    println!("{}Transactions: {}", "• ".cyan(), transactions.len());
    println!("{}Total spent: {:.2}", "• ".cyan(), spent);

    let matrix = engine.item_matrix();
    let Some(row) = matrix.row(customer_id) else {
        println!("No purchases recorded.");
        return Ok(());
    };

    let mut purchases: Vec<(&String, f64)> = matrix
        .items()
        .iter()
        .zip(row.iter().copied())
        .filter(|(_, quantity)| *quantity > 0.0)
        .collect();
    purchases.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    println!("Purchased items:");
    for (item, quantity) in purchases {
        println!("  - {} (quantity: {})", item, quantity);
    }

    println!("Closest customers:");
    for (neighbor, score) in engine.neighbors(customer_id, 3)? {
        println!("  - Customer {} (similarity: {:.3})", neighbor, score);
    }
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(engine: &RecommendationEngine, customer_id: CustomerId, limit: usize) -> Result<()> {
    let neighbors = engine.neighbors(customer_id, limit)?;

    println!(
        "{}",
        format!("Customers most similar to {}:", customer_id).bold().blue()
    );
    for (rank, (neighbor, score)) in neighbors.iter().enumerate() {
        let name = engine
            .data_index()
            .get_customer(*neighbor)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        println!(
            "{}. Customer {} ({}) - Similarity: {:.3}",
            (rank + 1).to_string().green(),
            neighbor,
            name,
            score
        );
    }
    Ok(())
}

/// Handle the 'assign-items' command
fn handle_assign_items(input: &Path, output: &Path, seed: Option<u64>) -> Result<()> {
    let reader =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let writer =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let summary = assign_items(reader, writer, &mut rng)?;
    info!(
        rows = summary.rows,
        replaced_unknown = summary.replaced_unknown,
        ?seed,
        "Assigned catalog items"
    );

    println!(
        "{} Assigned catalog items to {} transactions ({} previous names were outside the catalog) -> {}",
        "✓".green(),
        summary.rows,
        summary.replaced_unknown,
        output.display()
    );
    Ok(())
}

/// Outcome of an item assignment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AssignSummary {
    rows: usize,
    /// Rows whose previous `item_name` was not a catalog name
    replaced_unknown: usize,
}

/// Copy a transactions CSV, giving every row a random catalog item name
///
/// The `item_name` column is replaced in place, or appended when the header
/// has none. Every other column is copied unchanged.
fn assign_items<R: Read, W: Write>(
    input: R,
    output: W,
    rng: &mut impl Rng,
) -> Result<AssignSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut headers = reader.headers()?.clone();
    let item_col = match headers.iter().position(|h| h == "item_name") {
        Some(col) => col,
        None => {
            headers.push_field("item_name");
            headers.len() - 1
        }
    };

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(&headers)?;

    let mut summary = AssignSummary {
        rows: 0,
        replaced_unknown: 0,
    };
    for result in reader.records() {
        let record = result?;
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        let item = ITEM_CATALOG[..]
            .choose(&mut *rng)
            .ok_or_else(|| anyhow!("Item catalog is empty"))?;

        if item_col < fields.len() {
            if !is_catalog_item(&fields[item_col]) {
                summary.replaced_unknown += 1;
            }
            fields[item_col] = item.to_string();
        } else {
            fields.resize(item_col, String::new());
            fields.push(item.to_string());
        }

        writer.write_record(&fields)?;
        summary.rows += 1;
    }
    writer.flush()?;

    Ok(summary)
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: RecommendationEngine,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("requests must be at least 1");
    }

    // Random customers that exist in the index
    let customer_ids: Vec<CustomerId> = {
        let known = engine.similarity().customers();
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| known.choose(&mut rng).copied())
            .collect::<Option<_>>()
            .ok_or_else(|| anyhow!("Dataset has no purchasing customers"))?
    };

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_start = Instant::now();
    let mut handles = vec![];
    for customer_id in customer_ids {
        let permit = semaphore.clone().acquire_owned().await?;
        let engine = engine.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            engine.recommend(customer_id, 5, 0.0)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = wall_start.elapsed();
    info!(requests, concurrent, ?wall_time, "Benchmark finished");

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("Benchmark results:");
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(
    index: &DataIndex,
    customer_id: CustomerId,
    recommendations: &[ItemCandidate],
    explain: bool,
) {
    println!(
        "{}",
        format!("Recommendations for customer {}:", customer_id).bold().blue()
    );
    if recommendations.is_empty() {
        println!("No items meet the inventory threshold.");
        return;
    }
    for (rank, item) in recommendations.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), item.item_name);
        if explain {
            println!(
                "   Mean neighborhood quantity: {:.2}, bought by {} neighbor(s)",
                item.score, item.purchasing_neighbors
            );
            if let Some(stats) = index.get_item_stats(&item.item_name) {
                println!(
                    "   Dataset-wide: {} transaction(s), {:.0} units, max inventory {:.2}",
                    stats.transaction_count, stats.total_quantity, stats.max_inventory_value
                );
            }
        }
    }
}
