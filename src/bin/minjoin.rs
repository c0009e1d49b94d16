//! Match marketplace listings to catalog products.
//!
//! Reads two line-delimited JSON files (products = base corpus, listings =
//! query corpus), runs the MinHash/LSH join, and writes one JSON object per
//! product with the listings assigned to it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

use minjoin::corpus::{self, read_listings, read_products};
use minjoin::{JoinConfig, SimilarityJoin};

#[derive(Parser)]
#[command(name = "minjoin")]
#[command(about = "Approximate record linkage via MinHash and banded LSH")]
struct Cli {
    /// Products file, one JSON object per line (base corpus).
    products: PathBuf,

    /// Listings file, one JSON object per line (query corpus).
    listings: PathBuf,

    /// Output file, one JSON object per product.
    #[arg(short, long, default_value = "results.txt")]
    output: PathBuf,

    /// Desired Jaccard similarity at the S-curve threshold.
    #[arg(long, default_value_t = 0.975)]
    similarity_threshold: f64,

    /// Desired probability of detecting a pair at the threshold.
    #[arg(long, default_value_t = 0.99)]
    detection_probability: f64,

    /// Rows per band.
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Omit products with no matched listings from the output.
    #[arg(long)]
    skip_unmatched: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> minjoin::Result<()> {
    let config = JoinConfig {
        similarity_threshold: cli.similarity_threshold,
        detection_probability: cli.detection_probability,
        rows: cli.rows,
        rng_seed: cli.seed,
    };

    let products = read_products(&cli.products)?;
    let listings = read_listings(&cli.listings)?;
    if products.is_empty() {
        warn!("product file {} has no records", cli.products.display());
    }
    info!(
        "loaded {} products and {} listings",
        products.len(),
        listings.len()
    );

    let base_tokens: Vec<Vec<String>> = products.iter().map(|p| p.tokens()).collect();
    let mut join = SimilarityJoin::build(&config, &base_tokens)?;
    let plan = join.plan();
    info!(
        "minhash parameters: {} hash functions ({} bands x {} rows), \
         similarity threshold {:.2}%, detection probability {:.2}%",
        plan.num_hashes(),
        plan.bands,
        plan.rows,
        100.0 * cli.similarity_threshold,
        100.0 * cli.detection_probability,
    );

    let query_tokens: Vec<Vec<String>> = listings.iter().map(|l| l.tokens()).collect();
    let report = join.match_all(&query_tokens);

    corpus::write_results(&cli.output, &products, &listings, &report, cli.skip_unmatched)?;
    info!(
        "matched {}/{} listings ({:.2}%), results written to {}",
        report.matched,
        report.total,
        100.0 * report.match_rate(),
        cli.output.display()
    );
    Ok(())
}
