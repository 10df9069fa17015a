//! RFMScope: Supplier RFM analysis CLI over purchase-order CSV data
//!
//! This is the main entrypoint that orchestrates data loading, validation,
//! supplier selection, and reporting.

use anyhow::Result;
use clap::Parser;
use rfmscope::{data, report, Args, Session, ALL_SUPPLIERS};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        println!("RFMScope - Supplier RFM Analysis");
        println!("================================\n");
    }

    let start_time = Instant::now();
    let as_of = args.as_of_date()?;
    let mut session = Session::new(as_of);

    // Load and validate the dataset
    if args.verbose {
        println!("Loading purchase orders from: {}", args.input);
    }
    let token = session.begin_load();
    session.finish_load(token, data::load_raw_records_from_path(&args.input));

    if session.records().is_empty() {
        anyhow::bail!("No valid purchase orders found in {}", args.input);
    }
    println!("✓ Data loaded: {} valid purchase orders", session.records().len());
    if args.verbose {
        println!("  As-of date: {as_of}");
        println!("  Loading time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    match args.supplier.as_deref() {
        Some(name) if name != ALL_SUPPLIERS => run_supplier_analysis(&mut session, name, &args)?,
        _ => run_overview(&session, &args),
    }

    if args.verbose {
        println!("\nTotal processing time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Compute and print the RFM summary for one supplier
fn run_supplier_analysis(session: &mut Session, name: &str, args: &Args) -> Result<()> {
    session.select_supplier(name);

    match session.summary() {
        Some(summary) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                println!();
                print!("{}", report::render_summary(name, summary));
            }
        }
        None => println!("No orders found for supplier \"{name}\""),
    }

    Ok(())
}

/// Print the supplier list and a preview of the validated rows
fn run_overview(session: &Session, args: &Args) {
    let suppliers = session.suppliers();
    println!("\n=== Suppliers ({} distinct) ===", suppliers.len() - 1);
    for name in suppliers.iter().skip(1) {
        println!("  {name}");
    }

    println!("\n=== Data Preview ===");
    print!("{}", report::render_table(session.rows(), args.limit));
    println!("\nPass --supplier <name> to compute that supplier's RFM summary");
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rfmscope=debug" } else { "rfmscope=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
