//! Cost every stored customer agreement under one set of timing parameters
//!
//! Outputs one summary row per customer plus grand totals

use anyhow::{Context, Result};
use clap::Parser;
use coterm_calculator::agreement::{CustomerStore, DEFAULT_STORE_DIR};
use coterm_calculator::proration::Aggregates;
use coterm_calculator::report::format_money;
use coterm_calculator::{calculate, AgreementContext, BillingModel, ResultSet};
use log::warn;
use rayon::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Cost all stored customer agreements")]
struct Args {
    /// Directory of stored customer agreements
    #[arg(long, default_value = DEFAULT_STORE_DIR)]
    store: PathBuf,

    #[arg(long, default_value_t = 36.0)]
    term: f64,

    #[arg(long, default_value_t = 30.0)]
    remaining: f64,

    #[arg(long, default_value_t = 0.0)]
    extension: f64,

    #[arg(long, default_value = "Annual")]
    billing: BillingModel,

    /// Write the per-customer summary to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Summary of one customer's result
#[derive(Debug, Clone, serde::Serialize)]
struct CustomerSummary {
    customer: String,
    line_items: usize,
    current_cost: f64,
    first_year_cost: f64,
    prepaid_cost: f64,
    updated_annual_cost: f64,
    subscription_term_fee: f64,
}

impl CustomerSummary {
    fn new(customer: &str, result: &ResultSet) -> Self {
        let agg = result.aggregates();
        Self {
            customer: customer.to_string(),
            line_items: result.rows().len(),
            current_cost: agg.current_cost,
            first_year_cost: agg.first_year_cost,
            prepaid_cost: agg.prepaid_cost,
            updated_annual_cost: agg.updated_annual_cost,
            subscription_term_fee: agg.subscription_term_fee,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let ctx = AgreementContext::new(args.term, args.remaining, args.extension, args.billing)
        .context("Invalid agreement parameters")?;
    let store = CustomerStore::new(&args.store);
    let customers = store
        .list_customers()
        .with_context(|| format!("Failed to list customers in {}", args.store.display()))?;
    println!("Found {} stored agreements in {}", customers.len(), args.store.display());

    // Each agreement is independent, so cost them in parallel
    let outcomes: Vec<(String, coterm_calculator::Result<ResultSet>)> = customers
        .par_iter()
        .map(|customer| {
            let result = store.load(customer).and_then(|items| calculate(&items, &ctx));
            (customer.clone(), result)
        })
        .collect();

    let mut summaries = Vec::with_capacity(outcomes.len());
    let mut grand = Aggregates::default();
    for (customer, outcome) in &outcomes {
        match outcome {
            Ok(result) => {
                let agg = result.aggregates();
                grand.current_cost += agg.current_cost;
                grand.first_year_cost += agg.first_year_cost;
                grand.prepaid_cost += agg.prepaid_cost;
                grand.updated_annual_cost += agg.updated_annual_cost;
                grand.subscription_term_fee += agg.subscription_term_fee;
                summaries.push(CustomerSummary::new(customer, result));
            }
            Err(e) => warn!("Skipping {}: {}", customer, e),
        }
    }

    println!("\n{} billing, {:.2} of {:.0} months remaining, {:.0} extension months",
             ctx.billing_model(), ctx.months_remaining(), ctx.agreement_term_months(), ctx.extension_months());
    println!("{:<30} {:>6} {:>16} {:>16} {:>18}", "Customer", "Items", "Current", "Updated Annual", "Term Fee");
    for s in &summaries {
        println!("{:<30} {:>6} {:>16} {:>16} {:>18}",
                 s.customer,
                 s.line_items,
                 format_money(s.current_cost),
                 format_money(s.updated_annual_cost),
                 format_money(s.subscription_term_fee));
    }
    println!("{:<30} {:>6} {:>16} {:>16} {:>18}",
             "Total",
             summaries.iter().map(|s| s.line_items).sum::<usize>(),
             format_money(grand.current_cost),
             format_money(grand.updated_annual_cost),
             format_money(grand.subscription_term_fee));

    if let Some(path) = &args.output {
        let mut wtr = csv::Writer::from_writer(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        );
        for s in &summaries {
            wtr.serialize(s)?;
        }
        wtr.flush()?;
        println!("\nSummary written to {}", path.display());
    }

    let failed = outcomes.len() - summaries.len();
    if failed > 0 {
        println!("{} agreements skipped (see log)", failed);
    }
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
