//! Compute co-terming costs for one agreement
//!
//! Line items come from a JSON agreement file or from a stored customer;
//! timing flags override the values in the file.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use coterm_calculator::agreement::{AgreementFile, AgreementParams, CustomerStore, DEFAULT_STORE_DIR};
use coterm_calculator::report::{render_text, write_csv, ReportHeader};
use coterm_calculator::{calculate, AgreementContext, BillingModel, LineItem};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "coterm", about = "Co-terming cost calculator", version)]
#[command(group(ArgGroup::new("source").required(true).args(["agreement", "customer"])))]
struct Cli {
    /// JSON agreement file with timing parameters and line items
    #[arg(long)]
    agreement: Option<PathBuf>,

    /// Stored customer whose line items should be costed
    #[arg(long)]
    customer: Option<String>,

    /// Directory of stored customer agreements
    #[arg(long, default_value = DEFAULT_STORE_DIR)]
    store: PathBuf,

    /// Agreement term in months
    #[arg(long)]
    term: Option<f64>,

    /// Months remaining before renewal
    #[arg(long)]
    remaining: Option<f64>,

    /// Extension months added to the remaining term
    #[arg(long)]
    extension: Option<f64>,

    /// Billing model: Monthly, Annual or Prepaid
    #[arg(long)]
    billing: Option<BillingModel>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Store the line items under this customer name after computing
    #[arg(long)]
    save_as: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, params: &mut AgreementParams) {
        if let Some(term) = self.term {
            params.agreement_term_months = term;
        }
        if let Some(remaining) = self.remaining {
            params.months_remaining = remaining;
        }
        if let Some(extension) = self.extension {
            params.extension_months = extension;
        }
        if let Some(billing) = self.billing {
            params.billing_model = billing.to_string();
        }
    }
}

fn load_inputs(cli: &Cli, store: &CustomerStore) -> Result<(String, AgreementParams, Vec<LineItem>)> {
    if let Some(path) = &cli.agreement {
        let file = AgreementFile::from_path(path)
            .with_context(|| format!("Failed to read agreement file {}", path.display()))?;
        let items = file.line_items()?;
        return Ok((file.customer_name, file.agreement, items));
    }

    let customer = cli.customer.clone().unwrap_or_default();
    let items = store
        .load(&customer)
        .with_context(|| format!("Failed to load stored agreement for {}", customer))?;
    Ok((customer, AgreementParams::default(), items))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let store = CustomerStore::new(&cli.store);

    let (customer_name, mut params, items) = load_inputs(&cli, &store)?;
    cli.apply_overrides(&mut params);
    let ctx = AgreementContext::try_from(params).context("Invalid agreement parameters")?;

    let result = calculate(&items, &ctx).context("Invalid line items")?;

    match cli.format {
        OutputFormat::Text => {
            let header = ReportHeader::new(customer_name, &ctx, &result);
            print!("{}", render_text(&header, &result));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Csv => {
            write_csv(&result, io::stdout().lock())?;
        }
    }

    if let Some(name) = &cli.save_as {
        let path = store.save(name, &result.line_items())?;
        eprintln!("Saved {} line items to {}", result.rows().len(), path.display());
    }

    Ok(())
}
