//! Plain-text and CSV rendering

use super::{visible_columns, Column};
use crate::agreement::{AgreementContext, BillingModel};
use crate::error::Result;
use crate::proration::{Aggregates, CostedRow, ResultSet};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::io::Write;

/// Summary block printed above the line item table
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub date: NaiveDate,
    pub customer_name: String,
    pub billing_model: BillingModel,
    pub months_remaining: f64,
    pub aggregates: Aggregates,
}

impl ReportHeader {
    /// Header dated today
    pub fn new(customer_name: impl Into<String>, ctx: &AgreementContext, result: &ResultSet) -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
            customer_name: customer_name.into(),
            billing_model: result.billing_model(),
            months_remaining: ctx.months_remaining(),
            aggregates: *result.aggregates(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Label/value pairs of the summary, only those meaningful for the model
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        let agg = &self.aggregates;
        let mut lines = vec![
            ("Date", self.date.format("%Y-%m-%d").to_string()),
            ("Customer Name", self.customer_name.clone()),
            ("Billing Term", self.billing_model.to_string()),
            (
                "Subscription Term Remaining Months",
                format!("{:.2}", self.months_remaining),
            ),
        ];

        match self.billing_model {
            BillingModel::Monthly => {
                lines.push(("Current Monthly Cost", format_money(agg.current_cost)));
            }
            BillingModel::Annual => {
                lines.push(("Current Annual Cost", format_money(agg.current_cost)));
                lines.push(("First Year Co-Termed Cost", format_money(agg.first_year_cost)));
            }
            BillingModel::Prepaid => {
                lines.push(("Current Prepaid Cost", format_money(agg.current_cost)));
                lines.push(("Total Pre-Paid Co-Termed Cost", format_money(agg.prepaid_cost)));
            }
        }
        lines.push(("Updated Annual Cost", format_money(agg.updated_annual_cost)));
        lines.push((
            "Subscription Term Total Service Fee",
            format_money(agg.subscription_term_fee),
        ));
        lines
    }
}

/// Format a dollar amount as `$1,234.56`
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn display_cell(column: Column, row: &CostedRow) -> String {
    match column {
        Column::Description => row.description().to_string(),
        _ => match column.amount(row) {
            Some(v) if column.is_money() => format_money(v),
            Some(v) => format!("{}", v),
            None => String::new(),
        },
    }
}

fn csv_cell(column: Column, row: &CostedRow) -> String {
    match column {
        Column::Description => row.description().to_string(),
        _ => match column.amount(row) {
            Some(v) if column.is_money() => format!("{:.2}", v),
            Some(v) => format!("{}", v),
            None => String::new(),
        },
    }
}

/// Render the summary and the line item table as aligned plain text
pub fn render_text(header: &ReportHeader, result: &ResultSet) -> String {
    let columns = visible_columns(result.billing_model());
    let mut out = String::new();

    let _ = writeln!(out, "Co-Terming Cost Report");
    let _ = writeln!(out);
    let label_width = header.summary_lines().iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (label, value) in header.summary_lines() {
        let _ = writeln!(out, "{:<width$}  {}", format!("{}:", label), value, width = label_width + 1);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Detailed Line Items");

    let cells: Vec<Vec<String>> = result
        .table()
        .map(|row| columns.iter().map(|&c| display_cell(c, row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].len())
                .chain(std::iter::once(c.header().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{:<w$}", c.header(), w = w))
        .collect();
    let _ = writeln!(out, "{}", header_line.join(" | ").trim_end());

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(columns.iter().zip(&widths))
            .map(|(cell, (c, &w))| {
                if c.is_money() || *c == Column::UnitQuantity || *c == Column::AdditionalLicenses {
                    format!("{:>w$}", cell, w = w)
                } else {
                    format!("{:<w$}", cell, w = w)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }

    out
}

/// Write the visible columns of the table (totals row last) as CSV
pub fn write_csv<W: Write>(result: &ResultSet, writer: W) -> Result<()> {
    let columns = visible_columns(result.billing_model());
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(columns.iter().map(|c| c.header()))?;
    for row in result.table() {
        wtr.write_record(columns.iter().map(|&c| csv_cell(c, row)))?;
    }
    wtr.flush()?;
    Ok(())
}
