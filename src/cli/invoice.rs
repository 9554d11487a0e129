use std::path::Path;

use chrono::{Local, NaiveDate};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::catalog::PriceCatalog;
use crate::cost;
use crate::error::{BillingError, Result};
use crate::fmt::money;
use crate::importer;
use crate::pipeline;
use crate::prompt::{AssumeYes, ConsolePrompter, Prompter};
use crate::report;

pub fn run(
    input: Option<&str>,
    output: Option<&str>,
    as_of: Option<&str>,
    catalog_path: Option<&str>,
    yes: bool,
) -> Result<()> {
    let prompter: Box<dyn Prompter> = if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ConsolePrompter)
    };

    let catalog = match catalog_path {
        Some(path) => PriceCatalog::from_json_file(Path::new(path))?,
        None => PriceCatalog::default(),
    };

    let run_date = match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| BillingError::InvalidRunDate(s.to_string()))?,
        None => Local::now().date_naive(),
    };

    let input = match input {
        Some(path) => path.to_string(),
        None => prompter.choose_input_file()?,
    };
    let output = match output {
        Some(path) => path.to_string(),
        None => prompter.choose_output_file()?,
    };

    let rows = importer::read_rows(Path::new(&input))?;
    println!("{} rows read from {input}", rows.len());

    let (mut accepted, rejected) = pipeline::partition(rows, &catalog);
    for item in &rejected {
        println!(
            "{}",
            format!("MDS {} failed validation: {}", item.equipment_number(), item.failure)
                .yellow()
        );
    }

    if !rejected.is_empty() {
        let outcome = pipeline::repair(&rejected, &catalog);
        for dropped in &outcome.dropped {
            eprintln!(
                "MDS {} could not be repaired: {}",
                dropped.equipment_number(),
                dropped.failure
            );
        }
        println!("{}", format!("Corrected {} machines!", outcome.corrected).green());
        accepted.extend(outcome.promoted);
    }

    let costed = cost::compute(accepted, &catalog, run_date, prompter.as_ref())?;
    let written = report::write_invoice(Path::new(&output), &costed)?;

    for equipment_number in &written.expired {
        println!("MDS {equipment_number}'s lease has ended.");
    }
    println!("{} rows invoiced to {output}", written.rows_written);

    print_totals(&costed.totals);
    println!("{}", "Finished!".green());
    Ok(())
}

fn print_totals(totals: &crate::models::RunTotals) {
    let machines = totals.total_cost_of_machines;
    let monthly = totals.total_monthly_payment;

    let mut table = Table::new();
    table.set_header(vec!["", "Machines", "Monthly"]);
    table.add_row(vec![
        Cell::new("Subtotal"),
        Cell::new(money(machines)),
        Cell::new(money(monthly)),
    ]);
    table.add_row(vec![
        Cell::new("Tax (8.25%)"),
        Cell::new(money(cost::tax_amount(machines))),
        Cell::new(money(cost::tax_amount(monthly))),
    ]);
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(money(cost::total_with_tax(machines))),
        Cell::new(money(cost::total_with_tax(monthly))),
    ]);
    println!("{table}");
}
