mod catalog;
mod cli;
mod cost;
mod error;
mod fmt;
mod importer;
mod models;
mod pipeline;
mod prompt;
mod report;
mod schema;

use clap::Parser;

use cli::{Cli, Commands};
use error::BillingError;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Invoice { input, output, as_of, catalog, yes } => cli::invoice::run(
            input.as_deref(),
            output.as_deref(),
            as_of.as_deref(),
            catalog.as_deref(),
            yes,
        ),
        Commands::Catalog { catalog } => cli::catalog::run(catalog.as_deref()),
    };

    if let Err(e) = result {
        match e {
            // Operator-initiated stops: no invoice written, clean exit.
            BillingError::NoInputSelected
            | BillingError::NoOutputSelected
            | BillingError::Aborted => println!("{e}."),
            _ => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
