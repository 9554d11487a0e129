pub mod catalog;
pub mod invoice;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mdsbill", about = "Lease invoice generator for managed print fleets.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a fleet export and write the monthly lease invoice.
    Invoice {
        /// Path to the input CSV (asked for interactively when omitted)
        input: Option<String>,
        /// Path for the invoice CSV (asked for interactively when omitted)
        #[arg(long)]
        output: Option<String>,
        /// Run date: YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
        /// JSON file replacing the built-in price catalog
        #[arg(long)]
        catalog: Option<String>,
        /// Continue without asking on cost-center anomalies
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show the active price catalog.
    Catalog {
        /// JSON file replacing the built-in price catalog
        #[arg(long)]
        catalog: Option<String>,
    },
}
