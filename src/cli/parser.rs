use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for billsync
/// CLI application to sync tracked time into a billable ledger and invoice it
#[derive(Parser)]
#[command(
    name = "billsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sync time entries into a billable-hours ledger and generate invoices",
    long_about = None
)]
pub struct Cli {
    /// Override audit database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the workbook directory holding the ledger and settings sheets
    #[arg(global = true, long = "workbook")]
    pub workbook: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration, audit database and workbook
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Sync time entries from the tracking API into the ledger
    Sync {
        #[arg(
            long = "full",
            help = "Fetch every time entry under the company projects instead of the incremental window"
        )]
        full: bool,

        #[arg(long = "dry-run", help = "Show the merge plan without saving it")]
        dry_run: bool,
    },

    /// Generate an invoice for every unbilled ledger row
    Invoice {
        #[arg(long = "dry-run", help = "Show the invoice draft without writing anything")]
        dry_run: bool,
    },

    /// List ledger rows
    List {
        #[arg(long = "unbilled", help = "Show only rows eligible for the next invoice")]
        unbilled: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Export the ledger
    Export {
        #[arg(long, value_enum, default_value = "xlsx")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,

        #[arg(long = "unbilled", help = "Export only rows eligible for the next invoice")]
        unbilled: bool,
    },
}
