use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use billing_core::VERSION;

/// Billing - local store, ledger and backups for a small shop
#[derive(Parser)]
#[command(name = "billing")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the key-value store file
    #[arg(short, long, global = true, env = "BILLING_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init(InitArgs),

    /// Export the store to a backup document
    Export(ExportArgs),

    /// Import a backup document into the store
    Import(ImportArgs),

    /// Manage local snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommands),

    /// Income and expense ledger
    #[command(subcommand)]
    Ledger(LedgerCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing config file
    #[arg(long)]
    pub force: bool,

    /// Snapshot database path (default: data dir)
    #[arg(long)]
    pub snapshots_path: Option<String>,

    /// Default export directory
    #[arg(long)]
    pub export_dir: Option<String>,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Directory to write the document into (default: config or cwd)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<String>,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// Backup document to import
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Replace keys that already hold a value
    #[arg(long)]
    pub overwrite: bool,

    /// Output the import report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Capture the store into a local snapshot
    Save,

    /// List local snapshots, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a local snapshot
    Delete {
        /// Snapshot ID
        #[arg(value_name = "ID")]
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Restore a local snapshot into the store
    Restore {
        /// Snapshot ID
        #[arg(value_name = "ID")]
        id: String,

        /// Replace keys that already hold a value
        #[arg(long)]
        overwrite: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,

        /// Output the import report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Shared filter arguments for ledger views
#[derive(Args)]
pub struct LedgerFilterArgs {
    /// Period: all, day, month, year
    #[arg(long, default_value = "all")]
    pub period: String,

    /// Only bill income whose vehicle number contains this text
    #[arg(long)]
    pub vehicle: Option<String>,
}

#[derive(Subcommand)]
pub enum LedgerCommands {
    /// List normalized ledger entries
    List {
        #[command(flatten)]
        filter: LedgerFilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show income, expense and balance totals
    Summary {
        #[command(flatten)]
        filter: LedgerFilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a manual income or expense entry
    Add {
        /// Entry kind: income or expense
        #[arg(long)]
        kind: String,

        /// Amount, greater than zero
        #[arg(long)]
        amount: f64,

        /// Optional note (default: "Manual income" or "Manual expense")
        #[arg(long)]
        note: Option<String>,
    },

    /// Record income from a bill
    AddIncome {
        /// Bill number
        #[arg(long, value_name = "NO")]
        bill: String,

        /// Amount received
        #[arg(long)]
        amount: f64,

        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },

    /// Record a manual expense
    AddExpense {
        /// Amount spent
        #[arg(long)]
        amount: f64,

        /// Expense category (e.g. fuel, rent)
        #[arg(long)]
        category: Option<String>,

        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },
}
