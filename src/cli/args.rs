use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Manage a UPI payment session: receive-accounts, bill items, QR codes
#[derive(Parser, Debug)]
#[command(name = "upi-session")]
#[command(about = "Build UPI payment requests and track simulated settlements", long_about = None)]
pub struct CliArgs {
    /// Directory of the local ledger database
    #[arg(
        long = "store",
        value_name = "PATH",
        default_value = "ledger-db",
        help = "Path to the ledger database directory"
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage receive-accounts (UPI handles)
    #[command(subcommand)]
    Account(AccountCommand),

    /// Manage bill items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Print the payment URI and write the QR code image
    Show(ShowArgs),

    /// Initiate a payment and wait for simulated settlement
    Pay(PayArgs),

    /// List transactions, most recent first
    History,
}

/// Receive-account operations
#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Add a receive-account
    Add {
        /// Provider-qualified handle, e.g. merchant@okbank
        handle: String,
        /// Display name shown to payers
        name: String,
        /// Make this the default receive-account
        #[arg(long = "default")]
        make_default: bool,
    },

    /// Remove a receive-account by id
    Remove { id: u64 },

    /// Make an account the default by id
    SetDefault { id: u64 },

    /// List all receive-accounts
    List,
}

/// Bill item operations
#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add a bill item
    Add {
        /// Item name
        name: String,
        /// Price per unit
        price: Decimal,
        /// Number of units
        #[arg(long = "qty", default_value_t = 1)]
        quantity: u32,
    },

    /// Edit a bill item (only the given fields change)
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long = "qty")]
        quantity: Option<u32>,
    },

    /// Remove a bill item by id
    Remove { id: u64 },

    /// List all bill items with the session total
    List,
}

/// Arguments for `show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Where to write the QR code PNG
    #[arg(long = "out", value_name = "FILE", default_value = "payment-qr.png")]
    pub out: PathBuf,

    /// Minimum image width in pixels
    #[arg(long, default_value_t = 512)]
    pub width: u32,

    /// Override amount for this request (falls back to the session total)
    #[arg(long)]
    pub amount: Option<String>,

    /// Also print the embeddable HTML snippet
    #[arg(long)]
    pub snippet: bool,
}

/// Arguments for `pay`
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Override amount for this payment (falls back to the session total)
    #[arg(long)]
    pub amount: Option<String>,
}
