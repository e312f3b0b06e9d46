//! UPI Session Engine CLI
//!
//! Command-line interface for building UPI payment requests and tracking
//! their simulated settlement.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- account add merchant@okbank "Chai Stall" --default
//! cargo run -- item add Chai 10.50 --qty 2
//! cargo run -- show --out qr.png --snippet
//! cargo run -- pay --amount 50
//! cargo run -- history
//! ```
//!
//! State lives in a local sled database (`--store`, default `ledger-db`).
//! Logging is controlled through `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (validation failure, storage failure, render failure, etc.)

use std::fs;
use std::process;

use tracing_subscriber::EnvFilter;
use upi_session_engine::cli::{self, AccountCommand, CliArgs, Command, ItemCommand};
use upi_session_engine::core::{LedgerStore, LogSink, PaymentSession, RenderOptions};
use upi_session_engine::types::{ItemUpdate, SessionError};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::parse_args();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), SessionError> {
    let ledger = LedgerStore::open(&args.store)?;
    let mut session = PaymentSession::new(ledger).with_events(LogSink);

    match args.command {
        Command::Account(cmd) => run_account(&mut session, cmd),
        Command::Item(cmd) => run_item(&mut session, cmd),
        Command::Show(show) => {
            if let Some(raw) = &show.amount {
                session.set_amount(raw);
            }

            let uri = session.payment_uri()?;
            println!("{}", uri);

            let options = RenderOptions {
                width: show.width,
                ..RenderOptions::default()
            };
            let png = session.qr_png(&options)?;
            fs::write(&show.out, png)?;
            println!("QR code written to {}", show.out.display());

            if show.snippet {
                println!("{}", session.embed_snippet()?);
            }
            Ok(())
        }
        Command::Pay(pay) => {
            if let Some(raw) = &pay.amount {
                session.set_amount(raw);
            }

            let pending = session.initiate()?;
            println!(
                "Payment of {} initiated, reference {}",
                session.resolved_amount(),
                pending.reference
            );

            let status = session.settle(pending).await?;
            println!("Settled: {:?}", status);
            Ok(())
        }
        Command::History => {
            for tx in session.ledger().transactions() {
                println!(
                    "{}  {}  {:>10}  {:?}  {}",
                    tx.reference,
                    tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    tx.amount,
                    tx.status,
                    tx.handle,
                );
            }
            Ok(())
        }
    }
}

fn run_account(session: &mut PaymentSession, cmd: AccountCommand) -> Result<(), SessionError> {
    match cmd {
        AccountCommand::Add {
            handle,
            name,
            make_default,
        } => {
            let account = session.add_account(&handle, &name, make_default)?;
            println!("Added account {} ({})", account.handle, account.id);
        }
        AccountCommand::Remove { id } => {
            if session.remove_account(id)? {
                println!("Removed account {}", id);
            } else {
                println!("No account with id {}", id);
            }
        }
        AccountCommand::SetDefault { id } => {
            if session.set_default_account(id)? {
                println!("Account {} is now the default", id);
            } else {
                println!("No account with id {}", id);
            }
        }
        AccountCommand::List => {
            for account in session.ledger().accounts() {
                let marker = if account.is_default { "*" } else { " " };
                println!("{} {}  {}  {}", marker, account.id, account.handle, account.name);
            }
        }
    }
    Ok(())
}

fn run_item(session: &mut PaymentSession, cmd: ItemCommand) -> Result<(), SessionError> {
    match cmd {
        ItemCommand::Add {
            name,
            price,
            quantity,
        } => {
            let item = session.add_item(&name, price, quantity)?;
            println!("Added item {} ({})", item.name, item.id);
        }
        ItemCommand::Edit {
            id,
            name,
            price,
            quantity,
        } => {
            let update = ItemUpdate {
                name,
                unit_price: price,
                quantity,
            };
            if session.update_item(id, &update)? {
                println!("Updated item {}", id);
            } else {
                println!("No item with id {}", id);
            }
        }
        ItemCommand::Remove { id } => {
            if session.remove_item(id)? {
                println!("Removed item {}", id);
            } else {
                println!("No item with id {}", id);
            }
        }
        ItemCommand::List => {
            for item in session.ledger().items() {
                println!(
                    "{}  {}  {} x {} = {}",
                    item.id,
                    item.name,
                    item.quantity,
                    item.unit_price,
                    item.line_total(),
                );
            }
            println!("Total: {}", session.ledger().session_total());
        }
    }
    Ok(())
}
