//! # DueBill CLI
//!
//! Local bill tracker with multi-channel reminders.
//!
//! Usage:
//!   duebill init                               # Create the database
//!   duebill add-bill -n Rent -r Landlord -d 5 -a 1200.00
//!   duebill list-bills                         # Show everything
//!   duebill config-set-notify-target discord://id/token
//!   duebill notify --lookahead-days 3          # Check due bills, send reminders
//!
//! There is no scheduler inside duebill; run `notify` from cron to get
//! periodic reminders, e.g. every morning at 8am:
//!   0 8 * * * duebill notify --lookahead-days 3

mod csv_io;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use duebill_core::types::{BillDraft, BillPatch};
use duebill_store::BillStore;

#[derive(Parser)]
#[command(
    name = "duebill",
    version,
    about = "🧾 DueBill — never miss a bill again",
    long_about = "Local bill tracker with multi-channel reminders.\nBills recur monthly on a due day; `notify` checks what is due soon."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Add a new bill
    AddBill {
        /// Bill name
        #[arg(short, long)]
        name: String,

        /// Payee
        #[arg(short, long)]
        recipient: String,

        /// Due day of month (1-31)
        #[arg(short, long)]
        due_day: u8,

        /// Amount
        #[arg(short, long)]
        amount: Decimal,
    },

    /// Remove a bill by ID
    RemoveBill {
        /// Bill ID to remove
        bill_id: i64,
    },

    /// List all bills in a table
    ListBills,

    /// Mark a bill as paid by ID
    MarkPaid {
        /// Bill ID to mark as paid
        bill_id: i64,
    },

    /// Mark a bill as unpaid by ID
    MarkUnpaid {
        /// Bill ID to mark as unpaid
        bill_id: i64,
    },

    /// Edit a bill by ID; only the given fields change
    EditBill {
        /// Bill ID to edit
        bill_id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New recipient
        #[arg(long)]
        recipient: Option<String>,

        /// New due day (1-31)
        #[arg(long)]
        due_day: Option<u8>,

        /// New amount
        #[arg(long)]
        amount: Option<Decimal>,

        /// Paid status (true/false)
        #[arg(long)]
        paid: Option<bool>,
    },

    /// Mark ALL bills as paid
    MarkAllPaid,

    /// Mark ALL bills as unpaid
    MarkAllUnpaid,

    /// Remove all bills from the database
    RemoveAllBills,

    /// Import bills from a CSV file
    ImportCsv {
        /// Path to a CSV file with bills
        path: PathBuf,

        /// Delete all existing bills before import
        #[arg(long)]
        overwrite: bool,
    },

    /// Export all bills to a CSV file
    ExportCsv {
        /// Path to write the CSV file to
        path: PathBuf,
    },

    /// Add a notification target URL (run again to add more)
    ConfigSetNotifyTarget {
        /// Channel descriptor, e.g. discord://id/token
        url: String,
    },

    /// Show configured notification targets
    ConfigShow,

    /// Check for unpaid bills due soon and send reminders
    Notify {
        /// How many days ahead to check for due bills
        #[arg(short = 'l', long, default_value_t = 1, allow_negative_numbers = true)]
        lookahead_days: i64,
    },

    /// Print the version
    Version,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open_store() -> duebill_core::Result<BillStore> {
    BillStore::open(&duebill_core::config::db_path())
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. Migration noise from the store only shows up
    // under --verbose.
    let filter = if cli.verbose {
        "duebill=debug,duebill_core=debug,duebill_store=debug,duebill_channels=debug,duebill_notify=debug"
    } else {
        "duebill=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => {
            let path = duebill_core::config::db_path();
            BillStore::open(&path)?;
            println!("Initialized database at {}", path.display());
        }

        Commands::AddBill {
            name,
            recipient,
            due_day,
            amount,
        } => {
            let store = open_store()?;
            let bill = store.create(&BillDraft::new(name, recipient, due_day, amount))?;
            println!(
                "Added bill: {} for {} (due day {}, amount ${:.2})",
                bill.name, bill.recipient, bill.due_day, bill.amount
            );
        }

        Commands::RemoveBill { bill_id } => {
            let store = open_store()?;
            store.delete(bill_id)?;
            println!("Removed bill with ID {bill_id}.");
        }

        Commands::ListBills => {
            let store = open_store()?;
            let bills = store.list()?;
            println!("Today's date: {}\n", chrono::Local::now().date_naive());
            render::print_bills_table(&bills);
        }

        Commands::MarkPaid { bill_id } => {
            let store = open_store()?;
            store.set_paid(bill_id, true)?;
            println!("Marked bill ID {bill_id} as paid.");
        }

        Commands::MarkUnpaid { bill_id } => {
            let store = open_store()?;
            store.set_paid(bill_id, false)?;
            println!("Marked bill ID {bill_id} as unpaid.");
        }

        Commands::EditBill {
            bill_id,
            name,
            recipient,
            due_day,
            amount,
            paid,
        } => {
            let patch = BillPatch {
                name,
                recipient,
                due_day,
                amount,
                paid,
            };
            if patch.is_empty() {
                println!("No fields updated.");
            } else {
                let store = open_store()?;
                store.update(bill_id, &patch)?;
                println!("Updated bill ID {bill_id}.");
            }
        }

        Commands::MarkAllPaid => {
            let store = open_store()?;
            let updated = store.set_all_paid(true)?;
            println!("Marked {updated} bill(s) as paid.");
        }

        Commands::MarkAllUnpaid => {
            let store = open_store()?;
            let updated = store.set_all_paid(false)?;
            println!("Marked {updated} bill(s) as unpaid.");
        }

        Commands::RemoveAllBills => {
            let store = open_store()?;
            let deleted = store.delete_all()?;
            println!("Removed {deleted} bill(s) from the database.");
        }

        Commands::ImportCsv { path, overwrite } => {
            let store = open_store()?;
            let summary = csv_io::import_bills(&store, &path, overwrite)?;
            if let Some(deleted) = summary.deleted {
                println!("Deleted {deleted} existing bill(s) before import.");
            }
            println!(
                "Imported {} bill(s). Skipped {} row(s).",
                summary.added, summary.skipped
            );
        }

        Commands::ExportCsv { path } => {
            let store = open_store()?;
            let count = csv_io::export_bills(&store, &path)?;
            println!("Exported {count} bill(s) to {}.", path.display());
        }

        Commands::ConfigSetNotifyTarget { url } => {
            let store = open_store()?;
            store.add_notify_target(&url)?;
            println!("Added notification target: {url}");
        }

        Commands::ConfigShow => {
            let store = open_store()?;
            let targets = store.list_notify_targets()?;
            if targets.is_empty() {
                println!("No notification targets set.");
            } else {
                for target in targets {
                    println!("{target}");
                }
            }
        }

        Commands::Notify { lookahead_days } => {
            let store = open_store()?;
            let today = chrono::Local::now().date_naive();
            let bills = store.list()?;
            let due = duebill_notify::due_soon(&bills, today.day() as u8, lookahead_days);
            if due.is_empty() {
                println!("No bills due soon!");
                return Ok(());
            }

            println!("Bills due soon:");
            render::print_bills_table(&due);

            let mut descriptors = store.list_notify_targets()?;
            descriptors.extend(duebill_core::config::env_descriptors());
            let resolution = duebill_channels::resolve_all(&descriptors);
            for (descriptor, reason) in &resolution.skipped {
                println!("Skipping notify target {descriptor}: {reason}");
            }
            if resolution.channels.is_empty() {
                // Nothing configured: listing the due bills was the job.
                return Ok(());
            }

            let note = duebill_notify::render_digest(&due);
            let report = duebill_notify::dispatch(&note, &resolution.channels).await;
            // Delivery is best-effort; a failed send never fails the command.
            if report.sent() {
                println!(
                    "✅ Notification sent ({}/{} channel(s) succeeded).",
                    report.successes(),
                    report.outcomes.len()
                );
            } else {
                println!(
                    "⚠️ Notification failed on all {} channel(s).",
                    report.outcomes.len()
                );
            }
        }

        Commands::Version => {
            println!("duebill {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
