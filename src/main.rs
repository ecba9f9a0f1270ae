//! # Contact Book CLI (`contacts`)
//!
//! Manages the contact book file directly or serves it over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! contacts --config ./config/contacts.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `contacts init` | Create an empty contact book file if none exists |
//! | `contacts serve` | Start the HTTP server |
//! | `contacts find [filters]` | Print matching contacts as JSON |
//! | `contacts add [fields]` | Add a contact and print it |
//! | `contacts update <id> [fields]` | Update a contact and print it |
//! | `contacts remove [filters]` | Remove matching contacts and print them |
//! | `contacts generate <name> <count>` | Print a random sample book as XML |
//!
//! Log verbosity follows `RUST_LOG` (default `info` for `serve`, `warn`
//! otherwise). Logs go to stderr; command output goes to stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use contact_book::book::{ContactBook, Persistence};
use contact_book::codec;
use contact_book::config::{self, Config};
use contact_book::generate::{check_count, sample_collection};
use contact_book::server;
use contact_book::storage::XmlFileStore;
use contact_book::store::Store;
use contact_book::{ContactCollection, ContactDraft, ContactFilter};

/// Contact Book CLI: a local-first personal contact book.
///
/// All commands except `generate` read a TOML configuration file given by
/// `--config`.
#[derive(Parser)]
#[command(
    name = "contacts",
    about = "Contact Book — a local-first personal contact book with an HTTP API",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/contacts.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty contact book at `[storage].path`.
    ///
    /// Does nothing if the file already exists.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Print contacts matching every given filter. No filters prints all.
    Find {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Add a contact. Invalid email or phone values are dropped.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Overwrite the given fields of an existing contact.
    Update {
        /// Contact id.
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Remove every contact matching all given filters.
    Remove {
        #[command(flatten)]
        filter: FilterArgs,

        /// Required to remove everything when no filter is given.
        #[arg(long)]
        all: bool,
    },

    /// Print a random sample contact book as XML. Storage is not touched.
    Generate {
        /// Name of the generated book.
        name: String,

        /// Number of contacts to generate.
        count: usize,
    },
}

/// Exact-match filters. Omitted filters match anything.
#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl From<FilterArgs> for ContactFilter {
    fn from(args: FilterArgs) -> Self {
        ContactFilter {
            id: args.id,
            name: args.name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            phone: args.phone,
        }
    }
}

/// Contact fields to set.
#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl From<FieldArgs> for ContactDraft {
    fn from(args: FieldArgs) -> Self {
        ContactDraft {
            name: args.name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            phone: args.phone,
        }
    }
}

fn init_logging(default_level: &str) {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Opens the configured book, failing if an existing file cannot be read.
///
/// The server tolerates an unreadable file and starts empty; the CLI refuses
/// so that a one-off command never replaces it.
async fn open_book(cfg: &Config) -> Result<ContactBook> {
    let store = Arc::new(XmlFileStore::from_config(cfg));
    let collection = store
        .load(&cfg.book.name)
        .await
        .with_context(|| format!("Failed to open contact book {}", store.path().display()))?;
    Ok(ContactBook::with_collection(store, collection))
}

fn ensure_persisted(persistence: &Persistence) -> Result<()> {
    if let Persistence::Failed(e) = persistence {
        bail!("change was not saved: {}", e);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve => "info",
        _ => "warn",
    };
    init_logging(default_level);

    // Commands that don't require config
    if let Commands::Generate { name, count } = &cli.command {
        if let Err(e) = check_count(*count) {
            bail!(e);
        }
        let mut rng = rand::thread_rng();
        let collection = sample_collection(name, *count, &mut rng);
        print!("{}", codec::encode(&collection)?);
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let store = XmlFileStore::from_config(&cfg);
            if store.exists().await {
                println!(
                    "contact book already exists at {}",
                    store.path().display()
                );
            } else {
                store.save(&ContactCollection::new(&cfg.book.name)).await?;
                println!("contact book initialized at {}", store.path().display());
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Find { filter } => {
            let filter: ContactFilter = filter.into();
            let book = open_book(&cfg).await?;
            print_json(&book.find(&filter).await)?;
        }
        Commands::Add { fields } => {
            let book = open_book(&cfg).await?;
            let saved = book.create(fields.into()).await;
            ensure_persisted(&saved.persistence)?;
            for field in &saved.rejected {
                eprintln!("warning: ignored invalid {}", field);
            }
            print_json(&saved.value)?;
        }
        Commands::Update { id, fields } => {
            let draft: ContactDraft = fields.into();
            if draft == ContactDraft::default() {
                bail!("nothing to update: give at least one field");
            }
            let book = open_book(&cfg).await?;
            let saved = book.update(&id, draft).await;
            ensure_persisted(&saved.persistence)?;
            for field in &saved.rejected {
                eprintln!("warning: ignored invalid {}", field);
            }
            match saved.value {
                Some(record) => print_json(&record)?,
                None => println!("contact not found: {}", id),
            }
        }
        Commands::Remove { filter, all } => {
            let filter: ContactFilter = filter.into();
            if filter.is_empty() && !all {
                bail!("no filter given: pass --all to remove every contact");
            }
            let book = open_book(&cfg).await?;
            let saved = book.remove(&filter).await;
            ensure_persisted(&saved.persistence)?;
            print_json(&saved.value)?;
        }
        Commands::Generate { .. } => unreachable!(),
    }

    Ok(())
}
