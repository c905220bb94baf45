//! # GoMarketplace Storefront Library
//!
//! The cart state behind the GoMarketplace storefront, plus the entry point
//! the `gomarket` binary uses to drive it.
//!
//! ## Module Organization
//! ```text
//! gomarket_storefront_lib/
//! ├── lib.rs          ◄─── You are here (logging, wiring, run)
//! ├── cli.rs          ◄─── gomarket binary arguments
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore: in-memory cart, commit + resync
//! │   ├── provider.rs ◄─── CartProvider / CartHandle scope
//! │   └── config.rs   ◄─── CartConfig (TOML + env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── cart.rs     ◄─── get_cart, add_to_cart, increment, decrement
//! └── error.rs        ◄─── CartError and the ApiError commands return
//! ```
//!
//! ## Embedding
//! ```rust,ignore
//! let db = Database::new(DbConfig::new(config.database_path_or_default()?)).await?;
//! let mut provider = CartProvider::mount(Arc::new(db.kv()), &config);
//!
//! let response = commands::increment(&provider, "p-1".into()).await?;
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use gomarket_db::{Database, DbConfig, DurableKv, MemoryKv};

use cli::{CliArgs, CliCommand};
use commands::CartResponse;
use error::{ApiError, CartError};
use state::{CartConfig, CartProvider};

/// Runs one cart command end to end.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load CartConfig ──── --config, cart.toml, GOMARKET_* env           │
/// │                                                                         │
/// │  2. Open storage ─────── --memory ? MemoryKv : SQLite (WAL, migrated)  │
/// │                                                                         │
/// │  3. Mount provider ───── background load, then ready().await           │
/// │                                                                         │
/// │  4. Dispatch ─────────── list | add | inc | dec                        │
/// │                                                                         │
/// │  5. Unmount, close the pool                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(args: CliArgs) -> Result<CartResponse, ApiError> {
    let config = CartConfig::load(args.config.clone())?;
    execute(config, args.memory, args.command).await
}

async fn execute(
    config: CartConfig,
    memory: bool,
    command: CliCommand,
) -> Result<CartResponse, ApiError> {
    let (kv, db): (Arc<dyn DurableKv>, Option<Database>) = if memory {
        info!("Using in-memory cart storage");
        let kv: Arc<dyn DurableKv> = Arc::new(MemoryKv::new());
        (kv, None)
    } else {
        let db_path = config.database_path_or_default()?;
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path))
            .await
            .map_err(CartError::from)?;
        let kv: Arc<dyn DurableKv> = Arc::new(db.kv());
        (kv, Some(db))
    };

    let mut provider = CartProvider::mount(kv, &config);
    let result = dispatch(&mut provider, command).await;

    provider.unmount();
    if let Some(db) = db {
        db.close().await;
    }

    result
}

async fn dispatch(
    provider: &mut CartProvider,
    command: CliCommand,
) -> Result<CartResponse, ApiError> {
    provider.ready().await?;

    match command {
        CliCommand::List => commands::get_cart(provider),
        CliCommand::Add {
            id,
            title,
            image_url,
            price,
        } => {
            let item = gomarket_core::NewCartItem::new(id, title, image_url, price);
            commands::add_to_cart(provider, item).await
        }
        CliCommand::Inc { id } => commands::increment(provider, id).await,
        CliCommand::Dec { id } => commands::decrement(provider, id).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only the JSON response.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gomarket=trace` - Show trace for gomarket crates only
/// - Default: INFO, with debug for gomarket crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gomarket=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}
