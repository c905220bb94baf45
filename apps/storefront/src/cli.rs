//! # Command Line Arguments
//!
//! Arguments for the `gomarket` binary, which drives the cart store from a
//! shell.
//!
//! ```text
//! gomarket [--config <path>] [--memory] <command>
//!
//!   list                                   show the cart
//!   add <id> <title> <image_url> <price>   add a product at quantity 1
//!   inc <id>                               quantity + 1
//!   dec <id>                               quantity - 1
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drive the GoMarketplace cart from the command line
#[derive(Debug, Parser)]
#[command(name = "gomarket")]
#[command(about = "gomarket - Inspect and change the GoMarketplace cart", long_about = None)]
#[command(version)]
pub struct CliArgs {
    /// Config file (defaults to cart.toml in the platform config directory)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of the SQLite file
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum CliCommand {
    /// Show the cart
    #[command(name = "list", alias = "ls")]
    List,

    /// Add a product at quantity 1
    #[command(name = "add")]
    Add {
        /// Product id
        id: String,

        /// Display title
        title: String,

        /// Product image URL
        image_url: String,

        /// Unit price
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },

    /// Raise a product's quantity by one
    #[command(name = "inc", alias = "increment")]
    Inc {
        /// Product id
        id: String,
    },

    /// Lower a product's quantity by one
    #[command(name = "dec", alias = "decrement")]
    Dec {
        /// Product id
        id: String,
    },
}
