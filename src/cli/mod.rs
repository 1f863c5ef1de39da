use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ENV_ADDR, ENV_DB};

pub mod list;
pub mod seed;

pub use list::run_list;
pub use seed::run_seed;

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(about = "Contacts address book served over HTTP")]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = ENV_DB)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    Serve(ServeArgs),
    /// Insert the sample contacts
    Seed(SeedArgs),
    /// Print stored contacts, optionally filtered by a search query
    List(ListArgs),
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(long, env = ENV_ADDR)]
    pub addr: Option<String>,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Insert the samples even if the book already has contacts
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Search query (name, phone, or any address part)
    pub query: Option<String>,
}
