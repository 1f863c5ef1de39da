//! Runtime configuration.
//!
//! Values come from command-line flags, falling back to environment
//! variables and then to built-in defaults.

use anyhow::Result;
use std::path::PathBuf;

use crate::db::Database;

pub const ENV_DB: &str = "CONTACTBOOK_DB";
pub const ENV_ADDR: &str = "CONTACTBOOK_ADDR";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: String,
}

impl Config {
    /// Fill in defaults for anything not given explicitly.
    pub fn resolve(db_path: Option<PathBuf>, addr: Option<String>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => Database::default_path()?,
        };
        Ok(Self {
            db_path,
            addr: addr.unwrap_or_else(|| DEFAULT_ADDR.to_string()),
        })
    }
}
