pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod server;

pub use db::Database;
