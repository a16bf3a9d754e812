pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod migration;
pub mod planner;
pub mod runner;
pub mod seed;

pub use error::{Error, ErrorKind, Result};
