//! Configuration management for ferthe.
//!
//! Runtime configuration comes from environment variables; directory
//! defaults follow the XDG Base Directory Specification.

mod env;
mod settings;

pub use env::{Environment, FertheConfig, Secret, StoreType};
pub use settings::Paths;
