//! htmltrace core - Shared configuration, constants, and error handling

pub mod config;
pub mod constants;
pub mod error;

pub use config::*;
pub use constants::*;
pub use error::{Error, Result};
