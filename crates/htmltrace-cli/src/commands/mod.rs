//! Command implementations

pub mod demo;
pub mod message;
pub mod sentinel;
pub mod status;
