//! # Trellis Core
//!
//! Types shared by every Trellis crate. At the moment this is the framework
//! error type used by handlers, the router and the application facade.

pub mod exception;

pub use exception::{Error, Result};
