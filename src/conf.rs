//! Settings module.
//!
//! Layered configuration: defaults, a TOML file and `TRELLIS_*` variables.

pub use trellis_conf::*;
