//! Value types shared across the client.
//!
//! - [`environment`] - `Environment`, `Host` and `Scheme`

pub mod environment;

pub use environment::*;
