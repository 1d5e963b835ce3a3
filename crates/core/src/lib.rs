//! Shared domain logic for the batchgen binaries.
//!
//! Registry read/write contract, raw output flattening, and path
//! derivation. This crate only touches the local filesystem; all
//! network access lives in `batchgen-openai`.

pub mod error;
pub mod flatten;
pub mod paths;
pub mod registry;

pub use error::CoreError;
