//! Domain layer types and invariants.

pub mod classification;
pub mod entities;
pub mod error;
pub mod key;
