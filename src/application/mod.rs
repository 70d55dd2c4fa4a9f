//! Application services: key resolution and the errors surfaced to callers.

pub mod error;
pub mod repos;
pub mod resolver;
