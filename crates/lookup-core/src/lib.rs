//! Core domain types and traits for the lookup services.
//!
//! This crate contains:
//! - Identifier validation
//! - Deadlines and derived sub-budgets
//! - The pipeline error taxonomy
//! - Resolver / fetch / sink capability traits for the weather and quote lookups

pub mod deadline;
pub mod error;
pub mod identifier;
pub mod quote;
pub mod weather;

pub use deadline::Deadline;
pub use error::{ClientError, ClientResult, DeadlineError, PipelineError, QuoteError, SinkError};
pub use identifier::Identifier;
