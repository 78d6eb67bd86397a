//! This crate defines the contract rules for a ledger that issues and trades survey records
//! against cash. It includes modules for record types, the transaction validator,
//! caller-side prechecks, error types and configuration.

pub mod types; // Defines records, commands and transaction proposals.
pub mod errors; // Rule violation and precheck error types.
pub mod validation; // Decides whether a proposed transaction is admissible.
pub mod precheck; // Checks callers run before assembling a proposal.
pub mod config; // Defines and loads validator configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use errors::{ContractViolation, ViolationKind};
pub use validation::Validator;
