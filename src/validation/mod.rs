//! Transaction Validation Module
//!
//! This module decides whether a proposed survey transaction is admissible.
//! Checks the single-command rule, then the Issue or Trade rule set for the
//! declared command. Rules run in a fixed order and the first failure is reported.

mod validator;


pub use validator::{Validator, require_single_command};
