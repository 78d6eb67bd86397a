//! # Error Types
//!
//! Rule violations reported by the survey contract validator.

use crate::RecordKind;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which side of a transaction a record sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Input,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => f.write_str("input"),
            Side::Output => f.write_str("output"),
        }
    }
}

/// Broad classification of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Wrong command count, cardinality or record composition.
    Structural,
    /// A business rule failed numerically or relationally.
    Invariant,
    /// A required signer is missing.
    Authorization,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Structural => f.write_str("structural"),
            ViolationKind::Invariant => f.write_str("invariant"),
            ViolationKind::Authorization => f.write_str("authorization"),
        }
    }
}

/// The first rule a proposal broke.
///
/// None of these are transient: the proposal has to be rebuilt by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ContractViolation {
    /// Zero or several commands were attached.
    #[error("Required a single command, found {found}.")]
    CommandCount { found: usize },

    #[error("Only one output state should be created, found {found}.")]
    IssueOutputCount { found: usize },

    #[error("The issued output must be a survey, found {found}.")]
    IssueOutputNotSurvey { found: RecordKind },

    #[error("No inputs should be consumed when issuing a survey, found {found}.")]
    IssueConsumesInputs { found: usize },

    #[error("The issuer and the owner must be the same entity.")]
    IssuerNotOwner,

    #[error("Issuer must be the signer.")]
    IssuerNotSigner { issuer: Address },

    #[error("The survey's initial price must be positive, got {price}.")]
    NonPositiveInitialPrice { price: i64 },

    #[error("Initial price equal to resale price ({price}).")]
    InitialPriceEqualsResalePrice { price: i64 },

    #[error("There should be two input states, found {found}.")]
    TradeInputCount { found: usize },

    #[error("There should be two output states, found {found}.")]
    TradeOutputCount { found: usize },

    #[error("Expected exactly one {kind} {side} record, found none.")]
    MissingRecord { side: Side, kind: RecordKind },

    #[error("Expected exactly one {kind} {side} record, found {found}.")]
    DuplicateRecord {
        side: Side,
        kind: RecordKind,
        found: usize,
    },

    #[error("Resale price should be positive, got {price}.")]
    NonPositiveResalePrice { price: i64 },

    #[error("Resale price should be more than initial price ({resale} <= {initial}).")]
    ResaleNotAboveInitial { initial: i64, resale: i64 },

    #[error("Input cash should be more than purchasing price ({tendered} <= {price}).")]
    InsufficientInputCash { tendered: i64, price: i64 },

    #[error("Output cash should be equal to resale price (expected {expected}, got {found}).")]
    OutputCashMismatch { expected: i64, found: i64 },

    #[error("The party who owns the cash initially must now own the survey.")]
    BuyerNotNewOwner,

    #[error("The party who owns the survey initially must now own the cash.")]
    SellerNotPaid,

    #[error("Cannot sell survey to yourself.")]
    SelfTrade,

    #[error("All of the survey participants must be signers, missing {missing:?}.")]
    MissingSurveySigners { missing: Vec<Address> },

    #[error("The cash owner must be signer, missing {missing:?}.")]
    MissingCashSigners { missing: Vec<Address> },
}

impl ContractViolation {
    pub fn kind(&self) -> ViolationKind {
        use ContractViolation::*;

        match self {
            CommandCount { .. }
            | IssueOutputCount { .. }
            | IssueOutputNotSurvey { .. }
            | IssueConsumesInputs { .. }
            | TradeInputCount { .. }
            | TradeOutputCount { .. }
            | MissingRecord { .. }
            | DuplicateRecord { .. } => ViolationKind::Structural,

            IssuerNotSigner { .. } | MissingSurveySigners { .. } | MissingCashSigners { .. } => {
                ViolationKind::Authorization
            }

            IssuerNotOwner
            | NonPositiveInitialPrice { .. }
            | InitialPriceEqualsResalePrice { .. }
            | NonPositiveResalePrice { .. }
            | ResaleNotAboveInitial { .. }
            | InsufficientInputCash { .. }
            | OutputCashMismatch { .. }
            | BuyerNotNewOwner
            | SellerNotPaid
            | SelfTrade => ViolationKind::Invariant,
        }
    }
}

/// Caller-side checks run before a proposal is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecheckError {
    #[error("Survey price cannot be less then zero.")]
    NegativeRequestPrice { price: i64 },

    #[error("Price cannot be less then zero.")]
    NegativeIssuePrice { price: i64 },
}
