use crate::errors::{ContractViolation, Side};
use crate::{CashRecord, Command, Party, Record, RecordKind, SurveyRecord, TransactionProposal};
use ethers::types::Address;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Survey contract validator
///
/// Holds no state: every call sees only the proposal it is given, so the
/// same proposal always yields the same verdict and the validator can be
/// shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a transaction proposal
    /// Returns Ok(()) if admissible, Err(ContractViolation) with the first broken rule otherwise
    pub fn validate(&self, proposal: &TransactionProposal) -> Result<(), ContractViolation> {
        let command = require_single_command(&proposal.commands)?;
        self.verify(command, &proposal.inputs, &proposal.outputs, &proposal.signers)
    }

    /// Apply the rule set of `command` to already-resolved records and signers
    pub fn verify(
        &self,
        command: &Command,
        inputs: &[Record],
        outputs: &[Record],
        signers: &BTreeSet<Address>,
    ) -> Result<(), ContractViolation> {
        debug!(
            "Verifying {} with {} inputs, {} outputs, {} signers",
            command,
            inputs.len(),
            outputs.len(),
            signers.len()
        );

        let result = match command {
            // Request creation carries no on-ledger invariant; price is checked by the caller.
            Command::IssueRequest => Ok(()),
            Command::Issue => self.verify_issue(inputs, outputs, signers),
            Command::Trade => self.verify_trade(inputs, outputs, signers),
            Command::OracleCommand { .. } => Ok(()),
        };

        match &result {
            Ok(()) => debug!("{} verification successful", command),
            Err(violation) => warn!("{} rejected ({}): {}", command, violation.kind(), violation),
        }
        result
    }

    /// Issue: create a survey from nothing, self-held by its issuer
    fn verify_issue(
        &self,
        inputs: &[Record],
        outputs: &[Record],
        signers: &BTreeSet<Address>,
    ) -> Result<(), ContractViolation> {
        // 1. A single survey output
        if outputs.len() != 1 {
            return Err(ContractViolation::IssueOutputCount { found: outputs.len() });
        }
        let survey = match &outputs[0] {
            Record::Survey(survey) => survey,
            other => {
                return Err(ContractViolation::IssueOutputNotSurvey { found: other.kind() });
            }
        };

        // 2. Nothing consumed
        if !inputs.is_empty() {
            return Err(ContractViolation::IssueConsumesInputs { found: inputs.len() });
        }

        // 3. Issuer self-holds
        if survey.issuer != survey.owner {
            return Err(ContractViolation::IssuerNotOwner);
        }

        // 4. Issuer signed
        if !signers.contains(&survey.issuer.owning_key) {
            return Err(ContractViolation::IssuerNotSigner {
                issuer: survey.issuer.owning_key,
            });
        }

        // 5. Positive price
        if survey.initial_price <= 0 {
            return Err(ContractViolation::NonPositiveInitialPrice {
                price: survey.initial_price,
            });
        }

        // 6. Initial and resale prices differ
        if survey.initial_price == survey.resale_price {
            return Err(ContractViolation::InitialPriceEqualsResalePrice {
                price: survey.initial_price,
            });
        }

        Ok(())
    }

    /// Trade: hand a survey revision to the cash holder against payment
    fn verify_trade(
        &self,
        inputs: &[Record],
        outputs: &[Record],
        signers: &BTreeSet<Address>,
    ) -> Result<(), ContractViolation> {
        // 1. Two records in, two records out
        if inputs.len() != 2 {
            return Err(ContractViolation::TradeInputCount { found: inputs.len() });
        }
        if outputs.len() != 2 {
            return Err(ContractViolation::TradeOutputCount { found: outputs.len() });
        }

        // 2. One survey and one cash record on each side
        let inputs = RecordTally::of(inputs);
        let outputs = RecordTally::of(outputs);
        let input_survey = inputs.single_survey(Side::Input)?;
        let output_survey = outputs.single_survey(Side::Output)?;
        let input_cash = inputs.single_cash(Side::Input)?;
        let output_cash = outputs.single_cash(Side::Output)?;

        // 3. New revision keeps a positive resale price
        if output_survey.resale_price <= 0 {
            return Err(ContractViolation::NonPositiveResalePrice {
                price: output_survey.resale_price,
            });
        }

        // 4. The consumed revision was listed above its initial price
        if input_survey.resale_price <= input_survey.initial_price {
            return Err(ContractViolation::ResaleNotAboveInitial {
                initial: input_survey.initial_price,
                resale: input_survey.resale_price,
            });
        }

        // 5. Tendered cash covers more than the initial price
        if input_cash.quantity() <= input_survey.initial_price {
            return Err(ContractViolation::InsufficientInputCash {
                tendered: input_cash.quantity(),
                price: input_survey.initial_price,
            });
        }

        // 6. Exactly the resale price changes hands; change is the cash ledger's concern
        if output_cash.quantity() != input_survey.resale_price {
            return Err(ContractViolation::OutputCashMismatch {
                expected: input_survey.resale_price,
                found: output_cash.quantity(),
            });
        }

        // 7. Buyer gets the survey
        if input_cash.owner != output_survey.owner {
            return Err(ContractViolation::BuyerNotNewOwner);
        }

        // 8. Seller gets the cash
        if input_survey.owner != output_cash.owner {
            return Err(ContractViolation::SellerNotPaid);
        }

        // 9. No self-trading
        if input_survey.owner == output_survey.owner {
            return Err(ContractViolation::SelfTrade);
        }

        // 10. Every participant of the consumed survey and cash signed
        let missing = missing_signers(&input_survey.participants(), signers);
        if !missing.is_empty() {
            return Err(ContractViolation::MissingSurveySigners { missing });
        }
        let missing = missing_signers(&input_cash.participants(), signers);
        if !missing.is_empty() {
            return Err(ContractViolation::MissingCashSigners { missing });
        }

        Ok(())
    }
}

/// Exactly one command must be attached to a proposal
pub fn require_single_command(commands: &[Command]) -> Result<&Command, ContractViolation> {
    match commands {
        [command] => Ok(command),
        _ => {
            warn!("Proposal carries {} commands, expected one", commands.len());
            Err(ContractViolation::CommandCount {
                found: commands.len(),
            })
        }
    }
}

/// Participant keys absent from `signers`, sorted and without repeats
fn missing_signers(participants: &[&Party], signers: &BTreeSet<Address>) -> Vec<Address> {
    participants
        .iter()
        .map(|party| party.owning_key)
        .filter(|key| !signers.contains(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records of one transaction side grouped by kind
struct RecordTally<'a> {
    surveys: Vec<&'a SurveyRecord>,
    cash: Vec<&'a CashRecord>,
}

impl<'a> RecordTally<'a> {
    fn of(records: &'a [Record]) -> Self {
        let mut tally = Self {
            surveys: Vec::new(),
            cash: Vec::new(),
        };
        for record in records {
            match record {
                Record::Survey(survey) => tally.surveys.push(survey),
                Record::Cash(cash) => tally.cash.push(cash),
                Record::SurveyKey(_) | Record::SurveyRequest(_) => {}
            }
        }
        tally
    }

    fn single_survey(&self, side: Side) -> Result<&'a SurveyRecord, ContractViolation> {
        single(&self.surveys, side, RecordKind::Survey)
    }

    fn single_cash(&self, side: Side) -> Result<&'a CashRecord, ContractViolation> {
        single(&self.cash, side, RecordKind::Cash)
    }
}

fn single<'a, T>(found: &[&'a T], side: Side, kind: RecordKind) -> Result<&'a T, ContractViolation> {
    match found {
        [record] => Ok(*record),
        [] => Err(ContractViolation::MissingRecord { side, kind }),
        _ => Err(ContractViolation::DuplicateRecord {
            side,
            kind,
            found: found.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cash(owner: u64, quantity: i64) -> Record {
        Record::Cash(CashRecord::new(
            Party::new(format!("O=Party{},L=London,C=GB", owner), Address::from_low_u64_be(owner)),
            quantity,
            "USD",
        ))
    }

    #[test]
    fn test_tally_reports_duplicate_cash() {
        // Two cash records on a two-record side leave no room for a survey,
        // so a full proposal reports the missing survey first.
        let records = vec![cash(1, 10), cash(2, 20)];
        let tally = RecordTally::of(&records);

        assert_eq!(
            tally.single_cash(Side::Input).map(|_| ()),
            Err(ContractViolation::DuplicateRecord {
                side: Side::Input,
                kind: RecordKind::Cash,
                found: 2
            })
        );
        assert_eq!(
            tally.single_survey(Side::Output).map(|_| ()),
            Err(ContractViolation::MissingRecord {
                side: Side::Output,
                kind: RecordKind::Survey
            })
        );
    }

    #[test]
    fn test_tally_returns_single_cash() {
        let records = vec![cash(1, 10)];
        let tally = RecordTally::of(&records);
        assert_eq!(tally.single_cash(Side::Output).map(|c| c.quantity()), Ok(10));
    }
}
