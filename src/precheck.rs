//! Caller-side Prechecks
//!
//! Checks a caller runs on request parameters before it assembles a proposal.
//! They are not part of the contract rules: a proposal that skips them is still
//! judged by the validator alone.

use crate::errors::PrecheckError;
use crate::{Command, Record, TransactionProposal};

/// A survey request may be free but never negative
pub fn check_request_price(price: i64) -> Result<(), PrecheckError> {
    if price < 0 {
        return Err(PrecheckError::NegativeRequestPrice { price });
    }
    Ok(())
}

/// An issuance price may not be negative
pub fn check_issue_price(price: i64) -> Result<(), PrecheckError> {
    if price < 0 {
        return Err(PrecheckError::NegativeIssuePrice { price });
    }
    Ok(())
}

/// Apply the request-side checks to the outputs of an assembled proposal
///
/// IssueRequest outputs are checked for their survey price and Issue outputs
/// for their initial price. Other commands pass through.
pub fn check_proposal(proposal: &TransactionProposal) -> Result<(), PrecheckError> {
    for command in &proposal.commands {
        for record in &proposal.outputs {
            match (command, record) {
                (Command::IssueRequest, Record::SurveyRequest(request)) => {
                    check_request_price(request.survey_price)?
                }
                (Command::Issue, Record::Survey(survey)) => check_issue_price(survey.initial_price)?,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Party, SurveyRecord, SurveyRequestRecord, UniqueIdentifier};
    use ethers::types::Address;

    fn party(n: u64) -> Party {
        Party::new(format!("O=Party{},L=London,C=GB", n), Address::from_low_u64_be(n))
    }

    fn request(price: i64) -> Record {
        Record::SurveyRequest(SurveyRequestRecord {
            requester: party(1),
            surveyor: party(2),
            property_address: "1 High Street".to_string(),
            land_title_id: "TITLE-1".to_string(),
            survey_price: price,
            linear_id: UniqueIdentifier::new(None),
        })
    }

    #[test]
    fn test_request_price_zero_is_allowed() {
        assert!(check_request_price(0).is_ok());
        assert!(check_request_price(250).is_ok());
    }

    #[test]
    fn test_negative_request_price_rejected() {
        let err = check_request_price(-1).unwrap_err();
        assert_eq!(err, PrecheckError::NegativeRequestPrice { price: -1 });
        assert_eq!(err.to_string(), "Survey price cannot be less then zero.");
    }

    #[test]
    fn test_negative_issue_price_rejected() {
        assert!(check_issue_price(0).is_ok());
        assert_eq!(
            check_issue_price(-5).unwrap_err().to_string(),
            "Price cannot be less then zero."
        );
    }

    #[test]
    fn test_check_proposal_inspects_request_outputs() {
        let ok = TransactionProposal::new(Command::IssueRequest).with_output(request(100));
        assert!(check_proposal(&ok).is_ok());

        let bad = TransactionProposal::new(Command::IssueRequest).with_output(request(-100));
        assert_eq!(
            check_proposal(&bad),
            Err(PrecheckError::NegativeRequestPrice { price: -100 })
        );
    }

    #[test]
    fn test_check_proposal_inspects_issue_outputs() {
        let survey = SurveyRecord {
            issuer: party(1),
            owner: party(1),
            property_address: "1 High Street".to_string(),
            land_title_id: "TITLE-1".to_string(),
            survey_date: "2018-03-01".to_string(),
            initial_price: -10,
            resale_price: 20,
            linear_id: UniqueIdentifier::new(None),
        };
        let proposal = TransactionProposal::new(Command::Issue).with_output(Record::Survey(survey));
        assert_eq!(
            check_proposal(&proposal),
            Err(PrecheckError::NegativeIssuePrice { price: -10 })
        );
    }

    #[test]
    fn test_check_proposal_ignores_trades() {
        let proposal = TransactionProposal::new(Command::Trade).with_output(request(-1));
        assert!(check_proposal(&proposal).is_ok());
    }
}
