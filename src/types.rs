use crate::errors::{ContractViolation, ViolationKind};
use ethers::types::{Address, H256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Identifier the survey contract is registered under
pub const SURVEY_CONTRACT_ID: &str = "com.survey.SurveyContract";

/// A named ledger identity and the key it signs with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub owning_key: Address,
}

impl Party {
    pub fn new(name: impl Into<String>, owning_key: Address) -> Self {
        Self {
            name: name.into(),
            owning_key,
        }
    }
}

/// Linear identifier shared by every revision of one logical record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub id: Uuid,
}

impl UniqueIdentifier {
    /// Generate a fresh identifier
    pub fn new(external_id: Option<String>) -> Self {
        Self {
            external_id,
            id: Uuid::new_v4(),
        }
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.external_id {
            Some(external) => write!(f, "{}_{}", external, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Completed survey held as a tradable asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub issuer: Party,
    pub owner: Party,
    pub property_address: String,
    pub land_title_id: String,
    pub survey_date: String,
    /// Price in currency minor units
    pub initial_price: i64,
    pub resale_price: i64,
    pub linear_id: UniqueIdentifier,
}

impl SurveyRecord {
    /// Parties whose consent is required to move this survey
    pub fn participants(&self) -> Vec<&Party> {
        vec![&self.issuer, &self.owner]
    }

    /// Next revision of this survey after a sale to `buyer`
    ///
    /// The linear id is carried over so the revision history stays linked.
    pub fn transferred_to(&self, buyer: Party, resale_price: i64) -> Self {
        Self {
            owner: buyer,
            resale_price,
            ..self.clone()
        }
    }
}

/// Hash and decryption key released once a survey is complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyKeyRecord {
    pub encoded_survey_hash: String,
    pub encoded_survey_key: String,
    pub linear_id: UniqueIdentifier,
}

impl SurveyKeyRecord {
    pub fn participants(&self) -> Vec<&Party> {
        Vec::new()
    }
}

/// Pending request from a prospective buyer to a surveyor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRequestRecord {
    pub requester: Party,
    pub surveyor: Party,
    pub property_address: String,
    pub land_title_id: String,
    pub survey_price: i64,
    pub linear_id: UniqueIdentifier,
}

impl SurveyRequestRecord {
    pub fn participants(&self) -> Vec<&Party> {
        vec![&self.requester]
    }
}

/// Quantity of a currency in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub quantity: i64,
    pub token: String,
}

/// Owned cash as produced by the cash sub-ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRecord {
    pub owner: Party,
    pub amount: Amount,
}

impl CashRecord {
    pub fn new(owner: Party, quantity: i64, token: impl Into<String>) -> Self {
        Self {
            owner,
            amount: Amount {
                quantity,
                token: token.into(),
            },
        }
    }

    pub fn quantity(&self) -> i64 {
        self.amount.quantity
    }

    pub fn participants(&self) -> Vec<&Party> {
        vec![&self.owner]
    }
}

/// Discriminant of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Survey,
    SurveyKey,
    SurveyRequest,
    Cash,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Survey => "survey",
            RecordKind::SurveyKey => "survey key",
            RecordKind::SurveyRequest => "survey request",
            RecordKind::Cash => "cash",
        };
        f.write_str(name)
    }
}

/// Any record that can appear as a transaction input or output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Record {
    Survey(SurveyRecord),
    SurveyKey(SurveyKeyRecord),
    SurveyRequest(SurveyRequestRecord),
    Cash(CashRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Survey(_) => RecordKind::Survey,
            Record::SurveyKey(_) => RecordKind::SurveyKey,
            Record::SurveyRequest(_) => RecordKind::SurveyRequest,
            Record::Cash(_) => RecordKind::Cash,
        }
    }

    pub fn participants(&self) -> Vec<&Party> {
        match self {
            Record::Survey(survey) => survey.participants(),
            Record::SurveyKey(key) => key.participants(),
            Record::SurveyRequest(request) => request.participants(),
            Record::Cash(cash) => cash.participants(),
        }
    }

    /// Cash is fungible and has no linear id
    pub fn linear_id(&self) -> Option<&UniqueIdentifier> {
        match self {
            Record::Survey(survey) => Some(&survey.linear_id),
            Record::SurveyKey(key) => Some(&key.linear_id),
            Record::SurveyRequest(request) => Some(&request.linear_id),
            Record::Cash(_) => None,
        }
    }
}

/// Declared intent of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    IssueRequest,
    Issue,
    Trade,
    OracleCommand { linear_id: UniqueIdentifier },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::IssueRequest => f.write_str("IssueRequest"),
            Command::Issue => f.write_str("Issue"),
            Command::Trade => f.write_str("Trade"),
            Command::OracleCommand { linear_id } => write!(f, "OracleCommand({})", linear_id),
        }
    }
}

/// Candidate state transition handed to the validator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionProposal {
    pub commands: Vec<Command>,
    #[serde(default)]
    pub inputs: Vec<Record>,
    #[serde(default)]
    pub outputs: Vec<Record>,
    #[serde(default)]
    pub signers: BTreeSet<Address>,
}

impl TransactionProposal {
    /// Start a proposal carrying a single command
    pub fn new(command: Command) -> Self {
        Self {
            commands: vec![command],
            ..Self::default()
        }
    }

    pub fn with_input(mut self, record: Record) -> Self {
        self.inputs.push(record);
        self
    }

    pub fn with_output(mut self, record: Record) -> Self {
        self.outputs.push(record);
        self
    }

    pub fn signed_by(mut self, key: Address) -> Self {
        self.signers.insert(key);
        self
    }

    /// Decode a proposal from its JSON form
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Keccak-256 over the JSON encoding of the proposal
    ///
    /// Field order is fixed by the struct layout and signers are kept in a
    /// `BTreeSet`, so equal proposals always hash to the same id.
    pub fn id(&self) -> Result<H256, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(H256::from(keccak256(bytes)))
    }
}

/// Outcome of validating one proposal, as reported to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub contract: String,
    pub proposal_id: H256,
    pub node: String,
    pub status: VerdictStatus,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictStatus {
    Accepted,
    Rejected {
        kind: ViolationKind,
        reason: String,
        violation: ContractViolation,
    },
}

impl Verdict {
    /// Build a verdict from a validation result
    ///
    /// The timestamp is supplied by the caller; validation itself never reads the clock.
    pub fn new(
        proposal_id: H256,
        node: impl Into<String>,
        result: &Result<(), ContractViolation>,
        timestamp: i64,
    ) -> Self {
        let status = match result {
            Ok(()) => VerdictStatus::Accepted,
            Err(violation) => VerdictStatus::Rejected {
                kind: violation.kind(),
                reason: violation.to_string(),
                violation: violation.clone(),
            },
        };

        Self {
            contract: SURVEY_CONTRACT_ID.to_string(),
            proposal_id,
            node: node.into(),
            status,
            timestamp,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == VerdictStatus::Accepted
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            VerdictStatus::Accepted => {
                write!(f, "{:?} accepted by {} ({})", self.proposal_id, self.node, self.contract)
            }
            VerdictStatus::Rejected { kind, reason, .. } => write!(
                f,
                "{:?} rejected by {} ({}): [{}] {}",
                self.proposal_id, self.node, self.contract, kind, reason
            ),
        }
    }
}
