use std::fmt;

use cosmwasm_std::Uint128;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type DomainId = u8;
pub type DepositNonce = u64;
pub type ResourceId = [u8; 32];

// Asset bound to a resource id on this chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    /// Native coin, identified by its bank denom
    Native { denom: String },
    /// Cw20 token contract
    Cw20 { contract_addr: String },
}

impl AssetInfo {
    /// Key used for the asset => resource id reverse index.
    pub fn key(&self) -> &str {
        match self {
            AssetInfo::Native { denom } => denom,
            AssetInfo::Cw20 { contract_addr } => contract_addr,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetInfo::Native { .. })
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetInfo::Native { denom } => write!(f, "native:{}", denom),
            AssetInfo::Cw20 { contract_addr } => write!(f, "cw20:{}", contract_addr),
        }
    }
}

/// Proposal status. Numeric codes are emitted in events:
/// Inactive=0, Active=1, Passed=2, Executed=3, Cancelled=4.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Inactive = 0,
    Active = 1,
    Passed = 2,
    Executed = 3,
    Cancelled = 4,
}

impl ProposalStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// No further votes are accepted once a proposal reaches one of these.
    pub fn is_finalized(self) -> bool {
        matches!(
            self,
            ProposalStatus::Passed | ProposalStatus::Executed | ProposalStatus::Cancelled
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct StateResponse {
    pub admin: String,
    pub domain_id: DomainId,
    pub relayer_threshold: u64,
    pub total_relayers: u64,
    pub expiry: u64,
    pub paused: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct DepositCountResponse {
    pub destination_domain_id: DomainId,
    pub deposit_count: DepositNonce,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ProposalResponse {
    pub origin_domain_id: DomainId,
    pub deposit_nonce: DepositNonce,
    pub resource_id: Option<ResourceId>,
    pub data_hash: Option<[u8; 32]>,
    pub yes_votes: Vec<String>,
    pub status: ProposalStatus,
    pub proposed_height: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ResourceResponse {
    pub resource_id: ResourceId,
    pub asset: AssetInfo,
    pub burnable: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct IsRelayerResponse {
    pub relayer: String,
    pub is_relayer: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct HasVotedResponse {
    pub has_voted: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct EscrowResponse {
    pub resource_id: ResourceId,
    pub amount: Uint128,
}
