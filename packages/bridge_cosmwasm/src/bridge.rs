use cw20::Cw20ReceiveMsg;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::structs::{AssetInfo, DepositNonce, DomainId, ResourceId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct InstantiateMsg {
    // ID of the chain this contract lives on.
    pub domain_id: DomainId,
    // Addresses allowed to vote on and execute proposals.
    pub initial_relayers: Vec<String>,
    // Number of distinct relayer votes needed to pass a proposal.
    pub initial_relayer_threshold: u64,
    // Number of blocks after which an unexecuted proposal can be cancelled.
    pub expiry: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /* ---  Transfer entries --- */
    // Initiates a transfer. Native coins for lock-release resources are sent as funds.
    Deposit {
        destination_domain_id: DomainId,
        resource_id: ResourceId,
        data: Vec<u8>,
    },

    // Deposit of a non-burnable cw20 token, sent through the token's `Send`.
    Receive(Cw20ReceiveMsg),

    // Relayer vote on the deposit identified by (origin_domain_id, deposit_nonce).
    // The vote that reaches the threshold settles the transfer.
    VoteProposal {
        origin_domain_id: DomainId,
        deposit_nonce: DepositNonce,
        resource_id: ResourceId,
        data: Vec<u8>,
    },

    // Settles a proposal left in passed status.
    ExecuteProposal {
        origin_domain_id: DomainId,
        deposit_nonce: DepositNonce,
        data: Vec<u8>,
        resource_id: ResourceId,
    },

    // Cancels an expired proposal that was not executed.
    CancelProposal {
        origin_domain_id: DomainId,
        deposit_nonce: DepositNonce,
    },

    /* ---  Admin entries --- */
    // Correlates {resource_id} with {asset}.
    AdminSetResource {
        resource_id: ResourceId,
        asset: AssetInfo,
    },

    // Marks the cw20 token as burnable. The bridge must be its minter.
    AdminSetBurnable {
        contract_addr: String,
    },

    AdminAddRelayer {
        relayer: String,
    },

    AdminRemoveRelayer {
        relayer: String,
    },

    AdminChangeRelayerThreshold {
        threshold: u64,
    },

    AdminPauseTransfers {},

    AdminUnpauseTransfers {},

    AdminChangeAdmin {
        new_admin: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Cw20HookMsg {
    Deposit {
        destination_domain_id: DomainId,
        resource_id: ResourceId,
        data: Vec<u8>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    GetState {},

    // Number of deposits made towards {destination_domain_id}.
    GetDepositCount {
        destination_domain_id: DomainId,
    },

    GetProposal {
        origin_domain_id: DomainId,
        deposit_nonce: DepositNonce,
    },

    GetResource {
        resource_id: ResourceId,
    },

    IsRelayer {
        relayer: String,
    },

    HasVoted {
        origin_domain_id: DomainId,
        deposit_nonce: DepositNonce,
        relayer: String,
    },

    // Amount held in lock-release escrow for {resource_id}.
    GetEscrow {
        resource_id: ResourceId,
    },
}
