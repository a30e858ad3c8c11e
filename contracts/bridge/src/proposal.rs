use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, Event, StdResult, Storage};
use cw_storage_plus::Map;

use bridge_cosmwasm::error::ContractError;
use bridge_cosmwasm::structs::{DepositNonce, DomainId, ProposalStatus, ResourceId};

/// Voting record of one transfer. Created on the first vote.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Proposal {
    pub resource_id: ResourceId,
    pub data_hash: [u8; 32],
    pub yes_votes: Vec<Addr>,
    pub status: ProposalStatus,
    pub proposed_height: u64,
}

/// (originDomainID, depositNonce) => Proposal
pub const PROPOSALS: Map<(DomainId, DepositNonce), Proposal> = Map::new("proposals");

pub fn read_proposal(
    store: &dyn Storage,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
) -> StdResult<Option<Proposal>> {
    PROPOSALS.may_load(store, (origin_domain_id, deposit_nonce))
}

pub fn save_proposal(
    store: &mut dyn Storage,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
    proposal: &Proposal,
) -> StdResult<()> {
    PROPOSALS.save(store, (origin_domain_id, deposit_nonce), proposal)
}

impl Proposal {
    pub fn new(resource_id: ResourceId, data_hash: [u8; 32], proposed_height: u64) -> Self {
        Proposal {
            resource_id,
            data_hash,
            yes_votes: vec![],
            status: ProposalStatus::Active,
            proposed_height,
        }
    }

    pub fn has_voted(&self, relayer: &Addr) -> bool {
        self.yes_votes.contains(relayer)
    }

    fn matches(&self, resource_id: &ResourceId, data_hash: &[u8; 32]) -> bool {
        self.resource_id == *resource_id && self.data_hash == *data_hash
    }

    /// Rejects a vote that cannot be recorded on this proposal.
    pub fn check_vote(
        &self,
        relayer: &Addr,
        resource_id: &ResourceId,
        data_hash: &[u8; 32],
    ) -> Result<(), ContractError> {
        if self.status.is_finalized() {
            return Err(ContractError::AlreadyFinalized);
        }
        if !self.matches(resource_id, data_hash) {
            return Err(ContractError::DataMismatch);
        }
        if self.has_voted(relayer) {
            return Err(ContractError::DuplicateVote);
        }
        Ok(())
    }

    /// Records the vote and moves to `Passed` once {threshold} votes are in.
    /// Returns whether this vote passed the proposal.
    pub fn add_vote(&mut self, relayer: Addr, threshold: u64) -> bool {
        debug_assert_eq!(self.status, ProposalStatus::Active);
        self.yes_votes.push(relayer);
        if self.yes_votes.len() as u64 >= threshold {
            self.status = ProposalStatus::Passed;
            return true;
        }
        false
    }

    /// Rejects an execution of anything but a passed proposal with the recorded data.
    pub fn check_executable(
        &self,
        resource_id: &ResourceId,
        data_hash: &[u8; 32],
    ) -> Result<(), ContractError> {
        match self.status {
            ProposalStatus::Executed => return Err(ContractError::AlreadyExecuted),
            ProposalStatus::Passed => {}
            _ => return Err(ContractError::NotPassed),
        }
        if !self.matches(resource_id, data_hash) {
            return Err(ContractError::DataMismatch);
        }
        Ok(())
    }

    pub fn mark_executed(&mut self) {
        debug_assert_eq!(self.status, ProposalStatus::Passed);
        self.status = ProposalStatus::Executed;
    }

    /// Active or passed proposals can be cancelled once more than {expiry}
    /// blocks have gone by since the first vote.
    pub fn cancel(&mut self, current_height: u64, expiry: u64) -> Result<(), ContractError> {
        if !matches!(
            self.status,
            ProposalStatus::Active | ProposalStatus::Passed
        ) {
            return Err(ContractError::ProposalNotCancellable);
        }
        if current_height.saturating_sub(self.proposed_height) <= expiry {
            return Err(ContractError::ProposalNotExpired);
        }
        self.status = ProposalStatus::Cancelled;
        Ok(())
    }
}

// Status change notification consumed by relayers.
pub fn proposal_event(
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
    status: ProposalStatus,
    data_hash: &[u8; 32],
) -> Event {
    Event::new("proposal_event")
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("status", status.code().to_string())
        .add_attribute("data_hash", hex::encode(data_hash))
}

pub fn proposal_vote_event(
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
    relayer: &Addr,
    proposal: &Proposal,
) -> Event {
    Event::new("proposal_vote")
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("relayer", relayer.as_str())
        .add_attribute("status", proposal.status.code().to_string())
        .add_attribute("data_hash", hex::encode(proposal.data_hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE_ID: ResourceId = [1u8; 32];
    const HASH: [u8; 32] = [2u8; 32];

    #[test]
    fn passes_exactly_at_threshold() {
        let mut proposal = Proposal::new(RESOURCE_ID, HASH, 10);
        assert!(!proposal.add_vote(Addr::unchecked("relayer1"), 3));
        assert!(!proposal.add_vote(Addr::unchecked("relayer2"), 3));
        assert_eq!(proposal.status, ProposalStatus::Active);
        assert!(proposal.add_vote(Addr::unchecked("relayer3"), 3));
        assert_eq!(proposal.status, ProposalStatus::Passed);
    }

    #[test]
    fn vote_checks() {
        let relayer = Addr::unchecked("relayer1");
        let mut proposal = Proposal::new(RESOURCE_ID, HASH, 10);
        proposal.add_vote(relayer.clone(), 2);

        assert_eq!(
            proposal.check_vote(&relayer, &RESOURCE_ID, &HASH),
            Err(ContractError::DuplicateVote)
        );
        assert_eq!(
            proposal.check_vote(&Addr::unchecked("relayer2"), &RESOURCE_ID, &[3u8; 32]),
            Err(ContractError::DataMismatch)
        );
        assert_eq!(
            proposal.check_vote(&Addr::unchecked("relayer2"), &[9u8; 32], &HASH),
            Err(ContractError::DataMismatch)
        );
        assert!(proposal
            .check_vote(&Addr::unchecked("relayer2"), &RESOURCE_ID, &HASH)
            .is_ok());

        proposal.add_vote(Addr::unchecked("relayer2"), 2);
        assert_eq!(
            proposal.check_vote(&Addr::unchecked("relayer3"), &RESOURCE_ID, &HASH),
            Err(ContractError::AlreadyFinalized)
        );
    }

    #[test]
    fn execution_checks() {
        let mut proposal = Proposal::new(RESOURCE_ID, HASH, 10);
        assert_eq!(
            proposal.check_executable(&RESOURCE_ID, &HASH),
            Err(ContractError::NotPassed)
        );

        proposal.add_vote(Addr::unchecked("relayer1"), 1);
        assert_eq!(
            proposal.check_executable(&RESOURCE_ID, &[0u8; 32]),
            Err(ContractError::DataMismatch)
        );
        assert!(proposal.check_executable(&RESOURCE_ID, &HASH).is_ok());

        proposal.mark_executed();
        assert_eq!(
            proposal.check_executable(&RESOURCE_ID, &HASH),
            Err(ContractError::AlreadyExecuted)
        );
    }

    #[test]
    fn cancel_after_expiry_only() {
        let mut proposal = Proposal::new(RESOURCE_ID, HASH, 10);
        assert_eq!(proposal.cancel(110, 100), Err(ContractError::ProposalNotExpired));
        proposal.cancel(111, 100).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Cancelled);
        assert_eq!(
            proposal.cancel(500, 100),
            Err(ContractError::ProposalNotCancellable)
        );
    }
}
