multiversx_sc::imports!();

use crate::errors::ERR_CONTRACT_IS_NOT_INITIALIZED;
use crate::types::{
    BlobInfo, Bounty, BountyClaim, Config, PendingCall, PolicyParameters, Proposal, RoleKind,
    Vote, VoteCounts, VotePolicy,
};

#[multiversx_sc::module]
pub trait StorageModule {
    fn require_initialized(&self) {
        require!(self.initialized().get(), ERR_CONTRACT_IS_NOT_INITIALIZED);
    }

    fn escrow(&self, amount: &BigUint) {
        self.locked_amount().update(|locked| *locked += amount);
    }

    /// Releases escrowed EGLD; never drops the locked amount below zero.
    fn release_locked(&self, amount: &BigUint) {
        self.locked_amount().update(|locked| {
            if *locked > *amount {
                *locked -= amount;
            } else {
                *locked = BigUint::zero();
            }
        });
    }

    // ── Configuration ──

    #[storage_mapper("initialized")]
    fn initialized(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("config")]
    fn config(&self) -> SingleValueMapper<Config<Self::Api>>;

    // ── Policy ──

    #[storage_mapper("roles")]
    fn roles(&self) -> UnorderedSetMapper<ManagedBuffer>;

    #[storage_mapper("roleKind")]
    fn role_kind(&self, role: &ManagedBuffer) -> SingleValueMapper<RoleKind>;

    #[storage_mapper("roleMembers")]
    fn role_members(&self, role: &ManagedBuffer) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("rolePermissions")]
    fn role_permissions(&self, role: &ManagedBuffer) -> UnorderedSetMapper<ManagedBuffer>;

    #[storage_mapper("defaultVotePolicy")]
    fn default_vote_policy(&self) -> SingleValueMapper<VotePolicy>;

    #[storage_mapper("policyParameters")]
    fn policy_parameters(&self) -> SingleValueMapper<PolicyParameters<Self::Api>>;

    // ── Proposals ──

    #[storage_mapper("lastProposalId")]
    fn last_proposal_id(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    #[storage_mapper("votes")]
    fn votes(&self, proposal_id: u64) -> MapMapper<ManagedAddress, Vote>;

    #[storage_mapper("voteCounts")]
    fn vote_counts(&self, proposal_id: u64, role: &ManagedBuffer) -> SingleValueMapper<VoteCounts>;

    /// Roles holding a tally for the proposal.
    #[storage_mapper("tallyRoles")]
    fn tally_roles(&self, proposal_id: u64) -> UnorderedSetMapper<ManagedBuffer>;

    #[storage_mapper("pendingCall")]
    fn pending_call(&self, proposal_id: u64) -> SingleValueMapper<PendingCall<Self::Api>>;

    // ── Blobs ──

    #[storage_mapper("blobCode")]
    fn blob_code(&self, hash: &ManagedBuffer) -> SingleValueMapper<ManagedBuffer>;

    #[storage_mapper("blobInfo")]
    fn blob_info(&self, hash: &ManagedBuffer) -> SingleValueMapper<BlobInfo<Self::Api>>;

    // ── Bounties ──

    #[storage_mapper("lastBountyId")]
    fn last_bounty_id(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("bounties")]
    fn bounties(&self, id: u64) -> SingleValueMapper<Bounty<Self::Api>>;

    #[storage_mapper("bountyClaims")]
    fn bounty_claims(&self, bounty_id: u64) -> MapMapper<ManagedAddress, BountyClaim<Self::Api>>;

    #[storage_mapper("claimerBounties")]
    fn claimer_bounties(&self, claimer: &ManagedAddress) -> UnorderedSetMapper<u64>;

    // ── Accounting ──

    /// Blob deposits plus outstanding proposal and claim bonds.
    #[storage_mapper("lockedAmount")]
    fn locked_amount(&self) -> SingleValueMapper<BigUint>;
}
