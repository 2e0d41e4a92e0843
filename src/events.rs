multiversx_sc::imports!();

use crate::types::{ClaimResolution, ProposalStatus, Vote};

#[multiversx_sc::module]
pub trait EventsModule {
    #[event("proposalAdded")]
    fn proposal_added_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        #[indexed] kind: &ManagedBuffer,
        bond: &BigUint,
    );

    #[event("vote")]
    fn vote_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        #[indexed] vote: Vote,
    );

    #[event("proposalStatus")]
    fn proposal_status_event(&self, #[indexed] proposal_id: u64, #[indexed] status: ProposalStatus);

    /// `step` is the index of the batch call the result belongs to, 0 otherwise.
    #[event("proposalCallback")]
    fn proposal_callback_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] success: bool,
        #[indexed] step: u32,
    );

    #[event("bondRefunded")]
    fn bond_refunded_event(&self, #[indexed] account: &ManagedAddress, amount: &BigUint);

    #[event("bondForfeited")]
    fn bond_forfeited_event(&self, #[indexed] account: &ManagedAddress, amount: &BigUint);

    #[event("blobStored")]
    fn blob_stored_event(
        &self,
        #[indexed] hash: &ManagedBuffer,
        #[indexed] storer: &ManagedAddress,
        deposit: &BigUint,
    );

    #[event("blobRemoved")]
    fn blob_removed_event(
        &self,
        #[indexed] hash: &ManagedBuffer,
        #[indexed] storer: &ManagedAddress,
        refund: &BigUint,
    );

    #[event("bountyAdded")]
    fn bounty_added_event(
        &self,
        #[indexed] bounty_id: u64,
        #[indexed] token_id: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
    );

    #[event("bountyClaimed")]
    fn bounty_claimed_event(
        &self,
        #[indexed] bounty_id: u64,
        #[indexed] claimer: &ManagedAddress,
        #[indexed] deadline: u64,
    );

    #[event("bountyClaimResolved")]
    fn bounty_claim_resolved_event(
        &self,
        #[indexed] bounty_id: u64,
        #[indexed] claimer: &ManagedAddress,
        #[indexed] resolution: ClaimResolution,
    );

    #[event("configChanged")]
    fn config_changed_event(&self, #[indexed] name: &ManagedBuffer);

    #[event("policyChanged")]
    fn policy_changed_event(&self, #[indexed] change: &ManagedBuffer);
}
