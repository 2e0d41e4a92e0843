multiversx_sc::imports!();

use crate::errors::{ERR_NO_BLOB, ERR_NO_BOUNTY, ERR_NO_PROPOSAL};
use crate::types::{Bounty, BountyClaim, Config, PolicyParameters, Proposal, Vote, VotePolicy};

#[multiversx_sc::module]
pub trait ViewsModule: crate::storage::StorageModule {
    // ── Proposals ──

    #[view(getProposal)]
    fn get_proposal(&self, id: u64) -> Proposal<Self::Api> {
        require!(!self.proposals(id).is_empty(), ERR_NO_PROPOSAL);
        self.proposals(id).get()
    }

    /// Up to `limit` proposals starting at id `from`. Purged ids are skipped.
    #[view(getProposals)]
    fn get_proposals(&self, from: u64, limit: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let end = core::cmp::min(
            from.saturating_add(limit),
            self.last_proposal_id().get(),
        );
        for id in from..end {
            let mapper = self.proposals(id);
            if !mapper.is_empty() {
                result.push(mapper.get());
            }
        }
        result
    }

    #[view(getProposalVotes)]
    fn get_proposal_votes(&self, id: u64) -> MultiValueEncoded<MultiValue2<ManagedAddress, Vote>> {
        let mut result = MultiValueEncoded::new();
        for (voter, vote) in self.votes(id).iter() {
            result.push((voter, vote).into());
        }
        result
    }

    #[view(isAwaitingCallback)]
    fn is_awaiting_callback(&self, id: u64) -> bool {
        !self.pending_call(id).is_empty()
    }

    /// Number of proposals ever submitted; the next proposal gets this id.
    #[view(getLastProposalId)]
    fn get_last_proposal_id(&self) -> u64 {
        self.last_proposal_id().get()
    }

    // ── Blobs and funds ──

    #[view(getBlobStorer)]
    fn get_blob_storer(&self, hash: ManagedBuffer) -> ManagedAddress {
        require!(!self.blob_info(&hash).is_empty(), ERR_NO_BLOB);
        self.blob_info(&hash).get().storer
    }

    /// EGLD the DAO can spend: balance minus bonds and blob deposits.
    #[view(getAvailableAmount)]
    fn get_available_amount(&self) -> BigUint {
        let balance = self
            .blockchain()
            .get_sc_balance(&EgldOrEsdtTokenIdentifier::egld(), 0);
        let locked = self.locked_amount().get();
        if balance > locked {
            balance - locked
        } else {
            BigUint::zero()
        }
    }

    #[view(getLockedAmount)]
    fn get_locked_amount(&self) -> BigUint {
        self.locked_amount().get()
    }

    // ── Bounties ──

    #[view(getBounty)]
    fn get_bounty(&self, id: u64) -> Bounty<Self::Api> {
        require!(!self.bounties(id).is_empty(), ERR_NO_BOUNTY);
        self.bounties(id).get()
    }

    #[view(getLastBountyId)]
    fn get_last_bounty_id(&self) -> u64 {
        self.last_bounty_id().get()
    }

    #[view(getBountyNumberOfClaims)]
    fn get_bounty_number_of_claims(&self, id: u64) -> u32 {
        let mapper = self.bounties(id);
        if mapper.is_empty() {
            0
        } else {
            mapper.get().number_of_claims
        }
    }

    #[view(getBountyClaims)]
    fn get_bounty_claims(
        &self,
        claimer: ManagedAddress,
    ) -> MultiValueEncoded<BountyClaim<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for bounty_id in self.claimer_bounties(&claimer).iter() {
            if let Some(claim) = self.bounty_claims(bounty_id).get(&claimer) {
                result.push(claim);
            }
        }
        result
    }

    // ── Configuration and policy ──

    #[view(getConfig)]
    fn get_config(&self) -> Config<Self::Api> {
        self.require_initialized();
        self.config().get()
    }

    #[view(getPolicyParameters)]
    fn get_policy_parameters(&self) -> PolicyParameters<Self::Api> {
        self.require_initialized();
        self.policy_parameters().get()
    }

    #[view(getDefaultVotePolicy)]
    fn get_default_vote_policy(&self) -> VotePolicy {
        self.require_initialized();
        self.default_vote_policy().get()
    }

    #[view(getRoles)]
    fn get_roles(&self) -> MultiValueEncoded<ManagedBuffer> {
        let mut result = MultiValueEncoded::new();
        for role in self.roles().iter() {
            result.push(role);
        }
        result
    }

    #[view(getRoleMembers)]
    fn get_role_members(&self, role: ManagedBuffer) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for member in self.role_members(&role).iter() {
            result.push(member);
        }
        result
    }

    #[view(getRolePermissions)]
    fn get_role_permissions(&self, role: ManagedBuffer) -> MultiValueEncoded<ManagedBuffer> {
        let mut result = MultiValueEncoded::new();
        for permission in self.role_permissions(&role).iter() {
            result.push(permission);
        }
        result
    }
}
