multiversx_sc::imports!();

use crate::errors::{
    ERR_BOUNTY_ALL_CLAIMED, ERR_BOUNTY_ALREADY_CLAIMED, ERR_BOUNTY_CLAIM_COMPLETED,
    ERR_BOUNTY_DONE_MUST_BE_SELF, ERR_BOUNTY_WRONG_BOND, ERR_BOUNTY_WRONG_DEADLINE,
    ERR_NO_BOUNTY, ERR_NO_BOUNTY_CLAIM,
};
use crate::types::{Bounty, BountyClaim, ClaimResolution, NewBounty, ProposalKind};

// ============================================================
// Bounties and their claims
// ============================================================

#[multiversx_sc::module]
pub trait BountyModule:
    crate::storage::StorageModule
    + crate::events::EventsModule
    + crate::policy::PolicyModule
    + crate::proposals::ProposalsModule
{
    fn create_bounty(&self, bounty: &NewBounty<Self::Api>) -> u64 {
        let id = self.last_bounty_id().get();
        self.bounties(id).set(Bounty {
            id,
            description: bounty.description.clone(),
            token_id: bounty.token_id.clone(),
            amount: bounty.amount.clone(),
            times: bounty.times,
            max_deadline: bounty.max_deadline,
            number_of_claims: 0,
        });
        self.last_bounty_id().set(id + 1);

        self.bounty_added_event(id, &bounty.token_id, &bounty.amount);
        id
    }

    fn require_bounty(&self, id: u64) -> Bounty<Self::Api> {
        require!(!self.bounties(id).is_empty(), ERR_NO_BOUNTY);
        self.bounties(id).get()
    }

    /// Reserves one payout slot for `deadline` seconds. The attached EGLD
    /// must be exactly the bounty bond.
    #[payable("EGLD")]
    #[endpoint(claimBounty)]
    fn claim_bounty(&self, id: u64, deadline: u64) {
        let mut bounty = self.require_bounty(id);
        let bond = self.call_value().egld_value().clone_value();
        require!(
            bond == self.policy_parameters().get().bounty_bond,
            ERR_BOUNTY_WRONG_BOND
        );
        require!(deadline <= bounty.max_deadline, ERR_BOUNTY_WRONG_DEADLINE);
        require!(bounty.number_of_claims < bounty.times, ERR_BOUNTY_ALL_CLAIMED);

        let claimer = self.blockchain().get_caller();
        let mut claims = self.bounty_claims(id);
        require!(!claims.contains_key(&claimer), ERR_BOUNTY_ALREADY_CLAIMED);

        let now = self.blockchain().get_block_timestamp();
        claims.insert(
            claimer.clone(),
            BountyClaim {
                bounty_id: id,
                claimer: claimer.clone(),
                started_at: now,
                deadline: now.saturating_add(deadline),
                bond: bond.clone(),
                completed: false,
            },
        );
        self.claimer_bounties(&claimer).insert(id);

        bounty.number_of_claims += 1;
        self.bounties(id).set(&bounty);
        self.escrow(&bond);

        self.bounty_claimed_event(id, &claimer, deadline);
    }

    /// Submits the work of a claim as a `BountyDone` proposal, paid for with
    /// the proposal bond. Once the claim deadline passed, anyone may call it
    /// to drop the claim instead, and no proposal is created.
    #[payable("EGLD")]
    #[endpoint(doneBounty)]
    fn done_bounty(
        &self,
        id: u64,
        description: ManagedBuffer,
        claimer: OptionalValue<ManagedAddress>,
    ) -> OptionalValue<u64> {
        self.require_initialized();
        self.require_bounty(id);

        let caller = self.blockchain().get_caller();
        let claimer = match claimer {
            OptionalValue::Some(claimer) => claimer,
            OptionalValue::None => caller.clone(),
        };

        let mut claims = self.bounty_claims(id);
        let claim = match claims.get(&claimer) {
            Some(claim) => claim,
            None => sc_panic!(ERR_NO_BOUNTY_CLAIM),
        };
        require!(!claim.completed, ERR_BOUNTY_CLAIM_COMPLETED);

        let payment = self.call_value().egld_value().clone_value();
        if self.blockchain().get_block_timestamp() > claim.deadline {
            self.resolve_claim(id, &claimer, ClaimResolution::Forfeited);
            if payment > 0u64 {
                self.send().direct_egld(&caller, &payment);
            }
            return OptionalValue::None;
        }

        require!(caller == claimer, ERR_BOUNTY_DONE_MUST_BE_SELF);
        claims.insert(
            claimer.clone(),
            BountyClaim {
                completed: true,
                ..claim
            },
        );

        let proposal_id = self.insert_proposal(
            caller,
            description,
            ProposalKind::BountyDone {
                bounty_id: id,
                receiver: claimer,
            },
            payment,
        );
        OptionalValue::Some(proposal_id)
    }

    /// Abandons an unfinished claim. The bond is returned only within the
    /// forgiveness period.
    #[endpoint(giveupBounty)]
    fn giveup_bounty(&self, id: u64) {
        let caller = self.blockchain().get_caller();
        let claim = match self.bounty_claims(id).get(&caller) {
            Some(claim) => claim,
            None => sc_panic!(ERR_NO_BOUNTY_CLAIM),
        };
        require!(!claim.completed, ERR_BOUNTY_CLAIM_COMPLETED);

        let forgiveness = self.policy_parameters().get().bounty_forgiveness_period;
        let now = self.blockchain().get_block_timestamp();
        let resolution = if now <= claim.started_at.saturating_add(forgiveness) {
            ClaimResolution::Forgiven
        } else {
            ClaimResolution::Forfeited
        };
        self.resolve_claim(id, &caller, resolution);
    }

    /// Removes a claim and releases its slot. This is the only place
    /// `number_of_claims` goes down, so it happens once per claim.
    /// Returns false when the claim no longer exists.
    fn resolve_claim(
        &self,
        bounty_id: u64,
        claimer: &ManagedAddress,
        resolution: ClaimResolution,
    ) -> bool {
        let claim = match self.bounty_claims(bounty_id).remove(claimer) {
            Some(claim) => claim,
            None => return false,
        };
        self.claimer_bounties(claimer).swap_remove(&bounty_id);

        if !self.bounties(bounty_id).is_empty() {
            self.bounties(bounty_id).update(|bounty| {
                bounty.number_of_claims = bounty.number_of_claims.saturating_sub(1);
                if resolution == ClaimResolution::Paid {
                    bounty.times = bounty.times.saturating_sub(1);
                }
            });
        }

        self.release_locked(&claim.bond);
        match resolution {
            ClaimResolution::Paid | ClaimResolution::Forgiven => {
                if claim.bond > 0u64 {
                    self.send().direct_egld(claimer, &claim.bond);
                }
                self.bond_refunded_event(claimer, &claim.bond);
            }
            ClaimResolution::Forfeited => self.bond_forfeited_event(claimer, &claim.bond),
        }

        self.bounty_claim_resolved_event(bounty_id, claimer, resolution);
        true
    }
}
