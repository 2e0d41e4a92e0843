multiversx_sc::imports!();

use crate::errors::{
    ERR_INVALID_PROPOSAL, ERR_INVALID_VOTE_POLICY, ERR_NOT_ENOUGH_DEPOSIT, ERR_NO_BLOB,
    ERR_NO_PROPOSAL, ERR_PERMISSION_DENIED, ERR_PROPOSAL_NOT_READY_FOR_VOTE, ERR_ROLE_NOT_FOUND,
};
use crate::types::{Proposal, ProposalKind, ProposalStatus, ADD_PROPOSAL};

// ============================================================
// Proposal store: submission, bonds, terminal transitions
// ============================================================

#[multiversx_sc::module]
pub trait ProposalsModule:
    crate::storage::StorageModule + crate::events::EventsModule + crate::policy::PolicyModule
{
    /// The whole attached EGLD is escrowed as the proposal bond.
    #[payable("EGLD")]
    #[endpoint(addProposal)]
    fn add_proposal(&self, description: ManagedBuffer, kind: ProposalKind<Self::Api>) -> u64 {
        self.require_initialized();
        self.validate_proposal_kind(&kind);

        let caller = self.blockchain().get_caller();
        let bond = self.call_value().egld_value().clone_value();
        self.insert_proposal(caller, description, kind, bond)
    }

    fn insert_proposal(
        &self,
        proposer: ManagedAddress,
        description: ManagedBuffer,
        kind: ProposalKind<Self::Api>,
        bond: BigUint,
    ) -> u64 {
        require!(
            bond >= self.policy_parameters().get().proposal_bond,
            ERR_NOT_ENOUGH_DEPOSIT
        );
        require!(
            !self
                .permitted_roles(&proposer, kind.label(), ADD_PROPOSAL)
                .is_empty(),
            ERR_PERMISSION_DENIED
        );

        let id = self.last_proposal_id().get();
        let label = ManagedBuffer::new_from_bytes(kind.label());
        let proposal = Proposal {
            id,
            proposer: proposer.clone(),
            description,
            kind,
            status: ProposalStatus::InProgress,
            bond: bond.clone(),
            submitted_at: self.blockchain().get_block_timestamp(),
        };

        self.proposals(id).set(&proposal);
        self.last_proposal_id().set(id + 1);
        self.escrow(&bond);

        self.proposal_added_event(id, &proposer, &label, &bond);
        id
    }

    fn validate_proposal_kind(&self, kind: &ProposalKind<Self::Api>) {
        match kind {
            ProposalKind::ChangeConfig { config } => {
                require!(!config.name.is_empty(), ERR_INVALID_PROPOSAL);
            }
            ProposalKind::AddMemberToRole { member, role }
            | ProposalKind::RemoveMemberFromRole { member, role } => {
                require!(!member.is_zero(), ERR_INVALID_PROPOSAL);
                require!(self.is_group_role(role), ERR_ROLE_NOT_FOUND);
            }
            ProposalKind::ChangePolicyAddOrUpdateRole { role, .. } => {
                require!(!role.is_empty(), ERR_INVALID_PROPOSAL);
            }
            ProposalKind::ChangePolicyRemoveRole { role } => {
                require!(self.roles().contains(role), ERR_ROLE_NOT_FOUND);
            }
            ProposalKind::ChangePolicyUpdateDefaultVotePolicy { vote_policy } => {
                require!(vote_policy.is_valid(), ERR_INVALID_VOTE_POLICY);
            }
            ProposalKind::ChangePolicyUpdateParameters { parameters } => {
                require!(parameters.proposal_period > 0, ERR_INVALID_PROPOSAL);
            }
            ProposalKind::CallBatch { receiver, actions } => {
                require!(!receiver.is_zero(), ERR_INVALID_PROPOSAL);
                require!(!actions.is_empty(), ERR_INVALID_PROPOSAL);
                for action in actions.iter() {
                    require!(
                        !action.endpoint.is_empty() && action.gas > 0,
                        ERR_INVALID_PROPOSAL
                    );
                }
            }
            ProposalKind::UpgradeSelf { hash } => {
                require!(!self.blob_info(hash).is_empty(), ERR_NO_BLOB);
            }
            ProposalKind::UpgradeRemote {
                receiver,
                endpoint,
                hash,
            } => {
                require!(
                    !receiver.is_zero() && !endpoint.is_empty(),
                    ERR_INVALID_PROPOSAL
                );
                require!(!self.blob_info(hash).is_empty(), ERR_NO_BLOB);
            }
            ProposalKind::Transfer {
                receiver, amount, ..
            } => {
                require!(
                    !receiver.is_zero() && *amount > 0u64,
                    ERR_INVALID_PROPOSAL
                );
            }
            ProposalKind::AddBounty { bounty } => {
                require!(
                    bounty.amount > 0u64 && bounty.times > 0 && bounty.max_deadline > 0,
                    ERR_INVALID_PROPOSAL
                );
            }
            // Payout proposals only come from `doneBounty`.
            ProposalKind::BountyDone { .. } => sc_panic!(ERR_INVALID_PROPOSAL),
            ProposalKind::Vote => {}
        }
    }

    fn require_proposal(&self, id: u64) -> Proposal<Self::Api> {
        require!(!self.proposals(id).is_empty(), ERR_NO_PROPOSAL);
        self.proposals(id).get()
    }

    fn is_expired(&self, proposal: &Proposal<Self::Api>) -> bool {
        let period = self.policy_parameters().get().proposal_period;
        self.blockchain().get_block_timestamp() > proposal.submitted_at.saturating_add(period)
    }

    /// Moves an in-progress proposal to its terminal status, exactly once.
    /// The bond is refunded on `Approved`/`Expired` and kept otherwise.
    fn finalize_proposal(&self, proposal: &mut Proposal<Self::Api>, status: ProposalStatus) {
        require!(
            proposal.status == ProposalStatus::InProgress && status != ProposalStatus::InProgress,
            ERR_PROPOSAL_NOT_READY_FOR_VOTE
        );
        proposal.status = status;

        match status {
            ProposalStatus::Approved | ProposalStatus::Expired => self.refund_bond(proposal),
            _ => self.forfeit_bond(proposal),
        }

        self.pending_call(proposal.id).clear();
        if status == ProposalStatus::Removed {
            self.proposals(proposal.id).clear();
            self.clear_tally(proposal.id);
        } else {
            self.proposals(proposal.id).set(&*proposal);
        }

        self.proposal_status_event(proposal.id, status);
    }

    fn refund_bond(&self, proposal: &Proposal<Self::Api>) {
        self.release_locked(&proposal.bond);
        if proposal.bond > 0u64 {
            self.send().direct_egld(&proposal.proposer, &proposal.bond);
        }
        self.bond_refunded_event(&proposal.proposer, &proposal.bond);
    }

    fn forfeit_bond(&self, proposal: &Proposal<Self::Api>) {
        self.release_locked(&proposal.bond);
        self.bond_forfeited_event(&proposal.proposer, &proposal.bond);
    }
}
