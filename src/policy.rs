multiversx_sc::imports!();

use crate::types::{Action, PolicyParameters, RoleKind, Vote, VoteCounts, VotePolicy};

pub const ROLE_ALL: &[u8] = b"all";
pub const ROLE_COUNCIL: &[u8] = b"council";

const WILDCARD: &[u8] = b"*";

/// Builds a `<kind label>:<action>` permission.
pub fn permission_key<M: ManagedTypeApi>(kind: &[u8], action: &[u8]) -> ManagedBuffer<M> {
    let mut key = ManagedBuffer::new_from_bytes(kind);
    key.append_bytes(b":");
    key.append_bytes(action);
    key
}

// ============================================================
// Roles, permissions and vote tallies
// ============================================================

#[multiversx_sc::module]
pub trait PolicyModule: crate::storage::StorageModule + crate::events::EventsModule {
    /// `all` may submit proposals, `council` may do everything.
    fn install_default_policy(
        &self,
        parameters: &PolicyParameters<Self::Api>,
        council: MultiValueEncoded<ManagedAddress>,
    ) {
        let all = ManagedBuffer::new_from_bytes(ROLE_ALL);
        let mut all_permissions = ManagedVec::new();
        all_permissions.push(permission_key(WILDCARD, crate::types::ADD_PROPOSAL));
        self.set_role(&all, RoleKind::Everyone, &all_permissions);

        let council_role = ManagedBuffer::new_from_bytes(ROLE_COUNCIL);
        let mut council_permissions = ManagedVec::new();
        council_permissions.push(permission_key(WILDCARD, WILDCARD));
        self.set_role(&council_role, RoleKind::Group, &council_permissions);
        for member in council.into_iter() {
            self.role_members(&council_role).insert(member);
        }

        self.default_vote_policy().set(VotePolicy::default());
        self.policy_parameters().set(parameters);
    }

    fn set_role(
        &self,
        role: &ManagedBuffer,
        kind: RoleKind,
        permissions: &ManagedVec<Self::Api, ManagedBuffer<Self::Api>>,
    ) {
        self.roles().insert(role.clone());
        self.role_kind(role).set(kind);
        if kind == RoleKind::Everyone {
            self.role_members(role).clear();
        }

        let mut role_permissions = self.role_permissions(role);
        role_permissions.clear();
        for permission in permissions.iter() {
            role_permissions.insert(permission.clone_value());
        }
    }

    fn is_role_member(&self, role: &ManagedBuffer, account: &ManagedAddress) -> bool {
        match self.role_kind(role).get() {
            RoleKind::Everyone => true,
            RoleKind::Group => self.role_members(role).contains(account),
        }
    }

    /// `None` for roles every account holds.
    fn role_size(&self, role: &ManagedBuffer) -> Option<u64> {
        match self.role_kind(role).get() {
            RoleKind::Everyone => None,
            RoleKind::Group => Some(self.role_members(role).len() as u64),
        }
    }

    fn role_has_permission(&self, role: &ManagedBuffer, kind: &[u8], action: &[u8]) -> bool {
        let permissions = self.role_permissions(role);
        permissions.contains(&permission_key(kind, action))
            || permissions.contains(&permission_key(kind, WILDCARD))
            || permissions.contains(&permission_key(WILDCARD, action))
            || permissions.contains(&permission_key(WILDCARD, WILDCARD))
    }

    /// Roles of `account` that grant `<kind>:<action>`.
    fn permitted_roles(
        &self,
        account: &ManagedAddress,
        kind: &[u8],
        action: &[u8],
    ) -> ManagedVec<Self::Api, ManagedBuffer<Self::Api>> {
        let mut permitted = ManagedVec::new();
        for role in self.roles().iter() {
            if self.is_role_member(&role, account) && self.role_has_permission(&role, kind, action)
            {
                permitted.push(role);
            }
        }
        permitted
    }

    // ── Tally ──

    fn role_tally(&self, proposal_id: u64, role: &ManagedBuffer) -> VoteCounts {
        let mapper = self.vote_counts(proposal_id, role);
        if mapper.is_empty() {
            VoteCounts::default()
        } else {
            mapper.get()
        }
    }

    /// Stores the vote and adds it to the tally of every role it was cast through.
    fn record_vote(
        &self,
        proposal_id: u64,
        voter: &ManagedAddress,
        roles: &ManagedVec<Self::Api, ManagedBuffer<Self::Api>>,
        vote: Vote,
    ) {
        self.votes(proposal_id).insert(voter.clone(), vote);
        for role in roles.iter() {
            let mut tally = self.role_tally(proposal_id, &role);
            tally.add(vote);
            self.vote_counts(proposal_id, &role).set(tally);
            self.tally_roles(proposal_id).insert(role.clone_value());
        }
        self.vote_event(proposal_id, voter, vote);
    }

    /// Decides a proposal from the current tallies. Approve is checked
    /// before Reject, Reject before Remove. A proposal no voting group can
    /// still approve is rejected. Groups whose threshold exceeds their size
    /// never count toward that check.
    fn evaluate_votes(&self, proposal_id: u64, kind: &[u8]) -> Option<Vote> {
        let vote_policy = self.default_vote_policy().get();
        let approve_action = Action::VoteApprove.label();

        let mut approved = false;
        let mut rejected = false;
        let mut removed = false;
        let mut approvers = 0u32;
        let mut reachable = false;

        for role in self.roles().iter() {
            let size = self.role_size(&role);
            let threshold = vote_policy.threshold(size);
            let tally = self.role_tally(proposal_id, &role);

            approved |= tally.approve >= threshold;
            rejected |= tally.reject >= threshold;
            removed |= tally.remove >= threshold;

            if !self.role_has_permission(&role, kind, approve_action) {
                continue;
            }
            match size {
                Some(size) if threshold > size => {}
                Some(size) => {
                    approvers += 1;
                    let undecided_or_approving = size
                        .saturating_sub(tally.reject)
                        .saturating_sub(tally.remove);
                    reachable |= undecided_or_approving >= threshold;
                }
                None => {
                    approvers += 1;
                    reachable = true;
                }
            }
        }

        if approved {
            Some(Vote::Approve)
        } else if rejected {
            Some(Vote::Reject)
        } else if removed {
            Some(Vote::Remove)
        } else if approvers > 0 && !reachable {
            Some(Vote::Reject)
        } else {
            None
        }
    }

    /// Drops votes and every tally recorded for the proposal, including
    /// those of roles removed since.
    fn clear_tally(&self, proposal_id: u64) {
        self.votes(proposal_id).clear();
        let mut tally_roles = self.tally_roles(proposal_id);
        for role in tally_roles.iter() {
            self.vote_counts(proposal_id, &role).clear();
        }
        tally_roles.clear();
    }

    // ── Policy changes ──

    fn add_member_to_role(&self, role: &ManagedBuffer, member: &ManagedAddress) -> bool {
        if !self.is_group_role(role) {
            return false;
        }
        self.role_members(role).insert(member.clone());
        self.policy_changed_event(role);
        true
    }

    fn remove_member_from_role(&self, role: &ManagedBuffer, member: &ManagedAddress) -> bool {
        if !self.is_group_role(role) {
            return false;
        }
        self.role_members(role).swap_remove(member);
        self.policy_changed_event(role);
        true
    }

    fn add_or_update_role(
        &self,
        role: &ManagedBuffer,
        kind: RoleKind,
        permissions: &ManagedVec<Self::Api, ManagedBuffer<Self::Api>>,
    ) {
        self.set_role(role, kind, permissions);
        self.policy_changed_event(role);
    }

    fn remove_role(&self, role: &ManagedBuffer) -> bool {
        if !self.roles().swap_remove(role) {
            return false;
        }
        self.role_kind(role).clear();
        self.role_members(role).clear();
        self.role_permissions(role).clear();
        self.policy_changed_event(role);
        true
    }

    fn is_group_role(&self, role: &ManagedBuffer) -> bool {
        self.roles().contains(role) && self.role_kind(role).get() == RoleKind::Group
    }
}
