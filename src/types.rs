multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal status
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProposalStatus {
    /// Open for votes, or waiting for the callback of an issued call.
    InProgress,
    /// Executed successfully. Bond returned.
    Approved,
    /// Rejected by vote, or approval became unreachable. Bond kept by the DAO.
    Rejected,
    /// Removed by vote or by a member with removal rights. Record purged.
    Removed,
    /// Voting period elapsed and the proposal was finalized. Bond returned.
    Expired,
    /// Approved, but execution failed. Bond kept by the DAO.
    Failed,
}

// ============================================================
// Votes and proposal actions
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Vote {
    Approve,
    Reject,
    Remove,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    VoteApprove,
    VoteReject,
    VoteRemove,
    /// Drop an in-progress proposal without a vote.
    RemoveProposal,
    /// Close an in-progress proposal whose voting period elapsed.
    Finalize,
}

/// Permission name required to submit a proposal.
pub const ADD_PROPOSAL: &[u8] = b"AddProposal";

impl Action {
    /// Name used in role permissions (`<kind label>:<action>`).
    pub fn label(&self) -> &'static [u8] {
        match self {
            Action::VoteApprove => b"VoteApprove",
            Action::VoteReject => b"VoteReject",
            Action::VoteRemove => b"VoteRemove",
            Action::RemoveProposal => b"RemoveProposal",
            Action::Finalize => b"Finalize",
        }
    }

    pub fn vote(&self) -> Option<Vote> {
        match self {
            Action::VoteApprove => Some(Vote::Approve),
            Action::VoteReject => Some(Vote::Reject),
            Action::VoteRemove => Some(Vote::Remove),
            Action::RemoveProposal | Action::Finalize => None,
        }
    }
}

/// Per-role vote tally of a proposal.
#[type_abi]
#[derive(
    TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug, Default,
)]
pub struct VoteCounts {
    pub approve: u64,
    pub reject: u64,
    pub remove: u64,
}

impl VoteCounts {
    pub fn add(&mut self, vote: Vote) {
        match vote {
            Vote::Approve => self.approve = self.approve.saturating_add(1),
            Vote::Reject => self.reject = self.reject.saturating_add(1),
            Vote::Remove => self.remove = self.remove.saturating_add(1),
        }
    }
}

// ============================================================
// Policy
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoleKind {
    /// Every account holds the role. Its size is unbounded.
    Everyone,
    /// Only the accounts listed as role members.
    Group,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum WeightOrRatio {
    /// Fixed number of votes.
    Weight(u64),
    /// `numerator / denominator` of the role size, strictly exceeded.
    Ratio(u64, u64),
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct VotePolicy {
    /// Minimum number of votes, whatever the threshold says.
    pub quorum: u64,
    pub threshold: WeightOrRatio,
}

impl Default for VotePolicy {
    fn default() -> Self {
        VotePolicy {
            quorum: 0,
            threshold: WeightOrRatio::Ratio(1, 2),
        }
    }
}

impl VotePolicy {
    pub fn is_valid(&self) -> bool {
        match self.threshold {
            WeightOrRatio::Weight(weight) => weight > 0,
            WeightOrRatio::Ratio(numerator, denominator) => {
                denominator > 0 && numerator <= denominator
            }
        }
    }

    /// Number of same-direction votes a role needs to decide a proposal.
    /// `role_size` is `None` for roles without a bounded membership.
    /// A fixed weight never asks for more votes than the role has members;
    /// the quorum is not capped.
    pub fn threshold(&self, role_size: Option<u64>) -> u64 {
        let weight = match (self.threshold, role_size) {
            (WeightOrRatio::Weight(weight), Some(size)) => core::cmp::min(weight, size),
            (WeightOrRatio::Weight(weight), None) => weight,
            (WeightOrRatio::Ratio(numerator, denominator), Some(size)) => {
                let share = size
                    .saturating_mul(numerator)
                    .checked_div(denominator)
                    .unwrap_or(size);
                core::cmp::min(share.saturating_add(1), size)
            }
            (WeightOrRatio::Ratio(..), None) => 1,
        };
        core::cmp::max(core::cmp::max(self.quorum, weight), 1)
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct PolicyParameters<M: ManagedTypeApi> {
    pub proposal_bond: BigUint<M>,
    /// Seconds a proposal stays open for votes.
    pub proposal_period: u64,
    pub bounty_bond: BigUint<M>,
    /// Seconds after a claim during which giving up returns the bond.
    pub bounty_forgiveness_period: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Config<M: ManagedTypeApi> {
    pub name: ManagedBuffer<M>,
    pub purpose: ManagedBuffer<M>,
    pub metadata: ManagedBuffer<M>,
}

// ============================================================
// Proposal kinds
// ============================================================

/// One call of a `CallBatch` proposal.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone, Debug)]
pub struct ActionCall<M: ManagedTypeApi> {
    pub endpoint: ManagedBuffer<M>,
    pub args: ManagedVec<M, ManagedBuffer<M>>,
    pub egld_amount: BigUint<M>,
    pub gas: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct NewBounty<M: ManagedTypeApi> {
    pub description: ManagedBuffer<M>,
    pub token_id: EgldOrEsdtTokenIdentifier<M>,
    pub amount: BigUint<M>,
    /// How many times the bounty can be paid out.
    pub times: u32,
    /// Longest deadline, in seconds, a claimer may ask for.
    pub max_deadline: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub enum ProposalKind<M: ManagedTypeApi> {
    ChangeConfig {
        config: Config<M>,
    },
    AddMemberToRole {
        member: ManagedAddress<M>,
        role: ManagedBuffer<M>,
    },
    RemoveMemberFromRole {
        member: ManagedAddress<M>,
        role: ManagedBuffer<M>,
    },
    ChangePolicyAddOrUpdateRole {
        role: ManagedBuffer<M>,
        kind: RoleKind,
        permissions: ManagedVec<M, ManagedBuffer<M>>,
    },
    ChangePolicyRemoveRole {
        role: ManagedBuffer<M>,
    },
    ChangePolicyUpdateDefaultVotePolicy {
        vote_policy: VotePolicy,
    },
    ChangePolicyUpdateParameters {
        parameters: PolicyParameters<M>,
    },
    /// Ordered calls to one receiver. Each call is issued after the previous
    /// one succeeded; the first failure fails the proposal.
    CallBatch {
        receiver: ManagedAddress<M>,
        actions: ManagedVec<M, ActionCall<M>>,
    },
    /// Redeploy this contract with the code stored under `hash`.
    UpgradeSelf {
        hash: ManagedBuffer<M>,
    },
    /// Call `endpoint` on `receiver` with the code stored under `hash`.
    UpgradeRemote {
        receiver: ManagedAddress<M>,
        endpoint: ManagedBuffer<M>,
        hash: ManagedBuffer<M>,
    },
    Transfer {
        token_id: EgldOrEsdtTokenIdentifier<M>,
        receiver: ManagedAddress<M>,
        amount: BigUint<M>,
    },
    AddBounty {
        bounty: NewBounty<M>,
    },
    /// Pays the bounty reward to the claimer. Only created by `doneBounty`.
    BountyDone {
        bounty_id: u64,
        receiver: ManagedAddress<M>,
    },
    /// Signalling proposal, no effect on approval.
    Vote,
}

impl<M: ManagedTypeApi> ProposalKind<M> {
    /// Name used in role permissions.
    pub fn label(&self) -> &'static [u8] {
        match self {
            ProposalKind::ChangeConfig { .. } => b"config",
            ProposalKind::AddMemberToRole { .. } => b"add_member_to_role",
            ProposalKind::RemoveMemberFromRole { .. } => b"remove_member_from_role",
            ProposalKind::ChangePolicyAddOrUpdateRole { .. } => b"policy_add_or_update_role",
            ProposalKind::ChangePolicyRemoveRole { .. } => b"policy_remove_role",
            ProposalKind::ChangePolicyUpdateDefaultVotePolicy { .. } => {
                b"policy_update_default_vote_policy"
            }
            ProposalKind::ChangePolicyUpdateParameters { .. } => b"policy_update_parameters",
            ProposalKind::CallBatch { .. } => b"call",
            ProposalKind::UpgradeSelf { .. } => b"upgrade_self",
            ProposalKind::UpgradeRemote { .. } => b"upgrade_remote",
            ProposalKind::Transfer { .. } => b"transfer",
            ProposalKind::AddBounty { .. } => b"add_bounty",
            ProposalKind::BountyDone { .. } => b"bounty_done",
            ProposalKind::Vote => b"vote",
        }
    }
}

// ============================================================
// Proposal
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub proposer: ManagedAddress<M>,
    pub description: ManagedBuffer<M>,
    pub kind: ProposalKind<M>,
    pub status: ProposalStatus,
    /// EGLD escrowed at submission.
    pub bond: BigUint<M>,
    pub submitted_at: u64,
}

// ============================================================
// Continuation of proposals waiting on issued calls
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub enum CallbackHandler<M: ManagedTypeApi> {
    Transfer,
    CallBatch,
    UpgradeSelf,
    UpgradeRemote,
    BountyPayout {
        bounty_id: u64,
        claimer: ManagedAddress<M>,
    },
}

/// Stored while a proposal waits for a callback. Its presence is the
/// pending marker; the proposal itself stays `InProgress`.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct PendingCall<M: ManagedTypeApi> {
    pub handler: CallbackHandler<M>,
    /// Index of the batch call to issue once the current one succeeds.
    pub next_action: u32,
}

// ============================================================
// Blobs
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct BlobInfo<M: ManagedTypeApi> {
    pub storer: ManagedAddress<M>,
    /// Exact amount charged on store and refunded on removal.
    pub deposit: BigUint<M>,
}

// ============================================================
// Bounties
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Bounty<M: ManagedTypeApi> {
    pub id: u64,
    pub description: ManagedBuffer<M>,
    pub token_id: EgldOrEsdtTokenIdentifier<M>,
    pub amount: BigUint<M>,
    /// Payouts still available.
    pub times: u32,
    pub max_deadline: u64,
    /// Claims neither paid, given up nor forfeited.
    pub number_of_claims: u32,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct BountyClaim<M: ManagedTypeApi> {
    pub bounty_id: u64,
    pub claimer: ManagedAddress<M>,
    pub started_at: u64,
    pub deadline: u64,
    pub bond: BigUint<M>,
    /// Work submitted, payout proposal pending.
    pub completed: bool,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClaimResolution {
    /// Reward paid. Bond returned, one payout consumed.
    Paid,
    /// Given up within the forgiveness period. Bond returned.
    Forgiven,
    /// Expired, rejected or failed. Bond kept by the DAO.
    Forfeited,
}
