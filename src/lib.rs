#![no_std]

multiversx_sc::imports!();

pub mod blob;
pub mod bounty;
pub mod errors;
pub mod events;
pub mod policy;
pub mod proposals;
pub mod storage;
pub mod types;
pub mod views;

use errors::{
    ERR_ALREADY_VOTED, ERR_CONTRACT_IS_INITIALIZED, ERR_NOT_ENOUGH_GAS, ERR_PERMISSION_DENIED,
    ERR_PROPOSAL_EXPIRED, ERR_PROPOSAL_NOT_EXPIRED, ERR_PROPOSAL_NOT_READY_FOR_VOTE,
};
use types::{
    Action, ActionCall, CallbackHandler, ClaimResolution, Config, PendingCall, PolicyParameters,
    Proposal, ProposalKind, ProposalStatus, Vote,
};

// ============================================================
// Constants
// ============================================================

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gas given to a plain transfer promise
const TRANSFER_GAS: u64 = 5_000_000;

/// Gas reserved for each promise callback
const CALLBACK_GAS: u64 = 10_000_000;

/// Gas kept for finishing the current transaction after promises are registered
const EXECUTION_GAS_RESERVE: u64 = 5_000_000;

/// Gas given to an `UpgradeSelf` or `UpgradeRemote` call
const UPGRADE_GAS: u64 = 50_000_000;

/// Built-in function redeploying the code of the called contract
const UPGRADE_CONTRACT_FUNCTION: &str = "upgradeContract";

/// Result of running an approved proposal.
pub enum ExecutionOutcome {
    Approved,
    Failed,
    /// A promise was registered, the callback decides.
    Pending,
}

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait DaoGovernance:
    storage::StorageModule
    + events::EventsModule
    + policy::PolicyModule
    + proposals::ProposalsModule
    + blob::BlobModule
    + bounty::BountyModule
    + views::ViewsModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// Deploys an uninitialized DAO; `new` must be called before use.
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    /// One-time setup by the owner: configuration, policy parameters and the
    /// initial council. Everyone may propose, the council may do everything else.
    #[endpoint(new)]
    fn initialize(
        &self,
        config: Config<Self::Api>,
        parameters: PolicyParameters<Self::Api>,
        council: MultiValueEncoded<ManagedAddress>,
    ) {
        self.blockchain().check_caller_is_owner();
        require!(!self.initialized().get(), ERR_CONTRACT_IS_INITIALIZED);

        self.config().set(&config);
        self.install_default_policy(&parameters, council);
        self.initialized().set(true);

        self.config_changed_event(&config.name);
    }

    // ========================================================
    // ENDPOINT: actProposal
    // Votes, removal and expiry. Crossing a threshold executes
    // the proposal in the same transaction.
    // ========================================================

    #[endpoint(actProposal)]
    fn act_proposal(&self, id: u64, action: Action) -> ProposalStatus {
        self.require_initialized();

        let mut proposal = self.require_proposal(id);
        require!(
            proposal.status == ProposalStatus::InProgress && self.pending_call(id).is_empty(),
            ERR_PROPOSAL_NOT_READY_FOR_VOTE
        );

        if action == Action::Finalize {
            require!(self.is_expired(&proposal), ERR_PROPOSAL_NOT_EXPIRED);
            return self.conclude(&mut proposal, ProposalStatus::Expired);
        }

        let caller = self.blockchain().get_caller();
        let roles = self.permitted_roles(&caller, proposal.kind.label(), action.label());
        require!(!roles.is_empty(), ERR_PERMISSION_DENIED);

        let vote = match action.vote() {
            Some(vote) => vote,
            None => return self.conclude(&mut proposal, ProposalStatus::Removed),
        };

        require!(!self.is_expired(&proposal), ERR_PROPOSAL_EXPIRED);
        require!(!self.votes(id).contains_key(&caller), ERR_ALREADY_VOTED);
        self.record_vote(id, &caller, &roles, vote);

        match self.evaluate_votes(id, proposal.kind.label()) {
            Some(Vote::Approve) => self.execute_proposal(&mut proposal),
            Some(Vote::Reject) => self.conclude(&mut proposal, ProposalStatus::Rejected),
            Some(Vote::Remove) => self.conclude(&mut proposal, ProposalStatus::Removed),
            None => ProposalStatus::InProgress,
        }
    }

    fn execute_proposal(&self, proposal: &mut Proposal<Self::Api>) -> ProposalStatus {
        match self.dispatch(proposal) {
            ExecutionOutcome::Approved => self.conclude(proposal, ProposalStatus::Approved),
            ExecutionOutcome::Failed => self.conclude(proposal, ProposalStatus::Failed),
            ExecutionOutcome::Pending => ProposalStatus::InProgress,
        }
    }

    /// Closes a proposal. A payout proposal that does not go through gives
    /// its bounty slot back.
    fn conclude(
        &self,
        proposal: &mut Proposal<Self::Api>,
        status: ProposalStatus,
    ) -> ProposalStatus {
        if status != ProposalStatus::Approved {
            if let ProposalKind::BountyDone {
                bounty_id,
                receiver,
            } = &proposal.kind
            {
                self.resolve_claim(*bounty_id, receiver, ClaimResolution::Forfeited);
            }
        }
        self.finalize_proposal(proposal, status);
        status
    }

    // ========================================================
    // Action executor
    // ========================================================

    fn dispatch(&self, proposal: &Proposal<Self::Api>) -> ExecutionOutcome {
        let id = proposal.id;
        match &proposal.kind {
            ProposalKind::ChangeConfig { config } => {
                self.config().set(config);
                self.config_changed_event(&config.name);
                ExecutionOutcome::Approved
            }
            ProposalKind::AddMemberToRole { member, role } => {
                self.applied(self.add_member_to_role(role, member))
            }
            ProposalKind::RemoveMemberFromRole { member, role } => {
                self.applied(self.remove_member_from_role(role, member))
            }
            ProposalKind::ChangePolicyAddOrUpdateRole {
                role,
                kind,
                permissions,
            } => {
                self.add_or_update_role(role, *kind, permissions);
                ExecutionOutcome::Approved
            }
            ProposalKind::ChangePolicyRemoveRole { role } => self.applied(self.remove_role(role)),
            ProposalKind::ChangePolicyUpdateDefaultVotePolicy { vote_policy } => {
                self.default_vote_policy().set(vote_policy);
                self.policy_changed_event(&ManagedBuffer::new_from_bytes(
                    b"default_vote_policy",
                ));
                ExecutionOutcome::Approved
            }
            ProposalKind::ChangePolicyUpdateParameters { parameters } => {
                self.policy_parameters().set(parameters);
                self.policy_changed_event(&ManagedBuffer::new_from_bytes(b"parameters"));
                ExecutionOutcome::Approved
            }
            ProposalKind::CallBatch { receiver, actions } => {
                self.start_call_batch(id, receiver, actions)
            }
            ProposalKind::UpgradeSelf { hash } => {
                if self.blob_code(hash).is_empty() {
                    return ExecutionOutcome::Failed;
                }
                self.upgrade_self(id, &self.blob_code(hash).get())
            }
            ProposalKind::UpgradeRemote {
                receiver,
                endpoint,
                hash,
            } => {
                if self.blob_code(hash).is_empty() {
                    return ExecutionOutcome::Failed;
                }
                self.upgrade_remote(id, receiver, endpoint, &self.blob_code(hash).get())
            }
            ProposalKind::Transfer {
                token_id,
                receiver,
                amount,
            } => {
                self.register_transfer(id, token_id, receiver, amount, CallbackHandler::Transfer)
            }
            ProposalKind::AddBounty { bounty } => {
                self.create_bounty(bounty);
                ExecutionOutcome::Approved
            }
            ProposalKind::BountyDone {
                bounty_id,
                receiver,
            } => self.pay_bounty(id, *bounty_id, receiver),
            ProposalKind::Vote => ExecutionOutcome::Approved,
        }
    }

    fn applied(&self, changed: bool) -> ExecutionOutcome {
        if changed {
            ExecutionOutcome::Approved
        } else {
            ExecutionOutcome::Failed
        }
    }

    fn has_funds(&self, token_id: &EgldOrEsdtTokenIdentifier, amount: &BigUint) -> bool {
        if token_id.is_egld() {
            *amount <= self.get_available_amount()
        } else {
            *amount <= self.blockchain().get_sc_balance(token_id, 0)
        }
    }

    fn has_gas(&self, needed: u64) -> bool {
        self.blockchain().get_gas_left() >= needed
    }

    /// Fails the transaction unless `needed` gas, plus what finishing the
    /// current transaction takes, is left. `None` is an overflowed sum.
    fn require_gas(&self, needed: Option<u64>) {
        match needed.and_then(|gas| gas.checked_add(EXECUTION_GAS_RESERVE)) {
            Some(needed) => require!(self.has_gas(needed), ERR_NOT_ENOUGH_GAS),
            None => sc_panic!(ERR_NOT_ENOUGH_GAS),
        }
    }

    fn await_callback(&self, proposal_id: u64, handler: CallbackHandler<Self::Api>) {
        self.pending_call(proposal_id).set(PendingCall {
            handler,
            next_action: 0,
        });
    }

    // ── Promises ──

    fn register_transfer(
        &self,
        proposal_id: u64,
        token_id: &EgldOrEsdtTokenIdentifier,
        receiver: &ManagedAddress,
        amount: &BigUint,
        handler: CallbackHandler<Self::Api>,
    ) -> ExecutionOutcome {
        if !self.has_funds(token_id, amount) {
            return ExecutionOutcome::Failed;
        }
        self.require_gas(TRANSFER_GAS.checked_add(CALLBACK_GAS));
        self.await_callback(proposal_id, handler);

        self.tx()
            .to(receiver)
            .raw_call(ManagedBuffer::new())
            .payment(EgldOrEsdtTokenPayment::new(token_id.clone(), 0, amount.clone()))
            .gas(TRANSFER_GAS)
            .callback(self.callbacks().on_proposal_callback(proposal_id))
            .gas_for_callback(CALLBACK_GAS)
            .register_promise();

        ExecutionOutcome::Pending
    }

    // ── Call batches ──

    /// Gas for calls `from..` of a batch, each with its callback.
    fn batch_gas(
        &self,
        actions: &ManagedVec<Self::Api, ActionCall<Self::Api>>,
        from: usize,
    ) -> Option<u64> {
        let mut total = 0u64;
        for index in from..actions.len() {
            total = total
                .checked_add(actions.get(index).gas)?
                .checked_add(CALLBACK_GAS)?;
        }
        Some(total)
    }

    fn start_call_batch(
        &self,
        proposal_id: u64,
        receiver: &ManagedAddress,
        actions: &ManagedVec<Self::Api, ActionCall<Self::Api>>,
    ) -> ExecutionOutcome {
        let mut total_egld = BigUint::zero();
        for action in actions.iter() {
            total_egld += &action.egld_amount;
        }
        if total_egld > self.get_available_amount() {
            return ExecutionOutcome::Failed;
        }
        self.require_gas(self.batch_gas(actions, 0));

        if self.register_batch_call(proposal_id, receiver, actions, 0) {
            ExecutionOutcome::Pending
        } else {
            ExecutionOutcome::Failed
        }
    }

    /// Issues call `index` of a batch. Its callback gets the gas of every
    /// later call, so it can issue the next one. Returns false, issuing
    /// nothing, when gas or funds fall short.
    fn register_batch_call(
        &self,
        proposal_id: u64,
        receiver: &ManagedAddress,
        actions: &ManagedVec<Self::Api, ActionCall<Self::Api>>,
        index: usize,
    ) -> bool {
        let needed = match self.batch_gas(actions, index) {
            Some(needed) => needed,
            None => return false,
        };
        let action = actions.get(index);
        if !self.has_gas(needed)
            || !self.has_funds(&EgldOrEsdtTokenIdentifier::egld(), &action.egld_amount)
        {
            return false;
        }

        self.pending_call(proposal_id).set(PendingCall {
            handler: CallbackHandler::CallBatch,
            next_action: index as u32 + 1,
        });

        self.tx()
            .to(receiver)
            .raw_call(action.endpoint.clone())
            .arguments_raw(ManagedArgBuffer::from(action.args.clone()))
            .egld(action.egld_amount.clone())
            .gas(action.gas)
            .callback(self.callbacks().on_proposal_callback(proposal_id))
            .gas_for_callback(needed.saturating_sub(action.gas))
            .register_promise();
        true
    }

    /// After a successful batch call: `Some(true)` if the next call was
    /// issued, `Some(false)` if it could not be, `None` if nothing is left.
    fn continue_call_batch(
        &self,
        proposal_id: u64,
        kind: &ProposalKind<Self::Api>,
        next_action: u32,
    ) -> Option<bool> {
        let (receiver, actions) = match kind {
            ProposalKind::CallBatch { receiver, actions } => (receiver, actions),
            _ => return None,
        };
        let index = next_action as usize;
        if index >= actions.len() {
            return None;
        }
        Some(self.register_batch_call(proposal_id, receiver, actions, index))
    }

    // ── Upgrades and payouts ──

    /// Redeploys this contract from a stored blob. Only a DAO that owns
    /// itself may do so; otherwise the proposal fails at once.
    fn upgrade_self(&self, proposal_id: u64, code: &ManagedBuffer) -> ExecutionOutcome {
        let sc_address = self.blockchain().get_sc_address();
        if self.blockchain().get_owner_address() != sc_address {
            return ExecutionOutcome::Failed;
        }
        self.require_gas(UPGRADE_GAS.checked_add(CALLBACK_GAS));
        self.await_callback(proposal_id, CallbackHandler::UpgradeSelf);

        self.tx()
            .to(&sc_address)
            .raw_call(UPGRADE_CONTRACT_FUNCTION)
            .argument(code)
            .argument(&CodeMetadata::UPGRADEABLE)
            .gas(UPGRADE_GAS)
            .callback(self.callbacks().on_proposal_callback(proposal_id))
            .gas_for_callback(CALLBACK_GAS)
            .register_promise();

        ExecutionOutcome::Pending
    }

    fn upgrade_remote(
        &self,
        proposal_id: u64,
        receiver: &ManagedAddress,
        endpoint: &ManagedBuffer,
        code: &ManagedBuffer,
    ) -> ExecutionOutcome {
        self.require_gas(UPGRADE_GAS.checked_add(CALLBACK_GAS));
        self.await_callback(proposal_id, CallbackHandler::UpgradeRemote);

        self.tx()
            .to(receiver)
            .raw_call(endpoint.clone())
            .argument(code)
            .gas(UPGRADE_GAS)
            .callback(self.callbacks().on_proposal_callback(proposal_id))
            .gas_for_callback(CALLBACK_GAS)
            .register_promise();

        ExecutionOutcome::Pending
    }

    fn pay_bounty(
        &self,
        proposal_id: u64,
        bounty_id: u64,
        claimer: &ManagedAddress,
    ) -> ExecutionOutcome {
        if self.bounties(bounty_id).is_empty()
            || !self.bounty_claims(bounty_id).contains_key(claimer)
        {
            return ExecutionOutcome::Failed;
        }
        let bounty = self.bounties(bounty_id).get();
        self.register_transfer(
            proposal_id,
            &bounty.token_id,
            claimer,
            &bounty.amount,
            CallbackHandler::BountyPayout {
                bounty_id,
                claimer: claimer.clone(),
            },
        )
    }

    // ========================================================
    // Callback
    // ========================================================

    /// Delivered once per registered promise. A successful batch call
    /// issues the next one; otherwise the proposal is closed, `Approved`
    /// on success and `Failed` on error.
    #[promises_callback]
    fn on_proposal_callback(
        &self,
        proposal_id: u64,
        #[call_result] result: ManagedAsyncCallResult<IgnoreValue>,
    ) {
        if self.proposals(proposal_id).is_empty() || self.pending_call(proposal_id).is_empty() {
            return;
        }
        let mut proposal = self.proposals(proposal_id).get();
        if proposal.status != ProposalStatus::InProgress {
            return;
        }

        let pending = self.pending_call(proposal_id).get();
        self.pending_call(proposal_id).clear();

        let mut success = matches!(result, ManagedAsyncCallResult::Ok(_));
        self.proposal_callback_event(proposal_id, success, pending.next_action.saturating_sub(1));

        if success {
            match self.continue_call_batch(proposal_id, &proposal.kind, pending.next_action) {
                Some(true) => return,
                Some(false) => success = false,
                None => {}
            }
        }

        if let CallbackHandler::BountyPayout { bounty_id, claimer } = &pending.handler {
            let resolution = if success {
                ClaimResolution::Paid
            } else {
                ClaimResolution::Forfeited
            };
            self.resolve_claim(*bounty_id, claimer, resolution);
        }

        let status = if success {
            ProposalStatus::Approved
        } else {
            ProposalStatus::Failed
        };
        self.finalize_proposal(&mut proposal, status);
    }

    #[view(version)]
    fn version(&self) -> ManagedBuffer {
        ManagedBuffer::new_from_bytes(VERSION.as_bytes())
    }
}
