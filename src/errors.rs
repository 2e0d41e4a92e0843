// Error tags are part of the public contract; keep them byte-for-byte stable.

pub const ERR_CONTRACT_IS_NOT_INITIALIZED: &str = "ERR_CONTRACT_IS_NOT_INITIALIZED";
pub const ERR_CONTRACT_IS_INITIALIZED: &str = "ERR_CONTRACT_IS_INITIALIZED";
pub const ERR_NOT_ENOUGH_DEPOSIT: &str = "ERR_NOT_ENOUGH_DEPOSIT";
pub const ERR_NOT_ENOUGH_GAS: &str = "ERR_NOT_ENOUGH_GAS";

pub const ERR_ALREADY_EXISTS: &str = "ERR_ALREADY_EXISTS";
pub const ERR_NO_BLOB: &str = "ERR_NO_BLOB";
pub const ERR_INVALID_CALLER: &str = "ERR_INVALID_CALLER";

pub const ERR_NO_PROPOSAL: &str = "ERR_NO_PROPOSAL";
pub const ERR_INVALID_PROPOSAL: &str = "ERR_INVALID_PROPOSAL";
pub const ERR_PROPOSAL_NOT_READY_FOR_VOTE: &str = "ERR_PROPOSAL_NOT_READY_FOR_VOTE";
pub const ERR_PROPOSAL_EXPIRED: &str = "ERR_PROPOSAL_EXPIRED";
pub const ERR_PROPOSAL_NOT_EXPIRED: &str = "ERR_PROPOSAL_NOT_EXPIRED";
pub const ERR_PERMISSION_DENIED: &str = "ERR_PERMISSION_DENIED";
pub const ERR_ALREADY_VOTED: &str = "ERR_ALREADY_VOTED";

pub const ERR_ROLE_NOT_FOUND: &str = "ERR_ROLE_NOT_FOUND";
pub const ERR_INVALID_VOTE_POLICY: &str = "ERR_INVALID_VOTE_POLICY";

pub const ERR_NO_BOUNTY: &str = "ERR_NO_BOUNTY";
pub const ERR_BOUNTY_WRONG_BOND: &str = "ERR_BOUNTY_WRONG_BOND";
pub const ERR_BOUNTY_WRONG_DEADLINE: &str = "ERR_BOUNTY_WRONG_DEADLINE";
pub const ERR_BOUNTY_ALL_CLAIMED: &str = "ERR_BOUNTY_ALL_CLAIMED";
pub const ERR_BOUNTY_ALREADY_CLAIMED: &str = "ERR_BOUNTY_ALREADY_CLAIMED";
pub const ERR_NO_BOUNTY_CLAIM: &str = "ERR_NO_BOUNTY_CLAIM";
pub const ERR_BOUNTY_CLAIM_COMPLETED: &str = "ERR_BOUNTY_CLAIM_COMPLETED";
pub const ERR_BOUNTY_DONE_MUST_BE_SELF: &str = "ERR_BOUNTY_DONE_MUST_BE_SELF";
