multiversx_sc::imports!();

use crate::errors::{ERR_ALREADY_EXISTS, ERR_INVALID_CALLER, ERR_NOT_ENOUGH_DEPOSIT, ERR_NO_BLOB};
use crate::types::BlobInfo;

/// Charge per stored byte, in the smallest EGLD denomination.
pub const STORAGE_BYTE_COST: u64 = 10_000_000_000_000;

/// Size of the key a blob is stored under.
pub const BLOB_KEY_LEN: u64 = 32;

// ============================================================
// Content-addressed code storage
// ============================================================

#[multiversx_sc::module]
pub trait BlobModule: crate::storage::StorageModule + crate::events::EventsModule {
    /// Deposit required to store `len` bytes.
    #[view(storageCost)]
    fn storage_cost(&self, len: u64) -> BigUint {
        BigUint::from(len.saturating_add(BLOB_KEY_LEN)) * BigUint::from(STORAGE_BYTE_COST)
    }

    /// Stores `code` under its sha256 and returns the hash. The storage cost
    /// stays locked until the blob is removed; any surplus goes back.
    #[payable("EGLD")]
    #[endpoint(storeBlob)]
    fn store_blob(&self, code: ManagedBuffer) -> ManagedBuffer {
        self.require_initialized();

        let hash = self.crypto().sha256(&code).as_managed_buffer().clone();
        require!(self.blob_info(&hash).is_empty(), ERR_ALREADY_EXISTS);

        let payment = self.call_value().egld_value().clone_value();
        let cost = self.storage_cost(code.len() as u64);
        require!(payment >= cost, ERR_NOT_ENOUGH_DEPOSIT);

        let storer = self.blockchain().get_caller();
        self.blob_code(&hash).set(&code);
        self.blob_info(&hash).set(BlobInfo {
            storer: storer.clone(),
            deposit: cost.clone(),
        });
        self.escrow(&cost);

        let surplus = payment - &cost;
        if surplus > 0u64 {
            self.send().direct_egld(&storer, &surplus);
        }

        self.blob_stored_event(&hash, &storer, &cost);
        hash
    }

    /// Deletes a blob and refunds its storer the deposit charged for it.
    #[endpoint(removeBlob)]
    fn remove_blob(&self, hash: ManagedBuffer) -> BigUint {
        require!(!self.blob_info(&hash).is_empty(), ERR_NO_BLOB);
        let info = self.blob_info(&hash).get();

        let caller = self.blockchain().get_caller();
        require!(caller == info.storer, ERR_INVALID_CALLER);

        self.blob_code(&hash).clear();
        self.blob_info(&hash).clear();
        self.release_locked(&info.deposit);
        if info.deposit > 0u64 {
            self.send().direct_egld(&caller, &info.deposit);
        }

        self.blob_removed_event(&hash, &caller, &info.deposit);
        info.deposit
    }

    #[view(hasBlob)]
    fn has_blob(&self, hash: ManagedBuffer) -> bool {
        !self.blob_info(&hash).is_empty()
    }
}
