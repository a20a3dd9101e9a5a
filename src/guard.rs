use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::types::AccountId;

/// owner authority plus the ledger-wide pause flag
///
/// The owner is `None` once renounced, which permanently disables every
/// owner-only operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    owner: Option<AccountId>,
    paused: bool,
}

impl Guard {
    pub fn new(owner: AccountId) -> Result<Self> {
        if owner.is_null() {
            return Err(LedgerError::NullOwner);
        }
        Ok(Self {
            owner: Some(owner),
            paused: false,
        })
    }

    pub fn owner(&self) -> Option<AccountId> {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// caller must hold the owner capability
    pub fn only_owner(&self, caller: AccountId) -> Result<()> {
        match self.owner {
            Some(owner) if owner == caller => Ok(()),
            _ => Err(LedgerError::NotOwner { caller }),
        }
    }

    /// first check of every mutating protocol operation
    pub fn when_not_paused(&self) -> Result<()> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    pub fn pause(&mut self, caller: AccountId) -> Result<()> {
        self.only_owner(caller)?;
        self.when_not_paused()?;
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: AccountId) -> Result<()> {
        self.only_owner(caller)?;
        if !self.paused {
            return Err(LedgerError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// pause without the not-paused precondition; used by emergency sweeps
    pub(crate) fn force_pause(&mut self) {
        self.paused = true;
    }

    /// hand the capability to `new_owner`; returns the previous owner
    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<Option<AccountId>> {
        self.only_owner(caller)?;
        if new_owner.is_null() {
            return Err(LedgerError::NullOwner);
        }
        Ok(self.owner.replace(new_owner))
    }

    /// drop the capability for good; returns the previous owner
    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<Option<AccountId>> {
        self.only_owner(caller)?;
        Ok(self.owner.take())
    }
}
