use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::decimal::Amount;
use crate::errors::{LedgerError, Result};
use crate::transfer::{HostChain, StableToken};
use crate::types::AccountId;

#[derive(Debug, Default)]
struct TokenBook {
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    total_supply: Amount,
}

impl TokenBook {
    fn balance(&self, who: AccountId) -> Amount {
        self.balances.get(&who).copied().unwrap_or(Amount::ZERO)
    }

    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        let balance = self.balance(from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                balance,
                requested: amount,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("token balance"))?;

        self.balances.insert(from, remaining);
        self.balances.insert(to, credited);
        Ok(())
    }
}

/// in-memory erc20-style token
///
/// Clones share one book, so a test can keep a handle to mint and approve
/// after the token has been handed to a ledger. An allowance of
/// [`Amount::MAX`] is never decremented.
#[derive(Debug, Clone)]
pub struct InMemoryToken {
    address: AccountId,
    book: Arc<Mutex<TokenBook>>,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self {
            address: AccountId::new(),
            book: Arc::new(Mutex::new(TokenBook::default())),
        }
    }

    pub fn with_address(mut self, address: AccountId) -> Self {
        self.address = address;
        self
    }

    pub fn mint(&self, to: AccountId, amount: Amount) {
        let mut book = self.book();
        let balance = book.balance(to);
        book.balances.insert(to, balance + amount);
        book.total_supply += amount;
    }

    pub fn approve(&self, owner: AccountId, spender: AccountId, amount: Amount) {
        self.book().allowances.insert((owner, spender), amount);
    }

    pub fn total_supply(&self) -> Amount {
        self.book().total_supply
    }

    fn book(&self) -> MutexGuard<'_, TokenBook> {
        self.book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryToken {
    fn default() -> Self {
        Self::new()
    }
}

impl StableToken for InMemoryToken {
    fn address(&self) -> AccountId {
        self.address
    }

    fn balance_of(&self, who: AccountId) -> Amount {
        self.book().balance(who)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.book()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let mut book = self.book();
        let allowance = book
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or(Amount::ZERO);

        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                allowance,
                requested: amount,
            });
        }

        book.move_balance(from, to, amount)?;

        if allowance != Amount::MAX {
            book.allowances.insert((from, spender), allowance - amount);
        }
        Ok(())
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        self.book().move_balance(from, to, amount)
    }
}

#[derive(Debug, Default)]
struct ChainState {
    balances: HashMap<AccountId, Amount>,
    contracts: HashSet<AccountId>,
}

impl ChainState {
    fn balance(&self, who: AccountId) -> Amount {
        self.balances.get(&who).copied().unwrap_or(Amount::ZERO)
    }
}

/// in-memory host chain with native balances and a contract registry
#[derive(Debug, Clone, Default)]
pub struct InMemoryChain {
    state: Arc<Mutex<ChainState>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// mark `who` as contract-bearing
    pub fn deploy_contract(&self, who: AccountId) {
        self.state().contracts.insert(who);
    }

    /// overwrite a native balance
    pub fn set_balance(&self, who: AccountId, amount: Amount) {
        self.state().balances.insert(who, amount);
    }

    /// add to a native balance
    pub fn fund(&self, who: AccountId, amount: Amount) {
        let mut state = self.state();
        let balance = state.balance(who);
        state.balances.insert(who, balance + amount);
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostChain for InMemoryChain {
    fn balance_of(&self, who: AccountId) -> Amount {
        self.state().balance(who)
    }

    fn send(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        let mut state = self.state();
        let balance = state.balance(from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientNativeBalance {
                balance,
                requested: amount,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = state
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("native balance"))?;

        state.balances.insert(from, remaining);
        state.balances.insert(to, credited);
        Ok(())
    }

    fn is_contract(&self, who: AccountId) -> bool {
        self.state().contracts.contains(&who)
    }
}
