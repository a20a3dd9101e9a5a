pub mod memory;

use crate::decimal::Amount;
use crate::errors::Result;
use crate::types::AccountId;

pub use memory::{InMemoryChain, InMemoryToken};

/// external fungible-token ledger holding the stable token
///
/// Implementations own the balance and allowance invariants; failures come
/// back as [`LedgerError::InsufficientAllowance`] or
/// [`LedgerError::InsufficientBalance`] and are passed to callers untouched.
///
/// [`LedgerError::InsufficientAllowance`]: crate::errors::LedgerError::InsufficientAllowance
/// [`LedgerError::InsufficientBalance`]: crate::errors::LedgerError::InsufficientBalance
pub trait StableToken: Send {
    fn address(&self) -> AccountId;

    fn balance_of(&self, who: AccountId) -> Amount;

    fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount;

    /// move `amount` from `from` to `to`, spending `spender`'s allowance
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()>;

    /// move `amount` out of `from`'s own balance
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()>;
}

/// the host chain: native-currency balances and code introspection
pub trait HostChain: Send {
    fn balance_of(&self, who: AccountId) -> Amount;

    /// send native currency; fails with
    /// [`LedgerError::InsufficientNativeBalance`](crate::errors::LedgerError::InsufficientNativeBalance)
    fn send(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()>;

    /// whether `who` is a contract-bearing identity
    fn is_contract(&self, who: AccountId) -> bool;
}
