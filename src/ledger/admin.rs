use tracing::{info, warn};

use crate::decimal::Amount;
use crate::errors::Result;
use crate::events::Event;
use crate::ledger::{rejected, LendingLedger};
use crate::types::AccountId;

impl LendingLedger {
    /// owner only; halts every protocol operation
    pub fn pause(&mut self, caller: AccountId) -> Result<()> {
        self.guard
            .pause(caller)
            .map_err(rejected("pause", caller))?;
        self.events.emit(Event::Paused { account: caller });
        info!(owner = %caller, "ledger paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: AccountId) -> Result<()> {
        self.guard
            .unpause(caller)
            .map_err(rejected("unpause", caller))?;
        self.events.emit(Event::Unpaused { account: caller });
        info!(owner = %caller, "ledger unpaused");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        let previous_owner = self
            .guard
            .transfer_ownership(caller, new_owner)
            .map_err(rejected("transfer_ownership", caller))?;
        self.events.emit(Event::OwnershipTransferred {
            previous_owner,
            new_owner: Some(new_owner),
        });
        info!(from = %caller, to = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Give up the owner capability for good. Pause, unpause and the
    /// emergency sweeps become unreachable afterwards.
    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<()> {
        let previous_owner = self
            .guard
            .renounce_ownership(caller)
            .map_err(rejected("renounce_ownership", caller))?;
        self.events.emit(Event::OwnershipTransferred {
            previous_owner,
            new_owner: None,
        });
        warn!(owner = %caller, "ownership renounced");
        Ok(())
    }

    /// Sweep the ledger's whole stable-token balance to `to` and pause.
    ///
    /// Loan and borrowing records are left as they are, so pool bookkeeping no
    /// longer matches custody until funds are returned.
    pub fn emergency_withdraw_erc20(&mut self, caller: AccountId, to: AccountId) -> Result<Amount> {
        self.sweep_stable(caller, to)
            .map_err(rejected("emergency_withdraw_erc20", caller))
    }

    fn sweep_stable(&mut self, caller: AccountId, to: AccountId) -> Result<Amount> {
        self.guard.only_owner(caller)?;

        let amount = self.token.balance_of(self.address);
        self.token.transfer(self.address, to, amount)?;
        self.guard.force_pause();

        self.events.emit(Event::EmergencyWithdrawal {
            asset: "stable".to_string(),
            to,
            amount,
        });
        warn!(owner = %caller, %to, %amount, "emergency stable-token sweep; ledger paused");
        Ok(amount)
    }

    /// Sweep the ledger's whole native balance, collateral included, to `to`
    /// and pause.
    pub fn emergency_withdraw_eth(&mut self, caller: AccountId, to: AccountId) -> Result<Amount> {
        self.sweep_native(caller, to)
            .map_err(rejected("emergency_withdraw_eth", caller))
    }

    fn sweep_native(&mut self, caller: AccountId, to: AccountId) -> Result<Amount> {
        self.guard.only_owner(caller)?;

        let amount = self.chain.balance_of(self.address);
        self.chain.send(self.address, to, amount)?;
        self.guard.force_pause();

        self.events.emit(Event::EmergencyWithdrawal {
            asset: "native".to_string(),
            to,
            amount,
        });
        warn!(owner = %caller, %to, %amount, "emergency native sweep; ledger paused");
        Ok(amount)
    }

    /// Accept a plain native transfer into custody.
    ///
    /// Such funds belong to no borrowing and only leave through
    /// [`emergency_withdraw_eth`](Self::emergency_withdraw_eth).
    pub fn receive_native(&mut self, sender: AccountId, amount: Amount) -> Result<()> {
        self.chain
            .send(sender, self.address, amount)
            .map_err(rejected("receive_native", sender))?;
        self.events.emit(Event::PaymentReceived { sender, amount });
        info!(%sender, %amount, "native payment received");
        Ok(())
    }
}
