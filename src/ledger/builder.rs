use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, Result};
use crate::events::EventStore;
use crate::guard::Guard;
use crate::ledger::LendingLedger;
use crate::oracle::{PriceOracle, PriceRouter};
use crate::transfer::{HostChain, StableToken};
use crate::types::{AccountId, FIRST_LOAN_ID};

/// builder for lending ledgers
pub struct LedgerBuilder {
    owner: Option<AccountId>,
    address: Option<AccountId>,
    config: Option<LedgerConfig>,
    token: Option<Box<dyn StableToken>>,
    router: Option<Box<dyn PriceRouter>>,
    chain: Option<Box<dyn HostChain>>,
}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self {
            owner: None,
            address: None,
            config: None,
            token: None,
            router: None,
            chain: None,
        }
    }

    /// initial holder of the owner capability
    pub fn owner(mut self, owner: AccountId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// custody identity; a fresh one is generated if not set
    pub fn address(mut self, address: AccountId) -> Self {
        self.address = Some(address);
        self
    }

    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn stable_token(mut self, token: impl StableToken + 'static) -> Self {
        self.token = Some(Box::new(token));
        self
    }

    pub fn price_router(mut self, router: impl PriceRouter + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    pub fn host_chain(mut self, chain: impl HostChain + 'static) -> Self {
        self.chain = Some(Box::new(chain));
        self
    }

    /// Validate the configuration and collaborators, then open an empty ledger.
    ///
    /// Both the stable token and the router must be non-null identities that
    /// carry contract code on the host chain.
    pub fn build(self) -> Result<LendingLedger> {
        let owner = self.owner.ok_or(LedgerError::InvalidConfiguration {
            message: "Owner required".to_string(),
        })?;

        let token = self.token.ok_or(LedgerError::InvalidConfiguration {
            message: "Stable token required".to_string(),
        })?;

        let router = self.router.ok_or(LedgerError::InvalidConfiguration {
            message: "Price router required".to_string(),
        })?;

        let chain = self.chain.ok_or(LedgerError::InvalidConfiguration {
            message: "Host chain required".to_string(),
        })?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let token_address = token.address();
        let router_address = router.address();
        if token_address.is_null() || router_address.is_null() {
            return Err(LedgerError::NullCollaborator);
        }
        for address in [token_address, router_address] {
            if !chain.is_contract(address) {
                return Err(LedgerError::CollaboratorNotContract { address });
            }
        }

        let guard = Guard::new(owner)?;
        let address = self
            .address
            .filter(|address| !address.is_null())
            .unwrap_or_else(AccountId::new);

        info!(
            ledger = %address,
            %owner,
            stablecoin = %token_address,
            router = %router_address,
            borrower_rate = %config.borrower_rate,
            "lending ledger opened"
        );

        Ok(LendingLedger {
            address,
            config,
            guard,
            oracle: PriceOracle::new(router, token_address),
            token,
            chain,
            loans: BTreeMap::new(),
            lenders: HashMap::new(),
            borrowings: HashMap::new(),
            next_loan_id: FIRST_LOAN_ID,
            events: EventStore::new(),
        })
    }
}

impl Default for LedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
