//! Fund movement between accounts.
//!
//! The marketplace never holds funds itself: a purchase forwards the attached
//! payment straight to the item's creator through a [`PaymentGateway`].

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use bazaar_core::{AccountId, Amount};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("account {account} holds {available}, needs {required}")]
    InsufficientBalance {
        account: AccountId,
        available: Amount,
        required: Amount,
    },

    #[error("recipient {0} does not accept deposits")]
    Rejected(AccountId),

    #[error("balance overflow for account {0}")]
    Overflow(AccountId),
}

/// Moves funds on behalf of the marketplace.
///
/// A transfer either moves the whole amount or fails without changing any
/// balance.
pub trait PaymentGateway {
    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), PaymentError>;
}

/// In-memory account balances.
///
/// Accounts start at zero. `reject_deposits` marks an account that refuses
/// incoming transfers, like a recipient that cannot accept funds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWallets {
    balances: HashMap<AccountId, Amount>,
    rejecting: HashSet<AccountId>,
}

impl InMemoryWallets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Mint `amount` into `account` (host funding, not a transfer).
    pub fn credit(&mut self, account: AccountId, amount: Amount) -> Result<(), PaymentError> {
        let updated = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(PaymentError::Overflow(account))?;
        self.balances.insert(account, updated);
        Ok(())
    }

    pub fn reject_deposits(&mut self, account: AccountId) {
        self.rejecting.insert(account);
    }

    pub fn accept_deposits(&mut self, account: AccountId) {
        self.rejecting.remove(&account);
    }

    /// Sum of all balances, or `None` if it does not fit in an `Amount`.
    pub fn total_supply(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }
}

impl PaymentGateway for InMemoryWallets {
    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), PaymentError> {
        if self.rejecting.contains(&to) {
            return Err(PaymentError::Rejected(to));
        }

        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(PaymentError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            })?;

        if amount.is_zero() || from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(PaymentError::Overflow(to))?;

        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }
}
