use thiserror::Error;

use bazaar_core::{Amount, DomainError};

use crate::item::ItemId;
use crate::payment::PaymentError;

/// Rejection of a single marketplace call.
///
/// Every variant means the call had no effect: registry, event log and
/// balances are exactly as they were before it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Someone other than the owner tried to create an item.
    #[error("unauthorized: only the owner can create items")]
    Unauthorized,

    /// No item was ever assigned this id.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// The item has already been bought once.
    #[error("Item already sold")]
    AlreadySold,

    /// The attached payment is below the listed price.
    #[error("Insufficient funds")]
    InsufficientFunds { price: Amount, paid: Amount },

    /// Moving the payment to the creator failed; the purchase was not recorded.
    #[error("payment transfer failed: {0}")]
    PaymentTransferFailed(#[source] PaymentError),

    /// The item uri was the empty string.
    #[error("item uri cannot be empty")]
    InvalidUri,

    /// A recorded event log could not be replayed.
    #[error("invalid event history: {0}")]
    InvalidHistory(String),

    /// A core primitive failed, e.g. the item id counter is exhausted.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::AccountId;

    #[test]
    fn rejection_messages() {
        let account = AccountId::new();
        let cases = [
            (MarketError::Unauthorized, "unauthorized: only the owner can create items".to_string()),
            (MarketError::NotFound(ItemId(7)), "item 7 not found".to_string()),
            (MarketError::AlreadySold, "Item already sold".to_string()),
            (
                MarketError::InsufficientFunds {
                    price: Amount::new(10),
                    paid: Amount::new(9),
                },
                "Insufficient funds".to_string(),
            ),
            (
                MarketError::PaymentTransferFailed(PaymentError::Rejected(account)),
                format!("payment transfer failed: {}", PaymentError::Rejected(account)),
            ),
            (MarketError::InvalidUri, "item uri cannot be empty".to_string()),
            (
                MarketError::InvalidHistory("gap".to_string()),
                "invalid event history: gap".to_string(),
            ),
            (
                DomainError::invariant("item id space exhausted").into(),
                "invariant violated: item id space exhausted".to_string(),
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
