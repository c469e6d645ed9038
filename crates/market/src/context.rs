//! Caller context supplied by the hosting runtime.

use chrono::{DateTime, Utc};

use bazaar_core::{AccountId, Amount};

/// Everything the host attaches to a call: who is calling, how much they
/// attached, and the business time of the call.
///
/// The host authenticates `caller`; the marketplace trusts it as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    /// Payment attached to the call (only consumed by purchases).
    pub value: Amount,
    pub timestamp: DateTime<Utc>,
}

impl CallContext {
    /// A call from `caller` with nothing attached, stamped with the current time.
    pub fn new(caller: AccountId) -> Self {
        Self {
            caller,
            value: Amount::ZERO,
            timestamp: Utc::now(),
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
