use serde::{Deserialize, Serialize};

use bazaar_core::{AccountId, Amount};

/// Item identifier: assigned by the registry starting at 1, never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The id handed to the first item of a fresh registry.
    pub const FIRST: ItemId = ItemId(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id allocated after this one, or `None` once the id space is exhausted.
    pub fn next(self) -> Option<ItemId> {
        self.0.checked_add(1).map(ItemId)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A listed item.
///
/// `creator`, `uri` and `price` never change after creation; `sold` flips
/// from `false` to `true` at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub creator: AccountId,
    /// Opaque content locator.
    pub uri: String,
    pub price: Amount,
    pub sold: bool,
}
