use serde::{Deserialize, Serialize};

use bazaar_core::{AccountId, Amount};

use crate::item::ItemId;

/// Command: CreateItem (owner only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    pub caller: AccountId,
    pub uri: String,
    pub price: Amount,
}

/// Command: BuyItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyItem {
    pub caller: AccountId,
    pub item_id: ItemId,
    /// Full amount attached by the buyer.
    pub payment: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketCommand {
    CreateItem(CreateItem),
    BuyItem(BuyItem),
}
