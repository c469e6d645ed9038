use serde::{Deserialize, Serialize};

use bazaar_core::{AccountId, Amount};
use bazaar_events::Event;

use crate::item::ItemId;

/// Event: ItemCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item_id: ItemId,
    pub creator: AccountId,
    pub uri: String,
    pub price: Amount,
}

/// Event: ItemSold.
///
/// `amount_paid` is what the buyer attached, which may exceed the price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSold {
    pub item_id: ItemId,
    pub buyer: AccountId,
    pub amount_paid: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    ItemCreated(ItemCreated),
    ItemSold(ItemSold),
}

impl MarketEvent {
    pub fn item_id(&self) -> ItemId {
        match self {
            MarketEvent::ItemCreated(e) => e.item_id,
            MarketEvent::ItemSold(e) => e.item_id,
        }
    }
}

impl Event for MarketEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::ItemCreated(_) => "market.item.created",
            MarketEvent::ItemSold(_) => "market.item.sold",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}
