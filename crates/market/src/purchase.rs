//! Purchase rules: the `Created -> Sold` transition.

use crate::command::BuyItem;
use crate::error::MarketError;
use crate::event::{ItemSold, MarketEvent};
use crate::registry::ItemRegistry;

impl ItemRegistry {
    /// Decide a purchase. Checks run in a fixed order and the first failure wins:
    /// unknown item, then already sold, then short payment.
    pub(crate) fn handle_buy(&self, cmd: &BuyItem) -> Result<Vec<MarketEvent>, MarketError> {
        let item = self.get(cmd.item_id)?;

        if item.sold {
            return Err(MarketError::AlreadySold);
        }

        if cmd.payment < item.price {
            return Err(MarketError::InsufficientFunds {
                price: item.price,
                paid: cmd.payment,
            });
        }

        Ok(vec![MarketEvent::ItemSold(ItemSold {
            item_id: item.id,
            buyer: cmd.caller,
            amount_paid: cmd.payment,
        })])
    }
}
