use std::collections::BTreeMap;

use bazaar_core::{AccountId, Aggregate, AggregateId, AggregateRoot, DomainError};
use bazaar_events::Event;

use crate::command::{BuyItem, CreateItem, MarketCommand};
use crate::error::MarketError;
use crate::event::{ItemCreated, MarketEvent};
use crate::item::{Item, ItemId};

/// Aggregate root: the item registry of one deployed marketplace.
///
/// Invariants kept by `apply`:
/// - `items[id].id == id`, and ids are exactly `1..next_id`
/// - `items_sold` equals the number of items with `sold == true`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRegistry {
    id: AggregateId,
    owner: AccountId,
    items: BTreeMap<ItemId, Item>,
    next_id: ItemId,
    items_sold: u64,
    version: u64,
}

impl ItemRegistry {
    /// A fresh registry owned by `owner`: no items, `next_id == 1`, nothing sold.
    pub fn new(id: AggregateId, owner: AccountId) -> Self {
        Self {
            id,
            owner,
            items: BTreeMap::new(),
            next_id: ItemId::FIRST,
            items_sold: 0,
            version: 0,
        }
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// The id the next created item will receive.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn items_sold(&self) -> u64 {
        self.items_sold
    }

    pub fn get(&self, item_id: ItemId) -> Result<&Item, MarketError> {
        self.items
            .get(&item_id)
            .ok_or(MarketError::NotFound(item_id))
    }

    /// All items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Re-decide a recorded event and apply it only if this registry would
    /// have emitted exactly that event itself.
    pub fn replay(&mut self, event: &MarketEvent) -> Result<(), MarketError> {
        let command = match event {
            MarketEvent::ItemCreated(e) => MarketCommand::CreateItem(CreateItem {
                caller: e.creator,
                uri: e.uri.clone(),
                price: e.price,
            }),
            MarketEvent::ItemSold(e) => MarketCommand::BuyItem(BuyItem {
                caller: e.buyer,
                item_id: e.item_id,
                payment: e.amount_paid,
            }),
        };

        let decided = self.handle(&command).map_err(|err| {
            MarketError::InvalidHistory(format!(
                "{} for item {} rejected: {err}",
                event.event_type(),
                event.item_id()
            ))
        })?;

        if decided.as_slice() != core::slice::from_ref(event) {
            return Err(MarketError::InvalidHistory(format!(
                "{} for item {} does not match registry state",
                event.event_type(),
                event.item_id()
            )));
        }

        self.apply(event);
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateItem) -> Result<Vec<MarketEvent>, MarketError> {
        if cmd.caller != self.owner {
            return Err(MarketError::Unauthorized);
        }
        if cmd.uri.is_empty() {
            return Err(MarketError::InvalidUri);
        }
        if self.next_id.next().is_none() {
            return Err(DomainError::invariant("item id space exhausted").into());
        }

        Ok(vec![MarketEvent::ItemCreated(ItemCreated {
            item_id: self.next_id,
            creator: cmd.caller,
            uri: cmd.uri.clone(),
            price: cmd.price,
        })])
    }
}

impl AggregateRoot for ItemRegistry {
    type Id = AggregateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for ItemRegistry {
    type Command = MarketCommand;
    type Event = MarketEvent;
    type Error = MarketError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MarketEvent::ItemCreated(e) => {
                self.items.insert(
                    e.item_id,
                    Item {
                        id: e.item_id,
                        creator: e.creator,
                        uri: e.uri.clone(),
                        price: e.price,
                        sold: false,
                    },
                );
                self.next_id = ItemId(e.item_id.0.saturating_add(1));
            }
            MarketEvent::ItemSold(e) => {
                if let Some(item) = self.items.get_mut(&e.item_id) {
                    if !item.sold {
                        item.sold = true;
                        self.items_sold += 1;
                    }
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            MarketCommand::CreateItem(cmd) => self.handle_create(cmd),
            MarketCommand::BuyItem(cmd) => self.handle_buy(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::Amount;
    use bazaar_events::execute;
    use proptest::prelude::*;

    const URI: &str = "https://example.com/token/1";

    fn one_unit() -> Amount {
        Amount::new(1_000_000_000_000_000_000)
    }

    fn create(caller: AccountId, uri: &str, price: Amount) -> MarketCommand {
        MarketCommand::CreateItem(CreateItem {
            caller,
            uri: uri.to_string(),
            price,
        })
    }

    #[test]
    fn new_registry_starts_empty() {
        let owner = AccountId::new();
        let registry = ItemRegistry::new(AggregateId::new(), owner);

        assert_eq!(registry.owner(), owner);
        assert_eq!(registry.next_id(), ItemId::FIRST);
        assert_eq!(registry.item_count(), 0);
        assert_eq!(registry.items_sold(), 0);
        assert_eq!(registry.version(), 0);
    }

    #[test]
    fn owner_create_emits_item_created_event() {
        let owner = AccountId::new();
        let registry = ItemRegistry::new(AggregateId::new(), owner);

        let events = registry.handle(&create(owner, URI, one_unit())).unwrap();
        assert_eq!(
            events,
            vec![MarketEvent::ItemCreated(ItemCreated {
                item_id: ItemId(1),
                creator: owner,
                uri: URI.to_string(),
                price: one_unit(),
            })]
        );
        assert_eq!(registry.item_count(), 0, "handle must not mutate");
    }

    #[test]
    fn created_item_reads_back_exactly() {
        let owner = AccountId::new();
        let mut registry = ItemRegistry::new(AggregateId::new(), owner);

        execute(&mut registry, &create(owner, URI, one_unit())).unwrap();

        let item = registry.get(ItemId(1)).unwrap();
        assert_eq!(
            item,
            &Item {
                id: ItemId(1),
                creator: owner,
                uri: URI.to_string(),
                price: one_unit(),
                sold: false,
            }
        );
        assert_eq!(registry.next_id(), ItemId(2));
    }

    #[test]
    fn non_owner_create_is_unauthorized() {
        let owner = AccountId::new();
        let mut registry = ItemRegistry::new(AggregateId::new(), owner);
        let before = registry.clone();

        let err = execute(&mut registry, &create(AccountId::new(), URI, one_unit())).unwrap_err();

        assert_eq!(err, MarketError::Unauthorized);
        assert_eq!(registry, before);
    }

    #[test]
    fn empty_uri_is_rejected() {
        let owner = AccountId::new();
        let registry = ItemRegistry::new(AggregateId::new(), owner);

        assert_eq!(
            registry.handle(&create(owner, "", one_unit())).unwrap_err(),
            MarketError::InvalidUri
        );
    }

    #[test]
    fn whitespace_uri_is_stored_verbatim() {
        let owner = AccountId::new();
        let mut registry = ItemRegistry::new(AggregateId::new(), owner);

        for uri in [" ", "   ", "\t\n"] {
            execute(&mut registry, &create(owner, uri, one_unit())).unwrap();
        }

        assert_eq!(registry.get(ItemId(1)).unwrap().uri, " ");
        assert_eq!(registry.get(ItemId(2)).unwrap().uri, "   ");
        assert_eq!(registry.get(ItemId(3)).unwrap().uri, "\t\n");
    }

    #[test]
    fn zero_price_is_allowed() {
        let owner = AccountId::new();
        let mut registry = ItemRegistry::new(AggregateId::new(), owner);

        execute(&mut registry, &create(owner, URI, Amount::ZERO)).unwrap();
        assert_eq!(registry.get(ItemId(1)).unwrap().price, Amount::ZERO);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let owner = AccountId::new();
        let mut registry = ItemRegistry::new(AggregateId::new(), owner);
        execute(&mut registry, &create(owner, URI, one_unit())).unwrap();

        assert_eq!(registry.get(ItemId(0)), Err(MarketError::NotFound(ItemId(0))));
        assert_eq!(registry.get(ItemId(2)), Err(MarketError::NotFound(ItemId(2))));
    }

    #[test]
    fn replay_rebuilds_identical_state() {
        let owner = AccountId::new();
        let registry_id = AggregateId::new();
        let mut original = ItemRegistry::new(registry_id, owner);
        let mut history = Vec::new();
        history.extend(execute(&mut original, &create(owner, URI, one_unit())).unwrap());
        history.extend(
            execute(
                &mut original,
                &MarketCommand::BuyItem(BuyItem {
                    caller: AccountId::new(),
                    item_id: ItemId(1),
                    payment: one_unit(),
                }),
            )
            .unwrap(),
        );

        let mut rebuilt = ItemRegistry::new(registry_id, owner);
        for event in &history {
            rebuilt.replay(event).unwrap();
        }

        assert_eq!(rebuilt, original);
    }

    #[test]
    fn replay_rejects_events_the_registry_would_not_emit() {
        let owner = AccountId::new();
        let mut registry = ItemRegistry::new(AggregateId::new(), owner);

        // Skips id 1.
        let skipped = MarketEvent::ItemCreated(ItemCreated {
            item_id: ItemId(2),
            creator: owner,
            uri: URI.to_string(),
            price: one_unit(),
        });
        assert!(matches!(
            registry.replay(&skipped),
            Err(MarketError::InvalidHistory(_))
        ));

        // Created by someone other than the owner.
        let foreign = MarketEvent::ItemCreated(ItemCreated {
            item_id: ItemId(1),
            creator: AccountId::new(),
            uri: URI.to_string(),
            price: one_unit(),
        });
        assert!(matches!(
            registry.replay(&foreign),
            Err(MarketError::InvalidHistory(_))
        ));
        assert_eq!(registry.version(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: after N owner creations, next_id == N + 1 and every
        /// stored item sits under its own id.
        #[test]
        fn ids_are_dense_and_sequential(prices in prop::collection::vec(any::<u128>(), 0..40)) {
            let owner = AccountId::new();
            let mut registry = ItemRegistry::new(AggregateId::new(), owner);

            for price in &prices {
                execute(&mut registry, &create(owner, URI, Amount::new(*price))).unwrap();
            }

            let n = prices.len() as u64;
            prop_assert_eq!(registry.next_id(), ItemId(n + 1));
            prop_assert_eq!(registry.item_count() as u64, n);
            for (k, price) in (1..=n).zip(&prices) {
                let item = registry.get(ItemId(k)).unwrap();
                prop_assert_eq!(item.id, ItemId(k));
                prop_assert_eq!(item.price, Amount::new(*price));
            }
            prop_assert!(registry.get(ItemId(n + 1)).is_err());
        }
    }
}
