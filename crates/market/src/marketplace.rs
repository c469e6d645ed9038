//! Host-facing marketplace: one deployed registry plus its payment gateway
//! and event log.
//!
//! Every mutating call runs as a single unit:
//!
//! ```text
//! decide (ItemRegistry::handle, no mutation)
//!   ↓
//! transfer (purchases only, through the PaymentGateway)
//!   ↓
//! commit (apply to the registry, append to the log, publish)
//! ```
//!
//! A failure in either of the first two steps returns before anything is
//! committed, so a rejected call leaves registry, log and balances untouched.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use bazaar_core::{AccountId, Aggregate, AggregateId, AggregateRoot, Amount, ExpectedVersion};
use bazaar_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription, execute};

use crate::command::{BuyItem, CreateItem, MarketCommand};
use crate::context::CallContext;
use crate::error::MarketError;
use crate::event::MarketEvent;
use crate::item::{Item, ItemId};
use crate::payment::PaymentGateway;
use crate::registry::ItemRegistry;

/// Aggregate type recorded on every envelope this marketplace emits.
pub const AGGREGATE_TYPE: &str = "market.marketplace";

#[derive(Debug)]
pub struct Marketplace<P> {
    registry: ItemRegistry,
    payments: P,
    log: Vec<EventEnvelope<MarketEvent>>,
    bus: InMemoryEventBus<EventEnvelope<MarketEvent>>,
}

impl<P: PaymentGateway> Marketplace<P> {
    /// Instantiate a marketplace. The caller becomes the owner for the
    /// lifetime of the instance.
    pub fn deploy(ctx: &CallContext, payments: P) -> Self {
        let address = AggregateId::new();
        info!(%address, owner = %ctx.caller, "marketplace deployed");
        Self::with_registry(ItemRegistry::new(address, ctx.caller), payments)
    }

    /// Rebuild a marketplace from a previously recorded event log.
    ///
    /// Envelopes must belong to `address`, be numbered 1, 2, 3, ... and each
    /// event must be one the registry would have emitted at that point.
    /// Payments are not replayed; `payments` is taken as already reflecting them.
    pub fn from_history(
        address: AggregateId,
        owner: AccountId,
        payments: P,
        history: impl IntoIterator<Item = EventEnvelope<MarketEvent>>,
    ) -> Result<Self, MarketError> {
        let mut marketplace = Self::with_registry(ItemRegistry::new(address, owner), payments);

        for envelope in history {
            if envelope.aggregate_id() != address || envelope.aggregate_type() != AGGREGATE_TYPE {
                return Err(MarketError::InvalidHistory(format!(
                    "event {} belongs to {} '{}'",
                    envelope.event_id(),
                    envelope.aggregate_id(),
                    envelope.aggregate_type()
                )));
            }

            ExpectedVersion::Exact(marketplace.registry.version() + 1)
                .check(envelope.sequence_number())
                .map_err(|err| MarketError::InvalidHistory(err.to_string()))?;

            marketplace.registry.replay(envelope.payload())?;
            marketplace.log.push(envelope);
        }

        debug!(
            %address,
            events = marketplace.log.len(),
            items = marketplace.registry.item_count(),
            "marketplace rebuilt from history"
        );
        Ok(marketplace)
    }

    fn with_registry(registry: ItemRegistry, payments: P) -> Self {
        Self {
            registry,
            payments,
            log: Vec::new(),
            bus: InMemoryEventBus::new(),
        }
    }

    /// List a new item. Owner only; returns the assigned id.
    ///
    /// `ctx.value` is not consumed by this call.
    pub fn create_item(
        &mut self,
        ctx: &CallContext,
        uri: impl Into<String>,
        price: Amount,
    ) -> Result<ItemId, MarketError> {
        let command = MarketCommand::CreateItem(CreateItem {
            caller: ctx.caller,
            uri: uri.into(),
            price,
        });
        let item_id = self.registry.next_id();

        let events = execute(&mut self.registry, &command).inspect_err(|err| {
            warn!(caller = %ctx.caller, error = %err, "create_item rejected");
        })?;
        self.record(ctx.timestamp, events);

        info!(%item_id, creator = %ctx.caller, %price, "item created");
        Ok(item_id)
    }

    /// Buy `item_id` with the payment attached to `ctx`.
    ///
    /// The full attached amount goes to the item's creator, including any
    /// amount above the price.
    pub fn buy_item(&mut self, ctx: &CallContext, item_id: ItemId) -> Result<(), MarketError> {
        self.try_buy(ctx, item_id).inspect_err(|err| {
            warn!(%item_id, buyer = %ctx.caller, amount = %ctx.value, error = %err, "buy_item rejected");
        })
    }

    fn try_buy(&mut self, ctx: &CallContext, item_id: ItemId) -> Result<(), MarketError> {
        let command = MarketCommand::BuyItem(BuyItem {
            caller: ctx.caller,
            item_id,
            payment: ctx.value,
        });
        let events = self.registry.handle(&command)?;
        let creator = self.registry.get(item_id)?.creator;

        self.payments
            .transfer(ctx.caller, creator, ctx.value)
            .map_err(MarketError::PaymentTransferFailed)?;

        for event in &events {
            self.registry.apply(event);
        }
        self.record(ctx.timestamp, events);

        info!(%item_id, buyer = %ctx.caller, %creator, amount = %ctx.value, "item sold");
        Ok(())
    }

    /// Append committed events to the log and publish them.
    fn record(&mut self, occurred_at: DateTime<Utc>, events: Vec<MarketEvent>) {
        for event in events {
            let envelope = EventEnvelope::new(
                Uuid::now_v7(),
                *self.registry.id(),
                AGGREGATE_TYPE,
                self.log.len() as u64 + 1,
                occurred_at,
                event,
            );

            // The log is authoritative; a failed publish only affects live observers.
            if let Err(err) = self.bus.publish(envelope.clone()) {
                warn!(error = %err, sequence = envelope.sequence_number(), "event publish failed");
            }
            self.log.push(envelope);
        }
    }
}

impl<P> Marketplace<P> {
    /// Address of this deployed instance.
    pub fn address(&self) -> AggregateId {
        *self.registry.id()
    }

    pub fn owner(&self) -> AccountId {
        self.registry.owner()
    }

    /// A copy of the stored item.
    pub fn get_item(&self, item_id: ItemId) -> Result<Item, MarketError> {
        debug!(%item_id, "get_item");
        self.registry.get(item_id).cloned()
    }

    pub fn get_items_sold(&self) -> u64 {
        self.registry.items_sold()
    }

    /// All items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.registry.items()
    }

    pub fn item_count(&self) -> usize {
        self.registry.item_count()
    }

    pub fn next_id(&self) -> ItemId {
        self.registry.next_id()
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Every committed event, oldest first.
    pub fn events(&self) -> &[EventEnvelope<MarketEvent>] {
        &self.log
    }

    /// Receive events committed from now on.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<MarketEvent>> {
        self.bus.subscribe()
    }

    pub fn payments(&self) -> &P {
        &self.payments
    }

    pub fn payments_mut(&mut self) -> &mut P {
        &mut self.payments
    }
}
