//! Digital-goods marketplace ledger.
//!
//! A single owner lists items (content locator + price); buyers purchase an
//! item once by attaching a payment of at least its price, which is forwarded
//! to the item's creator.
//!
//! - [`ItemRegistry`] is the aggregate: item records, id allocation, sold count.
//!   Creation rules live in `registry`, purchase rules in `purchase`.
//! - [`Marketplace`] is the host-facing facade: it threads the caller context,
//!   moves funds through a [`PaymentGateway`], and keeps the event log.
//!
//! Domain logic here is deterministic; the only side effects are the payment
//! transfer and publication of committed events.

pub mod command;
pub mod context;
pub mod error;
pub mod event;
pub mod item;
pub mod marketplace;
pub mod payment;
mod purchase;
pub mod registry;

pub use command::{BuyItem, CreateItem, MarketCommand};
pub use context::CallContext;
pub use error::MarketError;
pub use event::{ItemCreated, ItemSold, MarketEvent};
pub use item::{Item, ItemId};
pub use marketplace::{AGGREGATE_TYPE, Marketplace};
pub use payment::{InMemoryWallets, PaymentError, PaymentGateway};
pub use registry::ItemRegistry;
