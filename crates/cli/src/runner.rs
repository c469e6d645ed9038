//! Replays a scenario against a freshly deployed marketplace.
//!
//! Each call behaves like one host transaction: a rejected call is reported
//! and the run moves on to the next one.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use bazaar_core::{AccountId, Amount};
use bazaar_events::EventEnvelope;
use bazaar_market::{
    CallContext, InMemoryWallets, Item, ItemId, MarketError, MarketEvent, Marketplace,
};

use crate::scenario::{Call, Label, Scenario};

/// Label → identity, allocated on first use.
#[derive(Debug, Default)]
pub struct Accounts {
    ids: BTreeMap<Label, AccountId>,
}

impl Accounts {
    pub fn resolve(&mut self, label: &str) -> AccountId {
        *self.ids.entry(label.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &AccountId)> {
        self.ids.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    Created { item_id: ItemId },
    Purchased { item_id: ItemId },
    Item(Item),
    ItemsSold(u64),
    Owner(AccountId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallReport {
    pub index: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<CallResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub account: Label,
    pub id: AccountId,
    pub balance: Amount,
}

#[derive(Debug)]
pub struct RunReport {
    pub calls: Vec<CallReport>,
    pub events: Vec<EventEnvelope<MarketEvent>>,
    pub balances: Vec<BalanceReport>,
}

pub fn run(scenario: &Scenario) -> anyhow::Result<RunReport> {
    let mut accounts = Accounts::default();
    let owner = accounts.resolve(&scenario.deployer);

    let mut wallets = InMemoryWallets::new();
    for (label, amount) in &scenario.balances {
        let id = accounts.resolve(label);
        wallets
            .credit(id, *amount)
            .with_context(|| format!("funding account '{label}'"))?;
    }
    for label in &scenario.reject_deposits {
        wallets.reject_deposits(accounts.resolve(label));
    }

    let mut market = Marketplace::deploy(&CallContext::new(owner), wallets);

    let mut calls = Vec::with_capacity(scenario.calls.len());
    for (index, call) in scenario.calls.iter().enumerate() {
        let outcome = dispatch(&mut market, &mut accounts, call);
        calls.push(CallReport {
            index,
            op: call.op(),
            error: outcome.as_ref().err().map(ToString::to_string),
            ok: outcome.ok(),
        });
    }

    let balances = accounts
        .iter()
        .map(|(label, id)| BalanceReport {
            account: label.clone(),
            id: *id,
            balance: market.payments().balance_of(*id),
        })
        .collect();

    info!(
        calls = calls.len(),
        events = market.events().len(),
        items_sold = market.get_items_sold(),
        "scenario finished"
    );

    Ok(RunReport {
        calls,
        events: market.events().to_vec(),
        balances,
    })
}

fn dispatch(
    market: &mut Marketplace<InMemoryWallets>,
    accounts: &mut Accounts,
    call: &Call,
) -> Result<CallResult, MarketError> {
    match call {
        Call::CreateItem { caller, uri, price } => {
            let ctx = CallContext::new(accounts.resolve(caller));
            let item_id = market.create_item(&ctx, uri.as_str(), *price)?;
            Ok(CallResult::Created { item_id })
        }
        Call::BuyItem {
            caller,
            item_id,
            value,
        } => {
            let ctx = CallContext::new(accounts.resolve(caller)).with_value(*value);
            market.buy_item(&ctx, *item_id)?;
            Ok(CallResult::Purchased { item_id: *item_id })
        }
        Call::GetItem { item_id } => market.get_item(*item_id).map(CallResult::Item),
        Call::GetItemsSold => Ok(CallResult::ItemsSold(market.get_items_sold())),
        Call::Owner => Ok(CallResult::Owner(market.owner())),
    }
}
