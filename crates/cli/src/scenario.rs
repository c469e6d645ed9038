//! Scenario files: a deployer, initial balances and an ordered list of calls.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use bazaar_core::Amount;
use bazaar_market::ItemId;

/// Accounts are referred to by label; each label gets its own identity.
pub type Label = String;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Label of the account that deploys (and therefore owns) the marketplace.
    pub deployer: Label,
    #[serde(default)]
    pub balances: BTreeMap<Label, Amount>,
    /// Accounts that refuse incoming payments.
    #[serde(default)]
    pub reject_deposits: Vec<Label>,
    pub calls: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Call {
    CreateItem {
        caller: Label,
        uri: String,
        price: Amount,
    },
    BuyItem {
        caller: Label,
        item_id: ItemId,
        #[serde(default)]
        value: Amount,
    },
    GetItem {
        item_id: ItemId,
    },
    GetItemsSold,
    Owner,
}

impl Call {
    pub fn op(&self) -> &'static str {
        match self {
            Call::CreateItem { .. } => "create_item",
            Call::BuyItem { .. } => "buy_item",
            Call::GetItem { .. } => "get_item",
            Call::GetItemsSold => "get_items_sold",
            Call::Owner => "owner",
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
