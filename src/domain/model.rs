use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub type ProductId = u64;

/// Catalog entry returned by the product lookup. Everything besides `id` is
/// kept as opaque metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub amount: u32,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl LineItem {
    /// Starts a line at one unit. Catalog fields named like the line's own
    /// `id`/`amount` are dropped so the snapshot never carries them twice.
    pub fn from_product(product: Product) -> Self {
        let mut metadata = product.metadata;
        metadata.remove("id");
        metadata.remove("amount");
        Self {
            id: product.id,
            amount: 1,
            metadata,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    pub fn price(&self) -> Option<f64> {
        self.metadata.get("price").and_then(Value::as_f64)
    }
}

/// Ordered line items; order is insertion order.
///
/// Decoding rejects a list with a repeated id or a zero amount, so a restored
/// cart holds the same guarantees as one built through the store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Serialize for Cart {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = String;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(format!("product {} has amount 0", item.id));
            }
            if !seen.insert(item.id) {
                return Err(format!("product {} appears more than once", item.id));
            }
        }
        Ok(Self { items })
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of `price * amount`; items without a numeric price contribute nothing.
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .filter_map(|item| item.price().map(|price| price * f64::from(item.amount)))
            .sum()
    }

    pub(crate) fn with_item(&self, item: LineItem) -> Self {
        let mut items = self.items.clone();
        items.push(item);
        Self { items }
    }

    pub(crate) fn with_amount(&self, product_id: ProductId, amount: u32) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == product_id {
                    LineItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    pub(crate) fn without(&self, product_id: ProductId) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();
        Self { items }
    }

    pub fn to_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_snapshot(snapshot: &str) -> serde_json::Result<Self> {
        serde_json::from_str(snapshot)
    }
}
