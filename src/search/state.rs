//! The structured filter+pagination state embedded in a search URL
//!
//! The upstream search page carries its query as a JSON `searchQueryState`
//! URL parameter. `SearchState` wraps that JSON object and exposes typed
//! mutators for the fields the crawler drives (price, monthly payment, beds,
//! page). Every key it does not understand is carried through unchanged, so
//! re-encoding a decoded state always yields a query the upstream accepts.

use serde_json::{json, Map, Value};

/// A decoded search-query state
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    query: Map<String, Value>,
}

impl SearchState {
    /// Builds the "for sale, active" state from a raw decoded query state.
    ///
    /// Applies the one-time normalization (legacy key cleanup, pagination
    /// reset) and excludes multi-family, condo, land, apartment, manufactured,
    /// and apartment/condo categories.
    pub fn for_sale(raw: Value) -> Option<Self> {
        let mut query = object_query(raw)?;
        normalize(&mut query);
        query.insert("ah".to_string(), json!({ "value": true }));
        {
            let filters = filter_state_mut(&mut query);
            for key in ["mf", "con", "land", "apa", "manu", "apco"] {
                filters.insert(key.to_string(), json!({ "value": false }));
            }
        }
        Some(Self { query })
    }

    /// Builds the "recently sold" state from a raw decoded query state.
    ///
    /// Applies the same normalization, adds the sold-within-24-months window,
    /// and excludes the for-sale listing categories (by agent, by owner, new
    /// construction, coming soon, auction, foreclosure).
    pub fn recently_sold(raw: Value) -> Option<Self> {
        let mut query = object_query(raw)?;
        normalize(&mut query);
        {
            let filters = filter_state_mut(&mut query);
            for key in [
                "mf", "con", "land", "apa", "manu", "fsba", "fsbo", "nc", "cmsn", "auc", "fore",
            ] {
                filters.insert(key.to_string(), json!({ "value": false }));
            }
            filters.insert("rs".to_string(), json!({ "value": true }));
            filters.insert("doz".to_string(), json!({ "value": "24m" }));
        }
        Some(Self { query })
    }

    /// Wraps an already-normalized query state (e.g. parsed back from a URL)
    pub fn from_value(value: Value) -> Option<Self> {
        Some(Self {
            query: object_query(value)?,
        })
    }

    /// The underlying JSON object, for encoding into a URL
    pub fn to_value(&self) -> Value {
        Value::Object(self.query.clone())
    }

    /// Serializes the state to the JSON form the upstream expects
    pub fn to_json(&self) -> String {
        Value::Object(self.query.clone()).to_string()
    }

    /// Sets the price filter and resets the monthly-payment filter to match
    pub fn set_price(&mut self, min: u64, max: Option<u64>) {
        let filters = filter_state_mut(&mut self.query);
        filters.insert("price".to_string(), range_value(min, max));
        filters.insert("mp".to_string(), range_value(0, None));
    }

    /// Sets the bedroom-count filter
    pub fn set_beds(&mut self, min: u32, max: Option<u32>) {
        let filters = filter_state_mut(&mut self.query);
        filters.insert("beds".to_string(), range_value(min as u64, max.map(u64::from)));
    }

    /// Sets the pagination cursor
    pub fn set_page(&mut self, page: u32) {
        self.query
            .insert("pagination".to_string(), json!({ "currentPage": page }));
    }

    /// The current pagination cursor, if one is set
    pub fn page(&self) -> Option<u32> {
        self.query
            .get("pagination")?
            .get("currentPage")?
            .as_u64()
            .map(|p| p as u32)
    }

    /// The current price filter as (min, max)
    pub fn price(&self) -> Option<(u64, Option<u64>)> {
        range_of(self.filter("price")?)
    }

    /// The current bedroom filter as (min, max)
    pub fn beds(&self) -> Option<(u32, Option<u32>)> {
        let (min, max) = range_of(self.filter("beds")?)?;
        Some((min as u32, max.map(|m| m as u32)))
    }

    /// The current sort selection, if any
    pub fn sort(&self) -> Option<&Value> {
        self.filter("sort")
    }

    fn filter(&self, key: &str) -> Option<&Value> {
        self.query.get("filterState")?.get(key)
    }
}

/// One-time decode normalization shared by both presets: fix the list view,
/// reset pagination, drop the obsolete `isAllHomes` flag, and rename the
/// legacy `sortSelection` key to `sort`.
fn normalize(query: &mut Map<String, Value>) {
    query.insert("isListVisible".to_string(), json!(true));
    query.insert("mapZoom".to_string(), json!(15));
    query.insert("pagination".to_string(), json!({}));

    let filters = filter_state_mut(query);
    filters.remove("isAllHomes");
    if let Some(sort) = filters.remove("sortSelection") {
        filters.insert("sort".to_string(), sort);
    }
}

/// Checks that the query is an object and that `filterState`, when present,
/// is one too. Upstream pages occasionally carry `filterState: null`; such a
/// state is rejected here so every constructor returns `None` instead of a
/// later mutator failing on it.
fn object_query(raw: Value) -> Option<Map<String, Value>> {
    let query = raw.as_object()?.clone();
    match query.get("filterState") {
        Some(filters) if !filters.is_object() => None,
        _ => Some(query),
    }
}

fn filter_state_mut(query: &mut Map<String, Value>) -> &mut Map<String, Value> {
    // Non-object filterState values are rejected by every constructor
    query
        .entry("filterState")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .expect("filterState checked at construction")
}

fn range_value(min: u64, max: Option<u64>) -> Value {
    match max {
        Some(max) => json!({ "min": min, "max": max }),
        None => json!({ "min": min }),
    }
}

fn range_of(value: &Value) -> Option<(u64, Option<u64>)> {
    let min = value.get("min")?.as_u64()?;
    let max = value.get("max").and_then(Value::as_u64);
    Some((min, max))
}
