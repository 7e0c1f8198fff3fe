use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub sort: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), sort: SortDirection::Asc }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), sort: SortDirection::Desc }
    }

    /// Render as the store's `order` parameter: `category.asc,order_index.asc`
    pub fn to_query(orders: &[OrderBy]) -> Option<String> {
        if orders.is_empty() {
            return None;
        }
        let parts: Vec<String> = orders
            .iter()
            .map(|o| format!("{}.{}", o.column, o.sort.as_str()))
            .collect();
        Some(parts.join(","))
    }
}

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqFilter {
    pub column: String,
    pub value: String,
}

impl EqFilter {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self { column: column.into(), value: value.into() }
    }

    /// Query pair in the store's row-filter syntax: `user_id=eq.<value>`
    pub fn to_query_pair(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }

    pub fn matches(&self, value: Option<&serde_json::Value>) -> bool {
        match value {
            Some(serde_json::Value::String(s)) => *s == self.value,
            Some(serde_json::Value::Null) | None => false,
            Some(other) => other.to_string() == self.value,
        }
    }
}

/// Ordering, filtering and limit for a collection read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub order: Vec<OrderBy>,
    pub filters: Vec<EqFilter>,
    pub limit: Option<u32>,
}

impl RecordQuery {
    pub fn ordered(order: Vec<OrderBy>) -> Self {
        Self { order, ..Default::default() }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(EqFilter::new(column, value));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
