// Result envelopes returned to the caller.
//
// Upstream payloads are untyped JSON; every field we surface goes through
// `Figure`, which passes numbers and strings through untouched and renders
// anything absent as the "N/A" sentinel the clients expect. Price ranges are
// passed through as raw arrays (empty when the provider omits them).

use serde::Serialize;
use serde_json::Value;

/// A payload-derived figure: a number or string exactly as the provider sent
/// it, or the literal string `"N/A"` when absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Number(serde_json::Number),
    Text(String),
    NotAvailable,
}

impl Figure {
    /// Read a figure out of an optional payload field.
    pub fn from_field(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => Figure::Number(n.clone()),
            Some(Value::String(s)) => Figure::Text(s.clone()),
            _ => Figure::NotAvailable,
        }
    }

    /// The numeric value, if this figure is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Figure::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<i64> for Figure {
    fn from(n: i64) -> Self {
        Figure::Number(serde_json::Number::from(n))
    }
}

impl Serialize for Figure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Figure::Number(n) => n.serialize(serializer),
            Figure::Text(s) => serializer.serialize_str(s),
            Figure::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Extract a price range (`[low, high]`) from an optional payload field,
/// defaulting to an empty range.
pub fn range_from_field(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleValuation {
    pub postcode: String,
    pub property_type_used: String,
    pub average: Figure,
    pub range70: Vec<Value>,
    pub range90: Vec<Value>,
    pub points_analysed: u64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RentValuation {
    pub postcode: String,
    pub rental_demand: Figure,
    pub total_for_rent: Figure,
    pub days_on_market: Figure,
    pub months_of_inventory: Figure,
    pub average_rent: Figure,
    pub original_average_rent: Figure,
    #[serde(rename = "yield")]
    pub gross_yield: Figure,
    pub note: Option<String>,
}

/// The envelope handed back to the caller, tagged by purpose. Constructed
/// once per request by the orchestrator and never mutated.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValuationResult {
    Sale(SaleValuation),
    Rent(RentValuation),
}
