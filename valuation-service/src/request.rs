// Inbound request model and the request validator.
//
// The HTTP shell deserializes the body into `RawValuationRequest` (every
// field optional, so we control the error message per field) and `validate`
// turns it into the typed `ValuationRequest` before any collaborator runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValuationError;

/// The six supported property types (kebab-case on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Detached,
    SemiDetached,
    Terraced,
    Flat,
    Maisonette,
    Bungalow,
}

impl PropertyType {
    /// Wire/query form, also used as the `propertyTypeUsed` result field.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Detached => "detached",
            PropertyType::SemiDetached => "semi-detached",
            PropertyType::Terraced => "terraced",
            PropertyType::Flat => "flat",
            PropertyType::Maisonette => "maisonette",
            PropertyType::Bungalow => "bungalow",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detached" => Ok(PropertyType::Detached),
            "semi-detached" => Ok(PropertyType::SemiDetached),
            "terraced" => Ok(PropertyType::Terraced),
            "flat" => Ok(PropertyType::Flat),
            "maisonette" => Ok(PropertyType::Maisonette),
            "bungalow" => Ok(PropertyType::Bungalow),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Sale,
    Rent,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Purpose::Sale => "sale",
            Purpose::Rent => "rent",
        })
    }
}

impl FromStr for Purpose {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Purpose::Sale),
            "rent" => Ok(Purpose::Rent),
            _ => Err(()),
        }
    }
}

/// Wire shape of `POST /api/valuation` before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawValuationRequest {
    pub postal_code: Option<String>,
    pub property_type: Option<String>,
    pub purpose: Option<String>,
    pub bedrooms: Option<u8>,
    pub floor_area: Option<f64>,
}

/// A validated request, safe to hand to the orchestrator.
///
/// Invariant: `bedrooms` is `Some` and in 1..=4 whenever `purpose` is
/// `Rent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationRequest {
    pub postal_code: String,
    pub property_type: PropertyType,
    pub purpose: Purpose,
    pub bedrooms: Option<u8>,
    pub floor_area: Option<f64>,
}

/// Check required fields and allowed enumerations. Runs before postcode
/// normalization and never calls a collaborator.
pub fn validate(raw: RawValuationRequest) -> Result<ValuationRequest, ValuationError> {
    let postal_code = raw
        .postal_code
        .filter(|pc| !pc.trim().is_empty())
        .ok_or_else(|| ValuationError::invalid("postalCode", "postalCode is required"))?;

    let property_type = raw
        .property_type
        .ok_or_else(|| ValuationError::invalid("propertyType", "propertyType is required"))?;
    let property_type = property_type.parse::<PropertyType>().map_err(|()| {
        ValuationError::invalid(
            "propertyType",
            format!(
                "propertyType `{property_type}` is not one of: detached, semi-detached, \
                 terraced, flat, maisonette, bungalow"
            ),
        )
    })?;

    let purpose = raw
        .purpose
        .ok_or_else(|| ValuationError::invalid("purpose", "purpose is required"))?;
    let purpose = purpose.parse::<Purpose>().map_err(|()| {
        ValuationError::invalid(
            "purpose",
            format!("purpose `{purpose}` must be `sale` or `rent`"),
        )
    })?;

    if let Some(beds) = raw.bedrooms {
        if !(1..=4).contains(&beds) {
            return Err(ValuationError::invalid(
                "bedrooms",
                format!("bedrooms must be between 1 and 4, got {beds}"),
            ));
        }
    }
    if purpose == Purpose::Rent && raw.bedrooms.is_none() {
        return Err(ValuationError::invalid(
            "bedrooms",
            "bedrooms is required for rental valuations",
        ));
    }

    if let Some(area) = raw.floor_area {
        if !area.is_finite() || area <= 0.0 {
            return Err(ValuationError::invalid(
                "floorArea",
                format!("floorArea must be a positive number, got {area}"),
            ));
        }
    }

    Ok(ValuationRequest {
        postal_code,
        property_type,
        purpose,
        bedrooms: raw.bedrooms,
        floor_area: raw.floor_area,
    })
}
