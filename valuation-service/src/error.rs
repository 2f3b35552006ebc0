// Error taxonomy for the valuation pipeline.
//
// Every terminal failure a request can hit maps to exactly one variant here,
// and the HTTP shell maps each variant to one status code. Gateway-level
// timeouts and transport errors are classified at the orchestrator boundary;
// they never leak past it as raw reqwest errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValuationError {
    /// A required field is missing or outside its allowed enumeration.
    /// Rejected before any collaborator runs.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The postcode survived neither normalization nor auto-formatting.
    #[error("`{0}` is not a recognisable UK postcode")]
    PostcodeFormat(String),

    /// Every rental fallback tier was exhausted without a usable payload.
    #[error("no rental data available for this postcode")]
    NoRentalData,

    /// The sold-prices lookup (and its area-wide fallback, if attempted)
    /// returned no usable data for this type/area.
    #[error("no sale data available for this property type and area")]
    NoSaleData,

    /// The provider could not be reached, or timed out, mid-orchestration.
    #[error("market data provider unavailable: {0}")]
    Upstream(String),
}

impl ValuationError {
    /// Convenience constructor for field-level validation failures.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ValuationError::Validation {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_its_message() {
        let err = ValuationError::invalid("purpose", "purpose must be `sale` or `rent`");
        assert_eq!(err.to_string(), "purpose must be `sale` or `rent`");
    }

    #[test]
    fn postcode_error_quotes_the_input() {
        let err = ValuationError::PostcodeFormat("XYZ".into());
        assert_eq!(err.to_string(), "`XYZ` is not a recognisable UK postcode");
    }
}
