// Valuation orchestrator: the per-request decision logic.
//
// Given a validated request, recover the postcode, drive the per-purpose
// fallback sequence over the gateway, and normalize whichever upstream
// payload succeeds into a result envelope. The rent tiers are an explicit
// ordered list evaluated by a small driver loop, so the tiered policy is
// data and each tier is testable on its own. Fallback attempts are logged
// for diagnosis only; logging never affects control flow.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::ValuationError;
use crate::gateway::{Endpoint, MarketData, UpstreamResponse};
use crate::postcode;
use crate::rent;
use crate::request::{Purpose, ValuationRequest};
use crate::result::{range_from_field, Figure, RentValuation, SaleValuation, ValuationResult};

/// One candidate data source in the rent fallback sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FallbackTier {
    endpoint: Endpoint,
    postcode_key: String,
}

pub struct Orchestrator<G> {
    gateway: G,
}

impl<G: MarketData> Orchestrator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Process one request end-to-end: postcode recovery, fallback sequence,
    /// result assembly. Sequential by design; later tiers are only attempted
    /// once an earlier tier is confirmed unusable, since every call costs
    /// real provider quota.
    pub async fn appraise(&self, req: &ValuationRequest) -> Result<ValuationResult, ValuationError> {
        let pc = postcode::resolve(&req.postal_code)?;
        match req.purpose {
            Purpose::Rent => self.rent_valuation(&pc, req).await,
            Purpose::Sale => self.sale_valuation(&pc, req).await,
        }
    }

    // -- Rent path --------------------------------------------------------

    /// The ordered rent fallback sequence for a validated postcode:
    /// outcode-keyed demand stats, then (for 4+ character outcodes) the
    /// parent outcode, then the local market keyed by the full postcode.
    fn rent_tiers(pc: &str) -> Vec<FallbackTier> {
        let outcode = postcode::outcode(pc);
        let mut tiers = vec![FallbackTier {
            endpoint: Endpoint::RentalDemand,
            postcode_key: outcode.to_string(),
        }];
        if outcode.len() > 3 {
            tiers.push(FallbackTier {
                endpoint: Endpoint::RentalDemand,
                postcode_key: outcode[..outcode.len() - 1].to_string(),
            });
        }
        tiers.push(FallbackTier {
            endpoint: Endpoint::LocalRents,
            postcode_key: pc.to_string(),
        });
        tiers
    }

    /// Try each tier in order, returning the first successful payload.
    async fn run_tiers(&self, tiers: &[FallbackTier]) -> Option<Value> {
        for tier in tiers {
            let outcome = self
                .gateway
                .fetch(tier.endpoint, &[("postcode", tier.postcode_key.clone())])
                .await;
            match outcome {
                UpstreamResponse::Success(payload) => {
                    debug!(endpoint = ?tier.endpoint, key = %tier.postcode_key, "tier succeeded");
                    return Some(payload);
                }
                other => {
                    debug!(
                        endpoint = ?tier.endpoint,
                        key = %tier.postcode_key,
                        outcome = ?other,
                        "tier unusable, falling through"
                    );
                }
            }
        }
        None
    }

    async fn rent_valuation(
        &self,
        pc: &str,
        req: &ValuationRequest,
    ) -> Result<ValuationResult, ValuationError> {
        let tiers = Self::rent_tiers(pc);
        let payload = self
            .run_tiers(&tiers)
            .await
            .ok_or(ValuationError::NoRentalData)?;

        // The validator guarantees bedrooms on the rent path; 2 maps to the
        // identity multiplier if that invariant is ever broken.
        let bedrooms = req.bedrooms.unwrap_or(2);

        let base = Figure::from_field(payload.get("average_rent"));
        let (average_rent, original_average_rent, note) = match base.as_f64() {
            Some(base_rent) => {
                let (adjusted, note) = rent::adjust(base_rent, bedrooms);
                (Figure::from(adjusted), base, Some(note))
            }
            None => (Figure::NotAvailable, Figure::NotAvailable, None),
        };

        Ok(ValuationResult::Rent(RentValuation {
            postcode: pc.to_string(),
            rental_demand: Figure::from_field(payload.get("rental_demand_rating")),
            total_for_rent: Figure::from_field(payload.get("total_for_rent")),
            days_on_market: Figure::from_field(payload.get("days_on_market")),
            months_of_inventory: Figure::from_field(payload.get("months_of_inventory")),
            average_rent,
            original_average_rent,
            gross_yield: Figure::from_field(payload.get("gross_yield")),
            note,
        }))
    }

    // -- Sale path --------------------------------------------------------

    async fn sale_valuation(
        &self,
        pc: &str,
        req: &ValuationRequest,
    ) -> Result<ValuationResult, ValuationError> {
        let typed_query = vec![
            ("postcode", pc.to_string()),
            ("type", req.property_type.as_str().to_string()),
            ("max_age", "12".to_string()),
        ];

        match self.gateway.fetch(Endpoint::SoldPrices, &typed_query).await {
            UpstreamResponse::Success(payload) => Ok(Self::assemble_sale(
                pc,
                payload,
                req.property_type.as_str().to_string(),
                None,
            )),
            UpstreamResponse::Error(e) if e.is_type_unsupported() => {
                info!(
                    property_type = %req.property_type,
                    "type unsupported for this area, retrying without the type filter"
                );
                let area_query = vec![
                    ("postcode", pc.to_string()),
                    ("max_age", "12".to_string()),
                ];
                match self.gateway.fetch(Endpoint::SoldPrices, &area_query).await {
                    UpstreamResponse::Success(payload) => {
                        let note = format!(
                            "No sold-price data for {} properties specifically; \
                             showing the all-property average for this area.",
                            req.property_type
                        );
                        Ok(Self::assemble_sale(pc, payload, "all".to_string(), Some(note)))
                    }
                    UpstreamResponse::Error(_) => Err(ValuationError::NoSaleData),
                    UpstreamResponse::Timeout => {
                        Err(ValuationError::Upstream("sold-prices lookup timed out".into()))
                    }
                    UpstreamResponse::NetworkFailure(reason) => {
                        Err(ValuationError::Upstream(reason))
                    }
                }
            }
            UpstreamResponse::Error(_) => Err(ValuationError::NoSaleData),
            UpstreamResponse::Timeout => {
                Err(ValuationError::Upstream("sold-prices lookup timed out".into()))
            }
            UpstreamResponse::NetworkFailure(reason) => Err(ValuationError::Upstream(reason)),
        }
    }

    fn assemble_sale(
        pc: &str,
        payload: Value,
        property_type_used: String,
        note: Option<String>,
    ) -> ValuationResult {
        let data = payload.get("data");
        ValuationResult::Sale(SaleValuation {
            postcode: pc.to_string(),
            property_type_used,
            average: Figure::from_field(data.and_then(|d| d.get("average"))),
            range70: range_from_field(data.and_then(|d| d.get("70pc_range"))),
            range90: range_from_field(data.and_then(|d| d.get("90pc_range"))),
            points_analysed: data
                .and_then(|d| d.get("points_analysed"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
            note,
        })
    }
}
