//! District-cooling (chiller) cost estimation.
//!
//! Pure arithmetic over a fixed tariff table; no network access.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{ChillerComparisonQuery, ChillerQuery};

/// Floor area served by one ton of refrigeration.
pub const SQFT_PER_TR: f64 = 285.7;

/// Rule-of-thumb annual consumption per square foot.
pub const KWH_PER_SQFT_PER_YEAR: f64 = 12.0;

/// Annual cost per square foot above which an estimate is flagged.
pub const HIGH_COST_PER_SQFT: f64 = 15.0;

/// Tariff record for one chiller provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerRate {
    pub id: String,
    pub display_name: String,
    pub consumption_rate_fils_per_kwh: f64,
    pub capacity_charge_aed_per_tr_month: f64,
}

impl ChillerRate {
    fn new(id: &str, display_name: &str, consumption: f64, capacity: f64) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            consumption_rate_fils_per_kwh: consumption,
            capacity_charge_aed_per_tr_month: capacity,
        }
    }

    /// Whether the provider bills a fixed monthly capacity fee regardless of usage.
    pub fn has_fixed_charges(&self) -> bool {
        self.capacity_charge_aed_per_tr_month > 0.0
    }
}

/// Ordered table of provider tariffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: Vec<ChillerRate>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            rates: vec![
                ChillerRate::new("providerA", "Fixed-capacity tariff", 0.58, 85.0),
                ChillerRate::new("providerB", "Consumption-only tariff", 0.52, 0.0),
            ],
        }
    }
}

impl RateTable {
    #[must_use]
    pub fn new(rates: Vec<ChillerRate>) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &[ChillerRate] {
        &self.rates
    }

    /// Find a provider by id. Exact match wins, then ASCII case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProvider`] when nothing matches.
    pub fn lookup(&self, provider: &str) -> Result<&ChillerRate, Error> {
        let key = provider.trim();
        self.rates
            .iter()
            .find(|r| r.id == key)
            .or_else(|| self.rates.iter().find(|r| r.id.eq_ignore_ascii_case(key)))
            .ok_or_else(|| Error::UnknownProvider {
                provider: provider.to_string(),
                supported: self.supported(),
            })
    }

    fn supported(&self) -> String {
        self.rates
            .iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Estimate the annual chiller cost for a property.
    ///
    /// # Errors
    ///
    /// Returns a client error for an unknown provider, a non-positive area,
    /// or a negative consumption override.
    pub fn estimate(&self, query: &ChillerQuery) -> Result<ChillerEstimate, Error> {
        let rate = self.lookup(&query.provider)?;

        let area = query.area_sqft;
        if !area.is_finite() || area <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "area_sqft must be a positive number, got {area}"
            )));
        }

        let annual_kwh = match query.estimated_consumption_kwh {
            Some(kwh) if !kwh.is_finite() || kwh < 0.0 => {
                return Err(Error::InvalidInput(format!(
                    "estimated_consumption_kwh must be zero or positive, got {kwh}"
                )));
            }
            Some(kwh) => kwh,
            None => area * KWH_PER_SQFT_PER_YEAR,
        };

        // Capacity is billed in hundredths of a TR.
        let capacity_tr = round2(area / SQFT_PER_TR);
        let consumption_cost = round2(annual_kwh * rate.consumption_rate_fils_per_kwh / 100.0);
        let capacity_cost = round2(capacity_tr * rate.capacity_charge_aed_per_tr_month * 12.0);
        let total = round2(consumption_cost + capacity_cost);
        let cost_per_sqft = round2(total / area);
        let kwh = round2(annual_kwh);
        let monthly = round2(total / 12.0);

        // Very large inputs overflow to infinity, which JSON cannot carry.
        let figures = [capacity_tr, kwh, consumption_cost, capacity_cost, total, monthly, cost_per_sqft];
        if figures.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "inputs too large to estimate (area_sqft {area}, annual consumption {annual_kwh} kWh)"
            )));
        }

        Ok(ChillerEstimate {
            provider: rate.id.clone(),
            area_sqft: area,
            estimated_capacity_tr: capacity_tr,
            annual_consumption_kwh: kwh,
            annual_consumption_cost_aed: consumption_cost,
            annual_capacity_cost_aed: capacity_cost,
            total_annual_cost_aed: total,
            monthly_cost_aed: monthly,
            cost_per_sqft_per_year: cost_per_sqft,
            has_fixed_charges: rate.has_fixed_charges(),
            warning: CostWarning::for_cost_per_sqft(cost_per_sqft),
        })
    }

    /// Estimate every building and rank them, most expensive per square foot first.
    ///
    /// Ties keep request order. Any invalid building fails the whole comparison.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty building list, or the
    /// first error [`RateTable::estimate`] reports for a building.
    pub fn compare(&self, query: &ChillerComparisonQuery) -> Result<ChillerComparison, Error> {
        if query.buildings.is_empty() {
            return Err(Error::InvalidInput(
                "buildings must name at least one building".to_string(),
            ));
        }

        let mut ranking = query
            .buildings
            .iter()
            .map(|building| {
                let estimate = self.estimate(&ChillerQuery {
                    provider: building.provider.clone(),
                    area_sqft: building.area_sqft,
                    estimated_consumption_kwh: None,
                })?;
                Ok(BuildingEstimate {
                    building_name: building.name.clone(),
                    estimate,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        ranking.sort_by(|a, b| {
            b.estimate
                .cost_per_sqft_per_year
                .total_cmp(&a.estimate.cost_per_sqft_per_year)
        });

        let recommendation = format!(
            "Avoid {} - highest chiller cost",
            ranking[0].building_name
        );
        Ok(ChillerComparison {
            comparison: ranking,
            recommendation,
        })
    }
}

/// Binary cost flag attached to every estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CostWarning {
    High,
    Acceptable,
}

impl CostWarning {
    pub fn for_cost_per_sqft(cost: f64) -> Self {
        if cost > HIGH_COST_PER_SQFT {
            Self::High
        } else {
            Self::Acceptable
        }
    }
}

/// Cost breakdown for one provider and floor area. Money fields are AED, rounded to 2 places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerEstimate {
    pub provider: String,
    pub area_sqft: f64,
    pub estimated_capacity_tr: f64,
    pub annual_consumption_kwh: f64,
    pub annual_consumption_cost_aed: f64,
    pub annual_capacity_cost_aed: f64,
    pub total_annual_cost_aed: f64,
    pub monthly_cost_aed: f64,
    pub cost_per_sqft_per_year: f64,
    pub has_fixed_charges: bool,
    pub warning: CostWarning,
}

/// One ranked entry of a comparison: the estimate tagged with its building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingEstimate {
    pub building_name: String,
    #[serde(flatten)]
    pub estimate: ChillerEstimate,
}

/// Buildings ranked by annual cost per square foot, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerComparison {
    pub comparison: Vec<BuildingEstimate>,
    pub recommendation: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
