use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::types::{Gigawatts, MoneyPerGw, Rate};
use crate::ModelResult;

// ---------------------------------------------------------------------------
// Assumptions record
// ---------------------------------------------------------------------------

/// Economic assumptions for a single data-center build-out.
///
/// Money amounts are in $ billions. Per-GW running costs and revenue are
/// annual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Installed IT capacity (GW)
    pub capacity_gw: Gigawatts,
    /// Total capital cost per GW of capacity
    pub capital_cost_per_gw: MoneyPerGw,
    /// Share of capex spent on short-lived equipment (GPUs, network gear).
    /// The remainder is buildings and long-lived infrastructure.
    pub short_lived_fraction: Rate,
    /// Annual revenue per GW at full utilization
    pub revenue_per_gw: MoneyPerGw,
    /// Fraction of capacity sold (0-1)
    pub utilization: Rate,
    /// Electricity price ($ per kWh)
    pub power_price_per_kwh: Decimal,
    /// Power Usage Effectiveness (total facility power / IT power)
    pub pue: Decimal,
    /// Facility power floor drawn regardless of load, as a fraction of capacity
    pub baseline_power_fraction: Rate,
    /// Power drawn by idle capacity, as a fraction of its full-load draw
    pub idle_power_factor: Rate,
    /// Selling, general & administrative expense as a fraction of revenue
    pub sga_fraction: Rate,
    /// Annual infrastructure maintenance per GW
    pub maintenance_per_gw: MoneyPerGw,
    /// Annual staffing cost per GW
    pub staffing_per_gw: MoneyPerGw,
    /// Annual network cost per GW
    pub network_per_gw: MoneyPerGw,
    /// Annual software and compliance cost per GW
    pub software_compliance_per_gw: MoneyPerGw,
    /// Annual property tax as a fraction of capital value
    pub property_tax_rate: Rate,
    /// Straight-line life of the short-lived pool
    pub short_lived_life_years: u32,
    /// Straight-line life of the long-lived pool
    pub long_lived_life_years: u32,
    /// Corporate income tax rate
    pub tax_rate: Rate,
    /// Number of years in the cash-flow projection
    pub horizon_years: u32,
}

impl Default for Assumptions {
    /// The reference 1 GW scenario.
    fn default() -> Self {
        Assumptions {
            capacity_gw: dec!(1.0),
            capital_cost_per_gw: dec!(30.0),
            short_lived_fraction: dec!(0.7),
            revenue_per_gw: dec!(12.0),
            utilization: dec!(0.7),
            power_price_per_kwh: dec!(0.05),
            pue: dec!(1.2),
            baseline_power_fraction: dec!(0.2),
            idle_power_factor: dec!(0.4),
            sga_fraction: dec!(0.10),
            maintenance_per_gw: dec!(0.1),
            staffing_per_gw: dec!(0.05),
            network_per_gw: dec!(0.05),
            software_compliance_per_gw: dec!(0.03),
            property_tax_rate: dec!(0.007),
            short_lived_life_years: 5,
            long_lived_life_years: 10,
            tax_rate: dec!(0.15),
            horizon_years: 10,
        }
    }
}

impl Assumptions {
    /// Total upfront capital outlay.
    pub fn total_investment(&self) -> Decimal {
        self.capital_cost_per_gw * self.capacity_gw
    }

    /// Every field as a (name, value) pair, in `INPUT_RANGES` order.
    pub fn fields(&self) -> [(&'static str, Decimal); 19] {
        [
            ("capacity_gw", self.capacity_gw),
            ("capital_cost_per_gw", self.capital_cost_per_gw),
            ("short_lived_fraction", self.short_lived_fraction),
            ("revenue_per_gw", self.revenue_per_gw),
            ("utilization", self.utilization),
            ("power_price_per_kwh", self.power_price_per_kwh),
            ("pue", self.pue),
            ("baseline_power_fraction", self.baseline_power_fraction),
            ("idle_power_factor", self.idle_power_factor),
            ("sga_fraction", self.sga_fraction),
            ("maintenance_per_gw", self.maintenance_per_gw),
            ("staffing_per_gw", self.staffing_per_gw),
            ("network_per_gw", self.network_per_gw),
            ("software_compliance_per_gw", self.software_compliance_per_gw),
            ("property_tax_rate", self.property_tax_rate),
            ("short_lived_life_years", Decimal::from(self.short_lived_life_years)),
            ("long_lived_life_years", Decimal::from(self.long_lived_life_years)),
            ("tax_rate", self.tax_rate),
            ("horizon_years", Decimal::from(self.horizon_years)),
        ]
    }
}

// ---------------------------------------------------------------------------
// Documented input ranges
// ---------------------------------------------------------------------------

/// Inclusive range a caller must keep an assumption within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputRange {
    pub field: &'static str,
    pub label: &'static str,
    pub min: Decimal,
    pub max: Decimal,
}

impl InputRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

const fn range(field: &'static str, label: &'static str, min: Decimal, max: Decimal) -> InputRange {
    InputRange {
        field,
        label,
        min,
        max,
    }
}

pub static INPUT_RANGES: [InputRange; 19] = [
    range("capacity_gw", "Capacity (GW)", dec!(0.1), dec!(10.0)),
    range("capital_cost_per_gw", "Capital Cost ($B per GW)", dec!(1.0), dec!(100.0)),
    range("short_lived_fraction", "GPU & Network Equipment (share of CapEx)", dec!(0), dec!(1)),
    range("revenue_per_gw", "Revenue Rate ($B per GW)", dec!(1.0), dec!(50.0)),
    range("utilization", "Utilization Rate", dec!(0), dec!(1)),
    range("power_price_per_kwh", "Power Cost ($ per kWh)", dec!(0.01), dec!(0.20)),
    range("pue", "PUE", dec!(1.0), dec!(2.0)),
    range("baseline_power_fraction", "Baseline Power (share of capacity)", dec!(0), dec!(0.5)),
    range("idle_power_factor", "Idle Power Factor", dec!(0), dec!(1)),
    range("sga_fraction", "SG&A (share of revenue)", dec!(0), dec!(0.3)),
    range("maintenance_per_gw", "Infrastructure Maintenance ($B per GW)", dec!(0.01), dec!(1.0)),
    range("staffing_per_gw", "Staffing ($B per GW)", dec!(0.01), dec!(0.5)),
    range("network_per_gw", "Network ($B per GW)", dec!(0.01), dec!(0.5)),
    range("software_compliance_per_gw", "Software & Compliance ($B per GW)", dec!(0.01), dec!(0.2)),
    range("property_tax_rate", "Property Tax Rate", dec!(0), dec!(0.03)),
    range("short_lived_life_years", "GPU & Network Depreciation (years)", dec!(1), dec!(15)),
    range("long_lived_life_years", "Other Assets Depreciation (years)", dec!(1), dec!(30)),
    range("tax_rate", "Tax Rate", dec!(0), dec!(0.5)),
    range("horizon_years", "Projection Years", dec!(1), dec!(20)),
];

/// Look up the documented range for a field.
pub fn input_range(field: &str) -> Option<&'static InputRange> {
    INPUT_RANGES.iter().find(|r| r.field == field)
}

/// Check a record against `INPUT_RANGES`.
///
/// This is the caller's precondition check; `compute_pnl` and
/// `project_cash_flows` never call it. Returns the first violation.
pub fn validate_assumptions(assumptions: &Assumptions) -> ModelResult<()> {
    for ((field, value), bounds) in assumptions.fields().iter().zip(INPUT_RANGES.iter()) {
        debug_assert_eq!(*field, bounds.field);
        if !bounds.contains(*value) {
            return Err(ModelError::InvalidInput {
                field: (*field).into(),
                reason: format!(
                    "{} must be between {} and {} (got {value})",
                    bounds.label, bounds.min, bounds.max
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario_is_in_range() {
        assert!(validate_assumptions(&Assumptions::default()).is_ok());
    }

    #[test]
    fn test_field_order_matches_ranges() {
        let a = Assumptions::default();
        let names: Vec<&str> = a.fields().iter().map(|(n, _)| *n).collect();
        let range_names: Vec<&str> = INPUT_RANGES.iter().map(|r| r.field).collect();
        assert_eq!(names, range_names);
    }

    #[test]
    fn test_out_of_range_utilization_rejected() {
        let a = Assumptions {
            utilization: dec!(1.2),
            ..Assumptions::default()
        };
        match validate_assumptions(&a) {
            Err(ModelError::InvalidInput { field, .. }) => assert_eq!(field, "utilization"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let a = Assumptions {
            horizon_years: 0,
            ..Assumptions::default()
        };
        assert!(validate_assumptions(&a).is_err());
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let a = Assumptions {
            pue: dec!(1.0),
            baseline_power_fraction: dec!(0.5),
            ..Assumptions::default()
        };
        assert!(validate_assumptions(&a).is_ok());
    }

    #[test]
    fn test_total_investment() {
        let a = Assumptions {
            capacity_gw: dec!(2.5),
            ..Assumptions::default()
        };
        assert_eq!(a.total_investment(), dec!(75.0));
    }

    #[test]
    fn test_input_range_lookup() {
        let r = input_range("tax_rate").unwrap();
        assert_eq!(r.max, dec!(0.5));
        assert!(input_range("nonexistent").is_none());
    }
}
