use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::types::{Money, Rate};

/// Annual electricity cost of 1 GW of IT load ($B) at the reference price.
pub const REFERENCE_POWER_COST_PER_GW: Money = dec!(0.438);

/// Power price ($/kWh) at which `REFERENCE_POWER_COST_PER_GW` was observed.
pub const REFERENCE_POWER_PRICE: Decimal = dec!(0.05);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Steady-state annual profit and loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlResult {
    pub revenue: Money,
    /// Active, idle and baseline electricity combined
    pub power_cost: Money,
    pub sga: Money,
    /// Maintenance, staffing, network and software/compliance
    pub other_opex: Money,
    pub property_tax: Money,
    pub depreciation: Money,
    pub ebit: Money,
    /// EBIT / revenue, zero when there is no revenue
    pub ebit_margin: Rate,
}

impl PnlResult {
    /// Cash operating costs: everything above EBIT except depreciation.
    pub fn total_operating_expense(&self) -> Money {
        self.power_cost + self.sga + self.other_opex + self.property_tax
    }

    /// Metric-name/value rows of the P&L export table.
    pub fn line_items(&self) -> Vec<(&'static str, Decimal)> {
        vec![
            ("Revenue", self.revenue),
            ("Power Cost", self.power_cost),
            ("SG&A", self.sga),
            ("Other Opex", self.other_opex),
            ("Property Tax", self.property_tax),
            ("Depreciation", self.depreciation),
            ("EBIT", self.ebit),
            ("EBIT Margin", self.ebit_margin),
        ]
    }
}

/// The three additive components of the power bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCostBreakdown {
    /// Reference cost per GW rescaled to the assumed power price
    pub scaled_base_rate: Money,
    /// Utilized IT load, with PUE uplift
    pub active: Money,
    /// Unused capacity drawing idle power, with PUE uplift
    pub idle: Money,
    /// Facility floor, no PUE uplift
    pub baseline: Money,
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Electricity cost split into active, idle and baseline components.
///
/// PUE applies to the active and idle terms only: the baseline floor is
/// already facility-level draw.
pub fn power_cost_breakdown(a: &Assumptions) -> PowerCostBreakdown {
    let scaled_base_rate =
        REFERENCE_POWER_COST_PER_GW * (a.power_price_per_kwh / REFERENCE_POWER_PRICE);

    let active = a.pue * a.utilization * a.capacity_gw * scaled_base_rate;
    let idle = a.idle_power_factor
        * (Decimal::ONE - a.utilization)
        * a.capacity_gw
        * a.pue
        * scaled_base_rate;
    let baseline = a.baseline_power_fraction * a.capacity_gw * scaled_base_rate;

    PowerCostBreakdown {
        scaled_base_rate,
        active,
        idle,
        baseline,
        total: active + idle + baseline,
    }
}

/// Straight-line annual charge on one asset pool, no salvage value.
/// A zero life is outside the documented range and yields no charge.
fn pool_depreciation(cost: Money, life_years: u32) -> Money {
    if life_years > 0 {
        cost / Decimal::from(life_years)
    } else {
        Decimal::ZERO
    }
}

/// Annual depreciation across the short-lived and long-lived pools.
pub fn annual_depreciation(a: &Assumptions) -> Money {
    let short_lived = pool_depreciation(
        a.capital_cost_per_gw * a.short_lived_fraction,
        a.short_lived_life_years,
    );
    let long_lived = pool_depreciation(
        a.capital_cost_per_gw * (Decimal::ONE - a.short_lived_fraction),
        a.long_lived_life_years,
    );
    a.capacity_gw * (short_lived + long_lived)
}

/// Build the steady-state annual P&L from a set of assumptions.
///
/// Pure and total: in-range inputs never fail, and zero revenue gives a zero
/// margin.
pub fn compute_pnl(a: &Assumptions) -> PnlResult {
    let revenue = a.revenue_per_gw * a.utilization * a.capacity_gw;

    let power_cost = power_cost_breakdown(a).total;

    let sga = a.sga_fraction * revenue;

    let other_opex = (a.maintenance_per_gw
        + a.staffing_per_gw
        + a.network_per_gw
        + a.software_compliance_per_gw)
        * a.capacity_gw;

    let property_tax = a.property_tax_rate * a.capital_cost_per_gw * a.capacity_gw;

    let depreciation = annual_depreciation(a);

    let ebit = revenue - (power_cost + sga + other_opex + property_tax + depreciation);
    let ebit_margin = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        ebit / revenue
    };

    PnlResult {
        revenue,
        power_cost,
        sga,
        other_opex,
        property_tax,
        depreciation,
        ebit,
        ebit_margin,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_revenue() {
        let pnl = compute_pnl(&Assumptions::default());
        // 12 * 0.7 * 1
        assert_eq!(pnl.revenue, dec!(8.4));
    }

    #[test]
    fn test_reference_power_components() {
        let p = power_cost_breakdown(&Assumptions::default());
        assert_eq!(p.scaled_base_rate, dec!(0.438));
        // 1.2 * 0.7 * 1 * 0.438
        assert_eq!(p.active, dec!(0.36792));
        // 0.4 * 0.3 * 1 * 1.2 * 0.438
        assert_eq!(p.idle, dec!(0.063072));
        // 0.2 * 1 * 0.438
        assert_eq!(p.baseline, dec!(0.0876));
        assert_eq!(p.total, dec!(0.518592));
    }

    #[test]
    fn test_reference_cost_lines() {
        let pnl = compute_pnl(&Assumptions::default());
        assert_eq!(pnl.sga, dec!(0.84));
        assert_eq!(pnl.other_opex, dec!(0.23));
        assert_eq!(pnl.property_tax, dec!(0.21));
        // 30*0.7/5 + 30*0.3/10 = 4.2 + 0.9
        assert_eq!(pnl.depreciation, dec!(5.1));
        assert_eq!(pnl.ebit, dec!(1.501408));
    }

    #[test]
    fn test_ebit_identity() {
        let a = Assumptions {
            capacity_gw: dec!(2.3),
            utilization: dec!(0.85),
            pue: dec!(1.35),
            ..Assumptions::default()
        };
        let pnl = compute_pnl(&a);
        assert_eq!(
            pnl.ebit,
            pnl.revenue
                - pnl.power_cost
                - pnl.sga
                - pnl.other_opex
                - pnl.property_tax
                - pnl.depreciation
        );
    }

    #[test]
    fn test_zero_revenue_margin_is_zero() {
        let a = Assumptions {
            utilization: Decimal::ZERO,
            ..Assumptions::default()
        };
        let pnl = compute_pnl(&a);
        assert_eq!(pnl.revenue, Decimal::ZERO);
        assert_eq!(pnl.ebit_margin, Decimal::ZERO);
        assert!(pnl.ebit < Decimal::ZERO);
    }

    #[test]
    fn test_baseline_not_uplifted_by_pue() {
        let low = Assumptions {
            utilization: Decimal::ZERO,
            idle_power_factor: Decimal::ZERO,
            pue: dec!(1.0),
            ..Assumptions::default()
        };
        let high = Assumptions {
            pue: dec!(2.0),
            ..low.clone()
        };
        assert_eq!(
            power_cost_breakdown(&low).total,
            power_cost_breakdown(&high).total
        );
    }

    #[test]
    fn test_zero_life_pool_contributes_nothing() {
        let a = Assumptions {
            short_lived_fraction: dec!(1),
            long_lived_life_years: 0,
            ..Assumptions::default()
        };
        // 30 / 5
        assert_eq!(annual_depreciation(&a), dec!(6));
    }

    #[test]
    fn test_line_items_order() {
        let pnl = compute_pnl(&Assumptions::default());
        let names: Vec<&str> = pnl.line_items().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "Revenue",
                "Power Cost",
                "SG&A",
                "Other Opex",
                "Property Tax",
                "Depreciation",
                "EBIT",
                "EBIT Margin"
            ]
        );
    }

    #[test]
    fn test_total_operating_expense() {
        let pnl = compute_pnl(&Assumptions::default());
        assert_eq!(
            pnl.total_operating_expense(),
            dec!(0.518592) + dec!(0.84) + dec!(0.23) + dec!(0.21)
        );
    }
}
