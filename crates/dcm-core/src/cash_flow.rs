use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pnl::PnlResult;
use crate::types::{Gigawatts, Money, MoneyPerGw, Rate, Years};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Arguments of `project_cash_flows` bundled for JSON callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowInput {
    pub pnl: PnlResult,
    pub capital_cost_per_gw: MoneyPerGw,
    pub capacity_gw: Gigawatts,
    pub tax_rate: Rate,
    pub horizon_years: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the cash-flow projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowYear {
    /// 1-based year
    pub year: u32,
    /// Net cash flow for the year; year 1 carries the capital outlay
    pub cash_flow: Money,
    /// Cash position at year end
    pub cumulative_cash_flow: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowResult {
    /// Upfront capital outlay (positive number)
    pub initial_investment: Money,
    /// After-tax EBIT plus depreciation, identical every year
    pub operating_cash_flow: Money,
    pub years: Vec<CashFlowYear>,
    /// First year the cumulative position is non-negative, or the horizon
    pub payback_period_years: Years,
    /// False when the horizon was reported because the outlay is never recovered
    pub recovered_within_horizon: bool,
}

impl CashFlowResult {
    pub fn horizon_years(&self) -> u32 {
        self.years.len() as u32
    }

    /// Cash position at the end of the horizon.
    pub fn final_cumulative_cash_flow(&self) -> Money {
        self.years
            .last()
            .map(|y| y.cumulative_cash_flow)
            .unwrap_or(-self.initial_investment)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// After-tax EBIT plus the depreciation add-back.
pub fn operating_cash_flow(pnl: &PnlResult, tax_rate: Rate) -> Money {
    pnl.ebit * (Decimal::ONE - tax_rate) + pnl.depreciation
}

/// Project the steady-state P&L over `horizon_years`.
///
/// The capital outlay is a single payment at year 0, collapsed into year 1's
/// cash flow. Every later year earns the same operating cash flow. There is
/// no working-capital or terminal-value adjustment.
pub fn project_cash_flows(
    pnl: &PnlResult,
    capital_cost_per_gw: MoneyPerGw,
    capacity_gw: Gigawatts,
    tax_rate: Rate,
    horizon_years: u32,
) -> CashFlowResult {
    let initial_investment = capital_cost_per_gw * capacity_gw;
    let operating_cf = operating_cash_flow(pnl, tax_rate);

    let mut years = Vec::with_capacity(horizon_years as usize);
    let mut cumulative = -initial_investment;

    for year in 1..=horizon_years {
        let cash_flow = if year == 1 {
            operating_cf - initial_investment
        } else {
            operating_cf
        };
        // The position opens at -investment; each year adds its operating inflow.
        cumulative += operating_cf;
        years.push(CashFlowYear {
            year,
            cash_flow,
            cumulative_cash_flow: cumulative,
        });
    }

    let (payback_period_years, recovered_within_horizon) =
        match discrete_payback_year(&years) {
            Some(year) => (Decimal::from(year), true),
            None => (Decimal::from(horizon_years), false),
        };

    CashFlowResult {
        initial_investment,
        operating_cash_flow: operating_cf,
        years,
        payback_period_years,
        recovered_within_horizon,
    }
}

/// `project_cash_flows` driven by a bundled input.
pub fn project_cash_flows_from_input(input: &CashFlowInput) -> CashFlowResult {
    project_cash_flows(
        &input.pnl,
        input.capital_cost_per_gw,
        input.capacity_gw,
        input.tax_rate,
        input.horizon_years,
    )
}

/// First year whose cumulative cash flow is non-negative.
pub fn discrete_payback_year(years: &[CashFlowYear]) -> Option<u32> {
    years
        .iter()
        .find(|y| y.cumulative_cash_flow >= Decimal::ZERO)
        .map(|y| y.year)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
