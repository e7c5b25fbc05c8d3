use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cash_flow::CashFlowResult;
use crate::time_value;
use crate::types::{Money, Rate};

/// Starting point for the IRR root-find.
const IRR_GUESS: Rate = dec!(0.10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsResult {
    /// Internal rate of return; None when no finite rate exists or the solver
    /// did not converge
    pub irr: Option<Rate>,
    /// Operating cash flow / initial investment
    pub roic_year_one: Rate,
    pub total_investment: Money,
}

/// IRR of an upfront outlay followed by a level operating cash flow.
///
/// Solves `-investment + Σ_{t=1..horizon} ocf / (1+r)^t = 0`. Returns None
/// when the flows never change sign (ocf <= 0 or nothing invested) or the
/// solver fails.
pub fn investment_irr(
    initial_investment: Money,
    operating_cash_flow: Money,
    horizon_years: u32,
) -> Option<Rate> {
    if operating_cash_flow <= Decimal::ZERO || initial_investment <= Decimal::ZERO {
        return None;
    }
    if horizon_years == 0 {
        return None;
    }

    let mut flows = Vec::with_capacity(horizon_years as usize + 1);
    flows.push(-initial_investment);
    flows.extend(std::iter::repeat(operating_cash_flow).take(horizon_years as usize));

    match time_value::irr(&flows, IRR_GUESS) {
        Ok(rate) => Some(rate),
        Err(e) => {
            debug!(error = %e, "IRR not determinable");
            None
        }
    }
}

/// First-year return on invested capital.
pub fn roic_year_one(initial_investment: Money, operating_cash_flow: Money) -> Rate {
    if initial_investment.is_zero() {
        Decimal::ZERO
    } else {
        operating_cash_flow / initial_investment
    }
}

/// Payback-independent return metrics for a projection.
pub fn derive_returns(cash_flow: &CashFlowResult) -> ReturnsResult {
    ReturnsResult {
        irr: investment_irr(
            cash_flow.initial_investment,
            cash_flow.operating_cash_flow,
            cash_flow.horizon_years(),
        ),
        roic_year_one: roic_year_one(cash_flow.initial_investment, cash_flow.operating_cash_flow),
        total_investment: cash_flow.initial_investment,
    }
}
