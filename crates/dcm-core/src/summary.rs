use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::cash_flow::CashFlowResult;
use crate::pnl::PnlResult;
use crate::types::{Money, Rate};

const STRONG_MARGIN: Rate = dec!(0.3);
const WEAK_MARGIN: Rate = dec!(0.1);
const FAST_PAYBACK_YEARS: Decimal = dec!(5);
const SLOW_PAYBACK_YEARS: Decimal = dec!(10);
const HIGH_POWER_SHARE: Rate = dec!(0.4);
const LOW_UTILIZATION: Rate = dec!(0.6);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Operating costs as shares of revenue. Shares are None when there is no
/// revenue to divide by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostStructure {
    pub power_cost_share: Option<Rate>,
    pub sga_share: Option<Rate>,
    pub other_opex_share: Option<Rate>,
    pub property_tax_share: Option<Rate>,
    pub total_operating_expense: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightKind {
    Strength,
    Concern,
    Opportunity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub cost_structure: CostStructure,
    pub insights: Vec<Insight>,
}

impl ExecutiveSummary {
    pub fn concerns(&self) -> impl Iterator<Item = &Insight> {
        self.insights
            .iter()
            .filter(|i| i.kind == InsightKind::Concern)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

fn share_of(amount: Money, revenue: Money) -> Option<Rate> {
    if revenue.is_zero() {
        None
    } else {
        Some(amount / revenue)
    }
}

pub fn cost_structure(pnl: &PnlResult) -> CostStructure {
    CostStructure {
        power_cost_share: share_of(pnl.power_cost, pnl.revenue),
        sga_share: share_of(pnl.sga, pnl.revenue),
        other_opex_share: share_of(pnl.other_opex, pnl.revenue),
        property_tax_share: share_of(pnl.property_tax, pnl.revenue),
        total_operating_expense: pnl.total_operating_expense(),
    }
}

/// Rule-of-thumb reading of the headline numbers.
pub fn key_insights(
    assumptions: &Assumptions,
    pnl: &PnlResult,
    cash_flow: &CashFlowResult,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let mut push = |kind, message: &str| {
        insights.push(Insight {
            kind,
            message: message.to_string(),
        })
    };

    if pnl.ebit_margin > STRONG_MARGIN {
        push(
            InsightKind::Strength,
            "Strong profitability with EBIT margin above 30%",
        );
    } else if pnl.ebit_margin < WEAK_MARGIN {
        push(
            InsightKind::Concern,
            "Low profitability - consider optimizing costs or increasing utilization",
        );
    }

    if cash_flow.recovered_within_horizon && cash_flow.payback_period_years <= FAST_PAYBACK_YEARS {
        push(
            InsightKind::Strength,
            "Attractive payback period under 5 years",
        );
    } else if cash_flow.payback_period_years > SLOW_PAYBACK_YEARS {
        push(
            InsightKind::Concern,
            "Long payback period - may need to improve economics",
        );
    }

    if let Some(power_share) = share_of(pnl.power_cost, pnl.revenue) {
        if power_share > HIGH_POWER_SHARE {
            push(
                InsightKind::Concern,
                "Power costs are high - consider power optimization or PPA strategies",
            );
        }
    }

    if assumptions.utilization < LOW_UTILIZATION {
        push(
            InsightKind::Opportunity,
            "Low utilization - improving to 70%+ could significantly boost returns",
        );
    }

    insights
}

pub fn summarize(
    assumptions: &Assumptions,
    pnl: &PnlResult,
    cash_flow: &CashFlowResult,
) -> ExecutiveSummary {
    ExecutiveSummary {
        cost_structure: cost_structure(pnl),
        insights: key_insights(assumptions, pnl, cash_flow),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
