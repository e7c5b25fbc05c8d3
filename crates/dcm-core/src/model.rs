use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::{validate_assumptions, Assumptions};
use crate::cash_flow::{project_cash_flows, CashFlowResult};
use crate::pnl::{compute_pnl, power_cost_breakdown, PnlResult, PowerCostBreakdown};
use crate::returns::{derive_returns, ReturnsResult};
use crate::summary::{summarize, ExecutiveSummary};
use crate::types::{with_metadata, ComputationOutput};
use crate::ModelResult;

/// Everything the model derives from one set of assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub pnl: PnlResult,
    pub power: PowerCostBreakdown,
    pub cash_flow: CashFlowResult,
    pub returns: ReturnsResult,
    pub summary: ExecutiveSummary,
}

/// Range-check the assumptions, then run P&L, cash-flow projection, returns
/// and summary in sequence.
pub fn run_model(assumptions: &Assumptions) -> ModelResult<ComputationOutput<ModelOutput>> {
    let start = Instant::now();
    validate_assumptions(assumptions)?;

    let output = evaluate(assumptions);
    let warnings = collect_warnings(&output);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Data-center unit economics (steady-state P&L, level cash flows, discrete payback)",
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// The unchecked pipeline behind `run_model`.
pub fn evaluate(assumptions: &Assumptions) -> ModelOutput {
    let pnl = compute_pnl(assumptions);
    let power = power_cost_breakdown(assumptions);
    let cash_flow = project_cash_flows(
        &pnl,
        assumptions.capital_cost_per_gw,
        assumptions.capacity_gw,
        assumptions.tax_rate,
        assumptions.horizon_years,
    );
    let returns = derive_returns(&cash_flow);
    let summary = summarize(assumptions, &pnl, &cash_flow);

    ModelOutput {
        pnl,
        power,
        cash_flow,
        returns,
        summary,
    }
}

fn collect_warnings(output: &ModelOutput) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    if output.pnl.ebit < Decimal::ZERO {
        warnings.push(format!("EBIT is negative ({})", output.pnl.ebit));
    }
    if !output.cash_flow.recovered_within_horizon {
        warnings.push(format!(
            "Investment not recovered within {} years; payback reported as the horizon",
            output.cash_flow.horizon_years()
        ));
    }
    if output.returns.irr.is_none() {
        warnings.push("Unable to calculate IRR with current assumptions".to_string());
    }
    warnings.extend(output.summary.concerns().map(|i| i.message.clone()));

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_model_has_no_warnings() {
        let out = run_model(&Assumptions::default()).unwrap();
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert!(out.result.returns.irr.is_some());
        assert_eq!(out.result.cash_flow.years.len(), 10);
    }

    #[test]
    fn test_invalid_assumptions_rejected() {
        let a = Assumptions {
            pue: dec!(0.8),
            ..Assumptions::default()
        };
        assert!(matches!(
            run_model(&a),
            Err(ModelError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_unprofitable_model_warns() {
        let a = Assumptions {
            utilization: dec!(0.05),
            power_price_per_kwh: dec!(0.20),
            ..Assumptions::default()
        };
        let out = run_model(&a).unwrap();
        assert!(out.result.returns.irr.is_none());
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("Unable to calculate IRR")));
        assert!(out.warnings.iter().any(|w| w.starts_with("Investment not recovered")));
    }

    #[test]
    fn test_envelope_echoes_assumptions() {
        let out = run_model(&Assumptions::default()).unwrap();
        assert_eq!(out.assumptions["horizon_years"], serde_json::json!(10));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
