use napi::Result as NapiResult;
use napi_derive::napi;

use dcm_core::assumptions::{Assumptions, INPUT_RANGES};
use dcm_core::cash_flow::CashFlowInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_assumptions(input_json: &str) -> NapiResult<Assumptions> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_pnl(input_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&input_json)?;
    let output = dcm_core::pnl::compute_pnl(&assumptions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn power_cost_breakdown(input_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&input_json)?;
    let output = dcm_core::pnl::power_cost_breakdown(&assumptions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_cash_flows(input_json: String) -> NapiResult<String> {
    let input: CashFlowInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dcm_core::cash_flow::project_cash_flows_from_input(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Range-checked full model inside the computation envelope.
#[napi]
pub fn run_model(input_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&input_json)?;
    let output = dcm_core::model::run_model(&assumptions).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[napi]
pub fn reference_assumptions() -> NapiResult<String> {
    serde_json::to_string(&Assumptions::default()).map_err(to_napi_error)
}

#[napi]
pub fn input_ranges() -> NapiResult<String> {
    serde_json::to_string(&INPUT_RANGES[..]).map_err(to_napi_error)
}
