use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::debug;

use dcm_core::assumptions::{validate_assumptions, Assumptions, INPUT_RANGES};
use dcm_core::cash_flow::project_cash_flows;
use dcm_core::model::run_model;
use dcm_core::pnl::compute_pnl;
use dcm_core::returns::derive_returns;
use dcm_core::types::with_metadata;

use crate::input;

/// Assumption flags shared by every model command. Flags left unset keep the
/// reference 1 GW scenario value.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AssumptionArgs {
    /// Path to a JSON or YAML assumptions file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Installed capacity in GW
    #[arg(long)]
    pub capacity_gw: Option<Decimal>,

    /// Capital cost, $B per GW
    #[arg(long)]
    pub capital_cost_per_gw: Option<Decimal>,

    /// Share of capex in GPU & network equipment (e.g. 0.7)
    #[arg(long, alias = "gpu-network-share")]
    pub short_lived_fraction: Option<Decimal>,

    /// Annual revenue, $B per GW
    #[arg(long)]
    pub revenue_per_gw: Option<Decimal>,

    /// Utilization (e.g. 0.7 for 70%)
    #[arg(long)]
    pub utilization: Option<Decimal>,

    /// Electricity price, $ per kWh
    #[arg(long)]
    pub power_price_per_kwh: Option<Decimal>,

    /// Power Usage Effectiveness
    #[arg(long)]
    pub pue: Option<Decimal>,

    /// Baseline power as a fraction of capacity
    #[arg(long)]
    pub baseline_power_fraction: Option<Decimal>,

    /// Idle power factor for unused capacity
    #[arg(long)]
    pub idle_power_factor: Option<Decimal>,

    /// SG&A as a fraction of revenue
    #[arg(long)]
    pub sga_fraction: Option<Decimal>,

    /// Infrastructure maintenance, $B per GW per year
    #[arg(long)]
    pub maintenance_per_gw: Option<Decimal>,

    /// Staffing, $B per GW per year
    #[arg(long)]
    pub staffing_per_gw: Option<Decimal>,

    /// Network, $B per GW per year
    #[arg(long)]
    pub network_per_gw: Option<Decimal>,

    /// Software & compliance, $B per GW per year
    #[arg(long)]
    pub software_compliance_per_gw: Option<Decimal>,

    /// Property tax as a fraction of capital value
    #[arg(long)]
    pub property_tax_rate: Option<Decimal>,

    /// Depreciation life of GPU & network equipment (years)
    #[arg(long)]
    pub short_lived_life_years: Option<u32>,

    /// Depreciation life of buildings and infrastructure (years)
    #[arg(long)]
    pub long_lived_life_years: Option<u32>,

    /// Corporate tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Projection horizon (years)
    #[arg(long, alias = "years")]
    pub horizon_years: Option<u32>,
}

impl AssumptionArgs {
    fn apply_to(&self, mut a: Assumptions) -> Assumptions {
        macro_rules! layer {
            ($src:expr, $dst:ident; $($field:ident),* $(,)?) => {
                $(if let Some(v) = $src.$field { $dst.$field = v; })*
            };
        }
        layer!(
            self, a;
            capacity_gw,
            capital_cost_per_gw,
            short_lived_fraction,
            revenue_per_gw,
            utilization,
            power_price_per_kwh,
            pue,
            baseline_power_fraction,
            idle_power_factor,
            sga_fraction,
            maintenance_per_gw,
            staffing_per_gw,
            network_per_gw,
            software_compliance_per_gw,
            property_tax_rate,
            short_lived_life_years,
            long_lived_life_years,
            tax_rate,
            horizon_years,
        );
        a
    }
}

/// Resolve assumptions from `--input`, piped stdin, or flags over the
/// reference scenario, then range-check them.
fn resolve_assumptions(args: &AssumptionArgs) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let assumptions: Assumptions = if let Some(ref path) = args.input {
        debug!(path = %path, "reading assumptions file");
        input::file::read_structured(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        debug!("reading assumptions from stdin");
        piped
    } else {
        args.apply_to(Assumptions::default())
    };

    validate_assumptions(&assumptions)?;
    Ok(assumptions)
}

pub fn run_pnl(args: AssumptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let assumptions = resolve_assumptions(&args)?;

    let pnl = compute_pnl(&assumptions);

    // The statement rows keep the P&L's presentation order for table and CSV.
    let statement: Vec<Value> = pnl
        .line_items()
        .into_iter()
        .map(|(metric, value)| json!({ "metric": metric, "value": value }))
        .collect();
    let mut result = serde_json::to_value(&pnl)?;
    if let Value::Object(map) = &mut result {
        map.insert("statement".into(), Value::Array(statement));
    }

    let mut warnings = Vec::new();
    if pnl.ebit < Decimal::ZERO {
        warnings.push(format!("EBIT is negative ({})", pnl.ebit));
    }

    let output = with_metadata(
        "Steady-state annual P&L",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_cash_flow(args: AssumptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let assumptions = resolve_assumptions(&args)?;

    let pnl = compute_pnl(&assumptions);
    let projection = project_cash_flows(
        &pnl,
        assumptions.capital_cost_per_gw,
        assumptions.capacity_gw,
        assumptions.tax_rate,
        assumptions.horizon_years,
    );
    let returns = derive_returns(&projection);

    let mut warnings = Vec::new();
    if !projection.recovered_within_horizon {
        warnings.push(format!(
            "Investment not recovered within {} years",
            assumptions.horizon_years
        ));
    }
    if returns.irr.is_none() {
        warnings.push("Unable to calculate IRR with current assumptions".to_string());
    }

    // One flat record: projection fields followed by the return metrics.
    let mut result = serde_json::to_value(&projection)?;
    if let (Value::Object(map), Value::Object(extra)) = (&mut result, serde_json::to_value(&returns)?) {
        map.extend(extra);
    }

    let output = with_metadata(
        "Level operating cash flows with discrete-crossing payback",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_full_model(args: AssumptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = resolve_assumptions(&args)?;
    let output = run_model(&assumptions)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_ranges() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(&INPUT_RANGES[..])?)
}
