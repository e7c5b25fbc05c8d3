use dcm_core::assumptions::{validate_assumptions, Assumptions, INPUT_RANGES};
use dcm_core::model::{evaluate, run_model, ModelOutput};
use dcm_core::summary::InsightKind;
use dcm_core::ModelError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

#[test]
fn test_run_model_reference_headlines() {
    let out = run_model(&Assumptions::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.pnl.revenue, dec!(8.4));
    assert_eq!(r.cash_flow.payback_period_years, dec!(5));
    assert_eq!(r.returns.total_investment, dec!(30));
    // 6.3761968 / 30
    assert!((r.returns.roic_year_one - dec!(0.2125399)).abs() < dec!(0.0000001));
    let irr = r.returns.irr.unwrap();
    assert!(irr > dec!(0.16) && irr < dec!(0.17), "IRR {irr}");
}

#[test]
fn test_run_model_matches_evaluate() {
    let a = Assumptions::default();
    let out = run_model(&a).unwrap();
    let direct: ModelOutput = evaluate(&a);
    assert_eq!(out.result, direct);
}

#[test]
fn test_run_model_rejects_first_out_of_range_field() {
    let a = Assumptions {
        capacity_gw: dec!(0),
        tax_rate: dec!(0.9),
        ..Assumptions::default()
    };
    match run_model(&a) {
        Err(ModelError::InvalidInput { field, .. }) => assert_eq!(field, "capacity_gw"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_every_range_bound_is_accepted() {
    for bounds in INPUT_RANGES.iter() {
        assert!(bounds.min <= bounds.max, "{} has inverted bounds", bounds.field);
    }
    let edge = Assumptions {
        capacity_gw: dec!(10.0),
        utilization: dec!(1),
        horizon_years: 20,
        short_lived_life_years: 1,
        ..Assumptions::default()
    };
    assert!(validate_assumptions(&edge).is_ok());
}

#[test]
fn test_low_utilization_opportunity_in_output() {
    let out = run_model(&Assumptions {
        utilization: dec!(0.5),
        ..Assumptions::default()
    })
    .unwrap();
    assert!(out
        .result
        .summary
        .insights
        .iter()
        .any(|i| i.kind == InsightKind::Opportunity));
}

#[test]
fn test_model_output_round_trips_through_json() {
    let out = run_model(&Assumptions::default()).unwrap();
    let json = serde_json::to_string(&out.result).unwrap();
    let back: ModelOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(back, out.result);
}

#[test]
fn test_assumptions_deserialize_from_json() {
    let json = serde_json::to_value(Assumptions::default()).unwrap();
    let back: Assumptions = serde_json::from_value(json).unwrap();
    assert_eq!(back, Assumptions::default());
}
