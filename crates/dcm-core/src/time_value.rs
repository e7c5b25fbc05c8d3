use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::ModelError;
use crate::types::{Money, Rate};
use crate::ModelResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;

const MIN_RATE: Decimal = dec!(-0.9999);
const MAX_RATE: Decimal = dec!(100.0);

/// Candidate rates scanned, in order, for a bracketing sign change.
const BRACKET_GRID: [Decimal; 13] = [
    dec!(-0.9999),
    dec!(-0.99),
    dec!(-0.9),
    dec!(-0.5),
    dec!(-0.2),
    dec!(0),
    dec!(0.1),
    dec!(0.25),
    dec!(0.5),
    dec!(1),
    dec!(2),
    dec!(10),
    dec!(100),
];

/// Net Present Value of a series of cash flows, the first at t = 0.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ModelResult<Money> {
    if rate <= dec!(-1) {
        return Err(ModelError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    npv_with_derivative(rate, cash_flows)
        .map(|(value, _)| value)
        .ok_or_else(|| ModelError::InvalidInput {
            field: "rate".into(),
            reason: format!("NPV at rate {rate} is outside decimal range"),
        })
}

/// NPV and dNPV/dr, or None if an intermediate overflows.
///
/// Once the discount factor itself overflows the remaining terms are below
/// decimal resolution and are dropped.
fn npv_with_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Money, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut value = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => break,
            };
        }
        if discount.is_zero() {
            return None;
        }
        value = value.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            let t_dec = Decimal::from(t as i64);
            let term = t_dec
                .checked_mul(*cf)?
                .checked_div(discount)?
                .checked_div(one_plus_r)?;
            derivative = derivative.checked_sub(term)?;
        }
    }

    Some((value, derivative))
}

/// Internal Rate of Return.
///
/// Newton-Raphson from `guess`, with the rate clamped to [-99.99%, 10000%]. If
/// Newton stalls or runs out of iterations, bisection is tried on the first
/// sign change found in a fixed grid of rates. Both loops are bounded.
pub fn irr(cash_flows: &[Money], guess: Rate) -> ModelResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(ModelError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    match newton_irr(cash_flows, guess) {
        Ok(rate) => Ok(rate),
        Err(e) => {
            debug!(error = %e, "newton IRR failed, falling back to bisection");
            bisection_irr(cash_flows)
        }
    }
}

fn newton_irr(cash_flows: &[Money], guess: Rate) -> ModelResult<Rate> {
    let mut rate = guess;
    let mut last_delta = Decimal::MAX;

    for i in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) =
            npv_with_derivative(rate, cash_flows).ok_or_else(|| ModelError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta,
            })?;
        last_delta = npv_val;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            debug!(iterations = i, %rate, "newton IRR converged");
            return Ok(rate);
        }

        let step = match npv_val.checked_div(dnpv) {
            Some(s) => s,
            None => {
                return Err(ModelError::ConvergenceFailure {
                    function: "IRR".into(),
                    iterations: i,
                    last_delta: npv_val,
                })
            }
        };

        rate -= step;
        rate = rate.clamp(MIN_RATE, MAX_RATE);
    }

    Err(ModelError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta,
    })
}

fn bisection_irr(cash_flows: &[Money]) -> ModelResult<Rate> {
    let sampled: Vec<(Rate, Money)> = BRACKET_GRID
        .iter()
        .filter_map(|&r| npv_with_derivative(r, cash_flows).map(|(v, _)| (r, v)))
        .collect();

    let (mut lo, mut npv_lo, mut hi) = match sampled.windows(2).find_map(|w| {
        let (r0, v0) = w[0];
        let (r1, v1) = w[1];
        if v0.is_zero() {
            Some((r0, v0, r0))
        } else if v0.is_sign_negative() != v1.is_sign_negative() {
            Some((r0, v0, r1))
        } else {
            None
        }
    }) {
        Some(bracket) => bracket,
        None => {
            return Err(ModelError::ConvergenceFailure {
                function: "IRR (bisection)".into(),
                iterations: 0,
                last_delta: sampled.first().map(|(_, v)| *v).unwrap_or(Decimal::MAX),
            })
        }
    };

    if npv_lo.is_zero() {
        return Ok(lo);
    }

    let mut last_delta = npv_lo;
    for i in 0..MAX_BISECTION_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let (npv_mid, _) =
            npv_with_derivative(mid, cash_flows).ok_or_else(|| ModelError::ConvergenceFailure {
                function: "IRR (bisection)".into(),
                iterations: i,
                last_delta,
            })?;
        last_delta = npv_mid;

        if npv_mid.abs() < CONVERGENCE_THRESHOLD {
            debug!(iterations = i, rate = %mid, "bisection IRR converged");
            return Ok(mid);
        }

        if npv_mid.is_sign_negative() == npv_lo.is_sign_negative() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }

    Err(ModelError::ConvergenceFailure {
        function: "IRR (bisection)".into(),
        iterations: MAX_BISECTION_ITERATIONS,
        last_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npv_basic() {
        let cfs = vec![dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(0.01));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        let result = npv(dec!(0.0), &cfs).unwrap();
        assert_eq!(result, dec!(50));
    }

    #[test]
    fn test_npv_rejects_rate_at_minus_one() {
        assert!(npv(dec!(-1), &[dec!(-1), dec!(2)]).is_err());
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.001));
        assert!(npv(result, &cfs).unwrap().abs() < dec!(0.000001));
    }

    #[test]
    fn test_irr_negative_rate() {
        // Returns only 80% of the outlay
        let cfs = vec![dec!(-100), dec!(40), dec!(40)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        assert!(result < Decimal::ZERO);
        assert!(npv(result, &cfs).unwrap().abs() < dec!(0.000001));
    }

    #[test]
    fn test_irr_requires_two_flows() {
        assert!(matches!(
            irr(&[dec!(-100)], dec!(0.1)),
            Err(ModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_irr_no_sign_change_fails() {
        let cfs = vec![dec!(-100), dec!(-10), dec!(-10)];
        assert!(matches!(
            irr(&cfs, dec!(0.1)),
            Err(ModelError::ConvergenceFailure { .. })
        ));
    }

    #[test]
    fn test_bisection_finds_root() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = bisection_irr(&cfs).unwrap();
        assert!(npv(result, &cfs).unwrap().abs() < CONVERGENCE_THRESHOLD);
    }
}
