//! Adaptive integration over q² bins.
//!
//! The base rule is the double-exponential quadrature of the `quadrature` crate, which
//! copes with integrable endpoint singularities. A piece whose error estimate misses
//! the relative tolerance is bisected until the depth budget runs out. Bins are split
//! beforehand at the photon-pole boundary and at the edges of the charmonium windows so
//! that no piece contains a kink of the integrand in its interior.

use std::cell::RefCell;

use quadrature::double_exponential;

use crate::constants::{CHARMONIUM_WINDOWS, PHOTON_POLE_SPLIT};
use crate::error::{ObservableError, Result};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntegrationOptions {
    /// Relative tolerance. The absolute tolerance is always zero.
    pub epsrel: f64,
    /// Maximum bisection depth per piece.
    pub max_subdivisions: usize,
    /// Warn when the bin overlaps a narrow charmonium resonance.
    pub warn_resonances: bool,
}

#[derive(Debug, Default)]
struct IntegrationStats {
    evaluations: u64,
    pieces: u64,
    unconverged: u64,
}

/// Whether `[q2min, q2max]` overlaps one of the charmonium windows.
pub fn overlaps_charmonium(q2min: f64, q2max: f64) -> bool {
    CHARMONIUM_WINDOWS
        .iter()
        .any(|&(low, high)| q2min < high && q2max > low)
}

/// Points where the bin is split before integrating, in increasing order and including
/// both endpoints.
fn breakpoints(a: f64, b: f64) -> Vec<f64> {
    let mut points = vec![a];
    let mut interior: Vec<f64> = std::iter::once(PHOTON_POLE_SPLIT)
        .chain(CHARMONIUM_WINDOWS.iter().flat_map(|&(low, high)| [low, high]))
        .filter(|&x| x > a && x < b)
        .collect();
    interior.sort_by(|x, y| x.total_cmp(y));
    points.extend(interior);
    points.push(b);
    points
}

/// Integrates `f` over `[a, b]`.
///
/// A failure of `f` at any point aborts the integral with that error. Missing the
/// tolerance only produces a warning.
pub fn nintegrate_pole<F>(f: F, a: f64, b: f64, opts: &IntegrationOptions) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    if a == b {
        return Ok(0.0);
    }
    if b < a {
        return nintegrate_pole(f, b, a, opts).map(|value| -value);
    }

    if opts.warn_resonances && overlaps_charmonium(a, b) {
        log::warn!(
            "The predictions in the region of narrow charmonium resonances are not meaningful (q2 in [{a}, {b}])"
        );
    }

    // The quadrature rule wants an infallible integrand, so the first error is parked
    // here and returned once the rule is done.
    let failure: RefCell<Option<ObservableError>> = RefCell::new(None);
    let integrand = |x: f64| -> f64 {
        if failure.borrow().is_some() {
            return 0.0;
        }
        match f(x) {
            Ok(value) => value,
            Err(err) => {
                *failure.borrow_mut() = Some(err);
                0.0
            }
        }
    };

    let mut stats = IntegrationStats::default();
    let total: f64 = breakpoints(a, b)
        .windows(2)
        .map(|piece| {
            adaptive(
                &integrand,
                piece[0],
                piece[1],
                opts.epsrel,
                opts.max_subdivisions,
                &mut stats,
            )
        })
        .sum();

    if let Some(err) = failure.into_inner() {
        return Err(err);
    }

    log::debug!(
        "integrated [{a}, {b}]: {} evaluations over {} pieces",
        stats.evaluations,
        stats.pieces
    );
    if stats.unconverged > 0 {
        log::warn!(
            "integral over [{a}, {b}] did not reach epsrel = {} in {} piece(s)",
            opts.epsrel,
            stats.unconverged
        );
    }

    Ok(total)
}

fn adaptive<G>(
    g: &G,
    a: f64,
    b: f64,
    epsrel: f64,
    depth_left: usize,
    stats: &mut IntegrationStats,
) -> f64
where
    G: Fn(f64) -> f64,
{
    // First pass only sets the scale of the absolute target.
    let rough = double_exponential::integrate(g, a, b, f64::INFINITY);
    let target = (epsrel * rough.integral.abs()).max(f64::MIN_POSITIVE);
    let output = double_exponential::integrate(g, a, b, target);
    stats.evaluations +=
        rough.num_function_evaluations as u64 + output.num_function_evaluations as u64;

    let converged = output.error_estimate <= epsrel * output.integral.abs()
        || (output.integral == 0.0 && output.error_estimate == 0.0);
    if converged {
        stats.pieces += 1;
        return output.integral;
    }
    if depth_left == 0 {
        stats.pieces += 1;
        stats.unconverged += 1;
        return output.integral;
    }

    let mid = 0.5 * (a + b);
    adaptive(g, a, mid, epsrel, depth_left - 1, stats)
        + adaptive(g, mid, b, epsrel, depth_left - 1, stats)
}

#[cfg(test)]
const TEST_OPTIONS: IntegrationOptions = IntegrationOptions {
    epsrel: 0.005,
    max_subdivisions: 12,
    warn_resonances: true,
};

#[test]
fn test_constant_integrand() {
    let value = nintegrate_pole(|_| Ok(5.0), 1.0, 4.0, &TEST_OPTIONS).unwrap();
    assert!((value - 15.0).abs() < 1e-9, "got {value}");
}

#[test]
fn test_reversed_and_empty_bins() {
    let forward = nintegrate_pole(|x| Ok(x * x), 0.5, 2.0, &TEST_OPTIONS).unwrap();
    let backward = nintegrate_pole(|x| Ok(x * x), 2.0, 0.5, &TEST_OPTIONS).unwrap();
    assert_eq!(forward, -backward);
    assert_eq!(nintegrate_pole(|x| Ok(x), 3.0, 3.0, &TEST_OPTIONS).unwrap(), 0.0);
}

#[test]
fn test_photon_pole_like_integrand() {
    // 1/q² falls over two orders of magnitude across the bin
    let value = nintegrate_pole(|q2| Ok(1.0 / q2), 0.045, 6.0, &TEST_OPTIONS).unwrap();
    let exact = (6.0_f64 / 0.045).ln();
    assert!(((value - exact) / exact).abs() < TEST_OPTIONS.epsrel, "got {value}, expected {exact}");
}

#[test]
fn test_narrow_peak_across_resonance_window() {
    // Narrow Breit-Wigner-like bump at the J/psi mass squared, bin spans both windows
    let (m2, width) = (9.59_f64, 0.05_f64);
    let peak = |q2: f64| Ok(width / ((q2 - m2).powi(2) + width * width));
    let value = nintegrate_pole(peak, 8.0, 15.0, &TEST_OPTIONS).unwrap();
    let exact = ((15.0 - m2) / width).atan() - ((8.0 - m2) / width).atan();
    assert!(((value - exact) / exact).abs() < 1e-2, "got {value}, expected {exact}");
}

#[test]
fn test_integrand_failure_propagates() {
    let failing = |q2: f64| {
        if q2 > 2.0 {
            Err(ObservableError::MissingParameter(String::from("m_Bs")))
        } else {
            Ok(1.0)
        }
    };
    assert_eq!(
        nintegrate_pole(failing, 1.0, 4.0, &TEST_OPTIONS),
        Err(ObservableError::MissingParameter(String::from("m_Bs")))
    );
}

#[test]
fn test_breakpoints() {
    assert_eq!(breakpoints(0.1, 0.98), vec![0.1, 0.98]);
    assert_eq!(breakpoints(0.1, 2.5), vec![0.1, 1.0, 2.5]);
    assert_eq!(breakpoints(1.0, 19.0), vec![1.0, 8.68, 10.09, 12.86, 14.18, 19.0]);
    assert!(overlaps_charmonium(6.0, 8.68 + 1e-9));
    assert!(!overlaps_charmonium(1.1, 6.0));
    assert!(!overlaps_charmonium(15.0, 19.0));
}
