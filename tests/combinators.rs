mod common;

use bvll_observables::observables::combinators::{
    self, branching_ratio_differential, branching_ratio_integrated, coefficients, Inputs,
};
use bvll_observables::observables::{CoefficientSet, PointObservable, Quantity};
use bvll_observables::process::{Lepton, Meson, Process};
use bvll_observables::theory::angular::{self, Convention, PPrimeIndex};
use bvll_observables::theory::mixing::TimeIntegrated;
use bvll_observables::theory::{AmplitudeProvider, AngularCoefficientBuilder};
use bvll_observables::utils::params::WilsonCoefficients;
use bvll_observables::{ObservableError, Result};

use common::{toy_masses, Fixture};

fn zero(_: &Inputs<'_>, _: &Process, _: f64) -> Result<f64> {
    Ok(0.0)
}

fn five(_: &Inputs<'_>, _: &Process, _: f64) -> Result<f64> {
    Ok(5.0)
}

fn must_not_be_evaluated(_: &Inputs<'_>, _: &Process, _: f64) -> Result<f64> {
    panic!("denominator evaluated although the numerator vanishes")
}

fn b0_kstar(lepton: Lepton) -> Process {
    Process::new(Meson::B0, Meson::KstarZero, lepton)
}

#[test]
fn vanishing_numerator_skips_denominator() {
    let fx = Fixture::new();
    let inputs = fx.inputs();
    let process = b0_kstar(Lepton::Mu);

    let binned = combinators::ratio_integrated(
        &zero,
        &must_not_be_evaluated,
        &inputs,
        &process,
        1.1,
        6.0,
        0.01,
    );
    assert_eq!(binned, Ok(0.0));

    let point =
        combinators::ratio_differential(&zero, &must_not_be_evaluated, &inputs, &process, 2.0);
    assert_eq!(point, Ok(0.0));
}

#[test]
fn constant_integrand_over_bin() {
    let fx = Fixture::new();
    let inputs = fx.inputs();

    let value =
        combinators::integrated(&five, &inputs, &b0_kstar(Lepton::Mu), 1.0, 4.0, 0.01).unwrap();
    assert!((value - 15.0).abs() < 1e-9, "got {value}");
}

#[test]
fn self_lepton_flavour_ratio_is_one() {
    let fx = Fixture::new();
    let inputs = fx.inputs();

    for process in [b0_kstar(Lepton::Mu), Process::new(Meson::Bs, Meson::Phi, Lepton::Mu)] {
        let ratio = combinators::lepton_flavour_ratio(
            &Quantity::AveragedRate,
            &inputs,
            &process,
            Lepton::Mu,
            Lepton::Mu,
            1.1,
            6.0,
            0.0005,
        );
        assert_eq!(ratio, Ok(1.0));
    }
}

#[test]
fn outside_physical_window_is_zero_without_amplitudes() {
    let fx = Fixture::new();
    let inputs = fx.inputs();

    // (m_B0 - m_K*0)² ≈ 19.2, (m_Bs - m_phi)² ≈ 18.9 and 4 m_tau² ≈ 12.6
    let above = b0_kstar(Lepton::Mu);
    let below = b0_kstar(Lepton::Tau);
    let bs = Process::new(Meson::Bs, Meson::Phi, Lepton::Mu);

    assert_eq!(Quantity::SaDenominator.at(&inputs, &above, 19.5), Ok(0.0));
    assert_eq!(Quantity::FlNumerator.at(&inputs, &below, 10.0), Ok(0.0));
    assert_eq!(Quantity::AveragedRate.at(&inputs, &bs, 0.01), Ok(0.0));
    assert_eq!(combinators::pprime_differential(&inputs, &above, PPrimeIndex::P5, 25.0), Ok(0.0));
    assert_eq!(coefficients(&inputs, &bs, 19.0), Ok(None));
    assert_eq!(fx.theory.amplitude_calls(), 0);

    assert!(coefficients(&inputs, &above, 2.0).unwrap().is_some());
    assert_eq!(fx.theory.amplitude_calls(), 2);
}

#[test]
fn vanishing_amplitudes_give_zero_not_nan() {
    let mut fx = Fixture::new();
    fx.wc = WilsonCoefficients::new();
    let inputs = fx.inputs();
    let process = b0_kstar(Lepton::Mu);

    // SA denominator is zero as well
    let afb = combinators::ratio_differential(
        &Quantity::AfbNumerator(Convention::Experiment),
        &Quantity::SaDenominator,
        &inputs,
        &process,
        3.0,
    );
    assert_eq!(afb, Ok(0.0));
}

#[test]
fn missing_parameter_propagates() {
    let mut fx = Fixture::new();
    fx.par.remove("tau_B0");
    let inputs = fx.inputs();

    assert_eq!(
        branching_ratio_integrated(&inputs, &b0_kstar(Lepton::Mu), 1.1, 6.0, 0.01),
        Err(ObservableError::MissingParameter(String::from("tau_B0")))
    );
}

#[test]
fn binned_branching_ratio_is_bin_average() {
    let fx = Fixture::new();
    let inputs = fx.inputs();
    let process = b0_kstar(Lepton::E);

    let point = branching_ratio_differential(&inputs, &process, 2.0).unwrap();
    let binned = branching_ratio_integrated(&inputs, &process, 1.1, 6.0, 0.01).unwrap();
    assert!(point > 0.0);
    assert!(((binned - point) / point).abs() < 1e-9, "{binned} vs {point}");
}

#[test]
fn time_integration_matches_hand_assembled_coefficients() {
    let fx = Fixture::new();
    let inputs = fx.inputs();
    let process = Process::new(Meson::Bs, Meson::Phi, Lepton::Mu);
    let q2 = 3.0;

    let masses = toy_masses(&fx.par, &process);
    let h = fx.theory.helicity_amplitudes(q2, &fx.wc, &fx.par, &process, 4.8).unwrap();
    let h_bar = fx.theory.helicity_amplitudes_bar(q2, &fx.wc, &fx.par, &process, 4.8).unwrap();
    let j = fx.theory.angular_coefficients(&h, q2, &masses).unwrap();
    let j_bar = fx.theory.angular_coefficients(&h_bar, q2, &masses).unwrap();
    // phi = arg(-q/p) = -PHI_S
    let j_h = fx
        .theory
        .interference_coefficients(-common::PHI_S, &h, &h_bar.tilde(), q2, &masses)
        .unwrap();
    let expected = TimeIntegrated::new(0.064, j, j_bar, j_h);

    let Some(CoefficientSet::Mixing(actual)) = coefficients(&inputs, &process, q2).unwrap() else {
        panic!("Bs must use the time-integrated coefficients")
    };
    assert!((actual.y - expected.y).abs() < 1e-15);
    for (index, value) in expected.j_h.iter() {
        assert!((actual.j_h[index] - value).abs() < 1e-12, "J_h[{index}]");
    }

    let tau = fx.par.get("tau_Bs").unwrap();
    let dbr = branching_ratio_differential(&inputs, &process, q2).unwrap();
    let manual = tau * expected.averaged_rate();
    assert!(((dbr - manual) / manual).abs() < 1e-12);
}

#[test]
fn no_width_splitting_reproduces_prompt_formulas() {
    let mut fx = Fixture::new();
    fx.par.set("DeltaGamma/Gamma_Bs", 0.0);
    let inputs = fx.inputs();
    let process = Process::new(Meson::Bs, Meson::KstarZero, Lepton::Mu);
    let q2 = 4.0;

    let masses = toy_masses(&fx.par, &process);
    let h = fx.theory.helicity_amplitudes(q2, &fx.wc, &fx.par, &process, 4.8).unwrap();
    let h_bar = fx.theory.helicity_amplitudes_bar(q2, &fx.wc, &fx.par, &process, 4.8).unwrap();
    let j = fx.theory.angular_coefficients(&h, q2, &masses).unwrap();
    let j_bar = fx.theory.angular_coefficients(&h_bar, q2, &masses).unwrap();

    let fl = combinators::ratio_differential(
        &Quantity::FlNumerator,
        &Quantity::SaDenominator,
        &inputs,
        &process,
        q2,
    )
    .unwrap();
    assert!((fl - angular::fl(&j, &j_bar)).abs() < 1e-12);

    let s5 = combinators::ratio_differential(
        &Quantity::SNumerator(Convention::Experiment, angular::AngularIndex::I5),
        &Quantity::SaDenominator,
        &inputs,
        &process,
        q2,
    )
    .unwrap();
    assert!((s5 - angular::s(Convention::Experiment, &j, &j_bar, angular::AngularIndex::I5)).abs() < 1e-12);

    let p5 = combinators::pprime_differential(&inputs, &process, PPrimeIndex::P5, q2).unwrap();
    let expected = angular::pprime_experiment(&j, &j_bar, PPrimeIndex::P5).unwrap();
    assert!((p5 - expected).abs() < 1e-12);
}

#[test]
fn undefined_polarization_fraction_rejects_pprime() {
    let mut fx = Fixture::new();
    fx.wc = WilsonCoefficients::new();
    let inputs = fx.inputs();

    // Without any amplitude F_L is 0/0 and the P' normalisation is rejected
    let p4 = combinators::pprime_differential(&inputs, &b0_kstar(Lepton::Mu), PPrimeIndex::P4, 2.0);
    assert!(matches!(p4, Err(ObservableError::DegeneratePolarization(_))));
}
