//! Differential, binned and ratio forms of the point quantities.
//!
//! Every function is stateless. The decay is passed explicitly as a [`Process`] and the
//! external theory through [`Inputs`].

use super::quantity::{CoefficientSet, PointObservable, Quantity};
use crate::config::PredictionConfig;
use crate::constants::LHCB_BSKSTAR_Q2;
use crate::error::Result;
use crate::process::{Lepton, Process};
use crate::theory::amplitudes::mixing_phase;
use crate::theory::angular::{self, Convention, PPrimeIndex};
use crate::theory::mixing::{in_physical_window, TimeIntegrated};
use crate::theory::{DecayMasses, Theory};
use crate::utils::integrate::nintegrate_pole;
use crate::utils::params::{Parameters, WilsonCoefficients};

/// What every prediction is evaluated against.
#[derive(Copy, Clone)]
pub struct Inputs<'a> {
    pub theory: &'a dyn Theory,
    pub wc: &'a WilsonCoefficients,
    pub par: &'a Parameters,
    pub config: &'a PredictionConfig,
}

impl<'a> Inputs<'a> {
    pub fn new(
        theory: &'a dyn Theory,
        wc: &'a WilsonCoefficients,
        par: &'a Parameters,
        config: &'a PredictionConfig,
    ) -> Self {
        Self {
            theory,
            wc,
            par,
            config,
        }
    }

    pub fn with_config(self, config: &'a PredictionConfig) -> Self {
        Self { config, ..self }
    }
}

/// Angular coefficients of `process` at `q2`, or `None` outside the physical window.
///
/// The amplitude provider is called once for the decay and once for its CP conjugate.
/// For mesons with width splitting the interference set J_h is added.
pub fn coefficients(
    inputs: &Inputs<'_>,
    process: &Process,
    q2: f64,
) -> Result<Option<CoefficientSet>> {
    let Inputs {
        theory,
        wc,
        par,
        config,
    } = *inputs;

    let m_lepton = par.get(&process.lepton.mass_key())?;
    let m_b = par.get(&process.b.mass_key())?;
    let m_v = par.get(&process.v.mass_key())?;
    if !in_physical_window(q2, m_lepton, m_b, m_v) {
        log::trace!("{process}: q2 = {q2} outside the physical window");
        return Ok(None);
    }

    let scale = config.scale_bvll;
    let masses = DecayMasses {
        m_b,
        m_v,
        m_quark: theory.quark_mass(par, scale)?,
        m_quark_light: 0.0,
        m_lepton_1: m_lepton,
        m_lepton_2: m_lepton,
    };

    let h = theory.helicity_amplitudes(q2, wc, par, process, scale)?;
    let h_bar = theory.helicity_amplitudes_bar(q2, wc, par, process, scale)?;
    let j = theory.angular_coefficients(&h, q2, &masses)?;
    let j_bar = theory.angular_coefficients(&h_bar, q2, &masses)?;

    if !process.b.has_width_splitting() {
        return Ok(Some(CoefficientSet::Prompt { j, j_bar }));
    }

    let y = par.get(&process.b.width_splitting_key())? / 2.0;
    let phi = mixing_phase(theory.q_over_p(wc, par, process.b)?);
    let j_h = theory.interference_coefficients(phi, &h, &h_bar.tilde(), q2, &masses)?;
    Ok(Some(CoefficientSet::Mixing(TimeIntegrated::new(
        y, j, j_bar, j_h,
    ))))
}

pub fn differential(
    observable: &dyn PointObservable,
    inputs: &Inputs<'_>,
    process: &Process,
    q2: f64,
) -> Result<f64> {
    observable.at(inputs, process, q2)
}

/// Integral of `observable` over `[q2min, q2max]`, not divided by the bin width.
pub fn integrated(
    observable: &dyn PointObservable,
    inputs: &Inputs<'_>,
    process: &Process,
    q2min: f64,
    q2max: f64,
    epsrel: f64,
) -> Result<f64> {
    nintegrate_pole(
        |q2| observable.at(inputs, process, q2),
        q2min,
        q2max,
        &inputs.config.integration_options(epsrel),
    )
}

/// `numerator / denominator` at one q². An exactly vanishing numerator gives zero and
/// the denominator is never evaluated.
pub fn ratio_differential(
    numerator: &dyn PointObservable,
    denominator: &dyn PointObservable,
    inputs: &Inputs<'_>,
    process: &Process,
    q2: f64,
) -> Result<f64> {
    let num = numerator.at(inputs, process, q2)?;
    if num == 0.0 {
        return Ok(0.0);
    }
    let den = denominator.at(inputs, process, q2)?;
    Ok(num / den)
}

/// Ratio of the q² integrals of `numerator` and `denominator`, short-circuited to zero
/// like [`ratio_differential`].
pub fn ratio_integrated(
    numerator: &dyn PointObservable,
    denominator: &dyn PointObservable,
    inputs: &Inputs<'_>,
    process: &Process,
    q2min: f64,
    q2max: f64,
    epsrel: f64,
) -> Result<f64> {
    let num = integrated(numerator, inputs, process, q2min, q2max, epsrel)?;
    if num == 0.0 {
        return Ok(0.0);
    }
    let den = integrated(denominator, inputs, process, q2min, q2max, epsrel)?;
    Ok(num / den)
}

/// Same observable integrated for two lepton flavours, `numerator_lepton` over
/// `denominator_lepton`.
#[allow(clippy::too_many_arguments)]
pub fn lepton_flavour_ratio(
    observable: &dyn PointObservable,
    inputs: &Inputs<'_>,
    process: &Process,
    numerator_lepton: Lepton,
    denominator_lepton: Lepton,
    q2min: f64,
    q2max: f64,
    epsrel: f64,
) -> Result<f64> {
    let num = integrated(
        observable,
        inputs,
        &process.with_lepton(numerator_lepton),
        q2min,
        q2max,
        epsrel,
    )?;
    if num == 0.0 {
        return Ok(0.0);
    }
    let den = integrated(
        observable,
        inputs,
        &process.with_lepton(denominator_lepton),
        q2min,
        q2max,
        epsrel,
    )?;
    Ok(num / den)
}

/// dBR/dq², the (time-integrated) CP-averaged rate times the lifetime of the B meson.
pub fn branching_ratio_differential(inputs: &Inputs<'_>, process: &Process, q2: f64) -> Result<f64> {
    let tau = inputs.par.get(&process.b.lifetime_key())?;
    Ok(tau * Quantity::AveragedRate.at(inputs, process, q2)?)
}

/// dBR/dq² averaged over the bin, i.e. divided by its width.
pub fn branching_ratio_integrated(
    inputs: &Inputs<'_>,
    process: &Process,
    q2min: f64,
    q2max: f64,
    epsrel: f64,
) -> Result<f64> {
    let dbrdq2 = integrated(
        &branching_ratio_differential,
        inputs,
        process,
        q2min,
        q2max,
        epsrel,
    )?;
    Ok(dbrdq2 / (q2max - q2min))
}

/// P'_i in the experiment convention at one q², zero outside the physical window.
pub fn pprime_differential(
    inputs: &Inputs<'_>,
    process: &Process,
    index: PPrimeIndex,
    q2: f64,
) -> Result<f64> {
    match coefficients(inputs, process, q2)? {
        None => Ok(0.0),
        Some(CoefficientSet::Prompt { j, j_bar }) => angular::pprime_experiment(&j, &j_bar, index),
        Some(set) => {
            let den = set.sa_denominator();
            let s = set.s_numerator(Convention::Experiment, index.s_index()) / den;
            Ok(s / angular::pprime_normalisation(set.fl_numerator() / den)?)
        }
    }
}

/// Binned P'_i: `<S> / sqrt(<F_L> (1 - <F_L>))` with binned S and F_L.
pub fn pprime_integrated(
    inputs: &Inputs<'_>,
    process: &Process,
    index: PPrimeIndex,
    q2min: f64,
    q2max: f64,
    epsrel: f64,
) -> Result<f64> {
    let s = ratio_integrated(
        &Quantity::SNumerator(Convention::Experiment, index.s_index()),
        &Quantity::SaDenominator,
        inputs,
        process,
        q2min,
        q2max,
        epsrel,
    )?;
    if s == 0.0 {
        return Ok(0.0);
    }
    let fl = ratio_integrated(
        &Quantity::FlNumerator,
        &Quantity::SaDenominator,
        inputs,
        process,
        q2min,
        q2max,
        epsrel,
    )?;
    Ok(s / angular::pprime_normalisation(fl)?)
}

/// Branching ratio over the q² range of the LHCb Bs -> K*0 mu mu measurement
/// (arXiv:1804.07167), including the correction `delta_BsKstarmumu`.
pub fn lhcb_branching_ratio(inputs: &Inputs<'_>, process: &Process) -> Result<f64> {
    let (q2min, q2max) = LHCB_BSKSTAR_Q2;
    let delta = inputs.par.get("delta_BsKstarmumu")?;
    let quiet = inputs.config.without_resonance_warnings();
    let inputs = inputs.with_config(&quiet);
    let averaged =
        branching_ratio_integrated(&inputs, process, q2min, q2max, inputs.config.epsrel_mixing)?;
    Ok((1.0 + delta) * averaged * (q2max - q2min))
}
