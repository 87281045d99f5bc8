/// This module contains the angular-coefficient algebra and the traits an external theory
/// has to implement, e.g. a form-factor based helicity amplitude calculation, for the
/// observables to be predicted.
pub mod amplitudes;
pub mod angular;
pub mod mixing;

use num_complex::Complex64;

use crate::error::Result;
use crate::process::{Meson, Process};
use crate::utils::params::{Parameters, WilsonCoefficients};
use amplitudes::HelicityAmplitudes;
use angular::AngularCoefficients;

/// Masses entering the angular coefficients of one decay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DecayMasses {
    pub m_b: f64,
    pub m_v: f64,
    /// Running mass of the heavy quark at the renormalization scale.
    pub m_quark: f64,
    /// Mass of the light quark, zero in the massless limit.
    pub m_quark_light: f64,
    pub m_lepton_1: f64,
    pub m_lepton_2: f64,
}

/// Produces the helicity amplitudes of a decay and of its CP conjugate.
///
/// Implementations must be side-effect free, predictions are evaluated concurrently.
pub trait AmplitudeProvider: Send + Sync {
    fn helicity_amplitudes(
        &self,
        q2: f64,
        wc: &WilsonCoefficients,
        par: &Parameters,
        process: &Process,
        scale: f64,
    ) -> Result<HelicityAmplitudes>;

    fn helicity_amplitudes_bar(
        &self,
        q2: f64,
        wc: &WilsonCoefficients,
        par: &Parameters,
        process: &Process,
        scale: f64,
    ) -> Result<HelicityAmplitudes>;
}

/// Turns helicity amplitudes into angular coefficients.
pub trait AngularCoefficientBuilder: Send + Sync {
    fn angular_coefficients(
        &self,
        h: &HelicityAmplitudes,
        q2: f64,
        masses: &DecayMasses,
    ) -> Result<AngularCoefficients>;

    /// The interference set J_h of a meson with width splitting, built from the
    /// amplitudes `h`, the tilde amplitudes of the CP conjugate and the weak phase `phi`.
    fn interference_coefficients(
        &self,
        phi: f64,
        h: &HelicityAmplitudes,
        h_tilde: &HelicityAmplitudes,
        q2: f64,
        masses: &DecayMasses,
    ) -> Result<AngularCoefficients>;
}

/// Meson mixing, only queried for mesons with width splitting.
pub trait MixingPhase: Send + Sync {
    fn q_over_p(&self, wc: &WilsonCoefficients, par: &Parameters, meson: Meson) -> Result<Complex64>;
}

pub trait RunningMass: Send + Sync {
    /// b quark mass at `scale`. Defaults to the fixed parameter `m_b`.
    fn quark_mass(&self, par: &Parameters, _scale: f64) -> Result<f64> {
        par.get("m_b")
    }
}

/// Everything the observables need from the outside.
pub trait Theory: AmplitudeProvider + AngularCoefficientBuilder + MixingPhase + RunningMass {}

impl<T> Theory for T where T: AmplitudeProvider + AngularCoefficientBuilder + MixingPhase + RunningMass
{}
