#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use bvll_observables::observables::Inputs;
use bvll_observables::process::{Meson, Process};
use bvll_observables::theory::amplitudes::{AmplitudeLabel, Current, Helicity, HelicityAmplitudes};
use bvll_observables::theory::angular::{AngularCoefficients, AngularIndex};
use bvll_observables::theory::{
    AmplitudeProvider, AngularCoefficientBuilder, DecayMasses, MixingPhase, RunningMass,
};
use bvll_observables::utils::params::{Parameters, WilsonCoefficients};
use bvll_observables::{PredictionConfig, Result};
use num_complex::Complex64;

pub const PHI_S: f64 = 0.037;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// q²-independent amplitudes built from `C9_<sector>` and `C10_<sector>`, so that every
/// binned quantity is its point value times the bin width.
#[derive(Debug, Default)]
pub struct ToyTheory {
    calls: AtomicUsize,
}

impl ToyTheory {
    pub fn amplitude_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

fn label(helicity: Helicity, current: Current) -> AmplitudeLabel {
    AmplitudeLabel::Helicity(helicity, current)
}

fn toy_amplitudes(wc: &WilsonCoefficients, process: &Process, conjugate: bool) -> HelicityAmplitudes {
    let c9 = wc.get(&format!("C9_{}", process.sector()));
    let c10 = wc.get(&format!("C10_{}", process.sector()));
    let (c9, c10) = if conjugate {
        (c9.conj(), c10.conj())
    } else {
        (c9, c10)
    };
    [
        (label(Helicity::Zero, Current::V), c9),
        (label(Helicity::Plus, Current::V), 0.5 * c9),
        (label(Helicity::Minus, Current::V), c9 - c10),
        (label(Helicity::Plus, Current::A), c10),
        (AmplitudeLabel::Scalar, 0.1 * c10),
    ]
    .into_iter()
    .collect()
}

impl AmplitudeProvider for ToyTheory {
    fn helicity_amplitudes(
        &self,
        _q2: f64,
        wc: &WilsonCoefficients,
        _par: &Parameters,
        process: &Process,
        _scale: f64,
    ) -> Result<HelicityAmplitudes> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(toy_amplitudes(wc, process, false))
    }

    fn helicity_amplitudes_bar(
        &self,
        _q2: f64,
        wc: &WilsonCoefficients,
        _par: &Parameters,
        process: &Process,
        _scale: f64,
    ) -> Result<HelicityAmplitudes> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(toy_amplitudes(wc, process, true))
    }
}

impl AngularCoefficientBuilder for ToyTheory {
    fn angular_coefficients(
        &self,
        h: &HelicityAmplitudes,
        _q2: f64,
        _masses: &DecayMasses,
    ) -> Result<AngularCoefficients> {
        use AngularIndex::*;
        let zero = h.get(label(Helicity::Zero, Current::V));
        let plus = h.get(label(Helicity::Plus, Current::V));
        let minus = h.get(label(Helicity::Minus, Current::V));
        let axial = h.get(label(Helicity::Plus, Current::A));

        let j1s = plus.norm_sqr() + minus.norm_sqr();
        let j1c = zero.norm_sqr();
        Ok(AngularCoefficients::from_pairs([
            (I1s, j1s),
            (I1c, j1c),
            (I2s, j1s / 3.0),
            (I2c, -j1c),
            (I3, (plus * minus.conj()).re),
            (I4, (zero * plus.conj()).re),
            (I5, (zero * minus.conj()).re),
            (I6s, (plus * axial.conj()).re),
            (I7, (zero * plus.conj()).im),
            (I8, (zero * minus.conj()).im),
            (I9, (plus * minus.conj()).im),
        ]))
    }

    fn interference_coefficients(
        &self,
        phi: f64,
        h: &HelicityAmplitudes,
        h_tilde: &HelicityAmplitudes,
        _q2: f64,
        _masses: &DecayMasses,
    ) -> Result<AngularCoefficients> {
        use AngularIndex::*;
        let rotation = Complex64::from_polar(1.0, phi);
        let bilinear = |helicity| {
            let l = label(helicity, Current::V);
            2.0 * (rotation * h.get(l) * h_tilde.get(l).conj()).re
        };
        let j1s = bilinear(Helicity::Plus) + bilinear(Helicity::Minus);
        let j1c = bilinear(Helicity::Zero);
        Ok(AngularCoefficients::from_pairs([
            (I1s, j1s),
            (I1c, j1c),
            (I2s, j1s / 3.0),
            (I2c, -j1c),
        ]))
    }
}

impl MixingPhase for ToyTheory {
    fn q_over_p(&self, _wc: &WilsonCoefficients, _par: &Parameters, _meson: Meson) -> Result<Complex64> {
        Ok(-Complex64::from_polar(1.0, -PHI_S))
    }
}

impl RunningMass for ToyTheory {}

pub fn parameters() -> Parameters {
    [
        ("m_e", 0.000511),
        ("m_mu", 0.10566),
        ("m_tau", 1.77686),
        ("m_B0", 5.27965),
        ("m_B+", 5.27934),
        ("m_Bs", 5.36688),
        ("m_K*0", 0.89555),
        ("m_K*+", 0.89166),
        ("m_phi", 1.019461),
        ("m_b", 4.18),
        ("tau_B0", 2.3e12),
        ("tau_B+", 2.5e12),
        ("tau_Bs", 2.3e12),
        ("DeltaGamma/Gamma_Bs", 0.128),
        ("delta_BsKstarmumu", 0.1),
    ]
    .into_iter()
    .collect()
}

pub fn wilson_coefficients() -> WilsonCoefficients {
    [
        ("C9_bsmumu", Complex64::new(4.2, 0.3)),
        ("C10_bsmumu", Complex64::new(-4.1, 0.0)),
        ("C9_bsee", Complex64::new(4.0, 0.0)),
        ("C10_bsee", Complex64::new(-4.1, 0.0)),
        ("C9_bstautau", Complex64::new(4.2, 0.3)),
        ("C10_bstautau", Complex64::new(-4.1, 0.0)),
        ("C9_bdmumu", Complex64::new(4.2, -0.2)),
        ("C10_bdmumu", Complex64::new(-4.1, 0.1)),
    ]
    .into_iter()
    .collect()
}

pub fn toy_masses(par: &Parameters, process: &Process) -> DecayMasses {
    let m_lepton = par.get(&process.lepton.mass_key()).unwrap();
    DecayMasses {
        m_b: par.get(&process.b.mass_key()).unwrap(),
        m_v: par.get(&process.v.mass_key()).unwrap(),
        m_quark: par.get("m_b").unwrap(),
        m_quark_light: 0.0,
        m_lepton_1: m_lepton,
        m_lepton_2: m_lepton,
    }
}

/// Toy theory with the default parameters and Wilson coefficients.
pub struct Fixture {
    pub theory: ToyTheory,
    pub wc: WilsonCoefficients,
    pub par: Parameters,
    pub config: PredictionConfig,
}

impl Fixture {
    pub fn new() -> Self {
        init_logging();
        Self {
            theory: ToyTheory::default(),
            wc: wilson_coefficients(),
            par: parameters(),
            config: PredictionConfig::default(),
        }
    }

    pub fn inputs(&self) -> Inputs<'_> {
        Inputs::new(&self.theory, &self.wc, &self.par, &self.config)
    }
}
