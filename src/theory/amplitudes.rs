use std::collections::BTreeMap;

use num_complex::Complex64;
use serde_derive::{Deserialize, Serialize};

/// Helicity of the dilepton system.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Helicity {
    Zero,
    Plus,
    Minus,
    Time,
}

/// Lepton current the amplitude couples to.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Current {
    V,
    A,
}

/// Key of one helicity amplitude.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AmplitudeLabel {
    Helicity(Helicity, Current),
    Scalar,
    Pseudoscalar,
}

/// Complex helicity amplitudes at one q², as returned by an amplitude provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelicityAmplitudes(BTreeMap<AmplitudeLabel, Complex64>);

impl HelicityAmplitudes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing amplitudes are zero.
    pub fn get(&self, label: AmplitudeLabel) -> Complex64 {
        self.0.get(&label).copied().unwrap_or_default()
    }

    pub fn insert(&mut self, label: AmplitudeLabel, value: Complex64) -> Option<Complex64> {
        self.0.insert(label, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AmplitudeLabel, &Complex64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The "tilde" amplitudes entering the J_h interference term: transverse helicities
    /// exchanged and the scalar amplitude negated. Applied to the CP-conjugate amplitudes.
    pub fn tilde(&self) -> Self {
        let mut tilde = self.clone();
        for current in [Current::V, Current::A] {
            let plus = AmplitudeLabel::Helicity(Helicity::Plus, current);
            let minus = AmplitudeLabel::Helicity(Helicity::Minus, current);
            // Pairs absent on both sides stay absent.
            match (self.0.get(&plus).copied(), self.0.get(&minus).copied()) {
                (None, None) => {}
                (p, m) => {
                    tilde.0.insert(plus, m.unwrap_or_default());
                    tilde.0.insert(minus, p.unwrap_or_default());
                }
            }
        }
        if let Some(scalar) = self.0.get(&AmplitudeLabel::Scalar) {
            tilde.0.insert(AmplitudeLabel::Scalar, -scalar);
        }
        tilde
    }
}

impl FromIterator<(AmplitudeLabel, Complex64)> for HelicityAmplitudes {
    fn from_iter<I: IntoIterator<Item = (AmplitudeLabel, Complex64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Weak phase entering J_h, `phi = arg(-q/p)`.
pub fn mixing_phase(q_over_p: Complex64) -> f64 {
    (-q_over_p).arg()
}

#[cfg(test)]
fn transverse(helicity: Helicity, current: Current) -> AmplitudeLabel {
    AmplitudeLabel::Helicity(helicity, current)
}

#[test]
fn test_tilde_swaps_transverse_and_negates_scalar() {
    let h_bar: HelicityAmplitudes = [
        (transverse(Helicity::Plus, Current::V), Complex64::new(1.0, 0.5)),
        (transverse(Helicity::Minus, Current::V), Complex64::new(-2.0, 0.0)),
        (transverse(Helicity::Plus, Current::A), Complex64::new(0.0, 3.0)),
        (transverse(Helicity::Zero, Current::A), Complex64::new(4.0, 0.0)),
        (AmplitudeLabel::Scalar, Complex64::new(0.25, -0.25)),
        (AmplitudeLabel::Pseudoscalar, Complex64::new(0.5, 0.0)),
    ]
    .into_iter()
    .collect();

    let tilde = h_bar.tilde();

    assert_eq!(tilde.get(transverse(Helicity::Plus, Current::V)), Complex64::new(-2.0, 0.0));
    assert_eq!(tilde.get(transverse(Helicity::Minus, Current::V)), Complex64::new(1.0, 0.5));
    assert_eq!(tilde.get(transverse(Helicity::Plus, Current::A)), Complex64::new(0.0, 0.0));
    assert_eq!(tilde.get(transverse(Helicity::Minus, Current::A)), Complex64::new(0.0, 3.0));
    assert_eq!(tilde.get(transverse(Helicity::Zero, Current::A)), Complex64::new(4.0, 0.0));
    assert_eq!(tilde.get(AmplitudeLabel::Scalar), Complex64::new(-0.25, 0.25));
    assert_eq!(tilde.get(AmplitudeLabel::Pseudoscalar), Complex64::new(0.5, 0.0));
    assert_eq!(tilde.len(), 7);

    // Applying it twice restores the input, up to the explicit zero it filled in
    let mut expected = h_bar.clone();
    expected.insert(transverse(Helicity::Minus, Current::A), Complex64::new(0.0, 0.0));
    assert_eq!(tilde.tilde(), expected);
}

#[test]
fn test_mixing_phase() {
    // SM-like q/p close to -e^{-i phi_s}
    let phi_s: f64 = 0.037;
    let q_over_p = -Complex64::from_polar(1.0, -phi_s);
    assert!((mixing_phase(q_over_p) + phi_s).abs() < 1e-15);
}
