//! Observables built from the angular coefficients J and J̄ of a B -> V l+ l- decay
//! at fixed q².
//!
//! All functions are pure. The normalisation shared by S_i, A_i, F_L and A_FB is
//! `SA_den = 2 * <dΓ/dq²>`, twice the CP-averaged rate.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::constants::EXPERIMENT_SIGN_FLIPS;
use crate::error::{ObservableError, Result};

/// Label of one angular basis function.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AngularIndex {
    I1s,
    I1c,
    I2s,
    I2c,
    I3,
    I4,
    I5,
    I6s,
    I6c,
    I7,
    I8,
    I9,
}

impl AngularIndex {
    pub const ALL: [AngularIndex; 12] = [
        AngularIndex::I1s,
        AngularIndex::I1c,
        AngularIndex::I2s,
        AngularIndex::I2c,
        AngularIndex::I3,
        AngularIndex::I4,
        AngularIndex::I5,
        AngularIndex::I6s,
        AngularIndex::I6c,
        AngularIndex::I7,
        AngularIndex::I8,
        AngularIndex::I9,
    ];

    /// The label as written in the literature, e.g. `6s`.
    pub fn label(self) -> &'static str {
        match self {
            AngularIndex::I1s => "1s",
            AngularIndex::I1c => "1c",
            AngularIndex::I2s => "2s",
            AngularIndex::I2c => "2c",
            AngularIndex::I3 => "3",
            AngularIndex::I4 => "4",
            AngularIndex::I5 => "5",
            AngularIndex::I6s => "6s",
            AngularIndex::I6c => "6c",
            AngularIndex::I7 => "7",
            AngularIndex::I8 => "8",
            AngularIndex::I9 => "9",
        }
    }

    /// Whether the experiment convention flips the sign of this coefficient.
    pub fn flips_in_experiment(self) -> bool {
        EXPERIMENT_SIGN_FLIPS.contains(&self)
    }
}

impl fmt::Display for AngularIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AngularIndex {
    type Err = ObservableError;

    fn from_str(s: &str) -> Result<Self> {
        AngularIndex::ALL
            .iter()
            .copied()
            .find(|index| index.label() == s)
            .ok_or_else(|| ObservableError::UnknownAngularIndex(s.to_owned()))
    }
}

/// Integer labels only cover the indices without an s/c suffix.
impl TryFrom<u8> for AngularIndex {
    type Error = ObservableError;

    fn try_from(i: u8) -> Result<Self> {
        match i {
            3 => Ok(AngularIndex::I3),
            4 => Ok(AngularIndex::I4),
            5 => Ok(AngularIndex::I5),
            7 => Ok(AngularIndex::I7),
            8 => Ok(AngularIndex::I8),
            9 => Ok(AngularIndex::I9),
            _ => Err(ObservableError::UnknownAngularIndex(i.to_string())),
        }
    }
}

/// One set of angular coefficients at fixed q² (J, J̄ or the interference term J_h).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AngularCoefficients([f64; 12]);

impl AngularCoefficients {
    pub fn zero() -> Self {
        Self([0.0; 12])
    }

    /// Builds a set from `(index, value)` pairs, unspecified entries are zero.
    pub fn from_pairs<I: IntoIterator<Item = (AngularIndex, f64)>>(pairs: I) -> Self {
        let mut coefficients = Self::zero();
        for (index, value) in pairs {
            coefficients[index] = value;
        }
        coefficients
    }

    /// Lookup by textual label, e.g. `"6s"`.
    pub fn get(&self, label: &str) -> Result<f64> {
        Ok(self[label.parse::<AngularIndex>()?])
    }

    pub fn iter(&self) -> impl Iterator<Item = (AngularIndex, f64)> + '_ {
        AngularIndex::ALL.iter().map(move |&index| (index, self[index]))
    }
}

impl Index<AngularIndex> for AngularCoefficients {
    type Output = f64;

    fn index(&self, index: AngularIndex) -> &f64 {
        &self.0[index as usize]
    }
}

impl IndexMut<AngularIndex> for AngularCoefficients {
    fn index_mut(&mut self, index: AngularIndex) -> &mut f64 {
        &mut self.0[index as usize]
    }
}

/// Sign convention of the angular observables.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convention {
    /// Convention of the computed coefficients.
    Theory,
    /// LHCb convention, eq. (C.8) of arXiv:1506.03970v2.
    Experiment,
}

impl Convention {
    /// Applies the sign table to a numerator computed in the theory convention.
    pub fn apply(self, index: AngularIndex, theory_value: f64) -> f64 {
        match self {
            Convention::Experiment if index.flips_in_experiment() => -theory_value,
            _ => theory_value,
        }
    }
}

/// dΓ/dq² of a single set of coefficients.
pub fn decay_rate(j: &AngularCoefficients) -> f64 {
    use AngularIndex::*;
    3.0 / 4.0 * (2.0 * j[I1s] + j[I1c]) - 1.0 / 4.0 * (2.0 * j[I2s] + j[I2c])
}

/// CP-averaged rate.
pub fn averaged_rate(j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    (decay_rate(j) + decay_rate(j_bar)) / 2.0
}

pub fn sa_denominator(j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    2.0 * averaged_rate(j, j_bar)
}

pub fn s_numerator(
    convention: Convention,
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
    index: AngularIndex,
) -> f64 {
    convention.apply(index, j[index] + j_bar[index])
}

/// CP-averaged angular observable S_i.
pub fn s(
    convention: Convention,
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
    index: AngularIndex,
) -> f64 {
    s_numerator(convention, j, j_bar, index) / sa_denominator(j, j_bar)
}

pub fn a_numerator(
    convention: Convention,
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
    index: AngularIndex,
) -> f64 {
    convention.apply(index, j[index] - j_bar[index])
}

/// Angular CP asymmetry A_i.
pub fn a(
    convention: Convention,
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
    index: AngularIndex,
) -> f64 {
    a_numerator(convention, j, j_bar, index) / sa_denominator(j, j_bar)
}

pub fn fl_numerator(j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    -s_numerator(Convention::Theory, j, j_bar, AngularIndex::I2c)
}

/// Longitudinal polarization fraction F_L.
pub fn fl(j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    fl_numerator(j, j_bar) / sa_denominator(j, j_bar)
}

pub fn fl_hat_numerator(j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    -s_numerator(Convention::Theory, j, j_bar, AngularIndex::I1c)
}

/// F_L for vanishing lepton masses, eq. (32) of arXiv:1510.04239.
/// Only meaningful when the lepton mass can be neglected.
pub fn fl_hat(j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    fl_hat_numerator(j, j_bar) / sa_denominator(j, j_bar)
}

pub fn afb_numerator(
    convention: Convention,
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
) -> f64 {
    3.0 / 4.0 * s_numerator(convention, j, j_bar, AngularIndex::I6s)
}

/// Forward-backward asymmetry.
pub fn afb(convention: Convention, j: &AngularCoefficients, j_bar: &AngularCoefficients) -> f64 {
    afb_numerator(convention, j, j_bar) / sa_denominator(j, j_bar)
}

/// Index of an optimised observable P'_i.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum PPrimeIndex {
    P4,
    P5,
    P6,
    P8,
}

impl PPrimeIndex {
    pub const ALL: [PPrimeIndex; 4] = [
        PPrimeIndex::P4,
        PPrimeIndex::P5,
        PPrimeIndex::P6,
        PPrimeIndex::P8,
    ];

    /// The S_i entering the numerator of P'_i.
    pub fn s_index(self) -> AngularIndex {
        match self {
            PPrimeIndex::P4 => AngularIndex::I4,
            PPrimeIndex::P5 => AngularIndex::I5,
            PPrimeIndex::P6 => AngularIndex::I7,
            PPrimeIndex::P8 => AngularIndex::I8,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PPrimeIndex::P4 => 4,
            PPrimeIndex::P5 => 5,
            PPrimeIndex::P6 => 6,
            PPrimeIndex::P8 => 8,
        }
    }
}

impl TryFrom<u8> for PPrimeIndex {
    type Error = ObservableError;

    fn try_from(i: u8) -> Result<Self> {
        PPrimeIndex::ALL
            .iter()
            .copied()
            .find(|index| index.number() == i)
            .ok_or(ObservableError::UnsupportedPPrimeIndex(i))
    }
}

/// `sqrt(F_L (1 - F_L))`, rejecting values of F_L for which it vanishes or is not real.
pub fn pprime_normalisation(fl: f64) -> Result<f64> {
    let product = fl * (1.0 - fl);
    if product > 0.0 && product.is_finite() {
        Ok(product.sqrt())
    } else {
        Err(ObservableError::DegeneratePolarization(fl))
    }
}

/// Observable P'_i in the LHCb convention, eq. (C.9) of arXiv:1506.03970v2.
pub fn pprime_experiment(
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
    index: PPrimeIndex,
) -> Result<f64> {
    let denom = pprime_normalisation(fl(j, j_bar))?;
    Ok(s(Convention::Experiment, j, j_bar, index.s_index()) / denom)
}

/// Same as [`pprime_experiment`] for an untyped index, e.g. coming from user input.
pub fn pprime_experiment_by_number(
    j: &AngularCoefficients,
    j_bar: &AngularCoefficients,
    index: u8,
) -> Result<f64> {
    pprime_experiment(j, j_bar, PPrimeIndex::try_from(index)?)
}

#[cfg(test)]
fn massless_coefficients(j1s: f64, j1c: f64, rest: [f64; 8]) -> AngularCoefficients {
    use AngularIndex::*;
    let mut j = AngularCoefficients::from_pairs([
        (I1s, j1s),
        (I1c, j1c),
        (I2s, j1s / 3.0),
        (I2c, -j1c),
    ]);
    for (index, value) in [I3, I4, I5, I6s, I6c, I7, I8, I9].into_iter().zip(rest) {
        j[index] = value;
    }
    j
}

#[test]
fn test_decay_rate_formula() {
    use AngularIndex::*;
    let j = AngularCoefficients::from_pairs([(I1s, 1.0), (I1c, 2.0), (I2s, 0.5), (I2c, -1.0)]);
    // 3/4 * (2 + 2) - 1/4 * (1 - 1)
    assert_eq!(decay_rate(&j), 3.0);
}

#[test]
fn test_label_lookup() {
    let j = AngularCoefficients::from_pairs([(AngularIndex::I6s, 0.25)]);
    assert_eq!(j.get("6s").unwrap(), 0.25);
    assert_eq!(
        j.get("6x"),
        Err(ObservableError::UnknownAngularIndex(String::from("6x")))
    );
    assert_eq!(AngularIndex::try_from(7).unwrap(), AngularIndex::I7);
    assert!(AngularIndex::try_from(6).is_err());
}

#[test]
fn test_cp_symmetric_input_has_no_asymmetries() {
    use AngularIndex::*;
    let j = AngularCoefficients::from_pairs([(I1s, 1.0), (I1c, -2.0), (I2s, 0.1), (I2c, -0.2)]);
    let j_bar = j;

    for index in AngularIndex::ALL {
        assert_eq!(a_numerator(Convention::Theory, &j, &j_bar, index), 0.0);
        assert_eq!(a_numerator(Convention::Experiment, &j, &j_bar, index), 0.0);
    }
    assert_eq!(afb_numerator(Convention::Theory, &j, &j_bar), 0.0);
    assert_eq!(s_numerator(Convention::Theory, &j, &j_bar, I1s), 2.0);
    assert_eq!(fl_numerator(&j, &j_bar), 0.4);
    // This particular input has a vanishing rate.
    assert_eq!(sa_denominator(&j, &j_bar), 0.0);
}

#[test]
fn test_afb_conventions_differ_by_sign() {
    let j = massless_coefficients(1.0, 0.5, [0.1, 0.2, 0.3, 0.4, 0.0, 0.1, 0.2, 0.3]);
    let j_bar = massless_coefficients(0.9, 0.6, [0.1, 0.1, 0.2, 0.3, 0.0, 0.0, 0.1, 0.2]);
    let theory = afb(Convention::Theory, &j, &j_bar);
    let experiment = afb(Convention::Experiment, &j, &j_bar);
    assert!(theory != 0.0);
    assert_eq!(theory, -experiment);
}

#[test]
fn test_fl_for_massless_leptons() {
    let j = massless_coefficients(0.75, 1.0, [0.0; 8]);
    // rate = 4/3 * 0.75 + 1.0 = 2.0 for each of J and J̄
    assert!((fl(&j, &j) - 0.5).abs() < 1e-15);
    assert!((fl_hat(&j, &j) + 0.5).abs() < 1e-15);
}

#[test]
fn test_pprime_six_uses_s7() {
    use AngularIndex::*;
    let mut j = massless_coefficients(0.75, 1.0, [0.0; 8]);
    j[I7] = 0.3;
    let j_bar = j;
    let expected = s(Convention::Experiment, &j, &j_bar, I7) / (0.5_f64 * 0.5).sqrt();
    assert_eq!(pprime_experiment(&j, &j_bar, PPrimeIndex::P6).unwrap(), expected);
    assert_eq!(pprime_experiment_by_number(&j, &j_bar, 6).unwrap(), expected);
    // S_7 flips sign in the experiment convention
    assert!(expected < 0.0);
}

#[test]
fn test_pprime_rejects_unsupported_index() {
    let j = massless_coefficients(0.75, 1.0, [0.0; 8]);
    for i in [0, 1, 2, 3, 7, 9, 10] {
        assert_eq!(
            pprime_experiment_by_number(&j, &j, i),
            Err(ObservableError::UnsupportedPPrimeIndex(i))
        );
    }
}

#[test]
fn test_pprime_degenerate_polarization() {
    // Purely longitudinal: F_L = 1
    let longitudinal = massless_coefficients(0.0, 1.0, [0.0; 8]);
    assert_eq!(
        pprime_experiment(&longitudinal, &longitudinal, PPrimeIndex::P5),
        Err(ObservableError::DegeneratePolarization(1.0))
    );
    // Purely transverse: F_L = 0
    let transverse = massless_coefficients(1.0, 0.0, [0.0; 8]);
    assert!(matches!(
        pprime_experiment(&transverse, &transverse, PPrimeIndex::P4),
        Err(ObservableError::DegeneratePolarization(_))
    ));
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    fn coefficients() -> impl Strategy<Value = AngularCoefficients> {
        prop::array::uniform12(-10.0f64..10.0).prop_map(AngularCoefficients)
    }

    fn physical() -> impl Strategy<Value = AngularCoefficients> {
        (0.0f64..10.0, 0.0f64..10.0, prop::array::uniform8(-1.0f64..1.0))
            .prop_filter("non-vanishing rate", |(j1s, j1c, _)| j1s + j1c > 1e-6)
            .prop_map(|(j1s, j1c, rest)| massless_coefficients(j1s, j1c, rest))
    }

    proptest! {
        #[test]
        fn experiment_convention_is_a_sign_table(j in coefficients(), j_bar in coefficients()) {
            for index in AngularIndex::ALL {
                let theory = s(Convention::Theory, &j, &j_bar, index);
                let experiment = s(Convention::Experiment, &j, &j_bar, index);
                prop_assert_eq!(theory.abs().to_bits(), experiment.abs().to_bits());
                if index.flips_in_experiment() {
                    prop_assert_eq!(theory, -experiment);
                } else {
                    prop_assert_eq!(theory.to_bits(), experiment.to_bits());
                }
            }
        }

        #[test]
        fn fl_is_a_fraction(j in physical(), j_bar in physical()) {
            let value = fl(&j, &j_bar);
            prop_assert!((-1e-12..=1.0 + 1e-12).contains(&value), "F_L = {}", value);
        }
    }
}
