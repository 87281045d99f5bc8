//! Scalar quantities computed from the angular coefficients at one q² point.
//!
//! Binned observables are ratios of q² integrals of these quantities, so every
//! normalised observable is split into a numerator and a denominator here.

use serde_derive::{Deserialize, Serialize};

use super::combinators::{coefficients, Inputs};
use crate::error::Result;
use crate::process::Process;
use crate::theory::angular::{self, AngularCoefficients, AngularIndex, Convention};
use crate::theory::mixing::TimeIntegrated;

/// Angular coefficients at one q² inside the physical window.
#[derive(Debug, Clone, PartialEq)]
pub enum CoefficientSet {
    Prompt {
        j: AngularCoefficients,
        j_bar: AngularCoefficients,
    },
    Mixing(TimeIntegrated),
}

impl CoefficientSet {
    pub fn averaged_rate(&self) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::averaged_rate(j, j_bar),
            CoefficientSet::Mixing(t) => t.averaged_rate(),
        }
    }

    pub fn sa_denominator(&self) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::sa_denominator(j, j_bar),
            CoefficientSet::Mixing(t) => t.sa_denominator(),
        }
    }

    pub fn p_denominator(&self) -> f64 {
        self.s_numerator(Convention::Theory, AngularIndex::I2s)
    }

    pub fn s_numerator(&self, convention: Convention, index: AngularIndex) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::s_numerator(convention, j, j_bar, index),
            CoefficientSet::Mixing(t) => t.s_numerator(convention, index),
        }
    }

    pub fn a_numerator(&self, convention: Convention, index: AngularIndex) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::a_numerator(convention, j, j_bar, index),
            CoefficientSet::Mixing(t) => t.a_numerator(convention, index),
        }
    }

    pub fn fl_numerator(&self) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::fl_numerator(j, j_bar),
            CoefficientSet::Mixing(t) => t.fl_numerator(),
        }
    }

    pub fn fl_hat_numerator(&self) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::fl_hat_numerator(j, j_bar),
            CoefficientSet::Mixing(t) => t.fl_hat_numerator(),
        }
    }

    pub fn afb_numerator(&self, convention: Convention) -> f64 {
        match self {
            CoefficientSet::Prompt { j, j_bar } => angular::afb_numerator(convention, j, j_bar),
            CoefficientSet::Mixing(t) => t.afb_numerator(convention),
        }
    }
}

/// One numerator or denominator, evaluated on a [`CoefficientSet`].
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantity {
    AveragedRate,
    SaDenominator,
    PDenominator,
    SNumerator(Convention, AngularIndex),
    ANumerator(Convention, AngularIndex),
    FlNumerator,
    FlHatNumerator,
    AfbNumerator(Convention),
    /// `S_3 / 2` in the experiment convention.
    P1Numerator,
    /// `A_9 / 2` in the experiment convention.
    AtImNumerator,
    /// `A_6s / 4` in the experiment convention.
    AtReNumerator,
}

impl Quantity {
    pub fn evaluate(self, set: &CoefficientSet) -> f64 {
        use AngularIndex::*;
        use Convention::Experiment;
        match self {
            Quantity::AveragedRate => set.averaged_rate(),
            Quantity::SaDenominator => set.sa_denominator(),
            Quantity::PDenominator => set.p_denominator(),
            Quantity::SNumerator(convention, index) => set.s_numerator(convention, index),
            Quantity::ANumerator(convention, index) => set.a_numerator(convention, index),
            Quantity::FlNumerator => set.fl_numerator(),
            Quantity::FlHatNumerator => set.fl_hat_numerator(),
            Quantity::AfbNumerator(convention) => set.afb_numerator(convention),
            Quantity::P1Numerator => set.s_numerator(Experiment, I3) / 2.0,
            Quantity::AtImNumerator => set.a_numerator(Experiment, I9) / 2.0,
            Quantity::AtReNumerator => set.a_numerator(Experiment, I6s) / 4.0,
        }
    }
}

/// Anything that yields a number for a decay at a given q².
pub trait PointObservable: Send + Sync {
    fn at(&self, inputs: &Inputs<'_>, process: &Process, q2: f64) -> Result<f64>;
}

impl PointObservable for Quantity {
    /// Zero outside the physical q² window.
    fn at(&self, inputs: &Inputs<'_>, process: &Process, q2: f64) -> Result<f64> {
        Ok(coefficients(inputs, process, q2)?
            .map(|set| self.evaluate(&set))
            .unwrap_or(0.0))
    }
}

impl<F> PointObservable for F
where
    F: Fn(&Inputs<'_>, &Process, f64) -> Result<f64> + Send + Sync,
{
    fn at(&self, inputs: &Inputs<'_>, process: &Process, q2: f64) -> Result<f64> {
        self(inputs, process, q2)
    }
}

#[cfg(test)]
fn prompt_sample() -> CoefficientSet {
    use AngularIndex::*;
    let j = AngularCoefficients::from_pairs([
        (I1s, 1.2),
        (I1c, 0.9),
        (I2s, 0.4),
        (I2c, -0.9),
        (I3, 0.05),
        (I6s, 0.3),
        (I9, 0.02),
    ]);
    let j_bar = AngularCoefficients::from_pairs([
        (I1s, 1.1),
        (I1c, 0.95),
        (I2s, 0.35),
        (I2c, -0.95),
        (I3, 0.07),
        (I6s, 0.2),
        (I9, -0.01),
    ]);
    CoefficientSet::Prompt { j, j_bar }
}

#[test]
fn test_prompt_quantities_match_angular_module() {
    use AngularIndex::*;
    let set = prompt_sample();
    let CoefficientSet::Prompt { j, j_bar } = &set else {
        unreachable!()
    };

    assert_eq!(Quantity::SaDenominator.evaluate(&set), angular::sa_denominator(j, j_bar));
    assert_eq!(
        Quantity::FlNumerator.evaluate(&set) / Quantity::SaDenominator.evaluate(&set),
        angular::fl(j, j_bar)
    );
    assert_eq!(
        Quantity::AfbNumerator(Convention::Experiment).evaluate(&set),
        -Quantity::AfbNumerator(Convention::Theory).evaluate(&set)
    );
    assert!((Quantity::PDenominator.evaluate(&set) - 0.75).abs() < 1e-15);
    assert!((Quantity::P1Numerator.evaluate(&set) - 0.06).abs() < 1e-15);
    // 9 flips sign in the experiment convention
    assert!((Quantity::AtImNumerator.evaluate(&set) + 0.015).abs() < 1e-15);
    assert!((Quantity::AtReNumerator.evaluate(&set) + 0.025).abs() < 1e-15);
    assert_eq!(
        Quantity::ANumerator(Convention::Theory, I6s).evaluate(&set),
        j[I6s] - j_bar[I6s]
    );
}

#[test]
fn test_mixing_without_width_splitting_matches_prompt() {
    use AngularIndex::*;
    let prompt = prompt_sample();
    let CoefficientSet::Prompt { j, j_bar } = prompt.clone() else {
        unreachable!()
    };
    let mixing = CoefficientSet::Mixing(TimeIntegrated::new(0.0, j, j_bar, AngularCoefficients::zero()));

    let quantities = [
        Quantity::AveragedRate,
        Quantity::SaDenominator,
        Quantity::PDenominator,
        Quantity::SNumerator(Convention::Experiment, I4),
        Quantity::ANumerator(Convention::Experiment, I9),
        Quantity::FlNumerator,
        Quantity::FlHatNumerator,
        Quantity::AfbNumerator(Convention::Theory),
        Quantity::P1Numerator,
        Quantity::AtImNumerator,
        Quantity::AtReNumerator,
    ];
    for quantity in quantities {
        let (a, b) = (quantity.evaluate(&prompt), quantity.evaluate(&mixing));
        assert!((a - b).abs() < 1e-12, "{quantity:?}: {a} vs {b}");
    }
}
