//! Time-integrated observables for a meson with a sizable width difference between
//! its mass eigenstates (Bs), following arXiv:1502.05509.
//!
//! Every quantity combines J, J̄ and the interference term J_h with the normalised
//! width difference `y = ΔΓ / (2Γ)`. At `y = 0` the formulas reduce to the prompt
//! ones in [`crate::theory::angular`].

use super::angular::{decay_rate, AngularCoefficients, AngularIndex, Convention};

/// Physical q² window `4 m_l² <= q² <= (m_B - m_V)²`.
///
/// Outside the window every observable is exactly zero and the amplitudes must not be
/// evaluated.
pub fn in_physical_window(q2: f64, m_lepton: f64, m_b: f64, m_v: f64) -> bool {
    !(q2 < 4.0 * m_lepton.powi(2) || q2 > (m_b - m_v).powi(2))
}

/// The three coefficient sets of a meson with width splitting, at fixed q².
#[derive(Debug, Clone, PartialEq)]
pub struct TimeIntegrated {
    pub y: f64,
    pub j: AngularCoefficients,
    pub j_bar: AngularCoefficients,
    pub j_h: AngularCoefficients,
}

impl TimeIntegrated {
    pub fn new(
        y: f64,
        j: AngularCoefficients,
        j_bar: AngularCoefficients,
        j_h: AngularCoefficients,
    ) -> Self {
        Self { y, j, j_bar, j_h }
    }

    /// `1 / (1 - y²)`
    fn untagged(&self) -> f64 {
        (1.0 - self.y.powi(2)).recip()
    }

    /// Eq. (42) of arXiv:1502.05509.
    pub fn s_numerator(&self, convention: Convention, index: AngularIndex) -> f64 {
        let value = self.untagged() * (self.j[index] + self.j_bar[index])
            - self.y * self.untagged() * self.j_h[index];
        convention.apply(index, value)
    }

    pub fn a_numerator(&self, convention: Convention, index: AngularIndex) -> f64 {
        let value = self.untagged() * (self.j[index] - self.j_bar[index])
            - self.y * self.untagged() * self.j_h[index];
        convention.apply(index, value)
    }

    /// Sum of particle and antiparticle rates, eq. (48) of arXiv:1502.05509 before halving.
    pub fn decay_rate(&self) -> f64 {
        self.untagged() * (decay_rate(&self.j) + decay_rate(&self.j_bar))
            - self.y * self.untagged() * decay_rate(&self.j_h)
    }

    /// Time-integrated CP-averaged rate.
    pub fn averaged_rate(&self) -> f64 {
        self.decay_rate() / 2.0
    }

    pub fn sa_denominator(&self) -> f64 {
        2.0 * self.averaged_rate()
    }

    /// Denominator of P1, A_T^Im and A_T^Re, the undivided 2s numerator.
    pub fn p_denominator(&self) -> f64 {
        self.s_numerator(Convention::Theory, AngularIndex::I2s)
    }

    pub fn s(&self, convention: Convention, index: AngularIndex) -> f64 {
        self.s_numerator(convention, index) / self.sa_denominator()
    }

    pub fn a(&self, convention: Convention, index: AngularIndex) -> f64 {
        self.a_numerator(convention, index) / self.sa_denominator()
    }

    pub fn fl_numerator(&self) -> f64 {
        -self.s_numerator(Convention::Theory, AngularIndex::I2c)
    }

    pub fn fl(&self) -> f64 {
        self.fl_numerator() / self.sa_denominator()
    }

    pub fn fl_hat_numerator(&self) -> f64 {
        -self.s_numerator(Convention::Theory, AngularIndex::I1c)
    }

    pub fn afb_numerator(&self, convention: Convention) -> f64 {
        3.0 / 4.0 * self.s_numerator(convention, AngularIndex::I6s)
    }

    pub fn p1_numerator(&self) -> f64 {
        self.s_numerator(Convention::Experiment, AngularIndex::I3) / 2.0
    }

    pub fn at_im_numerator(&self) -> f64 {
        self.a_numerator(Convention::Experiment, AngularIndex::I9) / 2.0
    }

    pub fn at_re_numerator(&self) -> f64 {
        self.a_numerator(Convention::Experiment, AngularIndex::I6s) / 4.0
    }

    pub fn p1(&self) -> f64 {
        self.p1_numerator() / self.p_denominator()
    }

    pub fn at_im(&self) -> f64 {
        self.at_im_numerator() / self.p_denominator()
    }

    pub fn at_re(&self) -> f64 {
        self.at_re_numerator() / self.p_denominator()
    }
}

#[cfg(test)]
fn sample(scale: f64) -> AngularCoefficients {
    AngularCoefficients::from_pairs(
        AngularIndex::ALL
            .iter()
            .enumerate()
            .map(|(k, &index)| (index, scale * (1.0 + k as f64) / 7.0)),
    )
}

#[test]
fn test_physical_window() {
    // Bs -> phi mu mu
    let (ml, mb, mv) = (0.10566, 5.36689, 1.019461);
    assert!(!in_physical_window(0.04, ml, mb, mv));
    assert!(in_physical_window(4.0 * ml.powi(2), ml, mb, mv));
    assert!(in_physical_window(1.0, ml, mb, mv));
    assert!(in_physical_window((mb - mv).powi(2), ml, mb, mv));
    assert!(!in_physical_window(19.0, ml, mb, mv));
}

#[test]
fn test_time_integrated_rate() {
    let t = TimeIntegrated::new(0.5, sample(1.0), sample(2.0), sample(0.5));
    let expected = (decay_rate(&t.j) + decay_rate(&t.j_bar) - 0.5 * decay_rate(&t.j_h)) / 0.75;
    assert!((t.decay_rate() - expected).abs() < 1e-12);
    assert!((t.sa_denominator() - expected).abs() < 1e-12);
}

#[test]
fn test_p_denominator_is_undivided_2s_numerator() {
    let y = 0.064;
    let t = TimeIntegrated::new(y, sample(1.0), sample(1.1), sample(0.3));
    let i2s = AngularIndex::I2s;
    let expected = (t.j[i2s] + t.j_bar[i2s]) / (1.0 - y * y) - y * t.j_h[i2s] / (1.0 - y * y);
    assert!((t.p_denominator() - expected).abs() < 1e-12);
    assert!((t.p1() - t.s_numerator(Convention::Experiment, AngularIndex::I3) / 2.0 / expected).abs() < 1e-12);
}

#[test]
fn test_optimised_signs_follow_experiment_convention() {
    let t = TimeIntegrated::new(0.0, sample(1.0), sample(0.5), AngularCoefficients::zero());
    // J - J̄ > 0 for every index, 9 and 6s flip in the experiment convention
    assert!(t.at_im() < 0.0);
    assert!(t.at_re() < 0.0);
    // 3 does not flip
    assert!(t.p1() > 0.0);
}

#[cfg(test)]
mod properties {
    use super::*;
    use crate::theory::angular;
    use proptest::prelude::*;

    fn coefficients() -> impl Strategy<Value = AngularCoefficients> {
        prop::array::uniform12(0.1f64..10.0).prop_map(|values| {
            AngularCoefficients::from_pairs(AngularIndex::ALL.into_iter().zip(values))
        })
    }

    proptest! {
        #[test]
        fn zero_width_splitting_reproduces_prompt_observables(j in coefficients(), j_bar in coefficients()) {
            let t = TimeIntegrated::new(0.0, j, j_bar, AngularCoefficients::zero());

            prop_assert!((t.sa_denominator() - angular::sa_denominator(&j, &j_bar)).abs() < 1e-12 * angular::sa_denominator(&j, &j_bar).abs().max(1.0));
            let reference_fl = angular::fl(&j, &j_bar);
            prop_assert!((t.fl() - reference_fl).abs() < 1e-12 * reference_fl.abs().max(1.0));

            for convention in [Convention::Theory, Convention::Experiment] {
                for index in AngularIndex::ALL {
                    let s_ref = angular::s(convention, &j, &j_bar, index);
                    let a_ref = angular::a(convention, &j, &j_bar, index);
                    prop_assert!((t.s(convention, index) - s_ref).abs() < 1e-12 * s_ref.abs().max(1.0));
                    prop_assert!((t.a(convention, index) - a_ref).abs() < 1e-12 * a_ref.abs().max(1.0));
                }
            }
        }
    }
}
