use std::collections::BTreeMap;
use std::fmt;

use serde_derive::{Deserialize, Serialize};

use super::combinators::{self, Inputs};
use super::quantity::Quantity;
use crate::config::PredictionConfig;
use crate::error::{ObservableError, Result};
use crate::process::{Lepton, Process};
use crate::theory::angular::PPrimeIndex;

/// Arguments an observable is evaluated at.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    /// No kinematic argument, e.g. a branching ratio over a fixed q² range.
    Fixed,
    /// `q2`
    Point,
    /// `q2min, q2max`
    Bin,
}

impl Arity {
    pub fn argument_names(self) -> &'static [&'static str] {
        match self {
            Arity::Fixed => &[],
            Arity::Point => &["q2"],
            Arity::Bin => &["q2min", "q2max"],
        }
    }

    pub fn len(self) -> usize {
        self.argument_names().len()
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.argument_names().join(", "))
    }
}

/// Which relative tolerance of [`PredictionConfig`] a binned prediction uses.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tolerance {
    Prompt,
    Mixing,
    LeptonFlavour,
}

impl Tolerance {
    pub fn epsrel(self, config: &PredictionConfig) -> f64 {
        match self {
            Tolerance::Prompt => config.epsrel,
            Tolerance::Mixing => config.epsrel_mixing,
            Tolerance::LeptonFlavour => config.epsrel_lepton_flavour,
        }
    }
}

/// How an observable is computed. Each variant names the combinator it dispatches to
/// together with the decay it is bound to.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
    Ratio {
        numerator: Quantity,
        denominator: Quantity,
        process: Process,
    },
    BinnedRatio {
        numerator: Quantity,
        denominator: Quantity,
        process: Process,
        tolerance: Tolerance,
    },
    PPrime {
        index: PPrimeIndex,
        process: Process,
    },
    BinnedPPrime {
        index: PPrimeIndex,
        process: Process,
        tolerance: Tolerance,
    },
    BranchingRatio {
        process: Process,
    },
    BinnedBranchingRatio {
        process: Process,
        tolerance: Tolerance,
    },
    /// Binned `quantity` of `process` divided by the same for `denominator_lepton`.
    LeptonFlavourRatio {
        quantity: Quantity,
        process: Process,
        denominator_lepton: Lepton,
        tolerance: Tolerance,
    },
    LhcbBranchingRatio {
        process: Process,
    },
}

impl Prediction {
    pub fn arity(&self) -> Arity {
        match self {
            Prediction::Ratio { .. } | Prediction::PPrime { .. } | Prediction::BranchingRatio { .. } => {
                Arity::Point
            }
            Prediction::BinnedRatio { .. }
            | Prediction::BinnedPPrime { .. }
            | Prediction::BinnedBranchingRatio { .. }
            | Prediction::LeptonFlavourRatio { .. } => Arity::Bin,
            Prediction::LhcbBranchingRatio { .. } => Arity::Fixed,
        }
    }

    /// `args` must already match [`Prediction::arity`].
    fn evaluate(&self, inputs: &Inputs<'_>, args: &[f64]) -> Result<f64> {
        let config = inputs.config;
        match *self {
            Prediction::Ratio {
                numerator,
                denominator,
                process,
            } => combinators::ratio_differential(&numerator, &denominator, inputs, &process, args[0]),
            Prediction::BinnedRatio {
                numerator,
                denominator,
                process,
                tolerance,
            } => combinators::ratio_integrated(
                &numerator,
                &denominator,
                inputs,
                &process,
                args[0],
                args[1],
                tolerance.epsrel(config),
            ),
            Prediction::PPrime { index, process } => {
                combinators::pprime_differential(inputs, &process, index, args[0])
            }
            Prediction::BinnedPPrime {
                index,
                process,
                tolerance,
            } => combinators::pprime_integrated(
                inputs,
                &process,
                index,
                args[0],
                args[1],
                tolerance.epsrel(config),
            ),
            Prediction::BranchingRatio { process } => {
                combinators::branching_ratio_differential(inputs, &process, args[0])
            }
            Prediction::BinnedBranchingRatio { process, tolerance } => {
                combinators::branching_ratio_integrated(
                    inputs,
                    &process,
                    args[0],
                    args[1],
                    tolerance.epsrel(config),
                )
            }
            Prediction::LeptonFlavourRatio {
                quantity,
                process,
                denominator_lepton,
                tolerance,
            } => combinators::lepton_flavour_ratio(
                &quantity,
                inputs,
                &process,
                process.lepton,
                denominator_lepton,
                args[0],
                args[1],
                tolerance.epsrel(config),
            ),
            Prediction::LhcbBranchingRatio { process } => {
                combinators::lhcb_branching_ratio(inputs, &process)
            }
        }
    }
}

/// A named, documented prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    pub name: String,
    pub description: String,
    /// Display label, in LaTeX math mode.
    pub tex: String,
    /// `::`-separated classification, one entry per process the observable belongs to.
    pub taxonomy: Vec<String>,
    pub prediction: Prediction,
}

impl Observable {
    pub fn arity(&self) -> Arity {
        self.prediction.arity()
    }

    /// Evaluates the prediction after checking the number of arguments.
    pub fn predict(&self, inputs: &Inputs<'_>, args: &[f64]) -> Result<f64> {
        let expected = self.arity().len();
        if args.len() != expected {
            return Err(ObservableError::ArityMismatch {
                name: self.name.clone(),
                expected,
                got: args.len(),
            });
        }
        self.prediction.evaluate(inputs, args)
    }
}

/// All observables known to a program, keyed by their unique name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    observables: BTreeMap<String, Observable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, observable: Observable) -> Result<()> {
        if self.observables.contains_key(&observable.name) {
            return Err(ObservableError::DuplicateObservable(observable.name));
        }
        self.observables.insert(observable.name.clone(), observable);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Observable> {
        self.observables
            .get(name)
            .ok_or_else(|| ObservableError::UnknownObservable(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.observables.contains_key(name)
    }

    pub fn predict(&self, name: &str, inputs: &Inputs<'_>, args: &[f64]) -> Result<f64> {
        self.get(name)?.predict(inputs, args)
    }

    pub fn len(&self) -> usize {
        self.observables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observables.is_empty()
    }

    /// Observables in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Observable> {
        self.observables.values()
    }

    /// Observables whose taxonomy contains `fragment`.
    pub fn by_taxonomy<'a>(&'a self, fragment: &'a str) -> impl Iterator<Item = &'a Observable> + 'a {
        self.iter()
            .filter(move |observable| observable.taxonomy.iter().any(|t| t.contains(fragment)))
    }
}

#[cfg(test)]
fn dummy(name: &str) -> Observable {
    use crate::process::Meson;
    Observable {
        name: name.to_owned(),
        description: String::from("Differential branching ratio"),
        tex: String::from(r"$\frac{dBR}{dq^2}$"),
        taxonomy: vec![String::from("Process :: test")],
        prediction: Prediction::BranchingRatio {
            process: Process::new(Meson::B0, Meson::KstarZero, Lepton::Mu),
        },
    }
}

#[test]
fn test_duplicate_names_are_rejected() {
    let mut registry = Registry::new();
    registry.insert(dummy("dBR/dq2(B0->K*mumu)")).unwrap();
    assert_eq!(
        registry.insert(dummy("dBR/dq2(B0->K*mumu)")),
        Err(ObservableError::DuplicateObservable(String::from("dBR/dq2(B0->K*mumu)")))
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unknown_name() {
    let registry = Registry::new();
    assert_eq!(
        registry.get("FL(B0->K*mumu)"),
        Err(ObservableError::UnknownObservable(String::from("FL(B0->K*mumu)")))
    );
}

#[test]
fn test_arity_argument_names() {
    assert_eq!(Arity::Point.argument_names(), ["q2"]);
    assert_eq!(Arity::Bin.len(), 2);
    assert!(Arity::Fixed.is_empty());
    assert_eq!(Arity::Bin.to_string(), "(q2min, q2max)");
}
