use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EPSREL, DEFAULT_EPSREL_LEPTON_FLAVOUR, DEFAULT_EPSREL_MIXING,
    DEFAULT_MAX_SUBDIVISIONS, DEFAULT_SCALE_BVLL,
};
use crate::utils::integrate::IntegrationOptions;

/// Settings shared by every prediction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Renormalization scale in GeV handed to the amplitude provider.
    pub scale_bvll: f64,
    /// Relative tolerance of q² integrals of prompt decays.
    pub epsrel: f64,
    /// Relative tolerance of q² integrals with width splitting.
    pub epsrel_mixing: f64,
    /// Relative tolerance of lepton flavour ratios with width splitting.
    pub epsrel_lepton_flavour: f64,
    pub max_subdivisions: usize,
    pub warn_resonances: bool,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            scale_bvll: DEFAULT_SCALE_BVLL,
            epsrel: DEFAULT_EPSREL,
            epsrel_mixing: DEFAULT_EPSREL_MIXING,
            epsrel_lepton_flavour: DEFAULT_EPSREL_LEPTON_FLAVOUR,
            max_subdivisions: DEFAULT_MAX_SUBDIVISIONS,
            warn_resonances: true,
        }
    }
}

impl PredictionConfig {
    /// Defaults overridden by `BVLL_*` variables from the environment or a `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        override_from_env("BVLL_SCALE", &mut config.scale_bvll);
        override_from_env("BVLL_EPSREL", &mut config.epsrel);
        override_from_env("BVLL_EPSREL_MIXING", &mut config.epsrel_mixing);
        override_from_env("BVLL_EPSREL_LFR", &mut config.epsrel_lepton_flavour);
        override_from_env("BVLL_MAX_SUBDIVISIONS", &mut config.max_subdivisions);
        override_from_env("BVLL_WARN_RESONANCES", &mut config.warn_resonances);
        config
    }

    pub fn integration_options(&self, epsrel: f64) -> IntegrationOptions {
        IntegrationOptions {
            epsrel,
            max_subdivisions: self.max_subdivisions,
            warn_resonances: self.warn_resonances,
        }
    }

    pub fn without_resonance_warnings(self) -> Self {
        Self {
            warn_resonances: false,
            ..self
        }
    }
}

fn override_from_env<T>(key: &str, field: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(key) {
        match raw.trim().parse() {
            Ok(value) => *field = value,
            Err(err) => log::warn!("ignoring {key}={raw}: {err}"),
        }
    }
}

#[test]
fn test_defaults() {
    let config = PredictionConfig::default();
    assert_eq!(config.scale_bvll, 4.8);
    assert_eq!(config.epsrel, 0.01);
    assert_eq!(config.epsrel_mixing, 0.005);
    assert_eq!(config.epsrel_lepton_flavour, 0.0005);
    assert!(config.warn_resonances);
    assert!(!config.without_resonance_warnings().warn_resonances);
}

#[test]
fn test_override_from_env() {
    std::env::set_var("BVLL_TEST_OVERRIDE_OK", " 0.002 ");
    std::env::set_var("BVLL_TEST_OVERRIDE_BAD", "tight");

    let mut epsrel = 0.01_f64;
    override_from_env("BVLL_TEST_OVERRIDE_OK", &mut epsrel);
    assert_eq!(epsrel, 0.002);

    override_from_env("BVLL_TEST_OVERRIDE_BAD", &mut epsrel);
    assert_eq!(epsrel, 0.002);

    override_from_env("BVLL_TEST_OVERRIDE_UNSET", &mut epsrel);
    assert_eq!(epsrel, 0.002);
}
