use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use num_complex::Complex64;
use serde_derive::Deserialize;

use crate::error::ObservableError;

/// One `name,value` row of a parameter file.
#[derive(Debug, Deserialize)]
struct ParameterCsvEntry {
    name: String,
    value: f64,
}

/// Keyed store of numerical parameters: masses (`m_<particle>`), lifetimes
/// (`tau_<particle>`), width splittings (`DeltaGamma/Gamma_<meson>`) and
/// process-specific corrections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: HashMap<String, f64>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> std::result::Result<f64, ObservableError> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| ObservableError::MissingParameter(key.to_owned()))
    }

    /// Returns the previous value, if any.
    pub fn set(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads a header-less `name,value` csv file. Later rows override earlier ones.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open parameter file {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("in parameter file {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut parameters = Parameters::new();
        for (line, row) in reader.deserialize::<ParameterCsvEntry>().enumerate() {
            let entry = row.with_context(|| format!("invalid parameter row {}", line + 1))?;
            if let Some(previous) = parameters.set(entry.name.clone(), entry.value) {
                log::debug!(
                    "parameter {} redefined: {} -> {}",
                    entry.name,
                    previous,
                    entry.value
                );
            }
        }
        Ok(parameters)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Wilson coefficients forwarded untouched to the amplitude provider.
/// Absent coefficients are zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WilsonCoefficients {
    values: BTreeMap<String, Complex64>,
}

impl WilsonCoefficients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Complex64 {
        self.values.get(name).copied().unwrap_or_default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Complex64) -> Option<Complex64> {
        self.values.insert(name.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Complex64)> {
        self.values.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Complex64)> for WilsonCoefficients {
    fn from_iter<I: IntoIterator<Item = (K, Complex64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[test]
fn test_parameters_from_csv_reader() {
    let csv = "\
# masses in GeV
m_Bs, 5.36689
m_phi, 1.019461
DeltaGamma/Gamma_Bs, 0.124
m_phi, 1.0195
";
    let parameters = Parameters::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(parameters.len(), 3);
    assert_eq!(parameters.get("m_Bs").unwrap(), 5.36689);
    assert_eq!(parameters.get("m_phi").unwrap(), 1.0195);
    assert_eq!(parameters.get("DeltaGamma/Gamma_Bs").unwrap(), 0.124);
}

#[test]
fn test_missing_parameter() {
    let parameters: Parameters = [("m_mu", 0.10566)].into_iter().collect();
    assert_eq!(
        parameters.get("m_tau"),
        Err(ObservableError::MissingParameter(String::from("m_tau")))
    );
}

#[test]
fn test_malformed_row_is_reported() {
    let csv = "m_Bs, five\n";
    assert!(Parameters::from_reader(csv.as_bytes()).is_err());
}

#[test]
fn test_absent_wilson_coefficient_is_zero() {
    let wc: WilsonCoefficients = [("C9_bsmumu", Complex64::new(-1.0, 0.0))].into_iter().collect();
    assert_eq!(wc.get("C9_bsmumu"), Complex64::new(-1.0, 0.0));
    assert_eq!(wc.get("C10_bsmumu"), Complex64::new(0.0, 0.0));
}
