//! Mesons, leptons and the decay channels built from them.

use std::fmt;

use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Meson {
    B0,
    BPlus,
    Bs,
    KstarZero,
    KstarPlus,
    Phi,
}

impl Meson {
    /// Name used in parameter keys, e.g. `m_Bs`, `tau_B+`.
    pub fn name(self) -> &'static str {
        match self {
            Meson::B0 => "B0",
            Meson::BPlus => "B+",
            Meson::Bs => "Bs",
            Meson::KstarZero => "K*0",
            Meson::KstarPlus => "K*+",
            Meson::Phi => "phi",
        }
    }

    pub fn mass_key(self) -> String {
        format!("m_{}", self.name())
    }

    pub fn lifetime_key(self) -> String {
        format!("tau_{}", self.name())
    }

    /// Key of ΔΓ/Γ, only looked up for mesons with [`Meson::has_width_splitting`].
    pub fn width_splitting_key(self) -> String {
        format!("DeltaGamma/Gamma_{}", self.name())
    }

    /// Whether time-integrated rates have to account for the width difference of the
    /// mass eigenstates.
    pub fn has_width_splitting(self) -> bool {
        matches!(self, Meson::Bs)
    }
}

impl fmt::Display for Meson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lepton {
    E,
    Mu,
    Tau,
}

impl Lepton {
    pub const ALL: [Lepton; 3] = [Lepton::E, Lepton::Mu, Lepton::Tau];

    pub fn name(self) -> &'static str {
        match self {
            Lepton::E => "e",
            Lepton::Mu => "mu",
            Lepton::Tau => "tau",
        }
    }

    pub fn tex(self) -> &'static str {
        match self {
            Lepton::E => "e",
            Lepton::Mu => r"\mu",
            Lepton::Tau => r"\tau",
        }
    }

    pub fn mass_key(self) -> String {
        format!("m_{}", self.name())
    }
}

impl fmt::Display for Lepton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `B -> V l+ l-` decay with both leptons of the same flavour.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub b: Meson,
    pub v: Meson,
    pub lepton: Lepton,
}

impl Process {
    pub fn new(b: Meson, v: Meson, lepton: Lepton) -> Self {
        Self { b, v, lepton }
    }

    /// Same hadrons, different lepton flavour.
    pub fn with_lepton(self, lepton: Lepton) -> Self {
        Self { lepton, ..self }
    }

    /// Flavour-changing quark transition, `bd` for Bs -> K*0 and `bs` otherwise.
    pub fn quark_transition(&self) -> &'static str {
        match (self.b, self.v) {
            (Meson::Bs, Meson::KstarZero) => "bd",
            _ => "bs",
        }
    }

    /// Label of the effective Hamiltonian sector, e.g. `bsmumu`.
    pub fn sector(&self) -> String {
        format!("{}{}{}", self.quark_transition(), self.lepton, self.lepton)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}{}{}", self.b, self.v, self.lepton, self.lepton)
    }
}

#[test]
fn test_parameter_keys() {
    assert_eq!(Meson::Bs.mass_key(), "m_Bs");
    assert_eq!(Meson::BPlus.lifetime_key(), "tau_B+");
    assert_eq!(Meson::Bs.width_splitting_key(), "DeltaGamma/Gamma_Bs");
    assert_eq!(Meson::KstarZero.mass_key(), "m_K*0");
    assert_eq!(Lepton::Tau.mass_key(), "m_tau");
}

#[test]
fn test_sector_labels() {
    let bs_kstar = Process::new(Meson::Bs, Meson::KstarZero, Lepton::Mu);
    assert_eq!(bs_kstar.sector(), "bdmumu");
    let bs_phi = Process::new(Meson::Bs, Meson::Phi, Lepton::E);
    assert_eq!(bs_phi.sector(), "bsee");
    assert_eq!(bs_phi.with_lepton(Lepton::Tau).to_string(), "Bs->phitautau");
}
