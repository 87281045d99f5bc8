//! The standard set of B -> V l+ l- observables.

use super::quantity::Quantity;
use super::registry::{Observable, Prediction, Registry, Tolerance};
use crate::error::Result;
use crate::process::{Lepton, Meson, Process};
use crate::theory::angular::{AngularIndex, Convention, PPrimeIndex};

/// Hadronic part of a decay as it appears in observable names, e.g. `B0->K*`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Channel {
    pub label: &'static str,
    pub tex: &'static str,
    pub b: Meson,
    pub v: Meson,
}

impl Channel {
    pub fn process(&self, lepton: Lepton) -> Process {
        Process::new(self.b, self.v, lepton)
    }

    /// e.g. `B_s\to \phi \mu^+\mu^-`
    pub fn process_tex(&self, lepton: Lepton) -> String {
        format!("{}{}^+{}^-", self.tex, lepton.tex(), lepton.tex())
    }

    pub fn taxonomy(&self, lepton: Lepton) -> String {
        format!(
            r"Process :: $b$ hadron decays :: FCNC decays :: $B\to V\ell^+\ell^-$ :: ${}$",
            self.process_tex(lepton)
        )
    }

    /// e.g. `Bs->phimumu`
    pub fn name_suffix(&self, lepton: Lepton) -> String {
        format!("{}{}{}", self.label, lepton, lepton)
    }
}

/// An angular observable defined as a ratio of two q² quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularEntry {
    pub name: String,
    pub tex: String,
    pub description: &'static str,
    pub numerator: Quantity,
    pub denominator: Quantity,
}

const S_INDICES_PROMPT: [(AngularIndex, &str); 6] = [
    (AngularIndex::I3, "3"),
    (AngularIndex::I4, "4"),
    (AngularIndex::I5, "5"),
    (AngularIndex::I7, "7"),
    (AngularIndex::I8, "8"),
    (AngularIndex::I9, "9"),
];

const S_INDICES_MIXING: [(AngularIndex, &str); 7] = [
    (AngularIndex::I3, "3"),
    (AngularIndex::I4, "4"),
    (AngularIndex::I5, "5"),
    (AngularIndex::I6c, "6c"),
    (AngularIndex::I7, "7"),
    (AngularIndex::I8, "8"),
    (AngularIndex::I9, "9"),
];

const A_INDICES: [(AngularIndex, &str); 7] = [
    (AngularIndex::I3, "3"),
    (AngularIndex::I4, "4"),
    (AngularIndex::I5, "5"),
    (AngularIndex::I6s, "6s"),
    (AngularIndex::I7, "7"),
    (AngularIndex::I8, "8"),
    (AngularIndex::I9, "9"),
];

fn s_entries(
    indices: &[(AngularIndex, &str)],
    tex: fn(&str) -> String,
    description: &'static str,
) -> Vec<AngularEntry> {
    indices
        .iter()
        .map(|&(index, label)| AngularEntry {
            name: format!("S{label}"),
            tex: tex(label),
            description,
            numerator: Quantity::SNumerator(Convention::Experiment, index),
            denominator: Quantity::SaDenominator,
        })
        .collect()
}

fn a_entries(tex: fn(&str) -> String, description: &'static str) -> Vec<AngularEntry> {
    A_INDICES
        .iter()
        .map(|&(index, label)| AngularEntry {
            name: format!("A{label}"),
            tex: tex(label),
            description,
            numerator: Quantity::ANumerator(Convention::Experiment, index),
            denominator: Quantity::SaDenominator,
        })
        .collect()
}

/// `S_3`, `S_6^c`, ...
fn subscript(symbol: &str, label: &str) -> String {
    match label.split_at(1) {
        (n, "") => format!("{symbol}_{n}"),
        (n, sup) => format!("{symbol}_{n}^{sup}"),
    }
}

lazy_static! {
    pub static ref PROMPT_CHANNELS: Vec<Channel> = vec![
        Channel {
            label: "B0->K*",
            tex: r"B^0\to K^{*0}",
            b: Meson::B0,
            v: Meson::KstarZero,
        },
        Channel {
            label: "B+->K*",
            tex: r"B^\pm\to K^{*\pm}",
            b: Meson::BPlus,
            v: Meson::KstarPlus,
        },
    ];

    pub static ref MIXING_CHANNELS: Vec<Channel> = vec![
        Channel {
            label: "Bs->phi",
            tex: r"B_s\to \phi ",
            b: Meson::Bs,
            v: Meson::Phi,
        },
        Channel {
            label: "Bs->K*0",
            tex: r"B_s\to K^* ",
            b: Meson::Bs,
            v: Meson::KstarZero,
        },
    ];

    /// Observables of prompt decays normalised to the SA denominator.
    pub static ref PROMPT_OBSERVABLES: Vec<AngularEntry> = {
        let mut entries = vec![
            AngularEntry {
                name: String::from("FL"),
                tex: String::from("F_L"),
                description: "Longitudinal polarization fraction",
                numerator: Quantity::FlNumerator,
                denominator: Quantity::SaDenominator,
            },
            AngularEntry {
                name: String::from("FLhat"),
                tex: String::from(r"\hat F_L"),
                description: "Modified longitudinal polarization fraction for vanishing lepton masses",
                numerator: Quantity::FlHatNumerator,
                denominator: Quantity::SaDenominator,
            },
            AngularEntry {
                name: String::from("AFB"),
                tex: String::from(r"A_\text{FB}"),
                description: "Forward-backward asymmetry",
                numerator: Quantity::AfbNumerator(Convention::Experiment),
                denominator: Quantity::SaDenominator,
            },
        ];
        entries.extend(s_entries(
            &S_INDICES_PROMPT,
            |label| subscript("S", label),
            "CP-averaged angular observable",
        ));
        entries.extend(a_entries(|label| subscript("A", label), "Angular CP asymmetry"));
        entries
    };

    /// Time-averaged observables of Bs decays normalised to the SA denominator.
    pub static ref MIXING_OBSERVABLES: Vec<AngularEntry> = {
        let mut entries = vec![AngularEntry {
            name: String::from("FL"),
            tex: String::from(r"\overline{F_L}"),
            description: "Time-averaged longitudinal polarization fraction",
            numerator: Quantity::FlNumerator,
            denominator: Quantity::SaDenominator,
        }];
        entries.extend(s_entries(
            &S_INDICES_MIXING,
            |label| format!(r"\overline{{{}}}", subscript("S", label)),
            "Time-averaged, CP-averaged angular observable",
        ));
        entries.extend(a_entries(
            |label| format!(r"\overline{{{}}}", subscript("A", label)),
            "Angular CP asymmetry",
        ));
        entries
    };

    /// Observables normalised to the P denominator, shared by prompt and Bs decays.
    pub static ref P_OBSERVABLES: Vec<AngularEntry> = vec![
        AngularEntry {
            name: String::from("P1"),
            tex: String::from("P_1"),
            description: "CP-averaged \"optimized\" angular observable",
            numerator: Quantity::P1Numerator,
            denominator: Quantity::PDenominator,
        },
        AngularEntry {
            name: String::from("ATIm"),
            tex: String::from(r"A_T^\text{Im}"),
            description: "Transverse CP asymmetry",
            numerator: Quantity::AtImNumerator,
            denominator: Quantity::PDenominator,
        },
        AngularEntry {
            name: String::from("ATRe"),
            tex: String::from(r"A_T^\text{Re}"),
            description: "Forward-Backward asymmetry",
            numerator: Quantity::AtReNumerator,
            denominator: Quantity::PDenominator,
        },
    ];

    /// (numerator, denominator) lepton of the lepton flavour ratios.
    pub static ref LEPTON_FLAVOUR_RATIOS: Vec<(Lepton, Lepton)> =
        vec![(Lepton::Mu, Lepton::E), (Lepton::Tau, Lepton::Mu)];
}

fn register_angular(
    registry: &mut Registry,
    channel: &Channel,
    lepton: Lepton,
    entry: &AngularEntry,
    tolerance: Tolerance,
) -> Result<()> {
    let process = channel.process(lepton);
    let suffix = channel.name_suffix(lepton);
    let process_tex = channel.process_tex(lepton);
    let taxonomy = channel.taxonomy(lepton);

    registry.insert(Observable {
        name: format!("<{}>({suffix})", entry.name),
        description: format!("Binned {} in ${process_tex}$", entry.description),
        tex: format!(r"$\langle {} \rangle({process_tex})$", entry.tex),
        taxonomy: vec![taxonomy.clone()],
        prediction: Prediction::BinnedRatio {
            numerator: entry.numerator,
            denominator: entry.denominator,
            process,
            tolerance,
        },
    })?;

    registry.insert(Observable {
        name: format!("{}({suffix})", entry.name),
        description: format!("{} in ${process_tex}$", entry.description),
        tex: format!("${}({process_tex})$", entry.tex),
        taxonomy: vec![taxonomy],
        prediction: Prediction::Ratio {
            numerator: entry.numerator,
            denominator: entry.denominator,
            process,
        },
    })
}

fn register_branching_ratios(
    registry: &mut Registry,
    channel: &Channel,
    lepton: Lepton,
    tolerance: Tolerance,
) -> Result<()> {
    let process = channel.process(lepton);
    let suffix = channel.name_suffix(lepton);
    let process_tex = channel.process_tex(lepton);
    let taxonomy = channel.taxonomy(lepton);
    let (kind, br) = if channel.b.has_width_splitting() {
        ("time-integrated ", r"\overline{\text{BR}}")
    } else {
        ("", r"\text{BR}")
    };

    registry.insert(Observable {
        name: format!("<dBR/dq2>({suffix})"),
        description: format!("Binned {kind}differential branching ratio of ${process_tex}$"),
        tex: format!(r"$\langle \frac{{d{br}}}{{dq^2}} \rangle({process_tex})$"),
        taxonomy: vec![taxonomy.clone()],
        prediction: Prediction::BinnedBranchingRatio { process, tolerance },
    })?;

    registry.insert(Observable {
        name: format!("dBR/dq2({suffix})"),
        description: format!("Differential {kind}branching ratio of ${process_tex}$"),
        tex: format!(r"$\frac{{d{br}}}{{dq^2}}({process_tex})$"),
        taxonomy: vec![taxonomy],
        prediction: Prediction::BranchingRatio { process },
    })
}

fn register_pprime(registry: &mut Registry, channel: &Channel, lepton: Lepton) -> Result<()> {
    let process = channel.process(lepton);
    let suffix = channel.name_suffix(lepton);
    let process_tex = channel.process_tex(lepton);
    let taxonomy = channel.taxonomy(lepton);

    for index in PPrimeIndex::ALL {
        let n = index.number();
        registry.insert(Observable {
            name: format!("<P{n}p>({suffix})"),
            description: format!(
                "Binned CP-averaged \"optimized\" angular observable P'_{n} in ${process_tex}$"
            ),
            tex: format!(r"$\langle P_{n}' \rangle({process_tex})$"),
            taxonomy: vec![taxonomy.clone()],
            prediction: Prediction::BinnedPPrime {
                index,
                process,
                tolerance: Tolerance::Prompt,
            },
        })?;
        registry.insert(Observable {
            name: format!("P{n}p({suffix})"),
            description: format!(
                "CP-averaged \"optimized\" angular observable P'_{n} in ${process_tex}$"
            ),
            tex: format!("$P_{n}'({process_tex})$"),
            taxonomy: vec![taxonomy.clone()],
            prediction: Prediction::PPrime { index, process },
        })?;
    }
    Ok(())
}

fn register_lepton_flavour_ratio(
    registry: &mut Registry,
    channel: &Channel,
    (l1, l2): (Lepton, Lepton),
    tolerance: Tolerance,
) -> Result<()> {
    registry.insert(Observable {
        name: format!("<R{l1}{l2}>({}ll)", channel.label),
        description: format!(
            "Ratio of partial branching ratios of ${}$ and ${}$",
            channel.process_tex(l1),
            channel.process_tex(l2)
        ),
        tex: format!(
            r"$\langle R_{{{} {}}} \rangle({}\ell^+\ell^-)$",
            l1.tex(),
            l2.tex(),
            channel.tex
        ),
        taxonomy: vec![channel.taxonomy(l1), channel.taxonomy(l2)],
        prediction: Prediction::LeptonFlavourRatio {
            quantity: Quantity::AveragedRate,
            process: channel.process(l1),
            denominator_lepton: l2,
            tolerance,
        },
    })
}

/// Prompt B0 and B+ decays.
pub fn register_prompt(registry: &mut Registry) -> Result<()> {
    for channel in PROMPT_CHANNELS.iter() {
        for lepton in Lepton::ALL {
            for entry in PROMPT_OBSERVABLES.iter().chain(P_OBSERVABLES.iter()) {
                register_angular(registry, channel, lepton, entry, Tolerance::Prompt)?;
            }
            register_pprime(registry, channel, lepton)?;
            register_branching_ratios(registry, channel, lepton, Tolerance::Prompt)?;
        }
        for &pair in LEPTON_FLAVOUR_RATIOS.iter() {
            register_lepton_flavour_ratio(registry, channel, pair, Tolerance::Prompt)?;
        }
    }
    Ok(())
}

/// Bs decays with time integration, plus the LHCb Bs -> K*0 mu mu branching ratio.
pub fn register_mixing(registry: &mut Registry) -> Result<()> {
    for channel in MIXING_CHANNELS.iter() {
        for lepton in Lepton::ALL {
            for entry in MIXING_OBSERVABLES.iter().chain(P_OBSERVABLES.iter()) {
                register_angular(registry, channel, lepton, entry, Tolerance::Mixing)?;
            }
            register_branching_ratios(registry, channel, lepton, Tolerance::Mixing)?;

            if channel.v == Meson::KstarZero && lepton == Lepton::Mu {
                let process_tex = channel.process_tex(lepton);
                registry.insert(Observable {
                    name: format!("BR_LHCb({})", channel.name_suffix(lepton)),
                    description: format!(
                        "Branching ratio of ${process_tex}$ measured by LHCb in 2018"
                    ),
                    tex: format!(r"$\overline{{\text{{BR}}}}({process_tex})$"),
                    taxonomy: vec![channel.taxonomy(lepton)],
                    prediction: Prediction::LhcbBranchingRatio {
                        process: channel.process(lepton),
                    },
                })?;
            }
        }
        for &pair in LEPTON_FLAVOUR_RATIOS.iter() {
            register_lepton_flavour_ratio(registry, channel, pair, Tolerance::LeptonFlavour)?;
        }
    }
    Ok(())
}

impl Registry {
    /// Every observable of this crate.
    pub fn standard() -> Result<Self> {
        let mut registry = Registry::new();
        register_prompt(&mut registry)?;
        register_mixing(&mut registry)?;
        log::debug!("registered {} observables", registry.len());
        Ok(registry)
    }
}

#[test]
fn test_subscript() {
    assert_eq!(subscript("S", "3"), "S_3");
    assert_eq!(subscript("A", "6s"), "A_6^s");
}

#[test]
fn test_table_sizes() {
    // FL, FLhat, AFB, six S and seven A
    assert_eq!(PROMPT_OBSERVABLES.len(), 16);
    // FL, seven S and seven A
    assert_eq!(MIXING_OBSERVABLES.len(), 15);
    assert_eq!(MIXING_OBSERVABLES[1].tex, r"\overline{S_3}");
    assert_eq!(MIXING_OBSERVABLES[4].tex, r"\overline{S_6^c}");
}

#[test]
fn test_standard_registry() {
    let registry = Registry::standard().unwrap();

    // per prompt channel and lepton: 2 x (16 + 3) angular, 2 x 4 P', 2 BR; plus 2 ratios
    let prompt = 2 * (3 * (2 * 19 + 8 + 2) + 2);
    // per Bs channel and lepton: 2 x (15 + 3) angular, 2 BR; plus 2 ratios and BR_LHCb
    let mixing = 2 * (3 * (2 * 18 + 2) + 2) + 1;
    assert_eq!(registry.len(), prompt + mixing);

    let fl = registry.get("<FL>(Bs->phimumu)").unwrap();
    assert_eq!(fl.arity().argument_names(), ["q2min", "q2max"]);
    assert_eq!(fl.tex, r"$\langle \overline{F_L} \rangle(B_s\to \phi \mu^+\mu^-)$");
    assert_eq!(
        fl.taxonomy,
        [r"Process :: $b$ hadron decays :: FCNC decays :: $B\to V\ell^+\ell^-$ :: $B_s\to \phi \mu^+\mu^-$"]
    );

    assert!(registry.contains("S6c(Bs->K*0ee)"));
    assert!(registry.contains("P5p(B0->K*mumu)"));
    assert!(registry.contains("<Rtaumu>(B+->K*ll)"));
    assert!(registry.get("BR_LHCb(Bs->K*0mumu)").unwrap().arity().is_empty());
    assert!(!registry.contains("BR_LHCb(Bs->phimumu)"));

    let ratio = registry.get("<Rmue>(Bs->phill)").unwrap();
    assert_eq!(ratio.taxonomy.len(), 2);
    assert_eq!(ratio.arity().len(), 2);

    // every prompt or Bs observable shares the B -> V l l branch of the taxonomy
    assert_eq!(registry.by_taxonomy(r"$B\to V\ell^+\ell^-$").count(), registry.len());
}
