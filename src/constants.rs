use crate::theory::angular::AngularIndex;

/// Angular indices whose sign differs between the theory and the LHCb (experiment)
/// convention, see eq. (C.8) of arXiv:1506.03970v2.
pub const EXPERIMENT_SIGN_FLIPS: [AngularIndex; 5] = [
    AngularIndex::I4,
    AngularIndex::I6s,
    AngularIndex::I6c,
    AngularIndex::I7,
    AngularIndex::I9,
];

/// q² (GeV²) below which the photon pole dominates. Bins straddling it are split here.
pub const PHOTON_POLE_SPLIT: f64 = 1.0;

/// Narrow charmonium windows in GeV² (J/psi, psi(2S)), as vetoed by the experiments.
pub const CHARMONIUM_WINDOWS: [(f64, f64); 2] = [(8.68, 10.09), (12.86, 14.18)];

/// Renormalization scale handed to the collaborators, in GeV.
pub const DEFAULT_SCALE_BVLL: f64 = 4.8;

/// Relative tolerance of prompt B -> V l l integrals.
pub const DEFAULT_EPSREL: f64 = 0.01;

/// Relative tolerance of time-integrated Bs integrals.
pub const DEFAULT_EPSREL_MIXING: f64 = 0.005;

/// Relative tolerance of lepton-flavour ratios with width splitting.
pub const DEFAULT_EPSREL_LEPTON_FLAVOUR: f64 = 0.0005;

/// Maximum bisection depth of a single integration piece.
pub const DEFAULT_MAX_SUBDIVISIONS: usize = 12;

/// q² range of the 2018 LHCb Bs -> K*0 mu mu branching ratio (arXiv:1804.07167).
pub const LHCB_BSKSTAR_Q2: (f64, f64) = (0.1, 19.0);
