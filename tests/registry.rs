mod common;

use bvll_observables::observables::combinators::branching_ratio_differential;
use bvll_observables::observables::{evaluate_batch, Registry, Request};
use bvll_observables::process::{Lepton, Meson, Process};
use bvll_observables::ObservableError;

use common::Fixture;

#[test]
fn predictions_check_their_arguments() {
    let fx = Fixture::new();
    let registry = Registry::standard().unwrap();

    assert_eq!(
        registry.predict("<FL>(B0->K*mumu)", &fx.inputs(), &[2.0]),
        Err(ObservableError::ArityMismatch {
            name: String::from("<FL>(B0->K*mumu)"),
            expected: 2,
            got: 1,
        })
    );
    assert_eq!(
        registry.predict("FL(B0->K*nunu)", &fx.inputs(), &[2.0]),
        Err(ObservableError::UnknownObservable(String::from("FL(B0->K*nunu)")))
    );

    let fl = registry.predict("FL(B0->K*mumu)", &fx.inputs(), &[2.0]).unwrap();
    assert!((0.0..=1.0).contains(&fl), "F_L = {fl}");
}

#[test]
fn binned_equals_point_value_for_flat_spectrum() {
    let fx = Fixture::new();
    let registry = Registry::standard().unwrap();

    for observable in ["FL", "S5", "A6s", "AFB", "P1", "ATRe"] {
        let point = registry
            .predict(&format!("{observable}(B+->K*ee)"), &fx.inputs(), &[3.0])
            .unwrap();
        let binned = registry
            .predict(&format!("<{observable}>(B+->K*ee)"), &fx.inputs(), &[1.1, 6.0])
            .unwrap();
        assert!((binned - point).abs() < 1e-9, "{observable}: {binned} vs {point}");
    }

    let point = registry.predict("P5p(B+->K*ee)", &fx.inputs(), &[3.0]).unwrap();
    let binned = registry.predict("<P5p>(B+->K*ee)", &fx.inputs(), &[1.1, 6.0]).unwrap();
    assert!((binned - point).abs() < 1e-9);
}

#[test]
fn lepton_flavour_ratio_of_rates() {
    let fx = Fixture::new();
    let registry = Registry::standard().unwrap();
    let inputs = fx.inputs();

    let ratio = registry.predict("<Rmue>(B0->K*ll)", &inputs, &[1.1, 6.0]).unwrap();
    let b0_kstar = |lepton| Process::new(Meson::B0, Meson::KstarZero, lepton);
    let mu = branching_ratio_differential(&inputs, &b0_kstar(Lepton::Mu), 3.0).unwrap();
    let e = branching_ratio_differential(&inputs, &b0_kstar(Lepton::E), 3.0).unwrap();
    assert!((ratio - mu / e).abs() < 1e-9, "{ratio} vs {}", mu / e);
}

#[test]
fn lhcb_branching_ratio_covers_full_range() {
    let mut fx = Fixture::new();
    fx.par.set("DeltaGamma/Gamma_Bs", 0.0);
    let registry = Registry::standard().unwrap();
    let inputs = fx.inputs();

    let process = Process::new(Meson::Bs, Meson::KstarZero, Lepton::Mu);
    let dbrdq2 = branching_ratio_differential(&inputs, &process, 5.0).unwrap();
    let br = registry.predict("BR_LHCb(Bs->K*0mumu)", &inputs, &[]).unwrap();
    let expected = 1.1 * dbrdq2 * (19.0 - 0.1);
    assert!(((br - expected) / expected).abs() < 1e-9, "{br} vs {expected}");
}

#[test]
fn batch_reports_failures_per_request() {
    let fx = Fixture::new();
    let registry = Registry::standard().unwrap();

    let requests = vec![
        Request::new("dBR/dq2(Bs->phimumu)", [2.0]),
        Request::new("<dBR/dq2>(Bs->phimumu)", [2.0]),
        Request::new("dBR/dq2(Bs->phitautau)", [2.0]),
        Request::new("S3(Bs->phinunu)", [2.0]),
        Request::new("<S3>(Bs->K*0ee)", [1.1, 6.0]),
    ];
    let results = evaluate_batch(&registry, &fx.inputs(), &requests);

    assert_eq!(results.len(), requests.len());
    for (result, request) in results.iter().zip(&requests) {
        assert_eq!(&result.request, request);
    }
    assert!(results[0].value.as_ref().unwrap() > &0.0);
    assert!(matches!(
        results[1].value,
        Err(ObservableError::ArityMismatch {
            expected: 2,
            got: 1,
            ..
        })
    ));
    // below 4 m_tau²
    assert_eq!(results[2].value, Ok(0.0));
    assert!(matches!(results[3].value, Err(ObservableError::UnknownObservable(_))));
    assert!(results[4].value.is_ok());
}
