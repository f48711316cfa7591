use op_lab::{
    case_io::CaseSet,
    cases::{generate_pair_cases, pair_stress_cases, sigmoid_sweep},
    config::LabSettings,
    engine::{zip_with, ElementwiseEngine},
    report::run_lab,
};

use elementwise_core::{
    BinaryOp, Operation, RandomSettings, RandomSource, Scalar, UnaryOp, PRECISION,
};

#[test]
fn default_lab_run_passes() {
    let settings = LabSettings {
        count: 64,
        ..LabSettings::default()
    };
    let sets = vec![
        CaseSet::Pairs {
            label: "random".into(),
            cases: generate_pair_cases(settings.count, settings.seed),
        },
        CaseSet::Pairs {
            label: "stress".into(),
            cases: pair_stress_cases(),
        },
        CaseSet::SigmoidSweep {
            label: "sweep".into(),
            inputs: sigmoid_sweep(19.9, 399),
        },
    ];
    let report = run_lab(&sets, &settings).unwrap();
    assert!(report.passed(), "{report:#?}");
    assert_eq!(report.sets.len(), 3);
    assert_eq!(report.random.draws, 1000);
    assert_eq!(report.precision, PRECISION);
}

#[test]
fn report_serializes_to_json() {
    let sets = vec![CaseSet::Pairs {
        label: "tiny".into(),
        cases: generate_pair_cases(2, 5),
    }];
    let report = run_lab(&sets, &LabSettings::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sets"][0]["label"], "tiny");
    assert_eq!(json["random"]["reproducible"], true);
}

#[test]
fn every_registry_entry_drives_the_engine() {
    let mut engine = ElementwiseEngine::with_source(RandomSource::seeded(1));
    let a: Vec<Scalar> = vec![0.5, 1.0, 2.0, 4.0];
    let b: Vec<Scalar> = vec![2.0, 1.0, 0.5, 4.0];
    let mut out = vec![0.0; a.len()];
    for op in Operation::ALL {
        match op {
            Operation::Unary(op) => engine.map(op, &a, &mut out).unwrap(),
            Operation::Binary(op) => engine.zip(op, &a, &b, &mut out).unwrap(),
            Operation::AddWithScale => engine.zip_scaled(&a, &b, 0.5, &mut out).unwrap(),
        }
        assert!(
            out.iter().all(|v| v.is_finite()),
            "{op} produced a non-finite value on benign input: {out:?}"
        );
    }
}

#[test]
fn predicate_output_masks_arithmetic() {
    let engine = ElementwiseEngine::default();
    let values: Vec<Scalar> = vec![-3.0, 2.0, -1.0, 5.0];
    let zeros = vec![0.0; values.len()];
    let mut mask = vec![0.0; values.len()];
    let mut relu = vec![0.0; values.len()];
    engine.zip(BinaryOp::Bigger, &values, &zeros, &mut mask).unwrap();
    engine.zip(BinaryOp::Multiply, &values, &mask, &mut relu).unwrap();
    assert_eq!(relu, vec![0.0, 2.0, 0.0, 5.0]);
}

#[test]
fn handles_are_interchangeable_in_a_generic_zip() {
    let a: Vec<Scalar> = vec![1.0, 6.0, -2.0];
    let b: Vec<Scalar> = vec![3.0, 3.0, -2.0];
    let mut via_handle = vec![0.0; 3];
    let mut via_enum = vec![0.0; 3];
    for op in BinaryOp::ALL {
        zip_with(op.function(), &a, &b, &mut via_handle).unwrap();
        zip_with(|x, y| op.apply(x, y), &a, &b, &mut via_enum).unwrap();
        assert_eq!(via_handle, via_enum, "{op}");
    }
}

#[test]
fn engine_random_fill_follows_settings_seed() {
    let mut engine = ElementwiseEngine::new(&RandomSettings::seeded(0xBEEF));
    let mut source = RandomSource::seeded(0xBEEF);
    let mut buf = vec![0.0; 32];
    engine.fill(UnaryOp::Rand, &mut buf);
    let expected: Vec<Scalar> = (0..32).map(|_| source.next_unit()).collect();
    assert_eq!(buf, expected);
    assert_eq!(engine.random().seed(), Some(0xBEEF));
}

#[test]
fn repeated_runs_share_set_checksums() {
    let settings = LabSettings::default();
    let sets = vec![
        CaseSet::Pairs {
            label: "random".into(),
            cases: generate_pair_cases(16, settings.seed),
        },
        CaseSet::SigmoidSweep {
            label: "sweep".into(),
            inputs: sigmoid_sweep(10.0, 41),
        },
    ];
    let first = run_lab(&sets, &settings).unwrap();
    let second = run_lab(&sets, &settings).unwrap();
    let sums = |report: &op_lab::report::LabReport| {
        report.sets.iter().map(|s| s.checksum).collect::<Vec<_>>()
    };
    assert_eq!(sums(&first), sums(&second));
    assert_ne!(first.sets[0].checksum, first.sets[1].checksum);
}
