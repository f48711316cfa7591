//! Invariant checks over case sets, driven through [`ElementwiseEngine`].

use anyhow::Result;
use serde::Serialize;

use crate::case_io::CaseSet;
use crate::cases::{compare_sigmoids, PairCase};
use crate::config::LabSettings;
use crate::engine::ElementwiseEngine;
use elementwise_core::{
    metrics::{checksum, max_abs_diff},
    BinaryOp, Precision, Scalar, UnaryOp, PRECISION,
};

const MAX_EXAMPLES: usize = 5;

/// Outcome of one named invariant over a set.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub checked: usize,
    pub failures: usize,
    /// First few failing elements, for the log.
    pub examples: Vec<String>,
}

impl CheckResult {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            checked: 0,
            failures: 0,
            examples: Vec::new(),
        }
    }

    fn record(&mut self, ok: bool, describe: impl FnOnce() -> String) {
        self.checked += 1;
        if !ok {
            self.failures += 1;
            if self.examples.len() < MAX_EXAMPLES {
                self.examples.push(describe());
            }
        }
    }

    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

/// Sigmoid agreement for a sweep. Divergence outside the limit is reported, not failed.
#[derive(Debug, Clone, Serialize)]
pub struct SigmoidSummary {
    pub limit: Scalar,
    pub max_diff_inside: Scalar,
    pub worst_x_inside: Option<Scalar>,
    /// ULP distance between the two forms at `worst_x_inside`.
    pub ulps_at_worst_inside: Option<u64>,
    /// Largest ULP distance anywhere inside the limit; may come from a different x.
    pub max_ulps_inside: u64,
    pub max_diff_outside: Option<Scalar>,
    pub worst_x_outside: Option<Scalar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetReport {
    pub label: String,
    pub kind: &'static str,
    pub cases: usize,
    pub checks: Vec<CheckResult>,
    /// Bitwise fingerprint of every output the set produced, in evaluation order.
    pub checksum: u64,
    pub sigmoid: Option<SigmoidSummary>,
}

impl SetReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckResult::passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomReport {
    pub seed: u64,
    pub draws: usize,
    pub min: Option<Scalar>,
    pub max: Option<Scalar>,
    pub out_of_range: usize,
    pub reproducible: bool,
}

impl RandomReport {
    pub fn passed(&self) -> bool {
        self.out_of_range == 0 && self.reproducible
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabReport {
    pub precision: Precision,
    pub sets: Vec<SetReport>,
    pub random: RandomReport,
}

impl LabReport {
    pub fn passed(&self) -> bool {
        self.sets.iter().all(SetReport::passed) && self.random.passed()
    }
}

/// Runs every set plus the random-draw check.
pub fn run_lab(sets: &[CaseSet], settings: &LabSettings) -> Result<LabReport> {
    let mut engine = ElementwiseEngine::new(&settings.random);
    let mut reports = Vec::with_capacity(sets.len());
    for set in sets {
        let report = check_set(&mut engine, set, settings)?;
        if report.passed() {
            tracing::info!(label = %report.label, cases = report.cases, "set passed");
        } else {
            for check in report.checks.iter().filter(|c| !c.passed()) {
                tracing::warn!(
                    label = %report.label,
                    check = check.name,
                    failures = check.failures,
                    examples = ?check.examples,
                    "invariant violated"
                );
            }
        }
        reports.push(report);
    }

    let seed = settings.random.effective_seed().unwrap_or(settings.seed);
    let random = check_random(&mut engine, settings.draws, seed);
    if !random.passed() {
        tracing::warn!(?random, "random draw check failed");
    }

    Ok(LabReport {
        precision: PRECISION,
        sets: reports,
        random,
    })
}

pub fn check_set(
    engine: &mut ElementwiseEngine,
    set: &CaseSet,
    settings: &LabSettings,
) -> Result<SetReport> {
    match set {
        CaseSet::Pairs { label, cases } => check_pairs(engine, label, cases),
        CaseSet::SigmoidSweep { label, inputs } => Ok(check_sigmoid(
            label,
            inputs,
            settings.tolerance,
            settings.sigmoid_limit,
        )),
    }
}

pub fn check_pairs(
    engine: &mut ElementwiseEngine,
    label: &str,
    cases: &[PairCase],
) -> Result<SetReport> {
    let n = cases.len();
    let xs: Vec<Scalar> = cases.iter().map(|c| c.x).collect();
    let ys: Vec<Scalar> = cases.iter().map(|c| c.y).collect();
    let scales: Vec<Scalar> = cases.iter().map(|c| c.scale).collect();
    let mut checks = Vec::new();

    let mut squared = vec![0.0; n];
    let mut product = vec![0.0; n];
    engine.map(UnaryOp::Square, &xs, &mut squared)?;
    engine.zip(BinaryOp::Multiply, &xs, &xs, &mut product)?;
    let mut square = CheckResult::new("square_is_self_multiply");
    for i in 0..n {
        square.record(same_value(squared[i], product[i]), || {
            format!("x={}: square={} multiply={}", xs[i], squared[i], product[i])
        });
    }
    checks.push(square);

    let mut scaled = vec![0.0; n];
    let mut expected = vec![0.0; n];
    engine.zip_scaled_each(&xs, &ys, &scales, &mut scaled)?;
    engine.zip(BinaryOp::Multiply, &scales, &ys, &mut product)?;
    engine.zip(BinaryOp::Add, &xs, &product, &mut expected)?;
    let mut scaled_add = CheckResult::new("scaled_add_is_add_of_product");
    for i in 0..n {
        scaled_add.record(same_value(scaled[i], expected[i]), || {
            format!(
                "x={} y={} scale={}: add_with_scale={} add(multiply)={}",
                xs[i], ys[i], scales[i], scaled[i], expected[i]
            )
        });
    }
    checks.push(scaled_add);

    let mut outputs: Vec<(BinaryOp, Vec<Scalar>)> = Vec::with_capacity(BinaryOp::ALL.len());
    for op in BinaryOp::ALL {
        let mut out = vec![0.0; n];
        engine.zip(op, &xs, &ys, &mut out)?;
        outputs.push((op, out));
    }
    let mut range = CheckResult::new("predicates_are_zero_or_one");
    for (op, values) in outputs.iter().filter(|(op, _)| op.is_predicate()) {
        for (i, &v) in values.iter().enumerate() {
            range.record(v == 0.0 || v == 1.0, || {
                format!("{op}({}, {}) = {v}", xs[i], ys[i])
            });
        }
    }
    checks.push(range);

    let (bigger, smaller, equal, not_equal) = (
        column(&outputs, BinaryOp::Bigger),
        column(&outputs, BinaryOp::Smaller),
        column(&outputs, BinaryOp::Equal),
        column(&outputs, BinaryOp::NotEqual),
    );
    let mut trichotomy = CheckResult::new("trichotomy");
    for i in 0..n {
        let hits = bigger[i] + smaller[i] + equal[i];
        let unordered = xs[i].is_nan() || ys[i].is_nan();
        let ok = if unordered {
            hits == 0.0 && not_equal[i] == 1.0
        } else {
            hits == 1.0 && not_equal[i] == 1.0 - equal[i]
        };
        trichotomy.record(ok, || {
            format!(
                "x={} y={}: bigger={} smaller={} equal={} not_equal={}",
                xs[i], ys[i], bigger[i], smaller[i], equal[i], not_equal[i]
            )
        });
    }
    checks.push(trichotomy);

    let mut constants = CheckResult::new("constant_generators");
    let mut buf = xs.clone();
    engine.fill(UnaryOp::Zero, &mut buf);
    for (i, &v) in buf.iter().enumerate() {
        constants.record(v == 0.0, || format!("zero({}) = {v}", xs[i]));
    }
    buf.copy_from_slice(&xs);
    engine.fill(UnaryOp::One, &mut buf);
    for (i, &v) in buf.iter().enumerate() {
        constants.record(v == 1.0, || format!("one({}) = {v}", xs[i]));
    }
    checks.push(constants);

    let mut agreement = CheckResult::new("engine_matches_reference");
    for (i, case) in cases.iter().enumerate() {
        let reference = case.reference();
        for (op, values) in &outputs {
            let want = reference.binary(*op);
            agreement.record(same_value(values[i], want), || {
                format!("{op}({}, {}): engine={} reference={want}", case.x, case.y, values[i])
            });
        }
        agreement.record(same_value(scaled[i], reference.scaled_add), || {
            format!(
                "add_with_scale({}, {}, {}): engine={} reference={}",
                case.x, case.y, case.scale, scaled[i], reference.scaled_add
            )
        });
    }
    checks.push(agreement);

    let references: Vec<_> = cases.iter().map(PairCase::reference).collect();
    let mut worst = CheckResult::new("reference_max_abs_diff");
    for (op, values) in &outputs {
        let expected: Vec<Scalar> = references.iter().map(|r| r.binary(*op)).collect();
        let diff = max_abs_diff(values, &expected);
        worst.record(diff == 0.0, || format!("{op}: max |engine - reference| = {diff:e}"));
    }
    let expected: Vec<Scalar> = references.iter().map(|r| r.scaled_add).collect();
    let diff = max_abs_diff(&scaled, &expected);
    worst.record(diff == 0.0, || {
        format!("add_with_scale: max |engine - reference| = {diff:e}")
    });
    checks.push(worst);

    let mut produced: Vec<Scalar> = outputs
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .collect();
    produced.extend_from_slice(&scaled);

    Ok(SetReport {
        label: label.to_string(),
        kind: "pairs",
        cases: n,
        checks,
        checksum: checksum(&produced),
        sigmoid: None,
    })
}

pub fn check_sigmoid(label: &str, inputs: &[Scalar], tolerance: Scalar, limit: Scalar) -> SetReport {
    let comparisons = compare_sigmoids(inputs);
    let mut agreement = CheckResult::new("sigmoid_forms_agree");
    let mut range = CheckResult::new("sigmoid_in_unit_interval");
    let mut summary = SigmoidSummary {
        limit,
        max_diff_inside: 0.0,
        worst_x_inside: None,
        ulps_at_worst_inside: None,
        max_ulps_inside: 0,
        max_diff_outside: None,
        worst_x_outside: None,
    };

    for c in comparisons.iter().filter(|c| !c.x.is_nan()) {
        range.record(
            (0.0..=1.0).contains(&c.sigma1) && (0.0..=1.0).contains(&c.sigma2),
            || format!("x={}: sigma1={} sigma2={}", c.x, c.sigma1, c.sigma2),
        );
        if c.x.abs() < limit {
            agreement.record(c.abs_diff <= tolerance, || {
                format!("x={}: |sigma1 - sigma2| = {:e}", c.x, c.abs_diff)
            });
            if c.abs_diff > summary.max_diff_inside || summary.worst_x_inside.is_none() {
                summary.max_diff_inside = c.abs_diff;
                summary.worst_x_inside = Some(c.x);
                summary.ulps_at_worst_inside = c.ulps;
            }
            summary.max_ulps_inside = summary.max_ulps_inside.max(c.ulps.unwrap_or(u64::MAX));
        } else if summary.max_diff_outside.map_or(true, |d| c.abs_diff > d) {
            summary.max_diff_outside = Some(c.abs_diff);
            summary.worst_x_outside = Some(c.x);
        }
    }

    let produced: Vec<Scalar> = comparisons
        .iter()
        .flat_map(|c| [c.sigma1, c.sigma2])
        .collect();

    SetReport {
        label: label.to_string(),
        kind: "sigmoid_sweep",
        cases: inputs.len(),
        checks: vec![agreement, range],
        checksum: checksum(&produced),
        sigmoid: Some(summary),
    }
}

/// Draws `draws` values twice from `seed` and checks range and reproducibility.
pub fn check_random(engine: &mut ElementwiseEngine, draws: usize, seed: u64) -> RandomReport {
    let mut first = vec![0.0; draws];
    let mut second = vec![0.0; draws];
    engine.reseed(seed);
    engine.fill(UnaryOp::Rand, &mut first);
    engine.reseed(seed);
    engine.fill(UnaryOp::Rand, &mut second);

    let reproducible = first
        .iter()
        .zip(&second)
        .all(|(a, b)| a.to_bits() == b.to_bits());
    let out_of_range = first
        .iter()
        .filter(|v| !(0.0..1.0).contains(*v))
        .count();
    RandomReport {
        seed,
        draws,
        min: first.iter().copied().reduce(Scalar::min),
        max: first.iter().copied().reduce(Scalar::max),
        out_of_range,
        reproducible,
    }
}

fn column(outputs: &[(BinaryOp, Vec<Scalar>)], op: BinaryOp) -> &[Scalar] {
    outputs
        .iter()
        .find(|(o, _)| *o == op)
        .map(|(_, v)| v.as_slice())
        .unwrap_or(&[])
}

/// Equal values, or both NaN.
fn same_value(a: Scalar, b: Scalar) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
