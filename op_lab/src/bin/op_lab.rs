use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use elementwise_core::{version_string, PRECISION};
use op_lab::{
    case_io::{export_case_sets_to_json, import_case_sets_from_json, CaseSet},
    cases::{generate_pair_cases, pair_stress_cases, sigmoid_sweep},
    config::LabSettings,
    init_tracing,
    report::{run_lab, LabReport},
};

#[derive(Parser, Debug)]
#[command(name = "op_lab", about = "Check the elementwise registry's numeric contracts")]
struct Args {
    /// JSON settings file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    count: Option<usize>,
    /// Case generation seed, decimal or 0x-prefixed hex.
    #[arg(long, value_parser = parse_seed)]
    seed: Option<u64>,
    #[arg(long)]
    tolerance: Option<f64>,
    #[arg(long)]
    draws: Option<usize>,
    /// Load case sets from JSON instead of generating them.
    #[arg(long)]
    cases_json: Option<PathBuf>,
    #[arg(long)]
    export_json: Option<PathBuf>,
    #[arg(long)]
    report_json: Option<PathBuf>,
    /// Stop after preparing (and optionally exporting) the case sets.
    #[arg(long)]
    skip_check: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    tracing::info!(
        version = version_string(),
        precision = ?PRECISION,
        "starting op lab"
    );

    let case_sets = if let Some(ref path) = args.cases_json {
        tracing::info!(path = %path.display(), "loading case sets");
        import_case_sets_from_json(path)?
    } else {
        tracing::info!(
            count = settings.count,
            seed = %format!("0x{:X}", settings.seed),
            "generating case sets"
        );
        build_case_sets(&settings)
    };

    if let Some(ref path) = args.export_json {
        export_case_sets_to_json(&case_sets, path)?;
        println!(
            "Exported {} case sets ({}) to {}",
            case_sets.len(),
            case_sets
                .iter()
                .map(|set| set.label())
                .collect::<Vec<_>>()
                .join(", "),
            path.display()
        );
    }

    if args.skip_check {
        println!("Skip-check flag set; exiting after case preparation.");
        return Ok(());
    }

    let report = run_lab(&case_sets, &settings)?;
    print_report(&report);

    if let Some(ref path) = args.report_json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    if !report.passed() {
        bail!("elementwise contracts violated; see report above");
    }
    Ok(())
}

fn resolve_settings(args: &Args) -> Result<LabSettings> {
    let mut settings = match args.config {
        Some(ref path) => LabSettings::load(path)?,
        None => LabSettings::default(),
    };
    if let Some(count) = args.count {
        settings.count = count;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(tolerance) = args.tolerance {
        settings.tolerance = tolerance as _;
    }
    if let Some(draws) = args.draws {
        settings.draws = draws;
    }
    settings.validate()?;
    Ok(settings)
}

fn build_case_sets(settings: &LabSettings) -> Vec<CaseSet> {
    vec![
        CaseSet::Pairs {
            label: format!("pairs_0x{:X}", settings.seed),
            cases: generate_pair_cases(settings.count, settings.seed),
        },
        CaseSet::Pairs {
            label: "stress_edges".into(),
            cases: pair_stress_cases(),
        },
        CaseSet::SigmoidSweep {
            label: "sigmoid_agreement".into(),
            inputs: sigmoid_sweep(settings.sigmoid_limit * 0.999, settings.sweep_steps),
        },
        CaseSet::SigmoidSweep {
            label: "sigmoid_saturation".into(),
            inputs: sigmoid_sweep(settings.sigmoid_limit * 5.0, settings.sweep_steps),
        },
    ]
}

fn print_report(report: &LabReport) {
    println!("Precision: {:?}", report.precision);
    for set in &report.sets {
        let status = if set.passed() { "ok" } else { "FAILED" };
        println!(
            "Set '{}' [{}] ({} cases, checksum {:016x}): {status}",
            set.label, set.kind, set.cases, set.checksum
        );
        for check in &set.checks {
            println!(
                "  {:<32} {:>6} checked, {} failed",
                check.name, check.checked, check.failures
            );
            for example in &check.examples {
                println!("    {example}");
            }
        }
        if let Some(ref sigmoid) = set.sigmoid {
            if let Some(x) = sigmoid.worst_x_inside {
                println!(
                    "  max |sigma1 - sigma2| inside |x|<{}: {:.3e} at x={x} ({} ulps there)",
                    sigmoid.limit,
                    sigmoid.max_diff_inside,
                    sigmoid
                        .ulps_at_worst_inside
                        .map_or_else(|| "?".to_string(), |u| u.to_string())
                );
            }
            println!(
                "  max ulps inside |x|<{} (any x): {}",
                sigmoid.limit, sigmoid.max_ulps_inside
            );
            if let Some(outside) = sigmoid.max_diff_outside {
                println!("  max |sigma1 - sigma2| outside (expected): {outside:.3e}");
            }
        }
    }
    let random = &report.random;
    println!(
        "Random draws (seed=0x{:X}, n={}): min={:?} max={:?} out_of_range={} reproducible={}",
        random.seed, random.draws, random.min, random.max, random.out_of_range, random.reproducible
    );
}

fn parse_seed(value: &str) -> Result<u64> {
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).context("expected hex literal")
    } else {
        value.parse().context("expected integer seed")
    }
}
