use serde::Serialize;

use elementwise_core::{metrics::ulp_distance, sigma1, sigma2, Scalar};

/// `steps` evenly spaced inputs covering `[-limit, limit]`.
pub fn sigmoid_sweep(limit: Scalar, steps: usize) -> Vec<Scalar> {
    match steps {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let span = 2.0 * limit;
            let last = (steps - 1) as Scalar;
            (0..steps)
                .map(|i| -limit + span * (i as Scalar) / last)
                .collect()
        }
    }
}

/// Both sigmoid forms evaluated at one input.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SigmoidComparison {
    pub x: Scalar,
    pub sigma1: Scalar,
    pub sigma2: Scalar,
    pub abs_diff: Scalar,
    pub ulps: Option<u64>,
}

pub fn compare_sigmoids(inputs: &[Scalar]) -> Vec<SigmoidComparison> {
    inputs
        .iter()
        .map(|&x| {
            let s1 = sigma1(x);
            let s2 = sigma2(x);
            SigmoidComparison {
                x,
                sigma1: s1,
                sigma2: s2,
                abs_diff: (s1 - s2).abs(),
                ulps: ulp_distance(s1, s2),
            }
        })
        .collect()
}
