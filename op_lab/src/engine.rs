//! Reference elementwise driver: binds registry operations to plain slices.
//!
//! This is the lab's stand-in for a real buffer engine. It walks slices front
//! to back on the calling thread and owns the [`RandomSource`] used by
//! [`UnaryOp::Rand`].

use anyhow::{ensure, Result};

use elementwise_core::{add_with_scale, BinaryOp, RandomSettings, RandomSource, Scalar, UnaryOp};

pub struct ElementwiseEngine {
    random: RandomSource,
}

impl ElementwiseEngine {
    pub fn new(settings: &RandomSettings) -> Self {
        let random = RandomSource::from_settings(settings);
        tracing::debug!(seed = ?random.seed(), "created elementwise engine");
        Self { random }
    }

    pub fn with_source(random: RandomSource) -> Self {
        Self { random }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.random.reseed(seed);
    }

    pub fn random(&self) -> &RandomSource {
        &self.random
    }

    /// `out[i] = op(input[i])`.
    pub fn map(&mut self, op: UnaryOp, input: &[Scalar], out: &mut [Scalar]) -> Result<()> {
        ensure_same_len("map", input.len(), out.len())?;
        for (dst, &x) in out.iter_mut().zip(input) {
            *dst = op.apply(x, &mut self.random);
        }
        Ok(())
    }

    pub fn map_in_place(&mut self, op: UnaryOp, buf: &mut [Scalar]) {
        for v in buf.iter_mut() {
            *v = op.apply(*v, &mut self.random);
        }
    }

    /// Overwrites `buf` with `op` of its current contents; meant for the
    /// input-ignoring ops (`zero`, `one`, `rand`).
    pub fn fill(&mut self, op: UnaryOp, buf: &mut [Scalar]) {
        self.map_in_place(op, buf);
    }

    /// `out[i] = op(a[i], b[i])`.
    pub fn zip(&self, op: BinaryOp, a: &[Scalar], b: &[Scalar], out: &mut [Scalar]) -> Result<()> {
        zip_with(op.function(), a, b, out)
    }

    /// `out[i] = a[i] + scale * b[i]` with one scale for the whole buffer.
    pub fn zip_scaled(
        &self,
        a: &[Scalar],
        b: &[Scalar],
        scale: Scalar,
        out: &mut [Scalar],
    ) -> Result<()> {
        zip_with(|x, y| add_with_scale(x, y, scale), a, b, out)
    }

    /// `out[i] = a[i] + scales[i] * b[i]`.
    pub fn zip_scaled_each(
        &self,
        a: &[Scalar],
        b: &[Scalar],
        scales: &[Scalar],
        out: &mut [Scalar],
    ) -> Result<()> {
        ensure_same_len("zip_scaled_each", a.len(), b.len())?;
        ensure_same_len("zip_scaled_each", a.len(), scales.len())?;
        ensure_same_len("zip_scaled_each", a.len(), out.len())?;
        for (i, dst) in out.iter_mut().enumerate() {
            *dst = add_with_scale(a[i], b[i], scales[i]);
        }
        Ok(())
    }

    /// Left fold of `buf` with `op`, starting from `init`.
    pub fn reduce(&self, op: BinaryOp, buf: &[Scalar], init: Scalar) -> Scalar {
        let f = op.function();
        buf.iter().fold(init, |acc, &v| f(acc, v))
    }
}

impl Default for ElementwiseEngine {
    fn default() -> Self {
        Self::new(&RandomSettings::default())
    }
}

/// `out[i] = f(input[i])` for any unary handle.
pub fn map_with<F>(mut f: F, input: &[Scalar], out: &mut [Scalar]) -> Result<()>
where
    F: FnMut(Scalar) -> Scalar,
{
    ensure_same_len("map_with", input.len(), out.len())?;
    for (dst, &x) in out.iter_mut().zip(input) {
        *dst = f(x);
    }
    Ok(())
}

/// `out[i] = f(a[i], b[i])` for any binary handle.
pub fn zip_with<F>(f: F, a: &[Scalar], b: &[Scalar], out: &mut [Scalar]) -> Result<()>
where
    F: Fn(Scalar, Scalar) -> Scalar,
{
    ensure_same_len("zip", a.len(), b.len())?;
    ensure_same_len("zip", a.len(), out.len())?;
    for ((dst, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *dst = f(x, y);
    }
    Ok(())
}

fn ensure_same_len(what: &str, expected: usize, got: usize) -> Result<()> {
    ensure!(
        expected == got,
        "{what}: buffer length mismatch (expected {expected}, got {got})"
    );
    Ok(())
}
