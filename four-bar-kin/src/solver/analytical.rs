//! Closed-form position solution.
//!
//! Squaring the loop to eliminate `θ3` leaves `A·cos θ4 + B·sin θ4 + C = 0`,
//! a quadratic in `t = tan(θ4 / 2)`:
//!
//! ```text
//! (C − A)·t² + 2B·t + (A + C) = 0
//! t = (−B + σ·√(A² + B² − C²)) / (C − A)
//!   = (A + C) / (−B − σ·√(A² + B² − C²))
//! ```
//!
//! Both forms of the same root are evaluated with `atan2`, and the one with
//! the larger magnitude is used, so `C − A = 0` is not a singularity.
use super::Solver;
use crate::{wrap_angle, Angles, Linkage, SolveError, Sweep, Trajectory};

/// Relative tolerance of a negative radicand at the toggle positions.
const RADICAND_EPS: f64 = 1e-12;
/// Relative tolerance of a vanishing root.
const DEGENERATE_EPS: f64 = 1e-12;

/// Closed-form solver.
///
/// Stateless, every crank angle is solved independently and the assembly
/// mode is taken from [`Linkage::sigma`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Analytical;

impl Solver for Analytical {
    fn name(&self) -> &'static str {
        "analytical"
    }

    fn solve(&self, lk: &Linkage, theta2: f64, _warm: Option<Angles>) -> Result<Angles, SolveError> {
        solve(lk, theta2)
    }
}

impl Analytical {
    /// Solve all crank angles of a sweep independently, failures are
    /// recorded.
    ///
    /// The samples are computed in parallel with the `rayon` feature.
    pub fn par_sweep(&self, lk: &Linkage, sweep: &Sweep) -> Trajectory {
        #[cfg(feature = "rayon")]
        use rayon::prelude::*;
        let angles = sweep.angles().collect::<Vec<_>>();
        #[cfg(feature = "rayon")]
        let iter = angles.into_par_iter();
        #[cfg(not(feature = "rayon"))]
        let iter = angles.into_iter();
        iter.map(|theta2| self.sample(lk, theta2, None))
            .collect::<Vec<_>>()
            .into()
    }
}

/// Coefficients `[A, B, C]` of the position equation at a crank angle.
pub fn coefficients(lk: &Linkage, theta2: f64) -> [f64; 3] {
    let Linkage { r1, r2, r3, r4, theta1, .. } = *lk;
    let (s1, c1) = theta1.sin_cos();
    let (s2, c2) = theta2.sin_cos();
    let a = 2. * r1 * r4 * c1 - 2. * r2 * r4 * c2;
    let b = 2. * r1 * r4 * s1 - 2. * r2 * r4 * s2;
    let c = r1 * r1 + r2 * r2 + r4 * r4 - r3 * r3 - 2. * r1 * r2 * (theta1 - theta2).cos();
    [a, b, c]
}

/// Output link angle `θ4` on the branch of [`Linkage::sigma`].
pub fn output_angle(lk: &Linkage, theta2: f64) -> Result<f64, SolveError> {
    let [a, b, c] = coefficients(lk, theta2);
    let scale = a * a + b * b + c * c;
    let radicand = a * a + b * b - c * c;
    if radicand < -RADICAND_EPS * scale.max(1.) {
        return Err(SolveError::Unreachable { theta2, radicand });
    }
    let root = lk.sigma.sign() * radicand.max(0.).sqrt();
    let (n1, d1) = (-b + root, c - a);
    let (n2, d2) = (a + c, -b - root);
    let (n, d) = if n1.hypot(d1) >= n2.hypot(d2) { (n1, d1) } else { (n2, d2) };
    if n.hypot(d) <= DEGENERATE_EPS * scale.sqrt().max(1.) {
        return Err(SolveError::Degenerate { theta2 });
    }
    Ok(wrap_angle(2. * n.atan2(d)))
}

/// Coupler link angle `θ3` from a known `θ4`.
pub fn coupler_angle(lk: &Linkage, theta2: f64, theta4: f64) -> f64 {
    let Linkage { r1, r2, r4, theta1, .. } = *lk;
    f64::atan2(
        r1 * theta1.sin() + r4 * theta4.sin() - r2 * theta2.sin(),
        r1 * theta1.cos() + r4 * theta4.cos() - r2 * theta2.cos(),
    )
}

/// Solve the loop at a crank angle.
pub fn solve(lk: &Linkage, theta2: f64) -> Result<Angles, SolveError> {
    let theta4 = output_angle(lk, theta2)?;
    let theta3 = coupler_angle(lk, theta2, theta4);
    Ok(Angles::new(theta3, theta4))
}
