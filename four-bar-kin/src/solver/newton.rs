use super::{analytical, Solver};
use crate::{Anchor, Angles, Linkage, SolveError};

/// Initial guess of the first sample of a sweep.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Seed {
    /// A fixed guess, must not make the coupler and the output link collinear
    ///
    /// The branch is the one the guess converges to, [`Linkage::sigma`] is
    /// not consulted.
    Fixed(Angles),
    /// The closed-form solution on the branch of [`Linkage::sigma`]
    Analytical,
}

impl Default for Seed {
    fn default() -> Self {
        NewtonCfg::new().seed
    }
}

/// Configuration of the Newton solver.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonCfg {
    /// Residual norm tolerance
    pub tol: f64,
    /// Maximum iterations per sample
    pub max_iter: usize,
    /// Smallest accepted `|det J| / (r3·r4)`
    pub min_det: f64,
    /// Guess of the first sample
    pub seed: Seed,
}

impl Default for NewtonCfg {
    fn default() -> Self {
        Self::new()
    }
}

impl NewtonCfg {
    /// Default values.
    pub const fn new() -> Self {
        Self {
            tol: 1e-10,
            max_iter: 50,
            min_det: 1e-12,
            seed: Seed::Analytical,
        }
    }
}

/// Converged Newton iterate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Converged {
    /// Solution, wrapped into `(−π, π]`
    pub angles: Angles,
    /// Iterations spent
    pub iter: usize,
    /// Final residual norm
    pub residual: f64,
}

/// Newton iteration on the vector loop residual.
///
/// In a sweep, the solution of the previous sample is the guess of the next
/// one, which keeps the iterate on the same assembly branch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Newton {
    /// Configuration
    pub cfg: NewtonCfg,
}

impl Newton {
    /// Create a new solver.
    pub const fn new(cfg: NewtonCfg) -> Self {
        Self { cfg }
    }

    /// Create a solver whose first guess is the closed-form solution.
    pub fn seeded_by_analytical(cfg: NewtonCfg) -> Self {
        Self::new(NewtonCfg { seed: Seed::Analytical, ..cfg })
    }

    /// Create a solver starting from a fixed guess.
    pub fn seeded_by(cfg: NewtonCfg, guess: Angles) -> Self {
        Self::new(NewtonCfg { seed: Seed::Fixed(guess), ..cfg })
    }

    /// The guess when no warm start is given.
    pub fn seed(&self, lk: &Linkage, theta2: f64) -> Result<Angles, SolveError> {
        match self.cfg.seed {
            Seed::Fixed(guess) => Ok(guess),
            Seed::Analytical => analytical::solve(lk, theta2),
        }
    }

    /// Refine `guess` until the residual norm is below the tolerance.
    pub fn iterate(&self, lk: &Linkage, theta2: f64, guess: Angles) -> Result<Converged, SolveError> {
        let NewtonCfg { tol, max_iter, min_det, .. } = self.cfg;
        let mut x = guess.to_vector();
        let mut residual = f64::NAN;
        for iter in 0..=max_iter {
            let r = lk.residual_vec(theta2, x.into());
            residual = r.norm();
            if !residual.is_finite() {
                break;
            }
            if residual < tol {
                let angles = Angles::from(x).wrapped();
                return Ok(Converged { angles, iter, residual });
            }
            if iter == max_iter {
                break;
            }
            let jac = lk.jacobian(x.into());
            let det = jac.determinant();
            if det.abs() < min_det * lk.r3 * lk.r4 {
                tracing::debug!("singular Jacobian at iteration {iter}: det={det:.3e}");
                return Err(SolveError::SingularJacobian { theta2, det });
            }
            let dx = jac
                .lu()
                .solve(&r)
                .ok_or(SolveError::SingularJacobian { theta2, det })?;
            x -= dx;
        }
        tracing::debug!("no convergence at θ2={theta2:.6}: residual={residual:.3e}");
        Err(SolveError::NonConvergence { theta2, iter: max_iter, residual })
    }
}

impl Solver for Newton {
    fn name(&self) -> &'static str {
        "newton"
    }

    fn anchor(&self) -> Anchor {
        Anchor::Output
    }

    fn solve(&self, lk: &Linkage, theta2: f64, warm: Option<Angles>) -> Result<Angles, SolveError> {
        let guess = match warm {
            Some(guess) => guess,
            None => self.seed(lk, theta2)?,
        };
        self.iterate(lk, theta2, guess).map(|c| c.angles)
    }
}
