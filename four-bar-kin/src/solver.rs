//! Position solvers.
//!
//! Every solver answers the same question: the loop solution at a crank
//! angle. A sweep over crank angles is a fold, whose accumulator is the last
//! good solution, used as the warm start of the next sample.
pub use self::{analytical::Analytical, newton::*};
use crate::{Anchor, Angles, Linkage, Policy, Sample, SolveError, Sweep, Trajectory};

pub mod analytical;
mod newton;

/// Position solver behavior.
pub trait Solver {
    /// Name of the method.
    fn name(&self) -> &'static str;

    /// Joint that B is derived from in the post-processing.
    fn anchor(&self) -> Anchor {
        Anchor::Coupler
    }

    /// Solve the loop at a crank angle.
    ///
    /// `warm` is the solution of the previous sample, if any. Stateless
    /// solvers ignore it.
    fn solve(&self, lk: &Linkage, theta2: f64, warm: Option<Angles>) -> Result<Angles, SolveError>;

    /// Solve and post-process a single sample.
    fn sample(&self, lk: &Linkage, theta2: f64, warm: Option<Angles>) -> Sample {
        match self.solve(lk, theta2, warm) {
            Ok(angles) => Sample::solved(lk, theta2, angles, self.anchor()),
            Err(e) => Sample::failed(e),
        }
    }

    /// Solve all crank angles of a sweep in order.
    ///
    /// With [`Policy::FailFast`], the first failure is returned. With
    /// [`Policy::Record`], the failure is kept at its index and the next
    /// sample starts from the last good solution.
    fn sweep(&self, lk: &Linkage, sweep: &Sweep, policy: Policy) -> Result<Trajectory, SolveError> {
        let init = (None, Vec::with_capacity(sweep.len()));
        let (_, samples) = sweep.angles().try_fold(init, |(warm, mut samples), theta2| {
            let sample = self.sample(lk, theta2, warm);
            let warm = match &sample.state {
                Ok(solved) => Some(solved.angles),
                Err(e) if policy == Policy::FailFast => {
                    tracing::warn!("{} sweep aborted: {e}", self.name());
                    return Err(e.clone());
                }
                Err(e) => {
                    tracing::debug!("{} sample #{} failed: {e}", self.name(), samples.len());
                    warm
                }
            };
            samples.push(sample);
            Ok((warm, samples))
        })?;
        let traj = Trajectory::from(samples);
        tracing::info!(
            "{} sweep: {} samples, {} failed",
            self.name(),
            traj.len(),
            traj.failures().count()
        );
        Ok(traj)
    }
}

/// Selectable solving method.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Method {
    /// Closed form
    #[default]
    Analytical,
    /// Newton iteration
    Newton,
}

impl Method {
    /// Build the solver, using `cfg` for the iterative method.
    pub fn solver(self, cfg: NewtonCfg) -> Box<dyn Solver> {
        match self {
            Self::Analytical => Box::new(Analytical),
            Self::Newton => Box::new(Newton::new(cfg)),
        }
    }
}
