use super::Range;
use crate::cfg::{AnyResult, Cfg};
use four_bar_kin::{angle_diff, Analytical, Method, Newton, Policy, Solver, Trajectory};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct SweepArgs {
    #[clap(flatten)]
    pub(super) range: Range,
    /// Solving method, default to the configuration file
    #[clap(short, long)]
    method: Option<Method>,
    /// Failure policy, default to the configuration file
    #[clap(short, long)]
    policy: Option<Policy>,
    /// Output path of the trajectory table (in CSV format), default to stdout
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Disable parallel computing
    #[clap(long)]
    no_parallel: bool,
}

pub(super) fn sweep(cfg: Cfg, args: SweepArgs) -> AnyResult {
    let SweepArgs { range, method, policy, output, no_parallel } = args;
    let Cfg { linkage: lk, newton, .. } = &cfg;
    lk.validate()?;
    let sweep = range.apply(cfg.sweep)?;
    let method = method.unwrap_or(cfg.method);
    let policy = policy.unwrap_or(cfg.policy);
    tracing::info!("{} {:?} sweep, {} samples, {}", lk.ty().name(), method, sweep.len(), lk.sigma);
    let t0 = std::time::Instant::now();
    let traj = match (method, policy) {
        // Samples are independent
        (Method::Analytical, Policy::Record) if !no_parallel => Analytical.par_sweep(lk, &sweep),
        _ => method.solver(*newton).sweep(lk, &sweep, policy)?,
    };
    tracing::debug!("solved in {:.3?}", t0.elapsed());
    report(&traj);
    let table = four_bar_kin::csv::dump_trajectory(lk, &traj)?;
    match output {
        Some(path) => {
            std::fs::write(&path, table)?;
            tracing::info!("write to {}", path.display());
        }
        None => print!("{table}"),
    }
    Ok(())
}

fn report(traj: &Trajectory) {
    let mut failures = traj.failures().peekable();
    if failures.peek().is_none() {
        return;
    }
    let mut kinds = std::collections::BTreeMap::<_, usize>::new();
    for (_, e) in failures {
        *kinds.entry(e.kind()).or_default() += 1;
    }
    for (kind, n) in kinds {
        tracing::warn!("{n} samples failed: {kind}");
    }
}

/// Largest wrapped differences of `θ3` and `θ4` over the indices solved by
/// both.
fn max_diff(lhs: &Trajectory, rhs: &Trajectory) -> [f64; 2] {
    lhs.angles()
        .into_iter()
        .zip(rhs.angles())
        .filter_map(|(a, b)| Some((a?, b?)))
        .fold([0.; 2], |[d3, d4], (a, b)| {
            [
                d3.max(angle_diff(a.theta3, b.theta3).abs()),
                d4.max(angle_diff(a.theta4, b.theta4).abs()),
            ]
        })
}

pub(super) fn compare(cfg: Cfg, range: Range) -> AnyResult {
    let Cfg { linkage: lk, newton, .. } = &cfg;
    lk.validate()?;
    let sweep = range.apply(cfg.sweep)?;
    let newton = Newton::new(*newton);
    let lhs = Analytical.sweep(lk, &sweep, Policy::Record)?;
    let rhs = newton.sweep(lk, &sweep, Policy::Record)?;
    let [d3, d4] = max_diff(&lhs, &rhs);
    println!("samples={}, {}", sweep.len(), lk.sigma);
    for (name, traj) in [(Analytical.name(), &lhs), (newton.name(), &rhs)] {
        println!("{name}: failed={}, max jump={:.4}°", traj.failures().count(), traj.max_jump().to_degrees());
    }
    println!("max |Δθ3|={d3:.3e} rad");
    println!("max |Δθ4|={d4:.3e} rad");
    Ok(())
}
