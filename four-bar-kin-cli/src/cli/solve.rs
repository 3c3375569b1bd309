use crate::cfg::{AnyResult, Cfg};
use four_bar_kin::{Method, Pose};

#[derive(clap::Args)]
pub(super) struct Solve {
    /// Crank angle (deg)
    #[clap(allow_negative_numbers = true)]
    theta2: f64,
    /// Solving method, default to the configuration file
    #[clap(short, long)]
    method: Option<Method>,
}

pub(super) fn solve(cfg: &Cfg, solve: Solve) -> AnyResult {
    let Solve { theta2, method } = solve;
    let lk = &cfg.linkage;
    lk.validate()?;
    let solver = method.unwrap_or(cfg.method).solver(cfg.newton);
    let theta2 = theta2.to_radians();
    let angles = solver.solve(lk, theta2, None)?;
    let pose = Pose::new(lk, theta2, angles, solver.anchor());
    let [theta3, theta4] = angles.to_degrees();
    println!("method={}, {}", solver.name(), lk.sigma);
    println!("θ2={:.6}°", theta2.to_degrees());
    println!("θ3={theta3:.6}°");
    println!("θ4={theta4:.6}°");
    let Pose { a, b, e } = pose;
    for (name, [x, y]) in [("A", a), ("B", b), ("E", e)] {
        println!("{name}=({x:.6}, {y:.6})");
    }
    println!("loop gap={:.3e}", Pose::loop_gap(lk, theta2, angles));
    Ok(())
}
