use crate::cfg::{AnyResult, Cfg};
use four_bar_kin::AngleBound;

pub(super) fn info(cfg: &Cfg) -> AnyResult {
    let lk = &cfg.linkage;
    lk.validate()?;
    let [r1, r2, r3, r4] = lk.planar_loop();
    println!("r1={r1}, r2={r2}, r3={r3}, r4={r4}, θ1={}°", lk.theta1.to_degrees());
    println!("type={}", lk.ty().name());
    let bound = lk.angle_bound();
    print!("bound={}", bound.description());
    match bound {
        AngleBound::Open([start, end]) => println!(" [{:.4}°, {:.4}°]", start.to_degrees(), end.to_degrees()),
        AngleBound::Split(ranges) => {
            for [start, end] in ranges {
                print!(" [{:.4}°, {:.4}°]", start.to_degrees(), end.to_degrees());
            }
            println!();
        }
        AngleBound::Closed | AngleBound::Invalid => println!(),
    }
    let [u, v] = lk.tracer.local();
    println!("tracer=({u:.6}, {v:.6}) on the coupler frame");
    let ob = lk.output_pivot();
    println!("output pivot=({:.6}, {:.6})", ob.x, ob.y);
    println!("assembly {}", lk.sigma);
    Ok(())
}
