//! Trajectory tables in CSV format.
//!
//! One row per crank angle under a header line, failed samples included.
//! A dump starts with the linkage in `#` comment lines, which the reader
//! skips.
pub use csv::Error;
use crate::{Linkage, Row, Trajectory};
use csv::{ReaderBuilder, Writer};
use std::io::Write as _;

type DumpResult = Result<String, Box<dyn std::error::Error>>;

/// Parse the rows of a trajectory table.
pub fn parse_rows(s: &str) -> Result<Vec<Row>, Error> {
    ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .from_reader(s.as_bytes())
        .deserialize()
        .collect()
}

/// Dump rows under a header line.
pub fn dump_rows(rows: &[Row]) -> DumpResult {
    write_rows(Vec::new(), rows)
}

/// Dump a trajectory with its linkage in the leading comment lines.
pub fn dump_trajectory(lk: &Linkage, traj: &Trajectory) -> DumpResult {
    let mut buf = Vec::new();
    let [r1, r2, r3, r4] = lk.planar_loop();
    writeln!(buf, "# r1={r1}, r2={r2}, r3={r3}, r4={r4}, theta1={}", lk.theta1)?;
    let [u, v] = lk.tracer.local();
    writeln!(buf, "# tracer=({u}, {v}), {}", lk.sigma)?;
    writeln!(buf, "# {}, {} of {} failed", lk.ty().name(), traj.failures().count(), traj.len())?;
    write_rows(buf, &traj.rows())
}

fn write_rows(buf: Vec<u8>, rows: &[Row]) -> DumpResult {
    let mut w = Writer::from_writer(buf);
    rows.iter().try_for_each(|row| w.serialize(row))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analytical, Policy, Solver, Sweep};

    #[test]
    fn trajectory_table() {
        let lk = Linkage::new([2., 2., 1., 1.5], 0.);
        let sweep = Sweep::new(0., 360., 30.).unwrap();
        let traj = Analytical.sweep(&lk, &sweep, Policy::Record).unwrap();
        let table = traj.to_csv().unwrap();
        assert!(table.starts_with("theta2,valid,theta3,theta4,ax,ay,bx,by,ex,ey,error"));
        let rows = parse_rows(&table).unwrap();
        assert_eq!(rows.len(), sweep.len());
        assert_eq!(rows, traj.rows());
        // Index-to-angle correspondence survives the failures
        assert!(!rows[0].valid);
        assert_eq!(rows[0].theta3, None);
        assert!(rows[0].error.as_deref().is_some_and(|e| e.starts_with("unreachable")));
        assert!(rows[2].valid);
        assert!((rows[2].theta2 - 60.).abs() < 1e-12);
    }

    #[test]
    fn linkage_in_comments() {
        let lk = Linkage::example();
        let traj = Analytical
            .sweep(&lk, &Sweep::full(4).unwrap(), Policy::FailFast)
            .unwrap();
        let table = dump_trajectory(&lk, &traj).unwrap();
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("# r1=1, r2=2, r3=3.5, r4=4, theta1=0"));
        assert!(lines.next().is_some_and(|s| s.ends_with("σ=+1")));
        assert!(lines.next().is_some_and(|s| s.ends_with("0 of 5 failed")));
        assert!(lines.next().is_some_and(|s| s.starts_with("theta2,")));
        assert_eq!(parse_rows(&table).unwrap(), traj.rows());
    }
}
