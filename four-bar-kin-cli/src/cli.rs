use crate::cfg::{AnyResult, Cfg};
use four_bar_kin::{Assembly, Sweep};
use std::path::PathBuf;

mod info;
mod solve;
mod sweep;

const APP_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(clap::Parser)]
#[clap(name = APP_NAME, version, author, about)]
pub(crate) struct Entry {
    /// Configuration file (in RON format), default to the example linkage
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the assembly mode, +1 or -1
    #[clap(long, global = true, allow_negative_numbers = true)]
    sigma: Option<i8>,
    /// Print more messages, repeat for more details (overrides `RUST_LOG`)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Solve a single crank angle
    Solve(solve::Solve),
    /// Solve a sweep of crank angles and write the trajectory table
    Sweep(sweep::SweepArgs),
    /// Run both solvers over the sweep and report their disagreement
    Compare(Range),
    /// Print the type and the input range of the linkage
    Info,
    /// Print the configuration in RON format
    Cfg,
}

/// Sweep range flags, override the configuration file.
#[derive(clap::Args, Clone, Copy)]
pub(crate) struct Range {
    /// First crank angle (deg)
    #[clap(long, allow_negative_numbers = true)]
    start: Option<f64>,
    /// Last crank angle (deg)
    #[clap(long, allow_negative_numbers = true)]
    end: Option<f64>,
    /// Crank angle increment (deg)
    #[clap(long)]
    step: Option<f64>,
}

impl Range {
    pub(crate) fn apply(self, sweep: Sweep) -> AnyResult<Sweep> {
        let Self { start, end, step } = self;
        Ok(Sweep::new(
            start.unwrap_or(sweep.start),
            end.unwrap_or(sweep.end),
            step.unwrap_or(sweep.step),
        )?)
    }
}

impl Entry {
    pub(crate) fn main() {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        init_logger(entry.verbose);
        register_panic_hook();
        if let Err(e) = entry.run() {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }

    fn run(self) -> AnyResult {
        let Self { config, sigma, cmd, .. } = self;
        let mut cfg = Cfg::load(config.as_deref())?;
        if let Some(sigma) = sigma {
            cfg.linkage.sigma = Assembly::try_from(sigma)?;
        }
        match cmd {
            Cmd::Solve(solve) => solve::solve(&cfg, solve),
            Cmd::Sweep(sweep) => sweep::sweep(cfg, sweep),
            Cmd::Compare(range) => sweep::compare(cfg, range),
            Cmd::Info => info::info(&cfg),
            Cmd::Cfg => {
                println!("{}", cfg.to_ron()?);
                Ok(())
            }
        }
    }
}

fn init_logger(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // Tables go to stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn register_panic_hook() {
    // Print panic messages without stack trace
    std::panic::set_hook(Box::new(|info| {
        match info.payload().downcast_ref::<&str>() {
            Some(s) => eprintln!("{s}"),
            None => eprintln!("{info}"),
        }
        std::process::exit(1);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_flags() {
        let entry = Entry::parse_from(["four-bar-kin", "solve", "30", "--sigma", "-1", "-vv"]);
        assert_eq!(entry.sigma, Some(-1));
        assert_eq!(entry.verbose, 2);
        assert!(matches!(entry.cmd, Cmd::Solve(_)));
        let entry = Entry::parse_from(["four-bar-kin", "-c", "lk.ron", "sweep", "--step", "10"]);
        assert_eq!(entry.config, Some(PathBuf::from("lk.ron")));
        let Cmd::Sweep(args) = entry.cmd else {
            panic!("expect sweep");
        };
        let sweep = args.range.apply(Sweep::default()).unwrap();
        assert_eq!(sweep.len(), 37);
    }

    #[test]
    fn bad_sigma() {
        let entry = Entry::parse_from(["four-bar-kin", "info", "--sigma", "2"]);
        assert!(entry.run().is_err());
    }
}
