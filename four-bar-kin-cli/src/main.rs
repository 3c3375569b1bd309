//! Command line front-end of the four-bar position solvers.
mod cfg;
mod cli;

fn main() {
    cli::Entry::main();
}
