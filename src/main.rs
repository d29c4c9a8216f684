use clap::Parser;
use engulfbt::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
