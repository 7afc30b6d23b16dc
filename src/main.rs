use clap::Parser;
use meanrev::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
