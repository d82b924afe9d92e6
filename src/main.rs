use cliproc::{Cli, ExitCode};
use pathwrap::Pathwrap;
use std::env;

fn main() -> ExitCode {
    Cli::default().parse(env::args()).go::<Pathwrap>()
}
