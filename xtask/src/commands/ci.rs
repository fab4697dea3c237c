use anyhow::Result;
use clap::{Args, Subcommand};
use xshell::Shell;

use super::common;

#[derive(Args)]
pub struct Ci {
    #[command(subcommand)]
    command: Option<CiCommand>,
}

#[derive(Subcommand)]
pub enum CiCommand {
    /// Check formatting
    Fmt,
    /// Run cargo clippy
    Clippy,
    /// Run cargo test with snapshot updates disabled
    Test {
        /// Additional arguments to pass to cargo test
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Ci {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match &self.command {
            Some(cmd) => cmd.run(sh),
            None => {
                CiCommand::Fmt.run(sh)?;
                CiCommand::Clippy.run(sh)?;
                CiCommand::Test { args: Vec::new() }.run(sh)
            }
        }
    }
}

impl CiCommand {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match self {
            CiCommand::Fmt => common::run_fmt(sh, true),
            CiCommand::Clippy => common::run_clippy(sh),
            CiCommand::Test { args } => {
                let _ci = sh.push_env("CI", "true");
                common::run_tests(sh, false, args)
            }
        }
    }
}
