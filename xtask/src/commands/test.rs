use anyhow::Result;
use clap::Args;
use xshell::Shell;

use super::common;

#[derive(Args)]
pub struct Test {
    /// Accept changed insta snapshots instead of failing
    #[arg(long)]
    accept: bool,

    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Test {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        common::run_tests(sh, self.accept, &self.args)
    }
}
