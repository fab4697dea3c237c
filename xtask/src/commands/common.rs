use anyhow::Result;
use xshell::{Shell, cmd};

/// Run rustfmt over the workspace; `check` only reports differences.
pub fn run_fmt(sh: &Shell, check: bool) -> Result<()> {
    let check = check.then_some(["--", "--check"]).into_iter().flatten();
    eprintln!("Running cargo fmt...");
    cmd!(sh, "cargo fmt --all {check...}").run()?;
    Ok(())
}

/// Run clippy with all warnings treated as errors
pub fn run_clippy(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo clippy...");
    cmd!(sh, "cargo clippy --all-targets --workspace -- -D warnings").run()?;
    Ok(())
}

/// Run the workspace tests.
///
/// Snapshot mismatches fail the run; with `accept_snapshots` insta rewrites
/// them in place instead.
pub fn run_tests(sh: &Shell, accept_snapshots: bool, args: &[String]) -> Result<()> {
    let update = if accept_snapshots { "always" } else { "no" };
    let _env = sh.push_env("INSTA_UPDATE", update);
    eprintln!("Running cargo test...");
    cmd!(sh, "cargo test --workspace {args...}").run()?;
    Ok(())
}
