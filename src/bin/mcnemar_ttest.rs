use std::io;

use capsid_tools::{cli, stats};

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_stats_cli()?;
    let tests = stats::StatTests::new();
    let mut out = io::stdout().lock();
    stats::run_comparisons(&cfg, &tests, &mut out)
}
