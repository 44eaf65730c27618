use capsid_tools::{cli, sites};

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_sites_cli()?;
    let provider = cfg.provider();
    sites::process_samples(&cfg, provider.as_ref())
}
