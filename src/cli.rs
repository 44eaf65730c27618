use clap::{value_parser, Arg};

use crate::log_utils::{init_log, LogLevel};

mod config;
mod sites_model;
mod stats_model;

pub use config::{ReferenceSource, SitesConfig, StatsConfig};
pub(crate) use sites_model::cli_model as sites_cli_model;
pub(crate) use stats_model::cli_model as stats_cli_model;

fn loglevel_arg() -> Arg {
    Arg::new("loglevel")
        .short('l')
        .long("loglevel")
        .value_name("LOGLEVEL")
        .value_parser(value_parser!(LogLevel))
        .ignore_case(true)
        .default_value("info")
        .help("Set log level")
}

pub fn handle_sites_cli() -> anyhow::Result<SitesConfig> {
    let m = sites_cli_model().get_matches();
    init_log(&m)?;
    SitesConfig::from_matches(&m)
}

pub fn handle_stats_cli() -> anyhow::Result<StatsConfig> {
    let m = stats_cli_model().get_matches();
    init_log(&m)?;
    StatsConfig::from_matches(&m)
}
