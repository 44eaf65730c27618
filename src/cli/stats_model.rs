use std::path::PathBuf;

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

pub(crate) fn cli_model() -> Command {
    Command::new("mcnemar_ttest")
        .version(crate_version!())
        .about("McNemar test and paired t-test from CSV tables")
        .arg(
            Arg::new("contingency")
                .long("contingency")
                .value_parser(value_parser!(PathBuf))
                .value_name("CSV File")
                .help("CSV with columns method1, method2 where values are 0 or 1"),
        )
        .arg(
            Arg::new("paired_id")
                .long("paired_id")
                .value_parser(value_parser!(PathBuf))
                .value_name("CSV File")
                .help("CSV with columns id, identity_ngs, identity_sanger"),
        )
        .arg(
            Arg::new("asymptotic")
                .long("asymptotic")
                .action(ArgAction::SetTrue)
                .help("Also report the chi-square McNemar test with continuity correction"),
        )
        .arg(super::loglevel_arg())
}
