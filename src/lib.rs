#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod cli;
pub mod fasta;
pub mod log_utils;
pub mod mcnemar;
pub mod provider;
pub mod record;
pub mod sequence;
pub mod sites;
pub mod stat_funcs;
pub mod stats;
pub mod ttest;
