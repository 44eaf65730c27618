use std::path::PathBuf;

use clap::{crate_version, value_parser, Arg, Command};

pub(crate) fn cli_model() -> Command {
    Command::new("antigenic_sites")
        .version(crate_version!())
        .about("Antigenic site amino acid comparison in VP1, VP2 and VP3")
        .next_help_heading("NCBI")
        .arg(
            Arg::new("email")
                .long("email")
                .env("NCBI_EMAIL")
                .value_parser(value_parser!(String))
                .value_name("EMAIL")
                .help("Contact email sent with NCBI requests"),
        )
        .arg(
            Arg::new("api_key")
                .long("api_key")
                .env("NCBI_API_KEY")
                .hide_env_values(true)
                .value_parser(value_parser!(String))
                .value_name("KEY")
                .help("NCBI API key"),
        )
        .next_help_heading("Input/Output")
        .arg(
            Arg::new("ref_acc")
                .long("ref_acc")
                .required(true)
                .value_parser(value_parser!(String))
                .value_name("ACCESSION")
                .help("Reference accession with annotated capsid proteins, for example V01150.1"),
        )
        .arg(
            Arg::new("ref_gb")
                .long("ref_gb")
                .value_parser(value_parser!(PathBuf))
                .value_name("GenBank File")
                .help("Read the reference from a local GenBank file instead of NCBI"),
        )
        .arg(
            Arg::new("genomes")
                .long("genomes")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .value_name("FASTA File")
                .help("FASTA with one or more sample genomes"),
        )
        .arg(
            Arg::new("out_tsv")
                .long("out_tsv")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .value_name("TSV File")
                .help("Output file"),
        )
        .arg(super::loglevel_arg())
}
