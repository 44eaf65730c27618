use std::path::PathBuf;

mod getters;
mod mk_config;

/// Where the annotated reference comes from
#[derive(Debug)]
pub enum ReferenceSource {
    Entrez {
        email: Box<str>,
        api_key: Option<Box<str>>,
    },
    File(PathBuf),
}

pub struct SitesConfig {
    reference: ReferenceSource,
    ref_acc: Box<str>,
    genomes: PathBuf,
    out_tsv: PathBuf,
}

pub struct StatsConfig {
    contingency: Option<PathBuf>,
    paired_id: Option<PathBuf>,
    asymptotic: bool,
}
