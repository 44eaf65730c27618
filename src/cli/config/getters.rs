use std::path::Path;

use crate::provider::{EntrezClient, GenbankFile, SequenceProvider};

use super::{ReferenceSource, SitesConfig, StatsConfig};

impl SitesConfig {
    pub fn reference(&self) -> &ReferenceSource {
        &self.reference
    }

    pub fn ref_acc(&self) -> &str {
        &self.ref_acc
    }

    pub fn genomes(&self) -> &Path {
        &self.genomes
    }

    pub fn out_tsv(&self) -> &Path {
        &self.out_tsv
    }

    pub fn provider(&self) -> Box<dyn SequenceProvider> {
        match &self.reference {
            ReferenceSource::Entrez { email, api_key } => {
                Box::new(EntrezClient::new(email, api_key.as_deref()))
            }
            ReferenceSource::File(path) => Box::new(GenbankFile::new(path)),
        }
    }
}

impl StatsConfig {
    pub fn contingency(&self) -> Option<&Path> {
        self.contingency.as_deref()
    }

    pub fn paired_id(&self) -> Option<&Path> {
        self.paired_id.as_deref()
    }

    pub fn asymptotic(&self) -> bool {
        self.asymptotic
    }
}
