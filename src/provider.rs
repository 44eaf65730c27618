use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use crate::record::GenomicRecord;

const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Source of annotated reference records
pub trait SequenceProvider {
    fn fetch(&self, accession: &str) -> anyhow::Result<GenomicRecord>;
}

/// NCBI E-utilities efetch client (GenBank flat file format)
pub struct EntrezClient {
    email: Box<str>,
    api_key: Option<Box<str>>,
    tool: &'static str,
}

impl EntrezClient {
    pub fn new(email: &str, api_key: Option<&str>) -> Self {
        Self {
            email: Box::from(email),
            api_key: api_key.map(Box::from),
            tool: env!("CARGO_PKG_NAME"),
        }
    }

    fn request(&self, accession: &str) -> ureq::Request {
        let req = ureq::get(EFETCH_URL)
            .query("db", "nucleotide")
            .query("id", accession)
            .query("rettype", "gb")
            .query("retmode", "text")
            .query("tool", self.tool)
            .query("email", &self.email);
        match self.api_key.as_deref() {
            Some(key) => req.query("api_key", key),
            None => req,
        }
    }
}

impl SequenceProvider for EntrezClient {
    fn fetch(&self, accession: &str) -> anyhow::Result<GenomicRecord> {
        info!("Fetching {} from NCBI", accession);
        let resp = self
            .request(accession)
            .call()
            .map_err(|e| anyhow!("Failed to fetch {} from NCBI: {}", accession, e))?;
        GenomicRecord::from_genbank(resp.into_reader())
            .with_context(|| format!("Could not read GenBank record for {}", accession))
    }
}

/// Reference read from a local (possibly compressed) GenBank file
pub struct GenbankFile {
    path: PathBuf,
}

impl GenbankFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

impl SequenceProvider for GenbankFile {
    fn fetch(&self, accession: &str) -> anyhow::Result<GenomicRecord> {
        let rdr = CompressIo::new()
            .path(&self.path)
            .bufreader()
            .with_context(|| format!("Could not open {}", self.path.display()))?;
        debug!("Opened {} for input", self.path.display());
        let rec = GenomicRecord::from_genbank(rdr)
            .with_context(|| format!("Could not read GenBank record from {}", self.path.display()))?;
        if !same_accession(rec.id(), accession) {
            warn!(
                "Record {} in {} does not match accession {}",
                rec.id(),
                self.path.display(),
                accession
            );
        }
        Ok(rec)
    }
}

// Accessions are compared with the version suffix dropped if either side lacks one
fn same_accession(a: &str, b: &str) -> bool {
    let base = |s: &str| s.split('.').next().unwrap_or(s).to_owned();
    a == b || ((!a.contains('.') || !b.contains('.')) && base(a) == base(b))
}

/// In memory records, keyed by accession
#[derive(Default)]
pub struct MemoryProvider {
    records: HashMap<Box<str>, GenomicRecord>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rec: GenomicRecord) {
        let id = Box::from(rec.id());
        if self.records.insert(id, rec).is_some() {
            warn!("Duplicate record replaced")
        }
    }
}

impl SequenceProvider for MemoryProvider {
    fn fetch(&self, accession: &str) -> anyhow::Result<GenomicRecord> {
        self.records
            .get(accession)
            .cloned()
            .ok_or_else(|| anyhow!("Accession {} not available", accession))
    }
}
