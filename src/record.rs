use std::io::Read;

use gb_io::{
    reader::SeqReader,
    seq::{Location, Seq},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// An annotated coding region.  Coordinates are 0 based, half open.
#[derive(Debug, Clone)]
pub struct CdsFeature {
    genes: Vec<String>,
    products: Vec<String>,
    start: usize,
    end: usize,
    strand: Strand,
}

impl CdsFeature {
    pub fn new(start: usize, end: usize, strand: Strand) -> Self {
        Self {
            genes: Vec::new(),
            products: Vec::new(),
            start,
            end,
            strand,
        }
    }

    pub fn with_gene(mut self, gene: &str) -> Self {
        self.genes.push(gene.to_owned());
        self
    }

    pub fn with_product(mut self, product: &str) -> Self {
        self.products.push(product.to_owned());
        self
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    fn from_location(loc: &Location) -> anyhow::Result<Self> {
        let (s, e) = location_bounds(loc)?;
        let start = usize::try_from(s).map_err(|_| anyhow!("Negative start in location {:?}", loc))?;
        let end = usize::try_from(e).map_err(|_| anyhow!("Negative end in location {:?}", loc))?;
        Ok(Self::new(start, end, location_strand(loc)))
    }
}

fn location_bounds(loc: &Location) -> anyhow::Result<(i64, i64)> {
    match loc {
        Location::Range((s, _), (e, _)) => Ok((*s, *e)),
        Location::Between(s, e) => Ok((*s, *e)),
        Location::Complement(inner) => location_bounds(inner),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            let mut bounds: Option<(i64, i64)> = None;
            for p in parts {
                let (s, e) = location_bounds(p)?;
                bounds = Some(match bounds {
                    Some((s1, e1)) => (s1.min(s), e1.max(e)),
                    None => (s, e),
                });
            }
            bounds.ok_or_else(|| anyhow!("Empty compound location"))
        }
        _ => Err(anyhow!("Unsupported feature location {:?}", loc)),
    }
}

// Compound locations are only reverse if every part is
fn location_strand(loc: &Location) -> Strand {
    match loc {
        Location::Complement(_) => Strand::Reverse,
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts)
            if !parts.is_empty()
                && parts.iter().all(|p| location_strand(p) == Strand::Reverse) =>
        {
            Strand::Reverse
        }
        _ => Strand::Forward,
    }
}

#[derive(Debug, Clone)]
pub struct GenomicRecord {
    id: Box<str>,
    seq: Vec<u8>,
    cds: Vec<CdsFeature>,
}

impl GenomicRecord {
    pub fn new(id: &str, seq: Vec<u8>, cds: Vec<CdsFeature>) -> Self {
        Self {
            id: Box::from(id),
            seq,
            cds,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn cds(&self) -> &[CdsFeature] {
        &self.cds
    }

    /// Read the first record from a GenBank flat file
    pub fn from_genbank<R: Read>(rdr: R) -> anyhow::Result<Self> {
        let seq = SeqReader::new(rdr)
            .next()
            .ok_or_else(|| anyhow!("No GenBank record found in input"))?
            .map_err(|e| anyhow!("Error parsing GenBank record: {:?}", e))?;
        Self::from_gb_seq(seq)
    }

    fn from_gb_seq(gb: Seq) -> anyhow::Result<Self> {
        let id = gb
            .version
            .clone()
            .or_else(|| gb.accession.clone())
            .or_else(|| gb.name.clone())
            .ok_or_else(|| anyhow!("GenBank record has no accession or name"))?;
        if gb.seq.is_empty() {
            return Err(anyhow!("GenBank record {} has no sequence", id));
        }
        let mut cds = Vec::new();
        for f in gb.features.iter().filter(|f| &*f.kind == "CDS") {
            let mut feature = CdsFeature::from_location(&f.location)?;
            for (key, val) in f.qualifiers.iter() {
                match (&**key, val) {
                    ("gene", Some(v)) => feature.genes.push(v.clone()),
                    ("product", Some(v)) => feature.products.push(v.clone()),
                    _ => (),
                }
            }
            trace!(
                "CDS {}..{} {:?} gene: {:?} product: {:?}",
                feature.start,
                feature.end,
                feature.strand,
                feature.genes,
                feature.products
            );
            cds.push(feature);
        }
        debug!(
            "Read GenBank record {} ({} bp, {} CDS features)",
            id,
            gb.seq.len(),
            cds.len()
        );
        Ok(Self {
            id: id.into_boxed_str(),
            seq: gb.seq,
            cds,
        })
    }
}
