//! Amino acid differences at capsid antigenic sites
//!
//! Coding regions for VP1, VP2 and VP3 are located once in the annotated
//! reference and the same nucleotide coordinates are applied to every sample.
//! No alignment is performed, so samples are assumed to be co-linear with the
//! reference.

use std::{
    fmt,
    io::{BufRead, Write},
    rc::Rc,
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use crate::{
    cli::SitesConfig,
    fasta::{open_fasta, FastaReader},
    provider::SequenceProvider,
    record::{GenomicRecord, Strand},
    sequence::{reverse_complement, translate},
};

pub const N_GENES: usize = 3;

pub const TSV_HEADER: &str = "sample\tregion\tpos\tref\talt\tgene";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CapsidGene {
    Vp1,
    Vp2,
    Vp3,
}

impl CapsidGene {
    pub const ALL: [Self; N_GENES] = [Self::Vp1, Self::Vp2, Self::Vp3];

    pub fn idx(&self) -> usize {
        match self {
            Self::Vp1 => 0,
            Self::Vp2 => 1,
            Self::Vp3 => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        ["VP1", "VP2", "VP3"][self.idx()]
    }
}

impl fmt::Display for CapsidGene {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Antigenic region as 1 based, inclusive positions in the translated protein
#[derive(Debug, Copy, Clone)]
pub struct AntigenicRegion {
    name: &'static str,
    gene: CapsidGene,
    start: usize,
    end: usize,
}

impl AntigenicRegion {
    const fn new(name: &'static str, gene: CapsidGene, start: usize, end: usize) -> Self {
        Self {
            name,
            gene,
            start,
            end,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn gene(&self) -> CapsidGene {
        self.gene
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Region residues, clamped to the protein length
    pub fn slice<'a>(&self, prot: &'a [u8]) -> &'a [u8] {
        let e = self.end.min(prot.len());
        let s = (self.start - 1).min(e);
        &prot[s..e]
    }
}

pub const ANTIGENIC_REGIONS: [AntigenicRegion; 6] = [
    AntigenicRegion::new("Ag1_VP1", CapsidGene::Vp1, 88, 106),
    AntigenicRegion::new("Ag2_VP1", CapsidGene::Vp1, 221, 226),
    AntigenicRegion::new("Ag2_VP2", CapsidGene::Vp2, 165, 174),
    AntigenicRegion::new("Ag3_VP1", CapsidGene::Vp1, 287, 292),
    AntigenicRegion::new("Ag3_VP3b", CapsidGene::Vp3, 58, 60),
    AntigenicRegion::new("Ag3_VP3c", CapsidGene::Vp3, 70, 76),
];

/// Nucleotide coordinates (0 based, half open) of a coding region
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CodingCoords {
    start: usize,
    end: usize,
    strand: Strand,
}

impl CodingCoords {
    pub fn new(start: usize, end: usize, strand: Strand) -> Self {
        Self { start, end, strand }
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

    /// Translate the region from `seq`.  Coordinates past the end of `seq`
    /// are clamped.
    pub fn translate(&self, seq: &[u8]) -> anyhow::Result<Vec<u8>> {
        let e = self.end.min(seq.len());
        let s = self.start.min(e);
        let nt = &seq[s..e];
        match self.strand {
            Strand::Forward => translate(nt),
            Strand::Reverse => translate(&reverse_complement(nt)),
        }
    }
}

/// Find the first CDS whose gene or product qualifiers mention `gene`
/// (case insensitive)
pub fn find_cds(rec: &GenomicRecord, gene: CapsidGene) -> anyhow::Result<CodingCoords> {
    let target = gene.name().to_lowercase();
    rec.cds()
        .iter()
        .find(|f| {
            f.genes().join(" ").to_lowercase().contains(&target)
                || f.products().join(" ").to_lowercase().contains(&target)
        })
        .map(|f| {
            debug!(
                "{}: CDS {}..{} ({:?}) in {}",
                gene,
                f.start(),
                f.end(),
                f.strand(),
                rec.id()
            );
            CodingCoords::new(f.start(), f.end(), f.strand())
        })
        .ok_or_else(|| anyhow!("CDS not found for {}", gene))
}

/// One differing residue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDiff {
    sample: Rc<str>,
    region: &'static str,
    pos: usize,
    ref_aa: u8,
    alt_aa: u8,
    gene: CapsidGene,
}

impl SiteDiff {
    pub fn sample(&self) -> &str {
        &self.sample
    }

    pub fn region(&self) -> &'static str {
        self.region
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn ref_aa(&self) -> char {
        self.ref_aa as char
    }

    pub fn alt_aa(&self) -> char {
        self.alt_aa as char
    }

    pub fn gene(&self) -> CapsidGene {
        self.gene
    }
}

impl fmt::Display for SiteDiff {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.sample,
            self.region,
            self.pos,
            self.ref_aa(),
            self.alt_aa(),
            self.gene
        )
    }
}

/// Capsid coding coordinates and proteins of the reference
pub struct CapsidMap {
    coords: [CodingCoords; N_GENES],
    ref_prot: [Vec<u8>; N_GENES],
}

impl CapsidMap {
    pub fn from_reference(rec: &GenomicRecord) -> anyhow::Result<Self> {
        let coords = [
            find_cds(rec, CapsidGene::Vp1)?,
            find_cds(rec, CapsidGene::Vp2)?,
            find_cds(rec, CapsidGene::Vp3)?,
        ];
        let ref_prot = translate_genes(&coords, rec.seq())
            .with_context(|| format!("Could not translate capsid genes of {}", rec.id()))?;
        for g in CapsidGene::ALL {
            debug!("{}: {} residues in reference", g, ref_prot[g.idx()].len());
        }
        Ok(Self { coords, ref_prot })
    }

    pub fn coords(&self, gene: CapsidGene) -> &CodingCoords {
        &self.coords[gene.idx()]
    }

    pub fn ref_protein(&self, gene: CapsidGene) -> &[u8] {
        &self.ref_prot[gene.idx()]
    }

    /// Translate the capsid genes of a sample using the reference coordinates
    pub fn translate(&self, seq: &[u8]) -> anyhow::Result<[Vec<u8>; N_GENES]> {
        translate_genes(&self.coords, seq)
    }

    /// Residues differing from the reference within the antigenic regions
    pub fn compare(&self, sample: &str, seq: &[u8]) -> anyhow::Result<Vec<SiteDiff>> {
        let prot = self
            .translate(seq)
            .with_context(|| format!("Could not translate capsid genes of {}", sample))?;
        let sample: Rc<str> = Rc::from(sample);
        let mut diffs = Vec::new();
        for reg in ANTIGENIC_REGIONS.iter() {
            let ix = reg.gene().idx();
            let r = reg.slice(&self.ref_prot[ix]);
            let s = reg.slice(&prot[ix]);
            if r.len() != s.len() {
                trace!(
                    "{}: {} truncated to {} residues",
                    sample,
                    reg.name(),
                    r.len().min(s.len())
                );
            }
            for (i, (a, b)) in r.iter().zip(s.iter()).enumerate() {
                if a != b {
                    diffs.push(SiteDiff {
                        sample: sample.clone(),
                        region: reg.name(),
                        pos: reg.start() + i,
                        ref_aa: *a,
                        alt_aa: *b,
                        gene: reg.gene(),
                    })
                }
            }
        }
        Ok(diffs)
    }
}

fn translate_genes(
    coords: &[CodingCoords; N_GENES],
    seq: &[u8],
) -> anyhow::Result<[Vec<u8>; N_GENES]> {
    Ok([
        coords[0].translate(seq)?,
        coords[1].translate(seq)?,
        coords[2].translate(seq)?,
    ])
}

/// Compare every sample against the reference, writing one TSV row per
/// difference.  Returns the number of samples and differences.
pub fn write_differences<R: BufRead, W: Write>(
    map: &CapsidMap,
    samples: FastaReader<R>,
    wrt: &mut W,
) -> anyhow::Result<(usize, usize)> {
    writeln!(wrt, "{}", TSV_HEADER)?;
    let (mut n_samples, mut n_diffs) = (0, 0);
    for rec in samples {
        let rec = rec?;
        let diffs = map.compare(rec.id(), rec.seq())?;
        debug!("{}: {} differences", rec.id(), diffs.len());
        for d in diffs.iter() {
            writeln!(wrt, "{}", d)?;
        }
        n_samples += 1;
        n_diffs += diffs.len();
    }
    Ok((n_samples, n_diffs))
}

pub fn process_samples(cfg: &SitesConfig, provider: &dyn SequenceProvider) -> anyhow::Result<()> {
    let reference = provider.fetch(cfg.ref_acc())?;
    let map = CapsidMap::from_reference(&reference)?;

    let samples = open_fasta(cfg.genomes())?;
    let mut wrt = CompressIo::new().path(cfg.out_tsv()).bufwriter()?;
    debug!("Opened {} for output", cfg.out_tsv().display());

    let (n_samples, n_diffs) = write_differences(&map, samples, &mut wrt)?;
    wrt.flush()?;
    info!(
        "{} samples compared to {}: {} differences at antigenic sites written to {}",
        n_samples,
        reference.id(),
        n_diffs,
        cfg.out_tsv().display()
    );
    Ok(())
}
