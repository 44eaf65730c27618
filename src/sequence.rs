//! Nucleotide sequence operations: reverse complement and translation
//! using the standard genetic code (NCBI table 1).

// Amino acids indexed by codon, with bases ordered T, C, A, G
const AA_TABLE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

// Bit for each base in TCAG order within a base mask (A = 1, C = 2, G = 4, T = 8)
const TCAG_BIT: [u8; 4] = [8, 2, 1, 4];

const fn make_mask_table() -> [u8; 256] {
    let mut t = [0u8; 256];
    let codes: [(u8, u8); 16] = [
        (b'A', 1),
        (b'C', 2),
        (b'G', 4),
        (b'T', 8),
        (b'U', 8),
        (b'R', 5),
        (b'Y', 10),
        (b'S', 6),
        (b'W', 9),
        (b'K', 12),
        (b'M', 3),
        (b'B', 14),
        (b'D', 13),
        (b'H', 11),
        (b'V', 7),
        (b'N', 15),
    ];
    let mut i = 0;
    while i < codes.len() {
        let (c, m) = codes[i];
        t[c as usize] = m;
        t[c.to_ascii_lowercase() as usize] = m;
        i += 1;
    }
    t
}

const fn make_comp_table() -> [u8; 256] {
    let mut t = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        t[i] = i as u8;
        i += 1;
    }
    let pairs: [(u8, u8); 6] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'R', b'Y'),
        (b'K', b'M'),
        (b'B', b'V'),
        (b'D', b'H'),
    ];
    let mut j = 0;
    while j < pairs.len() {
        let (a, b) = pairs[j];
        t[a as usize] = b;
        t[b as usize] = a;
        t[a.to_ascii_lowercase() as usize] = b.to_ascii_lowercase();
        t[b.to_ascii_lowercase() as usize] = a.to_ascii_lowercase();
        j += 1;
    }
    t[b'U' as usize] = b'A';
    t[b'u' as usize] = b'a';
    t
}

// IUPAC code -> set of possible bases (0 for anything else)
static BASE_MASK: [u8; 256] = make_mask_table();

static COMPLEMENT: [u8; 256] = make_comp_table();

fn mask_bases(mask: u8) -> impl Iterator<Item = usize> {
    (0..4).filter(move |k| mask & TCAG_BIT[*k] != 0)
}

/// Reverse complement of a nucleotide sequence.  Ambiguity codes are
/// complemented and case is preserved.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|c| COMPLEMENT[*c as usize]).collect()
}

/// Translate a single codon.  Ambiguous codons translate to the residue that
/// all possible expansions agree on, to `B`, `Z` or `J` when the expansions
/// are exactly {D, N}, {E, Q} or {I, L}, and otherwise to `X`.  Symbols that
/// are not IUPAC nucleotide codes are an error.
pub fn translate_codon(codon: &[u8]) -> anyhow::Result<u8> {
    assert_eq!(codon.len(), 3);
    let m = [
        BASE_MASK[codon[0] as usize],
        BASE_MASK[codon[1] as usize],
        BASE_MASK[codon[2] as usize],
    ];
    if m.contains(&0) {
        return Err(anyhow!(
            "Codon '{}' is invalid",
            String::from_utf8_lossy(codon)
        ));
    }
    let mut aa = Vec::with_capacity(4);
    for i in mask_bases(m[0]) {
        for j in mask_bases(m[1]) {
            for k in mask_bases(m[2]) {
                aa.push(AA_TABLE[(i << 4) | (j << 2) | k]);
            }
        }
    }
    aa.sort_unstable();
    aa.dedup();
    Ok(match aa.as_slice() {
        [a] => *a,
        b"DN" => b'B',
        b"EQ" => b'Z',
        b"IL" => b'J',
        _ => b'X',
    })
}

/// Translate in frame 0, reading through stop codons.  A trailing partial
/// codon is dropped.
pub fn translate(seq: &[u8]) -> anyhow::Result<Vec<u8>> {
    if seq.len() % 3 != 0 {
        trace!(
            "Sequence length {} not a multiple of 3, ignoring trailing bases",
            seq.len()
        );
    }
    seq.chunks_exact(3).map(translate_codon).collect()
}
