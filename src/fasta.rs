use std::{io::BufRead, path::Path};

use compress_io::compress::CompressIo;

pub struct FastaRecord {
    id: Box<str>,
    seq: Vec<u8>,
}

impl FastaRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }
}

/// Streaming reader for multi-record FASTA files
pub struct FastaReader<R: BufRead> {
    rdr: R,
    buffer: String,
    line: usize,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(rdr: R) -> Self {
        Self {
            rdr,
            buffer: String::new(),
            line: 0,
        }
    }

    pub fn next_record(&mut self) -> anyhow::Result<Option<FastaRecord>> {
        // Skip blank lines before the header
        while self.buffer.trim().is_empty() {
            self.buffer.clear();
            if self.rdr.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;
        }
        let id = self.parse_header();
        // Drop the bad line so the next call resumes after it
        if id.is_err() {
            self.buffer.clear();
        }
        let id = id?;
        trace!("Found sequence {}", id);
        let mut seq = Vec::new();
        loop {
            self.buffer.clear();
            if self.rdr.read_line(&mut self.buffer)? == 0 {
                break;
            }
            self.line += 1;
            if self.buffer.starts_with('>') {
                break;
            }
            seq.extend(
                self.buffer
                    .bytes()
                    .filter(|c| !c.is_ascii_whitespace()),
            );
        }
        Ok(Some(FastaRecord { id, seq }))
    }

    fn parse_header(&self) -> anyhow::Result<Box<str>> {
        self.buffer
            .trim_end()
            .strip_prefix('>')
            .ok_or_else(|| anyhow!("Expected '>' at start of line {}", self.line))?
            .split_whitespace()
            .next()
            .map(Box::from)
            .ok_or_else(|| anyhow!("Missing sequence id at line {}", self.line))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = anyhow::Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Open a (possibly compressed) FASTA file
pub fn open_fasta<P: AsRef<Path>>(path: P) -> anyhow::Result<FastaReader<impl BufRead>> {
    let path = path.as_ref();
    let rdr = CompressIo::new().path(path).bufreader()?;
    debug!("Opened {} for input", path.display());
    Ok(FastaReader::new(rdr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(s: &str) -> anyhow::Result<Vec<FastaRecord>> {
        FastaReader::new(s.as_bytes()).collect()
    }

    #[test]
    fn multi_line_records() {
        let v = read_all("\n>s1 first sample\nACGT\nAC\n\n>s2\r\nGG TT\r\n").unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].id(), "s1");
        assert_eq!(v[0].seq(), b"ACGTAC");
        assert_eq!(v[1].id(), "s2");
        assert_eq!(v[1].seq(), b"GGTT");
    }

    #[test]
    fn empty_input() {
        assert!(read_all("").unwrap().is_empty());
        assert!(read_all("\n\n").unwrap().is_empty());
    }

    #[test]
    fn empty_sequence() {
        let v = read_all(">a\n>b\nAC\n").unwrap();
        assert!(v[0].seq().is_empty());
        assert_eq!(v[1].seq(), b"AC");
    }

    #[test]
    fn missing_header() {
        let e = read_all("ACGT\n>s1\nAC\n").err().unwrap();
        assert!(e.to_string().contains("line 1"));
    }

    #[test]
    fn reading_resumes_after_bad_line() {
        let mut rdr = FastaReader::new("ACGT\n>s1\nAC\n".as_bytes());
        assert!(rdr.next().unwrap().is_err());
        let v: Vec<_> = rdr.filter_map(Result::ok).collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].id(), "s1");
        assert_eq!(v[0].seq(), b"AC");

        let v: Vec<_> = FastaReader::new("junk\nmore junk\n".as_bytes())
            .filter_map(Result::ok)
            .collect();
        assert!(v.is_empty());
    }

    #[test]
    fn missing_id() {
        assert!(read_all(">\nACGT\n").is_err());
    }

    #[test]
    fn read_from_file() {
        use std::io::Write;

        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, ">x\nATG\n>y\nTTT").unwrap();
        f.flush().unwrap();
        let ids: Vec<_> = open_fasta(f.path())
            .unwrap()
            .map(|r| r.unwrap().id().to_owned())
            .collect();
        assert_eq!(ids, ["x", "y"]);
    }
}
