//! McNemar and paired t-tests on CSV tables of paired results

use std::{
    io::{Read, Write},
    path::Path,
};

use anyhow::Context;
use compress_io::compress::CompressIo;
use serde::Deserialize;

use crate::{
    cli::StatsConfig,
    mcnemar::{McNemarRes, McNemarTest},
    ttest::{paired_ttest, TTestRes},
};

/// Statistical tests used by the comparator
pub trait PairedTests {
    /// Exact McNemar p-value for the table [[0, b], [c, 0]]
    fn mcnemar_exact(&self, b: usize, c: usize) -> f64;
    fn mcnemar_chisq(&self, b: usize, c: usize) -> McNemarRes;
    fn paired_t(&self, x: &[f64], y: &[f64]) -> anyhow::Result<TTestRes>;
}

#[derive(Default)]
pub struct StatTests {
    mcnemar: McNemarTest,
}

impl StatTests {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PairedTests for StatTests {
    fn mcnemar_exact(&self, b: usize, c: usize) -> f64 {
        self.mcnemar.exact(b, c)
    }

    fn mcnemar_chisq(&self, b: usize, c: usize) -> McNemarRes {
        self.mcnemar.chisq(b, c)
    }

    fn paired_t(&self, x: &[f64], y: &[f64]) -> anyhow::Result<TTestRes> {
        paired_ttest(x, y)
    }
}

#[derive(Debug, Deserialize)]
struct ContingencyRow {
    method1: Option<f64>,
    method2: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PairedIdentityRow {
    #[serde(default)]
    id: Option<String>,
    identity_ngs: f64,
    identity_sanger: f64,
}

/// Discordant cells of a paired 2x2 table
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Discordant {
    /// method1 = 1, method2 = 0
    pub b: usize,
    /// method1 = 0, method2 = 1
    pub c: usize,
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

pub fn count_discordant<R: Read>(rdr: R) -> anyhow::Result<Discordant> {
    let mut cts = Discordant::default();
    let mut n = 0;
    for row in csv_reader(rdr).deserialize() {
        let row: ContingencyRow = row?;
        match (row.method1, row.method2) {
            (Some(x), Some(y)) if x == 1.0 && y == 0.0 => cts.b += 1,
            (Some(x), Some(y)) if x == 0.0 && y == 1.0 => cts.c += 1,
            _ => (),
        }
        n += 1;
    }
    debug!("{} pairs read: b = {}, c = {}", n, cts.b, cts.c);
    Ok(cts)
}

pub fn read_paired_identity<R: Read>(rdr: R) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    let (mut ngs, mut sanger) = (Vec::new(), Vec::new());
    for row in csv_reader(rdr).deserialize() {
        let row: PairedIdentityRow = row?;
        trace!(
            "{}: {} {}",
            row.id.as_deref().unwrap_or("."),
            row.identity_ngs,
            row.identity_sanger
        );
        ngs.push(row.identity_ngs);
        sanger.push(row.identity_sanger);
    }
    debug!("{} paired identity values read", ngs.len());
    Ok((ngs, sanger))
}

/// Format a value for the result lines.  Finite values use the shortest
/// representation that round trips, always with a decimal point or
/// exponent (`1.0`, `0.7265625`, `1e-30`).
pub fn fmt_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_owned()
    } else if x.is_infinite() {
        if x > 0.0 { "inf" } else { "-inf" }.to_owned()
    } else {
        format!("{:?}", x)
    }
}

fn open_csv(path: &Path) -> anyhow::Result<impl Read> {
    let rdr = CompressIo::new()
        .path(path)
        .bufreader()
        .with_context(|| format!("Could not open {}", path.display()))?;
    debug!("Opened {} for input", path.display());
    Ok(rdr)
}

pub fn contingency_test<T: PairedTests, W: Write>(
    path: &Path,
    tests: &T,
    asymptotic: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let cts = count_discordant(open_csv(path)?)
        .with_context(|| format!("Error reading contingency table {}", path.display()))?;
    writeln!(
        out,
        "McNemar exact p-value: {}",
        fmt_float(tests.mcnemar_exact(cts.b, cts.c))
    )?;
    if asymptotic {
        let r = tests.mcnemar_chisq(cts.b, cts.c);
        writeln!(
            out,
            "McNemar chi-square statistic: {} p-value: {}",
            fmt_float(r.statistic()),
            fmt_float(r.p_value())
        )?;
    }
    Ok(())
}

pub fn paired_identity_test<T: PairedTests, W: Write>(
    path: &Path,
    tests: &T,
    out: &mut W,
) -> anyhow::Result<()> {
    let (ngs, sanger) = read_paired_identity(open_csv(path)?)
        .with_context(|| format!("Error reading paired identity table {}", path.display()))?;
    let r = tests.paired_t(&ngs, &sanger)?;
    writeln!(
        out,
        "Paired t-test t-statistic: {} p-value: {}",
        fmt_float(r.t()),
        fmt_float(r.p_value())
    )?;
    Ok(())
}

/// Run whichever tests have input tables.  Neither being present is not an
/// error.
pub fn run_comparisons<T: PairedTests, W: Write>(
    cfg: &StatsConfig,
    tests: &T,
    out: &mut W,
) -> anyhow::Result<()> {
    if let Some(path) = cfg.contingency() {
        contingency_test(path, tests, cfg.asymptotic(), out)?;
    }
    if let Some(path) = cfg.paired_id() {
        paired_identity_test(path, tests, out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs};

    use super::*;
    use crate::cli::stats_cli_model;

    const CONTINGENCY: &str = "\
method1,method2
1,0
1,1
0,1
1,0
0,0
0,1
1,0
0,1
0,1
0,1
";

    const PAIRED: &str = "\
id,identity_ngs,identity_sanger
s1,99.1,98.7
s2,97.5,97.9
s3,99.8,99.0
s4,98.2,97.1
";

    fn cfg(args: &[&str]) -> StatsConfig {
        let mut v = vec!["mcnemar_ttest"];
        v.extend_from_slice(args);
        StatsConfig::from_matches(&stats_cli_model().try_get_matches_from(v).unwrap()).unwrap()
    }

    // Records the arguments passed to the tests
    #[derive(Default)]
    struct Recorder {
        bc: Cell<Option<(usize, usize)>>,
        n_pairs: Cell<usize>,
    }

    impl PairedTests for Recorder {
        fn mcnemar_exact(&self, b: usize, c: usize) -> f64 {
            self.bc.set(Some((b, c)));
            0.5
        }

        fn mcnemar_chisq(&self, _b: usize, _c: usize) -> McNemarRes {
            McNemarTest::new().chisq(0, 0)
        }

        fn paired_t(&self, x: &[f64], y: &[f64]) -> anyhow::Result<TTestRes> {
            self.n_pairs.set(x.len());
            paired_ttest(x, y)
        }
    }

    #[test]
    fn discordant_counts() {
        let cts = count_discordant(CONTINGENCY.as_bytes()).unwrap();
        assert_eq!(cts, Discordant { b: 3, c: 5 });
    }

    #[test]
    fn float_and_spaced_values() {
        let cts = count_discordant("method2, method1\n0.0, 1.0\n1,0\n".as_bytes()).unwrap();
        assert_eq!(cts, Discordant { b: 1, c: 1 });
    }

    #[test]
    fn empty_cells_not_counted() {
        let cts = count_discordant("method1,method2\n1,\n,1\n1,0\n,\n".as_bytes()).unwrap();
        assert_eq!(cts, Discordant { b: 1, c: 0 });
    }

    #[test]
    fn float_formatting() {
        assert_eq!(fmt_float(1.0), "1.0");
        assert_eq!(fmt_float(0.0), "0.0");
        assert_eq!(fmt_float(0.7265625), "0.7265625");
        assert_eq!(fmt_float(1e-30), "1e-30");
        assert_eq!(fmt_float(-2.5), "-2.5");
        assert_eq!(fmt_float(f64::NAN), "nan");
        assert_eq!(fmt_float(f64::INFINITY), "inf");
        assert_eq!(fmt_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn no_discordant_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let cont = dir.path().join("contingency.csv");
        fs::write(&cont, "method1,method2\n1,1\n0,0\n").unwrap();
        let c = cfg(&["--contingency", cont.to_str().unwrap(), "--asymptotic"]);
        let mut out = Vec::new();
        run_comparisons(&c, &StatTests::new(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "McNemar exact p-value: 1.0\nMcNemar chi-square statistic: 0.0 p-value: 1.0\n"
        );
    }

    #[test]
    fn missing_column() {
        assert!(count_discordant("method1,other\n1,0\n".as_bytes()).is_err());
        assert!(read_paired_identity("id,identity_ngs\na,1.0\n".as_bytes()).is_err());
        assert!(read_paired_identity("id,identity_ngs,identity_sanger\na,x,1\n".as_bytes()).is_err());
    }

    #[test]
    fn paired_identity_without_id() {
        let (a, b) = read_paired_identity("identity_sanger,identity_ngs\n1,2\n3,4\n".as_bytes()).unwrap();
        assert_eq!(a, [2.0, 4.0]);
        assert_eq!(b, [1.0, 3.0]);
    }

    #[test]
    fn comparisons_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let cont = dir.path().join("contingency.csv");
        let paired = dir.path().join("paired.csv");
        fs::write(&cont, CONTINGENCY).unwrap();
        fs::write(&paired, PAIRED).unwrap();

        let c = cfg(&[
            "--contingency",
            cont.to_str().unwrap(),
            "--paired_id",
            paired.to_str().unwrap(),
        ]);
        let tests = StatTests::new();
        let mut out = Vec::new();
        run_comparisons(&c, &tests, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let p: f64 = lines[0]
            .strip_prefix("McNemar exact p-value: ")
            .unwrap()
            .parse()
            .unwrap();
        assert!((p - 186.0 / 256.0).abs() < 1e-12);

        let (x, y) = read_paired_identity(PAIRED.as_bytes()).unwrap();
        let r = paired_ttest(&x, &y).unwrap();
        assert_eq!(
            lines[1],
            format!(
                "Paired t-test t-statistic: {} p-value: {}",
                fmt_float(r.t()),
                fmt_float(r.p_value())
            )
        );
    }

    #[test]
    fn asymptotic_output() {
        let dir = tempfile::tempdir().unwrap();
        let cont = dir.path().join("contingency.csv");
        fs::write(&cont, CONTINGENCY).unwrap();
        let c = cfg(&["--contingency", cont.to_str().unwrap(), "--asymptotic"]);
        let mut out = Vec::new();
        run_comparisons(&c, &StatTests::new(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("McNemar chi-square statistic: 0.125 p-value: "));
    }

    #[test]
    fn tests_receive_table_values() {
        let dir = tempfile::tempdir().unwrap();
        let cont = dir.path().join("c.csv");
        let paired = dir.path().join("p.csv");
        fs::write(&cont, CONTINGENCY).unwrap();
        fs::write(&paired, PAIRED).unwrap();
        let c = cfg(&[
            "--contingency",
            cont.to_str().unwrap(),
            "--paired_id",
            paired.to_str().unwrap(),
        ]);
        let rec = Recorder::default();
        let mut out = Vec::new();
        run_comparisons(&c, &rec, &mut out).unwrap();
        assert_eq!(rec.bc.get(), Some((3, 5)));
        assert_eq!(rec.n_pairs.get(), 4);
    }

    #[test]
    fn no_inputs_no_output() {
        let mut out = Vec::new();
        run_comparisons(&cfg(&[]), &StatTests::new(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("none.csv");
        let c = cfg(&["--paired_id", p.to_str().unwrap()]);
        let mut out = Vec::new();
        assert!(run_comparisons(&c, &StatTests::new(), &mut out).is_err());
    }
}
