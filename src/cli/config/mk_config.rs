use std::path::PathBuf;

use clap::ArgMatches;

use super::{ReferenceSource, SitesConfig, StatsConfig};

impl SitesConfig {
    pub fn from_matches(m: &ArgMatches) -> anyhow::Result<Self> {
        let ref_acc = m
            .get_one::<String>("ref_acc")
            .map(|s| Box::from(s.as_str()))
            .expect("Missing reference accession"); // Should be enforced by clap

        let reference = match m.get_one::<PathBuf>("ref_gb") {
            Some(path) => {
                debug!("Reference {} read from {}", ref_acc, path.display());
                ReferenceSource::File(path.to_owned())
            }
            None => {
                let email = m
                    .get_one::<String>("email")
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(Box::from)
                    .ok_or_else(|| anyhow!("Set --email or env NCBI_EMAIL"))?;
                let api_key = m
                    .get_one::<String>("api_key")
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(Box::from);
                debug!(
                    "Reference {} fetched from NCBI (API key: {})",
                    ref_acc,
                    if api_key.is_some() { "yes" } else { "no" }
                );
                ReferenceSource::Entrez { email, api_key }
            }
        };

        let genomes = m
            .get_one::<PathBuf>("genomes")
            .expect("Missing genomes") // Should be enforced by clap
            .to_owned();

        let out_tsv = m
            .get_one::<PathBuf>("out_tsv")
            .expect("Missing output file")
            .to_owned();

        Ok(Self {
            reference,
            ref_acc,
            genomes,
            out_tsv,
        })
    }
}

impl StatsConfig {
    pub fn from_matches(m: &ArgMatches) -> anyhow::Result<Self> {
        let contingency = m.get_one::<PathBuf>("contingency").cloned();
        let paired_id = m.get_one::<PathBuf>("paired_id").cloned();
        let asymptotic = m.get_flag("asymptotic");
        if contingency.is_none() && paired_id.is_none() {
            debug!("No input tables given");
        }
        Ok(Self {
            contingency,
            paired_id,
            asymptotic,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::cli::{sites_cli_model, stats_cli_model, ReferenceSource, SitesConfig, StatsConfig};

    fn sites_cfg(args: &[&str]) -> anyhow::Result<SitesConfig> {
        let mut v = vec!["antigenic_sites"];
        v.extend_from_slice(args);
        let m = sites_cli_model().try_get_matches_from(v)?;
        SitesConfig::from_matches(&m)
    }

    const IO_ARGS: [&str; 6] = [
        "--ref_acc",
        "V01150.1",
        "--genomes",
        "g.fa",
        "--out_tsv",
        "out.tsv",
    ];

    #[test]
    fn entrez_reference() {
        let mut args = vec!["--email", "someone@example.org", "--api_key", "K1"];
        args.extend_from_slice(&IO_ARGS);
        let cfg = sites_cfg(&args).unwrap();
        assert_eq!(cfg.ref_acc(), "V01150.1");
        assert_eq!(cfg.genomes(), Path::new("g.fa"));
        assert_eq!(cfg.out_tsv(), Path::new("out.tsv"));
        match cfg.reference() {
            ReferenceSource::Entrez { email, api_key } => {
                assert_eq!(&**email, "someone@example.org");
                assert_eq!(api_key.as_deref(), Some("K1"));
            }
            r => panic!("Unexpected reference source {:?}", r),
        }
    }

    #[test]
    fn local_reference_needs_no_email() {
        let mut args = vec!["--ref_gb", "ref.gb"];
        args.extend_from_slice(&IO_ARGS);
        let cfg = sites_cfg(&args).unwrap();
        assert!(matches!(cfg.reference(), ReferenceSource::File(p) if p == Path::new("ref.gb")));
    }

    #[test]
    fn missing_email() {
        if std::env::var_os("NCBI_EMAIL").is_some() {
            return;
        }
        let e = sites_cfg(&IO_ARGS).err().unwrap();
        assert_eq!(e.to_string(), "Set --email or env NCBI_EMAIL");
        let mut args = vec!["--email", " "];
        args.extend_from_slice(&IO_ARGS);
        assert!(sites_cfg(&args).is_err());
    }

    #[test]
    fn required_arguments() {
        assert!(sites_cfg(&["--email", "a@b", "--ref_acc", "X"]).is_err());
    }

    #[test]
    fn stats_options() {
        let m = stats_cli_model()
            .try_get_matches_from(["mcnemar_ttest", "--paired_id", "p.csv", "--asymptotic"])
            .unwrap();
        let cfg = StatsConfig::from_matches(&m).unwrap();
        assert!(cfg.contingency().is_none());
        assert_eq!(cfg.paired_id(), Some(Path::new("p.csv")));
        assert!(cfg.asymptotic());

        let m = stats_cli_model().try_get_matches_from(["mcnemar_ttest"]).unwrap();
        let cfg = StatsConfig::from_matches(&m).unwrap();
        assert!(cfg.contingency().is_none() && cfg.paired_id().is_none());
        assert!(!cfg.asymptotic());
    }
}
