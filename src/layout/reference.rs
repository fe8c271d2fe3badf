use crate::catalog::DataCatalog;
use crate::error::{FixtureError, Result};
use crate::linker::{link_or_copy, LinkMode, Source};
use crate::listing::log_fixture;
use crate::tmpdir::TempDirFactory;
use log::info;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const REF_FILES: &[&str] = &[
    "ref/ref.fa",
    "ref/ref.fa.fai",
    "ref/ref.dict",
    "ref/ref.chrom.sizes",
    "ref/ref-dbsnp.vcf.gz",
    "ref/ref-transcripts.gtf",
    "ref/ref-transcripts.bed12",
    "ref/ref-exons.bed",
    "ref/ref-targets.bed",
];

const SCAFFOLDS_FILES: &[&str] = &[
    "scaffolds/scaffolds.fa",
    "scaffolds/scaffolds.fa.fai",
    "scaffolds/scaffolds.dict",
    "scaffolds/scaffolds.chrom.sizes",
];

/// The reference file groups available in the data catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceLabel {
    /// Single-chromosome reference with annotation
    Ref,
    /// Scaffolded reference
    Scaffolds,
}

impl ReferenceLabel {
    pub const ALL: [ReferenceLabel; 2] = [ReferenceLabel::Ref, ReferenceLabel::Scaffolds];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceLabel::Ref => "ref",
            ReferenceLabel::Scaffolds => "scaffolds",
        }
    }

    /// Catalog-relative paths of the files in this group
    pub fn files(&self) -> &'static [&'static str] {
        match self {
            ReferenceLabel::Ref => REF_FILES,
            ReferenceLabel::Scaffolds => SCAFFOLDS_FILES,
        }
    }
}

impl FromStr for ReferenceLabel {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        ReferenceLabel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| FixtureError::UnknownLabel {
                label: s.to_string(),
                expected: ReferenceLabel::ALL
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for ReferenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceLayoutConfig {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_dirname")]
    pub dirname: Option<String>,
    #[serde(default)]
    pub numbered: bool,
    #[serde(default)]
    pub copy: bool,
    #[serde(default)]
    pub show_fixture: bool,
}

impl Default for ReferenceLayoutConfig {
    fn default() -> Self {
        ReferenceLayoutConfig {
            label: default_label(),
            dirname: default_dirname(),
            numbered: false,
            copy: false,
            show_fixture: false,
        }
    }
}

fn default_label() -> String {
    "ref".to_string()
}

fn default_dirname() -> Option<String> {
    Some("ref".to_string())
}

/// Materialises reference file groups from a data catalog
pub struct ReferenceLayoutEngine<'a> {
    catalog: &'a dyn DataCatalog,
    tmpdir: &'a TempDirFactory,
}

impl<'a> ReferenceLayoutEngine<'a> {
    pub fn new(catalog: &'a dyn DataCatalog, tmpdir: &'a TempDirFactory) -> Self {
        ReferenceLayoutEngine { catalog, tmpdir }
    }

    pub fn build(&self, config: &ReferenceLayoutConfig) -> Result<PathBuf> {
        let label: ReferenceLabel = config.label.parse()?;
        let root = self
            .tmpdir
            .safe_mktemp(config.dirname.as_deref(), config.numbered)?;
        let mode = LinkMode::from_copy_flag(config.copy);
        info!("Setting up '{}' reference layout in {}", label, root.display());

        for file in label.files() {
            link_or_copy(&root, self.catalog, &Source::Catalog(PathBuf::from(*file)), None, mode)?;
        }

        if config.show_fixture {
            log_fixture(&format!("'{label}' reference layout"), &root)?;
        }
        Ok(root)
    }
}
