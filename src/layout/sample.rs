//! Sample layouts
//!
//! Builds a directory of sequence read files organised by a run format.
//! For instance, with samples `["CHR.HG00512"]`, platform units
//! `["010101_AAABBB11XX"]` and runfmt `{SM}/{PU}/{SM}_{PU}`, the first read
//! is exposed as
//! `CHR.HG00512/010101_AAABBB11XX/CHR.HG00512_010101_AAABBB11XX_1.fastq.gz`
//! and, for paired-end runs, the second read likewise with `_2`.

use crate::alias::{AliasIndex, ShortNames};
use crate::catalog::{read_file_name, DataCatalog, ReadEnd};
use crate::combinator::{combine, Run, RunLists, Strategy};
use crate::error::{FixtureError, Result};
use crate::layout::sampleinfo::{write_sampleinfo, SampleInfoRecord};
use crate::linker::{link_or_copy, LinkMode, Source};
use crate::listing::log_fixture;
use crate::template::{Fields, PathTemplate};
use crate::tmpdir::TempDirFactory;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Options for a sample layout. Unknown keys are rejected when read from a file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleLayoutConfig {
    /// Directory name below the base temp root; the base itself if absent
    #[serde(default)]
    pub dirname: Option<String>,
    /// Allocate `<dirname><n>` instead of reusing `<dirname>`
    #[serde(default)]
    pub numbered: bool,
    /// Run format, see [`PathTemplate`]
    #[serde(default = "default_runfmt")]
    pub runfmt: String,
    #[serde(default)]
    pub samples: Vec<Option<String>>,
    /// Names used in paths instead of `samples`, position by position
    #[serde(default)]
    pub sample_aliases: Vec<String>,
    #[serde(default)]
    pub platform_units: Vec<Option<String>>,
    #[serde(default)]
    pub batches: Vec<Option<String>>,
    #[serde(default)]
    pub populations: Vec<Option<String>>,
    #[serde(default = "default_paired_end")]
    pub paired_end: Vec<bool>,
    #[serde(default)]
    pub combinator: Strategy,
    /// Prefix for short sample names (`s1`, `s2`, ...)
    #[serde(default = "default_sample_prefix")]
    pub sample_prefix: String,
    #[serde(default = "default_true")]
    pub use_short_sample_names: bool,
    /// Write `sampleinfo.csv` at the layout root
    #[serde(default = "default_true")]
    pub sampleinfo: bool,
    /// Copy files instead of symlinking
    #[serde(default)]
    pub copy: bool,
    /// Log the materialised tree
    #[serde(default)]
    pub show_fixture: bool,
}

impl Default for SampleLayoutConfig {
    fn default() -> Self {
        SampleLayoutConfig {
            dirname: None,
            numbered: false,
            runfmt: default_runfmt(),
            samples: Vec::new(),
            sample_aliases: Vec::new(),
            platform_units: Vec::new(),
            batches: Vec::new(),
            populations: Vec::new(),
            paired_end: default_paired_end(),
            combinator: Strategy::default(),
            sample_prefix: default_sample_prefix(),
            use_short_sample_names: true,
            sampleinfo: true,
            copy: false,
            show_fixture: false,
        }
    }
}

impl SampleLayoutConfig {
    pub fn run_lists(&self) -> RunLists {
        RunLists {
            samples: self.samples.clone(),
            aliases: self.sample_aliases.clone(),
            platform_units: self.platform_units.clone(),
            batches: self.batches.clone(),
            populations: self.populations.clone(),
            paired_end: self.paired_end.clone(),
        }
    }
}

fn default_runfmt() -> String {
    "{SM}".to_string()
}

fn default_paired_end() -> Vec<bool> {
    vec![true]
}

fn default_sample_prefix() -> String {
    "s".to_string()
}

fn default_true() -> bool {
    true
}

// A run with its rendered name, destination stem and backing dataset
struct PlannedRun<'r> {
    run: &'r Run,
    sm: String,
    stem: String,
    canonical: String,
}

/// Materialises sample layouts from a data catalog
pub struct SampleLayoutEngine<'a> {
    catalog: &'a dyn DataCatalog,
    tmpdir: &'a TempDirFactory,
}

impl<'a> SampleLayoutEngine<'a> {
    pub fn new(catalog: &'a dyn DataCatalog, tmpdir: &'a TempDirFactory) -> Self {
        SampleLayoutEngine { catalog, tmpdir }
    }

    /// Build the layout described by `config` and return its root.
    ///
    /// Configuration errors are reported before anything is created. A
    /// missing data file aborts the build, leaving files linked so far in place.
    pub fn build(&self, config: &SampleLayoutConfig) -> Result<PathBuf> {
        let template = PathTemplate::parse(&config.runfmt)?;
        let runs = combine(&config.run_lists(), config.combinator)?;
        let index = AliasIndex::from_runs(&runs)?;
        let planned = plan(&template, &runs, &index, config)?;

        let root = self
            .tmpdir
            .safe_mktemp(config.dirname.as_deref(), config.numbered)?;
        let mode = LinkMode::from_copy_flag(config.copy);
        info!(
            "Setting up sample layout with {} runs in {}",
            planned.len(),
            root.display()
        );

        let mut records = Vec::with_capacity(planned.len());
        for p in &planned {
            let fastq = self.materialize(&root, p, mode)?;
            records.push(SampleInfoRecord {
                sample: p.sm.clone(),
                platform_unit: p.run.platform_unit.clone(),
                batch: p.run.batch.clone(),
                population: p.run.population.clone(),
                paired_end: p.run.paired_end,
                fastq,
            });
        }

        if config.sampleinfo {
            let path = write_sampleinfo(&root, &records)?;
            debug!("wrote {}", path.display());
        }
        if config.show_fixture {
            log_fixture("sample_layout", &root)?;
        }

        Ok(root)
    }

    fn materialize(&self, root: &Path, p: &PlannedRun, mode: LinkMode) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for &end in ReadEnd::for_run(p.run.paired_end) {
            let src = self
                .catalog
                .sample_read(&p.canonical, p.run.platform_unit.as_deref(), end)?;
            let dest = PathBuf::from(read_file_name(&p.stem, end));
            link_or_copy(root, self.catalog, &Source::Absolute(src), Some(&dest), mode)?;
            files.push(dest);
        }
        Ok(files)
    }
}

/// Name every run and render its destination, rejecting two runs that
/// would share a destination while backed by different datasets, and any
/// destination that would land outside the layout root.
fn plan<'r>(
    template: &PathTemplate,
    runs: &'r [Run],
    index: &AliasIndex,
    config: &SampleLayoutConfig,
) -> Result<Vec<PlannedRun<'r>>> {
    let mut short_names = ShortNames::new(&config.sample_prefix);
    let mut seen: FxHashMap<String, String> = FxHashMap::default();
    let mut planned = Vec::with_capacity(runs.len());

    for run in runs {
        let sm = if !config.sample_aliases.is_empty() {
            run.sample.clone()
        } else if config.use_short_sample_names {
            short_names.get_or_insert(&run.canonical_sample)
        } else {
            run.canonical_sample.clone()
        };
        let canonical = index
            .canonical(&run.sample, run.platform_unit.as_deref())
            .ok_or_else(|| {
                FixtureError::Sample(format!("no dataset indexed for sample '{}'", run.sample))
            })?
            .to_string();

        let fields = Fields {
            sm: Some(&sm),
            pu: run.platform_unit.as_deref(),
            batch: run.batch.as_deref(),
            pop: run.population.as_deref(),
        };
        check_label("sample", Some(canonical.as_str()))?;
        check_label("sample", fields.sm)?;
        check_label("platform unit", fields.pu)?;
        check_label("batch", fields.batch)?;
        check_label("population", fields.pop)?;

        let stem = template.render(&fields)?;
        check_stem(&stem)?;

        match seen.get(&stem) {
            Some(other) if *other != canonical => {
                return Err(FixtureError::Sample(format!(
                    "runfmt '{}' renders '{}' for both '{}' and '{}'",
                    template, stem, other, canonical
                )));
            }
            Some(_) => {}
            None => {
                seen.insert(stem.clone(), canonical.clone());
            }
        }

        planned.push(PlannedRun {
            run,
            sm,
            stem,
            canonical,
        });
    }

    Ok(planned)
}

// Label values become single path components
fn check_label(name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.contains(['/', '\\']) || v == "." || v == ".." => Err(
            FixtureError::Sample(format!("{name} '{v}' is not a valid path component")),
        ),
        _ => Ok(()),
    }
}

fn check_stem(stem: &str) -> Result<()> {
    if Path::new(stem)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Ok(())
    } else {
        Err(FixtureError::Sample(format!(
            "destination '{stem}' is not below the layout root"
        )))
    }
}
