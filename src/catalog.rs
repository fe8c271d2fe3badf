use crate::error::{FixtureError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the data root used by the command line tool
pub const DATA_DIR_ENV: &str = "NGSFIXTURES_DATA_DIR";

/// Default sample data size directory
pub const DEFAULT_SIZE: &str = "tiny";

/// Sequencing read end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadEnd {
    One,
    Two,
}

impl ReadEnd {
    pub fn suffix(&self) -> &'static str {
        match self {
            ReadEnd::One => "1",
            ReadEnd::Two => "2",
        }
    }

    /// The read ends present for a run
    pub fn for_run(paired_end: bool) -> &'static [ReadEnd] {
        if paired_end {
            &[ReadEnd::One, ReadEnd::Two]
        } else {
            &[ReadEnd::One]
        }
    }
}

impl fmt::Display for ReadEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// File name of one read file for a sample, e.g. `CHS.HG00512_1.fastq.gz`
pub fn read_file_name(stem: &str, end: ReadEnd) -> String {
    format!("{stem}_{end}.fastq.gz")
}

// Trait for locating backing data files
pub trait DataCatalog {
    /// Directory that catalog-relative sources are resolved against
    fn data_root(&self) -> &Path;

    /// Absolute path of the read file backing `sample` on `platform_unit`.
    /// Fails with `SourceNotFound` if the file does not exist.
    fn sample_read(
        &self,
        sample: &str,
        platform_unit: Option<&str>,
        end: ReadEnd,
    ) -> Result<PathBuf>;

    /// Resolve a catalog-relative path, failing if it does not exist
    fn resolve(&self, relative: &Path) -> Result<PathBuf> {
        existing(self.data_root().join(relative))
    }
}

/// A catalog backed by a data directory laid out as
/// `<root>/<size>/<sample>_{1,2}.fastq.gz` plus reference and
/// application output subdirectories.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    size: String,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryCatalog {
            root: root.into(),
            size: DEFAULT_SIZE.to_string(),
        }
    }

    /// Select the sample data size directory (`tiny`, `small`, ...)
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }
}

impl DataCatalog for DirectoryCatalog {
    fn data_root(&self) -> &Path {
        &self.root
    }

    // Sample files are shared by all platform units of a sample
    fn sample_read(
        &self,
        sample: &str,
        _platform_unit: Option<&str>,
        end: ReadEnd,
    ) -> Result<PathBuf> {
        existing(self.root.join(&self.size).join(read_file_name(sample, end)))
    }
}

pub(crate) fn existing(path: PathBuf) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError::SourceNotFound { path })
    }
}
