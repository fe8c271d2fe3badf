pub mod files;
pub mod layout;

use crate::catalog::DirectoryCatalog;
use crate::error::Result;
use crate::tmpdir::TempDirFactory;
use std::path::PathBuf;

/// Collaborators shared by every subcommand
pub struct FixtureContext {
    pub catalog: DirectoryCatalog,
    pub tmpdir: TempDirFactory,
}

impl FixtureContext {
    /// Fixtures go below `outdir` when given, otherwise below a fresh
    /// temporary directory that outlives the process.
    pub fn new(data_dir: PathBuf, size: &str, outdir: Option<PathBuf>) -> Result<Self> {
        let tmpdir = match outdir {
            Some(dir) => TempDirFactory::with_base(dir)?,
            None => TempDirFactory::new()?.keep(),
        };
        Ok(FixtureContext {
            catalog: DirectoryCatalog::new(data_dir).with_size(size),
            tmpdir,
        })
    }
}
