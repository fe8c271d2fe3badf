//! Idempotent symlink/copy materialisation
//!
//! Every file a fixture exposes is created through [`link_or_copy`]. An
//! existing destination is never overwritten: the call logs a warning and
//! returns the destination unchanged, so repeated layout builds into the
//! same directory converge instead of failing.

use crate::catalog::{existing, DataCatalog};
use crate::error::{FixtureError, IoContext, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a fixture file comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Path relative to the data catalog root
    Catalog(PathBuf),
    /// Absolute path on the local filesystem
    Absolute(PathBuf),
}

impl Source {
    /// Relative paths are taken to live in the catalog, absolute ones are used as-is
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_absolute() {
            Source::Absolute(path)
        } else {
            Source::Catalog(path)
        }
    }

    pub fn resolve(&self, catalog: &dyn DataCatalog) -> Result<PathBuf> {
        match self {
            Source::Catalog(rel) => catalog.resolve(rel),
            Source::Absolute(path) => existing(path.clone()),
        }
    }

    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        match self {
            Source::Catalog(p) | Source::Absolute(p) => p.file_name(),
        }
    }
}

/// How a fixture file is materialised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    #[default]
    Link,
    Copy,
}

impl LinkMode {
    pub fn from_copy_flag(copy: bool) -> Self {
        if copy {
            LinkMode::Copy
        } else {
            LinkMode::Link
        }
    }
}

/// Link or copy `source` to `dest` under `root`.
///
/// A `None` destination uses the source basename; a relative one is joined
/// to `root`. Missing parent directories are created. Returns the absolute
/// destination, which is left untouched if it already exists.
pub fn link_or_copy(
    root: &Path,
    catalog: &dyn DataCatalog,
    source: &Source,
    dest: Option<&Path>,
    mode: LinkMode,
) -> Result<PathBuf> {
    let src = source.resolve(catalog)?;
    let dest = match dest {
        Some(d) => root.join(d),
        None => {
            let name = src.file_name().ok_or_else(|| FixtureError::SourceNotFound {
                path: src.clone(),
            })?;
            root.join(name)
        }
    };

    // symlink_metadata so that dangling links also count as present
    if fs::symlink_metadata(&dest).is_ok() {
        warn!(
            "link {} -> {} already exists! skipping...",
            dest.display(),
            src.display()
        );
        return Ok(dest);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    match mode {
        LinkMode::Link => {
            let target = fs::canonicalize(&src)
                .with_context(|| format!("resolving {}", src.display()))?;
            symlink(&target, &dest).with_context(|| {
                format!("linking {} -> {}", dest.display(), target.display())
            })?;
            debug!("linked {} -> {}", dest.display(), target.display());
        }
        LinkMode::Copy => {
            fs::copy(&src, &dest).with_context(|| {
                format!("copying {} to {}", src.display(), dest.display())
            })?;
            debug!("copied {} to {}", src.display(), dest.display());
        }
    }

    Ok(dest)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
