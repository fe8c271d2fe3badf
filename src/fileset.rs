//! Single-file and multi-file fixtures

use crate::catalog::DataCatalog;
use crate::error::{FixtureError, Result};
use crate::linker::{link_or_copy, LinkMode, Source};
use log::info;
use std::path::{Path, PathBuf};

const COMPRESSION_SUFFIXES: [&str; 4] = ["gz", "bz2", "xz", "zst"];

/// Options for [`setup_filetype`]
#[derive(Debug, Clone, Default)]
pub struct FiletypeOptions {
    /// Destination name relative to the fixture directory; the source basename if absent
    pub dest: Option<PathBuf>,
    /// Name the destination `<outprefix><extension>`
    pub rename: bool,
    pub outprefix: String,
    pub mode: LinkMode,
}

/// Link (or copy) a single file into `dir`
pub fn setup_filetype(
    dir: &Path,
    catalog: &dyn DataCatalog,
    src: &Source,
    options: &FiletypeOptions,
) -> Result<PathBuf> {
    let dest = if options.rename {
        let name = src.file_name().map(|n| n.to_string_lossy().into_owned()).ok_or_else(|| {
            FixtureError::InvalidFileset(format!("source {src:?} has no file name"))
        })?;
        Some(PathBuf::from(format!("{}{}", options.outprefix, extension(&name))))
    } else {
        options.dest.clone()
    };
    link_or_copy(dir, catalog, src, dest.as_deref(), options.mode)
}

/// Link (or copy) every source into `dir`.
///
/// Without `dsts` the files keep their basenames; otherwise `dsts` names
/// each source in turn and must be exactly as long as `srcs`.
pub fn setup_fileset(
    dir: &Path,
    catalog: &dyn DataCatalog,
    srcs: &[Source],
    dsts: Option<&[PathBuf]>,
    mode: LinkMode,
) -> Result<Vec<PathBuf>> {
    check_fileset(srcs, dsts)?;
    // Resolve everything up front so a bad source leaves no partial fileset
    for src in srcs {
        src.resolve(catalog)?;
    }

    info!("Setting up fileset of {} files in {}", srcs.len(), dir.display());
    srcs.iter()
        .enumerate()
        .map(|(i, src)| {
            let dest = dsts.map(|d| d[i].as_path());
            link_or_copy(dir, catalog, src, dest, mode)
        })
        .collect()
}

/// Reject an empty fileset or destinations that do not pair up with the sources
pub fn check_fileset(srcs: &[Source], dsts: Option<&[PathBuf]>) -> Result<()> {
    if srcs.is_empty() {
        return Err(FixtureError::InvalidFileset("no sources given".to_string()));
    }
    match dsts {
        Some(dsts) if dsts.len() != srcs.len() => Err(FixtureError::InvalidFileset(format!(
            "length of destinations ({}) and sources ({}) must be equal",
            dsts.len(),
            srcs.len()
        ))),
        _ => Ok(()),
    }
}

/// File extension including a leading compression suffix: `x.fastq.gz` -> `.fastq.gz`
pub fn extension(name: &str) -> String {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.len() {
        0 | 1 => String::new(),
        2 => format!(".{}", parts[1]),
        n => {
            let last = parts[n - 1];
            if COMPRESSION_SUFFIXES.contains(&last) {
                format!(".{}.{}", parts[n - 2], last)
            } else {
                format!(".{last}")
            }
        }
    }
}
