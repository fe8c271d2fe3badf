//! Sample and reference layouts
//!
//! Both kinds of layout are materialised below a directory allocated by a
//! [`TempDirFactory`] and are populated through the linker, so rebuilding a
//! layout into the same directory is harmless.

pub mod reference;
pub mod sample;
pub mod sampleinfo;

pub use reference::{ReferenceLabel, ReferenceLayoutConfig, ReferenceLayoutEngine};
pub use sample::{SampleLayoutConfig, SampleLayoutEngine};
pub use sampleinfo::{SampleInfoRecord, SAMPLEINFO_FILE};

use crate::catalog::DataCatalog;
use crate::error::Result;
use crate::tmpdir::TempDirFactory;
use std::path::PathBuf;

pub fn build_sample_layout(
    catalog: &dyn DataCatalog,
    tmpdir: &TempDirFactory,
    config: &SampleLayoutConfig,
) -> Result<PathBuf> {
    SampleLayoutEngine::new(catalog, tmpdir).build(config)
}

pub fn build_reference_layout(
    catalog: &dyn DataCatalog,
    tmpdir: &TempDirFactory,
    config: &ReferenceLayoutConfig,
) -> Result<PathBuf> {
    ReferenceLayoutEngine::new(catalog, tmpdir).build(config)
}
