use crate::app_output::{setup_application_output, ApplicationCatalog, ApplicationOutputRequest};
use crate::commands::FixtureContext;
use crate::error::Result;
use crate::fileset::{check_fileset, setup_fileset};
use crate::linker::{LinkMode, Source};
use crate::listing::log_fixture;
use std::path::{Path, PathBuf};

/// Link a list of files into one fixture directory
pub fn run_fileset(
    ctx: &FixtureContext,
    srcs: &[PathBuf],
    dsts: &[PathBuf],
    dirname: Option<&str>,
    mode: LinkMode,
    show_fixture: bool,
) -> Result<PathBuf> {
    let sources: Vec<Source> = srcs.iter().map(Source::from_path).collect();
    let dsts = if dsts.is_empty() { None } else { Some(dsts) };
    check_fileset(&sources, dsts)?;
    let dir = ctx.tmpdir.safe_mktemp(dirname, false)?;
    setup_fileset(&dir, &ctx.catalog, &sources, dsts, mode)?;
    if show_fixture {
        log_fixture("fileset fixture content", &dir)?;
    }
    Ok(dir)
}

pub fn run_app_output(
    ctx: &FixtureContext,
    catalog_file: &Path,
    req: &ApplicationOutputRequest,
    dirname: Option<&str>,
    mode: LinkMode,
    show_fixture: bool,
) -> Result<PathBuf> {
    let apps = ApplicationCatalog::load(catalog_file)?;
    let output = setup_application_output(
        &apps,
        &ctx.catalog,
        &ctx.tmpdir,
        req,
        dirname,
        mode,
        show_fixture,
    )?;
    Ok(output.dir)
}
