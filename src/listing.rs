use crate::error::{IoContext, Result};
use log::info;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every file, link and directory below `root`, in natural order
pub fn visit(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry
            .map_err(std::io::Error::from)
            .with_context(|| format!("walking {}", root.display()))?;
        paths.push(entry.into_path());
    }
    paths.sort_by(|a, b| natord::compare(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(paths)
}

/// Log the contents of a materialised fixture under a banner
pub fn log_fixture(title: &str, root: &Path) -> Result<()> {
    let rule = "-".repeat(title.len());
    info!("{rule}");
    info!("{title}");
    info!("{rule}");
    for path in visit(root)? {
        info!("{}", path.display());
    }
    Ok(())
}
