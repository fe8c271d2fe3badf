use crate::error::{FixtureError, IoContext, Result};
use log::debug;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

/// Allocates fixture directories below a common base temp root.
///
/// Named directories are reused when they already exist; numbered ones get
/// the smallest free integer suffix (`foo0`, `foo1`, ...).
#[derive(Debug)]
pub struct TempDirFactory {
    base: PathBuf,
    // Owns the base when it was created here; removing it on drop
    guard: Option<TempDir>,
}

impl TempDirFactory {
    /// Create a fresh base directory under the system temp dir
    pub fn new() -> Result<Self> {
        let guard = tempfile::Builder::new()
            .prefix("ngsfixtures-")
            .tempdir()
            .with_context(|| "creating base temp directory".to_string())?;
        Ok(TempDirFactory {
            base: guard.path().to_path_buf(),
            guard: Some(guard),
        })
    }

    /// Use an existing (or to-be-created) directory as the base. It is never removed.
    pub fn with_base(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        fs::create_dir_all(&base)
            .with_context(|| format!("creating base directory {}", base.display()))?;
        Ok(TempDirFactory { base, guard: None })
    }

    /// Keep the base directory after the factory is dropped
    pub fn keep(mut self) -> Self {
        if let Some(guard) = self.guard.take() {
            let _ = guard.keep();
        }
        self
    }

    pub fn getbasetemp(&self) -> &Path {
        &self.base
    }

    /// Create a new directory `<base>/<name>`, or `<base>/<name><n>` when numbered
    pub fn mktemp(&self, name: &str, numbered: bool) -> Result<PathBuf> {
        let name = checked_name(name)?;
        if !numbered {
            let path = self.base.join(name);
            fs::create_dir(&path)
                .with_context(|| format!("creating directory {}", path.display()))?;
            return Ok(path);
        }

        let mut n = 0usize;
        loop {
            let path = self.base.join(format!("{name}{n}"));
            match fs::create_dir(&path) {
                Ok(()) => {
                    debug!("allocated numbered directory {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => {
                    return Err(FixtureError::io(
                        format!("creating directory {}", path.display()),
                        e,
                    ))
                }
            }
        }
    }

    /// Locate the directory for a fixture.
    ///
    /// No dirname (or `.`) returns the base itself, so fixtures without a
    /// dirname share one directory.
    pub fn safe_mktemp(&self, dirname: Option<&str>, numbered: bool) -> Result<PathBuf> {
        let dirname = match dirname {
            None => return Ok(self.base.clone()),
            Some(d) if Path::new(d) == Path::new(".") => return Ok(self.base.clone()),
            Some(d) => checked_name(d)?,
        };

        if let Some(parent) = Path::new(dirname).parent() {
            let parent = self.base.join(parent);
            fs::create_dir_all(&parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }

        if numbered {
            return self.mktemp(dirname, true);
        }
        let path = self.base.join(dirname);
        if path.is_dir() {
            Ok(path)
        } else {
            self.mktemp(dirname, false)
        }
    }
}

fn checked_name(name: &str) -> Result<&str> {
    let path = Path::new(name);
    let ok = !name.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if ok {
        Ok(name.trim_end_matches('/'))
    } else {
        Err(FixtureError::io(
            format!("invalid fixture directory name '{name}'"),
            io::Error::new(io::ErrorKind::InvalidInput, "must be a relative path below the base"),
        ))
    }
}
