//! Canned third-party application outputs
//!
//! The catalog maps (application, command, version) to a set of output
//! files stored in the data directory. Paths are templates over
//! `{version}` and `{end}`, e.g.
//!
//! ```yaml
//! samtools:
//!   versions: ["1.2", "1.3.1"]
//!   commands:
//!     samtools_flagstat:
//!       outputs:
//!         flagstat: "applications/samtools/{version}/{end}/medium.flagstat"
//! ```

use crate::catalog::DataCatalog;
use crate::error::{FixtureError, IoContext, Result};
use crate::fileset::setup_fileset;
use crate::linker::{LinkMode, Source};
use crate::listing::log_fixture;
use crate::template::PLACEHOLDER;
use crate::tmpdir::TempDirFactory;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationEntry {
    #[serde(default, deserialize_with = "version_strings")]
    pub versions: Vec<String>,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    /// Overrides the application's version list for this command
    #[serde(default, deserialize_with = "optional_version_strings")]
    pub versions: Option<Vec<String>>,
    /// Output name -> catalog-relative path template
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

/// Static table of application outputs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ApplicationCatalog {
    applications: BTreeMap<String, ApplicationEntry>,
}

/// Paired-end or single-end output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Se,
    Pe,
}

impl FromStr for End {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "se" => Ok(End::Se),
            "pe" => Ok(End::Pe),
            other => Err(FixtureError::UnknownApplication(format!(
                "end must be either se or pe, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            End::Se => "se",
            End::Pe => "pe",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationOutputRequest {
    pub application: String,
    pub command: String,
    pub version: String,
    pub end: End,
}

impl ApplicationOutputRequest {
    pub fn new(application: &str, command: &str, version: &str, end: &str) -> Result<Self> {
        Ok(ApplicationOutputRequest {
            application: application.to_string(),
            command: command.to_string(),
            version: version.to_string(),
            end: end.parse()?,
        })
    }
}

/// A materialised application output fixture
#[derive(Debug, Clone)]
pub struct ApplicationOutput {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl ApplicationCatalog {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| FixtureError::Config {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading application catalog {}", path.display()))?;
        serde_yaml::from_str(&content).map_err(|e| FixtureError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Check that `req` names a known application, command and version.
    /// Returns the command's output templates.
    pub fn validate(&self, req: &ApplicationOutputRequest) -> Result<&CommandEntry> {
        let app = self.applications.get(&req.application).ok_or_else(|| {
            FixtureError::UnknownApplication(format!("no such application '{}'", req.application))
        })?;
        let command = app.commands.get(&req.command).ok_or_else(|| {
            FixtureError::UnknownApplication(format!(
                "no such command '{}' for application '{}'",
                req.command, req.application
            ))
        })?;
        let versions = command.versions.as_ref().unwrap_or(&app.versions);
        if !versions.contains(&req.version) {
            return Err(FixtureError::UnknownApplication(format!(
                "no such application output for version '{}', application '{}'",
                req.version, req.application
            )));
        }
        Ok(command)
    }

    /// Catalog-relative sources of every output of `req`
    pub fn output_sources(&self, req: &ApplicationOutputRequest) -> Result<Vec<Source>> {
        let command = self.validate(req)?;
        command
            .outputs
            .values()
            .map(|template| {
                render_output(template, req).map(|p| Source::Catalog(PathBuf::from(p)))
            })
            .collect()
    }
}

fn render_output(template: &str, req: &ApplicationOutputRequest) -> Result<String> {
    let mut unknown = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
        match &caps[1] {
            "version" => req.version.clone(),
            "end" => req.end.to_string(),
            other => {
                unknown.get_or_insert_with(|| other.to_string());
                String::new()
            }
        }
    });
    if let Some(name) = unknown {
        return Err(FixtureError::template(
            template,
            format!("unknown placeholder '{{{name}}}' (expected version or end)"),
        ));
    }
    if rendered.contains(['{', '}']) {
        return Err(FixtureError::template(template, "unbalanced braces"));
    }
    Ok(rendered.into_owned())
}

/// Validate `req` and link its outputs into a fixture directory.
/// Nothing is created when the request does not match the catalog.
pub fn setup_application_output(
    apps: &ApplicationCatalog,
    catalog: &dyn DataCatalog,
    tmpdir: &TempDirFactory,
    req: &ApplicationOutputRequest,
    dirname: Option<&str>,
    mode: LinkMode,
    show_fixture: bool,
) -> Result<ApplicationOutput> {
    let sources = apps.output_sources(req)?;
    let dir = tmpdir.safe_mktemp(dirname, false)?;
    let files = setup_fileset(&dir, catalog, &sources, None, mode)?;
    if show_fixture {
        log_fixture("application output fixture content", &dir)?;
    }
    Ok(ApplicationOutput { dir, files })
}

fn version_string<E: serde::de::Error>(value: serde_yaml::Value) -> std::result::Result<String, E> {
    match value {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(E::custom(format!("invalid version {other:?}"))),
    }
}

fn version_strings<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    Vec::<serde_yaml::Value>::deserialize(d)?
        .into_iter()
        .map(version_string::<D::Error>)
        .collect()
}

fn optional_version_strings<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<Vec<String>>, D::Error> {
    match Option::<Vec<serde_yaml::Value>>::deserialize(d)? {
        Some(values) => values
            .into_iter()
            .map(version_string::<D::Error>)
            .collect::<std::result::Result<Vec<_>, D::Error>>()
            .map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
samtools:
  versions: [1.2, "1.3.1"]
  commands:
    samtools_flagstat:
      outputs:
        flagstat: "applications/samtools/{version}/{end}/medium.flagstat"
    samtools_idxstats:
      versions: ["1.3.1"]
      outputs:
        idxstats: "applications/samtools/{version}/{end}/medium.idxstats"
"#;

    fn catalog() -> ApplicationCatalog {
        ApplicationCatalog::from_yaml_str(CATALOG).unwrap()
    }

    #[test]
    fn test_numeric_versions_become_strings() {
        let req =
            ApplicationOutputRequest::new("samtools", "samtools_flagstat", "1.2", "pe").unwrap();
        assert!(catalog().validate(&req).is_ok());
    }

    #[test]
    fn test_command_versions_override() {
        let req =
            ApplicationOutputRequest::new("samtools", "samtools_idxstats", "1.2", "pe").unwrap();
        assert!(matches!(
            catalog().validate(&req),
            Err(FixtureError::UnknownApplication(_))
        ));
    }

    #[test]
    fn test_unknown_requests() {
        let c = catalog();
        for (app, cmd, version) in [
            ("bwa", "bwa_mem", "0.7"),
            ("samtools", "samtools_depth", "1.2"),
            ("samtools", "samtools_flagstat", "0.1"),
        ] {
            let req = ApplicationOutputRequest::new(app, cmd, version, "se").unwrap();
            assert!(c.validate(&req).is_err(), "{app}/{cmd}/{version}");
        }
        assert!(
            ApplicationOutputRequest::new("samtools", "samtools_flagstat", "1.2", "both").is_err()
        );
    }

    #[test]
    fn test_output_sources() {
        let req =
            ApplicationOutputRequest::new("samtools", "samtools_flagstat", "1.3.1", "se").unwrap();
        let sources = catalog().output_sources(&req).unwrap();
        assert_eq!(
            sources,
            vec![Source::Catalog(PathBuf::from(
                "applications/samtools/1.3.1/se/medium.flagstat"
            ))]
        );
    }

    #[test]
    fn test_render_output_unknown_placeholder() {
        let req = ApplicationOutputRequest::new("a", "b", "1", "pe").unwrap();
        assert!(render_output("x/{sample}.txt", &req).is_err());
        assert!(render_output("x/{version.txt", &req).is_err());
    }

    #[test]
    fn test_unknown_catalog_key() {
        assert!(ApplicationCatalog::from_yaml_str("samtools:\n  _versions: [1.2]\n").is_err());
    }
}
