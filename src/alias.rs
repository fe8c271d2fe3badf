//! Sample aliases and short names
//!
//! A layout may expose the same backing dataset under several logical
//! names (e.g. two aliases for one sample sequenced on the same flowcell).
//! The alias decides the rendered path; the canonical sample decides which
//! data file the path links to.

use crate::combinator::Run;
use crate::error::{FixtureError, Result};
use rustc_hash::FxHashMap;

/// One sample slot: the name used in paths and the dataset behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleAlias {
    pub alias: String,
    pub canonical: String,
}

/// Positional mapping from sample slot to (alias, canonical sample)
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: Vec<SampleAlias>,
}

impl AliasMap {
    pub fn entries(&self) -> &[SampleAlias] {
        &self.entries
    }
}

/// Build the alias map for `samples`.
///
/// With no aliases every sample is its own alias. Otherwise `aliases` must
/// be exactly as long as `samples`.
pub fn resolve(samples: &[String], aliases: &[String]) -> Result<AliasMap> {
    if aliases.is_empty() {
        return Ok(AliasMap {
            entries: samples
                .iter()
                .map(|s| SampleAlias {
                    alias: s.clone(),
                    canonical: s.clone(),
                })
                .collect(),
        });
    }

    if aliases.len() != samples.len() {
        return Err(FixtureError::Sample(format!(
            "length of sample aliases ({}) and samples ({}) must be equal",
            aliases.len(),
            samples.len()
        )));
    }
    if let Some(pos) = aliases.iter().position(|a| a.trim().is_empty()) {
        return Err(FixtureError::Sample(format!(
            "sample alias at position {pos} is empty"
        )));
    }

    Ok(AliasMap {
        entries: aliases
            .iter()
            .zip(samples)
            .map(|(a, s)| SampleAlias {
                alias: a.clone(),
                canonical: s.clone(),
            })
            .collect(),
    })
}

/// Lookup of canonical sample by (alias, platform unit)
#[derive(Debug, Default)]
pub struct AliasIndex {
    map: FxHashMap<(String, Option<String>), String>,
}

impl AliasIndex {
    /// Index `runs`, rejecting an (alias, platform unit) pair that would
    /// point at two different datasets.
    pub fn from_runs(runs: &[Run]) -> Result<Self> {
        let mut map: FxHashMap<(String, Option<String>), String> = FxHashMap::default();
        for run in runs {
            let key = (run.sample.clone(), run.platform_unit.clone());
            match map.get(&key) {
                Some(canonical) if *canonical != run.canonical_sample => {
                    return Err(FixtureError::Sample(format!(
                        "alias '{}' on platform unit '{}' maps to both '{}' and '{}'",
                        run.sample,
                        run.platform_unit.as_deref().unwrap_or(""),
                        canonical,
                        run.canonical_sample
                    )));
                }
                Some(_) => {}
                None => {
                    map.insert(key, run.canonical_sample.clone());
                }
            }
        }
        Ok(AliasIndex { map })
    }

    pub fn canonical(&self, alias: &str, platform_unit: Option<&str>) -> Option<&str> {
        self.map
            .get(&(alias.to_string(), platform_unit.map(str::to_string)))
            .map(String::as_str)
    }
}

/// Assigns `<prefix><n>` names to canonical samples in first-seen order
pub struct ShortNames {
    prefix: String,
    name_to_id: FxHashMap<String, usize>,
    next_id: usize,
}

impl ShortNames {
    pub fn new(prefix: &str) -> Self {
        ShortNames {
            prefix: prefix.to_string(),
            name_to_id: FxHashMap::default(),
            next_id: 1,
        }
    }

    pub fn get_or_insert(&mut self, canonical: &str) -> String {
        let id = *self
            .name_to_id
            .entry(canonical.to_owned())
            .or_insert_with(|| {
                let id = self.next_id;
                self.next_id += 1;
                id
            });
        format!("{}{}", self.prefix, id)
    }
}
