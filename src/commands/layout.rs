use crate::commands::FixtureContext;
use crate::config::load_yaml;
use crate::error::Result;
use crate::layout::{
    build_reference_layout, build_sample_layout, ReferenceLayoutConfig, SampleLayoutConfig,
};
use log::info;
use std::path::{Path, PathBuf};

/// Options set on the command line that apply to any layout
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    pub dirname: Option<String>,
    pub numbered: bool,
    pub copy: bool,
    pub show_fixture: bool,
}

impl LayoutOverrides {
    fn apply_sample(&self, config: &mut SampleLayoutConfig) {
        if self.dirname.is_some() {
            config.dirname = self.dirname.clone();
        }
        config.numbered |= self.numbered;
        config.copy |= self.copy;
        config.show_fixture |= self.show_fixture;
    }

    fn apply_reference(&self, config: &mut ReferenceLayoutConfig) {
        if self.dirname.is_some() {
            config.dirname = self.dirname.clone();
        }
        config.numbered |= self.numbered;
        config.copy |= self.copy;
        config.show_fixture |= self.show_fixture;
    }
}

/// Build a sample layout from a YAML file or from an in-memory configuration
pub fn run_samples(
    ctx: &FixtureContext,
    config_file: Option<&Path>,
    inline: SampleLayoutConfig,
    overrides: &LayoutOverrides,
) -> Result<PathBuf> {
    let mut config = match config_file {
        Some(path) => {
            info!("Reading sample layout from {}", path.display());
            load_yaml(path)?
        }
        None => inline,
    };
    overrides.apply_sample(&mut config);
    build_sample_layout(&ctx.catalog, &ctx.tmpdir, &config)
}

pub fn run_reference(
    ctx: &FixtureContext,
    label: &str,
    overrides: &LayoutOverrides,
) -> Result<PathBuf> {
    let mut config = ReferenceLayoutConfig {
        label: label.to_string(),
        ..Default::default()
    };
    overrides.apply_reference(&mut config);
    build_reference_layout(&ctx.catalog, &ctx.tmpdir, &config)
}
