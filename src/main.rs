use clap::Parser;
use log::info;
use ngsfixtures::app_output::ApplicationOutputRequest;
use ngsfixtures::catalog::{DATA_DIR_ENV, DEFAULT_SIZE};
use ngsfixtures::combinator::Strategy;
use ngsfixtures::commands::files::{run_app_output, run_fileset};
use ngsfixtures::commands::layout::{run_reference, run_samples, LayoutOverrides};
use ngsfixtures::commands::FixtureContext;
use ngsfixtures::layout::SampleLayoutConfig;
use ngsfixtures::linker::LinkMode;
use std::io;
use std::path::PathBuf;

/// Common options shared between all commands
#[derive(Parser, Debug)]
struct CommonOpts {
    /// Directory holding the fixture data (sample reads, references, application outputs)
    #[clap(short = 'D', long, env = DATA_DIR_ENV, value_parser)]
    data_dir: PathBuf,

    /// Sample data size directory inside the data directory
    #[clap(long, default_value = DEFAULT_SIZE)]
    size: String,

    /// Base directory for fixtures. A new temporary directory is used if not given.
    #[clap(short = 'o', long, value_parser)]
    outdir: Option<PathBuf>,

    /// Fixture directory name below the base directory
    #[clap(short = 'd', long)]
    dirname: Option<String>,

    /// Append a number to the fixture directory name instead of reusing it
    #[clap(long, action)]
    numbered: bool,

    /// Copy files instead of symlinking them
    #[clap(long, action)]
    copy: bool,

    /// Log every file of the created fixture
    #[clap(long, action)]
    show_fixture: bool,

    /// Verbosity level (0 = warn, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "0")]
    verbose: u8,
}

/// Generate directory layouts of sequencing test data.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
enum Args {
    /// Link sample read files following a run format
    Samples {
        #[clap(flatten)]
        common: CommonOpts,

        /// YAML file with the sample layout configuration
        #[clap(short = 'c', long, value_parser, conflicts_with = "samples")]
        config: Option<PathBuf>,

        /// Sample names
        #[clap(short = 's', long, value_delimiter = ',', num_args = 1..)]
        samples: Vec<String>,

        /// Sample aliases used in file names, one per sample
        #[clap(long, value_delimiter = ',', num_args = 1..)]
        sample_aliases: Vec<String>,

        /// Platform units
        #[clap(long, value_delimiter = ',', num_args = 1..)]
        platform_units: Vec<String>,

        /// Batch (project) names
        #[clap(long, value_delimiter = ',', num_args = 1..)]
        batches: Vec<String>,

        /// Population names
        #[clap(long, value_delimiter = ',', num_args = 1..)]
        populations: Vec<String>,

        /// Paired-end flags, one for all samples or one per sample
        #[clap(long, value_delimiter = ',', num_args = 1..)]
        paired_end: Vec<bool>,

        /// Run format, e.g. `{SM}/{PU}/{SM}_{PU}`
        #[clap(short = 'r', long, default_value = "{SM}")]
        runfmt: String,

        /// How to combine samples with platform units, batches and populations
        #[clap(long, value_enum, default_value_t = Strategy::Zip)]
        combinator: Strategy,

        /// Prefix for short sample names
        #[clap(long, default_value = "s")]
        sample_prefix: String,

        /// Keep the full sample names instead of short names
        #[clap(long, action)]
        no_short_names: bool,

        /// Do not write sampleinfo.csv
        #[clap(long, action)]
        no_sampleinfo: bool,
    },
    /// Link a reference file group
    Reference {
        #[clap(flatten)]
        common: CommonOpts,

        /// Reference group: ref or scaffolds
        #[clap(short = 'l', long, default_value = "ref")]
        label: String,
    },
    /// Link a set of files into one directory
    Fileset {
        #[clap(flatten)]
        common: CommonOpts,

        /// Source files; relative paths are looked up in the data directory
        #[clap(long, value_delimiter = ',', num_args = 1.., required = true)]
        src: Vec<PathBuf>,

        /// Destination names, one per source
        #[clap(long, value_delimiter = ',', num_args = 1..)]
        dst: Vec<PathBuf>,
    },
    /// Link the canned outputs of an application command
    AppOutput {
        #[clap(flatten)]
        common: CommonOpts,

        /// YAML application output catalog
        #[clap(long, value_parser)]
        catalog: PathBuf,

        /// Application name, e.g. samtools
        #[clap(long)]
        application: String,

        /// Application command, e.g. samtools_flagstat
        #[clap(long)]
        command: String,

        /// Application version
        #[clap(long)]
        app_version: String,

        /// Paired end (pe) or single end (se) output
        #[clap(long, default_value = "pe")]
        end: String,
    },
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let root = match args {
        Args::Samples {
            common,
            config,
            samples,
            sample_aliases,
            platform_units,
            batches,
            populations,
            paired_end,
            runfmt,
            combinator,
            sample_prefix,
            no_short_names,
            no_sampleinfo,
        } => {
            let ctx = initialize(&common)?;
            let inline = SampleLayoutConfig {
                samples: samples.into_iter().map(Some).collect(),
                sample_aliases,
                platform_units: platform_units.into_iter().map(Some).collect(),
                batches: batches.into_iter().map(Some).collect(),
                populations: populations.into_iter().map(Some).collect(),
                paired_end: if paired_end.is_empty() {
                    vec![true]
                } else {
                    paired_end
                },
                runfmt,
                combinator,
                sample_prefix,
                use_short_sample_names: !no_short_names,
                sampleinfo: !no_sampleinfo,
                ..Default::default()
            };
            run_samples(&ctx, config.as_deref(), inline, &overrides(&common))
        }
        Args::Reference { common, label } => {
            let ctx = initialize(&common)?;
            run_reference(&ctx, &label, &overrides(&common))
        }
        Args::Fileset { common, src, dst } => {
            let ctx = initialize(&common)?;
            run_fileset(
                &ctx,
                &src,
                &dst,
                common.dirname.as_deref(),
                LinkMode::from_copy_flag(common.copy),
                common.show_fixture,
            )
        }
        Args::AppOutput {
            common,
            catalog,
            application,
            command,
            app_version,
            end,
        } => {
            let ctx = initialize(&common)?;
            ApplicationOutputRequest::new(&application, &command, &app_version, &end).and_then(
                |req| {
                    run_app_output(
                        &ctx,
                        &catalog,
                        &req,
                        common.dirname.as_deref(),
                        LinkMode::from_copy_flag(common.copy),
                        common.show_fixture,
                    )
                },
            )
        }
    }
    .map_err(io::Error::other)?;

    info!("Fixture ready at {}", root.display());
    println!("{}", root.display());
    Ok(())
}

/// Initialize logging and the fixture collaborators from the common options
fn initialize(common: &CommonOpts) -> io::Result<FixtureContext> {
    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match common.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    if !common.data_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Data directory '{}' does not exist", common.data_dir.display()),
        ));
    }

    FixtureContext::new(common.data_dir.clone(), &common.size, common.outdir.clone())
        .map_err(io::Error::other)
}

fn overrides(common: &CommonOpts) -> LayoutOverrides {
    LayoutOverrides {
        dirname: common.dirname.clone(),
        numbered: common.numbered,
        copy: common.copy,
        show_fixture: common.show_fixture,
    }
}
