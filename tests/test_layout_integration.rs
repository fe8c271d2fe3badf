//! Integration tests for sample and reference layouts built against a
//! throwaway data directory

use ngsfixtures::catalog::DirectoryCatalog;
use ngsfixtures::combinator::Strategy;
use ngsfixtures::layout::{
    build_reference_layout, build_sample_layout, ReferenceLayoutConfig, SampleLayoutConfig,
    SAMPLEINFO_FILE,
};
use ngsfixtures::listing::visit;
use ngsfixtures::tmpdir::TempDirFactory;
use ngsfixtures::FixtureError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLES: [&str; 4] = ["CHS.HG00512", "CHS.HG00513", "YRI.NA19238", "PUR.HG00731"];

/// Create a data directory with read files for every sample and both reference groups
fn create_data_dir() -> TempDir {
    let data = TempDir::new().unwrap();
    let tiny = data.path().join("tiny");
    fs::create_dir_all(&tiny).unwrap();
    for sample in SAMPLES {
        for end in ["1", "2"] {
            fs::write(
                tiny.join(format!("{sample}_{end}.fastq.gz")),
                format!("@{sample}/{end}\nACGT\n+\nIIII\n"),
            )
            .unwrap();
        }
    }
    for (dir, files) in [
        (
            "ref",
            vec![
                "ref.fa",
                "ref.fa.fai",
                "ref.dict",
                "ref.chrom.sizes",
                "ref-dbsnp.vcf.gz",
                "ref-transcripts.gtf",
                "ref-transcripts.bed12",
                "ref-exons.bed",
                "ref-targets.bed",
            ],
        ),
        (
            "scaffolds",
            vec![
                "scaffolds.fa",
                "scaffolds.fa.fai",
                "scaffolds.dict",
                "scaffolds.chrom.sizes",
            ],
        ),
    ] {
        fs::create_dir_all(data.path().join(dir)).unwrap();
        for file in files {
            fs::write(data.path().join(dir).join(file), file).unwrap();
        }
    }
    data
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn relative(root: &Path) -> Vec<String> {
    visit(root)
        .unwrap()
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_custom_sample_layout() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("foo".to_string()),
        samples: some(&["CHS.HG00512", "YRI.NA19238"]),
        platform_units: some(&["bar", "foobar"]),
        paired_end: vec![true, false],
        runfmt: "{SM}/{SM}_{PU}".to_string(),
        use_short_sample_names: false,
        ..Default::default()
    };
    let root = build_sample_layout(&catalog, &tmpdir, &config).unwrap();

    assert_eq!(root, tmpdir.getbasetemp().join("foo"));
    let files = relative(&root);
    assert!(files.contains(&"CHS.HG00512/CHS.HG00512_bar_1.fastq.gz".to_string()));
    assert!(files.contains(&"CHS.HG00512/CHS.HG00512_bar_2.fastq.gz".to_string()));
    assert!(files.contains(&"YRI.NA19238/YRI.NA19238_foobar_1.fastq.gz".to_string()));
    assert!(!files.iter().any(|f| f.ends_with("YRI.NA19238_foobar_2.fastq.gz")));

    let link = root.join("CHS.HG00512/CHS.HG00512_bar_1.fastq.gz");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::canonicalize(&link).unwrap(),
        fs::canonicalize(data.path().join("tiny/CHS.HG00512_1.fastq.gz")).unwrap()
    );
}

#[test]
fn test_sample_aliases_share_backing_files() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("samplealiases".to_string()),
        numbered: true,
        samples: some(&["CHS.HG00512", "CHS.HG00513", "CHS.HG00512"]),
        sample_aliases: strings(&["s1", "s1", "s2"]),
        platform_units: some(&["010101_AAABBB11XX", "020202_AAABBB22XX", "010101_AAABBB11XX"]),
        runfmt: "{SM}_{PU}".to_string(),
        ..Default::default()
    };
    let root = build_sample_layout(&catalog, &tmpdir, &config).unwrap();
    assert_eq!(root.file_name().unwrap(), "samplealiases0");

    let real = |name: &str| fs::canonicalize(root.join(name)).unwrap();
    assert_eq!(
        real("s1_010101_AAABBB11XX_1.fastq.gz"),
        real("s2_010101_AAABBB11XX_1.fastq.gz")
    );
    assert_eq!(
        real("s1_020202_AAABBB22XX_1.fastq.gz"),
        fs::canonicalize(data.path().join("tiny/CHS.HG00513_1.fastq.gz")).unwrap()
    );
    assert_ne!(
        real("s1_010101_AAABBB11XX_1.fastq.gz"),
        real("s1_020202_AAABBB22XX_1.fastq.gz")
    );

    // A second numbered build gets its own directory
    let again = build_sample_layout(&catalog, &tmpdir, &config).unwrap();
    assert_eq!(again.file_name().unwrap(), "samplealiases1");
}

#[test]
fn test_alias_length_mismatch_creates_nothing() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("mismatch".to_string()),
        samples: some(&["CHS.HG00512", "CHS.HG00513"]),
        sample_aliases: strings(&["s1"]),
        ..Default::default()
    };
    let err = build_sample_layout(&catalog, &tmpdir, &config).unwrap_err();
    assert!(matches!(err, FixtureError::Sample(_)));
    assert!(!tmpdir.getbasetemp().join("mismatch").exists());
}

#[test]
fn test_bad_runfmt_creates_nothing() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("badfmt".to_string()),
        samples: some(&["CHS.HG00512"]),
        runfmt: "{SM}/{LANE}".to_string(),
        ..Default::default()
    };
    let err = build_sample_layout(&catalog, &tmpdir, &config).unwrap_err();
    assert!(matches!(err, FixtureError::Template { .. }));
    assert!(!tmpdir.getbasetemp().join("badfmt").exists());
}

#[test]
fn test_rebuild_is_idempotent() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("rebuild".to_string()),
        samples: some(&["CHS.HG00512", "YRI.NA19238"]),
        runfmt: "{SM}/{SM}".to_string(),
        ..Default::default()
    };
    let first = build_sample_layout(&catalog, &tmpdir, &config).unwrap();
    let before = relative(&first);
    let second = build_sample_layout(&catalog, &tmpdir, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(before, relative(&second));
    assert!(before.contains(&"s1/s1_1.fastq.gz".to_string()));
    assert!(before.contains(&"s2/s2_2.fastq.gz".to_string()));
}

#[test]
fn test_copy_mode_and_sampleinfo() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("copied".to_string()),
        samples: some(&["PUR.HG00731", "CHS.HG00513"]),
        platform_units: some(&["pu1", "pu2"]),
        batches: some(&["b1", "b2"]),
        populations: vec![Some("PUR".to_string()), None],
        paired_end: vec![false, true],
        runfmt: "{BATCH}/{SM}_{PU}".to_string(),
        copy: true,
        ..Default::default()
    };
    let root = build_sample_layout(&catalog, &tmpdir, &config).unwrap();

    let copied = root.join("b1/s1_pu1_1.fastq.gz");
    assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read(&copied).unwrap(),
        fs::read(data.path().join("tiny/PUR.HG00731_1.fastq.gz")).unwrap()
    );

    let sampleinfo = fs::read_to_string(root.join(SAMPLEINFO_FILE)).unwrap();
    let lines: Vec<&str> = sampleinfo.lines().collect();
    assert_eq!(
        lines,
        vec![
            "SM,PU,BATCH,POP,END,FASTQ",
            "s1,pu1,b1,PUR,se,b1/s1_pu1_1.fastq.gz",
            "s2,pu2,b2,,pe,b2/s2_pu2_1.fastq.gz;b2/s2_pu2_2.fastq.gz",
        ]
    );
}

#[test]
fn test_product_layout() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        samples: some(&["CHS.HG00512", "YRI.NA19238"]),
        platform_units: some(&["pu1", "pu2"]),
        combinator: Strategy::Product,
        runfmt: "{SM}/{PU}/{SM}".to_string(),
        use_short_sample_names: false,
        sampleinfo: false,
        ..Default::default()
    };
    let root = build_sample_layout(&catalog, &tmpdir, &config).unwrap();
    assert_eq!(root, tmpdir.getbasetemp());

    let reads: Vec<String> = relative(&root)
        .into_iter()
        .filter(|f| f.ends_with("_1.fastq.gz"))
        .collect();
    assert_eq!(
        reads,
        vec![
            "CHS.HG00512/pu1/CHS.HG00512_1.fastq.gz",
            "CHS.HG00512/pu2/CHS.HG00512_1.fastq.gz",
            "YRI.NA19238/pu1/YRI.NA19238_1.fastq.gz",
            "YRI.NA19238/pu2/YRI.NA19238_1.fastq.gz",
        ]
    );
    assert!(!root.join(SAMPLEINFO_FILE).exists());
}

#[test]
fn test_missing_sample_keeps_earlier_runs() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = SampleLayoutConfig {
        dirname: Some("partial".to_string()),
        samples: some(&["CHS.HG00512", "NA12878"]),
        use_short_sample_names: false,
        ..Default::default()
    };
    let err = build_sample_layout(&catalog, &tmpdir, &config).unwrap_err();
    assert!(matches!(err, FixtureError::SourceNotFound { .. }));

    let root = tmpdir.getbasetemp().join("partial");
    assert!(root.join("CHS.HG00512_1.fastq.gz").exists());
    assert!(!root.join(SAMPLEINFO_FILE).exists());
}

#[test]
fn test_reference_layouts() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let scaffolds = build_reference_layout(
        &catalog,
        &tmpdir,
        &ReferenceLayoutConfig {
            label: "scaffolds".to_string(),
            dirname: Some("scaffolds".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        relative(&scaffolds),
        vec![
            "scaffolds.chrom.sizes",
            "scaffolds.dict",
            "scaffolds.fa",
            "scaffolds.fa.fai",
        ]
    );

    let reference =
        build_reference_layout(&catalog, &tmpdir, &ReferenceLayoutConfig::default()).unwrap();
    let files = relative(&reference);
    assert_eq!(files.len(), 9);
    assert!(files.contains(&"ref.fa".to_string()));
    assert!(files.contains(&"ref-dbsnp.vcf.gz".to_string()));
    assert_eq!(
        fs::read_to_string(reference.join("ref.dict")).unwrap(),
        "ref.dict"
    );
}

#[test]
fn test_unknown_reference_label() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config = ReferenceLayoutConfig {
        label: "hg38".to_string(),
        dirname: Some("hg38".to_string()),
        ..Default::default()
    };
    let err = build_reference_layout(&catalog, &tmpdir, &config).unwrap_err();
    assert!(matches!(err, FixtureError::UnknownLabel { .. }));
    assert!(!tmpdir.getbasetemp().join("hg38").exists());
}

#[test]
fn test_layout_from_yaml_file() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();

    let config_path: PathBuf = tmpdir.getbasetemp().join("layout.yaml");
    fs::write(
        &config_path,
        "dirname: yaml\nsamples: [YRI.NA19238]\nplatform_units: [~]\nruns_per_sample: 2\n",
    )
    .unwrap();
    let err = ngsfixtures::config::load_yaml::<SampleLayoutConfig>(&config_path).unwrap_err();
    assert!(matches!(err, FixtureError::Config { .. }));

    fs::write(
        &config_path,
        "dirname: yaml\nsamples: [YRI.NA19238]\nplatform_units: [~]\nrunfmt: \"{SM}-{PU}\"\n",
    )
    .unwrap();
    let config: SampleLayoutConfig = ngsfixtures::config::load_yaml(&config_path).unwrap();
    let root = build_sample_layout(&catalog, &tmpdir, &config).unwrap();
    assert!(root.join("s1_1.fastq.gz").exists());
}

#[test]
fn test_label_values_cannot_leave_layout_root() {
    let data = create_data_dir();
    let catalog = DirectoryCatalog::new(data.path());
    let tmpdir = TempDirFactory::new().unwrap();
    let outside = TempDir::new().unwrap();
    let outside_pu = outside.path().join("elsewhere");

    let absolute_pu = SampleLayoutConfig {
        dirname: Some("foo".to_string()),
        samples: some(&["CHS.HG00512"]),
        platform_units: vec![Some(outside_pu.to_string_lossy().into_owned())],
        runfmt: "{PU}/{SM}".to_string(),
        ..Default::default()
    };
    let err = build_sample_layout(&catalog, &tmpdir, &absolute_pu).unwrap_err();
    assert!(matches!(err, FixtureError::Sample(_)));
    assert!(!outside_pu.exists());

    let climbing_alias = SampleLayoutConfig {
        dirname: Some("foo".to_string()),
        samples: some(&["CHS.HG00512"]),
        sample_aliases: strings(&["../../x"]),
        runfmt: "{SM}".to_string(),
        ..Default::default()
    };
    let err = build_sample_layout(&catalog, &tmpdir, &climbing_alias).unwrap_err();
    assert!(matches!(err, FixtureError::Sample(_)));
    assert!(!tmpdir.getbasetemp().join("foo").exists());
}
