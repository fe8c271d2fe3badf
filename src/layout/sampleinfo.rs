use crate::error::{IoContext, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the per-layout sample information file
pub const SAMPLEINFO_FILE: &str = "sampleinfo.csv";

const HEADER: [&str; 6] = ["SM", "PU", "BATCH", "POP", "END", "FASTQ"];

/// One `sampleinfo.csv` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleInfoRecord {
    pub sample: String,
    pub platform_unit: Option<String>,
    pub batch: Option<String>,
    pub population: Option<String>,
    pub paired_end: bool,
    /// Read files relative to the layout root
    pub fastq: Vec<PathBuf>,
}

impl SampleInfoRecord {
    fn fields(&self) -> [String; 6] {
        let fastq: Vec<String> = self
            .fastq
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        [
            self.sample.clone(),
            self.platform_unit.clone().unwrap_or_default(),
            self.batch.clone().unwrap_or_default(),
            self.population.clone().unwrap_or_default(),
            if self.paired_end { "pe" } else { "se" }.to_string(),
            fastq.join(";"),
        ]
    }
}

/// Write `records` to `<root>/sampleinfo.csv`, replacing any previous file
pub fn write_sampleinfo(root: &Path, records: &[SampleInfoRecord]) -> Result<PathBuf> {
    let path = root.join(SAMPLEINFO_FILE);
    let context = || format!("writing {}", path.display());

    let file = File::create(&path).with_context(context)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", HEADER.join(",")).with_context(context)?;
    for record in records {
        let row: Vec<String> = record.fields().iter().map(|f| quote(f)).collect();
        writeln!(writer, "{}", row.join(",")).with_context(context)?;
    }
    writer.flush().with_context(context)?;

    Ok(path)
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
