use crate::{Error, Result};
use omegaprime_store::Opportunity;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Snapshot writer for the record store
pub struct Exporter;

impl Exporter {
    /// Export records to a file, format picked from the extension.
    /// Anything that isn't `.json` is written as CSV.
    pub fn export_to_file<P: AsRef<Path>>(records: &[Opportunity], path: P) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .unwrap_or(ExportFormat::Csv);

        Self::export_to_file_with_format(records, path, format)
    }

    /// Export records to a file with explicit format.
    ///
    /// The whole snapshot goes to a sibling temp file first and is renamed
    /// over the target, so the previous snapshot stays intact until the new
    /// one is complete.
    pub fn export_to_file_with_format<P: AsRef<Path>>(
        records: &[Opportunity],
        path: P,
        format: ExportFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        let content = match format {
            ExportFormat::Csv => Self::to_csv(records),
            ExportFormat::Json => Self::to_json(records)?,
        };

        let tmp = Self::temp_path(path);
        let mut file = File::create(&tmp)
            .map_err(|e| Error::ExportError(format!("Failed to create {}: {}", tmp.display(), e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(format!("Failed to write {}: {}", tmp.display(), e)))?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, path)
            .map_err(|e| Error::ExportError(format!("Failed to replace {}: {}", path.display(), e)))?;

        Ok(())
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }

    pub fn to_json(records: &[Opportunity]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Same columns as the table, one row per record, in the given order
    pub fn to_csv(records: &[Opportunity]) -> String {
        let mut output = String::new();

        output.push_str("id,title,link,source,published,score,deadline_hint,notified,added_at\n");

        for opp in records {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                opp.id,
                Self::escape_csv(&opp.title),
                Self::escape_csv(&opp.link),
                Self::escape_csv(&opp.source),
                Self::escape_csv(&opp.published),
                opp.score,
                Self::escape_csv(&opp.deadline_hint),
                u8::from(opp.notified),
                opp.added_at.to_rfc3339(),
            ));
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
