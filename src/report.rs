use std::fs;
use std::path::{Path, PathBuf};

use crate::enrich::{Lexicon, NO_ENTRY_MESSAGE, enrich};
use crate::error::{Error, Result};
use crate::rank::OverrepresentationEntry;

pub const REPORT_STEM: &str = "overrepresented_words";
pub const ENRICHED_REPORT_FILE: &str = "overrepresented_words_enriched.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

///Prefixes cells that a spreadsheet would evaluate as a formula.
/// # Example
/// ```
/// use show_vocab::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)"), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("楽しい"), "楽しい");
/// ```
pub fn csv_safe_cell(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

///Plain-text report: a `word: overrepresentation` header, then one `word: ratio` line per entry.
/// # Example
/// ```
/// use show_vocab::{OverrepresentationEntry, render_ranked_text};
/// let entries = vec![
///     OverrepresentationEntry { word: "楽しい".into(), ratio: 5.0, count: 10 },
///     OverrepresentationEntry { word: "走る".into(), ratio: 0.8, count: 8 },
/// ];
/// assert_eq!(render_ranked_text(&entries), "word: overrepresentation\n楽しい: 5.00\n走る: 0.80\n");
/// ```
pub fn render_ranked_text(entries: &[OverrepresentationEntry]) -> String {
    let mut out = String::from("word: overrepresentation\n");
    for entry in entries {
        out.push_str(&format!("{}: {:.2}\n", entry.word, entry.ratio));
    }
    out
}

pub fn render_ranked_csv(entries: &[OverrepresentationEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["word", "overrepresentation", "count"])
        .map_err(|e| Error::Export(e.to_string()))?;
    for entry in entries {
        wtr.write_record([
            csv_safe_cell(&entry.word),
            format!("{:.2}", entry.ratio),
            entry.count.to_string(),
        ])
        .map_err(|e| Error::Export(e.to_string()))?;
    }
    let bytes = wtr.into_inner().map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

pub fn render_ranked_json(entries: &[OverrepresentationEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).map_err(|e| Error::Export(e.to_string()))
}

///Enriched report: a numbered heading per word followed by its dictionary text.
pub fn render_enriched_text<L: Lexicon + ?Sized>(
    entries: &[OverrepresentationEntry],
    lexicon: &L,
) -> String {
    let mut blocks = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let text = enrich(lexicon, &entry.word);
        let body = if text.is_empty() {
            NO_ENTRY_MESSAGE
        } else {
            text.as_str()
        };
        blocks.push(format!(
            "{}. {} ({:.2}x standard frequency)\n{}\n",
            i + 1,
            entry.word,
            entry.ratio,
            body
        ));
    }
    blocks.join("\n")
}

///Writes the ranked report into `folder`, replacing any previous one. Returns the file path.
pub fn write_ranked(
    folder: &Path,
    entries: &[OverrepresentationEntry],
    format: ExportFormat,
) -> Result<PathBuf> {
    let content = match format {
        ExportFormat::Txt => render_ranked_text(entries),
        ExportFormat::Csv => render_ranked_csv(entries)?,
        ExportFormat::Json => render_ranked_json(entries)?,
    };
    let path = folder.join(format!("{REPORT_STEM}.{}", format.extension()));
    fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

pub fn write_enriched<L: Lexicon + ?Sized>(
    folder: &Path,
    entries: &[OverrepresentationEntry],
    lexicon: &L,
) -> Result<PathBuf> {
    let path = folder.join(ENRICHED_REPORT_FILE);
    fs::write(&path, render_enriched_text(entries, lexicon)).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}
