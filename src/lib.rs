//! # show_vocab
//!
//! Finds the words a Japanese show uses unusually often compared with
//! everyday Japanese, working from the show's subtitle files.
//!
//! A show is a folder with a `Transcripts` subdirectory of `.srt` files.
//! Each caption becomes a sentence ([`parse_srt`]), each sentence is reduced
//! to nouns, verbs and adjectives ([`ContentWordExtractor`]), the words are
//! counted ([`WordCounter`]) and compared against a general-language
//! frequency list ([`Ranker`]). The ranked list is written next to the
//! transcripts, optionally with dictionary glosses ([`write_enriched`]).
//!
//! Each show gets its own counter; nothing is carried from one show to the
//! next.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use walkdir::WalkDir;

pub mod counter;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod rank;
pub mod reference;
pub mod report;
pub mod subtitle;
pub mod tagger;

pub use counter::{DenominatorPolicy, WordCounter};
pub use enrich::{
    JmdictLexicon, KanjiInfo, LexicalEntry, Lexicon, LookupResult, NO_ENTRY_MESSAGE, Sense,
    enrich, format_lookup,
};
pub use error::{Error, Result};
pub use extract::{
    ContentWordExtractor, Extraction, KatakanaDrop, KatakanaHeuristic, is_katakana_word,
    is_reduplicated, select_word,
};
pub use rank::{CandidateCutoff, OverrepresentationEntry, Ranker, RankerConfig};
pub use reference::{ExcludeSet, ReferenceFrequencyTable};
pub use report::{
    ENRICHED_REPORT_FILE, ExportFormat, REPORT_STEM, csv_safe_cell, render_enriched_text,
    render_ranked_text, write_enriched, write_ranked,
};
pub use subtitle::{parse_srt, read_srt_file, strip_annotations};
pub use tagger::{FeatureLayout, Tagger, Token, VibratoTagger, load_system_dictionary};

pub const TRANSCRIPTS_DIR: &str = "Transcripts";
pub const EXCLUDE_FILE: &str = "excluded_words.txt";

/// Settings shared by every show in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub ranker: RankerConfig,
    pub denominator: DenominatorPolicy,
    /// Apply [`KatakanaHeuristic`] during extraction.
    pub katakana_filter: bool,
    pub export_format: ExportFormat,
    /// How many of the most common words to keep in [`ShowReport::top_words`].
    pub top_words: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            ranker: RankerConfig::default(),
            denominator: DenominatorPolicy::AllTokens,
            katakana_filter: true,
            export_format: ExportFormat::Txt,
            top_words: 0,
        }
    }
}

/// Raw counts of one show, before ranking.
#[derive(Debug, Clone, Default)]
pub struct ShowCounts {
    pub counter: WordCounter,
    pub file_count: usize,
    pub sentence_count: usize,
}

#[derive(Debug, Clone)]
pub struct ShowReport {
    pub folder: PathBuf,
    pub file_count: usize,
    pub sentence_count: usize,
    pub total_words: u64,
    pub distinct_words: usize,
    pub entries: Vec<OverrepresentationEntry>,
    pub top_words: Vec<(String, u64)>,
    pub report_path: PathBuf,
    pub enriched_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<ShowReport>,
    /// Folder and error message of every show that failed.
    pub failed: Vec<(PathBuf, String)>,
}

///Lists the `.srt` files directly inside `transcripts`, sorted by file name.
pub fn collect_subtitle_files(transcripts: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(transcripts)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::io(transcripts, io::Error::from(e)))?;
        let is_srt = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"));
        if entry.file_type().is_file() && is_srt {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

///Counts the content words of every subtitle file of the show in `folder`.
///A fresh [`WordCounter`] is built for every call.
pub fn count_show<T: Tagger + ?Sized>(
    folder: &Path,
    tagger: &mut T,
    reference: &ReferenceFrequencyTable,
    options: &AnalysisOptions,
) -> Result<ShowCounts> {
    let transcripts = folder.join(TRANSCRIPTS_DIR);
    if !transcripts.is_dir() {
        return Err(Error::MissingTranscripts(folder.to_path_buf()));
    }

    let extractor = if options.katakana_filter {
        ContentWordExtractor::with_katakana_filter(reference)
    } else {
        ContentWordExtractor::new()
    };

    let mut counts = ShowCounts::default();
    for file in collect_subtitle_files(&transcripts)? {
        let sentences = read_srt_file(&file)?;
        debug!("{}: {} sentences", file.display(), sentences.len());
        for sentence in &sentences {
            let extraction = extractor.extract(sentence, tagger);
            counts.counter.record(&extraction, options.denominator);
        }
        counts.file_count += 1;
        counts.sentence_count += sentences.len();
    }
    Ok(counts)
}

///Analyzes one show: counts, ranks, and writes the report (plus the enriched report when a
///lexicon is given) into `folder`.
pub fn analyze_show<T: Tagger + ?Sized>(
    folder: &Path,
    tagger: &mut T,
    reference: &ReferenceFrequencyTable,
    lexicon: Option<&dyn Lexicon>,
    options: &AnalysisOptions,
) -> Result<ShowReport> {
    let counts = count_show(folder, tagger, reference, options)?;
    let exclude = ExcludeSet::load(&folder.join(EXCLUDE_FILE))?;

    let counter = &counts.counter;
    let entries = Ranker::new(options.ranker).rank(
        counter,
        counter.total_words(),
        counts.file_count,
        reference,
        &exclude,
    );
    info!(
        "{}: {} files, {} tokens, {} distinct words, {} ranked",
        folder.display(),
        counts.file_count,
        counter.total_words(),
        counter.distinct_words(),
        entries.len()
    );

    let report_path = write_ranked(folder, &entries, options.export_format)?;
    let enriched_path = match lexicon {
        Some(lexicon) => Some(write_enriched(folder, &entries, lexicon)?),
        None => None,
    };

    let top_words = counter
        .most_common()
        .into_iter()
        .take(options.top_words)
        .map(|(word, count)| (word.to_string(), count))
        .collect();

    Ok(ShowReport {
        folder: folder.to_path_buf(),
        file_count: counts.file_count,
        sentence_count: counts.sentence_count,
        total_words: counter.total_words(),
        distinct_words: counter.distinct_words(),
        entries,
        top_words,
        report_path,
        enriched_path,
    })
}

///Subfolders of `base` that contain a `Transcripts` directory, sorted by name.
pub fn discover_show_folders(base: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::io(base, io::Error::from(e)))?;
        if entry.file_type().is_dir() && entry.path().join(TRANSCRIPTS_DIR).is_dir() {
            folders.push(entry.into_path());
        }
    }
    Ok(folders)
}

/// Progress of a batch run, reported as each show starts and ends.
#[derive(Debug)]
pub enum BatchProgress<'a> {
    Started(&'a Path),
    Finished(&'a ShowReport),
    Failed(&'a Path, &'a Error),
}

///Analyzes every folder in `folders` in turn. A failing show is logged and recorded in
///[`BatchReport::failed`]; the rest still run.
pub fn run_batch<T: Tagger + ?Sized>(
    folders: &[PathBuf],
    tagger: &mut T,
    reference: &ReferenceFrequencyTable,
    lexicon: Option<&dyn Lexicon>,
    options: &AnalysisOptions,
) -> BatchReport {
    run_batch_with_progress(folders, tagger, reference, lexicon, options, |_| {})
}

///Like [`run_batch`], calling `progress` before and after every show.
pub fn run_batch_with_progress<T, F>(
    folders: &[PathBuf],
    tagger: &mut T,
    reference: &ReferenceFrequencyTable,
    lexicon: Option<&dyn Lexicon>,
    options: &AnalysisOptions,
    mut progress: F,
) -> BatchReport
where
    T: Tagger + ?Sized,
    F: FnMut(BatchProgress<'_>),
{
    let mut batch = BatchReport::default();
    for folder in folders {
        progress(BatchProgress::Started(folder));
        match analyze_show(folder, tagger, reference, lexicon, options) {
            Ok(report) => {
                progress(BatchProgress::Finished(&report));
                batch.reports.push(report);
            }
            Err(e) => {
                error!("Error processing {}: {}", folder.display(), e);
                progress(BatchProgress::Failed(folder, &e));
                batch.failed.push((folder.clone(), e.to_string()));
            }
        }
    }
    batch
}
