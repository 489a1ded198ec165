#![forbid(unsafe_code)]
//! # show_vocab CLI
//!
//! Runs the overrepresentation analysis on one show folder, or on every show
//! folder under a base directory.
//!
//! ## Example
//! ```bash
//! show_vocab BocchiTheRockS1 --dictionary ipadic-mecab-2_7_0/system.dic.zst
//! show_vocab all --dictionary system.dic.zst --jmdict jmdict-eng.json --kanjidic kanjidic2-en.json
//! ```
//!
//! See `--help` for all available options.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::error;
use show_vocab::{
    AnalysisOptions, BatchProgress, CandidateCutoff, DenominatorPolicy, ExportFormat,
    FeatureLayout, JmdictLexicon, Lexicon, RankerConfig, ReferenceFrequencyTable, ShowReport,
    VibratoTagger, analyze_show, discover_show_folders, load_system_dictionary,
    run_batch_with_progress,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Show folder containing a Transcripts directory, or `all` for every show folder
    folder: String,

    /// Tab-separated reference frequency list (last column = frequency)
    #[arg(long, default_value = "ja_frequency_list_clean.tsv")]
    frequency_list: PathBuf,

    /// Vibrato system dictionary (zstd-compressed)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Feature layout of the system dictionary
    #[arg(long, value_enum, default_value_t = FeatureLayout::Ipadic)]
    dictionary_format: FeatureLayout,

    /// jmdict-simplified JSON; enables the enriched report
    #[arg(long)]
    jmdict: Option<PathBuf>,

    /// kanjidic2 JSON (jmdict-simplified) for per-kanji information
    #[arg(long, requires = "jmdict")]
    kanjidic: Option<PathBuf>,

    /// Directory searched for show folders in `all` mode
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Output format of the ranked report (txt, csv, json)
    #[arg(long, value_enum, default_value_t = ExportFormat::Txt)]
    export_format: ExportFormat,

    /// Tokens counted in the relative-frequency denominator
    #[arg(long, value_enum, default_value_t = DenominatorPolicy::AllTokens)]
    denominator: DenominatorPolicy,

    /// Population the candidate cutoff is taken from
    #[arg(long, value_enum, default_value_t = CandidateCutoff::Tokens)]
    cutoff_basis: CandidateCutoff,

    /// Keep the top 1/N candidates (3 = top third)
    #[arg(long, default_value_t = 3)]
    cutoff_divisor: u64,

    /// Minimum count per subtitle file for a word to be ranked
    #[arg(long, default_value_t = 2)]
    floor_multiplier: u64,

    /// Keep katakana onomatopoeia and probable names
    #[arg(long, default_value_t = false)]
    no_katakana_filter: bool,

    /// Print the N most common content words of each show
    #[arg(long, default_value_t = 0)]
    top: usize,
}

impl Cli {
    fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            ranker: RankerConfig {
                cutoff: self.cutoff_basis,
                cutoff_divisor: self.cutoff_divisor,
                floor_multiplier: self.floor_multiplier,
            },
            denominator: self.denominator,
            katakana_filter: !self.no_katakana_filter,
            export_format: self.export_format,
            top_words: self.top,
        }
    }
}

fn print_top_words(report: &ShowReport) {
    if report.top_words.is_empty() {
        return;
    }
    println!("Top {} words:", report.top_words.len());
    for (word, count) in &report.top_words {
        println!("{word}: {count}");
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    error!("Error: {}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let batch_mode = cli.folder.eq_ignore_ascii_case("all");

    let folders = if batch_mode {
        match discover_show_folders(&cli.base_dir) {
            Ok(folders) => folders,
            Err(e) => fail(e),
        }
    } else {
        vec![PathBuf::from(&cli.folder)]
    };

    if batch_mode {
        println!(
            "Processing all {} folders under {}...\n",
            folders.len(),
            cli.base_dir.display()
        );
        if folders.is_empty() {
            println!("\nFinished all folders.");
            return;
        }
    } else if !Path::new(&cli.folder).is_dir() {
        fail(format!("{} is not a directory", cli.folder));
    }

    let reference = ReferenceFrequencyTable::load(&cli.frequency_list).unwrap_or_else(|e| fail(e));
    let Some(dictionary) = cli.dictionary.as_deref() else {
        fail("--dictionary is required to tokenize subtitles");
    };
    let tokenizer = load_system_dictionary(dictionary).unwrap_or_else(|e| fail(e));
    let mut tagger = VibratoTagger::new(&tokenizer, cli.dictionary_format);

    let lexicon = match cli.jmdict.as_deref() {
        Some(jmdict) => Some(
            JmdictLexicon::load(jmdict, cli.kanjidic.as_deref()).unwrap_or_else(|e| fail(e)),
        ),
        None => None,
    };
    let lexicon = lexicon.as_ref().map(|l| l as &dyn Lexicon);
    let options = cli.options();

    if batch_mode {
        let batch = run_batch_with_progress(
            &folders,
            &mut tagger,
            &reference,
            lexicon,
            &options,
            |event| match event {
                BatchProgress::Started(folder) => {
                    let name = folder.file_name().unwrap_or(folder.as_os_str());
                    println!("Processing {}", name.to_string_lossy());
                }
                BatchProgress::Finished(report) => {
                    println!(
                        "{} words ranked -> {}",
                        report.entries.len(),
                        report.report_path.display()
                    );
                    print_top_words(report);
                }
                BatchProgress::Failed(..) => {}
            },
        );
        if !batch.failed.is_empty() {
            println!("{} of {} folders failed", batch.failed.len(), folders.len());
        }
        println!("\nFinished all folders.");
    } else {
        match analyze_show(&folders[0], &mut tagger, &reference, lexicon, &options) {
            Ok(report) => {
                println!(
                    "{} words ranked -> {}",
                    report.entries.len(),
                    report.report_path.display()
                );
                if let Some(path) = &report.enriched_path {
                    println!("Dictionary report -> {}", path.display());
                }
                print_top_words(&report);
            }
            Err(e) => fail(e),
        }
    }
}
