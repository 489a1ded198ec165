//! Integration tests for `show_vocab`.
//
// This suite verifies:
// - The per-show pipeline (parse, extract, count, rank, write) with a stub tagger
// - Exclusion lists, the significance floor, the katakana filter and denominator policies
// - Batch runs: fresh state per show, failures do not stop the batch
// - The enriched report with a stub lexicon
// - CLI behavior that does not need a real tagger dictionary
//
// Notes:
// - CLI tests run the binary with a per-process working directory (no global CWD change).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use predicates::prelude::*;

use show_vocab::{
    AnalysisOptions, BatchProgress, DenominatorPolicy, ENRICHED_REPORT_FILE, Error, ExcludeSet,
    ExportFormat, LexicalEntry, Lexicon, LookupResult, NO_ENTRY_MESSAGE, Ranker, RankerConfig,
    ReferenceFrequencyTable, Sense, Tagger, Token, WordCounter, analyze_show, count_show,
    discover_show_folders, run_batch, run_batch_with_progress,
};

// --------------------- helpers ---------------------

/// Tags whitespace-separated words from a fixed vocabulary; anything else is a particle.
struct StubTagger {
    vocabulary: HashMap<String, Token>,
}

impl StubTagger {
    fn new() -> Self {
        let words = [
            Token::new("バンド", "名詞", "一般"),
            Token::new("練習", "名詞", "サ変接続"),
            Token::new("後藤", "名詞", "固有名詞"),
            Token::new("ドキドキ", "名詞", "一般"),
            Token::new("楽しい", "形容詞", "自立").with_dictionary_form("楽しい"),
            Token::new("弾い", "動詞", "自立").with_dictionary_form("弾く"),
            Token::new("歌う", "動詞", "自立").with_dictionary_form("歌う"),
            Token::new("歌", "名詞", "一般"),
        ];
        let vocabulary = words
            .into_iter()
            .map(|t| (t.surface.clone(), t))
            .collect();
        StubTagger { vocabulary }
    }
}

impl Tagger for StubTagger {
    fn tokenize(&mut self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .map(|w| {
                self.vocabulary
                    .get(w)
                    .cloned()
                    .unwrap_or_else(|| Token::new(w, "助詞", "格助詞"))
            })
            .collect()
    }
}

struct StubLexicon;

impl Lexicon for StubLexicon {
    fn lookup(&self, word: &str) -> LookupResult {
        match word {
            "バンド" => LookupResult {
                entries: vec![LexicalEntry {
                    kana: vec!["バンド".to_string()],
                    kanji: Vec::new(),
                    senses: vec![Sense {
                        glosses: vec!["band".to_string()],
                        parts_of_speech: vec!["n".to_string()],
                    }],
                }],
                characters: Vec::new(),
            },
            _ => LookupResult::default(),
        }
    }
}

const EPISODE: &str = "1
00:00:01,000 --> 00:00:03,000
バンド を 弾い た

2
00:00:04,000 --> 00:00:06,000
（笑）後藤 は バンド を 練習

3
00:00:07,000 --> 00:00:08,000
ドキドキ
楽しい
";

const REFERENCE: &str = "word\tcount\tfrequency
バンド\t100\t0.001
弾く\t200\t0.002
練習\t1000\t0.01
楽しい\t0\tnot-a-number
";

/// Create a show folder with two episodes and a stray non-subtitle file.
fn make_show(root: &assert_fs::TempDir, name: &str, episode: &str) -> PathBuf {
    let transcripts = root.child(name).child("Transcripts");
    transcripts.create_dir_all().unwrap();
    transcripts.child("ep01.srt").write_str(episode).unwrap();
    transcripts.child("ep02.SRT").write_str(episode).unwrap();
    transcripts.child("notes.txt").write_str("バンド バンド バンド").unwrap();
    root.child(name).path().to_path_buf()
}

fn reference() -> ReferenceFrequencyTable {
    ReferenceFrequencyTable::from_reader(REFERENCE.as_bytes()).unwrap()
}

fn opts_with_floor(floor_multiplier: u64) -> AnalysisOptions {
    AnalysisOptions {
        ranker: RankerConfig {
            floor_multiplier,
            ..RankerConfig::default()
        },
        ..AnalysisOptions::default()
    }
}

fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

// --------------------- library tests ---------------------

#[test]
fn lib_count_show_totals() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);

    let counts = count_show(&show, &mut StubTagger::new(), &reference(), &AnalysisOptions::default())
        .unwrap();

    assert_eq!(counts.file_count, 2);
    assert_eq!(counts.sentence_count, 6);
    // 4 + 5 + 2 tokens per episode, particles included
    assert_eq!(counts.counter.total_words(), 22);
    assert_eq!(counts.counter.count("バンド"), 4);
    assert_eq!(counts.counter.count("弾く"), 2);
    assert_eq!(counts.counter.count("楽しい"), 2);
    assert_eq!(counts.counter.count("後藤"), 0);
    assert_eq!(counts.counter.count("ドキドキ"), 0);
    assert_eq!(counts.counter.count("笑"), 0);
}

#[test]
fn lib_default_report() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);

    let report = analyze_show(
        &show,
        &mut StubTagger::new(),
        &reference(),
        None,
        &AnalysisOptions::default(),
    )
    .unwrap();

    // floor = 2 * 2 files: only バンド (4 occurrences) qualifies
    assert_eq!(report.report_path, show.join("overrepresented_words.txt"));
    assert_eq!(
        read_to_string(&report.report_path),
        "word: overrepresentation\nバンド: 181.82\n"
    );
    assert!(report.enriched_path.is_none());
    assert!(!show.join(ENRICHED_REPORT_FILE).exists());
}

#[test]
fn lib_exclusions_and_zero_reference() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);
    fs::write(show.join("excluded_words.txt"), "# too generic\n練習\n\n").unwrap();

    let report = analyze_show(
        &show,
        &mut StubTagger::new(),
        &reference(),
        None,
        &opts_with_floor(1),
    )
    .unwrap();

    // 練習 is excluded, 楽しい has a malformed (0.0) reference frequency
    let words: Vec<&str> = report.entries.iter().map(|e| e.word.as_str()).collect();
    assert_eq!(words, vec!["バンド", "弾く"]);
    assert_eq!(
        read_to_string(&report.report_path),
        "word: overrepresentation\nバンド: 181.82\n弾く: 45.45\n"
    );
}

#[test]
fn lib_katakana_filter_can_be_disabled() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);
    let options = AnalysisOptions {
        katakana_filter: false,
        ..AnalysisOptions::default()
    };

    let counts = count_show(&show, &mut StubTagger::new(), &reference(), &options).unwrap();
    assert_eq!(counts.counter.count("ドキドキ"), 2);
    assert_eq!(counts.counter.total_words(), 22);
}

#[test]
fn lib_content_word_denominator() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);
    let options = AnalysisOptions {
        denominator: DenominatorPolicy::ContentWords,
        ..AnalysisOptions::default()
    };

    let counts = count_show(&show, &mut StubTagger::new(), &reference(), &options).unwrap();
    assert_eq!(counts.counter.total_words(), 10);
}

#[test]
fn lib_rerun_is_byte_identical() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);
    let options = AnalysisOptions {
        export_format: ExportFormat::Json,
        ..opts_with_floor(1)
    };

    let first = analyze_show(&show, &mut StubTagger::new(), &reference(), None, &options).unwrap();
    let first_bytes = fs::read(&first.report_path).unwrap();
    let second = analyze_show(&show, &mut StubTagger::new(), &reference(), None, &options).unwrap();
    assert_eq!(first.report_path, show.join("overrepresented_words.json"));
    assert_eq!(first_bytes, fs::read(&second.report_path).unwrap());
}

#[test]
fn lib_enriched_report() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);

    let report = analyze_show(
        &show,
        &mut StubTagger::new(),
        &reference(),
        Some(&StubLexicon),
        &opts_with_floor(1),
    )
    .unwrap();

    let enriched = read_to_string(report.enriched_path.unwrap());
    let expected = format!(
        "1. バンド (181.82x standard frequency)\nバンド\n  1. band (n)\n\n\
         2. 弾く (45.45x standard frequency)\n{NO_ENTRY_MESSAGE}\n\n\
         3. 練習 (9.09x standard frequency)\n{NO_ENTRY_MESSAGE}\n"
    );
    assert_eq!(enriched, expected);
}

#[test]
fn lib_top_words() {
    let td = assert_fs::TempDir::new().unwrap();
    let show = make_show(&td, "Bocchi", EPISODE);
    let options = AnalysisOptions {
        top_words: 2,
        ..AnalysisOptions::default()
    };

    let report = analyze_show(&show, &mut StubTagger::new(), &reference(), None, &options).unwrap();
    assert_eq!(
        report.top_words,
        vec![("バンド".to_string(), 4), ("弾く".to_string(), 2)]
    );
}

#[test]
fn lib_missing_transcripts_is_an_error() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("Empty").create_dir_all().unwrap();

    let err = analyze_show(
        td.child("Empty").path(),
        &mut StubTagger::new(),
        &reference(),
        None,
        &AnalysisOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingTranscripts(_)));
}

#[test]
fn lib_batch_isolates_shows_and_continues_after_failure() {
    let td = assert_fs::TempDir::new().unwrap();
    let first = make_show(&td, "A_Bocchi", EPISODE);
    let second = make_show(
        &td,
        "B_Karaoke",
        "1\n00:00:01,000 --> 00:00:02,000\n歌 を 歌う\n\n2\n00:00:03,000 --> 00:00:04,000\n歌 が 楽しい\n",
    );
    td.child("C_NoTranscripts").create_dir_all().unwrap();
    let broken = td.child("C_NoTranscripts").path().to_path_buf();

    let reference: ReferenceFrequencyTable = [
        ("バンド".to_string(), 0.001),
        ("歌".to_string(), 0.001),
        ("歌う".to_string(), 0.001),
    ]
    .into_iter()
    .collect();

    // discovery only picks folders that contain Transcripts
    let discovered = discover_show_folders(td.path()).unwrap();
    assert_eq!(discovered, vec![first.clone(), second.clone()]);

    let options = opts_with_floor(1);
    let folders = vec![first.clone(), broken.clone(), second.clone()];
    let batch = run_batch(&folders, &mut StubTagger::new(), &reference, None, &options);

    assert_eq!(batch.reports.len(), 2);
    assert_eq!(batch.failed.len(), 1);
    assert_eq!(batch.failed[0].0, broken);

    // the second show sees none of the first show's words
    let alone = analyze_show(&second, &mut StubTagger::new(), &reference, None, &options).unwrap();
    let in_batch = &batch.reports[1];
    assert_eq!(in_batch.total_words, 12);
    assert_eq!(in_batch.total_words, alone.total_words);
    assert_eq!(in_batch.entries, alone.entries);
    assert!(in_batch.entries.iter().all(|e| e.word != "バンド"));
}

#[test]
fn lib_batch_reports_progress_per_show() {
    let td = assert_fs::TempDir::new().unwrap();
    let first = make_show(&td, "A_Bocchi", EPISODE);
    td.child("B_NoTranscripts").create_dir_all().unwrap();
    let broken = td.child("B_NoTranscripts").path().to_path_buf();

    let mut events = Vec::new();
    let batch = run_batch_with_progress(
        &[first.clone(), broken.clone()],
        &mut StubTagger::new(),
        &reference(),
        None,
        &AnalysisOptions::default(),
        |event| {
            events.push(match event {
                BatchProgress::Started(folder) => format!("start {}", folder.display()),
                BatchProgress::Finished(report) => {
                    assert!(report.report_path.exists());
                    format!("done {}", report.folder.display())
                }
                BatchProgress::Failed(folder, _) => format!("fail {}", folder.display()),
            })
        },
    );

    assert_eq!(
        events,
        vec![
            format!("start {}", first.display()),
            format!("done {}", first.display()),
            format!("start {}", broken.display()),
            format!("fail {}", broken.display()),
        ]
    );
    assert_eq!(batch.reports.len(), 1);
    assert_eq!(batch.failed.len(), 1);
}

#[test]
fn lib_ranking_example() {
    let mut counter = WordCounter::new();
    counter.accumulate(std::iter::repeat_n("楽しい", 10));
    counter.accumulate(std::iter::repeat_n("走る", 8));
    let reference: ReferenceFrequencyTable = [
        ("楽しい".to_string(), 0.002),
        ("走る".to_string(), 0.01),
    ]
    .into_iter()
    .collect();

    let ranked = Ranker::default().rank(&counter, 1000, 3, &reference, &ExcludeSet::default());
    let text = show_vocab::render_ranked_text(&ranked);
    assert_eq!(text, "word: overrepresentation\n楽しい: 5.00\n走る: 0.80\n");
}

// --------------------- CLI tests ---------------------

fn cli(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("show_vocab").unwrap();
    cmd.current_dir(dir).env("RUST_LOG", "error");
    cmd.args(args).assert()
}

#[test]
fn cli_nonexistent_folder_fails() {
    let td = tempfile::tempdir().unwrap();
    let bad = td.path().join("does_not_exist_here");
    cli(td.path(), &[bad.to_string_lossy().as_ref()]).failure();
}

#[test]
fn cli_all_without_shows_succeeds() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("NotAShow").create_dir_all().unwrap();

    cli(td.path(), &["all"])
        .success()
        .stdout(predicate::str::contains("Processing all 0 folders"))
        .stdout(predicate::str::contains("Finished all folders."));
}

#[test]
fn cli_missing_frequency_list_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    make_show(&td, "Bocchi", EPISODE);

    cli(td.path(), &["Bocchi", "--frequency-list", "missing.tsv"])
        .failure()
        .stderr(predicate::str::contains("missing.tsv"));
}

#[test]
fn cli_requires_tagger_dictionary() {
    let td = assert_fs::TempDir::new().unwrap();
    make_show(&td, "Bocchi", EPISODE);
    td.child("ja_frequency_list_clean.tsv").write_str(REFERENCE).unwrap();

    cli(td.path(), &["Bocchi"])
        .failure()
        .stderr(predicate::str::contains("--dictionary"));
    assert!(!td.child("Bocchi").child("overrepresented_words.txt").exists());
}

#[test]
fn cli_help_lists_options() {
    let td = tempfile::tempdir().unwrap();
    cli(td.path(), &["--help"])
        .success()
        .stdout(predicate::str::contains("--frequency-list"))
        .stdout(predicate::str::contains("--export-format"));
}
