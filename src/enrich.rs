//! Dictionary enrichment of ranked words.
//!
//! Lookups go through the [`Lexicon`] trait. [`JmdictLexicon`] reads the
//! JSON exports of JMdict and KANJIDIC2 published by the jmdict-simplified
//! project. Enrichment is presentational only: a word nothing is known about
//! yields an empty string.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Shown in the enriched report when a word has no dictionary data.
pub const NO_ENTRY_MESSAGE: &str = "Sorry, no dictionary information was found for this word.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sense {
    pub glosses: Vec<String>,
    pub parts_of_speech: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalEntry {
    pub kana: Vec<String>,
    pub kanji: Vec<String>,
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanjiInfo {
    pub literal: char,
    pub meanings: Vec<String>,
    pub grade: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    pub entries: Vec<LexicalEntry>,
    pub characters: Vec<KanjiInfo>,
}

impl LookupResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.characters.is_empty()
    }
}

/// A Japanese dictionary.
pub trait Lexicon {
    fn lookup(&self, word: &str) -> LookupResult;
}

///Looks `word` up and formats what was found, or returns an empty string.
pub fn enrich<L: Lexicon + ?Sized>(lexicon: &L, word: &str) -> String {
    format_lookup(&lexicon.lookup(word))
}

///Formats a lookup as display text: one block per entry (readings header, numbered senses),
///then a `Kanji:` block with meanings and school grade of each character.
/// # Example
/// ```
/// use show_vocab::{KanjiInfo, LexicalEntry, LookupResult, Sense, format_lookup};
/// let result = LookupResult {
///     entries: vec![LexicalEntry {
///         kana: vec!["たべる".into()],
///         kanji: vec!["食べる".into()],
///         senses: vec![Sense { glosses: vec!["to eat".into()], parts_of_speech: vec!["v1".into()] }],
///     }],
///     characters: vec![KanjiInfo { literal: '食', meanings: vec!["eat".into(), "food".into()], grade: Some(2) }],
/// };
/// assert_eq!(
///     format_lookup(&result),
///     "たべる 【食べる】\n  1. to eat (v1)\nKanji:\n  食: eat, food (grade 2)"
/// );
/// ```
pub fn format_lookup(result: &LookupResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    for entry in &result.entries {
        let mut header = entry.kana.join("、");
        if !entry.kanji.is_empty() {
            if !header.is_empty() {
                header.push(' ');
            }
            header.push_str(&format!("【{}】", entry.kanji.join("、")));
        }
        lines.push(header);

        for (i, sense) in entry.senses.iter().enumerate() {
            let mut line = format!("  {}. {}", i + 1, sense.glosses.join("; "));
            if !sense.parts_of_speech.is_empty() {
                line.push_str(&format!(" ({})", sense.parts_of_speech.join(", ")));
            }
            lines.push(line);
        }
    }

    if !result.characters.is_empty() {
        lines.push("Kanji:".to_string());
        for c in &result.characters {
            let grade = c
                .grade
                .map(|g| g.to_string())
                .unwrap_or_else(|| "?".to_string());
            lines.push(format!(
                "  {}: {} (grade {})",
                c.literal,
                c.meanings.join(", "),
                grade
            ));
        }
    }

    lines.join("\n")
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c) || ('\u{3400}'..='\u{4dbf}').contains(&c)
}

// ---- jmdict-simplified JSON ----

#[derive(Deserialize)]
struct JmdictFile {
    #[serde(default)]
    words: Vec<JmdictWord>,
}

#[derive(Deserialize)]
struct JmdictWord {
    #[serde(default)]
    kanji: Vec<JmdictText>,
    #[serde(default)]
    kana: Vec<JmdictText>,
    #[serde(default)]
    sense: Vec<JmdictSense>,
}

#[derive(Deserialize)]
struct JmdictText {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JmdictSense {
    #[serde(default)]
    part_of_speech: Vec<String>,
    #[serde(default)]
    gloss: Vec<JmdictGloss>,
}

#[derive(Deserialize)]
struct JmdictGloss {
    #[serde(default)]
    lang: Option<String>,
    text: String,
}

#[derive(Deserialize)]
struct KanjidicFile {
    #[serde(default)]
    characters: Vec<KanjidicCharacter>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KanjidicCharacter {
    literal: String,
    #[serde(default)]
    misc: Option<KanjidicMisc>,
    #[serde(default)]
    reading_meaning: Option<KanjidicReadingMeaning>,
}

#[derive(Deserialize)]
struct KanjidicMisc {
    #[serde(default)]
    grade: Option<u8>,
}

#[derive(Deserialize)]
struct KanjidicReadingMeaning {
    #[serde(default)]
    groups: Vec<KanjidicGroup>,
}

#[derive(Deserialize)]
struct KanjidicGroup {
    #[serde(default)]
    meanings: Vec<KanjidicMeaning>,
}

#[derive(Deserialize)]
struct KanjidicMeaning {
    #[serde(default)]
    lang: Option<String>,
    value: String,
}

fn is_english(lang: &Option<String>) -> bool {
    matches!(lang.as_deref(), None | Some("eng") | Some("en"))
}

/// In-memory JMdict (and optionally KANJIDIC2) indexed by every spelling.
#[derive(Debug, Clone, Default)]
pub struct JmdictLexicon {
    entries: Vec<LexicalEntry>,
    by_spelling: HashMap<String, Vec<usize>>,
    characters: HashMap<char, KanjiInfo>,
}

impl JmdictLexicon {
    pub fn load(jmdict: &Path, kanjidic: Option<&Path>) -> Result<Self> {
        let words = read_json::<JmdictFile>(jmdict)?;
        let characters = match kanjidic {
            Some(path) => Some(read_json::<KanjidicFile>(path)?),
            None => None,
        };
        let lexicon = Self::build(words, characters);
        info!(
            "loaded {} dictionary entries and {} kanji",
            lexicon.entries.len(),
            lexicon.characters.len()
        );
        Ok(lexicon)
    }

    /// Builds a lexicon from JSON text (the same formats [`JmdictLexicon::load`] reads).
    pub fn from_json(
        jmdict: &str,
        kanjidic: Option<&str>,
    ) -> std::result::Result<Self, serde_json::Error> {
        let words: JmdictFile = serde_json::from_str(jmdict)?;
        let characters = kanjidic
            .map(|k| serde_json::from_str::<KanjidicFile>(k))
            .transpose()?;
        Ok(Self::build(words, characters))
    }

    fn build(words: JmdictFile, kanjidic: Option<KanjidicFile>) -> Self {
        let mut entries = Vec::with_capacity(words.words.len());
        let mut by_spelling: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, word) in words.words.into_iter().enumerate() {
            let entry = LexicalEntry {
                kana: word.kana.into_iter().map(|k| k.text).collect(),
                kanji: word.kanji.into_iter().map(|k| k.text).collect(),
                senses: word
                    .sense
                    .into_iter()
                    .map(|s| Sense {
                        glosses: s
                            .gloss
                            .into_iter()
                            .filter(|g| is_english(&g.lang))
                            .map(|g| g.text)
                            .collect(),
                        parts_of_speech: s.part_of_speech,
                    })
                    .filter(|s| !s.glosses.is_empty())
                    .collect(),
            };
            let mut seen = HashSet::new();
            for spelling in entry.kanji.iter().chain(entry.kana.iter()) {
                if seen.insert(spelling.clone()) {
                    by_spelling.entry(spelling.clone()).or_default().push(idx);
                }
            }
            entries.push(entry);
        }

        let mut characters = HashMap::new();
        for c in kanjidic.map(|k| k.characters).unwrap_or_default() {
            let mut chars = c.literal.chars();
            let (Some(literal), None) = (chars.next(), chars.next()) else {
                continue;
            };
            let meanings = c
                .reading_meaning
                .map(|rm| {
                    rm.groups
                        .into_iter()
                        .flat_map(|g| g.meanings)
                        .filter(|m| is_english(&m.lang))
                        .map(|m| m.value)
                        .collect()
                })
                .unwrap_or_default();
            let grade = c.misc.and_then(|m| m.grade);
            characters.insert(
                literal,
                KanjiInfo {
                    literal,
                    meanings,
                    grade,
                },
            );
        }

        JmdictLexicon {
            entries,
            by_spelling,
            characters,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for JmdictLexicon {
    fn lookup(&self, word: &str) -> LookupResult {
        let entries = self
            .by_spelling
            .get(word)
            .map(|ids| ids.iter().map(|&i| self.entries[i].clone()).collect())
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let characters = word
            .chars()
            .filter(|c| is_kanji(*c) && seen.insert(*c))
            .filter_map(|c| self.characters.get(&c).cloned())
            .collect();

        LookupResult {
            entries,
            characters,
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut content = String::new();
    BufReader::new(file)
        .read_to_string(&mut content)
        .map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| Error::Lexicon {
        path: path.to_path_buf(),
        source,
    })
}
