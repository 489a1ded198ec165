//! Content-word extraction.
//!
//! A sentence is tagged, then reduced to its nouns, verbs and adjectives.
//! Proper nouns are dropped when the tagger labels them as such. Katakana
//! names often escape that label, and sound effects are written in katakana
//! as well. [`KatakanaHeuristic`] is a separate filter stage for those words.
//!
//! Known behavior of the heuristic:
//! - loanwords of three or more characters that the reference list lacks are
//!   dropped along with the names (false positives);
//! - two-character katakana names pass (false negatives);
//! - genuine words ending in ー or ッ (コーヒー, ユーザー) are dropped;
//! - half-width katakana (ﾄﾞｷﾄﾞｷ) is treated like full-width, and the middle
//!   dot ・ does not count as katakana.

use crate::reference::ReferenceFrequencyTable;
use crate::tagger::{ADJECTIVE, NOUN, PROPER_NOUN, Tagger, Token, VERB};

const SOUND_EFFECT_ENDINGS: [char; 4] = ['ー', 'ッ', 'ｰ', 'ｯ'];
const MIDDLE_DOT: char = '・';

/// Content words of one sentence plus the number of tokens the tagger produced for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub words: Vec<String>,
    /// Every token, including particles and punctuation.
    pub token_count: usize,
}

/// Why the katakana heuristic rejected a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KatakanaDrop {
    /// A short unit repeated, as in ドキドキ.
    Reduplicated,
    /// Ends in ー or ッ, as in ギャー.
    SoundEffectEnding,
    /// Three or more characters and not in the reference list; probably a name.
    UnknownName,
}

pub fn is_katakana(c: char) -> bool {
    (('\u{30a0}'..='\u{30ff}').contains(&c) && c != MIDDLE_DOT)
        || ('\u{ff66}'..='\u{ff9f}').contains(&c)
}

pub fn is_katakana_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(is_katakana)
}

///True if the whole word is a unit of 1 to 3 characters repeated at least twice.
/// # Example
/// ```
/// use show_vocab::is_reduplicated;
/// assert!(is_reduplicated("ドキドキ"));
/// assert!(is_reduplicated("ハハハ"));
/// assert!(!is_reduplicated("ギター"));
/// ```
pub fn is_reduplicated(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    (1..=3).any(|unit| {
        chars.len() >= unit * 2
            && chars.len() % unit == 0
            && chars.chunks(unit).all(|chunk| chunk == &chars[..unit])
    })
}

/// Filter for all-katakana words: onomatopoeia and probable names.
#[derive(Debug, Clone, Copy)]
pub struct KatakanaHeuristic<'r> {
    reference: &'r ReferenceFrequencyTable,
}

impl<'r> KatakanaHeuristic<'r> {
    pub fn new(reference: &'r ReferenceFrequencyTable) -> Self {
        KatakanaHeuristic { reference }
    }

    /// Returns why `word` should be dropped, or `None` to keep it.
    /// Words that are not entirely katakana are always kept.
    pub fn check(&self, word: &str) -> Option<KatakanaDrop> {
        if !is_katakana_word(word) {
            return None;
        }
        if is_reduplicated(word) {
            return Some(KatakanaDrop::Reduplicated);
        }
        if word.ends_with(SOUND_EFFECT_ENDINGS) {
            return Some(KatakanaDrop::SoundEffectEnding);
        }
        if word.chars().count() >= 3 && !self.reference.contains(word) {
            return Some(KatakanaDrop::UnknownName);
        }
        None
    }
}

///Picks the counted form of a token: the lemma for verbs, the surface for nouns and adjectives.
///Returns `None` for other parts of speech and for proper nouns.
pub fn select_word(token: &Token) -> Option<String> {
    if token.sub_pos == PROPER_NOUN {
        return None;
    }
    match token.pos.as_str() {
        VERB => Some(
            token
                .dictionary_form
                .as_ref()
                .or(token.normalized_form.as_ref())
                .unwrap_or(&token.surface)
                .clone(),
        ),
        NOUN | ADJECTIVE => Some(token.surface.clone()),
        _ => None,
    }
}

/// Turns sentences into content words.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentWordExtractor<'r> {
    katakana: Option<KatakanaHeuristic<'r>>,
}

impl<'r> ContentWordExtractor<'r> {
    /// Extractor without the katakana heuristic.
    pub fn new() -> Self {
        ContentWordExtractor { katakana: None }
    }

    /// Extractor that also applies [`KatakanaHeuristic`] against `reference`.
    pub fn with_katakana_filter(reference: &'r ReferenceFrequencyTable) -> Self {
        ContentWordExtractor {
            katakana: Some(KatakanaHeuristic::new(reference)),
        }
    }

    pub fn extract<T: Tagger + ?Sized>(&self, sentence: &str, tagger: &mut T) -> Extraction {
        let tokens = tagger.tokenize(sentence);
        let words = tokens
            .iter()
            .filter_map(select_word)
            .filter(|word| !word.is_empty())
            .filter(|word| {
                self.katakana
                    .is_none_or(|heuristic| heuristic.check(word).is_none())
            })
            .collect();
        Extraction {
            words,
            token_count: tokens.len(),
        }
    }
}
