//! Morphological tagging.
//!
//! The pipeline only needs a tokenizer that reports surface, base forms and
//! part of speech for each morpheme, so it talks to one through the [`Tagger`]
//! trait. [`VibratoTagger`] adapts the Vibrato tokenizer with an IPADIC or
//! UniDic system dictionary; tests plug in their own fixed-output taggers.

use std::fs::File;
use std::path::Path;

use log::info;
use vibrato::{Dictionary, Tokenizer};

use crate::error::{Error, Result};

pub const NOUN: &str = "名詞";
pub const VERB: &str = "動詞";
pub const ADJECTIVE: &str = "形容詞";
pub const PROPER_NOUN: &str = "固有名詞";

/// One morpheme as reported by a tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    /// Dictionary (lemma) form, e.g. 走る for 走った.
    pub dictionary_form: Option<String>,
    /// Normalized spelling, e.g. 為る for する where the dictionary has one.
    pub normalized_form: Option<String>,
    /// Major part of speech (名詞, 動詞, ...).
    pub pos: String,
    /// First part-of-speech subcategory (固有名詞, 一般, ...).
    pub sub_pos: String,
}

impl Token {
    pub fn new(surface: &str, pos: &str, sub_pos: &str) -> Self {
        Token {
            surface: surface.to_string(),
            dictionary_form: None,
            normalized_form: None,
            pos: pos.to_string(),
            sub_pos: sub_pos.to_string(),
        }
    }

    pub fn with_dictionary_form(mut self, form: &str) -> Self {
        self.dictionary_form = Some(form.to_string());
        self
    }

    pub fn with_normalized_form(mut self, form: &str) -> Self {
        self.normalized_form = Some(form.to_string());
        self
    }
}

/// A morphological analyzer.
///
/// Implementations should prefer long-unit segmentation where the underlying
/// analyzer offers a choice, so compounds are counted as one word.
pub trait Tagger {
    fn tokenize(&mut self, text: &str) -> Vec<Token>;
}

/// Column layout of the feature string in a MeCab-style system dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FeatureLayout {
    /// `pos,pos1,pos2,pos3,cType,cForm,baseForm,reading,pron`
    ///
    /// IPADIC keeps many compounds as single entries, so it is the longer-unit choice.
    #[default]
    Ipadic,
    /// `pos1,pos2,pos3,pos4,cType,cForm,lForm,lemma,orth,pron,orthBase,...`
    ///
    /// UniDic segments into short units; compounds are split.
    Unidic,
}

impl FeatureLayout {
    /// Builds a [`Token`] from a surface and its comma-separated feature string.
    pub fn token(self, surface: &str, feature: &str) -> Token {
        let fields: Vec<&str> = feature.split(',').collect();
        let field = |i: usize| -> Option<String> {
            fields
                .get(i)
                .map(|f| f.trim())
                .filter(|f| !f.is_empty() && *f != "*")
                .map(str::to_string)
        };

        let (dictionary_form, normalized_form) = match self {
            FeatureLayout::Ipadic => (field(6), None),
            FeatureLayout::Unidic => (field(10), field(7)),
        };

        Token {
            surface: surface.to_string(),
            dictionary_form,
            normalized_form,
            pos: field(0).unwrap_or_default(),
            sub_pos: field(1).unwrap_or_default(),
        }
    }
}

/// Reads a zstd-compressed Vibrato system dictionary and builds a tokenizer from it.
pub fn load_system_dictionary(path: &Path) -> Result<Tokenizer> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = zstd::Decoder::new(file).map_err(|e| Error::io(path, e))?;
    let dict = Dictionary::read(reader).map_err(|e| Error::Dictionary(e.to_string()))?;
    info!("loaded system dictionary {}", path.display());
    Ok(Tokenizer::new(dict))
}

/// [`Tagger`] backed by a Vibrato worker. The tokenizer must outlive the tagger.
///
/// Vibrato has no split modes: the unit length is whatever the system
/// dictionary encodes. Use an IPADIC dictionary ([`FeatureLayout::Ipadic`])
/// for the longest units available.
pub struct VibratoTagger<'t> {
    worker: vibrato::tokenizer::worker::Worker<'t>,
    layout: FeatureLayout,
}

impl<'t> VibratoTagger<'t> {
    pub fn new(tokenizer: &'t Tokenizer, layout: FeatureLayout) -> Self {
        VibratoTagger {
            worker: tokenizer.new_worker(),
            layout,
        }
    }
}

impl Tagger for VibratoTagger<'_> {
    fn tokenize(&mut self, text: &str) -> Vec<Token> {
        self.worker.reset_sentence(text);
        self.worker.tokenize();
        (0..self.worker.num_tokens())
            .map(|i| {
                let t = self.worker.token(i);
                self.layout.token(t.surface(), t.feature())
            })
            .collect()
    }
}
