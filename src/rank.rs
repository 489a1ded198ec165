//! Overrepresentation ranking.
//!
//! For a word counted `n` times in a show of `T` tokens whose general-usage
//! frequency is `f`, the overrepresentation ratio is `(n / T) / f`. Ratios
//! above 1 mean the show uses the word more than everyday Japanese does.

use serde::Serialize;

use crate::counter::WordCounter;
use crate::reference::{ExcludeSet, ReferenceFrequencyTable};

/// Which population the long-tail pruning cutoff is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CandidateCutoff {
    /// Keep the `total_words / divisor` most common words.
    #[default]
    Tokens,
    /// Keep the top `distinct_words / divisor` of the observed vocabulary.
    Distinct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerConfig {
    pub cutoff: CandidateCutoff,
    /// 3 keeps the top third.
    pub cutoff_divisor: u64,
    /// A word needs at least `floor_multiplier * file_count` occurrences.
    pub floor_multiplier: u64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        RankerConfig {
            cutoff: CandidateCutoff::Tokens,
            cutoff_divisor: 3,
            floor_multiplier: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrepresentationEntry {
    pub word: String,
    pub ratio: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    config: RankerConfig,
}

impl Ranker {
    pub fn new(config: RankerConfig) -> Self {
        Ranker { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Number of most-common words considered as candidates.
    pub fn candidate_limit(&self, total_words: u64, distinct_words: usize) -> usize {
        let divisor = self.config.cutoff_divisor.max(1);
        match self.config.cutoff {
            CandidateCutoff::Tokens => usize::try_from(total_words / divisor).unwrap_or(usize::MAX),
            CandidateCutoff::Distinct => distinct_words / divisor as usize,
        }
    }

    /// Minimum raw count for a word to be scored. Saturates, so an oversized
    /// multiplier leaves nothing eligible.
    pub fn significance_floor(&self, file_count: usize) -> u64 {
        let files = u64::try_from(file_count).unwrap_or(u64::MAX);
        self.config.floor_multiplier.saturating_mul(files)
    }

    ///Scores every eligible word and sorts by ratio, highest first. Equal ratios keep the
    ///candidate order: higher raw count first, then the word itself.
    /// # Example
    /// ```
    /// use show_vocab::{ExcludeSet, Ranker, ReferenceFrequencyTable, WordCounter};
    /// let mut counter = WordCounter::new();
    /// counter.accumulate(std::iter::repeat_n("楽しい", 10));
    /// counter.accumulate(std::iter::repeat_n("走る", 8));
    /// let reference: ReferenceFrequencyTable = [
    ///     ("楽しい".to_string(), 0.002),
    ///     ("走る".to_string(), 0.01),
    /// ].into_iter().collect();
    /// let ranked = Ranker::default().rank(&counter, 1000, 3, &reference, &ExcludeSet::default());
    /// assert_eq!(ranked[0].word, "楽しい");
    /// assert_eq!(format!("{:.2}", ranked[0].ratio), "5.00");
    /// assert_eq!(format!("{:.2}", ranked[1].ratio), "0.80");
    /// ```
    pub fn rank(
        &self,
        counter: &WordCounter,
        total_words: u64,
        file_count: usize,
        reference: &ReferenceFrequencyTable,
        exclude: &ExcludeSet,
    ) -> Vec<OverrepresentationEntry> {
        if total_words == 0 {
            return Vec::new();
        }
        let limit = self.candidate_limit(total_words, counter.distinct_words());
        let floor = self.significance_floor(file_count);

        let mut entries: Vec<OverrepresentationEntry> = counter
            .most_common()
            .into_iter()
            .take(limit)
            .filter(|(_, count)| *count >= floor)
            .filter(|(word, _)| !exclude.contains(word))
            .filter_map(|(word, count)| {
                let baseline = reference.frequency(word);
                if baseline <= 0.0 {
                    return None;
                }
                let relative = count as f64 / total_words as f64;
                Some(OverrepresentationEntry {
                    word: word.to_string(),
                    ratio: relative / baseline,
                    count,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
        entries
    }
}
