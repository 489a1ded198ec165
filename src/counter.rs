use std::collections::HashMap;

use crate::extract::Extraction;

/// What the running total (the relative-frequency denominator) counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DenominatorPolicy {
    /// Every token the tagger produced, particles and punctuation included.
    #[default]
    AllTokens,
    /// Only the content words that were counted.
    ContentWords,
}

/// Content-word counts and the running token total for one show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounter {
    counts: HashMap<String, u64>,
    total_words: u64,
}

impl WordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    ///Counts each word once per occurrence.
    /// # Example
    /// ```
    /// use show_vocab::WordCounter;
    /// let mut counter = WordCounter::new();
    /// counter.accumulate(["走る", "走る", "楽しい"]);
    /// assert_eq!(counter.count("走る"), 2);
    /// assert_eq!(counter.count("楽しい"), 1);
    /// assert_eq!(counter.distinct_words(), 2);
    /// ```
    pub fn accumulate<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref();
            match self.counts.get_mut(word) {
                Some(count) => *count += 1,
                None => {
                    self.counts.insert(word.to_string(), 1);
                }
            }
        }
    }

    /// Adds `tokens` to the running total.
    pub fn add_tokens(&mut self, tokens: u64) {
        self.total_words += tokens;
    }

    /// Records one sentence's extraction, growing the total according to `policy`.
    pub fn record(&mut self, extraction: &Extraction, policy: DenominatorPolicy) {
        self.accumulate(&extraction.words);
        let added = match policy {
            DenominatorPolicy::AllTokens => extraction.token_count,
            DenominatorPolicy::ContentWords => extraction.words.len(),
        };
        self.add_tokens(added as u64);
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    pub fn distinct_words(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    ///Words sorted by count, highest first. Equal counts are ordered by the word itself so
    ///the result does not depend on hash order.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// Empties the counter and zeroes the total.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.total_words = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extraction(words: &[&str], token_count: usize) -> Extraction {
        Extraction {
            words: words.iter().map(|w| w.to_string()).collect(),
            token_count,
        }
    }

    #[test]
    fn test_record_all_tokens() {
        let mut counter = WordCounter::new();
        counter.record(&extraction(&["ギター", "弾く"], 6), DenominatorPolicy::AllTokens);
        counter.record(&extraction(&["ギター"], 3), DenominatorPolicy::AllTokens);
        assert_eq!(counter.count("ギター"), 2);
        assert_eq!(counter.count("弾く"), 1);
        assert_eq!(counter.total_words(), 9);
    }

    #[test]
    fn test_record_content_words() {
        let mut counter = WordCounter::new();
        counter.record(&extraction(&["ギター", "弾く"], 6), DenominatorPolicy::ContentWords);
        assert_eq!(counter.total_words(), 2);
    }

    #[test]
    fn test_most_common_order() {
        let mut counter = WordCounter::new();
        counter.accumulate(["b", "a", "c", "c", "b", "c"]);
        assert_eq!(counter.most_common(), vec![("c", 3), ("b", 2), ("a", 1)]);
    }

    #[test]
    fn test_tie_break_is_alphabetical() {
        let mut counter = WordCounter::new();
        counter.accumulate(["z", "y", "x"]);
        let words: Vec<&str> = counter.most_common().into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_reset() {
        let mut counter = WordCounter::new();
        counter.accumulate(["走る"]);
        counter.add_tokens(10);
        counter.reset();
        assert!(counter.is_empty());
        assert_eq!(counter.total_words(), 0);
        assert_eq!(counter, WordCounter::new());
    }
}
