use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};

/// Baseline word frequencies of general Japanese, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFrequencyTable {
    frequencies: HashMap<String, f64>,
}

impl ReferenceFrequencyTable {
    ///Loads a tab-separated frequency list. The first row is a header, the first column is the
    ///word and the last header column holds the frequency.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let table = Self::from_reader(file).map_err(|source| Error::FrequencyTable {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "loaded {} reference frequencies from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    ///Parses a frequency list from any reader. Unparseable frequencies count as 0.0.
    /// # Example
    /// ```
    /// use show_vocab::ReferenceFrequencyTable;
    /// let tsv = "word\trank\tfrequency\n走る\t1\t0.01\n変な\t2\tn/a\n";
    /// let table = ReferenceFrequencyTable::from_reader(tsv.as_bytes()).unwrap();
    /// assert_eq!(table.frequency("走る"), 0.01);
    /// assert_eq!(table.frequency("変な"), 0.0);
    /// assert_eq!(table.frequency("未知"), 0.0);
    /// ```
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let Some(freq_idx) = rdr.headers()?.len().checked_sub(1) else {
            return Ok(Self::default());
        };

        let mut frequencies = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            let Some(word) = record.get(0) else {
                continue;
            };
            let freq = record
                .get(freq_idx)
                .and_then(|f| f.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            let freq = if freq.is_finite() {
                freq
            } else {
                warn!("non-finite frequency for {word:?}, using 0.0");
                0.0
            };
            frequencies.insert(word.to_string(), freq);
        }
        Ok(ReferenceFrequencyTable { frequencies })
    }

    /// Frequency of `word`, or 0.0 when the word is not listed.
    pub fn frequency(&self, word: &str) -> f64 {
        self.frequencies.get(word).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

impl FromIterator<(String, f64)> for ReferenceFrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        ReferenceFrequencyTable {
            frequencies: iter.into_iter().collect(),
        }
    }
}

/// Words a show's folder asks to keep out of its report.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    words: HashSet<String>,
}

impl ExcludeSet {
    ///Loads one word per line. A missing file means no exclusions.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)).map_err(|e| Error::io(path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    ///Blank lines and lines starting with `#` are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            words.insert(word.to_string());
        }
        Ok(ExcludeSet { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ExcludeSet {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_last_column_is_frequency() {
        let tsv = "lemma\tpos\tcount\tfrequency\n楽しい\t形容詞\t120\t0.002\n走る\t動詞\t800\t0.01\n";
        let table = ReferenceFrequencyTable::from_reader(tsv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.frequency("楽しい"), 0.002);
        assert_eq!(table.frequency("走る"), 0.01);
    }

    #[test]
    fn test_malformed_and_short_rows() {
        let tsv = "word\tfrequency\n壊れ\tabc\n短い\n\"引用\"\t0.5\n";
        let table = ReferenceFrequencyTable::from_reader(tsv.as_bytes()).unwrap();
        assert!(table.contains("壊れ"));
        assert_eq!(table.frequency("壊れ"), 0.0);
        assert_eq!(table.frequency("短い"), 0.0);
        assert_eq!(table.frequency("\"引用\""), 0.5);
    }

    #[test]
    fn test_header_only() {
        let table = ReferenceFrequencyTable::from_reader("word\tfrequency\n".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(ReferenceFrequencyTable::load(&dir.path().join("nope.tsv")).is_err());
    }

    #[test]
    fn test_exclude_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# names").unwrap();
        writeln!(file, "後藤").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  ギター  ").unwrap();
        let set = ExcludeSet::load(file.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("後藤"));
        assert!(set.contains("ギター"));
        assert!(!set.contains("# names"));
    }

    #[test]
    fn test_missing_exclude_file_is_empty() {
        let dir = tempdir().unwrap();
        let set = ExcludeSet::load(&dir.path().join("excluded_words.txt")).unwrap();
        assert!(set.is_empty());
    }
}
