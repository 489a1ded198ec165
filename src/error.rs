use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no Transcripts directory in {}", .0.display())]
    MissingTranscripts(PathBuf),
    #[error("failed to read frequency list {}: {source}", path.display())]
    FrequencyTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to load system dictionary: {0}")]
    Dictionary(String),
    #[error("failed to parse dictionary data {}: {source}", path.display())]
    Lexicon {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("export failed: {0}")]
    Export(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
