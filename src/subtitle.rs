use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static INDEX_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("index pattern is valid"));

// Full-width and half-width pairs may be mixed, e.g. "（笑)".
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[（(].*?[）)]").expect("annotation pattern is valid"));

const TIME_RANGE: &str = "-->";

///Removes bracketed annotations (sound effects, speaker labels) from a caption line and trims the rest.
/// # Example
/// ```
/// use show_vocab::strip_annotations;
/// assert_eq!(strip_annotations("（ため息）やっぱりダメだ"), "やっぱりダメだ");
/// assert_eq!(strip_annotations("(拍手)"), "");
/// ```
pub fn strip_annotations(line: &str) -> String {
    ANNOTATION.replace_all(line, "").trim().to_string()
}

///Splits the content of an `.srt` file into one sentence per caption block.
///Lines of a block are joined with a single space. Captions left empty after
///annotation stripping produce nothing.
/// # Example
/// ```
/// use show_vocab::parse_srt;
/// let srt = "1\n00:00:01,000 --> 00:00:02,000\n（ため息）やっぱりダメだ\n";
/// assert_eq!(parse_srt(srt), vec!["やっぱりダメだ".to_string()]);
/// ```
pub fn parse_srt(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut sentences = Vec::new();
    let mut caption: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();

        if line.is_empty() || INDEX_LINE.is_match(line) || line.contains(TIME_RANGE) {
            flush(&mut caption, &mut sentences);
            continue;
        }

        let text = strip_annotations(line);
        if !text.is_empty() {
            caption.push(text);
        }
    }
    flush(&mut caption, &mut sentences);

    sentences
}

fn flush(caption: &mut Vec<String>, sentences: &mut Vec<String>) {
    if caption.is_empty() {
        return;
    }
    let sentence = caption.join(" ");
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    caption.clear();
}

///Reads an `.srt` file (UTF-8) and parses it into sentences.
pub fn read_srt_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_srt(&content))
}
