use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;

use crate::errors::ProcessingError;
use crate::farasa_tool::FarasaTool;
use crate::file_utils::FileManager;

// @module: POS tagging flow with non-Arabic span isolation

// @const: Heuristic for runs of Latin text, digits and a little punctuation.
// At least six class characters, any single non-line-break character, then one
// closing class character.
static NON_ARABIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z\d .;#\n\r]{6,}[^\n\r][a-zA-Z\d.;#]").unwrap()
});

// @const: Symbols dropped from the text when non-Arabic spans are removed
static STRAY_SYMBOLS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[#|$]").unwrap()
});

// @const: How the tagger renders a placeholder line
static TAGGED_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\n\r]*S/S µ/PUNC µ/PUNC µ/PUNC E/E[\n\r]*").unwrap()
});

// @const: Hash run the tagger leaves untagged in front of a sentence start
static HASH_ARTIFACT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"### *[\n\r]*S/S").unwrap()
});

/// Line substituted for every non-Arabic span before tagging
pub const PLACEHOLDER_LINE: &str = "\nµµµ\n";

const HASH_ARTIFACT_REPLACEMENT: &str = "S/S #/PUNC #/PUNC #/PUNC";

/// Options for the tagging flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOptions {
    /// Only tag Arabic text; non-Arabic spans are masked and put back afterwards
    pub only_arabic: bool,
    /// Remove non-Arabic spans entirely instead of putting them back
    pub ditch_non_arabic: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            only_arabic: true,
            ditch_non_arabic: false,
        }
    }
}

impl TagOptions {
    /// Whether the input has to be rewritten before tagging
    pub fn needs_preprocessing(&self) -> bool {
        self.only_arabic || self.ditch_non_arabic
    }
}

/// Text handed to the tagger together with the spans that were masked out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedDocument {
    /// Text with every non-Arabic span replaced
    pub text: String,
    /// Masked spans in order of appearance; empty when spans were removed
    pub spans: Vec<String>,
}

/// All non-Arabic spans of `text`, left to right
pub fn find_non_arabic_spans(text: &str) -> Vec<&str> {
    NON_ARABIC_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

/// Remove non-Arabic spans and stray symbols, then drop blank lines
///
/// Every remaining line is trimmed; the result has no placeholder and none of
/// `#`, `|` or `$`.
pub fn ditch_non_arabic(text: &str) -> String {
    let removed = NON_ARABIC_REGEX.replace_all(text, NoExpand("\n"));
    let stripped = STRAY_SYMBOLS_REGEX.replace_all(&removed, "");

    stripped
        .split(is_line_boundary)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// Unicode line boundaries. `\r\n` leaves an empty piece that the blank line
// filter drops.
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Replace every non-Arabic span with [`PLACEHOLDER_LINE`], remembering the spans
pub fn mask_non_arabic(text: &str) -> MaskedDocument {
    let spans = find_non_arabic_spans(text)
        .into_iter()
        .map(str::to_string)
        .collect();
    let text = NON_ARABIC_REGEX
        .replace_all(text, NoExpand(PLACEHOLDER_LINE))
        .into_owned();

    MaskedDocument { text, spans }
}

/// Put masked spans back into tagged output
///
/// The i-th tagged placeholder is replaced by the i-th span. The counts must
/// agree exactly, otherwise nothing is substituted.
pub fn restore_non_arabic(tagged: &str, spans: &[String]) -> Result<String, ProcessingError> {
    let placeholders: Vec<_> = TAGGED_PLACEHOLDER_REGEX.find_iter(tagged).collect();
    if placeholders.len() != spans.len() {
        return Err(ProcessingError::SpanCountMismatch {
            expected: spans.len(),
            found: placeholders.len(),
        });
    }

    let mut restored = String::with_capacity(tagged.len() + spans.iter().map(String::len).sum::<usize>());
    let mut last_end = 0;
    for (index, placeholder) in placeholders.iter().enumerate() {
        restored.push_str(&tagged[last_end..placeholder.start()]);
        restored.push_str(&spans[index]);
        last_end = placeholder.end();
    }
    restored.push_str(&tagged[last_end..]);

    Ok(restored)
}

/// Rewrite a `###` run left in front of a sentence start as three tagged hashes
pub fn repair_hash_markers(tagged: &str) -> String {
    HASH_ARTIFACT_REGEX
        .replace_all(tagged, NoExpand(HASH_ARTIFACT_REPLACEMENT))
        .into_owned()
}

/// Prepare `text` for the tagger according to `options`
pub fn prepare_for_tagging(text: &str, options: &TagOptions) -> MaskedDocument {
    if options.ditch_non_arabic {
        MaskedDocument {
            text: ditch_non_arabic(text),
            spans: Vec::new(),
        }
    } else {
        mask_non_arabic(text)
    }
}

/// POS tag `input` into `output` with the Farasa tagger
///
/// Intermediate files go to a fresh scratch directory inside `temp_dir` (or
/// the system temp directory), removed once tagging is done. `output` is only
/// written after the tagged text has been fully post-processed.
pub async fn pos_tag(
    tool: &FarasaTool,
    input: &Path,
    output: &Path,
    options: &TagOptions,
    temp_dir: Option<&Path>,
) -> Result<()> {
    if let Some(parent) = output.parent() {
        FileManager::ensure_dir(parent)?;
    }

    if !options.needs_preprocessing() {
        tool.call_to_file(input, output)
            .await
            .with_context(|| format!("POS tagging failed for {:?}", input))?;
        return Ok(());
    }

    let text = FileManager::read_to_string(input)?;
    let document = prepare_for_tagging(&text, options);
    debug!("Masked {} non-Arabic span(s) in {:?}", document.spans.len(), input);

    let mut builder = tempfile::Builder::new();
    builder.prefix("farasa-");
    let scratch = match temp_dir {
        Some(dir) => {
            FileManager::ensure_dir(dir)?;
            builder.tempdir_in(dir)
        }
        None => builder.tempdir(),
    }
    .context("Failed to create temporary directory for tagging")?;

    let prepared = scratch.path().join("input.txt");
    let tagged = scratch.path().join("tagged.txt");

    write_intermediate(&prepared, &document.text)?;
    tool.call_to_file(&prepared, &tagged)
        .await
        .with_context(|| format!("POS tagging failed for {:?}", input))?;

    if options.ditch_non_arabic || document.spans.is_empty() {
        fs::copy(&tagged, output)
            .with_context(|| format!("Failed to write tagged output to {:?}", output))?;
        return Ok(());
    }

    let tagged_text = FileManager::read_to_string(&tagged)?;
    let restored = restore_non_arabic(&tagged_text, &document.spans)
        .with_context(|| format!("Failed to restore non-Arabic text in {:?}", input))?;
    info!("Restored {} non-Arabic span(s) in {:?}", document.spans.len(), output);

    FileManager::write_to_file(output, &repair_hash_markers(&restored))
}

fn write_intermediate(path: &Path, text: &str) -> Result<(), ProcessingError> {
    fs::write(path, text).map_err(|e| ProcessingError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
