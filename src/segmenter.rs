use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::farasa_tool::FarasaTool;
use crate::file_utils::FileManager;

// @module: Segmentation flow and its post-processing

/// Boundary marker emitted by the Farasa segmenter
pub const DEFAULT_SPLIT_CHAR: char = '+';

/// Ta marbuta split off from its token by the segmenter
const DETACHED_TA_MARBUTA: &str = "+ة";
const TA_MARBUTA: &str = "ة";

/// Options for the segmentation flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Reconnect a detached ta marbuta to the preceding token
    pub restore_ta_marbuta: bool,
    /// Marker written between prefixes, stems and suffixes
    pub split_char: char,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            restore_ta_marbuta: false,
            split_char: DEFAULT_SPLIT_CHAR,
        }
    }
}

impl SegmentOptions {
    /// Whether the tool output has to be rewritten at all
    pub fn needs_postprocessing(&self) -> bool {
        self.restore_ta_marbuta || self.split_char != DEFAULT_SPLIT_CHAR
    }
}

/// Apply the segmentation post-processing to raw segmenter output
///
/// The ta marbuta is reconnected before the boundary marker is swapped, so a
/// reconnected `ة` never ends up next to the custom marker.
pub fn postprocess_segmentation(text: &str, options: &SegmentOptions) -> String {
    let mut text = text.to_string();
    if options.restore_ta_marbuta {
        text = text.replace(DETACHED_TA_MARBUTA, TA_MARBUTA);
    }
    if options.split_char != DEFAULT_SPLIT_CHAR {
        let mut buf = [0u8; 4];
        text = text.replace(DEFAULT_SPLIT_CHAR, options.split_char.encode_utf8(&mut buf));
    }
    text
}

/// Segment `input` into `output` with the Farasa segmenter
pub async fn segment(tool: &FarasaTool, input: &Path, output: &Path, options: &SegmentOptions) -> Result<()> {
    if let Some(parent) = output.parent() {
        FileManager::ensure_dir(parent)?;
    }

    tool.call_to_file(input, output)
        .await
        .with_context(|| format!("Segmentation failed for {:?}", input))?;

    if !options.needs_postprocessing() {
        return Ok(());
    }

    debug!("Post-processing segmentation output {:?}", output);
    let text = FileManager::read_to_string(output)?;
    let text = postprocess_segmentation(&text, options);
    FileManager::write_to_file(output, &text)
}
