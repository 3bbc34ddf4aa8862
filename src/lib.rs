/*!
 * # farasa-rs - command-line and library wrapper for the Farasa Arabic NLP tools
 *
 * Runs the pre-built Farasa segmenter and POS tagger executables on text files
 * and fixes up their input and output with a few regular expressions.
 *
 * ## Features
 *
 * - Segment Arabic text, optionally reconnecting a detached ta marbuta
 *   and choosing the affix boundary marker
 * - POS tag Arabic text while keeping Latin/numeric runs out of the tagger:
 *   - mask them and put them back after tagging, or
 *   - remove them entirely
 * - Process a single file or every file of a folder
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `farasa_tool`: Launching the external executables
 * - `segmenter`: Segmentation flow and post-processing
 * - `pos_tagger`: Tagging flow with non-Arabic span masking and restoration
 * - `file_utils`: File system operations
 * - `app_controller`: Single-file and folder processing
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod farasa_tool;
pub mod segmenter;
pub mod pos_tagger;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, ToolConfig, ToolKind};
pub use app_controller::{BatchReport, Controller, Operation, Task};
pub use farasa_tool::FarasaTool;
pub use pos_tagger::{pos_tag, MaskedDocument, TagOptions};
pub use segmenter::{segment, SegmentOptions};
pub use errors::{AppError, ProcessingError, ToolError};
