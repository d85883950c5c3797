/*!
 * # assmin - subtitle font subsetting
 *
 * A Rust library that shrinks the fonts an ASS subtitle needs into a single
 * small font and rewrites the subtitle to use it.
 *
 * ## Features
 *
 * - Collect the characters each font renders, following inline `\fn` and `\r` overrides
 * - Find installed font files by PostScript, full or family name
 * - Fold fonts that cannot be found into a fallback font
 * - Remap every needed glyph to a compact replacement alphabet
 * - Drive FontForge to subset, remap and merge the fonts
 * - Rewrite styles and dialogue text for the merged font
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: ASS document reading and writing
 * - `dialogue_parts`: Dialogue text tokenizing
 * - `subset`: The subsetting pipeline:
 *   - `subset::collector`: Required characters per font
 *   - `subset::resolver`: Font file resolution and fallback merging
 *   - `subset::remap`: Remap tables
 *   - `subset::instructions`: Engine instructions
 *   - `subset::engine`: Running FontForge
 *   - `subset::rewriter`: Subtitle rewriting
 *   - `subset::report`: Size reporting
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod dialogue_parts;
pub mod subset;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunSummary};
pub use subtitle_processor::AssDocument;
pub use errors::{AppError, SubsetError, SubtitleError};
