/*!
 * Font subsetting pipeline.
 *
 * - `collector`: required characters per font
 * - `font_metadata`: font name introspection
 * - `resolver`: font files for the required fonts, with fallback merging
 * - `character_map`: replacement alphabet and its cursor
 * - `remap`: per-font remap tables
 * - `instructions`: typed engine instructions and script rendering
 * - `engine`: running the font-editing engine
 * - `rewriter`: subtitle rewriting
 * - `report`: size comparison
 */

pub mod collector;
pub mod font_metadata;
pub mod resolver;
pub mod character_map;
pub mod remap;
pub mod instructions;
pub mod engine;
pub mod rewriter;
pub mod report;

pub use collector::{collect_characters, FontRequirements, StyleFonts};
pub use font_metadata::{FontInspector, FontMetadata, TtfInspector};
pub use resolver::{FontLocations, FontResolver, ResolverOptions};
pub use character_map::{CharacterMap, MapCursor};
pub use remap::{build_remap_table, RemapEntry, RemapTable};
pub use instructions::{generate_plan, GeneratorOptions, Instruction, SubsetPlan};
pub use engine::{execute_plan, EngineOutput, FontEngine, FontForgeEngine, SubsetWorkspace};
pub use rewriter::{rewrite_subtitle, RewriteStats};
pub use report::SizeReport;
