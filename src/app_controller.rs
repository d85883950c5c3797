use anyhow::{Result, Context, anyhow};
use log::{info, warn, debug};
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::SubsetError;
use crate::file_utils::FileManager;
use crate::subset::{
    build_remap_table, collect_characters, execute_plan, generate_plan, rewrite_subtitle,
    CharacterMap, FontEngine, FontForgeEngine, FontInspector, FontResolver, MapCursor, RemapTable,
    SizeReport, SubsetWorkspace, TtfInspector,
};
use crate::subtitle_processor::AssDocument;

// @module: Application controller for subtitle font subsetting

const FONT_NAME_LENGTH: usize = 10;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// What to process and where to put the results
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Subtitle to reduce
    pub subtitle: PathBuf,
    /// Directories searched for fonts, in order
    pub font_dirs: Vec<PathBuf>,
    /// Directory for outputs; the current directory when absent
    pub target_dir: Option<PathBuf>,
    /// Explicit output subtitle path
    pub target_path: Option<PathBuf>,
    /// Name of the merged font; random when absent
    pub font_name: Option<String>,
    /// Explicit merged font path
    pub font_path: Option<PathBuf>,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub subtitle_path: PathBuf,
    pub font_path: PathBuf,
    pub font_name: String,
    pub report: SizeReport,
}

/// Main application controller for subtitle font subsetting
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Replacement alphabet
    character_map: CharacterMap,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let character_map = config.character_map()?;
        Ok(Self { config, character_map })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run with ttf-parser introspection and FontForge
    pub async fn run(&self, options: RunOptions) -> Result<RunSummary> {
        let engine = FontForgeEngine::new(&self.config.engine.executable, self.config.engine.timeout());
        self.run_with(options, &TtfInspector, &engine).await
    }

    /// Run the whole pipeline for one subtitle
    pub async fn run_with(
        &self,
        options: RunOptions,
        inspector: &dyn FontInspector,
        engine: &dyn FontEngine,
    ) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();
        Self::check_arguments(&options)?;

        let (target_path, font_path) = self.output_paths(&options)?;
        let font_name = options.font_name.clone().unwrap_or_else(random_font_name);
        info!("Processing {:?} into font '{}'", options.subtitle, font_name);

        // Collect
        let mut document = AssDocument::from_file(&options.subtitle)?;
        let requirements = collect_characters(&document, &self.config.fallback_font)
            .context("Failed to read subtitle structure")?;
        if requirements.is_empty() {
            return Err(anyhow!("No dialogue text found in {:?}", options.subtitle));
        }

        // Resolve
        let resolver = FontResolver::new(inspector, self.config.resolver_options());
        let (requirements, locations) = resolver.resolve(requirements, &options.font_dirs)?;

        // Remap
        let (entries, cursor) = build_remap_table(&requirements, &locations, &self.character_map, MapCursor::default())?;
        debug!("Used {} of {} replacement characters", cursor.position(), self.character_map.len());
        for entry in &entries {
            info!("Font '{}': {} glyph(s) from {:?}", entry.font_name(), entry.characters().len(), entry.source_path());
        }

        // Rewrite in memory before any output is written
        let table = RemapTable::new(entries, locations.aliases().clone());
        let stats = rewrite_subtitle(&mut document, &table, &font_name, &self.config.fallback_font)?;

        // Subset and merge; the workspace is removed when it goes out of scope
        let workspace = SubsetWorkspace::new().context("Failed to create temporary workspace")?;
        let plan = generate_plan(
            table.entries(),
            workspace.path(),
            &font_name,
            &font_path,
            self.config.engine.generator_options(),
        )?;
        execute_plan(engine, &plan, &workspace).await?;
        let font_output = UnfinishedOutput::new(&font_path);

        let sources: Vec<&Path> = table.entries().iter().map(|entry| entry.source_path()).collect();
        let report = SizeReport::measure(&sources, &plan.intermediates)?;
        drop(workspace);

        document.write_to_file(&target_path)?;
        font_output.keep();

        info!("Rewrote {} style(s) and {} dialogue line(s)", stats.styles, stats.dialogues);
        report.log();
        info!("Success: {:?} and {:?} in {:.1}s", target_path, font_path, start_time.elapsed().as_secs_f64());

        Ok(RunSummary {
            subtitle_path: target_path,
            font_path,
            font_name,
            report,
        })
    }

    fn check_arguments(options: &RunOptions) -> Result<(), SubsetError> {
        if options.subtitle.as_os_str().is_empty() {
            return Err(SubsetError::InvalidArguments("No subtitle path given".to_string()));
        }
        if options.font_dirs.is_empty() {
            return Err(SubsetError::InvalidArguments("No font directories given".to_string()));
        }
        if !FileManager::file_exists(&options.subtitle) {
            return Err(SubsetError::InvalidArguments(format!(
                "Subtitle file does not exist: {:?}",
                options.subtitle
            )));
        }
        Ok(())
    }

    // @returns: Absolute subtitle and font output paths
    fn output_paths(&self, options: &RunOptions) -> Result<(PathBuf, PathBuf)> {
        let target_dir = match &options.target_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let target_path = match &options.target_path {
            Some(path) => path.clone(),
            None => FileManager::generate_subtitle_output_path(&options.subtitle, &target_dir),
        };
        let font_path = match &options.font_path {
            Some(path) => path.clone(),
            None => target_dir.join(
                FileManager::generate_font_output_path(&target_path)
                    .file_name()
                    .unwrap_or_default(),
            ),
        };

        let target_path = FileManager::absolute(target_path)?;
        let font_path = FileManager::absolute(font_path)?;
        if target_path == FileManager::absolute(&options.subtitle)? {
            warn!("Output subtitle path is the input path; the input will be overwritten");
        }
        for path in [&target_path, &font_path] {
            if let Some(parent) = path.parent() {
                FileManager::ensure_dir(parent)?;
            }
        }

        Ok((target_path, font_path))
    }
}

// Output file that is removed again unless the run completes
struct UnfinishedOutput<'a> {
    path: &'a Path,
    keep: bool,
}

impl<'a> UnfinishedOutput<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, keep: false }
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for UnfinishedOutput<'_> {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => debug!("Removed unfinished output {:?}", self.path),
            Err(e) => warn!("Failed to remove unfinished output {:?}: {}", self.path, e),
        }
    }
}

/// Random uppercase base-36 font name
pub fn random_font_name() -> String {
    let mut rng = rand::rng();
    (0..FONT_NAME_LENGTH)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}
