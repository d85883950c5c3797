/*!
 * Running the external font-editing engine.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, warn};
use tempfile::TempDir;
use tokio::process::Command;

use crate::errors::SubsetError;
use super::instructions::SubsetPlan;

const SCRIPT_FILE_NAME: &str = "fontforge-script.pe";

/// What the engine printed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Common trait for font-editing engines
///
/// An engine executes a script file and reports success or failure; it is
/// free to run in `work_dir`.
#[async_trait]
pub trait FontEngine: Send + Sync + Debug {
    async fn run(&self, script: &Path, work_dir: &Path) -> Result<EngineOutput, SubsetError>;
}

/// FontForge invoked as `fontforge -script <file>`
#[derive(Debug, Clone)]
pub struct FontForgeEngine {
    executable: PathBuf,
    timeout: Duration,
}

impl FontForgeEngine {
    pub fn new<P: Into<PathBuf>>(executable: P, timeout: Duration) -> Self {
        FontForgeEngine {
            executable: executable.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FontEngine for FontForgeEngine {
    async fn run(&self, script: &Path, work_dir: &Path) -> Result<EngineOutput, SubsetError> {
        debug!("Running {:?} -script {:?}", self.executable, script);

        let fontforge_future = Command::new(&self.executable)
            .arg("-script")
            .arg(script)
            .current_dir(work_dir)
            .kill_on_drop(true)
            .output();

        let result = tokio::select! {
            result = fontforge_future => {
                result.map_err(|e| SubsetError::ExternalEngineFailure(
                    format!("Failed to execute {:?}: {}", self.executable, e)
                ))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(SubsetError::ExternalEngineFailure(
                    format!("{:?} timed out after {} seconds", self.executable, self.timeout.as_secs())
                ));
            }
        };

        let output = EngineOutput {
            stdout: String::from_utf8_lossy(&result.stdout).to_string(),
            stderr: String::from_utf8_lossy(&result.stderr).to_string(),
        };

        if !result.status.success() {
            error!("Font engine failed: {}", output.stderr.trim());
            return Err(SubsetError::ExternalEngineFailure(format!(
                "{:?} exited with {}: {}",
                self.executable,
                result.status,
                output.stderr.trim()
            )));
        }

        Ok(output)
    }
}

/// Temporary directory holding the script and the per-font subsets.
///
/// Everything inside is removed when the workspace is dropped, whichever way
/// the run ends.
#[derive(Debug)]
pub struct SubsetWorkspace {
    dir: TempDir,
}

impl SubsetWorkspace {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("assmin-").tempdir()?;
        Ok(SubsetWorkspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn script_path(&self) -> PathBuf {
        self.dir.path().join(SCRIPT_FILE_NAME)
    }
}

/// Write the plan's script, run the engine and check every expected file.
///
/// On failure a partially written target font is removed.
pub async fn execute_plan(
    engine: &dyn FontEngine,
    plan: &SubsetPlan,
    workspace: &SubsetWorkspace,
) -> Result<EngineOutput, SubsetError> {
    let result = run_and_verify(engine, plan, workspace).await;
    if result.is_err() && plan.target.exists() {
        if let Err(e) = std::fs::remove_file(&plan.target) {
            warn!("Failed to remove partial font {:?}: {}", plan.target, e);
        }
    }
    result
}

async fn run_and_verify(
    engine: &dyn FontEngine,
    plan: &SubsetPlan,
    workspace: &SubsetWorkspace,
) -> Result<EngineOutput, SubsetError> {
    let script_path = workspace.script_path();
    std::fs::write(&script_path, plan.to_script()).map_err(|e| {
        SubsetError::ExternalEngineFailure(format!("Failed to write script {:?}: {}", script_path, e))
    })?;

    let output = engine.run(&script_path, workspace.path()).await?;

    let missing: Vec<&PathBuf> = plan
        .intermediates
        .iter()
        .chain(std::iter::once(&plan.target))
        .filter(|path| !path.is_file())
        .collect();
    if !missing.is_empty() {
        return Err(SubsetError::ExternalEngineFailure(format!(
            "Expected output missing: {:?}; engine said: {}",
            missing,
            output.stderr.trim()
        )));
    }

    Ok(output)
}
