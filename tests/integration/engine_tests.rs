/*!
 * Integration tests for engine execution and workspace handling
 */

use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use assmin::errors::SubsetError;
use assmin::subset::{execute_plan, generate_plan, FontForgeEngine, GeneratorOptions, RemapEntry, SubsetWorkspace};
use assmin::{Config, Controller};
use crate::common::{self, AssBuilder};
use crate::common::fakes::{create_font_file, FakeInspector, RecordingEngine};

fn plan_in(workspace: &SubsetWorkspace, target: PathBuf) -> Result<assmin::subset::SubsetPlan> {
    let entry = RemapEntry::new("A", PathBuf::from("/fonts/a.ttf"), vec!['a'], vec!['!']);
    Ok(generate_plan(&[entry], workspace.path(), "T", &target, GeneratorOptions::default())?)
}

/// Test that the script is written into the workspace and handed to the engine
#[tokio::test]
async fn test_execute_plan_withRecordingEngine_shouldPassScript() -> Result<()> {
    let out_dir = common::create_temp_dir()?;
    let workspace = SubsetWorkspace::new()?;
    let plan = plan_in(&workspace, out_dir.path().join("t.ttf"))?;
    let engine = RecordingEngine::new(10);

    execute_plan(&engine, &plan, &workspace).await?;

    assert_eq!(engine.last_script(), Some(plan.to_script()));
    assert!(workspace.script_path().is_file());
    assert!(plan.target.is_file());
    Ok(())
}

/// Test that a failed run removes a partially written target
#[tokio::test]
async fn test_execute_plan_withFailingEngine_shouldRemoveTarget() -> Result<()> {
    let out_dir = common::create_temp_dir()?;
    let workspace = SubsetWorkspace::new()?;
    let target = create_font_file(out_dir.path(), "t.ttf", 5)?;
    let plan = plan_in(&workspace, target.clone())?;
    let engine = RecordingEngine::failing("boom");

    let result = execute_plan(&engine, &plan, &workspace).await;

    assert!(matches!(result, Err(SubsetError::ExternalEngineFailure(message)) if message == "boom"));
    assert!(!target.exists());
    Ok(())
}

/// Test that a workspace directory is removed on drop
#[test]
fn test_workspace_onDrop_shouldRemoveDirectory() -> Result<()> {
    let workspace = SubsetWorkspace::new()?;
    let path = workspace.path().to_path_buf();
    assert!(path.is_dir());

    drop(workspace);

    assert!(!path.exists());
    Ok(())
}

/// Test that a missing executable is an engine failure
#[tokio::test]
async fn test_fontforge_engine_withMissingExecutable_shouldFail() -> Result<()> {
    let workspace = SubsetWorkspace::new()?;
    let plan = plan_in(&workspace, workspace.path().join("t.ttf"))?;
    let engine = FontForgeEngine::new("/nonexistent/fontforge-binary", Duration::from_secs(5));

    let result = execute_plan(&engine, &plan, &workspace).await;

    assert!(matches!(result, Err(SubsetError::ExternalEngineFailure(_))));
    Ok(())
}

/// Test that a non-zero exit status is an engine failure
#[cfg(unix)]
#[tokio::test]
async fn test_fontforge_engine_withFailingExecutable_shouldFail() -> Result<()> {
    let workspace = SubsetWorkspace::new()?;
    let plan = plan_in(&workspace, workspace.path().join("t.ttf"))?;
    let engine = FontForgeEngine::new("false", Duration::from_secs(5));

    let result = execute_plan(&engine, &plan, &workspace).await;

    assert!(matches!(result, Err(SubsetError::ExternalEngineFailure(_))));
    Ok(())
}

/// Test that a successful exit without the expected files is an engine failure
#[cfg(unix)]
#[tokio::test]
async fn test_fontforge_engine_withoutOutputs_shouldFail() -> Result<()> {
    let workspace = SubsetWorkspace::new()?;
    let plan = plan_in(&workspace, workspace.path().join("t.ttf"))?;
    let engine = FontForgeEngine::new("true", Duration::from_secs(5));

    let result = execute_plan(&engine, &plan, &workspace).await;

    match result {
        Err(SubsetError::ExternalEngineFailure(message)) => assert!(message.contains("Expected output missing")),
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

/// Test that a failed engine leaves no subtitle and no font behind
#[test]
fn test_run_withFailingEngine_shouldWriteNothing() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let fonts = temp_dir.path().join("fonts");
    std::fs::create_dir_all(&fonts)?;
    create_font_file(&fonts, "arial.ttf", 100)?;
    let inspector = FakeInspector::new().with_font("arial.ttf", None, Some("Arial"), None);
    let subtitle = AssBuilder::new().style("Default", "Arial").dialogue("Default", "x").write(temp_dir.path(), "e.ass")?;
    let engine = RecordingEngine::failing("crashed");
    let controller = Controller::with_config(Config::default())?;

    let options = assmin::RunOptions {
        subtitle,
        font_dirs: vec![fonts],
        target_dir: Some(temp_dir.path().to_path_buf()),
        ..assmin::RunOptions::default()
    };
    let error = tokio_test::block_on(async { controller.run_with(options, &inspector, &engine).await }).unwrap_err();

    assert!(matches!(error.downcast_ref::<SubsetError>(), Some(SubsetError::ExternalEngineFailure(_))));
    assert!(!temp_dir.path().join("e.min.ass").exists());
    assert!(!temp_dir.path().join("e.min.ttf").exists());
    assert_eq!(engine.call_count(), 1);
    Ok(())
}

/// Test that a subtitle write failure after a successful engine run removes the font
#[test]
fn test_run_withUnwritableSubtitle_shouldRemoveFont() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let fonts = temp_dir.path().join("fonts");
    std::fs::create_dir_all(&fonts)?;
    create_font_file(&fonts, "arial.ttf", 100)?;
    let inspector = FakeInspector::new().with_font("arial.ttf", None, Some("Arial"), None);
    let subtitle = AssBuilder::new().style("Default", "Arial").dialogue("Default", "x").write(temp_dir.path(), "e.ass")?;
    let occupied = temp_dir.path().join("occupied");
    std::fs::create_dir_all(&occupied)?;
    let font_path = temp_dir.path().join("out.ttf");
    let engine = RecordingEngine::new(10);
    let controller = Controller::with_config(Config::default())?;

    let options = assmin::RunOptions {
        subtitle,
        font_dirs: vec![fonts],
        target_path: Some(occupied.clone()),
        font_path: Some(font_path.clone()),
        ..assmin::RunOptions::default()
    };
    let result = tokio_test::block_on(async { controller.run_with(options, &inspector, &engine).await });

    assert!(result.is_err());
    assert_eq!(engine.call_count(), 1);
    assert!(!font_path.exists());
    assert!(occupied.is_dir());
    Ok(())
}
