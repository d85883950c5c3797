/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use assmin::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
    assert!(FileManager::dir_exists("."));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());
    Ok(())
}

/// Test the subtitle output naming
#[test]
fn test_generate_subtitle_output_path_withValidInputs_shouldInsertMin() {
    let output_path = FileManager::generate_subtitle_output_path("/tmp/input/episode.01.ass", "/tmp/output");
    assert_eq!(output_path, Path::new("/tmp/output/episode.01.min.ass"));

    let no_extension = FileManager::generate_subtitle_output_path("/tmp/input/episode", "/tmp/output");
    assert_eq!(no_extension, Path::new("/tmp/output/episode.min"));
}

/// Test the font output naming
#[test]
fn test_generate_font_output_path_shouldSwapExtension() {
    let font_path = FileManager::generate_font_output_path("/tmp/output/episode.min.ass");
    assert_eq!(font_path, Path::new("/tmp/output/episode.min.ttf"));
}

/// Test that relative paths become absolute
#[test]
fn test_absolute_withRelativePath_shouldPrefixCurrentDir() -> Result<()> {
    let absolute = FileManager::absolute("some/file.ass")?;
    assert!(absolute.is_absolute());
    assert!(absolute.ends_with("some/file.ass"));
    Ok(())
}

/// Test that default font directories are absolute
#[test]
fn test_default_font_dirs_shouldNotBeEmpty() {
    let dirs = FileManager::default_font_dirs();
    assert!(!dirs.is_empty());
    assert!(dirs.iter().all(|dir| dir.is_absolute()));
}
