use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for the reduced subtitle
    // @example: episode.ass -> <output_dir>/episode.min.ass
    pub fn generate_subtitle_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let output_filename = match input_file.extension() {
            Some(ext) => format!("{}.min.{}", stem, ext.to_string_lossy()),
            None => format!("{}.min", stem),
        };

        output_dir.as_ref().join(output_filename)
    }

    // @generates: Font path next to the reduced subtitle
    // @example: <dir>/episode.min.ass -> <dir>/episode.min.ttf
    pub fn generate_font_output_path<P: AsRef<Path>>(subtitle_output: P) -> PathBuf {
        subtitle_output.as_ref().with_extension("ttf")
    }

    /// Make a path absolute against the current directory
    pub fn absolute<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        std::path::absolute(path)
            .with_context(|| format!("Failed to resolve path: {:?}", path))
    }

    /// Platform font directories searched when none are given
    pub fn default_font_dirs() -> Vec<PathBuf> {
        let mut font_dirs = Vec::new();

        if let Some(windir) = std::env::var_os("windir").or_else(|| std::env::var_os("WINDIR")) {
            font_dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            font_dirs.push(PathBuf::from("/usr/share/fonts"));
            font_dirs.push(PathBuf::from("/usr/local/share/fonts"));
            if let Some(home) = dirs::home_dir() {
                font_dirs.push(home.join(".local/share/fonts"));
            }
        }

        if let Some(user_fonts) = dirs::font_dir() {
            if !font_dirs.contains(&user_fonts) {
                font_dirs.push(user_fonts);
            }
        }

        font_dirs
    }
}
