use std::fmt;
use std::path::Path;
use anyhow::{Context, Result};
use log::info;

// @module: Size comparison of original fonts and their subsets

/// Byte sizes before and after subsetting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeReport {
    pub original_bytes: u64,
    pub subset_bytes: u64,
}

impl SizeReport {
    /// Sum the sizes of the original font files and of the per-font subsets
    pub fn measure<P1: AsRef<Path>, P2: AsRef<Path>>(originals: &[P1], subsets: &[P2]) -> Result<Self> {
        Ok(SizeReport {
            original_bytes: total_size(originals)?,
            subset_bytes: total_size(subsets)?,
        })
    }

    /// Negative when the subsets are larger than the originals
    pub fn saved_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.subset_bytes as i64
    }

    pub fn saved_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 * 100.0 / self.original_bytes as f64
    }

    pub fn log(&self) {
        for line in self.to_string().lines() {
            info!("{}", line);
        }
    }
}

fn total_size<P: AsRef<Path>>(paths: &[P]) -> Result<u64> {
    let mut total = 0;
    for path in paths {
        let path = path.as_ref();
        total += std::fs::metadata(path)
            .with_context(|| format!("Failed to read size of {:?}", path))?
            .len();
    }
    Ok(total)
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Start size: {}", self.original_bytes)?;
        writeln!(f, "Final size: {}", self.subset_bytes)?;
        writeln!(f, "Saved size: {}", self.saved_bytes())?;
        write!(f, "Saved size %: {:.2}", self.saved_percent())
    }
}
