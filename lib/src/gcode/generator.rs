//! Finished G-code program.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::FilamentStats;
use crate::Result;

/// Summary of a generated program.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GCodeStats {
    /// Number of layers written.
    pub layers: usize,
    /// Number of `G1` extrusion moves.
    pub extrusion_moves: usize,
    /// Number of travel moves.
    pub travel_moves: usize,
    /// Filament usage.
    pub filament: FilamentStats,
}

/// A complete G-code program.
#[derive(Debug, Clone, Default)]
pub struct GCode {
    content: String,
    stats: GCodeStats,
}

impl GCode {
    /// Wrap program text and its statistics.
    pub fn new(content: String, stats: GCodeStats) -> Self {
        Self { content, stats }
    }

    /// The program text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Statistics gathered while writing.
    pub fn stats(&self) -> &GCodeStats {
        &self.stats
    }

    /// Whether the program is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Save the program to a file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.content.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Display for GCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}
