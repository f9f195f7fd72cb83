//! Level assets: character-grid level files and their JSON manifests.
//!
//! A level file is the world's tile grid as text, one world row per line.
//! Loading strips line breaks and checks the cell count against the room
//! array size, so the result can go straight to the level builder.
//!
//! # Layout
//! World row `room_row * ROW_COUNT + r` holds `rooms_x * COLUMN_COUNT`
//! symbols.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tileworld_common::{CELL_COUNT, COLUMN_COUNT};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("level file has {actual} cells, expected {expected} for {rooms_y}x{rooms_x} rooms")]
    Length {
        expected: usize,
        actual: usize,
        rooms_y: usize,
        rooms_x: usize,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Number of cells a `rooms_y` x `rooms_x` level source must hold.
pub fn expected_len(rooms_y: usize, rooms_x: usize) -> usize {
    rooms_y * rooms_x * CELL_COUNT
}

/// Drop `\n` and `\r` from level text.
pub fn strip_newlines(text: &str) -> String {
    text.chars().filter(|&c| c != '\n' && c != '\r').collect()
}

/// Strip and validate level text for a `rooms_y` x `rooms_x` room array.
pub fn parse_level_text(text: &str, rooms_y: usize, rooms_x: usize) -> Result<String, AssetError> {
    let source = strip_newlines(text);
    let expected = expected_len(rooms_y, rooms_x);
    let actual = source.chars().count();
    if actual != expected {
        return Err(AssetError::Length {
            expected,
            actual,
            rooms_y,
            rooms_x,
        });
    }
    Ok(source)
}

/// Read a level file and return its flat, validated source.
pub fn load_level_file(
    path: impl AsRef<Path>,
    rooms_y: usize,
    rooms_x: usize,
) -> Result<String, AssetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let source = parse_level_text(&text, rooms_y, rooms_x)?;
    tracing::debug!(path = %path.display(), cells = source.chars().count(), "level file loaded");
    Ok(source)
}

/// Break a flat source into world rows of `rooms_x * COLUMN_COUNT` symbols.
pub fn format_level_text(source: &str, rooms_x: usize) -> String {
    let width = (rooms_x * COLUMN_COUNT).max(1);
    let symbols: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(symbols.len() + symbols.len() / width);
    for row in symbols.chunks(width) {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// Write a flat source as a level file, one world row per line.
pub fn save_level_file(path: impl AsRef<Path>, source: &str, rooms_x: usize) -> Result<(), AssetError> {
    std::fs::write(path, format_level_text(source, rooms_x))?;
    Ok(())
}

/// Describes a level on disk: its grid file and room array size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelManifest {
    pub name: String,
    pub rooms_y: usize,
    pub rooms_x: usize,
    /// Level file, relative to the manifest.
    pub file: PathBuf,
}

impl LevelManifest {
    /// Save the manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Self = serde_json::from_reader(file)?;
        Ok(manifest)
    }

    /// Load the level file this manifest points at, resolved against
    /// `base_dir`.
    pub fn load_source(&self, base_dir: impl AsRef<Path>) -> Result<String, AssetError> {
        load_level_file(base_dir.as_ref().join(&self.file), self.rooms_y, self.rooms_x)
    }
}

pub fn crate_info() -> &'static str {
    "tileworld-assets v0.1.0"
}
