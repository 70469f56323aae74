use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Canvas width in pixels the default grid is derived from.
pub const DEFAULT_CANVAS_WIDTH: u32 = 640;

/// Canvas height in pixels the default grid is derived from.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 480;

/// Edge length of one cell in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 20;

/// Default simulation rate.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 20;

/// Highest accepted simulation rate.
pub const MAX_TICKS_PER_SECOND: u32 = 240;

/// Board background.
pub const BOARD_BACKGROUND_COLOR: Color = Color::Rgb(0, 0, 0);

/// Cell outline color.
pub const BORDER_COLOR: Color = Color::Rgb(93, 216, 228);

/// Food color.
pub const FOOD_COLOR: Color = Color::Rgb(255, 0, 0);

/// Snake color.
pub const SNAKE_COLOR: Color = Color::Rgb(0, 255, 0);

/// Glyph used for every occupied cell.
pub const GLYPH_CELL: &str = "██";

/// Logical grid dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Derives the grid from a pixel canvas and a cell edge length.
    ///
    /// Partial cells at the right and bottom edges are dropped.
    #[must_use]
    pub fn from_canvas(canvas_width: u32, canvas_height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            width: clamp_to_u16(canvas_width / cell_size),
            height: clamp_to_u16(canvas_height / cell_size),
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::from_canvas(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, DEFAULT_CELL_SIZE)
    }
}

fn clamp_to_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    InvalidGrid { width: u16, height: u16 },
    #[error("ticks per second must be within 1..=240, got {0}")]
    InvalidTickRate(u32),
}

/// Runtime settings consumed by the host loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSize,
    pub ticks_per_second: u32,
    /// Fixed RNG seed for reproducible food placement.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            seed: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields [`Settings::default`]. An explicitly
    /// named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_settings_from_path(path),
            None => match settings_path() {
                Some(path) if path.exists() => load_settings_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Checks grid dimensions and tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::InvalidGrid {
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        if !(1..=MAX_TICKS_PER_SECOND).contains(&self.ticks_per_second) {
            return Err(ConfigError::InvalidTickRate(self.ticks_per_second));
        }

        Ok(())
    }
}

/// Returns the platform-correct settings file path.
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    Some(base)
}

fn load_settings_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    settings.validate()?;

    Ok(settings)
}
