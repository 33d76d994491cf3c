use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::utils::fs::write_atomic;

pub const DATA_DIR_ENV: &str = "INKCARD_DATA_DIR";
pub const STORE_FILE_NAME: &str = "cards.json";
const APP_DIR_NAME: &str = "inkcard";
const FALLBACK_DATA_DIR: &str = "flashcards";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub stroke_width: u32,
    pub stroke_color: [u8; 3],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            stroke_width: 2,
            stroke_color: [0, 0, 0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptionConfig {
    /// Height of the text band appended below the screenshot.
    pub band_height: u32,
    /// Each 8x8 glyph cell is drawn as `glyph_scale` x `glyph_scale` pixels.
    pub glyph_scale: u32,
    /// Horizontal and vertical padding inside the band.
    pub inset: u32,
    pub line_spacing: u32,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            band_height: 100,
            glyph_scale: 2,
            inset: 10,
            line_spacing: 4,
            background: [255, 255, 255],
            foreground: [0, 0, 0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Explicit path to the tesseract binary; searched on `PATH` when unset.
    pub binary: Option<PathBuf>,
    pub language: String,
    pub page_segmentation_mode: Option<u8>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: None,
            language: "eng".into(),
            page_segmentation_mode: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Pause before grabbing the screen so the app window can get out of the way.
    pub delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub caption: CaptionConfig,
    pub ocr: OcrConfig,
    pub capture: CaptureConfig,
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Env override, then config, then the platform data dir, then `./flashcards`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }

    pub fn store_path(&self) -> PathBuf {
        self.resolve_data_dir().join(STORE_FILE_NAME)
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<AppConfig>,
}

impl ConfigStore {
    pub fn load(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!(
                        "Ignoring malformed config at {} ({err}); using defaults",
                        path.display()
                    );
                    AppConfig::default()
                }
            }
        } else {
            AppConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Default location: `<platform config dir>/inkcard/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> AppConfig {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, config: AppConfig) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&config)?;
        *guard = config;
        Ok(())
    }

    fn persist(&self, data: &AppConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        write_atomic(&self.path, serialized.as_bytes())
            .with_context(|| format!("Failed to write config to {}", self.path.display()))
    }
}
