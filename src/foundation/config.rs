use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::transform::ScaleMode;
use crate::foundation::core::{PixelSize, Rgba8};
use crate::foundation::error::{FaceError, FaceResult};

/// Interactive redraw interval: once a second, since seconds are displayed.
pub const INTERACTIVE_UPDATE_RATE_MS: u64 = 1000;

/// Map keys used to pull weather fields out of a companion data item.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DataKeys {
    /// Integer condition id.
    pub weather_id: String,
    /// Integer high temperature.
    pub max_temp: String,
    /// Integer low temperature.
    pub min_temp: String,
    /// Short text description.
    pub short_desc: String,
    /// Asset reference to the encoded icon.
    pub icon_asset: String,
}

impl Default for DataKeys {
    fn default() -> Self {
        Self {
            weather_id: "weather-id".to_string(),
            max_temp: "max-temp".to_string(),
            min_temp: "min-temp".to_string(),
            short_desc: "short-description".to_string(),
            icon_asset: "icon-asset".to_string(),
        }
    }
}

/// Face configuration.
///
/// Every field has a default, so a partial JSON document is enough. Environment overrides use the
/// `SUNSHINE_` prefix.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Target icon width after rescale.
    pub icon_width: u32,
    /// Target icon height after rescale.
    pub icon_height: u32,
    /// How the decoded icon is fitted into the target size.
    pub scale_mode: ScaleMode,
    /// Interactive tick interval; ticks align to multiples of it on the wall clock.
    pub interactive_interval_ms: u64,
    /// Data item path carrying weather updates.
    pub weather_path: String,
    /// Data map keys.
    pub keys: DataKeys,
    /// Background fill for every render pass.
    pub background: Rgba8,
    /// Text color for interactive mode.
    pub foreground: Rgba8,
    /// Seconds color while ambient.
    pub ambient_seconds: Rgba8,
    /// Optional TTF/OTF used by the raster surface for text.
    pub font_path: Option<PathBuf>,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            icon_width: 64,
            icon_height: 64,
            scale_mode: ScaleMode::Independent,
            interactive_interval_ms: INTERACTIVE_UPDATE_RATE_MS,
            weather_path: "/weather-update".to_string(),
            keys: DataKeys::default(),
            background: Rgba8::BLACK,
            foreground: Rgba8::WHITE,
            ambient_seconds: Rgba8::GRAY,
            font_path: None,
        }
    }
}

impl FaceConfig {
    pub fn from_json_str(s: &str) -> FaceResult<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse face config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FaceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read face config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `SUNSHINE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> FaceResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `SUNSHINE_*` overrides from an arbitrary lookup. Unparsable numbers are ignored.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> FaceResult<Self> {
        if let Some(v) = lookup("SUNSHINE_ICON_WIDTH").and_then(|v| v.parse::<u32>().ok()) {
            self.icon_width = v;
        }
        if let Some(v) = lookup("SUNSHINE_ICON_HEIGHT").and_then(|v| v.parse::<u32>().ok()) {
            self.icon_height = v;
        }
        if let Some(v) =
            lookup("SUNSHINE_INTERACTIVE_INTERVAL_MS").and_then(|v| v.parse::<u64>().ok())
        {
            self.interactive_interval_ms = v;
        }
        if let Some(v) = lookup("SUNSHINE_WEATHER_PATH").filter(|v| !v.is_empty()) {
            self.weather_path = v;
        }
        if let Some(v) = lookup("SUNSHINE_FONT_PATH").filter(|v| !v.is_empty()) {
            self.font_path = Some(PathBuf::from(v));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> FaceResult<()> {
        PixelSize::new(self.icon_width, self.icon_height)
            .map_err(|_| FaceError::validation("icon_width and icon_height must be > 0"))?;
        if self.interactive_interval_ms == 0 {
            return Err(FaceError::validation("interactive_interval_ms must be > 0"));
        }
        if !self.weather_path.starts_with('/') {
            return Err(FaceError::validation("weather_path must start with '/'"));
        }
        Ok(())
    }

    pub fn icon_size(&self) -> PixelSize {
        PixelSize {
            width: self.icon_width,
            height: self.icon_height,
        }
    }

    /// Read the configured font, if any.
    pub fn load_font_bytes(&self) -> FaceResult<Option<Vec<u8>>> {
        let Some(path) = &self.font_path else {
            return Ok(None);
        };
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
