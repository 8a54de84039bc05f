use std::collections::BTreeMap;

use anyhow::Context;

use crate::assets::bitmap::Bitmap;
use crate::assets::decode::encode_png;
use crate::foundation::error::FaceResult;

/// Opaque handle to a binary blob held by the companion device.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A single value inside a companion data item.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    Int(i64),
    Text(String),
    Asset(AssetRef),
}

/// Keyed payload of a data item.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DataMap(BTreeMap<String, DataValue>);

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: DataValue) {
        self.0.insert(key.into(), value);
    }

    pub fn with_int(mut self, key: impl Into<String>, v: i64) -> Self {
        self.insert(key, DataValue::Int(v));
        self
    }

    pub fn with_text(mut self, key: impl Into<String>, v: impl Into<String>) -> Self {
        self.insert(key, DataValue::Text(v.into()));
        self
    }

    pub fn with_asset(mut self, key: impl Into<String>, v: AssetRef) -> Self {
        self.insert(key, DataValue::Asset(v));
        self
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.0.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            DataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            DataValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_asset(&self, key: &str) -> Option<&AssetRef> {
        match self.0.get(key)? {
            DataValue::Asset(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataEventKind {
    Changed,
    Deleted,
}

/// One change notification from the companion messaging channel.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataEvent {
    pub kind: DataEventKind,
    /// Logical path of the data item, e.g. `/weather-update`.
    pub path: String,
    pub data: DataMap,
}

impl DataEvent {
    pub fn changed(path: impl Into<String>, data: DataMap) -> Self {
        Self {
            kind: DataEventKind::Changed,
            path: path.into(),
            data,
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            kind: DataEventKind::Deleted,
            path: path.into(),
            data: DataMap::new(),
        }
    }
}

/// The weather fields currently shown by the face.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeatherSnapshot {
    pub weather_id: i32,
    pub high_temp: i32,
    pub low_temp: i32,
    pub short_description: String,
    /// Source asset of the icon; `None` when the icon travelled inline as bytes.
    pub icon_asset: Option<AssetRef>,
}

/// Icon carried by a [`WeatherUpdate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconPayload {
    /// Already decoded by the receiver; only needs rescaling.
    Decoded(Bitmap),
    /// Encoded image bytes still to be decoded by the engine.
    Encoded(Vec<u8>),
}

/// A complete, all-or-nothing weather update crossing into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherUpdate {
    pub snapshot: WeatherSnapshot,
    pub icon: IconPayload,
    pub(crate) epoch: Option<u64>,
}

impl WeatherUpdate {
    pub fn decoded(snapshot: WeatherSnapshot, icon: Bitmap) -> Self {
        Self {
            snapshot,
            icon: IconPayload::Decoded(icon),
            epoch: None,
        }
    }

    pub fn encoded(snapshot: WeatherSnapshot, bytes: Vec<u8>) -> Self {
        Self {
            snapshot,
            icon: IconPayload::Encoded(bytes),
            epoch: None,
        }
    }

    /// Stamp the engine activation epoch this update was resolved for.
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = Some(epoch);
        self
    }

    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }

    /// Convert into the cross-process message, PNG-encoding a decoded icon.
    pub fn to_handoff(&self) -> FaceResult<WeatherHandoff> {
        let weather_image = match &self.icon {
            IconPayload::Decoded(bmp) => encode_png(bmp)?,
            IconPayload::Encoded(bytes) => bytes.clone(),
        };
        Ok(WeatherHandoff {
            weather_id: self.snapshot.weather_id,
            max_temp: self.snapshot.high_temp,
            min_temp: self.snapshot.low_temp,
            short_desc: self.snapshot.short_description.clone(),
            weather_image,
        })
    }
}

/// Message handed from the resolving side to the rendering side when they live in different
/// processes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeatherHandoff {
    #[serde(default)]
    pub weather_id: i32,
    pub max_temp: i32,
    pub min_temp: i32,
    pub short_desc: String,
    /// Encoded icon bytes (PNG).
    pub weather_image: Vec<u8>,
}

impl WeatherHandoff {
    pub fn to_json(&self) -> FaceResult<String> {
        Ok(serde_json::to_string(self).context("serialize weather handoff")?)
    }

    pub fn from_json(s: &str) -> FaceResult<Self> {
        Ok(serde_json::from_str(s).context("parse weather handoff")?)
    }

    /// Split into the snapshot and the raw icon bytes expected by `weather_updated`.
    pub fn into_parts(self) -> (WeatherSnapshot, Vec<u8>) {
        (
            WeatherSnapshot {
                weather_id: self.weather_id,
                high_temp: self.max_temp,
                low_temp: self.min_temp,
                short_description: self.short_desc,
                icon_asset: None,
            },
            self.weather_image,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/message.rs"]
mod tests;
