use crate::assets::decode::decode_icon;
use crate::foundation::config::{DataKeys, FaceConfig};
use crate::foundation::error::{FaceError, FaceResult};
use crate::sync::message::{DataEvent, DataEventKind, DataMap, WeatherSnapshot, WeatherUpdate};
use crate::sync::session::CompanionSession;

/// Destination for fully resolved weather updates.
pub trait WeatherPublisher {
    fn publish(&mut self, update: WeatherUpdate) -> FaceResult<()>;
}

/// Collecting publisher, handy for tests and for hosts that poll.
impl WeatherPublisher for Vec<WeatherUpdate> {
    fn publish(&mut self, update: WeatherUpdate) -> FaceResult<()> {
        self.push(update);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// A complete update was handed to the publisher.
    Published { weather_id: i32 },
    /// No changed event in the batch matched the weather path.
    Ignored,
}

/// Turns companion change notifications into [`WeatherUpdate`]s.
pub struct AssetSyncReceiver<S> {
    session: S,
    weather_path: String,
    keys: DataKeys,
}

impl<S: CompanionSession> AssetSyncReceiver<S> {
    pub fn new(session: S, config: &FaceConfig) -> Self {
        Self {
            session,
            weather_path: config.weather_path.clone(),
            keys: config.keys.clone(),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Handle a delivered batch and publish at most one update.
    ///
    /// Failures are logged and returned; nothing is published for them, so the engine keeps the
    /// previous snapshot.
    #[tracing::instrument(level = "debug", skip_all, fields(events = events.len()))]
    pub fn on_data_changed(
        &mut self,
        events: &[DataEvent],
        publisher: &mut dyn WeatherPublisher,
    ) -> FaceResult<ReceiveOutcome> {
        let update = match self.resolve_batch(events) {
            Ok(Some(update)) => update,
            Ok(None) => return Ok(ReceiveOutcome::Ignored),
            Err(err) => {
                log_rejection(&err);
                return Err(err);
            }
        };
        let weather_id = update.snapshot.weather_id;
        publisher.publish(update)?;
        tracing::info!(weather_id, "published weather update");
        Ok(ReceiveOutcome::Published { weather_id })
    }

    /// Resolve the last matching event of a batch without publishing it.
    pub fn resolve_batch(&mut self, events: &[DataEvent]) -> FaceResult<Option<WeatherUpdate>> {
        let Some(event) = self.latest_match(events) else {
            tracing::debug!(path = %self.weather_path, "no weather event in batch");
            return Ok(None);
        };
        self.resolve(&event.data).map(Some)
    }

    fn latest_match<'a>(&self, events: &'a [DataEvent]) -> Option<&'a DataEvent> {
        let mut matched = events
            .iter()
            .filter(|e| e.kind == DataEventKind::Changed && e.path == self.weather_path);
        let last = matched.next_back();
        let skipped = matched.count();
        if skipped > 0 {
            tracing::debug!(skipped, "superseded weather events in batch");
        }
        last
    }

    fn resolve(&mut self, data: &DataMap) -> FaceResult<WeatherUpdate> {
        let weather_id = int_field(data, &self.keys.weather_id)?;
        let high_temp = int_field(data, &self.keys.max_temp)?;
        let low_temp = int_field(data, &self.keys.min_temp)?;
        let short_description = data
            .get_text(&self.keys.short_desc)
            .ok_or_else(|| FaceError::missing_field(self.keys.short_desc.as_str()))?
            .to_string();
        let asset = data.get_asset(&self.keys.icon_asset).cloned().ok_or_else(|| {
            FaceError::asset_resolution(format!(
                "data item has no '{}' asset",
                self.keys.icon_asset
            ))
        })?;

        self.session
            .connect()
            .map_err(|err| session_error("connect to companion", err))?;
        let fetched = self.session.fetch_asset(&asset);
        self.session.disconnect();
        let bytes = fetched.map_err(|err| session_error("fetch icon asset", err))?;
        if bytes.is_empty() {
            return Err(FaceError::asset_resolution(format!(
                "asset '{}' resolved to zero bytes",
                asset.0
            )));
        }

        let icon = decode_icon(Some(&bytes))?;
        tracing::debug!(
            asset = %asset.0,
            width = icon.width(),
            height = icon.height(),
            "resolved weather icon"
        );
        Ok(WeatherUpdate::decoded(
            WeatherSnapshot {
                weather_id,
                high_temp,
                low_temp,
                short_description,
                icon_asset: Some(asset),
            },
            icon,
        ))
    }
}

fn int_field(data: &DataMap, key: &str) -> FaceResult<i32> {
    let v = data
        .get_int(key)
        .ok_or_else(|| FaceError::missing_field(key))?;
    i32::try_from(v).map_err(|_| FaceError::validation(format!("'{key}' out of range: {v}")))
}

/// Any companion session failure is an asset resolution failure.
fn session_error(stage: &str, err: FaceError) -> FaceError {
    match err {
        FaceError::AssetResolution(_) => err,
        other => FaceError::asset_resolution(format!("{stage}: {other:#}")),
    }
}

pub(crate) fn log_rejection(err: &FaceError) {
    match err {
        FaceError::NullAsset => {
            tracing::error!(kind = err.kind(), "weather update without icon bytes")
        }
        _ => tracing::warn!(kind = err.kind(), error = %err, "weather update rejected"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/receiver.rs"]
mod tests;
