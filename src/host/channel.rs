use std::sync::mpsc;

use chrono::FixedOffset;

use crate::engine::state::DeviceProperties;
use crate::engine::timer::TimerToken;
use crate::foundation::core::{DisplayShape, TapType};
use crate::foundation::error::{FaceError, FaceResult};
use crate::sync::message::{DataEvent, WeatherHandoff, WeatherUpdate};
use crate::sync::receiver::WeatherPublisher;

/// Everything that can happen to a face, as seen from the host.
#[derive(Debug)]
pub enum FaceEvent {
    Activate(DisplayShape),
    VisibilityChanged(bool),
    AmbientChanged(bool),
    PropertiesChanged(DeviceProperties),
    TimeZoneChanged(FixedOffset),
    /// Once-a-minute host tick.
    TimeTick,
    Tap(TapType),
    /// A redraw tick armed by the engine.
    Tick(TimerToken),
    RenderRequested,
    /// Companion data items changed; routed to the resolver.
    DataChanged(Vec<DataEvent>),
    /// Completed asset resolution.
    WeatherUpdated(WeatherUpdate),
    /// Weather handed over from another process.
    Handoff(WeatherHandoff),
    Deactivate,
}

/// Platform callbacks a face needs from its host, reduced to what the engine consumes.
pub trait FaceCallbacks {
    fn notify_visibility(&self, visible: bool) -> FaceResult<()>;
    fn notify_ambient(&self, ambient: bool) -> FaceResult<()>;
    fn notify_properties(&self, props: DeviceProperties) -> FaceResult<()>;
    fn notify_tap(&self, tap: TapType) -> FaceResult<()>;
    fn request_render(&self) -> FaceResult<()>;
    fn notify_weather_update(&self, update: WeatherUpdate) -> FaceResult<()>;
}

/// Cloneable sending side of a face event queue.
#[derive(Clone, Debug)]
pub struct FaceHandle {
    tx: mpsc::Sender<FaceEvent>,
}

impl FaceHandle {
    pub fn post(&self, event: FaceEvent) -> FaceResult<()> {
        self.tx
            .send(event)
            .map_err(|_| FaceError::Other(anyhow::anyhow!("face event queue closed")))
    }
}

impl FaceCallbacks for FaceHandle {
    fn notify_visibility(&self, visible: bool) -> FaceResult<()> {
        self.post(FaceEvent::VisibilityChanged(visible))
    }

    fn notify_ambient(&self, ambient: bool) -> FaceResult<()> {
        self.post(FaceEvent::AmbientChanged(ambient))
    }

    fn notify_properties(&self, props: DeviceProperties) -> FaceResult<()> {
        self.post(FaceEvent::PropertiesChanged(props))
    }

    fn notify_tap(&self, tap: TapType) -> FaceResult<()> {
        self.post(FaceEvent::Tap(tap))
    }

    fn request_render(&self) -> FaceResult<()> {
        self.post(FaceEvent::RenderRequested)
    }

    fn notify_weather_update(&self, update: WeatherUpdate) -> FaceResult<()> {
        self.post(FaceEvent::WeatherUpdated(update))
    }
}

impl WeatherPublisher for FaceHandle {
    fn publish(&mut self, update: WeatherUpdate) -> FaceResult<()> {
        self.notify_weather_update(update)
    }
}

/// Receiving side; owned by the loop that drives the engine.
#[derive(Debug)]
pub struct FaceQueue {
    rx: mpsc::Receiver<FaceEvent>,
}

impl FaceQueue {
    pub(crate) fn try_next(&self) -> Option<FaceEvent> {
        self.rx.try_recv().ok()
    }

    pub(crate) fn next_timeout(&self, timeout: std::time::Duration) -> Option<FaceEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

pub fn face_channel() -> (FaceHandle, FaceQueue) {
    let (tx, rx) = mpsc::channel();
    (FaceHandle { tx }, FaceQueue { rx })
}
