//! Sunshine is the core of a weather watch face.
//!
//! It pulls weather snapshots and their icons from a companion device, turns the icon into the
//! bitmaps the face needs, and drives a watch-face state machine that repaints the clock and the
//! weather on every tick:
//!
//! - Feed companion [`DataEvent`]s to an [`AssetSyncReceiver`] (directly or through a
//!   [`ResolverWorker`]) to get a [`WeatherUpdate`]
//! - Apply it to a [`WatchFaceEngine`] together with visibility, ambient, and tick transitions
//! - Paint with [`WatchFaceEngine::render`] onto any [`Surface`], e.g. [`CpuSurface`]
//!
//! Hosts that deliver callbacks on several threads use [`face_channel`] and a [`FaceLoop`].
#![forbid(unsafe_code)]

mod assets;
mod engine;
mod foundation;
mod host;
mod render;
mod sync;

pub use crate::foundation::config::{DataKeys, FaceConfig, INTERACTIVE_UPDATE_RATE_MS};
pub use crate::foundation::core::{DisplayShape, PixelSize, Point, Rect, Rgba8, TapType, Vec2};
pub use crate::foundation::error::{FaceError, FaceResult};

pub use crate::assets::bitmap::Bitmap;
pub use crate::assets::decode::{decode_icon, encode_png};
pub use crate::assets::transform::{ScaleMode, desaturate, rescale};

pub use crate::sync::message::{
    AssetRef, DataEvent, DataEventKind, DataMap, DataValue, IconPayload, WeatherHandoff,
    WeatherSnapshot, WeatherUpdate,
};
pub use crate::sync::receiver::{AssetSyncReceiver, ReceiveOutcome, WeatherPublisher};
pub use crate::sync::session::{CompanionSession, InMemorySession};
pub use crate::sync::worker::ResolverWorker;

pub use crate::engine::face::{RenderReport, UpdateOutcome, WatchFaceEngine};
pub use crate::engine::liveness::LivenessToken;
pub use crate::engine::state::{
    CurrentWeather, DecodedIcon, DeviceProperties, EngineState, IconChoice,
};
pub use crate::engine::timer::{
    Clock, ManualClock, ManualTickDriver, RenderTimerScheduler, SystemClock, TickDriver,
    TimerToken, second_aligned_delay_ms,
};

pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::{
    FaceFrame, FrameInput, Palette, TextItem, TextRole, compose_frame, format_date, format_temp,
    paint_frame,
};
pub use crate::render::layout::{FaceLayout, Slot};
pub use crate::render::surface::{RecordingSurface, Surface, SurfaceOp};

pub use crate::host::channel::{FaceCallbacks, FaceEvent, FaceHandle, FaceQueue, face_channel};
pub use crate::host::face_loop::FaceLoop;
pub use crate::host::tick::ThreadTickDriver;
