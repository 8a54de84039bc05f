use std::sync::Arc;

use chrono::FixedOffset;

use crate::assets::bitmap::Bitmap;
use crate::assets::decode::decode_icon;
use crate::assets::transform::rescale;
use crate::engine::liveness::LivenessToken;
use crate::engine::state::{CurrentWeather, DecodedIcon, DeviceProperties, EngineState, IconChoice};
use crate::engine::timer::{Clock, RenderTimerScheduler, TickDriver, TimerToken};
use crate::foundation::config::FaceConfig;
use crate::foundation::core::{DisplayShape, Rect, TapType};
use crate::foundation::error::{FaceError, FaceResult};
use crate::render::frame::{FrameInput, Palette, compose_frame, paint_frame};
use crate::render::layout::FaceLayout;
use crate::render::surface::Surface;
use crate::sync::message::{IconPayload, WeatherSnapshot, WeatherUpdate};

/// Result of offering a weather update to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// The engine was torn down (or re-activated) since the update was dispatched.
    Discarded,
}

/// What a render pass ended up drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderReport {
    pub icon_choice: IconChoice,
    pub anti_alias: bool,
    pub ambient: bool,
}

#[derive(Debug)]
struct ActiveFace {
    state: EngineState,
    layout: FaceLayout,
    weather: Option<CurrentWeather>,
}

/// Watch-face state machine for one display.
///
/// Every transition takes `&mut self`, so transitions are serialized by construction. Hosts that
/// receive callbacks on several threads funnel them through [`crate::FaceLoop`].
pub struct WatchFaceEngine<D> {
    config: FaceConfig,
    clock: Arc<dyn Clock>,
    timer: RenderTimerScheduler<D>,
    liveness: LivenessToken,
    active: Option<ActiveFace>,
    needs_redraw: bool,
}

impl<D: TickDriver> WatchFaceEngine<D> {
    pub fn new(config: FaceConfig, clock: Arc<dyn Clock>, driver: D) -> FaceResult<Self> {
        config.validate()?;
        let timer =
            RenderTimerScheduler::new(driver, Arc::clone(&clock), config.interactive_interval_ms);
        Ok(Self {
            config,
            clock,
            timer,
            liveness: LivenessToken::new(),
            active: None,
            needs_redraw: false,
        })
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    /// Handle shared with work that completes off the render context.
    pub fn liveness(&self) -> LivenessToken {
        self.liveness.clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> Option<&EngineState> {
        self.active.as_ref().map(|a| &a.state)
    }

    pub fn layout(&self) -> Option<&FaceLayout> {
        self.active.as_ref().map(|a| &a.layout)
    }

    pub fn current_weather(&self) -> Option<&CurrentWeather> {
        self.active.as_ref().and_then(|a| a.weather.as_ref())
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.current_weather().map(|w| &w.snapshot)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn timer(&self) -> &RenderTimerScheduler<D> {
        &self.timer
    }

    pub fn driver(&self) -> &D {
        self.timer.driver()
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.timer.driver_mut()
    }

    /// Bring the engine up for a display. Fails if it is already active.
    pub fn activate(&mut self, shape: DisplayShape) -> FaceResult<()> {
        if self.active.is_some() {
            return Err(FaceError::validation("engine is already active"));
        }
        let state = EngineState::new(shape, self.clock.local_offset());
        self.active = Some(ActiveFace {
            state,
            layout: FaceLayout::for_shape(shape),
            weather: None,
        });
        let epoch = self.liveness.revive();
        self.needs_redraw = true;
        tracing::debug!(?shape, epoch, "face activated");
        Ok(())
    }

    pub fn visibility_changed(&mut self, visible: bool) {
        let clock = Arc::clone(&self.clock);
        let Some(active) = self.active.as_mut() else {
            tracing::debug!(visible, "visibility change before activation; ignored");
            return;
        };
        let state = &mut active.state;
        if visible {
            if !state.time_zone_receiver_registered {
                state.time_zone_receiver_registered = true;
                tracing::trace!("time zone listener registered");
            }
            // The zone may have changed while we were hidden.
            state.time_zone = clock.local_offset();
        } else if state.time_zone_receiver_registered {
            state.time_zone_receiver_registered = false;
            tracing::trace!("time zone listener unregistered");
        }
        state.visible = visible;
        tracing::debug!(visible, "visibility changed");
        self.update_timer();
    }

    pub fn ambient_changed(&mut self, ambient: bool) {
        let Some(active) = self.active.as_mut() else {
            tracing::debug!(ambient, "ambient change before activation; ignored");
            return;
        };
        active.state.ambient = ambient;
        tracing::debug!(ambient, "ambient mode changed");
        self.update_timer();
        self.invalidate();
    }

    pub fn properties_changed(&mut self, props: DeviceProperties) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.state.low_bit_ambient = props.low_bit_ambient;
        active.state.burn_in_protection = props.burn_in_protection;
        tracing::debug!(
            low_bit_ambient = props.low_bit_ambient,
            burn_in_protection = props.burn_in_protection,
            "device properties"
        );
    }

    /// Time zone broadcast. Only honored while the listener is registered (i.e. while visible).
    pub fn time_zone_changed(&mut self, offset: FixedOffset) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.state.time_zone_receiver_registered {
            tracing::debug!(%offset, "time zone change while unregistered; ignored");
            return;
        }
        active.state.time_zone = offset;
        self.invalidate();
    }

    /// Host's once-a-minute tick, delivered in ambient mode.
    pub fn time_tick(&mut self) {
        if self.active.is_some() {
            self.invalidate();
        }
    }

    pub fn tap(&mut self, tap: TapType) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if tap == TapType::Tap {
            active.state.tap_count = active.state.tap_count.saturating_add(1);
        }
        tracing::trace!(?tap, taps = active.state.tap_count, "tap");
        self.invalidate();
    }

    /// Apply a snapshot with raw icon bytes, as delivered by the cross-process handoff.
    ///
    /// Nothing changes unless decode and rescale both succeed.
    pub fn weather_updated(
        &mut self,
        snapshot: WeatherSnapshot,
        icon_bytes: Option<&[u8]>,
    ) -> FaceResult<UpdateOutcome> {
        if self.active.is_none() {
            tracing::debug!("weather update while inactive; discarded");
            return Ok(UpdateOutcome::Discarded);
        }
        let bitmap = decode_icon(icon_bytes)?;
        self.install(snapshot, &bitmap)
    }

    /// Apply an update produced by the asset resolver.
    pub fn apply_update(&mut self, update: WeatherUpdate) -> FaceResult<UpdateOutcome> {
        if let Some(epoch) = update.epoch()
            && !self.liveness.is_current(epoch)
        {
            tracing::debug!(epoch, "stale weather update; discarded");
            return Ok(UpdateOutcome::Discarded);
        }
        if self.active.is_none() {
            tracing::debug!("weather update while inactive; discarded");
            return Ok(UpdateOutcome::Discarded);
        }
        let WeatherUpdate { snapshot, icon, .. } = update;
        match icon {
            IconPayload::Decoded(bitmap) => self.install(snapshot, &bitmap),
            IconPayload::Encoded(bytes) => {
                let bitmap = decode_icon(Some(&bytes))?;
                self.install(snapshot, &bitmap)
            }
        }
    }

    fn install(&mut self, snapshot: WeatherSnapshot, decoded: &Bitmap) -> FaceResult<UpdateOutcome> {
        let scaled = rescale(
            decoded,
            self.config.icon_width,
            self.config.icon_height,
            self.config.scale_mode,
        )?;
        let Some(active) = self.active.as_mut() else {
            return Ok(UpdateOutcome::Discarded);
        };
        tracing::info!(
            weather_id = snapshot.weather_id,
            high = snapshot.high_temp,
            low = snapshot.low_temp,
            "weather applied"
        );
        let mut icon = DecodedIcon::new(scaled);
        // No timer transition will follow while ambient or hidden, so build the gray icon now.
        if !active.state.should_timer_run() {
            icon.ensure_ambient();
        }
        active.weather = Some(CurrentWeather { snapshot, icon });
        self.invalidate();
        Ok(UpdateOutcome::Applied)
    }

    /// A scheduled tick arrived. Returns `false` for stale or already-fired tokens.
    pub fn tick(&mut self, token: TimerToken) -> bool {
        if !self.timer.fire(token) {
            tracing::trace!(token = token.id(), "stale tick ignored");
            return false;
        }
        self.invalidate();
        self.timer.cancel_pending();
        let should_run = self
            .active
            .as_ref()
            .is_some_and(|a| a.state.should_timer_run());
        if should_run && let Err(err) = self.timer.schedule_second_aligned() {
            self.timer_failed(&err);
        }
        self.sync_pending();
        true
    }

    /// Tear down. Safe to call more than once.
    pub fn deactivate(&mut self) {
        self.timer.cancel_pending();
        self.liveness.kill();
        if let Some(mut active) = self.active.take() {
            active.state.time_zone_receiver_registered = false;
            tracing::debug!("face deactivated");
        }
        self.needs_redraw = false;
    }

    /// Full repaint onto `surface`.
    pub fn render(&mut self, surface: &mut dyn Surface, bounds: Rect) -> FaceResult<RenderReport> {
        let Some(active) = self.active.as_ref() else {
            return Err(FaceError::validation("render requested before activation"));
        };
        let state = &active.state;
        let now = self.clock.now_utc().with_timezone(&state.time_zone);
        let frame = compose_frame(FrameInput {
            now,
            ambient: state.ambient,
            anti_alias: state.anti_alias(),
            weather: active.weather.as_ref(),
            layout: &active.layout,
            palette: Palette {
                background: self.config.background,
                foreground: self.config.foreground,
                ambient_seconds: self.config.ambient_seconds,
            },
            bounds,
        });
        paint_frame(&frame, surface)?;
        if frame.icon_choice == IconChoice::InteractiveFallback {
            tracing::debug!("ambient icon not ready; drew interactive icon");
        }
        let report = RenderReport {
            icon_choice: frame.icon_choice,
            anti_alias: frame.anti_alias,
            ambient: frame.ambient,
        };
        self.needs_redraw = false;
        Ok(report)
    }

    /// Ask for a repaint on the next render opportunity.
    pub fn request_redraw(&mut self) {
        if self.active.is_some() {
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Cancel any tick, then start ticking again if the face should be updating every second.
    /// When it should not, prepare the ambient icon.
    fn update_timer(&mut self) {
        self.timer.cancel_pending();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.state.should_timer_run() {
            if let Err(err) = self.timer.schedule_immediate() {
                self.timer_failed(&err);
            }
        } else if let Some(weather) = active.weather.as_mut()
            && weather.icon.ensure_ambient()
        {
            tracing::debug!("ambient icon computed");
        }
        self.sync_pending();
    }

    fn timer_failed(&mut self, err: &FaceError) {
        tracing::warn!(error = %err, kind = err.kind(), "periodic redraw unavailable");
        self.invalidate();
    }

    fn sync_pending(&mut self) {
        let pending = self.timer.pending();
        if let Some(active) = self.active.as_mut() {
            active.state.pending_timer = pending;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/face.rs"]
mod tests;
