use std::time::Duration;

use crate::engine::face::{RenderReport, WatchFaceEngine};
use crate::engine::timer::TickDriver;
use crate::foundation::core::Rect;
use crate::foundation::error::FaceResult;
use crate::host::channel::{FaceEvent, FaceQueue};
use crate::render::surface::Surface;
use crate::sync::receiver::log_rejection;
use crate::sync::worker::ResolverWorker;

/// Single-threaded driver that applies queued [`FaceEvent`]s to an engine in arrival order.
pub struct FaceLoop<D> {
    engine: WatchFaceEngine<D>,
    queue: FaceQueue,
    resolver: Option<ResolverWorker>,
}

impl<D: TickDriver> FaceLoop<D> {
    pub fn new(engine: WatchFaceEngine<D>, queue: FaceQueue) -> Self {
        Self {
            engine,
            queue,
            resolver: None,
        }
    }

    /// Route [`FaceEvent::DataChanged`] batches to `resolver`.
    pub fn with_resolver(mut self, resolver: ResolverWorker) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn engine(&self) -> &WatchFaceEngine<D> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WatchFaceEngine<D> {
        &mut self.engine
    }

    /// Apply one event.
    ///
    /// Weather payload failures are logged and swallowed here; the face keeps its last good
    /// weather. Other failures are returned.
    pub fn dispatch(&mut self, event: FaceEvent) -> FaceResult<()> {
        let engine = &mut self.engine;
        match event {
            FaceEvent::Activate(shape) => engine.activate(shape)?,
            FaceEvent::VisibilityChanged(visible) => engine.visibility_changed(visible),
            FaceEvent::AmbientChanged(ambient) => engine.ambient_changed(ambient),
            FaceEvent::PropertiesChanged(props) => engine.properties_changed(props),
            FaceEvent::TimeZoneChanged(offset) => engine.time_zone_changed(offset),
            FaceEvent::TimeTick => engine.time_tick(),
            FaceEvent::Tap(tap) => engine.tap(tap),
            FaceEvent::Tick(token) => {
                engine.tick(token);
            }
            FaceEvent::RenderRequested => engine.request_redraw(),
            FaceEvent::DataChanged(events) => match &self.resolver {
                Some(resolver) => resolver.submit(events)?,
                None => tracing::debug!(count = events.len(), "no resolver attached; data dropped"),
            },
            FaceEvent::WeatherUpdated(update) => {
                if let Err(err) = engine.apply_update(update) {
                    log_rejection(&err);
                }
            }
            FaceEvent::Handoff(handoff) => {
                let (snapshot, bytes) = handoff.into_parts();
                if let Err(err) = engine.weather_updated(snapshot, Some(&bytes)) {
                    log_rejection(&err);
                }
            }
            FaceEvent::Deactivate => engine.deactivate(),
        }
        Ok(())
    }

    /// Apply every event already queued. Returns how many were applied.
    pub fn pump(&mut self) -> FaceResult<usize> {
        let mut n = 0;
        while let Some(event) = self.queue.try_next() {
            self.dispatch(event)?;
            n += 1;
        }
        Ok(n)
    }

    /// Wait up to `timeout` for an event, then drain the rest. Returns how many were applied.
    pub fn wait_next(&mut self, timeout: Duration) -> FaceResult<usize> {
        let Some(event) = self.queue.next_timeout(timeout) else {
            return Ok(0);
        };
        self.dispatch(event)?;
        Ok(1 + self.pump()?)
    }

    /// Render if a transition asked for it.
    pub fn render_if_needed(
        &mut self,
        surface: &mut dyn Surface,
        bounds: Rect,
    ) -> FaceResult<Option<RenderReport>> {
        if !self.engine.needs_redraw() {
            return Ok(None);
        }
        self.engine.render(surface, bounds).map(Some)
    }

    /// Deactivate the engine and detach the resolver. Does not wait on an in-flight fetch.
    pub fn shutdown(mut self) -> WatchFaceEngine<D> {
        self.engine.deactivate();
        if let Some(resolver) = self.resolver.take() {
            resolver.detach();
        }
        self.engine
    }
}

impl<D> std::fmt::Debug for FaceLoop<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceLoop")
            .field("resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/face_loop.rs"]
mod tests;
