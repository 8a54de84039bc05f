use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::Context;

use crate::engine::liveness::LivenessToken;
use crate::foundation::error::{FaceError, FaceResult};
use crate::sync::message::DataEvent;
use crate::sync::receiver::{AssetSyncReceiver, WeatherPublisher, log_rejection};
use crate::sync::session::CompanionSession;

/// Runs asset resolution on its own thread so a slow companion never stalls redraw.
///
/// Batches queued while a resolution is in progress are merged and only the newest weather event
/// among them is resolved. Completions are stamped with the engine epoch that was current when the
/// batch was picked up; the engine drops them if it was torn down in the meantime.
pub struct ResolverWorker {
    tx: Option<mpsc::Sender<Vec<DataEvent>>>,
    join: Option<JoinHandle<()>>,
}

impl ResolverWorker {
    pub fn spawn<S, P>(
        mut receiver: AssetSyncReceiver<S>,
        mut publisher: P,
        liveness: LivenessToken,
    ) -> FaceResult<Self>
    where
        S: CompanionSession + 'static,
        P: WeatherPublisher + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Vec<DataEvent>>();
        let join = std::thread::Builder::new()
            .name("sunshine-resolver".to_string())
            .spawn(move || {
                while let Ok(mut batch) = rx.recv() {
                    while let Ok(more) = rx.try_recv() {
                        batch.extend(more);
                    }
                    let Some(epoch) = liveness.current() else {
                        tracing::debug!("engine not live; dropping data batch");
                        continue;
                    };
                    let update = match receiver.resolve_batch(&batch) {
                        Ok(Some(update)) => update,
                        Ok(None) => continue,
                        Err(err) => {
                            log_rejection(&err);
                            continue;
                        }
                    };
                    if !liveness.is_current(epoch) {
                        tracing::debug!(epoch, "engine went away during resolution; discarding");
                        continue;
                    }
                    if let Err(err) = publisher.publish(update.with_epoch(epoch)) {
                        tracing::warn!(error = %err, "weather publisher closed; stopping resolver");
                        break;
                    }
                }
            })
            .context("spawn resolver thread")?;
        Ok(Self {
            tx: Some(tx),
            join: Some(join),
        })
    }

    /// Queue a delivered batch for resolution.
    pub fn submit(&self, events: Vec<DataEvent>) -> FaceResult<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| FaceError::validation("resolver worker is shut down"))?;
        tx.send(events)
            .map_err(|_| FaceError::Other(anyhow::anyhow!("resolver thread exited")))
    }

    /// Stop accepting batches and wait for the in-flight one to finish.
    ///
    /// Blocks for as long as the companion takes to answer an in-flight fetch.
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            tracing::error!("resolver thread panicked");
        }
    }

    /// Stop accepting batches without waiting. An in-flight fetch finishes on its own; its result
    /// is dropped once the engine is torn down.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.tx.take();
        if self.join.take().is_some() {
            tracing::debug!("resolver thread detached");
        }
    }
}

/// Dropping detaches the thread.
impl Drop for ResolverWorker {
    fn drop(&mut self) {
        self.release();
    }
}
