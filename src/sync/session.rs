use std::collections::HashMap;

use crate::foundation::error::{FaceError, FaceResult};
use crate::sync::message::AssetRef;

/// Connection to the companion device able to turn asset references into bytes.
///
/// `fetch_asset` may block; callers keep it off the render context.
pub trait CompanionSession: Send {
    fn connect(&mut self) -> FaceResult<()> {
        Ok(())
    }

    fn fetch_asset(&mut self, asset: &AssetRef) -> FaceResult<Vec<u8>>;

    fn disconnect(&mut self) {}
}

/// In-memory session for tests and for hosts that already hold the asset bytes.
#[derive(Debug, Default)]
pub struct InMemorySession {
    assets: HashMap<AssetRef, Vec<u8>>,
    offline: bool,
    connected: bool,
    fetches: usize,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: AssetRef, bytes: Vec<u8>) {
        self.assets.insert(asset, bytes);
    }

    pub fn with_asset(mut self, asset: AssetRef, bytes: Vec<u8>) -> Self {
        self.insert(asset, bytes);
        self
    }

    /// Make `connect` fail, as when the companion is out of range.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of successful `fetch_asset` calls.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}

impl CompanionSession for InMemorySession {
    fn connect(&mut self) -> FaceResult<()> {
        if self.offline {
            return Err(FaceError::asset_resolution("companion unreachable"));
        }
        self.connected = true;
        Ok(())
    }

    fn fetch_asset(&mut self, asset: &AssetRef) -> FaceResult<Vec<u8>> {
        if !self.connected {
            return Err(FaceError::asset_resolution("session is not connected"));
        }
        let bytes = self
            .assets
            .get(asset)
            .cloned()
            .ok_or_else(|| FaceError::asset_resolution(format!("unknown asset '{}'", asset.0)))?;
        self.fetches += 1;
        Ok(bytes)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}
