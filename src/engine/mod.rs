pub(crate) mod face;
pub(crate) mod liveness;
pub(crate) mod state;
pub(crate) mod timer;
