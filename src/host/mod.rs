pub(crate) mod channel;
pub(crate) mod face_loop;
pub(crate) mod tick;
