pub(crate) mod message;
pub(crate) mod receiver;
pub(crate) mod session;
pub(crate) mod worker;
