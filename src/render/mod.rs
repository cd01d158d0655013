pub mod pacer;
pub mod host;
pub mod session;
