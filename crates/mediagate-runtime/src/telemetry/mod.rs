//! Tracing initialisation

mod init;

pub use init::init_telemetry;
