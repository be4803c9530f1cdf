//! Mediagate Runtime
//!
//! Tracing initialisation and the wiring that turns a `GateConfig` into a
//! ready-to-use `PipelineController`. Also hosts the terminal front end's
//! prompt and notice adapters.

pub mod setup;
pub mod telemetry;
pub mod terminal;

pub use setup::initialize_gate;
pub use telemetry::init_telemetry;
