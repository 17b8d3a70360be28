//! Dialogue module hosting the session state machine, the conversation client, and telemetry.
pub mod client;
pub mod errors;
pub mod events;
pub mod input;
pub mod plugin;
pub mod session;
pub mod settings;
pub mod status;
pub mod systems;
pub mod telemetry;
pub mod types;

pub use plugin::DialoguePlugin;
