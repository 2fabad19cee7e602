//! JSON-RPC 2.0 communication layer for the hosting frontend.
//!
//! Implements bidirectional messaging between the engine and the page that
//! embeds it via iframe postMessage: requests with IDs get responses,
//! notifications are one-way. The model-selection dropdown lives on the
//! frontend side and reaches the engine exclusively through this channel.
//!
//! ## Methods
//!
//! - `select_model`: switch to a named catalog entry (full AR core
//!   re-initialisation)
//! - `get_session_state`: current session/placement state and last error
//! - `get_fps`: current smoothed frame rate
//!
//! ## Notifications (engine → frontend)
//!
//! - `session_state_changed`, `model_placed`, `model_load_failed`,
//!   `status_update`

/// JSON-RPC 2.0 bidirectional communication system.
pub mod web_rpc;
