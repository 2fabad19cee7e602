//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, session state
//! transitions, and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the AR frame loop, staged model loading,
/// and platform-specific configurations.
pub mod app_setup;

/// AR session state machine and overlay text markers.
///
/// Tracks the session from idle through the pending platform request to the
/// active per-frame loop.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
