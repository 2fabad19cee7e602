//! AR session management and the host platform boundary.
//!
//! The host AR platform (session grants, hit testing, viewer poses, select
//! gestures) is reached only through the injected [`platform::ArPlatform`]
//! trait object, so the session manager never touches ambient globals and
//! the whole loop can be driven deterministically in tests.
//!
//! ## Session Flow
//!
//! ```text
//! Tap (one-shot capture)
//!   └─> request_session {hit-test, dom-overlay}
//!       ├─> SessionGranted ──> Active
//!       │     └─> lazily request hit-test source (async)
//!       │           └─> per frame: sample best hit ──> reticle controller
//!       └─> SessionDenied ───> Idle (error logged, no retry)
//! ```

/// Host platform capability trait, pose/capability/error types.
pub mod platform;

/// Session state resource and the per-frame session systems.
pub mod session;

/// Wire protocol shared with the host page's XR shim.
pub mod bridge_protocol;

/// Deterministic stand-in platform for native builds and tests.
#[cfg(not(target_arch = "wasm32"))]
pub mod simulated;

/// postMessage-backed platform implementation for WASM builds.
#[cfg(target_arch = "wasm32")]
pub mod web_bridge;
