use bevy::prelude::*;

/// Capability set requested from the host platform when starting a session.
#[derive(Debug, Clone)]
pub struct SessionCapabilities {
    pub required: Vec<String>,
}

impl Default for SessionCapabilities {
    fn default() -> Self {
        Self {
            required: constants::session::REQUIRED_SESSION_CAPABILITIES
                .iter()
                .map(|capability| capability.to_string())
                .collect(),
        }
    }
}

/// Session request failure reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Denied(String),
    Unsupported,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied(reason) => write!(f, "session request denied: {reason}"),
            Self::Unsupported => write!(f, "AR sessions unsupported on this platform"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Pose produced by a hit test, expressed in the session's local reference
/// space. Ephemeral: consumed the same frame it is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPose {
    pub transform: Mat4,
}

impl HitPose {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            transform: Mat4::from_translation(translation),
        }
    }
}

/// Discrete notifications delivered by the host platform between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Generic tap anywhere on the page; first one triggers the session request.
    Tap,
    SessionGranted,
    SessionDenied(SessionError),
    HitTestSourceReady,
    ViewerPose(Mat4),
    /// Confirmation gesture delivered during an active session.
    Select,
}

/// Host AR platform capability surface.
///
/// Both request methods are asynchronous: they return immediately and the
/// resolution arrives later through `poll_events`. Between request and
/// resolution the corresponding feature is simply unavailable; nothing
/// blocks and nothing times out.
pub trait ArPlatform: Send + Sync + 'static {
    /// Begin a session request with the given capability set. Resolves to
    /// `SessionGranted` or `SessionDenied`.
    fn request_session(&mut self, capabilities: &SessionCapabilities);

    /// Begin creation of a viewer-scoped hit-test source. Resolves to
    /// `HitTestSourceReady`.
    fn request_hit_test_source(&mut self);

    /// Drain events delivered since the previous frame.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Best hit-test result for the current frame, if any.
    fn query_hits(&mut self) -> Option<HitPose>;

    /// Discard queued platform state when the AR core re-initialises. Does
    /// not end the session; the host owns its lifecycle.
    fn reset(&mut self);

    /// Deliver an event as if the host produced it. Input shims and tests
    /// only; bridges to a real host ignore this.
    fn inject_event(&mut self, _event: PlatformEvent) {}

    /// Override the current frame's hit result. Input shims and tests only.
    fn inject_hit(&mut self, _hit: Option<HitPose>) {}
}

/// Injected platform handle, chosen per target at app construction.
#[derive(Resource)]
pub struct ArPlatformHandle(pub Box<dyn ArPlatform>);
