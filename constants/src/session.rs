/// Capability identifiers requested from the host AR platform.
/// Mirrors the WebXR feature descriptor strings.
pub const CAPABILITY_HIT_TEST: &str = "hit-test";
pub const CAPABILITY_OVERLAY_UI: &str = "dom-overlay";

pub const REQUIRED_SESSION_CAPABILITIES: &[&str] =
    &[CAPABILITY_HIT_TEST, CAPABILITY_OVERLAY_UI];
