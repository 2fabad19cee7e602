use bevy::math::Mat4;
use serde::Deserialize;

use crate::xr::platform::{HitPose, PlatformEvent, SessionError};

/// One platform message posted by the host page's XR shim. Poses travel as
/// column-major 4x4 matrices; lifecycle messages carry the session
/// generation they belong to.
#[derive(Debug, Deserialize)]
pub struct BridgeMessage {
    pub method: String,
    #[serde(default)]
    pub generation: Option<u32>,
    #[serde(default)]
    pub matrix: Option<[f32; 16]>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of decoding one bridge message.
#[derive(Debug)]
pub enum Decoded {
    Event(PlatformEvent),
    /// Per-frame hit result; `None` means the host reported no hit.
    Hit(Option<HitPose>),
    /// Message from a previous session incarnation; drop it.
    Stale,
    Unknown(String),
}

pub fn decode(raw: &str, current_generation: u32) -> Result<Decoded, serde_json::Error> {
    let message: BridgeMessage = serde_json::from_str(raw)?;

    if let Some(generation) = message.generation {
        if generation != current_generation {
            return Ok(Decoded::Stale);
        }
    }

    Ok(match message.method.as_str() {
        "xr_tap" => Decoded::Event(PlatformEvent::Tap),
        "xr_session_granted" => Decoded::Event(PlatformEvent::SessionGranted),
        "xr_session_denied" => Decoded::Event(PlatformEvent::SessionDenied(
            SessionError::Denied(
                message
                    .reason
                    .unwrap_or_else(|| "session request rejected".to_string()),
            ),
        )),
        "xr_session_unsupported" => {
            Decoded::Event(PlatformEvent::SessionDenied(SessionError::Unsupported))
        }
        "xr_hit_test_source_ready" => Decoded::Event(PlatformEvent::HitTestSourceReady),
        "xr_viewer_pose" => match message.matrix {
            Some(matrix) => {
                Decoded::Event(PlatformEvent::ViewerPose(Mat4::from_cols_array(&matrix)))
            }
            None => Decoded::Unknown("xr_viewer_pose without matrix".to_string()),
        },
        "xr_hit_pose" => Decoded::Hit(
            message
                .matrix
                .map(|matrix| HitPose {
                    transform: Mat4::from_cols_array(&matrix),
                }),
        ),
        "xr_select" => Decoded::Event(PlatformEvent::Select),
        other => Decoded::Unknown(other.to_string()),
    })
}
