use std::collections::VecDeque;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::core::app_state::SessionState;
use crate::xr::platform::{
    ArPlatform, ArPlatformHandle, HitPose, PlatformEvent, SessionCapabilities, SessionError,
};

/// Stand-in AR platform for native builds and deterministic tests.
///
/// Session requests resolve on the next poll (granted, or denied when built
/// with [`SimulatedPlatform::denying`]); the hit-test source likewise
/// resolves one poll after it is requested, so both asynchronous boundaries
/// stay observable. A grant also emits a standing-height viewer pose so the
/// camera does not sit on the simulated floor.
pub struct SimulatedPlatform {
    queue: VecDeque<PlatformEvent>,
    current_hit: Option<HitPose>,
    deny_sessions: bool,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            current_hit: None,
            deny_sessions: false,
        }
    }

    /// A platform that rejects every session request.
    pub fn denying() -> Self {
        Self {
            deny_sessions: true,
            ..Self::new()
        }
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ArPlatform for SimulatedPlatform {
    fn request_session(&mut self, capabilities: &SessionCapabilities) {
        if self.deny_sessions {
            self.queue
                .push_back(PlatformEvent::SessionDenied(SessionError::Denied(
                    "simulated platform configured to deny sessions".to_string(),
                )));
            return;
        }

        info!(
            "Simulated session granted with capabilities {:?}",
            capabilities.required
        );
        self.queue.push_back(PlatformEvent::SessionGranted);

        // Eye height, pitched down towards the floor plane.
        let viewer = Mat4::from_rotation_translation(
            Quat::from_rotation_x(-0.4),
            Vec3::new(0.0, 1.6, 0.0),
        );
        self.queue.push_back(PlatformEvent::ViewerPose(viewer));
    }

    fn request_hit_test_source(&mut self) {
        self.queue.push_back(PlatformEvent::HitTestSourceReady);
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.queue.drain(..).collect()
    }

    fn query_hits(&mut self) -> Option<HitPose> {
        self.current_hit
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.current_hit = None;
    }

    fn inject_event(&mut self, event: PlatformEvent) {
        self.queue.push_back(event);
    }

    fn inject_hit(&mut self, hit: Option<HitPose>) {
        self.current_hit = hit;
    }
}

/// Drive the simulated platform from mouse input on native builds: a click
/// while idle is the session-starting tap, a click during an active session
/// is a select gesture, and the cursor ray's floor intersection supplies
/// the per-frame hit pose.
pub fn simulated_ar_input(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    state: Res<State<SessionState>>,
    mut platform: ResMut<ArPlatformHandle>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        match state.get() {
            SessionState::Idle => {
                platform.0.inject_event(PlatformEvent::Tap);
            }
            SessionState::Active => {
                platform.0.inject_event(PlatformEvent::Select);
            }
            SessionState::Requesting => {}
        }
    }

    if *state.get() != SessionState::Active {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        platform.0.inject_hit(None);
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    platform
        .0
        .inject_hit(mouse_to_floor_plane(cursor_pos, camera, camera_transform));
}

/// Raycast from the cursor to the y = 0 plane.
fn mouse_to_floor_plane(
    cursor_pos: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<HitPose> {
    let ray = camera.viewport_to_world(camera_transform, cursor_pos).ok()?;
    if ray.direction.y.abs() < f32::EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t <= 0.0 {
        return None;
    }
    Some(HitPose::from_translation(ray.origin + ray.direction * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_grant_arrives_on_next_poll() {
        let mut platform = SimulatedPlatform::new();
        assert!(platform.poll_events().is_empty());

        platform.request_session(&SessionCapabilities::default());
        let events = platform.poll_events();
        assert_eq!(events[0], PlatformEvent::SessionGranted);
        assert!(matches!(events[1], PlatformEvent::ViewerPose(_)));
        assert!(platform.poll_events().is_empty());
    }

    #[test]
    fn denying_platform_rejects_requests() {
        let mut platform = SimulatedPlatform::denying();
        platform.request_session(&SessionCapabilities::default());
        assert!(matches!(
            platform.poll_events().as_slice(),
            [PlatformEvent::SessionDenied(_)]
        ));
    }

    #[test]
    fn reset_discards_queued_state() {
        let mut platform = SimulatedPlatform::new();
        platform.request_session(&SessionCapabilities::default());
        platform.inject_hit(Some(HitPose::from_translation(Vec3::ONE)));

        platform.reset();

        assert!(platform.poll_events().is_empty());
        assert!(platform.query_hits().is_none());
    }
}
