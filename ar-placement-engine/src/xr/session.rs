use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::engine::core::app_state::SessionState;
use crate::engine::loading::model_loader::{ModelLoader, ModelSelectionEvent, SelectedModel};
use crate::engine::loading::progress::ModelLoadProgress;
use crate::engine::scene::reticle::Reticle;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::placement::state::{PlaceableModel, PlacementState};
use crate::xr::platform::{
    ArPlatformHandle, HitPose, PlatformEvent, SessionCapabilities, SessionError,
};

/// Lifecycle of the lazily created hit-test source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HitTestSourceState {
    #[default]
    NotRequested,
    Pending,
    Ready,
}

/// All mutable AR session bookkeeping, owned in one place and handed to the
/// session systems by exclusive reference through the ECS.
#[derive(Resource)]
pub struct ArSessionState {
    /// One-shot tap capture; disarmed after the first session request so
    /// later taps never re-trigger one.
    pub request_armed: bool,
    pub hit_test_source: HitTestSourceState,
    /// Best hit pose sampled this frame. Overwritten every frame.
    pub current_hit: Option<HitPose>,
    pub last_error: Option<SessionError>,
    /// Incarnation counter, bumped on every re-initialisation so stale
    /// asynchronous platform responses can be recognised and dropped.
    pub generation: u32,
}

impl Default for ArSessionState {
    fn default() -> Self {
        Self {
            request_armed: true,
            hit_test_source: HitTestSourceState::default(),
            current_hit: None,
            last_error: None,
            generation: 0,
        }
    }
}

impl ArSessionState {
    /// Reset for a fresh AR core incarnation. The generation bump fences
    /// off anything still in flight from the previous one.
    pub fn reinitialize(&mut self) {
        self.request_armed = true;
        self.hit_test_source = HitTestSourceState::NotRequested;
        self.current_hit = None;
        self.last_error = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Platform notification rebroadcast into the ECS event stream.
#[derive(Event, Debug, Clone)]
pub struct ArPlatformNotification(pub PlatformEvent);

/// Select gesture extracted from the platform stream.
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectEvent;

/// Move this frame's platform events into ECS events. Select gestures get
/// their own stream so the placement controller reads nothing else.
pub fn drain_platform_events(
    mut platform: ResMut<ArPlatformHandle>,
    mut notifications: EventWriter<ArPlatformNotification>,
    mut selects: EventWriter<SelectEvent>,
) {
    for event in platform.0.poll_events() {
        if matches!(event, PlatformEvent::Select) {
            selects.write(SelectEvent);
        } else {
            notifications.write(ArPlatformNotification(event));
        }
    }
}

/// Drive the Idle -> Requesting -> Active state machine from platform
/// notifications. The first tap requests the session and disarms the
/// capture; a denial logs, records the error, and returns to Idle for good.
pub fn handle_session_lifecycle(
    mut notifications: EventReader<ArPlatformNotification>,
    mut platform: ResMut<ArPlatformHandle>,
    mut session: ResMut<ArSessionState>,
    state: Res<State<SessionState>>,
    mut next_state: ResMut<NextState<SessionState>>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for notification in notifications.read() {
        match &notification.0 {
            PlatformEvent::Tap => {
                if *state.get() == SessionState::Idle && session.request_armed {
                    session.request_armed = false;
                    platform.0.request_session(&SessionCapabilities::default());
                    println!("→ AR session requested");
                    next_state.set(SessionState::Requesting);
                    rpc.send_notification(
                        "session_state_changed",
                        serde_json::json!({ "state": "requesting" }),
                    );
                }
            }
            PlatformEvent::SessionGranted => {
                if *state.get() == SessionState::Requesting {
                    println!("→ AR session granted, entering active state");
                    next_state.set(SessionState::Active);
                    rpc.send_notification(
                        "session_state_changed",
                        serde_json::json!({ "state": "active" }),
                    );
                }
            }
            PlatformEvent::SessionDenied(error) => {
                if *state.get() == SessionState::Requesting {
                    error!("Failed to start AR session: {error}");
                    session.last_error = Some(error.clone());
                    next_state.set(SessionState::Idle);
                    rpc.send_notification(
                        "session_state_changed",
                        serde_json::json!({ "state": "idle", "error": error.to_string() }),
                    );
                }
            }
            _ => {}
        }
    }
}

/// Lazily create the hit-test source once per session incarnation. Until
/// the platform reports it ready, no hits are sampled.
pub fn ensure_hit_test_source(
    mut session: ResMut<ArSessionState>,
    mut platform: ResMut<ArPlatformHandle>,
    mut notifications: EventReader<ArPlatformNotification>,
) {
    if session.hit_test_source == HitTestSourceState::NotRequested {
        platform.0.request_hit_test_source();
        session.hit_test_source = HitTestSourceState::Pending;
    }

    for notification in notifications.read() {
        if notification.0 == PlatformEvent::HitTestSourceReady
            && session.hit_test_source == HitTestSourceState::Pending
        {
            session.hit_test_source = HitTestSourceState::Ready;
            println!("✓ Hit-test source ready");
        }
    }
}

/// Store the frame's best hit pose. Absence of results is a normal
/// per-frame state, never an error.
pub fn sample_hit_results(
    mut session: ResMut<ArSessionState>,
    mut platform: ResMut<ArPlatformHandle>,
) {
    session.current_hit = if session.hit_test_source == HitTestSourceState::Ready {
        platform.0.query_hits()
    } else {
        None
    };
}

/// Full AR core re-initialisation when the frontend switches models:
/// despawn the model, reset the reticle and all session bookkeeping, and
/// restart the loader with the new path.
pub fn reinitialize_on_model_change(
    mut events: EventReader<ModelSelectionEvent>,
    mut commands: Commands,
    mut session: ResMut<ArSessionState>,
    mut platform: ResMut<ArPlatformHandle>,
    mut placement: ResMut<PlacementState>,
    mut progress: ResMut<ModelLoadProgress>,
    mut loader: ResMut<ModelLoader>,
    mut selected: ResMut<SelectedModel>,
    mut next_state: ResMut<NextState<SessionState>>,
    asset_server: Res<AssetServer>,
    models: Query<Entity, With<PlaceableModel>>,
    mut reticles: Query<(&mut Transform, &mut Visibility), With<Reticle>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };

    for entity in &models {
        commands.entity(entity).despawn();
    }
    if let Ok((mut transform, mut visibility)) = reticles.single_mut() {
        *transform = Transform::IDENTITY;
        *visibility = Visibility::Hidden;
    }

    *placement = PlacementState::Unplaced;
    session.reinitialize();
    platform.0.reset();
    next_state.set(SessionState::Idle);

    selected.name = event.name.clone();
    selected.path = event.path.clone();
    progress.reset_for_model();
    loader.scene_handle =
        Some(asset_server.load(GltfAssetLabel::Scene(0).from_asset(event.path.clone())));
    progress.model_requested = true;

    println!(
        "→ Model selection changed to '{}', AR core re-initialised",
        event.name
    );
}
