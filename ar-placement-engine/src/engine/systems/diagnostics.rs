use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::FpsText;
use crate::engine::core::app_state::SessionState;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::placement::state::PlacementState;

/// Push engine status to the frontend twice a second: frame rate, session
/// state, and whether the model has been placed.
pub fn status_notification_system(
    mut rpc: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    state: Res<State<SessionState>>,
    placement: Res<PlacementState>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    if now - *last_send_time < 0.5 {
        return;
    }
    *last_send_time = now;

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    rpc.send_notification(
        "status_update",
        serde_json::json!({
            "fps": fps as f32,
            "session": state.get().as_str(),
            "placed": placement.is_placed(),
        }),
    );
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
