use bevy::prelude::*;

use crate::tools::placement::state::PlacementState;

/// AR session lifecycle. Idle until the first tap, Requesting while the
/// platform resolves the session request, Active once granted. A denial
/// returns to Idle with the error recorded; there is no automatic retry.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum SessionState {
    #[default]
    Idle,
    Requesting,
    Active,
}

impl SessionState {
    /// String identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Active => "active",
        }
    }
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct InstructionText;

/// Reflect session and placement state in the native instruction overlay.
pub fn update_instruction_text(
    state: Res<State<SessionState>>,
    placement: Res<PlacementState>,
    mut query: Query<&mut Text, With<InstructionText>>,
) {
    if !state.is_changed() && !placement.is_changed() {
        return;
    }

    let message = if placement.is_placed() {
        "Model placed"
    } else {
        match state.get() {
            SessionState::Idle => "Click to start AR",
            SessionState::Requesting => "Requesting AR session...",
            SessionState::Active => "Move to find a surface, then click to place",
        }
    };

    for mut text in &mut query {
        text.0 = message.to_string();
    }
}
