use bevy::prelude::*;

// Components
#[derive(Component)]
pub struct PlaceableModel;

/// One-way placement flag. Once placed, the model pose is frozen and the
/// reticle stays hidden for the rest of the session.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlacementState {
    #[default]
    Unplaced,
    Placed,
}

impl PlacementState {
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_state_defaults_to_unplaced() {
        assert!(!PlacementState::default().is_placed());
        assert!(PlacementState::Placed.is_placed());
    }
}
