use bevy::prelude::*;

use crate::engine::scene::reticle::Reticle;
use crate::tools::placement::state::PlacementState;
use crate::xr::session::ArSessionState;

/// Per-frame reticle update from the latest hit-test sample.
///
/// Placement is terminal: once the model is placed the reticle stays hidden
/// no matter what hit testing reports. With no hit this frame the reticle
/// hides but keeps its last pose; each pose is an independent snapshot, no
/// smoothing across frames.
pub fn update_reticle(
    session: Res<ArSessionState>,
    placement: Res<PlacementState>,
    mut reticles: Query<(&mut Transform, &mut Visibility), With<Reticle>>,
) {
    let Ok((mut transform, mut visibility)) = reticles.single_mut() else {
        return;
    };

    if placement.is_placed() {
        *visibility = Visibility::Hidden;
        return;
    }

    match session.current_hit {
        Some(hit) => {
            *visibility = Visibility::Visible;
            *transform = Transform::from_matrix(hit.transform);
        }
        None => {
            *visibility = Visibility::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xr::platform::HitPose;

    fn reticle_test_app() -> App {
        let mut app = App::new();
        app.init_resource::<ArSessionState>();
        app.init_resource::<PlacementState>();
        app.add_systems(Update, update_reticle);
        app.world_mut()
            .spawn((Transform::IDENTITY, Visibility::Hidden, Reticle));
        app
    }

    fn reticle_state(app: &mut App) -> (Transform, Visibility) {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility), With<Reticle>>();
        let (transform, visibility) = query.single(app.world()).unwrap();
        (*transform, *visibility)
    }

    #[test]
    fn hit_shows_reticle_at_the_hit_pose() {
        let mut app = reticle_test_app();
        let hit = HitPose::from_translation(Vec3::new(1.0, 0.0, -2.0));
        app.world_mut().resource_mut::<ArSessionState>().current_hit = Some(hit);

        app.update();

        let (transform, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn no_hit_hides_reticle_but_keeps_stale_pose() {
        let mut app = reticle_test_app();
        let hit = HitPose::from_translation(Vec3::new(1.0, 0.0, -2.0));
        app.world_mut().resource_mut::<ArSessionState>().current_hit = Some(hit);
        app.update();

        app.world_mut().resource_mut::<ArSessionState>().current_hit = None;
        app.update();

        let (transform, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Hidden);
        assert_eq!(transform.translation, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn placed_state_forces_reticle_hidden_despite_hits() {
        let mut app = reticle_test_app();
        *app.world_mut().resource_mut::<PlacementState>() = PlacementState::Placed;
        app.world_mut().resource_mut::<ArSessionState>().current_hit =
            Some(HitPose::from_translation(Vec3::ONE));

        app.update();

        let (_, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Hidden);
    }
}
