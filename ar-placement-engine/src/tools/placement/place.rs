use bevy::prelude::*;

use crate::engine::scene::reticle::Reticle;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::placement::state::{PlaceableModel, PlacementState};
use crate::xr::session::SelectEvent;

/// Place the model at the reticle on a select gesture.
///
/// Preconditions are checked at event time: the reticle must be visible and
/// nothing may have been placed yet; otherwise the event is a no-op. A
/// select with no loaded model is ignored too, placement simply waits until
/// one exists. The transition is irreversible within a session.
pub fn place_model_on_select(
    mut selects: EventReader<SelectEvent>,
    mut placement: ResMut<PlacementState>,
    reticles: Query<(&Transform, &Visibility), (With<Reticle>, Without<PlaceableModel>)>,
    mut models: Query<(&mut Transform, &mut Visibility), With<PlaceableModel>>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    // Consume every select delivered this frame; at most one can act.
    if selects.read().count() == 0 {
        return;
    }

    if placement.is_placed() {
        return;
    }

    let Ok((reticle_transform, reticle_visibility)) = reticles.single() else {
        return;
    };
    if *reticle_visibility != Visibility::Visible {
        return;
    }

    let Ok((mut model_transform, mut model_visibility)) = models.single_mut() else {
        debug!("Select ignored: no model loaded yet");
        return;
    };

    // Take the reticle pose; the spawn-time scale factor is kept since hit
    // poses always carry unit scale.
    let scale = model_transform.scale;
    *model_transform = Transform {
        translation: reticle_transform.translation,
        rotation: reticle_transform.rotation,
        scale,
    };
    *model_visibility = Visibility::Visible;
    *placement = PlacementState::Placed;

    println!("✓ Model placed");
    rpc.send_notification(
        "model_placed",
        serde_json::json!({
            "position": model_transform.translation.to_array(),
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::placement::PLACED_MODEL_SCALE;

    fn place_test_app() -> App {
        let mut app = App::new();
        app.init_resource::<PlacementState>();
        app.init_resource::<WebRpcInterface>();
        app.add_event::<SelectEvent>();
        app.add_systems(Update, place_model_on_select);
        app
    }

    fn spawn_reticle_at(app: &mut App, translation: Vec3, visibility: Visibility) {
        app.world_mut().spawn((
            Transform::from_translation(translation),
            visibility,
            Reticle,
        ));
    }

    fn spawn_model(app: &mut App) {
        app.world_mut().spawn((
            Transform::from_scale(Vec3::splat(PLACED_MODEL_SCALE)),
            Visibility::Hidden,
            PlaceableModel,
        ));
    }

    fn model_state(app: &mut App) -> (Transform, Visibility) {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility), With<PlaceableModel>>();
        let (transform, visibility) = query.single(app.world()).unwrap();
        (*transform, *visibility)
    }

    #[test]
    fn select_with_visible_reticle_places_the_model() {
        let mut app = place_test_app();
        spawn_reticle_at(&mut app, Vec3::new(0.4, 0.0, -1.2), Visibility::Visible);
        spawn_model(&mut app);

        app.world_mut().send_event(SelectEvent);
        app.update();

        let (transform, visibility) = model_state(&mut app);
        assert!(app.world().resource::<PlacementState>().is_placed());
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation, Vec3::new(0.4, 0.0, -1.2));
        assert_eq!(transform.scale, Vec3::splat(PLACED_MODEL_SCALE));
    }

    #[test]
    fn select_with_hidden_reticle_is_a_no_op() {
        let mut app = place_test_app();
        spawn_reticle_at(&mut app, Vec3::new(0.4, 0.0, -1.2), Visibility::Hidden);
        spawn_model(&mut app);

        app.world_mut().send_event(SelectEvent);
        app.update();

        let (transform, visibility) = model_state(&mut app);
        assert!(!app.world().resource::<PlacementState>().is_placed());
        assert_eq!(visibility, Visibility::Hidden);
        assert_eq!(transform.translation, Vec3::ZERO);
    }

    #[test]
    fn placement_is_terminal() {
        let mut app = place_test_app();
        spawn_reticle_at(&mut app, Vec3::new(0.4, 0.0, -1.2), Visibility::Visible);
        spawn_model(&mut app);

        app.world_mut().send_event(SelectEvent);
        app.update();

        // Move the reticle and select again; the model must not follow.
        {
            let mut query = app
                .world_mut()
                .query_filtered::<&mut Transform, With<Reticle>>();
            let mut transform = query.single_mut(app.world_mut()).unwrap();
            transform.translation = Vec3::new(9.0, 0.0, 9.0);
        }
        app.world_mut().send_event(SelectEvent);
        app.update();

        let (transform, _) = model_state(&mut app);
        assert_eq!(transform.translation, Vec3::new(0.4, 0.0, -1.2));
    }

    #[test]
    fn select_without_a_loaded_model_is_ignored() {
        let mut app = place_test_app();
        spawn_reticle_at(&mut app, Vec3::new(0.4, 0.0, -1.2), Visibility::Visible);

        app.world_mut().send_event(SelectEvent);
        app.update();

        assert!(!app.world().resource::<PlacementState>().is_placed());
    }
}
