//! Reticle-to-placement loop.
//!
//! Each frame the reticle controller mirrors the session's latest hit-test
//! sample; a select gesture then stamps the reticle pose onto the model,
//! exactly once per session.
//!
//! ```text
//! ArSessionState.current_hit ──> update_reticle() ──> reticle pose/visibility
//!                                                          │
//! SelectEvent ──────────────────> place_model_on_select() ─┘
//!                                   └─> model pose + PlacementState::Placed
//! ```
//!
//! Both systems are scheduled inside the session frame chain so a select
//! always lands on the pose sampled in the same frame.

/// Placement of the model at the reticle pose on a select gesture.
pub mod place;

/// Per-frame reticle visibility and pose from hit-test samples.
pub mod reticle_control;

/// Placement state resource and scene markers.
pub mod state;

use bevy::prelude::*;

pub use state::PlacementState;

// Registers placement state; the per-frame systems are scheduled with the
// session frame chain so their ordering against hit sampling stays explicit.
pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementState>();
    }
}

#[cfg(test)]
mod tests {
    use super::place::place_model_on_select;
    use super::reticle_control::update_reticle;
    use super::state::{PlaceableModel, PlacementState};
    use crate::engine::core::app_state::SessionState;
    use crate::engine::scene::reticle::Reticle;
    use crate::rpc::web_rpc::WebRpcInterface;
    use crate::xr::platform::{ArPlatformHandle, HitPose, PlatformEvent};
    use crate::xr::session::{
        ArPlatformNotification, ArSessionState, SelectEvent, drain_platform_events,
        ensure_hit_test_source, handle_session_lifecycle, sample_hit_results,
    };
    use crate::xr::simulated::SimulatedPlatform;
    use bevy::prelude::*;
    use bevy::state::app::StatesPlugin;
    use bevy::window::WindowResized;
    use constants::placement::PLACED_MODEL_SCALE;

    /// Headless app running the full per-frame AR chain against the
    /// simulated platform, one `update()` per frame.
    fn frame_loop_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.init_state::<SessionState>();
        app.insert_resource(ArPlatformHandle(Box::new(SimulatedPlatform::new())));
        app.init_resource::<ArSessionState>();
        app.init_resource::<PlacementState>();
        app.init_resource::<WebRpcInterface>();
        app.add_event::<ArPlatformNotification>();
        app.add_event::<SelectEvent>();
        app.add_event::<WindowResized>();
        app.add_systems(
            Update,
            (
                drain_platform_events,
                handle_session_lifecycle,
                ensure_hit_test_source.run_if(in_state(SessionState::Active)),
                sample_hit_results.run_if(in_state(SessionState::Active)),
                update_reticle.run_if(in_state(SessionState::Active)),
                place_model_on_select.run_if(in_state(SessionState::Active)),
            )
                .chain(),
        );

        app.world_mut()
            .spawn((Transform::IDENTITY, Visibility::Hidden, Reticle));
        app.world_mut().spawn((
            Transform::from_scale(Vec3::splat(PLACED_MODEL_SCALE)),
            Visibility::Hidden,
            PlaceableModel,
        ));
        app
    }

    /// Tap, grant, and hit-test source resolution take four frames.
    fn advance_to_active(app: &mut App) {
        inject(app, PlatformEvent::Tap);
        for _ in 0..4 {
            app.update();
        }
        assert_eq!(
            *app.world().resource::<State<SessionState>>().get(),
            SessionState::Active
        );
    }

    fn inject(app: &mut App, event: PlatformEvent) {
        app.world_mut()
            .resource_mut::<ArPlatformHandle>()
            .0
            .inject_event(event);
    }

    fn set_hit(app: &mut App, hit: Option<HitPose>) {
        app.world_mut()
            .resource_mut::<ArPlatformHandle>()
            .0
            .inject_hit(hit);
    }

    fn reticle_state(app: &mut App) -> (Transform, Visibility) {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility), With<Reticle>>();
        let (transform, visibility) = query.single(app.world()).unwrap();
        (*transform, *visibility)
    }

    fn model_state(app: &mut App) -> (Transform, Visibility) {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility), With<PlaceableModel>>();
        let (transform, visibility) = query.single(app.world()).unwrap();
        (*transform, *visibility)
    }

    #[test]
    fn frames_without_hits_leave_everything_unplaced() {
        let mut app = frame_loop_app();
        advance_to_active(&mut app);

        for _ in 0..5 {
            app.update();
        }

        let (_, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Hidden);
        assert!(!app.world().resource::<PlacementState>().is_placed());
    }

    #[test]
    fn hit_then_miss_then_select_then_hit_then_select() {
        let mut app = frame_loop_app();
        advance_to_active(&mut app);

        let p1 = Vec3::new(0.2, 0.0, -1.0);
        let p2 = Vec3::new(-0.5, 0.0, -2.0);

        // Frame with hit pose P1: reticle visible at P1.
        set_hit(&mut app, Some(HitPose::from_translation(p1)));
        app.update();
        let (transform, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation, p1);

        // Next frame with no hit: reticle invisible, transform still P1.
        set_hit(&mut app, None);
        app.update();
        let (transform, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Hidden);
        assert_eq!(transform.translation, p1);

        // Select now fires: no-op since the reticle is invisible.
        inject(&mut app, PlatformEvent::Select);
        app.update();
        assert!(!app.world().resource::<PlacementState>().is_placed());

        // Frame with hit pose P2, select in the same frame: placed at P2.
        set_hit(&mut app, Some(HitPose::from_translation(p2)));
        inject(&mut app, PlatformEvent::Select);
        app.update();

        assert!(app.world().resource::<PlacementState>().is_placed());
        let (transform, visibility) = model_state(&mut app);
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation, p2);
        assert_eq!(transform.scale, Vec3::splat(PLACED_MODEL_SCALE));

        // Terminal: further hits and selects change nothing and the
        // reticle never comes back.
        set_hit(&mut app, Some(HitPose::from_translation(p1)));
        inject(&mut app, PlatformEvent::Select);
        app.update();
        let (transform, _) = model_state(&mut app);
        assert_eq!(transform.translation, p2);
        let (_, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Hidden);
    }

    #[test]
    fn resize_events_never_touch_placement_state() {
        let mut app = frame_loop_app();
        advance_to_active(&mut app);

        set_hit(&mut app, Some(HitPose::from_translation(Vec3::NEG_Z)));
        app.update();

        for (width, height) in [(640.0, 480.0), (1920.0, 1080.0), (320.0, 568.0)] {
            app.world_mut().send_event(WindowResized {
                window: Entity::PLACEHOLDER,
                width,
                height,
            });
            app.update();
        }

        let (transform, visibility) = reticle_state(&mut app);
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation, Vec3::NEG_Z);
        assert!(!app.world().resource::<PlacementState>().is_placed());
    }
}
