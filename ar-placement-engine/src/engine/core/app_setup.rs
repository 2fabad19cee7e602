use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::camera::viewer_rig::{apply_viewer_pose, spawn_ar_camera};
use crate::engine::core::app_state::SessionState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::model_loader::{
    ModelCatalog, ModelLoader, ModelSelectionEvent, SelectedModel, load_catalog_system,
    spawn_model_when_ready, start_loading,
};
use crate::engine::loading::progress::ModelLoadProgress;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::reticle::spawn_reticle;
use crate::engine::systems::diagnostics::status_notification_system;
// Crate tools modules
use crate::tools::placement::PlacementPlugin;
use crate::tools::placement::place::place_model_on_select;
use crate::tools::placement::reticle_control::update_reticle;
// Crate XR modules
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::xr::platform::ArPlatformHandle;
use crate::xr::session::{
    ArPlatformNotification, ArSessionState, SelectEvent, drain_platform_events,
    ensure_hit_test_source, handle_session_lifecycle, reinitialize_on_model_change,
    sample_hit_results,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<SessionState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ModelCatalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ModelCatalog>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(PlacementPlugin);

    // Initialise resources early; the platform handle is injected here so
    // the session systems never reach for ambient globals.
    app.init_resource::<ArSessionState>()
        .init_resource::<ModelLoadProgress>()
        .init_resource::<ModelLoader>()
        .init_resource::<SelectedModel>()
        .add_event::<ArPlatformNotification>()
        .add_event::<SelectEvent>()
        .add_event::<ModelSelectionEvent>()
        .insert_resource(create_platform());

    // Staged model loading
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (load_catalog_system, spawn_model_when_ready).chain(),
        );

    // Per-frame AR loop. Chained so a select always lands on the hit pose
    // sampled in the same frame.
    app.add_systems(
        Update,
        (
            drain_platform_events,
            handle_session_lifecycle,
            ensure_hit_test_source.run_if(in_state(SessionState::Active)),
            sample_hit_results.run_if(in_state(SessionState::Active)),
            apply_viewer_pose.run_if(in_state(SessionState::Active)),
            update_reticle.run_if(in_state(SessionState::Active)),
            place_model_on_select.run_if(in_state(SessionState::Active)),
        )
            .chain(),
    );

    app.add_systems(
        Update,
        (reinitialize_on_model_change, status_notification_system),
    );

    // Native-only overlay and the simulated input shim standing in for the
    // host page's tap/select delivery.
    #[cfg(not(target_arch = "wasm32"))]
    {
        use crate::engine::core::app_state::update_instruction_text;
        use crate::engine::systems::diagnostics::fps_text_update_system;
        use crate::xr::simulated::simulated_ar_input;
        app.add_systems(
            Update,
            (
                simulated_ar_input,
                fps_text_update_system,
                update_instruction_text,
            ),
        );
    }

    app
}

fn create_platform() -> ArPlatformHandle {
    #[cfg(target_arch = "wasm32")]
    {
        ArPlatformHandle(Box::new(crate::xr::web_bridge::WebBridgePlatform::new()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        ArPlatformHandle(Box::new(crate::xr::simulated::SimulatedPlatform::new()))
    }
}

// Startup system that only handles basic scene initialisation
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    println!("=== AR SURFACE PLACEMENT ENGINE ===");

    spawn_lighting(&mut commands);
    spawn_ar_camera(&mut commands);
    spawn_reticle(&mut commands, &mut meshes, &mut materials);

    #[cfg(not(target_arch = "wasm32"))]
    create_native_overlays(&mut commands);
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    use crate::engine::core::app_state::{FpsText, InstructionText};

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Click to start AR"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                InstructionText,
            ));
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
