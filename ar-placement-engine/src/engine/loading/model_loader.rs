use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::path::RELATIVE_CATALOG_PATH;
use constants::placement::PLACED_MODEL_SCALE;

use crate::engine::loading::progress::ModelLoadProgress;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::placement::state::PlaceableModel;

/// One placeable model offered by the frontend dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub path: String,
}

/// Model catalog as a Bevy asset. Mirrors the JSON structure exactly.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct ModelCatalog {
    pub models: Vec<ModelEntry>,
}

impl ModelCatalog {
    pub fn entry(&self, name: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|entry| entry.name == name)
    }
}

/// Currently selected catalog entry.
#[derive(Resource, Default)]
pub struct SelectedModel {
    pub name: String,
    pub path: String,
}

#[derive(Resource, Default)]
pub struct ModelLoader {
    pub catalog_handle: Option<Handle<ModelCatalog>>,
    pub scene_handle: Option<Handle<Scene>>,
}

/// Event fired when the frontend switches models; triggers a full AR core
/// re-initialisation.
#[derive(Event, Debug, Clone)]
pub struct ModelSelectionEvent {
    pub name: String,
    pub path: String,
}

// Start the loading process
pub fn start_loading(mut loader: ResMut<ModelLoader>, asset_server: Res<AssetServer>) {
    loader.catalog_handle = Some(asset_server.load(RELATIVE_CATALOG_PATH));
}

/// Resolve the catalog, pick the first entry as the default selection, and
/// request its scene.
pub fn load_catalog_system(
    mut progress: ResMut<ModelLoadProgress>,
    mut loader: ResMut<ModelLoader>,
    mut selected: ResMut<SelectedModel>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<ModelCatalog>>,
) {
    if progress.catalog_loaded || progress.catalog_failed {
        return;
    }

    let Some(ref handle) = loader.catalog_handle else {
        return;
    };

    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle) {
        error!("Error loading model catalog: {error}");
        progress.catalog_failed = true;
        return;
    }

    let Some(catalog) = catalogs.get(handle) else {
        return;
    };

    println!("✓ Model catalog loaded ({} models)", catalog.models.len());
    progress.catalog_loaded = true;
    commands.insert_resource(catalog.clone());

    let Some(entry) = catalog.models.first() else {
        warn!("Model catalog is empty, nothing to place");
        return;
    };
    selected.name = entry.name.clone();
    selected.path = entry.path.clone();
    loader.scene_handle =
        Some(asset_server.load(GltfAssetLabel::Scene(0).from_asset(entry.path.clone())));
    progress.model_requested = true;
}

/// Spawn the selected model once its scene resolves: fixed scale, hidden
/// until placement. A load failure is logged and leaves no model present.
pub fn spawn_model_when_ready(
    mut progress: ResMut<ModelLoadProgress>,
    mut commands: Commands,
    loader: Res<ModelLoader>,
    selected: Res<SelectedModel>,
    asset_server: Res<AssetServer>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    if progress.model_spawned || progress.model_failed || !progress.model_requested {
        return;
    }

    let Some(ref handle) = loader.scene_handle else {
        return;
    };

    match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => {
            commands.spawn((
                SceneRoot(handle.clone()),
                Transform::from_scale(Vec3::splat(PLACED_MODEL_SCALE)),
                Visibility::Hidden,
                PlaceableModel,
                Name::new(format!("{}_model", selected.name)),
            ));
            progress.model_spawned = true;
            println!("✓ Model '{}' ready for placement", selected.name);
        }
        Some(LoadState::Failed(error)) => {
            error!("Error loading model '{}': {error}", selected.name);
            progress.model_failed = true;
            rpc.send_notification(
                "model_load_failed",
                serde_json::json!({ "model": selected.name }),
            );
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_entries_by_name() {
        let catalog: ModelCatalog = serde_json::from_str(
            r#"{
                "models": [
                    { "name": "chair", "path": "models/chair.glb" },
                    { "name": "sofa", "path": "models/office_chair.glb" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.entry("sofa").unwrap().path, "models/office_chair.glb");
        assert!(catalog.entry("lamp").is_none());
    }

    #[test]
    fn progress_reset_keeps_catalog_milestones() {
        let mut progress = ModelLoadProgress {
            catalog_loaded: true,
            catalog_failed: false,
            model_requested: true,
            model_spawned: true,
            model_failed: false,
        };

        progress.reset_for_model();

        assert!(progress.catalog_loaded);
        assert!(!progress.model_requested);
        assert!(!progress.model_spawned);
    }
}
