use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct ModelLoadProgress {
    pub catalog_loaded: bool,
    pub catalog_failed: bool,
    pub model_requested: bool,
    pub model_spawned: bool,
    pub model_failed: bool,
}

impl ModelLoadProgress {
    /// Clear per-model milestones; the catalog survives a model change.
    pub fn reset_for_model(&mut self) {
        self.model_requested = false;
        self.model_spawned = false;
        self.model_failed = false;
    }
}
