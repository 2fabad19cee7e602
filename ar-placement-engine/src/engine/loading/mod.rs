//! Staged model loading: catalog first, then the selected GLTF scene.
//!
//! Failures at either stage are logged and leave no model in the scene;
//! placement waits until a model exists. Nothing retries.

/// Model catalog asset, selection resource, and the staged load systems.
pub mod model_loader;

/// Loading progress milestones.
pub mod progress;
