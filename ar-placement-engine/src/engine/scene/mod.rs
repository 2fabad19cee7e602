//! Scene graph contents: reticle, lighting.
//!
//! The camera rig lives in `engine::camera`; the placeable model is spawned
//! by the staged loader in `engine::loading`.

/// Directional key light and ambient fill.
pub mod lighting;

/// Placement reticle entity: flat ring mesh, hidden until hit testing
/// produces a pose.
pub mod reticle;
