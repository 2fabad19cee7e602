//! Interactive tools operating on the AR scene.
//!
//! Currently one tool: the reticle-to-placement loop that turns per-frame
//! hit-test samples into a single, final model placement.

pub mod placement;
