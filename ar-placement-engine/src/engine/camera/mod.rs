/// AR camera entity and per-frame viewer pose application.
pub mod viewer_rig;
