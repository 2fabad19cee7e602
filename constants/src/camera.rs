/// AR camera projection. Near/far planes are tight because everything of
/// interest sits within arm's reach of the viewer.
pub const AR_CAMERA_FOV_DEGREES: f32 = 70.0;
pub const AR_CAMERA_NEAR: f32 = 0.01;
pub const AR_CAMERA_FAR: f32 = 20.0;
