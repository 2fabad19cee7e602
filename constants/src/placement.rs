/// Uniform scale applied to the placeable model when it is spawned.
/// Survives placement: the hit pose carries unit scale, so the placement
/// decomposition keeps this factor.
pub const PLACED_MODEL_SCALE: f32 = 0.3;
