use bevy::prelude::*;

/// Flat ring marking the candidate placement point on a detected surface.
pub const RETICLE_INNER_RADIUS: f32 = 0.06;
pub const RETICLE_OUTER_RADIUS: f32 = 0.07;
pub const RETICLE_RING_SEGMENTS: u32 = 32;

pub const RETICLE_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
