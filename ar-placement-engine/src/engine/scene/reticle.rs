use bevy::prelude::*;

use constants::reticle::{
    RETICLE_COLOR, RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS, RETICLE_RING_SEGMENTS,
};

#[derive(Component)]
pub struct Reticle;

/// Spawn the reticle, hidden until hit testing produces a pose. The ring
/// mesh hangs off a child with a fixed flat-on-the-floor rotation so the
/// parent transform can take hit poses unmodified.
pub fn spawn_reticle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let ring = meshes.add(
        Annulus::new(RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS)
            .mesh()
            .resolution(RETICLE_RING_SEGMENTS),
    );
    let material = materials.add(StandardMaterial {
        base_color: RETICLE_COLOR,
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Transform::IDENTITY,
            Visibility::Hidden,
            Reticle,
            Name::new("Reticle"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(ring),
                MeshMaterial3d(material),
                Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
            ));
        });
}
