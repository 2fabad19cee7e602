use bevy::prelude::*;

/// One directional key light plus a cool ambient fill, standing in for the
/// hemisphere lighting of a typical AR scene.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.73, 0.73, 1.0),
        brightness: 300.0,
        ..default()
    });
}
