use bevy::prelude::*;

use constants::camera::{AR_CAMERA_FAR, AR_CAMERA_FOV_DEGREES, AR_CAMERA_NEAR};

use crate::xr::platform::PlatformEvent;
use crate::xr::session::ArPlatformNotification;

/// Marker for the camera that follows the session's viewer pose.
#[derive(Component)]
pub struct ArCamera;

pub fn spawn_ar_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: AR_CAMERA_FOV_DEGREES.to_radians(),
            near: AR_CAMERA_NEAR,
            far: AR_CAMERA_FAR,
            ..default()
        }),
        Transform::IDENTITY,
        ArCamera,
        Name::new("ArCamera"),
    ));
}

/// Follow the viewer pose reported by the platform. The camera is never
/// user-controlled while a session is active; aspect ratio on resize is
/// recomputed by the render pipeline, not here.
pub fn apply_viewer_pose(
    mut notifications: EventReader<ArPlatformNotification>,
    mut cameras: Query<&mut Transform, With<ArCamera>>,
) {
    let Some(pose) = notifications
        .read()
        .filter_map(|notification| match notification.0 {
            PlatformEvent::ViewerPose(matrix) => Some(matrix),
            _ => None,
        })
        .last()
    else {
        return;
    };

    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    *transform = Transform::from_matrix(pose);
}
