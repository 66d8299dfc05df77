use bevy::{math::vec2, prelude::*, window::WindowResized};
use bevy_pancam::{PanCam, PanCamPlugin};

use crate::{
    prelude::{BG_COLOR, WINDOW_SIZE},
    state::AppState,
};

pub struct CamPlugin;

impl Plugin for CamPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .insert_resource(ClearColor(BG_COLOR))
            .add_systems(OnEnter(AppState::Load), spawn_cam)
            .add_systems(Update, fit_view_to_window);
    }
}

// Init
fn spawn_cam(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        // zoom only, the board stays centered
        PanCam {
            grab_buttons: vec![],
            ..default()
        },
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::WindowSize,
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Msaa::Off,
    ));
}

/// Keeps the whole play area visible when the window is resized.
fn fit_view_to_window(
    mut resize_reader: EventReader<WindowResized>,
    mut cam_query: Query<&mut OrthographicProjection, With<Camera2d>>,
) {
    let Some(resized) = resize_reader.read().last() else {
        return;
    };
    let Some(scale) = fit_scale(vec2(resized.width, resized.height)) else {
        return;
    };
    for mut projection in cam_query.iter_mut() {
        projection.scale = scale;
    }
}

/// Projection scale that fits [`WINDOW_SIZE`] into `window`, `None` for a minimized window.
fn fit_scale(window: Vec2) -> Option<f32> {
    if window.x <= 0.0 || window.y <= 0.0 {
        return None;
    }
    Some((WINDOW_SIZE / window).max_element())
}
