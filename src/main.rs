use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
    window::WindowResolution,
};
use tiny_flood_bevy::{
    camera::CamPlugin,
    config::SessionConfig,
    flood::FloodPlugin,
    menu::MenuPlugin,
    prelude::WINDOW_SIZE,
    state::AppState,
};

fn main() {
    // read before the app starts, reported once logging is up
    let config = SessionConfig::from_env();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(ImagePlugin::default_nearest())
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Tiny Flood".into(),
                    resizable: true,
                    focused: true,
                    present_mode: bevy::window::PresentMode::AutoNoVsync,
                    mode: bevy::window::WindowMode::Windowed,
                    resolution: WindowResolution::new(WINDOW_SIZE.x, WINDOW_SIZE.y),
                    ..default()
                }),
                ..default()
            }),
    )
    .add_plugins(MeshPickingPlugin)
    .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
    .init_state::<AppState>();

    let flood = config.and_then(FloodPlugin::new).unwrap_or_else(|err| {
        warn!("{err}, using the default config");
        FloodPlugin::default()
    });
    if let Some(seed) = flood.config().seed {
        info!("dealing boards from seed {seed}");
    }

    app.add_plugins((CamPlugin, MenuPlugin, flood)).run();
}
