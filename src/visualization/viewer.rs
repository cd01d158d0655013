use std::path::PathBuf;
use std::time::Instant;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{PrimaryWindow, WindowResolution};
use log::{error, info};

use crate::render::host::save_image;
use crate::render::session::RenderSession;

const PROGRAM_TITLE: &str = "Image Warp - version 0.1";

/// Render session plus what the viewer needs to finish the pass
#[derive(Resource)]
struct Viewer {
    session: RenderSession,
    output: PathBuf,
    texture: Handle<Image>,
    done: bool,
    final_reported: bool,
}

/// Open a window and render one cycle per frame until the pass completes.
/// Closing the window early discards the raster.
pub fn run_viewer(session: RenderSession, output: PathBuf, window_size: (u32, u32)) {
    info!(
        "run_viewer: starting Bevy preview for a {}x{} raster",
        session.raster().width(),
        session.raster().height()
    );

    App::new()
        .insert_resource(Viewer {
            session,
            output,
            texture: Handle::default(),
            done: false,
            final_reported: false,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: PROGRAM_TITLE.to_string(),
                resolution: WindowResolution::new(window_size.0 as f32, window_size.1 as f32),
                ..default()
            }),
            ..default()
        }).disable::<LogPlugin>())
        .add_systems(Startup, setup_canvas_system)
        .add_systems(Update, (render_cycle_system, caption_system).chain())
        .run();
}

fn setup_canvas_system(mut commands: Commands, mut viewer: ResMut<Viewer>, mut images: ResMut<Assets<Image>>, windows: Query<&Window, With<PrimaryWindow>>) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    let (w, h) = viewer.session.raster().dimensions();
    let canvas = Image::new_fill(
        Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    viewer.texture = images.add(canvas);

    // Stretch the raster over the whole window
    let size = windows
        .get_single()
        .map(|win| Vec2::new(win.width(), win.height()))
        .unwrap_or(Vec2::new(w as f32, h as f32));

    commands.spawn(SpriteBundle {
        texture: viewer.texture.clone(),
        sprite: Sprite {
            custom_size: Some(size),
            ..default()
        },
        ..default()
    });
}

fn render_cycle_system(mut viewer: ResMut<Viewer>, mut images: ResMut<Assets<Image>>, mut exit: EventWriter<AppExit>) {
    if viewer.done {
        return;
    }

    if let Err(e) = viewer.session.cycle() {
        error!("render failed: {e}");
        viewer.done = true;
        exit.send(AppExit::error());
        return;
    }

    // Present: copy the raster into the texture
    let texture = viewer.texture.clone();
    if let Some(image) = images.get_mut(&texture) {
        image.data.copy_from_slice(viewer.session.raster().as_raw());
    }

    if viewer.session.is_complete() {
        viewer.done = true;
        match save_image(viewer.session.raster(), &viewer.output) {
            Ok(()) => {
                exit.send(AppExit::Success);
            }
            Err(e) => {
                error!("could not save {}: {e}", viewer.output.display());
                exit.send(AppExit::error());
            }
        }
    }
}

fn caption_system(mut viewer: ResMut<Viewer>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let status = if viewer.done {
        if viewer.final_reported {
            return;
        }
        viewer.final_reported = true;
        Some(viewer.session.status())
    } else {
        viewer.session.poll_status(Instant::now())
    };

    if let Some(status) = status {
        info!("{status}");
        if let Ok(mut window) = windows.get_single_mut() {
            window.title = format!("{PROGRAM_TITLE} - {status}");
        }
    }
}
