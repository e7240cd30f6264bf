#![allow(clippy::type_complexity, clippy::too_many_arguments)]
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use clap::{Parser, ValueEnum};
use log::warn;
use std::fs::File;
use std::path::PathBuf;

use field_map::crs::{format_lon_lat_hdms, Crs};
use field_map::point::PointPatch;
use field_map::store::PointStore;

mod connectivity;
use connectivity::{poll_connectivity, ConnectivityStatus};

/// Marker edge length in screen pixels; also the click tolerance.
const MARKER_PX: f32 = 12.0;

#[derive(Copy, Clone, ValueEnum)]
enum Theme {
    Dark,
    Light,
}

#[derive(Parser)]
struct Args {
    /// Path of the persisted point snapshot
    #[arg(long, default_value = "points.json")]
    store: PathBuf,
    /// UI theme (dark or light)
    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,
}

#[derive(Resource)]
struct MapStore(PointStore);

#[derive(Resource)]
struct ThemeColors {
    background: Color,
    panel_bg: Color,
    field_bg: Color,
    button_bg: Color,
    banner_bg: Color,
    text: Color,
    marker_active: Color,
    marker_inactive: Color,
}

impl ThemeColors {
    fn new(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::srgb(0.1, 0.11, 0.12),
                panel_bg: Color::srgb(0.17, 0.18, 0.2),
                field_bg: Color::srgb(0.1, 0.11, 0.12),
                button_bg: Color::srgb(0.28, 0.3, 0.33),
                banner_bg: Color::srgb(0.5, 0.12, 0.12),
                text: Color::WHITE,
                marker_active: Color::srgb(0.22, 0.68, 0.32),
                marker_inactive: Color::srgb(0.82, 0.26, 0.24),
            },
            Theme::Light => Self {
                background: Color::srgb(0.93, 0.93, 0.91),
                panel_bg: Color::srgb(0.98, 0.98, 0.97),
                field_bg: Color::srgb(0.88, 0.88, 0.86),
                button_bg: Color::srgb(0.8, 0.8, 0.78),
                banner_bg: Color::srgb(0.85, 0.35, 0.3),
                text: Color::BLACK,
                marker_active: Color::srgb(0.13, 0.55, 0.24),
                marker_inactive: Color::srgb(0.75, 0.18, 0.16),
            },
        }
    }
}

/// Transient popup edits; nothing here reaches the store until Save.
#[derive(Resource, Default)]
struct PopupDraft {
    point_id: Option<String>,
    details: String,
    status: bool,
    synced_revision: u64,
}

#[derive(Component)]
struct Marker {
    id: String,
}

#[derive(Component)]
struct PopupRoot;

#[derive(Component)]
struct CoordReadout;

#[derive(Component)]
struct DetailsText;

#[derive(Component)]
struct StatusCheckbox;

#[derive(Component)]
struct StatusCheckboxMark;

#[derive(Component)]
struct SaveButton;

#[derive(Component)]
struct CloseButton;

#[derive(Component)]
struct OfflineBanner;

fn main() {
    if let Ok(path) = std::env::var("FIELD_MAP_LOG") {
        match File::create(&path) {
            Ok(file) => {
                env_logger::Builder::from_default_env()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path, e);
                env_logger::Builder::from_default_env().init();
            }
        }
    } else {
        env_logger::Builder::from_default_env().init();
    }

    let args = Args::parse();
    let store = PointStore::hydrate(&args.store);
    println!(
        "Tracking {} points (store: {})",
        store.points().len(),
        args.store.display()
    );
    let theme = ThemeColors::new(args.theme);
    App::new()
        .insert_resource(ClearColor(theme.background))
        .insert_resource(theme)
        .insert_resource(MapStore(store))
        .insert_resource(PopupDraft::default())
        .insert_resource(ConnectivityStatus::default())
        .insert_resource(connectivity::spawn_probe())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Field Map".into(),
                resolution: (1024.0, 768.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, (setup, init_ui_scale))
        .add_systems(
            Update,
            (
                handle_map_clicks,
                camera_pan_zoom,
                sync_popup_draft,
                update_marker_sprites,
            ),
        )
        .add_systems(
            Update,
            (
                handle_details_input,
                handle_status_checkbox,
                handle_save_button,
                handle_close_button,
                update_popup_visibility,
                update_popup_widgets,
                poll_connectivity,
                update_offline_banner,
            ),
        )
        .run();
}

fn setup(mut commands: Commands, store: Res<MapStore>, theme: Res<ThemeColors>, windows: Query<&Window>) {
    let wgs84 = Crs::wgs84();
    let mercator = Crs::web_mercator();

    // Project every stored point onto the rendering plane up front; records
    // the projection engine rejects are skipped rather than misplaced.
    let mut projected: Vec<(String, bool, f64, f64)> = Vec::new();
    for p in store.0.points() {
        match wgs84.transform_point(&mercator, p.longitude, p.latitude) {
            Some((x, y)) => projected.push((p.id.clone(), p.status, x, y)),
            None => warn!("Could not project point {}", p.id),
        }
    }

    // View fits the extent of all markers, falling back to Tashkent.
    let (center, scale) = if projected.is_empty() {
        let center = wgs84
            .transform_point(&mercator, 69.240562, 41.311081)
            .unwrap_or((0.0, 0.0));
        (center, 100.0)
    } else {
        let min_x = projected.iter().map(|p| p.2).fold(f64::INFINITY, f64::min);
        let max_x = projected.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);
        let min_y = projected.iter().map(|p| p.3).fold(f64::INFINITY, f64::min);
        let max_y = projected.iter().map(|p| p.3).fold(f64::NEG_INFINITY, f64::max);
        let window = windows.single();
        let scale = ((max_x - min_x) as f32 / (window.width() - 130.0).max(1.0))
            .max((max_y - min_y) as f32 / (window.height() - 130.0).max(1.0))
            .max(1.0);
        (((min_x + max_x) / 2.0, (min_y + max_y) / 2.0), scale)
    };

    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale,
            ..OrthographicProjection::default_2d()
        },
        Transform::default(),
    ));

    // World coordinates are mercator meters relative to the view center so
    // marker transforms stay well within f32 precision.
    for (id, status, x, y) in projected {
        let color = if status {
            theme.marker_active
        } else {
            theme.marker_inactive
        };
        commands.spawn((
            Sprite {
                color,
                custom_size: Some(Vec2::splat(MARKER_PX * scale)),
                ..default()
            },
            Transform::from_translation(Vec3::new(
                (x - center.0) as f32,
                (y - center.1) as f32,
                0.0,
            )),
            Marker { id },
        ));
    }

    spawn_popup(&mut commands, &theme);
    spawn_offline_banner(&mut commands, &theme);
}

fn spawn_popup(commands: &mut Commands, theme: &ThemeColors) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(16.0),
                top: Val::Px(44.0),
                width: Val::Px(300.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(theme.panel_bg),
            Visibility::Hidden,
            PopupRoot,
        ))
        .insert((Interaction::default(), FocusPolicy::Block))
        .with_children(|parent| {
            parent.spawn((
                TextLayout::default(),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(theme.text),
                Text::new(""),
                CoordReadout,
            ));

            parent.spawn((
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(theme.text),
                Text::new("Details:"),
            ));

            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        min_height: Val::Px(26.0),
                        padding: UiRect::all(Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(theme.field_bg),
                ))
                .with_children(|field| {
                    field.spawn((
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(theme.text),
                        Text::new(""),
                        DetailsText,
                    ));
                });

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    column_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(theme.text),
                        Text::new("Status:"),
                    ));
                    row.spawn((
                        Button,
                        Node {
                            width: Val::Px(22.0),
                            height: Val::Px(22.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(theme.marker_inactive),
                        StatusCheckbox,
                    ))
                    .with_children(|b| {
                        b.spawn((
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                            Text::new(""),
                            StatusCheckboxMark,
                        ));
                    });
                });

            parent
                .spawn((
                    Button,
                    Node {
                        width: Val::Percent(100.0),
                        justify_content: JustifyContent::Center,
                        padding: UiRect::all(Val::Px(5.0)),
                        ..default()
                    },
                    BackgroundColor(theme.button_bg),
                    SaveButton,
                ))
                .with_children(|b| {
                    b.spawn((
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(theme.text),
                        Text::new("Save"),
                    ));
                });

            parent
                .spawn((
                    Button,
                    Node {
                        position_type: PositionType::Absolute,
                        right: Val::Px(6.0),
                        top: Val::Px(6.0),
                        padding: UiRect::new(Val::Px(6.0), Val::Px(6.0), Val::Px(2.0), Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(theme.button_bg),
                    CloseButton,
                ))
                .with_children(|b| {
                    b.spawn((
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(theme.text),
                        Text::new("X"),
                    ));
                });
        });
}

fn spawn_offline_banner(commands: &mut Commands, theme: &ThemeColors) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(26.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(theme.banner_bg),
            Visibility::Hidden,
            OfflineBanner,
        ))
        .with_children(|banner| {
            banner.spawn((
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Text::new("You are currently offline."),
            ));
        });
}

fn cursor_world_pos(
    windows: &Query<&Window>,
    camera_q: &Query<(&Camera, &GlobalTransform, &OrthographicProjection), With<Camera2d>>,
) -> Option<Vec2> {
    let (camera, cam_transform, _) = camera_q.single();
    windows
        .single()
        .cursor_position()
        .and_then(|pos| camera.viewport_to_world_2d(cam_transform, pos).ok())
}

fn handle_map_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform, &OrthographicProjection), With<Camera2d>>,
    markers: Query<(&Marker, &Transform)>,
    mut store: ResMut<MapStore>,
    ui_nodes: Query<&Interaction>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if ui_nodes.iter().any(|i| *i != Interaction::None) {
        return;
    }
    let Some(pos) = cursor_world_pos(&windows, &camera_q) else {
        return;
    };
    let (_, _, projection) = camera_q.single();
    let tolerance = MARKER_PX * projection.scale;

    let mut hit: Option<(&str, f32)> = None;
    for (marker, t) in &markers {
        let d = t.translation.truncate().distance(pos);
        if d < tolerance && hit.map_or(true, |(_, best)| d < best) {
            hit = Some((marker.id.as_str(), d));
        }
    }
    match hit {
        Some((id, _)) => {
            store.0.activate(id);
        }
        None => store.0.deactivate(),
    }
}

fn camera_pan_zoom(
    mut camera_q: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut wheel_evr: EventReader<MouseWheel>,
) {
    let (mut transform, mut projection) = camera_q.single_mut();
    for ev in wheel_evr.read() {
        let factor = 1.0 - ev.y * 0.1;
        projection.scale = (projection.scale * factor).clamp(0.05, 500_000.0);
    }
    if buttons.pressed(MouseButton::Right) {
        for ev in motion_evr.read() {
            transform.translation.x -= ev.delta.x * projection.scale;
            transform.translation.y += ev.delta.y * projection.scale;
        }
    }
}

/// Resynchronizes the draft from the resolved active record whenever the
/// store changes, discarding any unsaved edits.
fn sync_popup_draft(store: Res<MapStore>, mut draft: ResMut<PopupDraft>) {
    if store.0.revision() == draft.synced_revision {
        return;
    }
    draft.synced_revision = store.0.revision();
    match store.0.active_point() {
        Some(p) => {
            draft.point_id = Some(p.id.clone());
            draft.details = p.details.clone();
            draft.status = p.status;
        }
        None => {
            draft.point_id = None;
            draft.details.clear();
            draft.status = false;
        }
    }
}

fn handle_details_input(mut events: EventReader<KeyboardInput>, mut draft: ResMut<PopupDraft>) {
    if draft.point_id.is_none() {
        events.clear();
        return;
    }
    for ev in events.read() {
        if ev.state != ButtonState::Pressed {
            continue;
        }
        match &ev.logical_key {
            Key::Character(text) => {
                if !text.chars().any(|c| c.is_control()) {
                    draft.details.push_str(text);
                }
            }
            Key::Space => draft.details.push(' '),
            Key::Backspace => {
                draft.details.pop();
            }
            _ => {}
        }
    }
}

fn handle_status_checkbox(
    interaction: Query<&Interaction, (Changed<Interaction>, With<Button>, With<StatusCheckbox>)>,
    mut draft: ResMut<PopupDraft>,
) {
    if let Ok(&Interaction::Pressed) = interaction.get_single() {
        draft.status = !draft.status;
    }
}

fn apply_draft(store: &mut PointStore, draft: &PopupDraft) -> bool {
    match &draft.point_id {
        Some(id) => store.update(
            id,
            PointPatch {
                details: Some(draft.details.clone()),
                status: Some(draft.status),
            },
        ),
        None => false,
    }
}

fn handle_save_button(
    interaction: Query<&Interaction, (Changed<Interaction>, With<Button>, With<SaveButton>)>,
    mut store: ResMut<MapStore>,
    draft: Res<PopupDraft>,
) {
    if let Ok(&Interaction::Pressed) = interaction.get_single() {
        apply_draft(&mut store.0, &draft);
    }
}

fn handle_close_button(
    interaction: Query<&Interaction, (Changed<Interaction>, With<Button>, With<CloseButton>)>,
    mut store: ResMut<MapStore>,
) {
    if let Ok(&Interaction::Pressed) = interaction.get_single() {
        store.0.deactivate();
    }
}

fn update_popup_visibility(store: Res<MapStore>, mut popup: Query<&mut Visibility, With<PopupRoot>>) {
    let target = if store.0.active_point().is_some() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut popup {
        if *visibility != target {
            *visibility = target;
        }
    }
}

fn update_popup_widgets(
    store: Res<MapStore>,
    draft: Res<PopupDraft>,
    theme: Res<ThemeColors>,
    mut details_text: Query<
        &mut Text,
        (With<DetailsText>, Without<StatusCheckboxMark>, Without<CoordReadout>),
    >,
    mut mark_text: Query<
        &mut Text,
        (With<StatusCheckboxMark>, Without<DetailsText>, Without<CoordReadout>),
    >,
    mut coord_text: Query<
        &mut Text,
        (With<CoordReadout>, Without<DetailsText>, Without<StatusCheckboxMark>),
    >,
    mut checkbox: Query<&mut BackgroundColor, With<StatusCheckbox>>,
) {
    for mut text in &mut details_text {
        if text.0 != draft.details {
            text.0 = draft.details.clone();
        }
    }
    let mark = if draft.status { "x" } else { "" };
    for mut text in &mut mark_text {
        if text.0 != mark {
            text.0 = mark.to_string();
        }
    }
    for mut bg in &mut checkbox {
        bg.0 = if draft.status {
            theme.marker_active
        } else {
            theme.marker_inactive
        };
    }
    if let Some(p) = store.0.active_point() {
        let readout = format_lon_lat_hdms(p.longitude, p.latitude);
        for mut text in &mut coord_text {
            if text.0 != readout {
                text.0 = readout.clone();
            }
        }
    }
}

/// Keeps marker color in sync with point status and marker size constant in
/// screen pixels across zoom levels; the active marker is drawn larger.
fn update_marker_sprites(
    store: Res<MapStore>,
    theme: Res<ThemeColors>,
    camera_q: Query<&OrthographicProjection, With<Camera2d>>,
    mut markers: Query<(&Marker, &mut Sprite)>,
) {
    let scale = camera_q.single().scale;
    for (marker, mut sprite) in &mut markers {
        let status = store.0.point(&marker.id).is_some_and(|p| p.status);
        sprite.color = if status {
            theme.marker_active
        } else {
            theme.marker_inactive
        };
        let px = if store.0.active_id() == Some(marker.id.as_str()) {
            MARKER_PX * 1.5
        } else {
            MARKER_PX
        };
        sprite.custom_size = Some(Vec2::splat(px * scale));
    }
}

fn update_offline_banner(
    status: Res<ConnectivityStatus>,
    mut banner: Query<&mut Visibility, With<OfflineBanner>>,
) {
    let target = if status.offline {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut banner {
        if *visibility != target {
            *visibility = target;
        }
    }
}

fn init_ui_scale(windows: Query<&Window>, mut ui_scale: ResMut<UiScale>) {
    ui_scale.0 = windows.single().resolution.scale_factor();
}
