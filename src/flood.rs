use bevy::{
    ecs::system::SystemState,
    math::{vec2, vec3},
    prelude::*,
    sprite::Anchor,
};

use crate::{
    config::{ConfigError, SessionConfig},
    prelude::*,
    session::{GameSession, MoveOutcome, Status},
    state::AppState,
};

const HINTS: [&str; 3] = [
    "LEFT/RIGHT: Select color",
    "UP/DOWN: Switch focus",
    "ENTER: Confirm",
];

/// Board rendering, player input and the session resource.
pub struct FloodPlugin {
    config: SessionConfig,
    session: GameSession,
}

impl FloodPlugin {
    /// Fails if `config` does not pass [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let session = GameSession::new(config)?;
        Ok(Self { config, session })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Default for FloodPlugin {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self {
            config,
            session: GameSession::from_valid_config(config),
        }
    }
}

impl Plugin for FloodPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "board {size}x{size}, {} colors, {} moves",
            self.config.num_colors,
            self.config.max_moves,
            size = self.config.board_size,
        );
        app.insert_resource(self.config)
            .insert_resource(self.session.clone())
            .insert_resource(BoardLayout::new(self.config.board_size))
            .init_resource::<Focus>()
            .add_event::<FloodCommand>()
            .add_systems(
                OnEnter(AppState::Load),
                (load_meshes_and_materials, finish_loading).chain(),
            )
            .add_systems(
                OnEnter(AppState::Playing),
                (reset_focus, spawn_board, spawn_controls, spawn_hud),
            )
            .add_systems(
                Update,
                (
                    handle_play_kbd,
                    apply_flood_commands,
                    (sync_cells, sync_hud).run_if(
                        resource_changed::<GameSession>.or(state_changed::<AppState>),
                    ),
                    sync_focus.run_if(resource_changed::<Focus>),
                )
                    .chain()
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

/// What the player asks the session to do.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodCommand {
    Choose(u8),
    Restart,
}

// ——> SYSTEMS

/// initialize meshes and materials in a resource
fn load_meshes_and_materials(
    world: &mut World,
    params: &mut SystemState<(
        ResMut<Assets<Mesh>>,
        ResMut<Assets<ColorMaterial>>,
        Res<BoardLayout>,
    )>,
) {
    let (mut meshes, mut materials, layout) = params.get_mut(world);

    let mesh_and_mats = MeshAndMats {
        cell: meshes.add(Rectangle::from_size(layout.cell_size)),
        button: meshes.add(Rectangle::from_size(BUTTON_SIZE_PX)),
        selector: meshes.add(Rectangle::from_size(
            BUTTON_SIZE_PX + Vec2::splat(2.0 * SELECTOR_WIDTH_PX),
        )),
        restart: meshes.add(Rectangle::from_size(RESTART_SIZE_PX)),
        palette: PALETTE
            .iter()
            .map(|color| materials.add(ColorMaterial::from_color(*color)))
            .collect(),
        selector_mat: materials.add(ColorMaterial::from_color(SELECTOR_COLOR)),
        restart_mat: materials.add(ColorMaterial::from_color(RESTART_COLOR)),
        restart_focused_mat: materials.add(ColorMaterial::from_color(PALETTE[1])),
    };
    // create an easily accessible resource for efficient reuse of materials and meshes
    world.insert_resource(mesh_and_mats);
}

fn finish_loading(mut next_state: ResMut<NextState<AppState>>) {
    debug!("meshes and materials ready");
    next_state.set(AppState::Menu);
}

fn reset_focus(mut focus: ResMut<Focus>) {
    *focus = Focus::default();
}

/// spawn one mesh per board cell, colored after the current session
fn spawn_board(
    mut commands: Commands,
    mesh_and_mats: Res<MeshAndMats>,
    layout: Res<BoardLayout>,
    session: Res<GameSession>,
) {
    let board = session.board();
    let cells_to_spawn = board
        .cells()
        .iter()
        .enumerate()
        .map(|(idx, color)| {
            (
                Cell(idx),
                StateScoped(AppState::Playing),
                Mesh2d(mesh_and_mats.cell.clone()),
                MeshMaterial2d(mesh_and_mats.palette_mat(*color)),
                Transform::from_translation(
                    layout.cell_coord_to_translation(board.idx_to_cell_coord(idx)),
                ),
            )
        })
        .collect::<Vec<_>>();
    commands.spawn_batch(cells_to_spawn);
}

/// spawn the color buttons, the focus selector, the restart button and the key hints
fn spawn_controls(
    mut commands: Commands,
    mesh_and_mats: Res<MeshAndMats>,
    layout: Res<BoardLayout>,
    session: Res<GameSession>,
) {
    for color in 0..session.board().num_colors() {
        commands
            .spawn((
                ColorButton,
                StateScoped(AppState::Playing),
                Mesh2d(mesh_and_mats.button.clone()),
                MeshMaterial2d(mesh_and_mats.palette_mat(color)),
                Transform::from_translation(layout.button_translation(color)),
            ))
            .observe(focus_on::<Pointer<Over>>(FocusTarget::Color(color)))
            .observe(send_on::<Pointer<Down>>(FloodCommand::Choose(color)));
    }

    // sits behind the focused color button and shows as an outline
    commands.spawn((
        FocusMarker::Outline,
        StateScoped(AppState::Playing),
        Mesh2d(mesh_and_mats.selector.clone()),
        MeshMaterial2d(mesh_and_mats.selector_mat.clone()),
        Transform::from_translation(layout.button_translation(0).with_z(5.0)),
    ));
    commands.spawn((
        FocusMarker::Caret,
        StateScoped(AppState::Playing),
        Text2d::new("^"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(SELECTOR_COLOR),
        Transform::from_translation(layout.caret_translation(0)),
    ));
    commands.spawn((
        FocusMarker::Arrow,
        StateScoped(AppState::Playing),
        Text2d::new(">"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(PALETTE[1]),
        Transform::from_translation(layout.arrow_translation()),
        Visibility::Hidden,
    ));

    commands
        .spawn((
            RestartButton,
            StateScoped(AppState::Playing),
            Mesh2d(mesh_and_mats.restart.clone()),
            MeshMaterial2d(mesh_and_mats.restart_mat.clone()),
            Transform::from_translation(layout.restart_translation()),
        ))
        .observe(focus_on::<Pointer<Over>>(FocusTarget::Restart))
        .observe(send_on::<Pointer<Down>>(FloodCommand::Restart))
        .with_child((
            RestartLabel,
            Text2d::new("Restart"),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::BLACK),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ));

    for (i, hint) in HINTS.into_iter().enumerate() {
        commands.spawn((
            Hint,
            StateScoped(AppState::Playing),
            Text2d::new(hint),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(HINT_COLOR),
            Anchor::CenterLeft,
            Transform::from_translation(layout.hint_translation(i)),
        ));
    }
}

/// spawn the move counter and the end of game banner
fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        MovesText,
        StateScoped(AppState::Playing),
        Text::default(),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(PALETTE[0]),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(40.0),
            ..default()
        },
    ));

    commands
        .spawn((
            Banner,
            StateScoped(AppState::Playing),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Percent(50.0),
                margin: UiRect::top(Val::Px(-50.0)),
                width: Val::Percent(100.0),
                height: Val::Px(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(WIN_COLOR),
            Visibility::Hidden,
        ))
        .with_children(|parent| {
            parent.spawn((
                BannerMessage,
                Text::default(),
                TextFont {
                    font_size: 30.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Press ENTER to restart"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Returns an observer that moves the keyboard focus to `target`.
fn focus_on<E: Event>(target: FocusTarget) -> impl Fn(Trigger<E>, ResMut<Focus>) {
    move |_trigger, mut focus| {
        focus.move_to(target);
    }
}

/// Returns an observer that sends `command` to the session.
fn send_on<E: Event>(command: FloodCommand) -> impl Fn(Trigger<E>, EventWriter<FloodCommand>) {
    move |_trigger, mut commands| {
        commands.send(command);
    }
}

fn handle_play_kbd(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut focus: ResMut<Focus>,
    session: Res<GameSession>,
    mut commands: EventWriter<FloodCommand>,
) {
    let confirm = keyboard_input.just_pressed(KeyCode::Enter);
    // only restarting is possible once the game is decided
    if session.is_over() {
        if confirm {
            commands.send(FloodCommand::Restart);
        }
        return;
    }

    if keyboard_input.any_just_pressed([KeyCode::ArrowUp, KeyCode::ArrowDown]) {
        focus.on_restart = !focus.on_restart;
    }

    if focus.on_restart {
        if confirm {
            commands.send(FloodCommand::Restart);
        }
        return;
    }

    let num_colors = session.board().num_colors();
    if keyboard_input.just_pressed(KeyCode::ArrowLeft) {
        focus.color = (focus.color + num_colors - 1) % num_colors;
    } else if keyboard_input.just_pressed(KeyCode::ArrowRight) {
        focus.color = (focus.color + 1) % num_colors;
    }
    if confirm {
        commands.send(FloodCommand::Choose(focus.color));
    }
}

fn apply_flood_commands(
    mut command_reader: EventReader<FloodCommand>,
    mut session: ResMut<GameSession>,
    mut focus: ResMut<Focus>,
) {
    for command in command_reader.read() {
        match *command {
            FloodCommand::Choose(color) => {
                let outcome = session.choose_color(color);
                debug!(?outcome, color, moves = session.moves_used(), "choose color");
                if outcome == MoveOutcome::Flooded {
                    match session.status() {
                        Status::Won => info!("board flooded in {} moves", session.moves_used()),
                        Status::Lost => info!("out of moves"),
                        Status::Ongoing => (),
                    }
                }
            }
            FloodCommand::Restart => {
                session.restart();
                *focus = Focus::default();
                info!("new board dealt");
            }
        }
    }
}

fn sync_cells(
    mut cell_query: Query<(&Cell, &mut MeshMaterial2d<ColorMaterial>)>,
    session: Res<GameSession>,
    mesh_and_mats: Res<MeshAndMats>,
) {
    let cells = session.board().cells();
    for (cell, mut material) in cell_query.iter_mut() {
        let wanted = mesh_and_mats.palette_mat(cells[**cell]);
        if material.0 != wanted {
            material.0 = wanted;
        }
    }
}

fn sync_hud(
    mut moves_query: Query<&mut Text, (With<MovesText>, Without<BannerMessage>)>,
    mut message_query: Query<&mut Text, With<BannerMessage>>,
    mut banner_query: Query<(&mut Visibility, &mut BackgroundColor), With<Banner>>,
    mut hint_query: Query<&mut Visibility, (With<Hint>, Without<Banner>)>,
    session: Res<GameSession>,
) {
    for mut text in moves_query.iter_mut() {
        **text = format!("Moves: {}/{}", session.moves_used(), session.max_moves());
    }

    let banner = match session.status() {
        Status::Ongoing => None,
        Status::Won => Some(("You Win!", WIN_COLOR)),
        Status::Lost => Some(("Game Over!", LOSS_COLOR)),
    };
    for (mut visibility, mut background) in banner_query.iter_mut() {
        match banner {
            Some((_, color)) => {
                *visibility = Visibility::Visible;
                background.0 = color;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
    if let Some((message, _)) = banner {
        for mut text in message_query.iter_mut() {
            **text = message.to_owned();
        }
    }
    for mut visibility in hint_query.iter_mut() {
        *visibility = if session.is_over() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

fn sync_focus(
    mut marker_query: Query<(&FocusMarker, &mut Transform, &mut Visibility)>,
    mut restart_query: Query<&mut MeshMaterial2d<ColorMaterial>, With<RestartButton>>,
    mut label_query: Query<&mut TextColor, With<RestartLabel>>,
    focus: Res<Focus>,
    layout: Res<BoardLayout>,
    mesh_and_mats: Res<MeshAndMats>,
) {
    for (marker, mut transform, mut visibility) in marker_query.iter_mut() {
        match marker.placement(&focus, &layout) {
            Some(translation) => {
                transform.translation = translation;
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
    for mut material in restart_query.iter_mut() {
        material.0 = if focus.on_restart {
            mesh_and_mats.restart_focused_mat.clone()
        } else {
            mesh_and_mats.restart_mat.clone()
        };
    }
    for mut color in label_query.iter_mut() {
        color.0 = if focus.on_restart {
            Color::WHITE
        } else {
            Color::BLACK
        };
    }
}

// ——> COMPONENTS

/// index of the board cell this mesh draws
#[derive(Component, Debug, Deref)]
#[require(Mesh2d)]
struct Cell(usize);

#[derive(Component)]
#[require(Mesh2d)]
struct ColorButton;

/// Points at the control that has keyboard focus.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum FocusMarker {
    /// outline behind the focused color button
    Outline,
    /// `^` over the focused color button
    Caret,
    /// `>` left of the restart button
    Arrow,
}

impl FocusMarker {
    /// Where the marker goes for `focus`, `None` while it should be hidden.
    fn placement(self, focus: &Focus, layout: &BoardLayout) -> Option<Vec3> {
        match self {
            Self::Outline if !focus.on_restart => {
                Some(layout.button_translation(focus.color).with_z(5.0))
            }
            Self::Caret if !focus.on_restart => Some(layout.caret_translation(focus.color)),
            Self::Arrow if focus.on_restart => Some(layout.arrow_translation()),
            _ => None,
        }
    }
}

#[derive(Component)]
#[require(Mesh2d)]
struct RestartButton;

#[derive(Component)]
struct RestartLabel;

#[derive(Component)]
struct Hint;

#[derive(Component)]
struct MovesText;

#[derive(Component)]
struct Banner;

#[derive(Component)]
struct BannerMessage;

// ——> RESOURCES

/// hold handles for meshes and materials
#[derive(Resource, Clone)]
struct MeshAndMats {
    cell: Handle<Mesh>,
    button: Handle<Mesh>,
    selector: Handle<Mesh>,
    restart: Handle<Mesh>,
    /// one material per color index
    palette: Vec<Handle<ColorMaterial>>,
    selector_mat: Handle<ColorMaterial>,
    restart_mat: Handle<ColorMaterial>,
    restart_focused_mat: Handle<ColorMaterial>,
}

impl MeshAndMats {
    #[inline]
    fn palette_mat(&self, color: u8) -> Handle<ColorMaterial> {
        self.palette
            .get(color as usize)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTarget {
    Color(u8),
    Restart,
}

/// Which control the keyboard acts on. The selected color is kept while the
/// restart button has focus.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Focus {
    color: u8,
    on_restart: bool,
}

impl Focus {
    fn move_to(&mut self, target: FocusTarget) {
        match target {
            FocusTarget::Color(color) => {
                self.color = color;
                self.on_restart = false;
            }
            FocusTarget::Restart => self.on_restart = true,
        }
    }
}

/// Where things go on screen. Row 0 of the board is drawn at the top.
#[derive(Resource, Clone, Copy)]
struct BoardLayout {
    /// the center of the board
    center: Vec2,
    /// the amount of cells on each axis
    size: u32,
    /// the size of each individual cell
    cell_size: Vec2,
}

impl BoardLayout {
    fn new(size: u32) -> Self {
        Self {
            center: BOARD_POS,
            size,
            cell_size: CELL_SIZE_PX,
        }
    }

    /// computes full size of the board in pixels
    #[inline]
    fn pixel_size(&self) -> Vec2 {
        vec2(
            self.size as f32 * self.cell_size.x,
            self.size as f32 * self.cell_size.y,
        )
    }

    #[inline]
    fn top_left(&self) -> Vec2 {
        self.center + self.pixel_size() * vec2(-0.5, 0.5)
    }

    #[inline]
    fn cell_coord_to_translation(&self, cell_coord: UVec2) -> Vec3 {
        (self.top_left()
            + (cell_coord.as_vec2() + Vec2::splat(0.5)) * self.cell_size * vec2(1.0, -1.0))
        .extend(10.0)
    }

    /// top edge of the row of color buttons
    #[inline]
    fn controls_top(&self) -> f32 {
        self.top_left().y - self.pixel_size().y - 10.0
    }

    #[inline]
    fn button_translation(&self, color: u8) -> Vec3 {
        vec3(
            self.top_left().x + color as f32 * BUTTON_SPACING_PX + BUTTON_SIZE_PX.x * 0.5,
            self.controls_top() - BUTTON_SIZE_PX.y * 0.5,
            10.0,
        )
    }

    #[inline]
    fn restart_translation(&self) -> Vec3 {
        vec3(
            self.top_left().x + RESTART_SIZE_PX.x * 0.5,
            self.controls_top() - 35.0 - RESTART_SIZE_PX.y * 0.5,
            10.0,
        )
    }

    /// just above the button, drawn over the board edge
    #[inline]
    fn caret_translation(&self, color: u8) -> Vec3 {
        self.button_translation(color)
            .with_y(self.controls_top() + 4.0)
            .with_z(15.0)
    }

    #[inline]
    fn arrow_translation(&self) -> Vec3 {
        self.restart_translation().with_x(self.top_left().x - 12.0)
    }

    #[inline]
    fn hint_translation(&self, line: usize) -> Vec3 {
        vec3(
            self.top_left().x,
            self.controls_top() - 75.0 - line as f32 * 15.0,
            10.0,
        )
    }
}
