use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    prelude::{HINT_COLOR, PALETTE},
    state::AppState,
};

const MENU_ITEMS: [(&str, AppState); 2] = [
    ("Start", AppState::Playing),
    ("Instructions", AppState::Instructions),
];

const INSTRUCTIONS: [&str; 5] = [
    "Use LEFT/RIGHT arrows to select colors",
    "Press ENTER to flood with selected color",
    "Use UP/DOWN to switch between colors and restart",
    "Fill entire board with one color in few moves",
    "Press ESC to return to menu",
];

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuSelection>()
            .enable_state_scoped_entities::<AppState>()
            .add_systems(
                OnEnter(AppState::Menu),
                (reset_menu_selection, spawn_menu).chain(),
            )
            .add_systems(OnEnter(AppState::Instructions), spawn_instructions)
            .add_systems(
                Update,
                (
                    (handle_menu_kbd, highlight_menu_items)
                        .chain()
                        .run_if(in_state(AppState::Menu)),
                    back_to_menu.run_if(
                        in_state(AppState::Instructions)
                            .and(input_just_pressed(KeyCode::Enter))
                            .or(input_just_pressed(KeyCode::Escape).and(
                                in_state(AppState::Playing).or(in_state(AppState::Instructions)),
                            )),
                    ),
                ),
            );
    }
}

// ——> SYSTEMS

fn reset_menu_selection(mut selection: ResMut<MenuSelection>) {
    **selection = 0;
}

fn spawn_menu(mut commands: Commands) {
    commands
        .spawn((
            StateScoped(AppState::Menu),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::top(Val::Px(100.0)),
                row_gap: Val::Px(20.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("TINY FLOOD"),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(PALETTE[1]),
                Node {
                    margin: UiRect::bottom(Val::Px(120.0)),
                    ..default()
                },
            ));
            for (i, (label, _)) in MENU_ITEMS.iter().enumerate() {
                parent.spawn((
                    MenuItem(i),
                    Text::new(*label),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(PALETTE[0]),
                ));
            }
            parent.spawn((
                Text::new("Use UP/DOWN arrows and ENTER to navigate"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(HINT_COLOR),
                Node {
                    margin: UiRect::top(Val::Px(60.0)),
                    ..default()
                },
            ));
        });
}

fn spawn_instructions(mut commands: Commands) {
    commands
        .spawn((
            StateScoped(AppState::Instructions),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::new(Val::Px(40.0), Val::Px(40.0), Val::Px(100.0), Val::Px(50.0)),
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Instructions"),
                TextFont {
                    font_size: 30.0,
                    ..default()
                },
                TextColor(PALETTE[1]),
            ));
            for line in INSTRUCTIONS {
                parent.spawn((
                    Text::new(line),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(PALETTE[0]),
                ));
            }
            // pushes the hint to the bottom
            parent.spawn(Node {
                flex_grow: 1.0,
                ..default()
            });
            parent.spawn((
                Text::new("Press ENTER to return to menu"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(PALETTE[1]),
                Node {
                    align_self: AlignSelf::Center,
                    ..default()
                },
            ));
        });
}

fn handle_menu_kbd(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut selection: ResMut<MenuSelection>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    let len = MENU_ITEMS.len();
    if keyboard_input.just_pressed(KeyCode::ArrowUp) {
        **selection = (**selection + len - 1) % len;
    } else if keyboard_input.just_pressed(KeyCode::ArrowDown) {
        **selection = (**selection + 1) % len;
    }

    if keyboard_input.just_pressed(KeyCode::Enter) {
        let (label, target) = MENU_ITEMS[**selection];
        debug!("menu: {label}");
        next_state.set(target);
    } else if keyboard_input.just_pressed(KeyCode::Escape) {
        info!("leaving from the menu");
        exit.send(AppExit::Success);
    }
}

fn highlight_menu_items(
    mut item_query: Query<(&MenuItem, &mut Text, &mut TextColor)>,
    selection: Res<MenuSelection>,
) {
    for (item, mut text, mut color) in item_query.iter_mut() {
        let label = MENU_ITEMS[**item].0;
        let (wanted, wanted_color) = if **item == **selection {
            (format!("> {label}"), PALETTE[1])
        } else {
            (label.to_owned(), PALETTE[0])
        };
        // only touch the components when something changed, to avoid relayouts
        if text.as_str() != wanted {
            **text = wanted;
            color.0 = wanted_color;
        }
    }
}

fn back_to_menu(mut next_state: ResMut<NextState<AppState>>) {
    next_state.set(AppState::Menu);
}

// ——> COMPONENTS

#[derive(Component, Debug, Deref)]
struct MenuItem(usize);

// ——> RESOURCES

/// index into the menu items
#[derive(Resource, Debug, Default, Deref, DerefMut)]
struct MenuSelection(usize);
