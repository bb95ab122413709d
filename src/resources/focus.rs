//! Focus navigation engine state.
//!
//! [`FocusEngine`] owns the ordered list of focusable elements surfaced by the
//! active scene and the index of the single focused element. The list is
//! rebuilt wholesale by the discovery pass (see [`crate::systems::focus`]);
//! every rebuild resets focus to the first element. Navigation wraps modulo
//! the list length, except on grid scenes where a fixed adjacency table
//! decides the target.
//!
//! The engine also carries the poll timer and the snapshots used to detect
//! when rediscovery is needed.

use bevy_ecs::prelude::{Entity, Resource};
use log::debug;

use crate::resources::scene::SceneKind;

/// What activating an element does. Each variant maps to one dispatch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusAction {
    Play,
    Mute,
    ChooseFf,
    ChoosePp,
    Next,
    Home,
    Replay,
    Pause,
    Level1,
    Level2,
    Level3,
    Resume,
    Restart,
    FfOption,
    FfFixIt,
    FfItsOk,
    FfNext,
    PpChoice,
}

impl FocusAction {
    /// Short tag used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            FocusAction::Play => "play",
            FocusAction::Mute => "mute",
            FocusAction::ChooseFf => "ff",
            FocusAction::ChoosePp => "pp",
            FocusAction::Next => "next",
            FocusAction::Home => "home",
            FocusAction::Replay => "replay",
            FocusAction::Pause => "pause",
            FocusAction::Level1 => "level1",
            FocusAction::Level2 => "level2",
            FocusAction::Level3 => "level3",
            FocusAction::Resume => "resume",
            FocusAction::Restart => "restart",
            FocusAction::FfOption => "ff-option",
            FocusAction::FfFixIt => "ff-fixit",
            FocusAction::FfItsOk => "ff-itsok",
            FocusAction::FfNext => "ff-next",
            FocusAction::PpChoice => "pp-choice",
        }
    }

    /// Tags whose buttons are drawn round.
    pub fn is_round_button(&self) -> bool {
        matches!(
            self,
            FocusAction::Play
                | FocusAction::Pause
                | FocusAction::Home
                | FocusAction::Replay
                | FocusAction::Mute
                | FocusAction::Resume
                | FocusAction::Restart
        )
    }

    pub fn is_freeform_option(&self) -> bool {
        matches!(self, FocusAction::FfOption)
    }
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Linear meaning: Right/Down advance, Left/Up go back.
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

/// One entry of the focus list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusableElement {
    pub handle: Entity,
    pub action: FocusAction,
    /// Option id for collection members (freeform options, choice buttons).
    pub option_index: Option<usize>,
}

impl FocusableElement {
    pub fn new(handle: Entity, action: FocusAction) -> Self {
        Self {
            handle,
            action,
            option_index: None,
        }
    }

    pub fn with_option(handle: Entity, action: FocusAction, index: usize) -> Self {
        Self {
            handle,
            action,
            option_index: Some(index),
        }
    }
}

/// Pause menu layout:
///
/// ```text
/// Resume  Restart
/// Home    Mute
/// ```
pub const PAUSE_GRID: [(FocusAction, Direction, FocusAction); 8] = [
    (FocusAction::Resume, Direction::Right, FocusAction::Restart),
    (FocusAction::Resume, Direction::Down, FocusAction::Home),
    (FocusAction::Restart, Direction::Left, FocusAction::Resume),
    (FocusAction::Restart, Direction::Down, FocusAction::Mute),
    (FocusAction::Home, Direction::Up, FocusAction::Resume),
    (FocusAction::Home, Direction::Right, FocusAction::Mute),
    (FocusAction::Mute, Direction::Up, FocusAction::Restart),
    (FocusAction::Mute, Direction::Left, FocusAction::Home),
];

/// Grid neighbour of `from` in `direction`, if the table has one.
pub fn grid_target(from: FocusAction, direction: Direction) -> Option<FocusAction> {
    PAUSE_GRID
        .iter()
        .find(|(src, dir, _)| *src == from && *dir == direction)
        .map(|(_, _, dst)| *dst)
}

/// Secondary visibility state of a scene that forces rediscovery on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchSnapshot {
    pub results_open: bool,
    pub question_open: bool,
    pub results_next_visible: bool,
}

/// Focus navigation engine resource.
#[derive(Resource, Debug)]
pub struct FocusEngine {
    elements: Vec<FocusableElement>,
    index: usize,
    last_generation: Option<u64>,
    last_watch: Option<WatchSnapshot>,
    poll_interval: f32,
    poll_elapsed: f32,
    glow: Option<Entity>,
}

impl Default for FocusEngine {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FocusEngine {
    /// Create an engine polling every `poll_interval` seconds.
    pub fn new(poll_interval: f32) -> Self {
        Self {
            elements: Vec::new(),
            index: 0,
            last_generation: None,
            last_watch: None,
            poll_interval: poll_interval.max(0.0),
            poll_elapsed: 0.0,
            glow: None,
        }
    }

    /// Replace the focus list and reset focus to the first element.
    pub fn rebuild(&mut self, elements: Vec<FocusableElement>) {
        debug!(
            "focus list rebuilt: [{}]",
            elements
                .iter()
                .map(|e| e.action.tag())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.elements = elements;
        self.index = 0;
    }

    pub fn elements(&self) -> &[FocusableElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The focused element, or `None` when the list is empty.
    pub fn focused(&self) -> Option<&FocusableElement> {
        self.elements.get(self.index)
    }

    /// Focus the entry for `handle`. Returns `false` when it is not listed.
    pub fn focus_handle(&mut self, handle: Entity) -> bool {
        match self.elements.iter().position(|e| e.handle == handle) {
            Some(pos) => {
                self.index = pos;
                true
            }
            None => false,
        }
    }

    /// Step forward or back with wraparound. Returns whether focus moved.
    pub fn move_linear(&mut self, forward: bool) -> bool {
        let len = self.elements.len();
        if len == 0 {
            return false;
        }
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
        true
    }

    /// Move along the pause grid. No mapping, or a target missing from the
    /// list, leaves focus where it is.
    pub fn move_grid(&mut self, direction: Direction) -> bool {
        let Some(current) = self.focused().map(|e| e.action) else {
            return false;
        };
        let Some(target) = grid_target(current, direction) else {
            return false;
        };
        match self.elements.iter().position(|e| e.action == target) {
            Some(pos) => {
                self.index = pos;
                true
            }
            None => false,
        }
    }

    /// Navigate according to the scene kind.
    pub fn navigate(&mut self, kind: SceneKind, direction: Direction) -> bool {
        match kind {
            SceneKind::PauseGrid => self.move_grid(direction),
            _ => self.move_linear(direction.is_forward()),
        }
    }

    /// Advance the poll timer. Returns `true` when a poll tick is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.poll_elapsed += dt.max(0.0);
        if self.poll_elapsed >= self.poll_interval {
            self.poll_elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn poll_interval(&self) -> f32 {
        self.poll_interval
    }

    /// Compare the scene identity, content signal and watch snapshot with the
    /// previous poll and remember the new values. Returns `true` when the
    /// focus list must be rediscovered.
    pub fn needs_rediscovery(
        &mut self,
        generation: u64,
        watch: WatchSnapshot,
        content_changed: bool,
    ) -> bool {
        let scene_changed = self.last_generation != Some(generation);
        let watch_changed = self.last_watch != Some(watch);
        self.last_generation = Some(generation);
        self.last_watch = Some(watch);
        scene_changed || watch_changed || content_changed
    }

    pub fn glow(&self) -> Option<Entity> {
        self.glow
    }

    pub fn set_glow(&mut self, glow: Entity) {
        self.glow = Some(glow);
    }
}
