//! Scene identity and transition resources.
//!
//! [`CurrentScene`] is the authoritative active scene; [`NextScene`] records a
//! requested transition that [`crate::systems::scene::check_pending_scene`]
//! turns into a [`SceneChangedEvent`](crate::events::scene::SceneChangedEvent).
//! [`SceneRegistry`] maps scene names to their kind and setup system.
//! [`GameSelection`] is the small piece of shared game state that survives
//! transitions (chosen option, score lock, last scene).

use bevy_ecs::prelude::Resource;
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

/// Navigation and discovery flavour of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneKind {
    /// Named slots, linear navigation.
    #[default]
    Linear,
    /// Named slots, navigated by the pause grid table.
    PauseGrid,
    /// Find-and-fix: modal results/question boxes over freeform options.
    FindAndFix,
    /// Pollute-or-protect question: ordered choice buttons.
    ChoiceList,
}

/// Authoritative active scene.
///
/// `generation` increases on every scene entry, so restarting the same scene
/// is still seen as a scene change.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentScene {
    id: String,
    kind: SceneKind,
    generation: u64,
}

impl CurrentScene {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn kind(&self) -> SceneKind {
        self.kind
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    /// Enter a scene.
    pub fn set(&mut self, id: impl Into<String>, kind: SceneKind) {
        self.id = id.into();
        self.kind = kind;
        self.generation += 1;
    }
}

/// Representation of a requested next scene.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NextScenes {
    #[default]
    Unchanged,
    Pending(String),
}

/// Intent to change to a new scene.
#[derive(Resource, Debug, Clone, Default)]
pub struct NextScene {
    next: NextScenes,
}

impl NextScene {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self) -> &NextScenes {
        &self.next
    }
    /// Request a transition to `scene`. Applied on the next frame.
    pub fn set(&mut self, scene: impl Into<String>) {
        self.next = NextScenes::Pending(scene.into());
    }
    pub fn reset(&mut self) {
        self.next = NextScenes::Unchanged;
    }
}

/// How to build a scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneEntry {
    pub kind: SceneKind,
    pub setup: SystemId,
}

/// Map of scene names to their entry.
#[derive(Resource, Default)]
pub struct SceneRegistry {
    map: FxHashMap<String, SceneEntry>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, name: impl Into<String>, kind: SceneKind, setup: SystemId) {
        self.map.insert(name.into(), SceneEntry { kind, setup });
    }
    pub fn get(&self, name: &str) -> Option<&SceneEntry> {
        self.map.get(name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}

/// Shared game state mutated by activations and read by scenes.
#[derive(Resource, Debug, Clone, Default)]
pub struct GameSelection {
    /// Option id picked on the choice-list question.
    pub chosen_option: Option<usize>,
    /// Set once the score for the current question has been counted.
    pub score_locked: bool,
    /// Display order of the choice buttons; empty means "shuffle again".
    pub option_order: Vec<usize>,
    /// Scene to return to from the pause menu.
    pub last_scene: Option<String>,
    /// Level picked on the level select screen.
    pub level: u8,
    pub score: u32,
}

impl GameSelection {
    /// Record a choice-list answer and invalidate the previous question state.
    pub fn choose(&mut self, option: usize) {
        self.chosen_option = Some(option);
        self.score_locked = false;
        self.option_order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_increases_on_reentry() {
        let mut s = CurrentScene::new();
        s.set("Title", SceneKind::Linear);
        let g = s.generation();
        s.set("Title", SceneKind::Linear);
        assert_eq!(s.generation(), g + 1);
        assert_eq!(s.id(), "Title");
    }

    #[test]
    fn test_next_scene_pending_and_reset() {
        let mut n = NextScene::new();
        assert_eq!(n.get(), &NextScenes::Unchanged);
        n.set("PauseState");
        assert_eq!(n.get(), &NextScenes::Pending("PauseState".into()));
        n.reset();
        assert_eq!(n.get(), &NextScenes::Unchanged);
    }

    #[test]
    fn test_choose_clears_question_state() {
        let mut sel = GameSelection {
            score_locked: true,
            option_order: vec![2, 0, 1],
            ..Default::default()
        };
        sel.choose(1);
        assert_eq!(sel.chosen_option, Some(1));
        assert!(!sel.score_locked);
        assert!(sel.option_order.is_empty());
    }
}
