//! What the active scene exposes to the focus engine.
//!
//! Scenes register their named buttons in well-known [`Slot`]s, raise modal
//! flags, signal content changes and register named callbacks. The surface is
//! reset on every scene transition; globally registered callbacks (such as
//! `mute`) survive the reset.

use bevy_ecs::prelude::{Entity, Resource};
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

use crate::resources::focus::FocusAction;

/// Outcome of a scene callback. The error string ends up in the log.
pub type CallbackResult = Result<(), String>;

/// A registered callback system.
pub type Callback = SystemId<(), CallbackResult>;

/// Well-known named button slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
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
}

impl Slot {
    /// Order in which discovery surfaces slots.
    pub const DISCOVERY_ORDER: [Slot; 13] = [
        Slot::Play,
        Slot::Mute,
        Slot::ChooseFf,
        Slot::ChoosePp,
        Slot::Next,
        Slot::Home,
        Slot::Replay,
        Slot::Pause,
        Slot::Level1,
        Slot::Level2,
        Slot::Level3,
        Slot::Resume,
        Slot::Restart,
    ];

    pub fn action(&self) -> FocusAction {
        match self {
            Slot::Play => FocusAction::Play,
            Slot::Mute => FocusAction::Mute,
            Slot::ChooseFf => FocusAction::ChooseFf,
            Slot::ChoosePp => FocusAction::ChoosePp,
            Slot::Next => FocusAction::Next,
            Slot::Home => FocusAction::Home,
            Slot::Replay => FocusAction::Replay,
            Slot::Pause => FocusAction::Pause,
            Slot::Level1 => FocusAction::Level1,
            Slot::Level2 => FocusAction::Level2,
            Slot::Level3 => FocusAction::Level3,
            Slot::Resume => FocusAction::Resume,
            Slot::Restart => FocusAction::Restart,
        }
    }
}

/// Buttons of the find-and-fix modal boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalButtons {
    pub results_next: Option<Entity>,
    pub fix_it: Option<Entity>,
    pub its_ok: Option<Entity>,
}

#[derive(Resource, Debug, Default)]
pub struct SceneSurface {
    slots: FxHashMap<Slot, Entity>,
    /// Find-and-fix results box is showing.
    pub results_open: bool,
    /// Find-and-fix question box is showing.
    pub question_open: bool,
    pub modal: ModalButtons,
    content_changed: bool,
    callbacks: FxHashMap<String, Callback>,
    global_callbacks: FxHashMap<String, Callback>,
    /// Scene observers torn down with the scene.
    observers: Vec<Entity>,
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything the previous scene registered.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.results_open = false;
        self.question_open = false;
        self.modal = ModalButtons::default();
        self.content_changed = false;
        self.callbacks.clear();
        self.observers.clear();
    }

    /// Entities the scene registered outside of its element tree: callback
    /// systems and observers.
    pub fn scene_owned(&self) -> Vec<Entity> {
        self.callbacks
            .values()
            .map(|id| id.entity())
            .chain(self.observers.iter().copied())
            .collect()
    }

    /// Tie an observer entity to the current scene.
    pub fn adopt_observer(&mut self, observer: Entity) {
        self.observers.push(observer);
    }

    pub fn set_slot(&mut self, slot: Slot, entity: Entity) {
        self.slots.insert(slot, entity);
    }

    pub fn clear_slot(&mut self, slot: Slot) {
        self.slots.remove(&slot);
    }

    pub fn slot(&self, slot: Slot) -> Option<Entity> {
        self.slots.get(&slot).copied()
    }

    /// Slot `entity` is registered in, if any.
    pub fn slot_of(&self, entity: Entity) -> Option<Slot> {
        self.slots
            .iter()
            .find(|(_, e)| **e == entity)
            .map(|(slot, _)| *slot)
    }

    /// Ask the focus engine to rediscover on its next poll.
    pub fn signal_content_changed(&mut self) {
        self.content_changed = true;
    }

    /// Read and clear the content-changed signal.
    pub fn take_content_changed(&mut self) -> bool {
        std::mem::take(&mut self.content_changed)
    }

    /// Register a callback for the current scene.
    pub fn register_callback(&mut self, name: impl Into<String>, id: Callback) {
        self.callbacks.insert(name.into(), id);
    }

    /// Register a callback that survives scene transitions.
    pub fn register_global_callback(&mut self, name: impl Into<String>, id: Callback) {
        self.global_callbacks.insert(name.into(), id);
    }

    /// Scene callback by name.
    pub fn callback(&self, name: &str) -> Option<Callback> {
        self.callbacks.get(name).copied()
    }

    pub fn global_callback(&self, name: &str) -> Option<Callback> {
        self.global_callbacks.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    fn noop() -> CallbackResult {
        Ok(())
    }

    #[test]
    fn test_content_changed_is_taken_once() {
        let mut s = SceneSurface::new();
        s.signal_content_changed();
        assert!(s.take_content_changed());
        assert!(!s.take_content_changed());
    }

    #[test]
    fn test_reset_keeps_global_callbacks() {
        let mut world = World::new();
        let scene_cb = world.register_system(noop);
        let global_cb = world.register_system(noop);
        let mut s = SceneSurface::new();
        s.set_slot(Slot::Play, world.spawn_empty().id());
        s.register_callback("play", scene_cb);
        s.register_global_callback("mute", global_cb);
        s.results_open = true;
        s.reset();
        assert!(s.slot(Slot::Play).is_none());
        assert!(s.callback("play").is_none());
        assert!(!s.results_open);
        assert_eq!(s.global_callback("mute"), Some(global_cb));
    }

    #[test]
    fn test_scene_owned_lists_callbacks_and_observers_only() {
        let mut world = World::new();
        let scene_cb = world.register_system(noop);
        let global_cb = world.register_system(noop);
        let observer = world.spawn_empty().id();
        let mut s = SceneSurface::new();
        s.register_callback("play", scene_cb);
        s.register_global_callback("mute", global_cb);
        s.adopt_observer(observer);
        let owned = s.scene_owned();
        assert!(owned.contains(&scene_cb.entity()));
        assert!(owned.contains(&observer));
        assert!(!owned.contains(&global_cb.entity()));
        s.reset();
        assert!(s.scene_owned().is_empty());
    }

    #[test]
    fn test_slot_of_finds_registered_entity() {
        let mut world = World::new();
        let pause = world.spawn_empty().id();
        let other = world.spawn_empty().id();
        let mut s = SceneSurface::new();
        s.set_slot(Slot::Pause, pause);
        assert_eq!(s.slot_of(pause), Some(Slot::Pause));
        assert_eq!(s.slot_of(other), None);
    }

    #[test]
    fn test_discovery_order_starts_with_play_and_ends_with_restart() {
        assert_eq!(Slot::DISCOVERY_ORDER[0].action(), FocusAction::Play);
        assert_eq!(Slot::DISCOVERY_ORDER[12].action(), FocusAction::Restart);
    }
}
