//! The object registry.
//!
//! [`GameWorld`] stores live actors by [`ObjectId`] in id order, which is the
//! order save and crc walk them, and hands ids out from a counter that is
//! never reused within a session. Implementing
//! [`ExperienceWorld`] makes every
//! [`ExperienceWorldExt`](vetz_core::ExperienceWorldExt) operation available
//! directly on the world.

use std::collections::BTreeMap;

use tracing::debug;
use vetz_core::{ExperienceWorld, LevelCurve, ObjectId, Result, VetzConfig, VetzError};

use crate::components::Actor;
use crate::templates::TemplateRegistry;

/// Registry of live actors plus the rules they level under.
#[derive(Debug, Clone)]
pub struct GameWorld {
    actors: BTreeMap<ObjectId, Actor>,
    templates: TemplateRegistry,
    next_id: u32,
    curve: LevelCurve,
    max_sink_depth: u32,
}

impl GameWorld {
    /// An empty world using `config`'s curve and forwarding bound.
    #[must_use]
    pub fn new(config: &VetzConfig, templates: TemplateRegistry) -> Self {
        Self {
            actors: BTreeMap::new(),
            templates,
            next_id: 1,
            curve: config.curve.build(),
            max_sink_depth: config.tracker.max_sink_depth,
        }
    }

    /// Create an actor of type `template` and return its id.
    ///
    /// # Errors
    /// Returns [`VetzError::UnknownTemplate`] for an unregistered name, or
    /// [`VetzError::IdsExhausted`] once the counter reaches `u32::MAX`.
    pub fn spawn(&mut self, template: &str) -> Result<ObjectId> {
        let template = self.templates.require(template)?;
        let next_id = self.next_id.checked_add(1).ok_or(VetzError::IdsExhausted)?;
        let id = ObjectId::new(self.next_id);
        self.next_id = next_id;
        debug!(actor = %id, template = %template.name, "spawned");
        self.actors.insert(id, Actor::new(id, template));
        Ok(id)
    }

    /// Remove an actor. Trackers that sink into it fall back to local
    /// processing from now on.
    pub fn destroy(&mut self, id: ObjectId) -> Option<Actor> {
        let removed = self.actors.remove(&id);
        if removed.is_some() {
            debug!(actor = %id, "destroyed");
        }
        removed
    }

    /// A live actor.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// A live actor, mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Whether `id` is alive.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Live actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Number of live actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actors are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Templates this world spawns from.
    #[must_use]
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Next id [`spawn`](Self::spawn) will hand out.
    #[must_use]
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub(crate) fn actors_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.values_mut()
    }

    pub(crate) fn restore(&mut self, actor: Actor) {
        self.actors.insert(actor.id(), actor);
    }

    pub(crate) fn set_next_id(&mut self, next_id: u32) {
        self.next_id = next_id;
    }
}

impl ExperienceWorld for GameWorld {
    type Owner = Actor;

    fn find_object(&self, id: ObjectId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    fn level_curve(&self) -> LevelCurve {
        self.curve
    }

    fn max_sink_depth(&self) -> u32 {
        self.max_sink_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::ThingTemplate;
    use vetz_core::{ExperienceOwner, ExperienceWorldExt};

    fn world() -> GameWorld {
        let mut templates = TemplateRegistry::new();
        templates.insert(ThingTemplate::new("Ranger", true).with_health(180.0, 20.0));
        templates.insert(ThingTemplate::new("Bunker", false));
        GameWorld::new(&VetzConfig::default(), templates)
    }

    #[test]
    fn spawn_hands_out_increasing_ids() {
        let mut world = world();
        let a = world.spawn("Ranger").expect("spawn");
        let b = world.spawn("Bunker").expect("spawn");
        assert_eq!(a, ObjectId::new(1));
        assert_eq!(b, ObjectId::new(2));
        assert_eq!(world.next_id(), 3);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_destroy() {
        let mut world = world();
        let a = world.spawn("Ranger").expect("spawn");
        assert!(world.destroy(a).is_some());
        assert!(world.destroy(a).is_none());
        let b = world.spawn("Ranger").expect("spawn");
        assert_ne!(a, b);
        assert!(!world.contains(a));
    }

    #[test]
    fn spawn_refuses_to_wrap_the_id_counter() {
        let mut world = world();
        world.set_next_id(u32::MAX - 1);
        let last = world.spawn("Ranger").expect("one id left");
        assert_eq!(last, ObjectId::new(u32::MAX - 1));

        let err = world.spawn("Ranger").expect_err("counter at u32::MAX");
        assert!(matches!(err, VetzError::IdsExhausted));
        assert_eq!(world.next_id(), u32::MAX);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn spawn_unknown_template_fails() {
        let mut world = world();
        assert!(matches!(world.spawn("Ghost"), Err(VetzError::UnknownTemplate(_))));
        assert!(world.is_empty());
    }

    #[test]
    fn experience_ops_drive_actor_stats() {
        let mut world = world();
        let a = world.spawn("Ranger").expect("spawn");
        world.add_experience(a, 169, false);

        let actor = world.get(a).expect("alive");
        assert_eq!(actor.veterancy_level(), 3);
        assert!((actor.max_health() - 240.0).abs() < f32::EPSILON);
        assert_eq!(actor.level_history().len(), 1);
    }

    #[test]
    fn sink_dies_between_calls() {
        let mut world = world();
        let rider = world.spawn("Ranger").expect("spawn");
        let transport = world.spawn("Ranger").expect("spawn");
        world
            .get_mut(rider)
            .expect("alive")
            .experience_tracker_mut()
            .set_sink(transport);

        world.add_experience(rider, 100, false);
        assert_eq!(world.get(transport).expect("alive").veterancy_level(), 1);
        assert_eq!(world.get(rider).expect("alive").veterancy_level(), 0);

        world.destroy(transport);
        world.add_experience(rider, 100, false);
        assert_eq!(world.get(rider).expect("alive").veterancy_level(), 1);
    }

    #[test]
    fn legacy_curve_from_config() {
        let config = VetzConfig::from_toml("[curve]\nkind = \"linear\"").expect("valid");
        let mut templates = TemplateRegistry::new();
        templates.insert(ThingTemplate::new("Ranger", true));
        let mut world = GameWorld::new(&config, templates);
        let a = world.spawn("Ranger").expect("spawn");

        world.add_experience(a, 250, false);
        assert_eq!(world.get(a).expect("alive").veterancy_level(), 2);
        assert!(world.gain_levels(a, 1, false));
        assert_eq!(
            world.get(a).expect("alive").experience_tracker().current_points(),
            300
        );
    }
}
