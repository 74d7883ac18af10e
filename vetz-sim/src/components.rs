//! The actor component that owns an experience tracker.

use std::sync::Arc;

use tracing::debug;
use vetz_core::{
    ExperienceOwner, ExperienceTracker, LevelChange, ObjectId, Result, Snapshot, Xfer,
};

use crate::templates::ThingTemplate;

/// Level changes kept per actor; older entries are dropped.
pub const LEVEL_HISTORY_LEN: usize = 16;

/// A live object in the simulation.
///
/// The actor owns its tracker outright and shares its template with every
/// other actor of the same type. Its veterancy level is the tracker's level.
#[derive(Debug, Clone)]
pub struct Actor {
    id: ObjectId,
    template: Arc<ThingTemplate>,
    tracker: ExperienceTracker,
    max_health: f32,
    level_history: Vec<LevelChange>,
    level_changes: u64,
}

impl Actor {
    /// Construct an actor; its tracker is linked back to `id`.
    #[must_use]
    pub fn new(id: ObjectId, template: Arc<ThingTemplate>) -> Self {
        let max_health = template.max_health_at(0);
        Self {
            id,
            template,
            tracker: ExperienceTracker::new(id),
            max_health,
            level_history: Vec::new(),
            level_changes: 0,
        }
    }

    /// Registry id.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Template name.
    #[must_use]
    pub fn template_name(&self) -> &str {
        &self.template.name
    }

    /// Max health, recomputed on every level change.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// The most recent level changes, oldest first, at most
    /// [`LEVEL_HISTORY_LEN`] of them.
    #[must_use]
    pub fn level_history(&self) -> &[LevelChange] {
        &self.level_history
    }

    /// Level changes this actor has been told about since it was created.
    #[must_use]
    pub fn level_change_count(&self) -> u64 {
        self.level_changes
    }

    /// Experience awarded to whoever kills this actor.
    #[must_use]
    pub fn kill_experience_value(&self, killer: Option<ObjectId>) -> i32 {
        self.tracker.kill_experience_value(self, killer)
    }

    /// Whether experience sent to this actor goes anywhere.
    #[must_use]
    pub fn is_accepting_experience(&self) -> bool {
        self.tracker.is_accepting_experience(self)
    }

    fn refresh_stats(&mut self) {
        self.max_health = self.template.max_health_at(self.tracker.current_level());
    }
}

impl ExperienceOwner for Actor {
    type Template = ThingTemplate;

    fn template(&self) -> &ThingTemplate {
        &self.template
    }

    fn veterancy_level(&self) -> u32 {
        self.tracker.current_level()
    }

    fn experience_tracker(&self) -> &ExperienceTracker {
        &self.tracker
    }

    fn experience_tracker_mut(&mut self) -> &mut ExperienceTracker {
        &mut self.tracker
    }

    fn on_experience_level_changed(&mut self, old_level: u32, new_level: u32) {
        self.refresh_stats();
        if self.level_history.len() == LEVEL_HISTORY_LEN {
            self.level_history.remove(0);
        }
        self.level_history.push(LevelChange {
            old: old_level,
            new: new_level,
        });
        self.level_changes += 1;
        debug!(
            actor = %self.id,
            template = %self.template.name,
            old_level,
            new_level,
            max_health = self.max_health,
            "veterancy changed"
        );
    }
}

impl Snapshot for Actor {
    fn crc(&self, xfer: &mut dyn Xfer) -> Result<()> {
        let mut id = self.id;
        xfer.xfer_object_id(&mut id)?;
        self.tracker.crc(xfer)
    }

    fn xfer(&mut self, xfer: &mut dyn Xfer) -> Result<()> {
        self.tracker.xfer(xfer)
    }

    fn load_post_process(&mut self) -> Result<()> {
        self.tracker.load_post_process()?;
        self.refresh_stats();
        Ok(())
    }
}
