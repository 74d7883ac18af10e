//! Event processing.
//!
//! One entry point, [`process_event`], applied in event order each frame.
//! Every replica must feed the same events in the same order for world crcs
//! to agree.

use tracing::{debug, trace};
use vetz_core::{ExperienceOwner, ExperienceWorldExt, ObjectId, Result, VetzError};

use crate::events::GameEvent;
use crate::world::GameWorld;

/// Apply a single event to the world.
///
/// A kill prices the victim *before* removing it, then awards the value to
/// a killer that is accepting experience, with bonus scaling. All other
/// events map directly onto tracker operations and are silent no-ops for
/// missing actors.
///
/// # Errors
/// Returns [`VetzError::ObjectNotFound`] when a kill names a victim that is
/// not alive.
pub fn process_event(world: &mut GameWorld, event: &GameEvent) -> Result<()> {
    trace!(subject = %event.subject(), ?event, "processing event");
    match *event {
        GameEvent::Kill { killer, victim } => {
            let value = world
                .get(victim)
                .ok_or(VetzError::ObjectNotFound(victim))?
                .kill_experience_value(killer);
            world.destroy(victim);

            let Some(killer) = killer else {
                return Ok(());
            };
            if world.get(killer).is_some_and(|actor| actor.is_accepting_experience()) {
                debug!(%killer, %victim, value, "awarding kill experience");
                world.add_experience(killer, value, true);
            }
        }
        GameEvent::Grant {
            target,
            points,
            scale_by_bonus,
        } => world.add_experience(target, points, scale_by_bonus),
        GameEvent::Promote { target, levels } => {
            world.gain_levels(target, levels, false);
        }
        GameEvent::Redirect {
            source,
            sink,
            scalar,
        } => {
            if let Some(actor) = world.get_mut(source) {
                let tracker = actor.experience_tracker_mut();
                tracker.set_sink(sink.unwrap_or(ObjectId::INVALID));
                tracker.set_sink_scalar(scalar);
            }
        }
    }
    Ok(())
}

/// Apply events in order, stopping at the first error.
///
/// # Errors
/// See [`process_event`].
pub fn process_events<'a>(world: &mut GameWorld, events: impl IntoIterator<Item = &'a GameEvent>) -> Result<()> {
    events.into_iter().try_for_each(|event| process_event(world, event))
}
