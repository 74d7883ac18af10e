//! Collaborator traits and the gated experience operations.
//!
//! The tracker needs three things from its host game:
//!
//! - [`ExperienceTemplate`]: static per-type data (trainable flag, kill value
//!   per veterancy level)
//! - [`ExperienceOwner`]: the actor that owns a tracker and reacts to level
//!   changes
//! - [`ExperienceWorld`]: lookup of live actors by [`ObjectId`], plus the
//!   deployment's level curve and forwarding bound
//!
//! [`ExperienceWorldExt`] is blanket-implemented for every world and carries
//! the operations game logic calls: sinks are resolved on every call (never
//! cached), rejected calls are silent, and the owner hears about a level
//! change exactly once per call.
//!
//! ## Sink chains
//!
//! Forwarding is a same-thread recursive hop per sink. A cycle (A → B → A)
//! would never terminate, so hops are bounded by
//! [`ExperienceWorld::max_sink_depth`]. The actor at which the bound is hit
//! processes the call locally, exactly as if its sink had died.

use tracing::{debug, trace, warn};

use crate::curve::LevelCurve;
use crate::tracker::ExperienceTracker;
use crate::types::{LevelChange, ObjectId};

/// Static type data an actor's template exposes to the tracker.
pub trait ExperienceTemplate {
    /// Base experience awarded for killing an actor of this type at `level`.
    fn experience_value(&self, level: u32) -> i32;

    /// Whether actors of this type gain experience at all.
    fn is_trainable(&self) -> bool;
}

/// An actor that owns an [`ExperienceTracker`].
pub trait ExperienceOwner {
    /// Template type of this actor.
    type Template: ExperienceTemplate + ?Sized;

    /// This actor's static template.
    fn template(&self) -> &Self::Template;

    /// The actor's current veterancy level.
    fn veterancy_level(&self) -> u32;

    /// The tracker this actor owns.
    fn experience_tracker(&self) -> &ExperienceTracker;

    /// Mutable access to the tracker this actor owns.
    fn experience_tracker_mut(&mut self) -> &mut ExperienceTracker;

    /// Called synchronously, once per tracker call that moved the level.
    fn on_experience_level_changed(&mut self, old_level: u32, new_level: u32);
}

/// Registry of live actors, consulted on every call.
pub trait ExperienceWorld {
    /// Actor type stored in this world.
    type Owner: ExperienceOwner;

    /// A live actor by id.
    fn find_object(&self, id: ObjectId) -> Option<&Self::Owner>;

    /// A live actor by id, mutably.
    fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut Self::Owner>;

    /// The deployment's points → level curve.
    fn level_curve(&self) -> LevelCurve;

    /// Maximum number of sink hops a single call may take.
    fn max_sink_depth(&self) -> u32;
}

/// Experience operations, gated and forwarded as game logic expects.
pub trait ExperienceWorldExt: ExperienceWorld {
    /// Award `gain` points to `id`.
    ///
    /// With a live sink, `gain × sink_scalar` is forwarded as a plain gain
    /// (the sink does not scale it again) and this actor is untouched.
    /// Otherwise a trainable actor gains `gain × sink_scalar` when
    /// `scale_by_bonus` is set, else `gain`.
    fn add_experience(&mut self, id: ObjectId, gain: i32, scale_by_bonus: bool) {
        add_experience_at(self, id, gain, scale_by_bonus, 0);
    }

    /// Assign `points` outright to `id` (or its live sink, unscaled).
    /// Levels may be lost.
    fn set_experience_and_level(&mut self, id: ObjectId, points: i32) {
        set_experience_and_level_at(self, id, points, 0);
    }

    /// Raise `id` to at least `level`, pinning points to its threshold.
    ///
    /// Administrative: ignores trainability and sinks.
    fn set_minimum_level(&mut self, id: ObjectId, level: u32) {
        let curve = self.level_curve();
        let Some(owner) = self.find_object_mut(id) else {
            return;
        };
        let change = owner.experience_tracker_mut().raise_to_level(level, &curve);
        notify(owner, id, change);
    }

    /// Put `id` at exactly `level`, up or down, pinning points to its threshold.
    ///
    /// Administrative: ignores trainability and sinks.
    fn set_level(&mut self, id: ObjectId, level: u32) {
        let curve = self.level_curve();
        let Some(owner) = self.find_object_mut(id) else {
            return;
        };
        let change = owner.experience_tracker_mut().force_level(level, &curve);
        notify(owner, id, change);
    }

    /// Award exactly the points `id` needs to climb `num_levels` levels.
    ///
    /// Returns `false` without effect unless the target level is strictly
    /// above the current one. The award goes through
    /// [`add_experience`](Self::add_experience), so sinks and trainability
    /// still apply.
    fn gain_levels(&mut self, id: ObjectId, num_levels: i32, can_scale_for_bonus: bool) -> bool {
        let curve = self.level_curve();
        let Some(tracker) = self.find_object(id).map(|owner| *owner.experience_tracker()) else {
            return false;
        };
        let Some(target) = tracker.level_after_gaining(num_levels) else {
            return false;
        };
        let needed = curve.threshold(target).saturating_sub(tracker.current_points());
        self.add_experience(id, needed, can_scale_for_bonus);
        true
    }
}

impl<W: ExperienceWorld + ?Sized> ExperienceWorldExt for W {}

fn add_experience_at<W>(world: &mut W, id: ObjectId, gain: i32, scale_by_bonus: bool, depth: u32)
where
    W: ExperienceWorld + ?Sized,
{
    let Some(tracker) = world.find_object(id).map(|owner| *owner.experience_tracker()) else {
        return;
    };
    if let Some(sink) = live_sink(world, &tracker, depth) {
        let forwarded = tracker.scaled(gain);
        trace!(from = %id, to = %sink, gain, forwarded, "forwarding experience to sink");
        add_experience_at(world, sink, forwarded, false, depth + 1);
        return;
    }

    let curve = world.level_curve();
    let Some(owner) = world.find_object_mut(id) else {
        return;
    };
    if !owner.template().is_trainable() {
        return;
    }
    let amount = if scale_by_bonus { tracker.scaled(gain) } else { gain };
    let change = owner.experience_tracker_mut().apply_gain(amount, &curve);
    notify(owner, id, change);
}

fn set_experience_and_level_at<W>(world: &mut W, id: ObjectId, points: i32, depth: u32)
where
    W: ExperienceWorld + ?Sized,
{
    let Some(tracker) = world.find_object(id).map(|owner| *owner.experience_tracker()) else {
        return;
    };
    if let Some(sink) = live_sink(world, &tracker, depth) {
        trace!(from = %id, to = %sink, points, "forwarding experience assignment to sink");
        set_experience_and_level_at(world, sink, points, depth + 1);
        return;
    }

    let curve = world.level_curve();
    let Some(owner) = world.find_object_mut(id) else {
        return;
    };
    if !owner.template().is_trainable() {
        return;
    }
    let change = owner.experience_tracker_mut().assign_points(points, &curve);
    notify(owner, id, change);
}

/// The tracker's sink, if it is alive and another hop is allowed.
fn live_sink<W>(world: &W, tracker: &ExperienceTracker, depth: u32) -> Option<ObjectId>
where
    W: ExperienceWorld + ?Sized,
{
    let sink = tracker.sink()?;
    if world.find_object(sink).is_none() {
        // Not fatal: the sink died while the experience was in flight.
        trace!(owner = %tracker.owner(), %sink, "sink is gone; keeping experience");
        return None;
    }
    if depth >= world.max_sink_depth() {
        warn!(
            owner = %tracker.owner(),
            %sink,
            depth,
            "sink chain too deep (cycle?); keeping experience"
        );
        return None;
    }
    Some(sink)
}

fn notify<O>(owner: &mut O, id: ObjectId, change: Option<LevelChange>)
where
    O: ExperienceOwner + ?Sized,
{
    if let Some(LevelChange { old, new }) = change {
        debug!(object = %id, old, new, "experience level changed");
        owner.on_experience_level_changed(old, new);
    }
}
