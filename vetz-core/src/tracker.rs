//! The per-actor experience tracker.
//!
//! An [`ExperienceTracker`] is plain `Copy` state owned by exactly one actor.
//! It knows its owner only by [`ObjectId`], so it never keeps the actor
//! alive. Level arithmetic lives here as pure state transitions that report a
//! [`LevelChange`]; sink forwarding, trainability gating, and owner
//! notification are layered on top by
//! [`ExperienceWorldExt`](crate::owner::ExperienceWorldExt), which is the
//! entry point game logic should call.

use crate::curve::LevelCurve;
use crate::error::Result;
use crate::owner::{ExperienceOwner, ExperienceTemplate};
use crate::types::{LevelChange, ObjectId};
use crate::xfer::{Snapshot, Xfer, XferVersion};

/// Current version of the tracker's save block.
///
/// Version history:
/// - 1: level, points, sink, sink scalar
pub const TRACKER_XFER_VERSION: XferVersion = 1;

/// Experience points and veterancy level of one actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceTracker {
    owner: ObjectId,
    current_level: u32,
    current_points: i32,
    sink: ObjectId,
    sink_scalar: f32,
}

impl ExperienceTracker {
    /// A fresh tracker for `owner`: level 0, no points, no sink, scalar 1.0.
    #[must_use]
    pub fn new(owner: ObjectId) -> Self {
        Self {
            owner,
            current_level: 0,
            current_points: 0,
            sink: ObjectId::INVALID,
            sink_scalar: 1.0,
        }
    }

    /// The owning actor.
    #[must_use]
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Current veterancy level.
    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Accumulated experience points.
    #[must_use]
    pub fn current_points(&self) -> i32 {
        self.current_points
    }

    /// Where earned experience is redirected, if anywhere.
    #[must_use]
    pub fn sink(&self) -> Option<ObjectId> {
        self.sink.is_valid().then_some(self.sink)
    }

    /// Redirect earned experience to `sink`. [`ObjectId::INVALID`] clears it.
    pub fn set_sink(&mut self, sink: ObjectId) {
        self.sink = sink;
    }

    /// Multiplier applied to forwarded and bonus-scaled experience.
    #[must_use]
    pub fn sink_scalar(&self) -> f32 {
        self.sink_scalar
    }

    /// Set the forwarding / bonus multiplier.
    pub fn set_sink_scalar(&mut self, scalar: f32) {
        self.sink_scalar = scalar;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Experience awarded for killing this tracker's owner.
    ///
    /// The larger of the template's value at the owner's veterancy level and
    /// half of the points this actor has earned. `killer` is accepted for
    /// relationship rules (no experience for allies) but does not yet
    /// affect the result.
    #[must_use]
    pub fn kill_experience_value<O>(&self, owner: &O, _killer: Option<ObjectId>) -> i32
    where
        O: ExperienceOwner + ?Sized,
    {
        let template_value = owner.template().experience_value(owner.veterancy_level());
        template_value.max(self.current_points / 2)
    }

    /// Whether the owner's type can gain experience at all.
    #[must_use]
    pub fn is_trainable<O>(&self, owner: &O) -> bool
    where
        O: ExperienceOwner + ?Sized,
    {
        owner.template().is_trainable()
    }

    /// Whether experience sent to this actor goes anywhere: it can train
    /// itself, or it forwards to a sink.
    #[must_use]
    pub fn is_accepting_experience<O>(&self, owner: &O) -> bool
    where
        O: ExperienceOwner + ?Sized,
    {
        self.is_trainable(owner) || self.sink.is_valid()
    }

    /// Whether gaining `num_levels` would move the level up at all.
    #[must_use]
    pub fn can_gain_levels(&self, num_levels: i32) -> bool {
        self.level_after_gaining(num_levels).is_some()
    }

    /// Target level for a gain of `num_levels`, if strictly above the current one.
    #[must_use]
    pub fn level_after_gaining(&self, num_levels: i32) -> Option<u32> {
        let target = i64::from(self.current_level) + i64::from(num_levels);
        if target <= i64::from(self.current_level) {
            return None;
        }
        let target = u32::try_from(target).unwrap_or(u32::MAX);
        (target > self.current_level).then_some(target)
    }

    /// `gain` multiplied by the sink scalar, truncated toward zero.
    #[must_use]
    pub fn scaled(&self, gain: i32) -> i32 {
        #[allow(clippy::cast_possible_truncation)]
        let scaled = (gain as f32 * self.sink_scalar) as i32;
        scaled
    }

    // ------------------------------------------------------------------
    // State transitions (ungated)
    // ------------------------------------------------------------------

    /// Add `amount` points and recompute the level.
    pub(crate) fn apply_gain(&mut self, amount: i32, curve: &LevelCurve) -> Option<LevelChange> {
        let points = self.current_points.saturating_add(amount);
        self.assign_points(points, curve)
    }

    /// Replace the points total and recompute the level. May lose levels.
    pub(crate) fn assign_points(&mut self, points: i32, curve: &LevelCurve) -> Option<LevelChange> {
        let old = self.current_level;
        self.current_points = points;
        self.current_level = curve.level_from_points(points);
        LevelChange::between(old, self.current_level)
    }

    /// Raise to `level` if currently below it, pinning points to its threshold.
    pub(crate) fn raise_to_level(&mut self, level: u32, curve: &LevelCurve) -> Option<LevelChange> {
        if level <= self.current_level {
            return None;
        }
        self.pin_to_level(level, curve)
    }

    /// Move to `level` in either direction, pinning points to its threshold.
    pub(crate) fn force_level(&mut self, level: u32, curve: &LevelCurve) -> Option<LevelChange> {
        if level == self.current_level {
            return None;
        }
        self.pin_to_level(level, curve)
    }

    fn pin_to_level(&mut self, level: u32, curve: &LevelCurve) -> Option<LevelChange> {
        let old = self.current_level;
        self.current_level = level;
        self.current_points = curve.threshold(level);
        LevelChange::between(old, level)
    }
}

impl Snapshot for ExperienceTracker {
    fn crc(&self, xfer: &mut dyn Xfer) -> Result<()> {
        let mut points = self.current_points;
        xfer.xfer_i32(&mut points)?;
        let mut level = self.current_level.to_le_bytes();
        xfer.xfer_user(&mut level)
    }

    // The owner is not saved; it is re-linked when the owning actor is
    // constructed on load.
    fn xfer(&mut self, xfer: &mut dyn Xfer) -> Result<()> {
        let mut version = TRACKER_XFER_VERSION;
        xfer.xfer_version(&mut version, TRACKER_XFER_VERSION)?;

        if version >= 1 {
            let mut level = self.current_level.to_le_bytes();
            xfer.xfer_user(&mut level)?;
            self.current_level = u32::from_le_bytes(level);

            xfer.xfer_i32(&mut self.current_points)?;
            xfer.xfer_object_id(&mut self.sink)?;
            xfer.xfer_real(&mut self.sink_scalar)?;
        }
        Ok(())
    }

    fn load_post_process(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xfer::{XferCrc, XferLoad, XferSave};

    fn tracker() -> ExperienceTracker {
        ExperienceTracker::new(ObjectId::new(1))
    }

    fn crc_of(tracker: &ExperienceTracker) -> u32 {
        let mut crc = XferCrc::new();
        tracker.crc(&mut crc).expect("crc");
        crc.crc()
    }

    #[test]
    fn fresh_tracker_defaults() {
        let t = tracker();
        assert_eq!(t.owner(), ObjectId::new(1));
        assert_eq!(t.current_level(), 0);
        assert_eq!(t.current_points(), 0);
        assert_eq!(t.sink(), None);
        assert!((t.sink_scalar() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sink_accessors() {
        let mut t = tracker();
        t.set_sink(ObjectId::new(5));
        assert_eq!(t.sink(), Some(ObjectId::new(5)));
        t.set_sink(ObjectId::INVALID);
        assert_eq!(t.sink(), None);
    }

    #[test]
    fn gain_reports_single_change_across_many_levels() {
        let mut t = tracker();
        let change = t.apply_gain(300, &LevelCurve::CANONICAL);
        assert_eq!(change, Some(LevelChange { old: 0, new: 5 }));
        assert_eq!(t.current_points(), 300);
        assert_eq!(t.apply_gain(1, &LevelCurve::CANONICAL), None);
    }

    #[test]
    fn assign_can_demote() {
        let mut t = tracker();
        t.apply_gain(250, &LevelCurve::CANONICAL);
        let change = t.assign_points(50, &LevelCurve::CANONICAL).expect("level lost");
        assert!(change.is_demotion());
        assert_eq!(t.current_level(), 0);
    }

    #[test]
    fn raise_only_moves_up() {
        let mut t = tracker();
        assert_eq!(t.raise_to_level(3, &LevelCurve::CANONICAL), Some(LevelChange { old: 0, new: 3 }));
        assert_eq!(t.current_points(), 169);
        assert_eq!(t.raise_to_level(2, &LevelCurve::CANONICAL), None);
        assert_eq!(t.raise_to_level(3, &LevelCurve::CANONICAL), None);
        assert_eq!(t.current_level(), 3);
    }

    #[test]
    fn force_moves_both_ways() {
        let mut t = tracker();
        t.force_level(4, &LevelCurve::LEGACY);
        assert_eq!(t.current_points(), 400);
        assert_eq!(t.force_level(1, &LevelCurve::LEGACY), Some(LevelChange { old: 4, new: 1 }));
        assert_eq!(t.current_points(), 100);
        assert_eq!(t.force_level(1, &LevelCurve::LEGACY), None);
    }

    #[test]
    fn level_gain_predicate() {
        let mut t = tracker();
        t.force_level(2, &LevelCurve::CANONICAL);
        assert!(t.can_gain_levels(1));
        assert!(!t.can_gain_levels(0));
        assert!(!t.can_gain_levels(-3));
        assert_eq!(t.level_after_gaining(3), Some(5));
    }

    #[test]
    fn scaling_truncates_toward_zero() {
        let mut t = tracker();
        t.set_sink_scalar(0.5);
        assert_eq!(t.scaled(7), 3);
        assert_eq!(t.scaled(-7), -3);
        t.set_sink_scalar(1.5);
        assert_eq!(t.scaled(100), 150);
    }

    #[test]
    fn crc_layout_is_points_then_level() {
        let mut t = tracker();
        t.apply_gain(130, &LevelCurve::CANONICAL);

        let mut expected = XferCrc::new();
        expected.xfer_bytes(&mut [130, 0, 0, 0, 2, 0, 0, 0]).expect("crc");
        assert_eq!(crc_of(&t), expected.crc());
    }

    #[test]
    fn xfer_layout() {
        let mut t = tracker();
        t.apply_gain(169, &LevelCurve::CANONICAL);
        t.set_sink(ObjectId::new(258));
        t.set_sink_scalar(1.0);

        let mut save = XferSave::new();
        t.xfer(&mut save).expect("save");
        assert_eq!(
            save.as_bytes(),
            &[
                1, // version
                3, 0, 0, 0, // level
                169, 0, 0, 0, // points
                2, 1, 0, 0, // sink
                0x00, 0x00, 0x80, 0x3F, // scalar 1.0
            ]
        );
    }

    #[test]
    fn xfer_round_trip_preserves_state_and_crc() {
        let mut t = tracker();
        t.apply_gain(777, &LevelCurve::CANONICAL);
        t.set_sink(ObjectId::new(12));
        t.set_sink_scalar(0.25);
        let before = crc_of(&t);

        let mut save = XferSave::new();
        t.xfer(&mut save).expect("save");
        let bytes = save.into_bytes();

        let mut loaded = tracker();
        let mut load = XferLoad::new(&bytes);
        loaded.xfer(&mut load).expect("load");
        load.finish().expect("consumed");
        loaded.load_post_process().expect("post process");

        assert_eq!(loaded, t);
        assert_eq!(crc_of(&loaded), before);
    }

    #[test]
    fn xfer_rejects_future_version() {
        let mut t = tracker();
        let mut load = XferLoad::new(&[2, 0, 0, 0, 0]);
        assert!(t.xfer(&mut load).is_err());
        assert_eq!(t, tracker());
    }
}
