//! Game events that move experience around.

use vetz_core::ObjectId;

/// An event produced by game logic during a simulation frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An actor was destroyed.
    Kill {
        /// Who did it; `None` for environmental deaths.
        killer: Option<ObjectId>,
        /// Who died.
        victim: ObjectId,
    },

    /// Scripted experience award (crates, mission objectives).
    Grant {
        /// Recipient.
        target: ObjectId,
        /// Points awarded.
        points: i32,
        /// Whether the recipient's scalar applies.
        scale_by_bonus: bool,
    },

    /// Scripted promotion by a number of levels.
    Promote {
        /// Recipient.
        target: ObjectId,
        /// Levels to climb.
        levels: i32,
    },

    /// An actor starts or stops sending its experience elsewhere, e.g. a
    /// passenger boarding a transport.
    Redirect {
        /// Actor whose experience is redirected.
        source: ObjectId,
        /// New sink; `None` ends the redirect.
        sink: Option<ObjectId>,
        /// Multiplier for forwarded experience.
        scalar: f32,
    },
}

impl GameEvent {
    /// The actor this event is primarily about.
    #[must_use]
    pub fn subject(&self) -> ObjectId {
        match self {
            Self::Kill { victim, .. } => *victim,
            Self::Grant { target, .. } | Self::Promote { target, .. } => *target,
            Self::Redirect { source, .. } => *source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_is_the_affected_actor() {
        let (a, b) = (ObjectId::new(1), ObjectId::new(2));
        assert_eq!(GameEvent::Kill { killer: Some(a), victim: b }.subject(), b);
        assert_eq!(GameEvent::Grant { target: a, points: 5, scale_by_bonus: true }.subject(), a);
        assert_eq!(GameEvent::Promote { target: b, levels: 1 }.subject(), b);
        assert_eq!(GameEvent::Redirect { source: a, sink: Some(b), scalar: 1.0 }.subject(), a);
    }
}
