//! Level curves: points required for each veterancy level.
//!
//! Two curves exist in the lineage of this system:
//!
//! - **Exponential** (canonical): `threshold(L) = base × growth^(L-1)` for
//!   `L ≥ 1`, with the defaults `100 × 1.3^(L-1)` → 100, 130, 169, 219, …
//! - **Linear** (legacy): `threshold(L) = step × L` → 100, 200, 300, …
//!
//! Both give `threshold(0) = 0`. The two produce different save semantics,
//! so a deployment picks one through configuration and never mixes them.
//!
//! Exponential thresholds are built by repeated `f64` multiplication (exact
//! and reproducible under IEEE-754), floored, and forced strictly increasing
//! so that every level is reachable by an exact threshold. They saturate at
//! `i32::MAX`; the first level whose threshold saturates is the cap.

/// A points → level mapping.
///
/// Both lookups scan upward from level 0 until the threshold passes the
/// points total or saturates, so their cost is the number of levels below
/// `i32::MAX`. With a growth factor barely above 1.0 the strictly-increasing
/// floor makes that up to about 2^31 levels; configured curves reject growth
/// below [`MIN_GROWTH`](crate::config::MIN_GROWTH).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelCurve {
    /// `threshold(L) = base_points × growth^(L-1)`.
    Exponential {
        /// Points for level 1.
        base_points: f64,
        /// Per-level multiplier; must exceed 1.0.
        growth: f64,
    },
    /// `threshold(L) = step × L`.
    Linear {
        /// Points per level; must be positive.
        step: i32,
    },
}

impl LevelCurve {
    /// `100 × 1.3^(L-1)`.
    pub const CANONICAL: Self = Self::Exponential {
        base_points: 100.0,
        growth: 1.3,
    };

    /// `100 × L`.
    pub const LEGACY: Self = Self::Linear { step: 100 };

    /// Minimum points for `level`.
    #[must_use]
    pub fn threshold(&self, level: u32) -> i32 {
        match *self {
            Self::Exponential { base_points, growth } => {
                Thresholds::new(base_points, growth)
                    .find(|&(l, points)| l == level || points == i32::MAX)
                    .map_or(i32::MAX, |(_, points)| points)
            }
            Self::Linear { step } => {
                let points = i64::from(step) * i64::from(level);
                i32::try_from(points).unwrap_or(i32::MAX)
            }
        }
    }

    /// Largest level whose threshold `points` meets.
    ///
    /// Monotonic non-decreasing in `points`; negative points are level 0.
    #[must_use]
    pub fn level_from_points(&self, points: i32) -> u32 {
        match *self {
            Self::Exponential { base_points, growth } => {
                let mut level = 0;
                for (l, threshold) in Thresholds::new(base_points, growth).skip(1) {
                    if points < threshold {
                        break;
                    }
                    level = l;
                    if threshold == i32::MAX {
                        break;
                    }
                }
                level
            }
            Self::Linear { step } => {
                // The legacy scan stops one past the last met threshold and
                // steps back; for non-negative points that is a division.
                if points < 0 || step <= 0 {
                    0
                } else {
                    (points / step).unsigned_abs()
                }
            }
        }
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Yields `(level, threshold)` for level 0, 1, 2, … forever.
struct Thresholds {
    level: u32,
    scaled: f64,
    growth: f64,
    previous: i32,
}

impl Thresholds {
    fn new(base_points: f64, growth: f64) -> Self {
        Self {
            level: 0,
            scaled: base_points,
            growth,
            previous: 0,
        }
    }
}

impl Iterator for Thresholds {
    type Item = (u32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let level = self.level;
        let points = if level == 0 {
            0
        } else {
            let floored = self.scaled.floor();
            self.scaled *= self.growth;
            let raw = if floored >= f64::from(i32::MAX) {
                i32::MAX
            } else {
                #[allow(clippy::cast_possible_truncation)]
                let points = floored as i32;
                points
            };
            raw.max(self.previous.saturating_add(1))
        };
        self.previous = points;
        self.level = level.saturating_add(1);
        Some((level, points))
    }
}
