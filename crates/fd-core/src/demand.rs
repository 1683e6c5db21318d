//! Restaurant order-intensity curves.
//!
//! Each restaurant follows one of two daily demand shapes built from two
//! half-sinusoids, one on 08:00–15:00 and one on 15:00–21:00.  Outside the
//! 08:00–21:00 window intensity is zero.  The input is the fractional hour of
//! the day (`minute_of_day / 60`).

/// Daily demand shape of a restaurant.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntensityCurve {
    /// Peaks around midday, tails off through the evening.
    #[default]
    Lunch,
    /// Quiet midday, peaks in the evening.
    Dinner,
}

impl IntensityCurve {
    /// Order intensity in `[0, 1]` at fractional hour `hour`.
    pub fn intensity(self, hour: f64) -> f64 {
        let raw = match self {
            IntensityCurve::Lunch => {
                if (8.0..15.0).contains(&hour) {
                    ((0.86 * hour - 2.3).sin() + 1.0) / 2.0
                } else if (15.0..21.0).contains(&hour) {
                    (0.5 * hour + 5.2).sin() / 2.0
                } else {
                    0.0
                }
            }
            IntensityCurve::Dinner => {
                if (8.0..15.0).contains(&hour) {
                    (0.43 * hour + 2.9).sin() / 2.0
                } else if (15.0..21.0).contains(&hour) {
                    ((0.95 * hour - 3.5).sin() + 1.0) / 2.0
                } else {
                    0.0
                }
            }
        };
        // The single-sine segments dip below zero near their edges.
        raw.clamp(0.0, 1.0)
    }

    /// Curve for the restaurant at position `index` among `count`
    /// restaurants: the first half (rounded up) serves lunch, the rest dinner.
    pub fn for_restaurant(index: usize, count: usize) -> Self {
        if index < count.div_ceil(2) {
            IntensityCurve::Lunch
        } else {
            IntensityCurve::Dinner
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntensityCurve::Lunch  => "lunch",
            IntensityCurve::Dinner => "dinner",
        }
    }
}

impl std::fmt::Display for IntensityCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
