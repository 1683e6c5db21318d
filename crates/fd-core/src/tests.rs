//! Unit tests for fd-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CourierId, EdgeId, NodeId, OrderId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::from_index(42), Some(id));
        assert_eq!(NodeId::from_index(usize::MAX), None);
    }

    #[test]
    fn ordering() {
        assert!(CourierId(0) < CourierId(1));
        assert!(OrderId(100) > OrderId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
        assert!(!OrderId::default().is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(CourierId(7).to_string(), "c7");
        assert_eq!(OrderId(40).to_string(), "o40");
        assert_eq!(NodeId::INVALID.to_string(), "n?");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn pythagorean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn lerp_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 0.0));
        assert_eq!(a.lerp(b, 2.0), b);
    }
}

#[cfg(test)]
mod time {
    use crate::time::MINUTES_PER_DAY;
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn advance_counts_minutes() {
        let mut clock = SimClock::new(100.0);
        assert!(!clock.advance());
        assert_eq!(clock.minute_of_day, 1);
        assert_eq!(clock.tick, Tick(1));
    }

    #[test]
    fn wraps_exactly_at_1440() {
        let mut clock = SimClock::new(100.0);
        for _ in 0..MINUTES_PER_DAY - 1 {
            assert!(!clock.advance());
        }
        assert_eq!(clock.minute_of_day, 1_439);
        assert_eq!(clock.day_count, 0);

        assert!(clock.advance(), "minute 1440 must report a rollover");
        assert_eq!(clock.minute_of_day, 0);
        assert_eq!(clock.day_count, 1);
        assert_eq!(clock.tick, Tick(1_440));
    }

    #[test]
    fn periodic_and_business_window() {
        let mut clock = SimClock::new(100.0);
        clock.minute_of_day = 480;
        assert!(clock.in_business_hours());
        assert!(clock.every(60));
        assert!(clock.every(5));
        assert_eq!(clock.hour(), 8);

        clock.minute_of_day = 1_260;
        assert!(!clock.in_business_hours());

        clock.minute_of_day = 7;
        assert!(!clock.every(2));
        assert!(!clock.every(0));
    }

    #[test]
    fn display_formats_time_of_day() {
        let mut clock = SimClock::new(100.0);
        clock.minute_of_day = 605;
        assert_eq!(clock.time_of_day(), "10:05");
        assert_eq!(clock.to_string(), "T0 (day 0 10:05)");
    }

    #[test]
    fn tick_duration_from_ticks_per_second() {
        let config = SimConfig { ticks_per_second: 4.0, ..SimConfig::default() };
        assert_eq!(config.tick_duration_ms(), 250.0);
        assert_eq!(config.make_clock().tick_duration_ms, 250.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(SimConfig::default().validate().is_ok());
        let zero_speed = SimConfig { ticks_per_second: 0.0, ..SimConfig::default() };
        assert!(zero_speed.validate().is_err());
        let nan_rate = SimConfig { order_frequency: f64::NAN, ..SimConfig::default() };
        assert!(nan_rate.validate().is_err());
        let no_distance = SimConfig { distance_per_tick: -1.0, ..SimConfig::default() };
        assert!(no_distance.validate().is_err());
    }
}

#[cfg(test)]
mod demand {
    use crate::IntensityCurve;

    #[test]
    fn zero_outside_business_window() {
        for curve in [IntensityCurve::Lunch, IntensityCurve::Dinner] {
            assert_eq!(curve.intensity(0.0), 0.0);
            assert_eq!(curve.intensity(7.99), 0.0);
            assert_eq!(curve.intensity(21.0), 0.0);
            assert_eq!(curve.intensity(23.5), 0.0);
        }
    }

    #[test]
    fn always_within_unit_interval() {
        for curve in [IntensityCurve::Lunch, IntensityCurve::Dinner] {
            for minute in 0..1_440 {
                let v = curve.intensity(minute as f64 / 60.0);
                assert!((0.0..=1.0).contains(&v), "{curve} at {minute}: {v}");
            }
        }
    }

    #[test]
    fn peaks_at_the_expected_meal() {
        assert!(IntensityCurve::Lunch.intensity(12.0) > IntensityCurve::Dinner.intensity(12.0));
        assert!(IntensityCurve::Dinner.intensity(18.0) > IntensityCurve::Lunch.intensity(18.0));
        assert!(IntensityCurve::Lunch.intensity(12.0) > 0.9);
        assert!(IntensityCurve::Dinner.intensity(18.0) > 0.9);
    }

    #[test]
    fn first_half_is_lunch() {
        assert_eq!(IntensityCurve::for_restaurant(0, 3), IntensityCurve::Lunch);
        assert_eq!(IntensityCurve::for_restaurant(1, 3), IntensityCurve::Lunch);
        assert_eq!(IntensityCurve::for_restaurant(2, 3), IntensityCurve::Dinner);
        assert_eq!(IntensityCurve::for_restaurant(1, 2), IntensityCurve::Dinner);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn roll_in_unit_interval() {
        let mut rng = SimRng::new(1);
        for _ in 0..1_000 {
            let r = rng.roll();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn choose_multiple_is_distinct() {
        let mut rng = SimRng::new(3);
        let picked = rng.choose_multiple(&[1, 2, 3, 4, 5], 3);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert!(rng.choose_multiple(&[1, 2], 5).len() == 2);
        assert!(rng.choose::<u8>(&[]).is_none());
    }
}
