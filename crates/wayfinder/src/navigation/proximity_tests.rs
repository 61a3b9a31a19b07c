//! Tests for ProximityMonitor edge trigger + hysteresis.

#[cfg(test)]
mod tests {
    use rand::Rng;

    use crate::navigation::proximity::*;
    use crate::DeterministicRng;

    #[test]
    fn test_hysteresis_sequence_fires_twice() {
        let mut monitor = ProximityMonitor::new(1.0);
        let samples = [5.0, 1.5, 1.5, 1.5, 2.5, 3.5, 1.0];

        let fired: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|(_, d)| monitor.sample(**d, 2.0))
            .map(|(i, _)| i)
            .collect();

        // Вход в радиус (sample #2) и повторный вход после выхода за 3.0 (sample #7)
        assert_eq!(fired, vec![1, 6]);
    }

    #[test]
    fn test_hovering_at_boundary_does_not_flicker() {
        let mut monitor = ProximityMonitor::new(1.0);
        let mut rng = DeterministicRng::new(7);

        let mut fires = 0;
        for _ in 0..500 {
            // Шум ±0.9 вокруг границы радиуса 2.0
            let distance = 2.0 + rng.rng.gen_range(-0.9..0.9);
            if monitor.sample(distance, 2.0) {
                fires += 1;
            }
        }
        assert_eq!(fires, 1);
    }

    #[test]
    fn test_starting_inside_radius_fires_once() {
        let mut monitor = ProximityMonitor::default();
        assert!(monitor.sample(0.5, 2.2));
        assert!(!monitor.sample(0.4, 2.2));
        assert!(monitor.has_played_arrival());
    }

    #[test]
    fn test_latch_suppresses_and_reset_rearms() {
        let mut monitor = ProximityMonitor::default();
        monitor.latch();
        assert!(!monitor.sample(1.0, 2.2));

        monitor.reset();
        assert!(monitor.sample(1.0, 2.2));
    }

    #[test]
    fn test_non_finite_distance_ignored() {
        let mut monitor = ProximityMonitor::default();
        assert!(!monitor.sample(f32::NAN, 2.2));
        assert!(!monitor.has_played_arrival());
    }

    #[test]
    fn test_stopping_radius_rules() {
        assert_eq!(stopping_radius_for(None, false, REGISTERED_MIN_RADIUS), DEFAULT_STOPPING_RADIUS);
        assert_eq!(stopping_radius_for(None, true, REGISTERED_MIN_RADIUS), 3.0);
        assert_eq!(stopping_radius_for(Some(1.4), false, REGISTERED_MIN_RADIUS), 1.4);
        assert_eq!(stopping_radius_for(Some(4.0), true, REGISTERED_MIN_RADIUS), 4.0);
    }
}
