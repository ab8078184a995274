mod common;

mod tests {
    use copilot_light_core::state::SensorState;
    use copilot_light_core::{Duration, SensorSampler};

    use crate::common::MockBoard;

    const TICK: Duration = Duration::from_millis(10);

    fn sensor_state() -> SensorState {
        SensorState {
            value: 0.5,
            update_interval: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_reads_once_per_interval() {
        let board = MockBoard::new();
        board.set_light(0.8);
        let mut sampler = SensorSampler::new(TICK);
        let mut state = sensor_state();

        for _ in 0..9 {
            sampler.update(&mut state, &board).unwrap();
        }
        assert_eq!(board.light_reads(), 0);
        assert_eq!(state.value, 0.5);
        assert_eq!(sampler.accumulated(), Duration::from_millis(90));

        sampler.update(&mut state, &board).unwrap();
        assert_eq!(board.light_reads(), 1);
        assert_eq!(state.value, 0.8);
        assert_eq!(sampler.accumulated(), Duration::from_millis(0));

        for _ in 0..30 {
            sampler.update(&mut state, &board).unwrap();
        }
        assert_eq!(board.light_reads(), 4);
    }

    #[test]
    fn test_failed_read_keeps_previous_value() {
        let board = MockBoard::new();
        board.fail_reads(true);
        let mut sampler = SensorSampler::new(TICK);
        let mut state = sensor_state();

        for _ in 0..10 {
            sampler.update(&mut state, &board).unwrap();
        }
        assert_eq!(state.value, 0.5);
        assert_eq!(sampler.accumulated(), Duration::from_millis(0));
    }

    #[test]
    fn test_out_of_range_reading_is_discarded() {
        let board = MockBoard::new();
        board.set_light(1.5);
        let mut sampler = SensorSampler::new(TICK);
        let mut state = sensor_state();

        for _ in 0..10 {
            sampler.update(&mut state, &board).unwrap();
        }
        assert_eq!(board.light_reads(), 1);
        assert_eq!(state.value, 0.5);
    }

    #[test]
    fn test_disabled_sampler_does_not_read() {
        let board = MockBoard::new();
        let mut sampler = SensorSampler::new(TICK);
        let mut state = sensor_state();

        for _ in 0..5 {
            sampler.update(&mut state, &board).unwrap();
        }
        sampler.set_enabled(false);
        for _ in 0..50 {
            sampler.update(&mut state, &board).unwrap();
        }
        assert_eq!(board.light_reads(), 0);
        assert_eq!(sampler.accumulated(), Duration::from_millis(50));

        sampler.set_enabled(true);
        for _ in 0..5 {
            sampler.update(&mut state, &board).unwrap();
        }
        assert_eq!(board.light_reads(), 1);
    }
}
