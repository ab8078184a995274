mod tests {
    use copilot_light_core::animation::{
        AnimationCatalog, AnimationDefinition, AnimationEngine, DEFAULT_ANIMATIONS, Keyframe,
    };
    use copilot_light_core::{ConfigurationFault, Duration};

    const TICK: Duration = Duration::from_millis(10);

    const HEARTBEAT: &[Keyframe] = &[
        Keyframe::from_millis(100, 1.0),
        Keyframe::from_millis(900, 0.0),
    ];

    const RAMP: &[Keyframe] = &[
        Keyframe::from_millis(50, 0.2),
        Keyframe::from_millis(120, 0.7),
        Keyframe::from_millis(30, 0.1),
    ];

    fn heartbeat() -> AnimationDefinition {
        AnimationDefinition::new(&[HEARTBEAT]).unwrap()
    }

    fn record(engine: &mut AnimationEngine, frames: usize) -> Vec<Vec<f32>> {
        (0..frames).map(|_| engine.generate_frame().to_vec()).collect()
    }

    #[test]
    fn test_heartbeat_switches_off_after_first_keyframe() {
        let mut engine = AnimationEngine::new(TICK);
        engine.set_animation(&heartbeat());

        for frame in 0..=10 {
            assert_eq!(engine.generate_frame(), &[1.0], "frame {frame}");
        }
        assert_eq!(engine.elapsed(), Duration::from_millis(110));
        assert_eq!(engine.generate_frame(), &[0.0]);
    }

    #[test]
    fn test_heartbeat_completes_cycle_after_one_second() {
        let mut engine = AnimationEngine::new(TICK);
        engine.set_animation(&heartbeat());

        for _ in 0..100 {
            engine.generate_frame();
            assert!(!engine.is_finished());
        }
        assert_eq!(engine.generate_frame(), &[0.0]);
        assert!(engine.is_finished());

        engine.reset();
        assert!(!engine.is_finished());
        assert_eq!(engine.generate_frame(), &[1.0]);
    }

    #[test]
    fn test_playback_is_deterministic() {
        let definition = AnimationDefinition::new(&[HEARTBEAT, RAMP]).unwrap();
        let mut first = AnimationEngine::new(TICK);
        let mut second = AnimationEngine::new(TICK);
        first.set_animation(&definition);
        second.set_animation(&definition);

        assert_eq!(record(&mut first, 150), record(&mut second, 150));
    }

    #[test]
    fn test_reset_matches_fresh_engine() {
        let definition = AnimationDefinition::new(&[HEARTBEAT, RAMP]).unwrap();
        let mut used = AnimationEngine::new(TICK);
        used.set_animation(&definition);
        record(&mut used, 57);
        used.reset();
        assert_eq!(used.elapsed(), Duration::from_millis(0));

        let mut fresh = AnimationEngine::new(TICK);
        fresh.set_animation(&definition);

        assert_eq!(record(&mut used, 120), record(&mut fresh, 120));
    }

    #[test]
    fn test_finishes_when_longest_led_ends() {
        let definition = AnimationDefinition::new(&[
            &[Keyframe::from_millis(30, 0.2)],
            &[
                Keyframe::from_millis(50, 1.0),
                Keyframe::from_millis(20, 0.0),
            ],
        ])
        .unwrap();
        assert_eq!(definition.duration(), Duration::from_millis(70));

        let mut engine = AnimationEngine::new(TICK);
        engine.set_animation(&definition);
        for _ in 0..7 {
            engine.generate_frame();
            assert!(!engine.is_finished());
        }
        assert_eq!(engine.generate_frame(), &[0.2, 0.0]);
        assert!(engine.is_finished());
    }

    #[test]
    fn test_empty_sequence_is_finished_from_first_frame() {
        let definition = AnimationDefinition::new(&[&[], HEARTBEAT]).unwrap();
        let mut engine = AnimationEngine::new(TICK);
        engine.set_animation(&definition);

        assert_eq!(engine.generate_frame(), &[0.0, 1.0]);
        assert!(!engine.is_finished());
        assert_eq!(engine.led_count(), 2);
    }

    #[test]
    fn test_engine_without_animation_is_finished() {
        let mut engine = AnimationEngine::new(TICK);
        assert!(engine.generate_frame().is_empty());
        assert!(engine.is_finished());
    }

    #[test]
    fn test_rejects_invalid_keyframes() {
        const ZERO_LENGTH: &[Keyframe] = &[
            Keyframe::from_millis(10, 0.5),
            Keyframe::from_millis(0, 0.5),
        ];
        let zero = AnimationDefinition::new(&[HEARTBEAT, ZERO_LENGTH]);
        assert_eq!(
            zero,
            Err(ConfigurationFault::InvalidKeyframe { led: 1, index: 1 })
        );

        let bright = AnimationDefinition::new(&[&[Keyframe::from_millis(10, 1.5)]]);
        assert_eq!(
            bright,
            Err(ConfigurationFault::InvalidKeyframe { led: 0, index: 0 })
        );
    }

    #[test]
    fn test_extend_steps_to_target() {
        let definition = AnimationDefinition::new(&[&[
            Keyframe::from_millis(100, 0.0),
            Keyframe::from_millis(450, 1.0),
        ]])
        .unwrap();
        let extended = definition.extended(Duration::from_millis(100)).unwrap();

        assert_eq!(
            extended.sequence(0),
            &[
                Keyframe::from_millis(100, 0.0),
                Keyframe::from_millis(100, 0.25),
                Keyframe::from_millis(100, 0.5),
                Keyframe::from_millis(100, 0.75),
                Keyframe::from_millis(100, 1.0),
                Keyframe::from_millis(50, 1.0),
            ]
        );
        assert_eq!(extended.duration(), definition.duration());
    }

    #[test]
    fn test_extend_steps_down() {
        let definition = AnimationDefinition::new(&[&[
            Keyframe::from_millis(100, 1.0),
            Keyframe::from_millis(200, 0.0),
        ]])
        .unwrap();
        let extended = definition.extended(Duration::from_millis(100)).unwrap();

        assert_eq!(
            extended.sequence(0),
            &[
                Keyframe::from_millis(100, 1.0),
                Keyframe::from_millis(100, 0.5),
                Keyframe::from_millis(100, 0.0),
            ]
        );
    }

    #[test]
    fn test_extend_rejects_zero_step_and_overflow() {
        let definition = heartbeat();
        assert_eq!(
            definition.extended(Duration::from_millis(0)),
            Err(ConfigurationFault::InvalidTick)
        );
        assert_eq!(
            definition.extended(Duration::from_millis(10)),
            Err(ConfigurationFault::TooManyKeyframes { led: 0 })
        );
    }

    #[test]
    fn test_default_catalog() {
        let catalog =
            AnimationCatalog::load(DEFAULT_ANIMATIONS, Duration::from_millis(100)).unwrap();

        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            ["startup", "normal", "steady", "heartbeat", "slow_heartbeat"]
        );
        let (name, startup) = catalog.get("startup").unwrap();
        assert_eq!(name, "startup");
        assert_eq!(startup.led_count(), 4);
        assert_eq!(startup.duration(), Duration::from_millis(1600));

        let (_, heartbeat) = catalog.get("heartbeat").unwrap();
        assert_eq!(heartbeat.sequence(0), HEARTBEAT);

        assert!(!catalog.contains("rainbow"));
        assert_eq!(
            catalog.get("rainbow").map(|(name, _)| name),
            Err(ConfigurationFault::UnknownAnimation)
        );
    }
}
