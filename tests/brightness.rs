mod common;

mod tests {
    use copilot_light_core::brightness::DEFAULT_AUTO_BRIGHTNESS;
    use copilot_light_core::{
        AutoBrightnessConfig, BrightnessLevel, BrightnessSelector, ConfigurationFault,
    };

    use crate::common::assert_close;

    #[test]
    fn test_cycle_walks_levels_and_returns_to_auto() {
        let mut selector = BrightnessSelector::new(&DEFAULT_AUTO_BRIGHTNESS).unwrap();
        assert_eq!(selector.selected(), BrightnessLevel::Auto);

        assert_eq!(selector.cycle(), BrightnessLevel::Fixed(0));
        assert_eq!(selector.cycle(), BrightnessLevel::Fixed(1));
        assert_eq!(selector.cycle(), BrightnessLevel::Fixed(2));
        assert_eq!(selector.cycle(), BrightnessLevel::Auto);
    }

    #[test]
    fn test_auto_level_follows_light() {
        let selector = BrightnessSelector::new(&DEFAULT_AUTO_BRIGHTNESS).unwrap();

        assert_close(selector.modifier(true, 0.0), 0.2);
        assert_close(selector.modifier(true, 0.5), 0.6);
        assert_close(selector.modifier(true, 1.0), 1.0);
        assert_close(selector.modifier(false, 0.0), 1.0);
    }

    #[test]
    fn test_fixed_level_ignores_light() {
        let mut selector = BrightnessSelector::new(&DEFAULT_AUTO_BRIGHTNESS).unwrap();
        selector.select(BrightnessLevel::Fixed(1)).unwrap();

        assert_close(selector.modifier(true, 0.0), 0.6);
        assert_close(selector.modifier(false, 1.0), 0.6);
    }

    #[test]
    fn test_select_rejects_unknown_level() {
        let mut selector = BrightnessSelector::new(&DEFAULT_AUTO_BRIGHTNESS).unwrap();

        assert_eq!(
            selector.select(BrightnessLevel::Fixed(3)),
            Err(ConfigurationFault::InvalidModifier)
        );
        assert_eq!(selector.selected(), BrightnessLevel::Auto);
    }

    #[test]
    fn test_without_fixed_levels_cycle_stays_auto() {
        let mut selector = BrightnessSelector::new(&AutoBrightnessConfig {
            levels: &[],
            min_auto: 0.1,
        })
        .unwrap();

        assert_eq!(selector.cycle(), BrightnessLevel::Auto);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let level = BrightnessSelector::new(&AutoBrightnessConfig {
            levels: &[0.5, 1.5],
            min_auto: 0.1,
        });
        assert!(matches!(level, Err(ConfigurationFault::InvalidModifier)));

        let too_many = BrightnessSelector::new(&AutoBrightnessConfig {
            levels: &[0.1, 0.2, 0.3, 0.4, 0.5],
            min_auto: 0.1,
        });
        assert!(matches!(too_many, Err(ConfigurationFault::InvalidModifier)));
    }
}
