//! Property-based tests for surface option precedence

use appinit::context::{SettingValue, Settings};
use appinit::surface::{
    merge_surface_options, PendingSurface, SurfaceMode, SurfaceOptions, DEFAULT_WIDTH,
};
use proptest::prelude::*;

fn mode_strategy() -> impl Strategy<Value = SurfaceMode> {
    prop_oneof![
        Just(SurfaceMode::Windowed),
        Just(SurfaceMode::Kiosk),
        Just(SurfaceMode::Fullscreen),
    ]
}

fn settings_with_width(width: Option<i64>) -> Settings {
    let mut settings = Settings::new();
    if let Some(width) = width {
        settings.insert("app_width".to_string(), SettingValue::Int(width));
    }
    settings
}

proptest! {
    /// defaults < settings < mode defaults < overrides, for a key no mode sets.
    #[test]
    fn width_follows_precedence(
        setting in proptest::option::of(-50i64..5000),
        override_width in proptest::option::of(1u32..5000),
        mode in mode_strategy(),
    ) {
        let pending = PendingSurface::new(
            mode,
            SurfaceOptions { width: override_width, ..SurfaceOptions::default() },
        );
        let merged = merge_surface_options(&pending, &settings_with_width(setting));

        let from_settings = setting.filter(|w| *w > 0).map(|w| w as u32);
        let expected = override_width.or(from_settings).unwrap_or(DEFAULT_WIDTH);
        prop_assert_eq!(merged.width, Some(expected));
    }

    /// Locked modes are always closable; windowed keeps whatever was asked for.
    #[test]
    fn closable_forced_last_in_locked_modes(
        closable in proptest::option::of(any::<bool>()),
        mode in mode_strategy(),
    ) {
        let pending = PendingSurface::new(
            mode,
            SurfaceOptions { closable, ..SurfaceOptions::default() },
        );
        let merged = merge_surface_options(&pending, &Settings::new());

        if mode.is_locked() {
            prop_assert_eq!(merged.closable, Some(true));
        } else {
            prop_assert_eq!(merged.closable, closable);
        }
    }

    /// Overrides of mode-set keys always win over the mode defaults.
    #[test]
    fn overrides_beat_mode_defaults(
        resizable in any::<bool>(),
        always_on_top in any::<bool>(),
        mode in mode_strategy(),
    ) {
        let pending = PendingSurface::new(
            mode,
            SurfaceOptions {
                resizable: Some(resizable),
                always_on_top: Some(always_on_top),
                ..SurfaceOptions::default()
            },
        );
        let merged = merge_surface_options(&pending, &Settings::new());
        prop_assert_eq!(merged.resizable, Some(resizable));
        prop_assert_eq!(merged.always_on_top, Some(always_on_top));
    }
}

/// Merging is a pure function of its inputs.
#[test]
fn test_merge_is_deterministic() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(mode_strategy(), "#[0-9a-f]{3,6}", proptest::option::of(1i64..4000)),
            |(mode, color, width)| {
                let mut settings = settings_with_width(width);
                settings.insert("background_color".to_string(), SettingValue::Str(color.clone()));
                let pending = PendingSurface::new(mode, SurfaceOptions::default());

                let first = merge_surface_options(&pending, &settings);
                let second = merge_surface_options(&pending, &settings);
                assert_eq!(first, second);
                assert_eq!(first.background_color.as_deref(), Some(color.as_str()));
                Ok(())
            },
        )
        .unwrap();
}
