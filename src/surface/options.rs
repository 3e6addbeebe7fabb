//! Surface construction options and the layered precedence merge.
//!
//! Precedence, lowest to highest:
//!
//! | layer | source                                                    |
//! |-------|-----------------------------------------------------------|
//! | 1     | built-in defaults                                         |
//! | 2     | values derived from context settings (typed, if present)  |
//! | 3     | mode defaults (kiosk / fullscreen)                        |
//! | 4     | caller overrides                                          |
//! | 5     | `closable = true`, forced whenever a locked mode is active |
//!
//! Every layer is a shallow merge keyed by option name: a `Some` in a higher
//! layer replaces whatever the lower layers produced for that key.

use crate::context::types::{Settings, APP_HEIGHT_KEY, APP_WIDTH_KEY, BACKGROUND_COLOR_KEY};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_BACKGROUND_COLOR: &str = "#000";

/// Surface construction parameters. `None` means "not specified at this layer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kiosk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_hide_menu_bar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_first_mouse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_integration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_isolation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_security: Option<bool>,
}

macro_rules! overlay_fields {
    ($target:expr, $layer:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$layer.$field {
                $target.$field = Some(value.clone());
            }
        )+
    };
}

impl SurfaceOptions {
    /// Layer 1: built-in defaults.
    pub fn defaults() -> Self {
        Self {
            width: Some(DEFAULT_WIDTH),
            height: Some(DEFAULT_HEIGHT),
            background_color: Some(DEFAULT_BACKGROUND_COLOR.to_string()),
            node_integration: Some(true),
            context_isolation: Some(false),
            web_security: Some(false),
            ..Self::default()
        }
    }

    /// Layer 2: values read from settings. Entries of the wrong scalar type
    /// are ignored rather than coerced.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.get(APP_WIDTH_KEY).and_then(|v| v.as_dimension()),
            height: settings.get(APP_HEIGHT_KEY).and_then(|v| v.as_dimension()),
            background_color: settings
                .get(BACKGROUND_COLOR_KEY)
                .and_then(|v| v.as_str())
                .filter(|color| !color.is_empty())
                .map(str::to_string),
            ..Self::default()
        }
    }

    /// Shallow merge: every key set in `layer` replaces the value in `self`.
    pub fn overlay(&mut self, layer: &SurfaceOptions) {
        overlay_fields!(
            self,
            layer,
            width,
            height,
            x,
            y,
            background_color,
            resizable,
            movable,
            minimizable,
            closable,
            always_on_top,
            fullscreen,
            kiosk,
            frame,
            auto_hide_menu_bar,
            accept_first_mouse,
            node_integration,
            context_isolation,
            web_security,
        );
    }

    /// Builder-style `overlay`.
    pub fn layered(mut self, layer: &SurfaceOptions) -> Self {
        self.overlay(layer);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == SurfaceOptions::default()
    }
}

/// How the surface is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMode {
    #[default]
    Windowed,
    Kiosk,
    #[serde(alias = "full_screen")]
    Fullscreen,
}

impl SurfaceMode {
    /// Locked modes keep the surface closable regardless of overrides.
    pub fn is_locked(&self) -> bool {
        !matches!(self, SurfaceMode::Windowed)
    }

    /// Layer 3: defaults implied by the mode.
    pub fn defaults(&self) -> SurfaceOptions {
        match self {
            SurfaceMode::Windowed => SurfaceOptions::default(),
            SurfaceMode::Kiosk => SurfaceOptions {
                accept_first_mouse: Some(true),
                always_on_top: Some(true),
                auto_hide_menu_bar: Some(true),
                fullscreen: Some(true),
                kiosk: Some(true),
                resizable: Some(false),
                minimizable: Some(false),
                movable: Some(false),
                x: Some(0),
                y: Some(0),
                ..SurfaceOptions::default()
            },
            SurfaceMode::Fullscreen => SurfaceOptions {
                always_on_top: Some(true),
                resizable: Some(false),
                movable: Some(false),
                frame: Some(false),
                ..SurfaceOptions::default()
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceMode::Windowed => "windowed",
            SurfaceMode::Kiosk => "kiosk",
            SurfaceMode::Fullscreen => "fullscreen",
        }
    }
}

impl std::str::FromStr for SurfaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windowed" => Ok(SurfaceMode::Windowed),
            "kiosk" => Ok(SurfaceMode::Kiosk),
            "fullscreen" | "full_screen" => Ok(SurfaceMode::Fullscreen),
            other => Err(format!(
                "Invalid surface mode: {} (must be 'windowed', 'kiosk', or 'fullscreen')",
                other
            )),
        }
    }
}

/// Surface parameters collected before creation: the mode and caller overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingSurface {
    pub mode: SurfaceMode,
    pub overrides: SurfaceOptions,
}

impl PendingSurface {
    pub fn new(mode: SurfaceMode, overrides: SurfaceOptions) -> Self {
        Self { mode, overrides }
    }
}

/// Produce the final construction options from pending options and settings.
pub fn merge_surface_options(pending: &PendingSurface, settings: &Settings) -> SurfaceOptions {
    let mut merged = SurfaceOptions::defaults()
        .layered(&SurfaceOptions::from_settings(settings))
        .layered(&pending.mode.defaults())
        .layered(&pending.overrides);

    // Applied last: no layer can leave a locked surface unclosable.
    if pending.mode.is_locked() {
        merged.closable = Some(true);
    }

    merged
}
