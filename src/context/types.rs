//! Shared context types: content locators, scalar settings, and lifecycle phases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Settings key for the update channel consumed by the auto-updater.
pub const AUTO_UPDATER_CHANNEL_KEY: &str = "auto_updater_channel";
/// Settings key for the heartbeat monitoring API key.
pub const HEARTBEAT_API_KEY: &str = "heartbeat_api_key";
/// Settings key for a stored surface width.
pub const APP_WIDTH_KEY: &str = "app_width";
/// Settings key for a stored surface height.
pub const APP_HEIGHT_KEY: &str = "app_height";
/// Settings key for a stored surface background color.
pub const BACKGROUND_COLOR_KEY: &str = "background_color";

/// What to load into the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentLocator {
    /// A fully formed URL, e.g. a dev server address.
    Url(String),
    /// A custom scheme plus a path served by that scheme, e.g. `app` + `index.html`.
    Scheme { scheme: String, path: String },
}

impl ContentLocator {
    pub fn url(url: impl Into<String>) -> Self {
        ContentLocator::Url(url.into())
    }

    pub fn scheme(scheme: impl Into<String>, path: impl Into<String>) -> Self {
        ContentLocator::Scheme {
            scheme: scheme.into(),
            path: path.into(),
        }
    }

    /// The scheme portion, if one can be determined.
    pub fn scheme_name(&self) -> Option<&str> {
        match self {
            ContentLocator::Url(url) => url.split_once("://").map(|(scheme, _)| scheme),
            ContentLocator::Scheme { scheme, .. } => Some(scheme.as_str()),
        }
    }
}

impl fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentLocator::Url(url) => f.write_str(url),
            ContentLocator::Scheme { scheme, path } => {
                write!(f, "{}://{}", scheme, path.trim_start_matches('/'))
            }
        }
    }
}

impl From<&str> for ContentLocator {
    fn from(value: &str) -> Self {
        ContentLocator::Url(value.to_string())
    }
}

impl From<String> for ContentLocator {
    fn from(value: String) -> Self {
        ContentLocator::Url(value)
    }
}

/// A scalar configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl SettingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value. Strings are never coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Int(i) => Some(*i as f64),
            SettingValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// A positive whole dimension, as used for surface width and height.
    /// Zero, negative, fractional and non-numeric values yield `None`.
    pub fn as_dimension(&self) -> Option<u32> {
        match self {
            SettingValue::Int(i) if *i > 0 => u32::try_from(*i).ok(),
            SettingValue::Float(f) if f.is_finite() && *f > 0.0 && f.fract() == 0.0 => {
                if *f <= u32::MAX as f64 {
                    Some(*f as u32)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(value.into())
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Int(value.into())
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Str(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Str(value)
    }
}

/// String-keyed scalar settings shared between plugins.
///
/// Ordered so that logs and serialized snapshots are deterministic.
pub type Settings = BTreeMap<String, SettingValue>;

/// Position in the bootstrap state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Created,
    BeforeReady,
    AwaitingReadiness,
    AfterReady,
    SurfaceCreated,
    BeforeLoad,
    Loading,
    AfterLoad,
    Ready,
    Closed,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Created => "created",
            LifecyclePhase::BeforeReady => "before_ready",
            LifecyclePhase::AwaitingReadiness => "awaiting_readiness",
            LifecyclePhase::AfterReady => "after_ready",
            LifecyclePhase::SurfaceCreated => "surface_created",
            LifecyclePhase::BeforeLoad => "before_load",
            LifecyclePhase::Loading => "loading",
            LifecyclePhase::AfterLoad => "after_load",
            LifecyclePhase::Ready => "ready",
            LifecyclePhase::Closed => "closed",
        }
    }

    /// The phase that legally follows this one in the primary sequence.
    /// `Ready -> Closed` is the secondary, asynchronous transition.
    pub fn next(&self) -> Option<LifecyclePhase> {
        match self {
            LifecyclePhase::Created => Some(LifecyclePhase::BeforeReady),
            LifecyclePhase::BeforeReady => Some(LifecyclePhase::AwaitingReadiness),
            LifecyclePhase::AwaitingReadiness => Some(LifecyclePhase::AfterReady),
            LifecyclePhase::AfterReady => Some(LifecyclePhase::SurfaceCreated),
            LifecyclePhase::SurfaceCreated => Some(LifecyclePhase::BeforeLoad),
            LifecyclePhase::BeforeLoad => Some(LifecyclePhase::Loading),
            LifecyclePhase::Loading => Some(LifecyclePhase::AfterLoad),
            LifecyclePhase::AfterLoad => Some(LifecyclePhase::Ready),
            LifecyclePhase::Ready => Some(LifecyclePhase::Closed),
            LifecyclePhase::Closed => None,
        }
    }

    /// True once the surface exists (it may since have been closed).
    pub fn surface_created(&self) -> bool {
        *self >= LifecyclePhase::SurfaceCreated
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
