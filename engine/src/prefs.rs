// Preferences
//
// The add-on keeps its settings in a flat store of named values under the
// `extensions.imagezoom.` branch. `PreferenceStore` is that store as the engine
// sees it; `Preferences` is the bundled implementation, loadable from TOML:
//
// [panel]
// wait = "0.5"
// key = 1
//
// [sites]
// flickr = false

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::rules::{RuleIndex, SiteRuleRegistry, PREF_BRANCH, PREF_ENABLE_SUFFIX};

pub const PREF_PANEL_WAIT: &str = "extensions.imagezoom.panel.wait";
pub const PREF_PANEL_KEY: &str = "extensions.imagezoom.panel.key";
pub const PREF_PANEL_BORDER: &str = "extensions.imagezoom.panel.border";
pub const PREF_PANEL_OPACITY: &str = "extensions.imagezoom.panel.opacity";
pub const PREF_PANEL_DELAY: &str = "extensions.imagezoom.panel.delay";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to read preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no rule at index {0}")]
    UnknownRule(RuleIndex),

    #[error("unknown preference: {0}")]
    UnknownPreference(String),

    #[error("preference {name} expects a {expected} value")]
    TypeMismatch { name: String, expected: &'static str },
}

/// A single preference value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PrefValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Named preference values, addressed by their full names.
pub trait PreferenceStore {
    fn get(&self, name: &str) -> Option<PrefValue>;
    fn set(&mut self, name: &str, value: PrefValue) -> Result<(), PrefsError>;
}

/// Modifier key that must be held for a hover to zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModifierKey {
    #[default]
    None,
    Ctrl,
    Shift,
    Alt,
}

impl ModifierKey {
    pub fn from_pref(value: i64) -> Self {
        match value {
            1 => ModifierKey::Ctrl,
            2 => ModifierKey::Shift,
            3 => ModifierKey::Alt,
            _ => ModifierKey::None,
        }
    }

    pub fn is_active(&self, held: Modifiers) -> bool {
        match self {
            ModifierKey::None => true,
            ModifierKey::Ctrl => held.ctrl,
            ModifierKey::Shift => held.shift,
            ModifierKey::Alt => held.alt,
        }
    }
}

/// Modifier keys held during a mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPrefs {
    /// Hover delay in seconds, kept as text like the add-on stores it
    pub wait: String,
    pub key: i64,
    pub border: bool,
    pub opacity: i64,
    /// Numeric delay written by older versions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

impl Default for PanelPrefs {
    fn default() -> Self {
        Self {
            wait: "0".to_string(),
            key: 0,
            border: true,
            opacity: 100,
            delay: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub panel: PanelPrefs,
    /// Per-site enable toggles; sites not listed are enabled
    pub sites: BTreeMap<String, bool>,
}

impl Preferences {
    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        let text = fs::read_to_string(path)?;
        let prefs = Self::from_toml(&text)?;
        debug!(path = %path.display(), "preferences loaded");
        Ok(prefs)
    }

    pub fn from_toml(text: &str) -> Result<Self, PrefsError> {
        let mut prefs: Preferences = toml::from_str(text)?;
        prefs.migrate_legacy();
        Ok(prefs)
    }

    pub fn to_toml(&self) -> Result<String, PrefsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Move a legacy numeric `panel.delay` into `panel.wait`.
    pub fn migrate_legacy(&mut self) {
        if let Some(delay) = self.panel.delay.take() {
            debug!(delay, "migrating legacy panel delay");
            self.panel.wait = delay.to_string();
        }
    }

    /// Hover delay before the zoom opens; unparsable, negative or out of range values mean none.
    pub fn hover_delay(&self) -> Duration {
        match self.panel.wait.trim().parse::<f64>() {
            Ok(seconds) if seconds > 0.0 => match Duration::try_from_secs_f64(seconds) {
                Ok(delay) => delay,
                Err(_) => {
                    warn!(wait = %self.panel.wait, "ignoring out of range hover delay");
                    Duration::ZERO
                }
            },
            Ok(_) => Duration::ZERO,
            Err(_) => {
                warn!(wait = %self.panel.wait, "ignoring non-numeric hover delay");
                Duration::ZERO
            }
        }
    }

    pub fn modifier(&self) -> ModifierKey {
        ModifierKey::from_pref(self.panel.key)
    }

    pub fn site_enabled(&self, key: &str) -> bool {
        self.sites.get(key).copied().unwrap_or(true)
    }
}

impl PreferenceStore for Preferences {
    fn get(&self, name: &str) -> Option<PrefValue> {
        match name {
            PREF_PANEL_WAIT => Some(PrefValue::Str(self.panel.wait.clone())),
            PREF_PANEL_KEY => Some(PrefValue::Int(self.panel.key)),
            PREF_PANEL_BORDER => Some(PrefValue::Bool(self.panel.border)),
            PREF_PANEL_OPACITY => Some(PrefValue::Int(self.panel.opacity)),
            _ => {
                let key = site_key(name)?;
                Some(PrefValue::Bool(self.site_enabled(key)))
            }
        }
    }

    fn set(&mut self, name: &str, value: PrefValue) -> Result<(), PrefsError> {
        let mismatch = |expected| PrefsError::TypeMismatch {
            name: name.to_string(),
            expected,
        };

        match (name, value) {
            (PREF_PANEL_WAIT, PrefValue::Str(s)) => self.panel.wait = s,
            (PREF_PANEL_WAIT, _) => return Err(mismatch("string")),
            (PREF_PANEL_KEY, PrefValue::Int(i)) => self.panel.key = i,
            (PREF_PANEL_KEY, _) => return Err(mismatch("integer")),
            (PREF_PANEL_BORDER, PrefValue::Bool(b)) => self.panel.border = b,
            (PREF_PANEL_BORDER, _) => return Err(mismatch("boolean")),
            (PREF_PANEL_OPACITY, PrefValue::Int(i)) => self.panel.opacity = i,
            (PREF_PANEL_OPACITY, _) => return Err(mismatch("integer")),
            (PREF_PANEL_DELAY, PrefValue::Int(i)) => {
                self.panel.delay = Some(i as f64);
                self.migrate_legacy();
            }
            (PREF_PANEL_DELAY, _) => return Err(mismatch("integer")),
            (other, value) => {
                let key = site_key(other)
                    .ok_or_else(|| PrefsError::UnknownPreference(other.to_string()))?;
                let enabled = value.as_bool().ok_or_else(|| mismatch("boolean"))?;
                self.sites.insert(key.to_string(), enabled);
            }
        }

        debug!(name, "preference changed");
        Ok(())
    }
}

fn site_key(name: &str) -> Option<&str> {
    name.strip_prefix(PREF_BRANCH)?
        .strip_suffix(PREF_ENABLE_SUFFIX)
        .filter(|key| !key.is_empty() && !key.contains('.'))
}

/// Whether zooming is switched on for a rule. Missing values count as on.
pub fn is_site_enabled<P: PreferenceStore + ?Sized>(
    prefs: &P,
    registry: &SiteRuleRegistry,
    index: RuleIndex,
) -> bool {
    registry
        .preference_key(index)
        .and_then(|name| prefs.get(&name))
        .and_then(|v| v.as_bool())
        .unwrap_or(true)
}

/// Flip a rule's enable toggle and return the new state.
pub fn toggle_site<P: PreferenceStore + ?Sized>(
    prefs: &mut P,
    registry: &SiteRuleRegistry,
    index: RuleIndex,
) -> Result<bool, PrefsError> {
    let name = registry
        .preference_key(index)
        .ok_or(PrefsError::UnknownRule(index))?;
    let enabled = !is_site_enabled(prefs, registry, index);
    prefs.set(&name, PrefValue::Bool(enabled))?;
    Ok(enabled)
}
