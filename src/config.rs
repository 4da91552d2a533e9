//! Request configuration for the `makeup` and `enhance` actions.
//!
//! Every field is optional. Missing values fall back to the per-effect
//! defaults defined in [`crate::effect`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::color::HexColor;
use crate::effect::Makeup;

/// Settings for a single makeup effect.
///
/// Which fields matter depends on the effect: `thickness` is only read by
/// eyeliner and `radius` only by blush.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub color: Option<HexColor>,
    pub intensity: Option<f32>,
    pub thickness: Option<u32>,
    pub radius: Option<u32>,
}

impl EffectConfig {
    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }
}

/// Which makeup effects to apply, keyed as in the JSON config.
///
/// An effect runs when its value is truthy: a non-empty object, or `true`
/// for the defaults. An absent key, `null`, `false` or `{}` skips it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MakeupConfig {
    #[serde(default, deserialize_with = "requested_effect")]
    pub lipstick: Option<EffectConfig>,
    #[serde(default, deserialize_with = "requested_effect")]
    pub eyeshadow: Option<EffectConfig>,
    #[serde(default, deserialize_with = "requested_effect")]
    pub blush: Option<EffectConfig>,
    #[serde(default, deserialize_with = "requested_effect")]
    pub eyeliner: Option<EffectConfig>,
    #[serde(default, deserialize_with = "requested_effect")]
    pub foundation: Option<EffectConfig>,
}

impl MakeupConfig {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, kind: Makeup) -> Option<&EffectConfig> {
        match kind {
            Makeup::Lipstick => self.lipstick.as_ref(),
            Makeup::Eyeshadow => self.eyeshadow.as_ref(),
            Makeup::Blush => self.blush.as_ref(),
            Makeup::Eyeliner => self.eyeliner.as_ref(),
            Makeup::Foundation => self.foundation.as_ref(),
        }
    }

    /// Requested effects in application order.
    pub fn requested(&self) -> impl Iterator<Item = (Makeup, &EffectConfig)> + '_ {
        Makeup::ORDER
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|cfg| (kind, cfg)))
    }
}

/// JSON truthiness: `null`, `false`, zero, and empty strings, arrays or
/// objects are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn requested_effect<'de, D>(deserializer: D) -> Result<Option<EffectConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        v if !is_truthy(&v) => Ok(None),
        Value::Bool(true) => Ok(Some(EffectConfig::default())),
        v => serde_json::from_value(v).map(Some).map_err(D::Error::custom),
    }
}

fn toggle<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

fn enabled() -> bool {
    true
}

/// Toggles for the fixed enhancement filters. All default to on; a falsy
/// value (`false`, `null`, `0`) turns a filter off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceConfig {
    #[serde(default = "enabled", deserialize_with = "toggle")]
    pub enhance_eyes: bool,
    #[serde(default = "enabled", deserialize_with = "toggle")]
    pub enhance_nose: bool,
    #[serde(default = "enabled", deserialize_with = "toggle")]
    pub enhance_lips: bool,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            enhance_eyes: true,
            enhance_nose: true,
            enhance_lips: true,
        }
    }
}

impl EnhanceConfig {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
