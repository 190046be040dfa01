//! User-tunable render settings, per region.
//!
//! Settings arrive from a configuration surface as loosely typed numbers. Out-of-range values are
//! clamped; values that are not numbers at all, and unknown fields, are configuration errors.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::style::catalogue::region_id_for_key;
use crate::style::RegionId;

/// Largest accepted rotation range; wider ranges are clamped to a full turn.
pub const MAX_ROTATION_RANGE_DEGREES: u32 = 360;

/// Render settings for one region. Immutable for the duration of a render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RenderSettings {
    density: u8,
    rotation_range_degrees: u32,
    brightness: u8,
    opacity: u8,
}

impl RenderSettings {
    /// Create settings from raw numbers, clamping each into its range.
    ///
    /// `density`, `brightness` and `opacity` are percentages (`0..=100`); `rotation` is the
    /// half-width of the rotation range in degrees (`0..=360`). Non-finite input is rejected.
    pub fn new(density: f64, rotation: f64, brightness: f64, opacity: f64) -> Result<Self> {
        Ok(Self {
            density: percent("density", density)?,
            rotation_range_degrees: clamp_number("rotation", rotation, MAX_ROTATION_RANGE_DEGREES)?,
            brightness: percent("brightness", brightness)?,
            opacity: percent("opacity", opacity)?,
        })
    }

    pub fn density(&self) -> u8 {
        self.density
    }

    pub fn rotation_range_degrees(&self) -> u32 {
        self.rotation_range_degrees
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Brightness multiplier in `[0, 1]`.
    pub fn brightness_factor(&self) -> f32 {
        self.brightness as f32 / 100.0
    }

    /// Opacity multiplier in `[0, 1]`.
    pub fn opacity_factor(&self) -> f32 {
        self.opacity as f32 / 100.0
    }

    /// Scan stride for a region: `max(1, floor(step_base * (1 - density / 100) + 1))`.
    pub fn step_for(&self, step_base: u32) -> u32 {
        let sparse = 100 - self.density as u64;
        let step = step_base as u64 * sparse / 100 + 1;
        step.min(u32::MAX as u64).max(1) as u32
    }

    fn apply(mut self, entry: &SettingsEntry, context: &str) -> Result<Self> {
        if let Some(v) = &entry.density {
            self.density = percent("density", v.to_f64(context, "density")?)?;
        }
        if let Some(v) = &entry.rotation {
            self.rotation_range_degrees = clamp_number(
                "rotation",
                v.to_f64(context, "rotation")?,
                MAX_ROTATION_RANGE_DEGREES,
            )?;
        }
        if let Some(v) = &entry.brightness {
            self.brightness = percent("brightness", v.to_f64(context, "brightness")?)?;
        }
        if let Some(v) = &entry.opacity {
            self.opacity = percent("opacity", v.to_f64(context, "opacity")?)?;
        }
        Ok(self)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            density: 0,
            rotation_range_degrees: 8,
            brightness: 100,
            opacity: 100,
        }
    }
}

/// One region entry of the settings JSON, before clamping.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsEntry {
    density: Option<LooseNumber>,
    rotation: Option<LooseNumber>,
    brightness: Option<LooseNumber>,
    opacity: Option<LooseNumber>,
    symbols: Option<SymbolList>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged, expecting = "a number or a numeric string")]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn to_f64(&self, context: &str, field: &str) -> Result<f64> {
        match self {
            LooseNumber::Number(n) => Ok(*n),
            LooseNumber::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                Error::Configuration(format!("'{context}.{field}' must be a number, got '{s}'"))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged, expecting = "a string or a list of single characters")]
enum SymbolList {
    Text(String),
    List(Vec<String>),
}

impl SymbolList {
    fn to_chars(&self, context: &str) -> Result<Vec<char>> {
        match self {
            SymbolList::Text(s) => Ok(s.chars().filter(|c| !c.is_whitespace()).collect()),
            SymbolList::List(items) => items
                .iter()
                .map(|s| {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(c),
                        _ => Err(Error::Configuration(format!(
                            "'{context}.symbols' must be a list of single characters, got '{s}'"
                        ))),
                    }
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct RegionOverrides {
    settings: Option<RenderSettings>,
    symbols: Option<Vec<char>>,
}

/// Settings for every region of a render call, with a default for unlisted regions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsTable {
    default: RenderSettings,
    regions: BTreeMap<RegionId, RegionOverrides>,
}

impl SettingsTable {
    /// Creates a table where every region uses [`RenderSettings::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings used by regions without their own entry.
    pub fn with_default(mut self, settings: RenderSettings) -> Self {
        self.default = settings;
        self
    }

    /// Settings for one region.
    pub fn with_region(mut self, id: RegionId, settings: RenderSettings) -> Self {
        self.regions.entry(id).or_default().settings = Some(settings);
        self
    }

    /// Replace the symbol set a region draws with. Fails on an empty set.
    pub fn with_symbols(
        mut self,
        id: RegionId,
        symbols: impl IntoIterator<Item = char>,
    ) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(Error::Configuration(format!(
                "symbol override for region {id} is empty"
            )));
        }
        self.regions.entry(id).or_default().symbols = Some(symbols);
        Ok(self)
    }

    pub fn default_settings(&self) -> RenderSettings {
        self.default
    }

    /// Effective settings of a region.
    pub fn for_region(&self, id: RegionId) -> RenderSettings {
        self.regions
            .get(&id)
            .and_then(|o| o.settings)
            .unwrap_or(self.default)
    }

    /// Symbol override of a region, if any.
    pub fn symbols_for(&self, id: RegionId) -> Option<&[char]> {
        self.regions.get(&id).and_then(|o| o.symbols.as_deref())
    }

    /// Regions with an explicit entry, ascending.
    pub fn configured_regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    /// Parse a JSON object keyed by region.
    ///
    /// Keys are catalogue names (`"skin"`, `"l_eye"`, ...), numeric ids (`"4"`), or `"default"`.
    /// Values are objects with optional `density`, `rotation`, `brightness`, `opacity` numbers
    /// (numeric strings are accepted) and an optional `symbols` list; any other field is an
    /// error. Region entries start from the `"default"` entry when present. Symbols only take
    /// effect for regions the style registry has no entry for.
    ///
    /// ```
    /// use glyph_mosaic::style::settings::SettingsTable;
    ///
    /// let table = SettingsTable::from_json_str(
    ///     r#"{ "skin": { "density": 50, "rotation": 12 }, "l_eye": { "symbols": ["o", "0"] } }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(table.for_region(1).density(), 50);
    /// assert_eq!(table.symbols_for(4), Some(&['o', '0'][..]));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("malformed settings JSON: {e}")))?;
        Self::from_json_value(&value)
    }

    /// Parse an already decoded JSON value. See [`SettingsTable::from_json_str`].
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let entries = BTreeMap::<String, SettingsEntry>::deserialize(value)
            .map_err(|e| Error::Configuration(format!("invalid settings: {e}")))?;

        let mut table = SettingsTable::new();
        if let Some(default) = entries.get("default") {
            if default.symbols.is_some() {
                return Err(Error::Configuration(
                    "the default entry cannot carry symbols".into(),
                ));
            }
            table.default = RenderSettings::default().apply(default, "default")?;
        }

        for (key, entry) in entries.iter().filter(|(k, _)| k.as_str() != "default") {
            let id = parse_region_key(key)?;
            let settings = table.default.apply(entry, key)?;
            table = table.with_region(id, settings);
            if let Some(symbols) = &entry.symbols {
                table = table.with_symbols(id, symbols.to_chars(key)?)?;
            }
        }
        Ok(table)
    }
}

fn parse_region_key(key: &str) -> Result<RegionId> {
    if let Some(id) = region_id_for_key(key) {
        return Ok(id);
    }
    match key.parse::<RegionId>() {
        Ok(0) => Err(Error::Configuration(
            "region 0 is background and cannot be configured".into(),
        )),
        Ok(id) => Ok(id),
        Err(_) => Err(Error::Configuration(format!("unknown region key '{key}'"))),
    }
}

fn percent(field: &str, value: f64) -> Result<u8> {
    clamp_number(field, value, 100).map(|v| v as u8)
}

fn clamp_number(field: &str, value: f64, max: u32) -> Result<u32> {
    if !value.is_finite() {
        return Err(Error::Configuration(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(value.round().clamp(0.0, max as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range_values() {
        let s = RenderSettings::new(150.0, -5.0, 250.0, -1.0).unwrap();
        assert_eq!(s.density(), 100);
        assert_eq!(s.rotation_range_degrees(), 0);
        assert_eq!(s.brightness(), 100);
        assert_eq!(s.opacity(), 0);

        let wide = RenderSettings::new(0.0, 1000.0, 0.0, 0.0).unwrap();
        assert_eq!(wide.rotation_range_degrees(), 360);
    }

    #[test]
    fn new_rejects_non_finite_values() {
        assert!(RenderSettings::new(f64::NAN, 0.0, 0.0, 0.0)
            .unwrap_err()
            .is_configuration());
        assert!(RenderSettings::new(0.0, f64::INFINITY, 0.0, 0.0).is_err());
    }

    #[test]
    fn step_follows_density() {
        let s = |density| RenderSettings::new(density, 0.0, 100.0, 100.0).unwrap();
        assert_eq!(s(0.0).step_for(6), 7);
        assert_eq!(s(50.0).step_for(6), 4);
        assert_eq!(s(100.0).step_for(6), 1);
        assert_eq!(s(90.0).step_for(10), 2);
        assert_eq!(s(99.0).step_for(10), 1);
    }

    #[test]
    fn factors_scale_percentages() {
        let s = RenderSettings::new(0.0, 0.0, 50.0, 25.0).unwrap();
        assert_eq!(s.brightness_factor(), 0.5);
        assert_eq!(s.opacity_factor(), 0.25);
    }

    #[test]
    fn table_falls_back_to_default() {
        let custom = RenderSettings::new(40.0, 3.0, 90.0, 80.0).unwrap();
        let table = SettingsTable::new().with_region(4, custom);
        assert_eq!(table.for_region(4), custom);
        assert_eq!(table.for_region(5), RenderSettings::default());
        assert_eq!(table.symbols_for(4), None);
    }

    #[test]
    fn json_entries_start_from_default_entry() {
        let table = SettingsTable::from_json_str(
            r#"{
                "default": { "rotation": 0, "opacity": 50 },
                "hair": { "density": "30" },
                "12": { "brightness": 70, "symbols": "∩ ∪" }
            }"#,
        )
        .unwrap();
        assert_eq!(table.default_settings().rotation_range_degrees(), 0);
        let hair = table.for_region(17);
        assert_eq!(hair.density(), 30);
        assert_eq!(hair.opacity(), 50);
        assert_eq!(hair.rotation_range_degrees(), 0);
        assert_eq!(table.for_region(12).brightness(), 70);
        assert_eq!(table.symbols_for(12), Some(&['∩', '∪'][..]));
        assert_eq!(table.configured_regions().collect::<Vec<_>>(), vec![12, 17]);
    }

    #[test]
    fn json_rejects_malformed_input() {
        for bad in [
            "not json",
            "[1, 2]",
            r#"{ "skin": 5 }"#,
            r#"{ "skin": { "density": "lots" } }"#,
            r#"{ "skin": { "rotation": true } }"#,
            r#"{ "tail": {} }"#,
            r#"{ "0": {} }"#,
            r#"{ "skin": { "symbols": ["ab"] } }"#,
            r#"{ "skin": { "symbols": [] } }"#,
            r#"{ "default": { "symbols": "xy" } }"#,
        ] {
            let err = SettingsTable::from_json_str(bad).unwrap_err();
            assert!(err.is_configuration(), "expected configuration error for {bad}");
        }
    }

    #[test]
    fn json_rejects_misspelled_fields() {
        let err = SettingsTable::from_json_str(r#"{ "skin": { "densty": 80 } }"#).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("densty"), "{err}");
        assert!(SettingsTable::from_json_str(r#"{ "default": { "opacty": 10 } }"#).is_err());
    }

    #[test]
    fn json_clamps_numeric_values() {
        let table = SettingsTable::from_json_str(r#"{ "nose": { "density": 400 } }"#).unwrap();
        assert_eq!(table.for_region(10).density(), 100);
    }
}
