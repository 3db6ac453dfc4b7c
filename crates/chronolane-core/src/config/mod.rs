use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-owned timeline configuration (a JSON object).
///
/// Keys are camelCase and optional; [`LayoutConfig::from_config`] resolves them against the
/// documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineConfig(Value);

impl Default for TimelineConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl TimelineConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                message: "expected a JSON object".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    /// Merges `other` on top of `self`; objects merge key-wise, everything else overwrites.
    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Resolved, typed layout constants for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Axis density.
    pub px_per_day: f64,
    pub card_width: f64,
    /// Fixed card height. Long titles are clamped to fit.
    pub card_height: f64,
    /// Visual gap between horizontally adjacent cards in one slot.
    pub card_gap: f64,
    pub safety_margin: f64,
    /// Vertical distance between stacked slots.
    pub slot_step: f64,
    pub top_base_offset: f64,
    pub bottom_base_offset: f64,
    pub min_inner_width: f64,
    pub padding: f64,
    /// Vertical center of the axis line.
    pub line_y: f64,
    pub dot_size: f64,
    pub stem_floor: f64,
    pub font_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            px_per_day: 3.0,
            card_width: 220.0,
            card_height: 52.0,
            card_gap: 18.0,
            safety_margin: 20.0,
            slot_step: 56.0,
            top_base_offset: 70.0,
            bottom_base_offset: 320.0,
            min_inner_width: 1400.0,
            padding: 90.0,
            line_y: 250.0,
            dot_size: 10.0,
            stem_floor: 12.0,
            font_size: 14.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_config(config: &TimelineConfig) -> Result<Self> {
        let d = Self::default();
        let out = Self {
            px_per_day: cfg_f64(config, "pxPerDay", d.px_per_day)?,
            card_width: cfg_f64(config, "cardWidth", d.card_width)?,
            card_height: cfg_f64(config, "cardHeight", d.card_height)?,
            card_gap: cfg_f64(config, "cardGap", d.card_gap)?,
            safety_margin: cfg_f64(config, "safetyMargin", d.safety_margin)?,
            slot_step: cfg_f64(config, "slotStep", d.slot_step)?,
            top_base_offset: cfg_f64(config, "topBaseOffset", d.top_base_offset)?,
            bottom_base_offset: cfg_f64(config, "bottomBaseOffset", d.bottom_base_offset)?,
            min_inner_width: cfg_f64(config, "minInnerWidth", d.min_inner_width)?,
            padding: cfg_f64(config, "padding", d.padding)?,
            line_y: cfg_f64(config, "lineY", d.line_y)?,
            dot_size: cfg_f64(config, "dotSize", d.dot_size)?,
            stem_floor: cfg_f64(config, "stemFloor", d.stem_floor)?,
            font_size: cfg_f64(config, "fontSize", d.font_size)?,
        };
        out.validate()?;
        Ok(out)
    }

    /// Checks the geometric constraints that keep cards in separate slots and off the axis.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(Error::InvalidConfig {
                message: message.to_string(),
            })
        };
        if self.card_width <= 0.0 || self.card_height <= 0.0 || self.font_size <= 0.0 {
            return invalid("cardWidth, cardHeight and fontSize must be positive");
        }
        if self.card_height > self.slot_step {
            return invalid("cardHeight must not exceed slotStep");
        }
        if self.top_base_offset + self.card_height > self.line_y {
            return invalid("top cards must end above lineY (topBaseOffset + cardHeight <= lineY)");
        }
        if self.bottom_base_offset < self.line_y {
            return invalid("bottom cards must start below lineY (bottomBaseOffset >= lineY)");
        }
        Ok(())
    }

    /// Minimum horizontal distance between two cards sharing a lane slot.
    pub fn min_gap(&self) -> f64 {
        self.card_width + self.card_gap + self.safety_margin
    }
}

fn cfg_f64(config: &TimelineConfig, key: &str, fallback: f64) -> Result<f64> {
    let Some(raw) = config.lookup(key) else {
        return Ok(fallback);
    };
    if raw.is_null() {
        return Ok(fallback);
    }
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        // Style sheets tend to hand values around as "56px".
        Value::String(s) => s.trim().trim_end_matches("px").trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(Error::InvalidConfig {
            message: format!("`{key}` must be a non-negative number, got {raw}"),
        }),
    }
}
