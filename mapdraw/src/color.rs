use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Stroke width used for every drawn shape.
pub const STROKE_WEIGHT: f64 = 3.0;
/// Fill opacity given to colours recovered from packed-RGB attributes.
pub const LEGACY_FILL_OPACITY: f64 = 0.25;

/// Named palette entry attached to each drawn feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawColor {
    pub id: String,
    pub name: String,
    pub hex: String,
    pub fill_opacity: f64,
}

impl Default for DrawColor {
    fn default() -> Self {
        DrawColor::new("default", "Default", "#3b82f6", 0.25)
    }
}

impl DrawColor {
    pub fn new(id: &str, name: &str, hex: &str, fill_opacity: f64) -> Self {
        DrawColor {
            id: id.to_string(),
            name: name.to_string(),
            hex: hex.to_string(),
            fill_opacity,
        }
    }

    /// Colour recovered from a packed `0xRRGGBB` integer.
    pub fn from_packed_rgb(rgb: u32) -> Self {
        DrawColor {
            id: "legacy-color".to_string(),
            name: "Legacy colour".to_string(),
            hex: rgb_to_hex(rgb),
            fill_opacity: LEGACY_FILL_OPACITY,
        }
    }

    /// Accepts a serialized `drawColor` object; rejects entries without a usable hex.
    pub fn from_value(v: &Value) -> Option<Self> {
        let c: DrawColor = serde_json::from_value(v.clone()).ok()?;
        if hex_to_rgb(&c.hex).is_none() || !c.fill_opacity.is_finite() {
            return None;
        }
        Some(DrawColor {
            fill_opacity: c.fill_opacity.clamp(0.0, 1.0),
            ..c
        })
    }

    /// Wire form stored under the `drawColor` attribute.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "hex": self.hex,
            "fillOpacity": self.fill_opacity,
        })
    }

    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.hex.clone(),
            fill_color: self.hex.clone(),
            fill_opacity: self.fill_opacity,
            weight: STROKE_WEIGHT,
            opacity: stroke_opacity(STROKE_WEIGHT),
        }
    }
}

/// Built-in drawing palette, default first.
pub fn palette() -> Vec<DrawColor> {
    vec![
        DrawColor::default(),
        DrawColor::new("red", "Red", "#ef4444", 0.25),
        DrawColor::new("green", "Green", "#22c55e", 0.25),
        DrawColor::new("amber", "Amber", "#f59e0b", 0.25),
        DrawColor::new("purple", "Purple", "#a855f7", 0.25),
        DrawColor::new("white", "White", "#ffffff", 0.15),
    ]
}

/// Render style pushed to the surface per feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub weight: f64,
    pub opacity: f64,
}

#[inline]
fn stroke_opacity(weight: f64) -> f64 {
    if weight > 0.0 { 1.0 } else { 0.0 }
}

pub fn rgb_to_hex(rgb: u32) -> String {
    let r = (rgb >> 16) & 0xff;
    let g = (rgb >> 8) & 0xff;
    let b = rgb & 0xff;
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn hex_to_rgb(hex: &str) -> Option<u32> {
    let cleaned = hex.strip_prefix('#').unwrap_or(hex);
    // from_str_radix alone would take a leading sign.
    if cleaned.len() != 6 || !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(cleaned, 16).ok()
}

/// Reads a packed-RGB attribute. Fractions and negatives are rejected.
pub fn packed_rgb(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return Some((n & 0xff_ffff) as u32);
    }
    let f = v.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        Some(((f as u64) & 0xff_ffff) as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_rgb_hex_conversions() {
        assert_eq!(rgb_to_hex(0xff8000), "#ff8000");
        assert_eq!(rgb_to_hex(0x000a0b), "#000a0b");
        assert_eq!(hex_to_rgb("#ff8000"), Some(0xff8000));
        assert_eq!(hex_to_rgb("00ff00"), Some(0x00ff00));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
    }

    #[test]
    fn signed_hex_is_rejected() {
        assert_eq!(hex_to_rgb("+fffff"), None);
        assert_eq!(hex_to_rgb("#+00000"), None);
        let signed = json!({"id": "x", "name": "X", "hex": "+fffff", "fillOpacity": 0.4});
        assert!(DrawColor::from_value(&signed).is_none());
    }

    #[test]
    fn legacy_colour_materializes_draw_color() {
        let c = DrawColor::from_packed_rgb(packed_rgb(&json!(16711680)).unwrap());
        assert_eq!(c.hex, "#ff0000");
        assert_eq!(c.id, "legacy-color");
        assert_eq!(c.fill_opacity, LEGACY_FILL_OPACITY);
        assert_eq!(packed_rgb(&json!(-1)), None);
        assert_eq!(packed_rgb(&json!(1.5)), None);
        assert_eq!(packed_rgb(&json!("red")), None);
    }

    #[test]
    fn style_uses_fixed_weight() {
        let s = DrawColor::default().shape_style();
        assert_eq!(s.weight, STROKE_WEIGHT);
        assert_eq!(s.color, s.fill_color);
        assert_eq!(s.opacity, 1.0);
    }

    #[test]
    fn draw_color_value_requires_hex() {
        let ok = json!({"id": "x", "name": "X", "hex": "#112233", "fillOpacity": 0.4});
        assert_eq!(DrawColor::from_value(&ok).unwrap().to_value(), ok);
        let bad = json!({"id": "x", "name": "X", "hex": "blue", "fillOpacity": 0.4});
        assert!(DrawColor::from_value(&bad).is_none());
    }
}
