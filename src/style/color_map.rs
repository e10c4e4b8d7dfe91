//! Raster color maps

use serde::{Deserialize, Serialize};

use crate::errors::StyleError;
use crate::palette;

/// A single breakpoint of a color map
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ColorPoint {
    pub data: f64,
    pub color: String,
}

impl ColorPoint {
    pub fn new(data: f64, color: impl Into<String>) -> Self {
        Self {
            data,
            color: color.into(),
        }
    }
}

/// The `@function` of a color map
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum FunctionKind {
    Interpolate,
    Values,
    Categorize,
    Other(String),
}

impl From<String> for FunctionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "interpolate" => FunctionKind::Interpolate,
            "values" => FunctionKind::Values,
            "categorize" => FunctionKind::Categorize,
            _ => FunctionKind::Other(value),
        }
    }
}

impl From<FunctionKind> for String {
    fn from(kind: FunctionKind) -> Self {
        match kind {
            FunctionKind::Interpolate => "interpolate".to_string(),
            FunctionKind::Values => "values".to_string(),
            FunctionKind::Categorize => "categorize".to_string(),
            FunctionKind::Other(other) => other,
        }
    }
}

impl Default for FunctionKind {
    fn default() -> Self {
        FunctionKind::Interpolate
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorFunction {
    #[serde(rename = "@function", default)]
    pub kind: FunctionKind,
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub nan_color: Option<String>,
    #[serde(default)]
    pub points: Vec<ColorPoint>,
}

/// Maps numeric pixel values to colors
///
/// Interpolation expects `points` sorted ascending by `data`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    pub function: ColorFunction,
}

impl ColorMap {
    pub fn interpolate(points: Vec<ColorPoint>) -> Self {
        Self {
            function: ColorFunction {
                kind: FunctionKind::Interpolate,
                interval: points.len() as u32,
                nan_color: None,
                points,
            },
        }
    }

    pub fn points(&self) -> &[ColorPoint] {
        &self.function.points
    }

    /// Replace the breakpoints, keeping the function kind and nan color
    pub fn set_points(&mut self, points: Vec<ColorPoint>) {
        self.function.interval = points.len() as u32;
        self.function.points = points;
    }

    /// Replace the breakpoints with palette `index` spread over `min..max`.
    ///
    /// Returns the number of points written. An unknown index writes
    /// nothing and leaves the map untouched.
    pub fn apply_palette(
        &mut self,
        index: u32,
        min_value: f64,
        max_value: f64,
        inverse: bool,
    ) -> Result<usize, StyleError> {
        let points = palette::generate_checked(index, min_value, max_value, inverse)?;
        if points.is_empty() {
            return Ok(0);
        }
        let count = points.len();
        self.set_points(points);
        Ok(count)
    }

    pub fn is_sorted(&self) -> bool {
        self.function
            .points
            .windows(2)
            .all(|pair| pair[0].data <= pair[1].data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_kind_round_trips_unknown_values() {
        let map: ColorMap = serde_json::from_value(json!({
            "function": {
                "@function": "jenks",
                "interval": 3,
                "nanColor": "#00000000",
                "points": [{"data": 0.0, "color": "#000000"}]
            }
        }))
        .unwrap();

        assert_eq!(map.function.kind, FunctionKind::Other("jenks".to_string()));
        assert_eq!(map.function.nan_color.as_deref(), Some("#00000000"));

        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["function"]["@function"], "jenks");
        assert_eq!(value["function"]["nanColor"], "#00000000");
    }

    #[test]
    fn set_points_updates_interval() {
        let mut map = ColorMap::default();
        map.set_points(vec![
            ColorPoint::new(0.0, "#000000"),
            ColorPoint::new(10.0, "#ffffff"),
        ]);
        assert_eq!(map.function.interval, 2);
        assert!(map.is_sorted());
    }

    #[test]
    fn apply_palette_keeps_function_settings() {
        let mut map = ColorMap::default();
        map.function.kind = FunctionKind::Values;
        map.function.nan_color = Some("#00000000".to_string());

        assert_eq!(map.apply_palette(1, 0.0, 50.0, true), Ok(5));
        assert_eq!(map.function.interval, 5);
        assert_eq!(map.function.kind, FunctionKind::Values);
        assert_eq!(map.function.nan_color.as_deref(), Some("#00000000"));
        assert_eq!(map.points().first().map(|p| p.data), Some(0.0));
    }

    #[test]
    fn apply_palette_ignores_unknown_index_and_rejects_bad_range() {
        let mut map = ColorMap::interpolate(vec![ColorPoint::new(1.0, "#123456")]);
        let before = map.clone();

        assert_eq!(map.apply_palette(9, 0.0, 1.0, false), Ok(0));
        assert_eq!(map, before);
        assert_eq!(
            map.apply_palette(1, 2.0, 1.0, false),
            Err(StyleError::InvalidRange { min: 2.0, max: 1.0 })
        );
        assert_eq!(map, before);
    }
}
