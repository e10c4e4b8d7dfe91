//! Symbolizers: the rendering instructions carried by a rule
//!
//! ```text
//! Symbolizer (@symbol)
//!   ├── point         graphic { size, rotation, opacity, mark { geometry, fill, stroke } }
//!   ├── line          stroke, perpendicularOffset
//!   ├── polygon       fill, stroke, perpendicularOffset
//!   ├── text          label, font, fill, halo
//!   ├── raster        opacity, channelSelection, colorMap
//!   ├── cell          cellSize, rule (nested Rule)
//!   └── dynamicrange  channels[]
//! ```

use serde::{Deserialize, Serialize};

use super::color_map::ColorMap;
use super::Rule;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "@symbol", rename_all = "lowercase")]
pub enum Symbolizer {
    Point(PointSymbolizer),
    Line(LineSymbolizer),
    Polygon(PolygonSymbolizer),
    Text(TextSymbolizer),
    Raster(RasterSymbolizer),
    Cell(CellSymbolizer),
    DynamicRange(DynamicRangeSymbolizer),
}

impl Symbolizer {
    /// The `@symbol` tag as it appears on the wire
    pub fn tag(&self) -> &'static str {
        match self {
            Symbolizer::Point(_) => "point",
            Symbolizer::Line(_) => "line",
            Symbolizer::Polygon(_) => "polygon",
            Symbolizer::Text(_) => "text",
            Symbolizer::Raster(_) => "raster",
            Symbolizer::Cell(_) => "cell",
            Symbolizer::DynamicRange(_) => "dynamicrange",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            color: "#c1c1c1".to_string(),
            opacity: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Stroke {
    pub color: String,
    pub opacity: f64,
    pub width: f64,
    pub dashed: bool,
    pub line_cap: String,
    pub line_join: String,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            opacity: 1.0,
            width: 1.0,
            dashed: false,
            line_cap: "square".to_string(),
            line_join: "bevel".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Mark {
    pub geometry: String,
    pub fill: Fill,
    pub stroke: Stroke,
}

impl Default for Mark {
    fn default() -> Self {
        Self {
            geometry: "circle".to_string(),
            fill: Fill::default(),
            stroke: Stroke::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Graphic {
    pub size: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub mark: Mark,
}

impl Default for Graphic {
    fn default() -> Self {
        Self {
            size: 15.0,
            rotation: 0.0,
            opacity: 1.0,
            mark: Mark::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PointSymbolizer {
    pub name: String,
    pub graphic: Graphic,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LineSymbolizer {
    pub name: String,
    pub stroke: Stroke,
    pub perpendicular_offset: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PolygonSymbolizer {
    pub name: String,
    pub fill: Fill,
    pub stroke: Stroke,
    pub perpendicular_offset: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Font {
    pub family: Vec<String>,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: vec!["Arial".to_string()],
            size: 12.0,
            bold: false,
            italic: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Halo {
    pub radius: f64,
    pub fill: Fill,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSymbolizer {
    pub name: String,
    /// Attribute whose value is rendered
    pub label: Option<String>,
    pub font: Font,
    pub fill: Fill,
    pub halo: Option<Halo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectedChannel {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelSelection {
    pub gray: Option<SelectedChannel>,
    pub rgb: Vec<SelectedChannel>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RasterSymbolizer {
    pub name: String,
    pub opacity: f64,
    pub channel_selection: Option<ChannelSelection>,
    pub color_map: Option<ColorMap>,
}

impl Default for RasterSymbolizer {
    fn default() -> Self {
        Self {
            name: String::new(),
            opacity: 1.0,
            channel_selection: None,
            color_map: None,
        }
    }
}

/// Aggregates pixels into cells and renders each cell with a nested rule
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CellSymbolizer {
    pub name: String,
    pub cell_size: u32,
    pub rule: Rule,
}

impl Default for CellSymbolizer {
    fn default() -> Self {
        Self {
            name: String::new(),
            cell_size: 20,
            rule: Rule::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeBound {
    /// `EXPRESSION` or `PERCENT`
    pub mode: String,
    pub value: String,
}

impl RangeBound {
    pub fn percent(value: f64) -> Self {
        Self {
            mode: "PERCENT".to_string(),
            value: value.to_string(),
        }
    }
}

impl Default for RangeBound {
    fn default() -> Self {
        Self::percent(0.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicChannel {
    pub band: String,
    pub color_space_component: String,
    pub lower: RangeBound,
    pub upper: RangeBound,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicRangeSymbolizer {
    pub name: String,
    pub channels: Vec<DynamicChannel>,
}

impl DynamicRangeSymbolizer {
    /// Red, green, blue and alpha channels stretched over bands 0..=2
    pub fn rgb() -> Self {
        let channel = |band: &str, component: &str| DynamicChannel {
            band: band.to_string(),
            color_space_component: component.to_string(),
            lower: RangeBound::percent(2.0),
            upper: RangeBound::percent(98.0),
        };
        Self {
            name: String::new(),
            channels: vec![
                channel("0", "R"),
                channel("1", "G"),
                channel("2", "B"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn symbolizers_are_tagged_with_at_symbol() {
        let value = serde_json::to_value(Symbolizer::DynamicRange(DynamicRangeSymbolizer::rgb()))
            .unwrap();
        assert_eq!(value["@symbol"], "dynamicrange");
        assert_eq!(value["channels"][0]["colorSpaceComponent"], "R");
    }

    #[test]
    fn cell_symbolizer_carries_nested_rule() {
        let symbolizer: Symbolizer = serde_json::from_value(json!({
            "@symbol": "cell",
            "cellSize": 32,
            "rule": {
                "name": "cell-rule",
                "symbolizers": [{"@symbol": "point"}]
            }
        }))
        .unwrap();

        match symbolizer {
            Symbolizer::Cell(cell) => {
                assert_eq!(cell.cell_size, 32);
                assert_eq!(cell.rule.name, "cell-rule");
                assert_eq!(cell.rule.symbolizers[0].tag(), "point");
            }
            other => panic!("Expected cell symbolizer, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let symbolizer: Symbolizer =
            serde_json::from_value(json!({"@symbol": "polygon", "name": "p"})).unwrap();
        if let Symbolizer::Polygon(polygon) = symbolizer {
            assert_eq!(polygon.stroke.width, 1.0);
            assert_eq!(polygon.fill.color, "#c1c1c1");
        } else {
            panic!("Expected polygon symbolizer");
        }
    }
}
