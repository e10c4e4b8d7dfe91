//! Automatic rule generation: equal-interval classes and unique values

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cql::{rows_to_cql, FilterRow};
use crate::errors::StyleError;
use crate::palette::{sample_ramp, Palette};
use crate::style::{Rule, Symbolizer};

/// Equal-width classification of a numeric attribute
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntervalClassification {
    pub attribute: String,
    pub min: f64,
    pub max: f64,
    pub classes: usize,
    pub palette: u32,
    #[serde(default)]
    pub inverse: bool,
}

/// One rule per distinct value of an attribute
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueClassification {
    pub attribute: String,
    pub values: Vec<String>,
    pub palette: u32,
    #[serde(default)]
    pub inverse: bool,
}

/// Rules covering `[min, max]` in equal-width classes. The last class is
/// closed on its upper bound. Each rule gets a copy of `template`
/// recolored along the palette ramp.
pub fn interval_rules(
    params: &IntervalClassification,
    template: &Symbolizer,
) -> Result<Vec<Rule>, StyleError> {
    if params.min.is_nan() || params.max.is_nan() || params.min > params.max {
        return Err(StyleError::InvalidRange {
            min: params.min,
            max: params.max,
        });
    }
    let colors = match ramp(params.palette, params.inverse, params.classes)? {
        Some(colors) => colors,
        None => return Ok(Vec::new()),
    };

    let width = (params.max - params.min) / params.classes as f64;
    let rules: Vec<Rule> = colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let low = round_bound(params.min + width * i as f64);
            let last = i + 1 == params.classes;
            let high = if last {
                params.max
            } else {
                round_bound(params.min + width * (i + 1) as f64)
            };
            let rows = [
                FilterRow::new(&params.attribute, ">=", &low.to_string(), "AND"),
                FilterRow::new(
                    &params.attribute,
                    if last { "<=" } else { "<" },
                    &high.to_string(),
                    "",
                ),
            ];
            let mut rule = Rule::new(&format!("{}-interval-{}", params.attribute, i + 1))
                .with_symbolizer(recolor(template, color));
            rule.title = format!("{} - {}", low, high);
            rule.filter = Some(rows_to_cql(&rows));
            rule
        })
        .collect();

    info!(
        "Generated {} interval rules on {}",
        rules.len(),
        params.attribute
    );
    Ok(rules)
}

/// One rule per distinct value, in first-seen order
pub fn unique_value_rules(
    params: &UniqueValueClassification,
    template: &Symbolizer,
) -> Result<Vec<Rule>, StyleError> {
    let mut seen = HashSet::new();
    let values: Vec<&String> = params
        .values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .collect();

    let colors = match ramp(params.palette, params.inverse, values.len())? {
        Some(colors) => colors,
        None => return Ok(Vec::new()),
    };

    let rules: Vec<Rule> = values
        .iter()
        .zip(colors.iter())
        .enumerate()
        .map(|(i, (value, color))| {
            let rows = [FilterRow::new(&params.attribute, "=", value, "")];
            let mut rule = Rule::new(&format!("{}-value-{}", params.attribute, i + 1))
                .with_symbolizer(recolor(template, color));
            rule.title = value.to_string();
            rule.filter = Some(rows_to_cql(&rows));
            rule
        })
        .collect();

    info!(
        "Generated {} unique value rules on {}",
        rules.len(),
        params.attribute
    );
    Ok(rules)
}

fn ramp(palette: u32, inverse: bool, count: usize) -> Result<Option<Vec<String>>, StyleError> {
    match Palette::from_index(palette) {
        Some(palette) if count > 0 => {
            sample_ramp(&palette.ordered_colors(inverse), count).map(Some)
        }
        _ => Ok(None),
    }
}

fn round_bound(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Copy of `template` with its main color replaced
pub fn recolor(template: &Symbolizer, color: &str) -> Symbolizer {
    let mut symbolizer = template.clone();
    match &mut symbolizer {
        Symbolizer::Point(point) => point.graphic.mark.fill.color = color.to_string(),
        Symbolizer::Line(line) => line.stroke.color = color.to_string(),
        Symbolizer::Polygon(polygon) => polygon.fill.color = color.to_string(),
        Symbolizer::Text(text) => text.fill.color = color.to_string(),
        Symbolizer::Raster(_) | Symbolizer::Cell(_) | Symbolizer::DynamicRange(_) => {}
    }
    symbolizer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::PolygonSymbolizer;

    fn polygon() -> Symbolizer {
        Symbolizer::Polygon(PolygonSymbolizer::default())
    }

    fn fill_color(symbolizer: &Symbolizer) -> &str {
        match symbolizer {
            Symbolizer::Polygon(p) => &p.fill.color,
            _ => panic!("Expected polygon"),
        }
    }

    #[test]
    fn interval_rules_split_range_evenly() {
        let params = IntervalClassification {
            attribute: "pop".to_string(),
            min: 0.0,
            max: 30.0,
            classes: 3,
            palette: 5,
            inverse: false,
        };
        let rules = interval_rules(&params, &polygon()).unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(
            rules[0].filter.as_deref(),
            Some(r#""pop" >= '0' AND "pop" < '10'"#)
        );
        assert_eq!(
            rules[2].filter.as_deref(),
            Some(r#""pop" >= '20' AND "pop" <= '30'"#)
        );
        assert_eq!(rules[1].title, "10 - 20");
        assert_eq!(fill_color(&rules[0].symbolizers[0]), "#000000");
        assert_eq!(fill_color(&rules[2].symbolizers[0]), "#ffffff");
    }

    #[test]
    fn interval_rules_reject_inverted_range() {
        let params = IntervalClassification {
            attribute: "pop".to_string(),
            min: 5.0,
            max: 1.0,
            classes: 2,
            palette: 1,
            inverse: false,
        };
        assert!(interval_rules(&params, &polygon()).is_err());
    }

    #[test]
    fn unique_rules_skip_duplicates() {
        let params = UniqueValueClassification {
            attribute: "type".to_string(),
            values: vec!["road".into(), "rail".into(), "road".into()],
            palette: 2,
            inverse: true,
        };
        let rules = unique_value_rules(&params, &polygon()).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].filter.as_deref(), Some(r#""type" = 'road'"#));
        assert_eq!(rules[1].title, "rail");
        assert_eq!(fill_color(&rules[0].symbolizers[0]), "#ec1876");
    }

    #[test]
    fn unknown_palette_generates_nothing() {
        let params = UniqueValueClassification {
            attribute: "type".to_string(),
            values: vec!["a".into()],
            palette: 0,
            inverse: false,
        };
        assert!(unique_value_rules(&params, &polygon()).unwrap().is_empty());
    }
}
