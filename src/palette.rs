//! Palette generation for raster color maps
//!
//! A palette is selected by a 1-based index and spread over a value range.
//! Palette 4 pins its last breakpoint to the range minimum, so its points
//! are not monotonic. Consumers that need sorted points must not rely on
//! palette 4.

use tracing::debug;

use crate::errors::StyleError;
use crate::style::ColorPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Rainbow,
    PurplePink,
    GreenYellow,
    Thermal,
    Grayscale,
}

impl Palette {
    pub const ALL: [Palette; 5] = [
        Palette::Rainbow,
        Palette::PurplePink,
        Palette::GreenYellow,
        Palette::Thermal,
        Palette::Grayscale,
    ];

    /// Index 0 means "no palette chosen"; unknown indexes map to nothing.
    pub fn from_index(index: u32) -> Option<Palette> {
        match index {
            1 => Some(Palette::Rainbow),
            2 => Some(Palette::PurplePink),
            3 => Some(Palette::GreenYellow),
            4 => Some(Palette::Thermal),
            5 => Some(Palette::Grayscale),
            _ => None,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            Palette::Rainbow => 1,
            Palette::PurplePink => 2,
            Palette::GreenYellow => 3,
            Palette::Thermal => 4,
            Palette::Grayscale => 5,
        }
    }

    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Palette::Rainbow => &["#e52520", "#ffde00", "#95c11f", "#1d71b8", "#662483"],
            Palette::PurplePink => &["#3F3460", "#EC1876"],
            Palette::GreenYellow => &["#036531", "#FDF01A"],
            Palette::Thermal => &["#2d2e83", "#1d71b8", "#ffde00", "#e52520"],
            Palette::Grayscale => &["#000000", "#FFFFFF"],
        }
    }

    /// Breakpoint positions as fractions of the range.
    /// `None` pins the breakpoint to the range minimum.
    fn stops(&self) -> &'static [Option<f64>] {
        match self {
            Palette::Rainbow => &[Some(0.0), Some(0.25), Some(0.5), Some(0.75), Some(1.0)],
            Palette::Thermal => &[Some(0.0), Some(0.25), Some(0.5), None],
            Palette::PurplePink | Palette::GreenYellow | Palette::Grayscale => {
                &[Some(0.0), Some(1.0)]
            }
        }
    }

    /// Colors in application order, reversed when `inverse`
    pub fn ordered_colors(&self, inverse: bool) -> Vec<&'static str> {
        let mut colors = self.colors().to_vec();
        if inverse {
            colors.reverse();
        }
        colors
    }

    pub fn points(&self, min_value: f64, max_value: f64, inverse: bool) -> Vec<ColorPoint> {
        let span = max_value - min_value;
        self.stops()
            .iter()
            .zip(self.ordered_colors(inverse))
            .map(|(stop, color)| {
                let data = match stop {
                    Some(fraction) => min_value + fraction * span,
                    None => min_value,
                };
                ColorPoint::new(data, color)
            })
            .collect()
    }
}

/// Breakpoints for palette `index` over `[min_value, max_value]`.
///
/// Returns no points for index 0 or an unknown index.
pub fn generate(index: u32, min_value: f64, max_value: f64, inverse: bool) -> Vec<ColorPoint> {
    match Palette::from_index(index) {
        Some(palette) => {
            debug!(
                "Generating palette {:?} over [{}, {}] (inverse: {})",
                palette, min_value, max_value, inverse
            );
            palette.points(min_value, max_value, inverse)
        }
        None => Vec::new(),
    }
}

/// Like [`generate`], but rejects ranges where min exceeds max or either bound is NaN
pub fn generate_checked(
    index: u32,
    min_value: f64,
    max_value: f64,
    inverse: bool,
) -> Result<Vec<ColorPoint>, StyleError> {
    if min_value.is_nan() || max_value.is_nan() || min_value > max_value {
        return Err(StyleError::InvalidRange {
            min: min_value,
            max: max_value,
        });
    }
    Ok(generate(index, min_value, max_value, inverse))
}

/// Coerce a slider/text input to a number.
///
/// Surrounding and embedded whitespace is dropped and a lone decimal comma
/// is read as a decimal point.
pub fn parse_range_value(input: &str) -> Option<f64> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let normalized = if !compact.contains('.') && compact.matches(',').count() == 1 {
        compact.replace(',', ".")
    } else {
        compact
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// [`generate_checked`] over text inputs; `None` when either bound is not a number
pub fn generate_from_inputs(
    index: u32,
    min_input: &str,
    max_input: &str,
    inverse: bool,
) -> Option<Result<Vec<ColorPoint>, StyleError>> {
    let min = parse_range_value(min_input)?;
    let max = parse_range_value(max_input)?;
    Some(generate_checked(index, min, max, inverse))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn parse(hex: &str) -> Result<Rgb, StyleError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StyleError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| StyleError::InvalidColor(hex.to_string()))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

/// Sample `count` evenly spaced colors along a ramp of hex colors
pub fn sample_ramp(colors: &[&str], count: usize) -> Result<Vec<String>, StyleError> {
    let stops = colors
        .iter()
        .map(|c| Rgb::parse(c))
        .collect::<Result<Vec<_>, _>>()?;
    if stops.is_empty() || count == 0 {
        return Ok(Vec::new());
    }
    if stops.len() == 1 || count == 1 {
        return Ok(vec![stops[0].to_hex(); count]);
    }

    let segments = (stops.len() - 1) as f64;
    Ok((0..count)
        .map(|i| {
            let position = i as f64 / (count - 1) as f64 * segments;
            let segment = (position.floor() as usize).min(stops.len() - 2);
            let t = position - segment as f64;
            stops[segment].lerp(&stops[segment + 1], t).to_hex()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purple_pink_palette_spans_range() {
        let points = generate(2, 0.0, 255.0, false);
        assert_eq!(
            points,
            vec![
                ColorPoint::new(0.0, "#3F3460"),
                ColorPoint::new(255.0, "#EC1876"),
            ]
        );
    }

    #[test]
    fn rainbow_palette_uses_quarter_stops() {
        let points = generate(1, 0.0, 100.0, false);
        let data: Vec<f64> = points.iter().map(|p| p.data).collect();
        assert_eq!(data, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(points[4].color, "#662483");
    }

    #[test]
    fn thermal_palette_pins_last_stop_to_min() {
        let points = generate(4, 10.0, 50.0, false);
        let data: Vec<f64> = points.iter().map(|p| p.data).collect();
        assert_eq!(data, vec![10.0, 20.0, 30.0, 10.0]);

        let inverse = generate(4, 10.0, 50.0, true);
        assert_eq!(inverse[3].data, 10.0);
        assert_eq!(inverse[3].color, "#2d2e83");
    }

    #[test]
    fn unknown_or_zero_index_yields_nothing() {
        assert!(generate(0, 0.0, 1.0, false).is_empty());
        assert!(generate(6, 0.0, 1.0, true).is_empty());
    }

    #[test]
    fn checked_generation_rejects_inverted_range() {
        assert_eq!(
            generate_checked(1, 5.0, 1.0, false),
            Err(StyleError::InvalidRange { min: 5.0, max: 1.0 })
        );
        assert_eq!(generate_checked(5, 1.0, 1.0, false).unwrap().len(), 2);
    }

    #[test]
    fn range_values_are_coerced() {
        assert_eq!(parse_range_value(" 12.5 "), Some(12.5));
        assert_eq!(parse_range_value("1 000"), Some(1000.0));
        assert_eq!(parse_range_value("3,75"), Some(3.75));
        assert_eq!(parse_range_value(""), None);
        assert_eq!(parse_range_value("abc"), None);
    }

    #[test]
    fn text_inputs_feed_generation() {
        let points = generate_from_inputs(3, "0", " 1,5 ", false).unwrap().unwrap();
        assert_eq!(points[1].data, 1.5);
        assert!(generate_from_inputs(3, "low", "2", false).is_none());
    }

    #[test]
    fn ramp_sampling_hits_endpoints_and_midpoint() {
        let colors = sample_ramp(&["#000000", "#FFFFFF"], 3).unwrap();
        assert_eq!(colors, vec!["#000000", "#808080", "#ffffff"]);
        assert!(sample_ramp(&["not-a-color"], 2).is_err());
    }
}
