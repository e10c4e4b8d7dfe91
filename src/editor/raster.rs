//! Raster style editor
//!
//! The editing mode of an existing rule is never stored: it is inferred
//! from the rule's symbolizers by [`classify`], so data round-tripped
//! through the server always reopens in the right editor.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::rules::RuleList;
use super::{Confirm, StyleEditor, ValidationFlags};
use crate::errors::StyleError;
use crate::style::{
    CellSymbolizer, ColorMap, DynamicRangeSymbolizer, PointSymbolizer, RasterSymbolizer, Rule,
    Style, Symbolizer, DEFAULT_MAX_SCALE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterMode {
    Palette,
    Cell,
    Dynamic,
}

/// Infer the editing mode from a rule's symbolizers.
///
/// A cell symbolizer wins over a dynamic range one; anything else is
/// edited as a palette.
pub fn classify(symbolizers: &[Symbolizer]) -> RasterMode {
    if symbolizers.iter().any(|s| matches!(s, Symbolizer::Cell(_))) {
        RasterMode::Cell
    } else if symbolizers
        .iter()
        .any(|s| matches!(s, Symbolizer::DynamicRange(_)))
    {
        RasterMode::Dynamic
    } else {
        RasterMode::Palette
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterView {
    None,
    Editing(RasterMode),
}

pub struct RasterEditor {
    rules: RuleList,
    view: RasterView,
    flags: ValidationFlags,
    max_scale: f64,
}

impl RasterEditor {
    pub fn new(style: Style, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            rules: RuleList::new(style, confirm),
            view: RasterView::None,
            flags: ValidationFlags::default(),
            max_scale: DEFAULT_MAX_SCALE,
        }
    }

    pub fn with_max_scale(mut self, max_scale: f64) -> Self {
        self.max_scale = max_scale;
        self
    }

    pub fn view(&self) -> RasterView {
        self.view
    }

    pub fn flags(&self) -> ValidationFlags {
        self.flags
    }

    pub fn create_palette_rule(&mut self) -> String {
        let raster = RasterSymbolizer {
            color_map: Some(ColorMap::interpolate(Vec::new())),
            ..Default::default()
        };
        self.create_rule(Symbolizer::Raster(raster), RasterMode::Palette)
    }

    pub fn create_cell_rule(&mut self) -> String {
        let cell = CellSymbolizer {
            rule: Rule::new("cell-rule").with_symbolizer(Symbolizer::Point(PointSymbolizer::default())),
            ..Default::default()
        };
        self.create_rule(Symbolizer::Cell(cell), RasterMode::Cell)
    }

    pub fn create_dynamic_rule(&mut self) -> String {
        self.create_rule(
            Symbolizer::DynamicRange(DynamicRangeSymbolizer::rgb()),
            RasterMode::Dynamic,
        )
    }

    fn create_rule(&mut self, symbolizer: Symbolizer, mode: RasterMode) -> String {
        let rule = Rule::new("default-rule")
            .with_max_scale(self.max_scale)
            .with_symbolizer(symbolizer);
        let name = self.rules.add(rule);
        info!("Created {:?} raster rule {}", mode, name);
        self.view = RasterView::Editing(mode);
        name
    }

    pub fn select_rule(&mut self, name: &str) -> Result<(), StyleError> {
        self.rules.select(name)
    }

    /// Reopen the selected rule in the editor matching its symbolizers
    pub fn edit_selected_raster_rule(&mut self) -> Option<RasterMode> {
        let mode = classify(&self.rules.selected()?.symbolizers);
        debug!("Reopening raster rule in {:?} mode", mode);
        self.view = RasterView::Editing(mode);
        Some(mode)
    }

    pub fn go_back(&mut self) {
        self.view = RasterView::None;
    }

    /// Fill the selected rule's color map from a palette.
    ///
    /// Returns the number of breakpoints written; an unknown palette index
    /// writes nothing and leaves the color map untouched.
    pub fn apply_palette_to_selected(
        &mut self,
        index: u32,
        min_value: f64,
        max_value: f64,
        inverse: bool,
    ) -> Result<usize, StyleError> {
        let rule = self.rules.selected_mut().ok_or(StyleError::NoSelection)?;
        let rule_name = rule.name.clone();
        let raster = rule
            .raster_mut()
            .ok_or_else(|| StyleError::NotRaster(rule_name))?;

        let mut color_map = raster.color_map.clone().unwrap_or_default();
        let count = color_map.apply_palette(index, min_value, max_value, inverse)?;
        if count > 0 {
            raster.color_map = Some(color_map);
        }
        Ok(count)
    }

    pub fn move_up_rule(&mut self) -> bool {
        self.rules.move_up()
    }

    pub fn move_down_rule(&mut self) -> bool {
        self.rules.move_down()
    }

    pub fn delete_selected_rule(&mut self) -> bool {
        let deleted = self.rules.delete_selected();
        if deleted {
            self.go_back();
        }
        deleted
    }

    pub fn delete_all_rules(&mut self) -> bool {
        let deleted = self.rules.delete_all();
        if deleted {
            self.go_back();
        }
        deleted
    }
}

impl StyleEditor for RasterEditor {
    fn rules(&self) -> &RuleList {
        &self.rules
    }

    fn rules_mut(&mut self) -> &mut RuleList {
        &mut self.rules
    }

    fn validate(&mut self) -> ValidationFlags {
        self.flags.style_name_missing = self.rules.style().name.trim().is_empty();
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> RasterEditor {
        RasterEditor::new(Style::new("dem"), Arc::new(|_: &str| true))
    }

    #[test]
    fn classify_prefers_cell_over_dynamic() {
        let symbolizers = vec![
            Symbolizer::DynamicRange(DynamicRangeSymbolizer::rgb()),
            Symbolizer::Cell(CellSymbolizer::default()),
        ];
        assert_eq!(classify(&symbolizers), RasterMode::Cell);
        assert_eq!(classify(&symbolizers[..1]), RasterMode::Dynamic);
        assert_eq!(classify(&[]), RasterMode::Palette);
    }

    #[test]
    fn reopening_infers_mode_from_data() {
        let mut editor = editor();
        let dynamic = editor.create_dynamic_rule();
        let cell = editor.create_cell_rule();
        editor.go_back();
        assert_eq!(editor.view(), RasterView::None);

        editor.select_rule(&dynamic).unwrap();
        assert_eq!(editor.edit_selected_raster_rule(), Some(RasterMode::Dynamic));
        editor.select_rule(&cell).unwrap();
        assert_eq!(editor.edit_selected_raster_rule(), Some(RasterMode::Cell));
        assert_eq!(editor.view(), RasterView::Editing(RasterMode::Cell));
    }

    #[test]
    fn palette_fills_selected_color_map() {
        let mut editor = editor();
        editor.create_palette_rule();
        assert_eq!(editor.apply_palette_to_selected(1, 0.0, 100.0, false), Ok(5));

        let rule = editor.rules().selected().unwrap();
        match &rule.symbolizers[0] {
            Symbolizer::Raster(raster) => {
                let map = raster.color_map.as_ref().unwrap();
                assert_eq!(map.points().len(), 5);
                assert_eq!(map.function.interval, 5);
            }
            other => panic!("Expected raster symbolizer, got {:?}", other),
        }
    }

    #[test]
    fn palette_on_cell_rule_is_rejected() {
        let mut editor = editor();
        let name = editor.create_cell_rule();
        assert_eq!(
            editor.apply_palette_to_selected(1, 0.0, 1.0, false),
            Err(StyleError::NotRaster(name))
        );
    }
}
