//! Vector style editor
//!
//! ```text
//! RuleList ──create_*_rule / edit_selected_rule──▶ RuleEditor
//!    │ ──open_auto_interval──▶ AutoIntervalEditor
//!    │ ──open_auto_unique────▶ AutoUniqueEditor
//!    ◀──────────────── go_back (from anywhere) ───────
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use super::rules::RuleList;
use super::{Confirm, StyleEditor, ValidationFlags};
use crate::auto::{self, IntervalClassification, UniqueValueClassification};
use crate::cql::{apply_rows_to_rule, FilterForm};
use crate::errors::StyleError;
use crate::style::{
    LineSymbolizer, PointSymbolizer, PolygonSymbolizer, Rule, Style, Symbolizer, TextSymbolizer,
    DEFAULT_MAX_SCALE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorView {
    RuleList,
    RuleEditor,
    AutoIntervalEditor,
    AutoUniqueEditor,
}

pub struct VectorEditor {
    rules: RuleList,
    view: VectorView,
    filter_form: Option<FilterForm>,
    flags: ValidationFlags,
    max_scale: f64,
}

impl VectorEditor {
    pub fn new(style: Style, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            rules: RuleList::new(style, confirm),
            view: VectorView::RuleList,
            filter_form: None,
            flags: ValidationFlags::default(),
            max_scale: DEFAULT_MAX_SCALE,
        }
    }

    /// Max scale assigned to rules created from now on
    pub fn with_max_scale(mut self, max_scale: f64) -> Self {
        self.max_scale = max_scale;
        self
    }

    pub fn view(&self) -> VectorView {
        self.view
    }

    pub fn flags(&self) -> ValidationFlags {
        self.flags
    }

    pub fn filter_form(&self) -> Option<&FilterForm> {
        self.filter_form.as_ref()
    }

    pub fn filter_form_mut(&mut self) -> Option<&mut FilterForm> {
        self.filter_form.as_mut()
    }

    pub fn create_point_rule(&mut self) -> String {
        self.create_rule(Symbolizer::Point(PointSymbolizer::default()))
    }

    pub fn create_line_rule(&mut self) -> String {
        self.create_rule(Symbolizer::Line(LineSymbolizer::default()))
    }

    pub fn create_polygon_rule(&mut self) -> String {
        self.create_rule(Symbolizer::Polygon(PolygonSymbolizer::default()))
    }

    pub fn create_text_rule(&mut self) -> String {
        self.create_rule(Symbolizer::Text(TextSymbolizer::default()))
    }

    fn create_rule(&mut self, symbolizer: Symbolizer) -> String {
        let rule = Rule::new("default-rule")
            .with_max_scale(self.max_scale)
            .with_symbolizer(symbolizer);
        let name = self.rules.add(rule);
        info!("Created vector rule {}", name);
        self.enter_rule_editor();
        name
    }

    pub fn select_rule(&mut self, name: &str) -> Result<(), StyleError> {
        self.rules.select(name)
    }

    /// Open the selected rule. No-op without a selection.
    pub fn edit_selected_rule(&mut self) -> bool {
        if self.rules.selected().is_none() {
            return false;
        }
        self.enter_rule_editor();
        true
    }

    fn enter_rule_editor(&mut self) {
        self.filter_form = self.rules.selected().map(FilterForm::from_rule);
        self.flags.filter_attribute_missing = false;
        self.view = VectorView::RuleEditor;
    }

    pub fn open_auto_interval(&mut self) {
        self.view = VectorView::AutoIntervalEditor;
    }

    pub fn open_auto_unique(&mut self) {
        self.view = VectorView::AutoUniqueEditor;
    }

    /// Back to the rule list, whatever the current view
    pub fn go_back(&mut self) {
        debug!("Leaving {:?} for rule list", self.view);
        self.view = VectorView::RuleList;
        self.filter_form = None;
        self.flags.filter_attribute_missing = false;
    }

    /// Write the filter form into the selected rule.
    ///
    /// Rows without an attribute raise the inline flag and are skipped.
    pub fn apply_filter(&mut self) -> bool {
        let form = match &self.filter_form {
            Some(form) => form.clone(),
            None => return false,
        };
        self.flags.filter_attribute_missing = form.attribute_missing();

        let rule = match self.rules.selected_mut() {
            Some(rule) => rule,
            None => return false,
        };
        if form.read_failed {
            let cql = form.to_cql();
            if cql.is_empty() {
                return false;
            }
            rule.filter = Some(cql);
            return true;
        }
        apply_rows_to_rule(rule, &form.rows)
    }

    pub fn apply_auto_interval(
        &mut self,
        params: &IntervalClassification,
        template: &Symbolizer,
    ) -> Result<usize, StyleError> {
        let rules = auto::interval_rules(params, template)?;
        Ok(self.append_generated(rules))
    }

    pub fn apply_auto_unique(
        &mut self,
        params: &UniqueValueClassification,
        template: &Symbolizer,
    ) -> Result<usize, StyleError> {
        let rules = auto::unique_value_rules(params, template)?;
        Ok(self.append_generated(rules))
    }

    fn append_generated(&mut self, rules: Vec<Rule>) -> usize {
        let count = rules.len();
        for rule in rules {
            self.rules.add(rule.with_max_scale(self.max_scale));
        }
        self.rules.clear_selection();
        self.go_back();
        count
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

impl StyleEditor for VectorEditor {
    fn rules(&self) -> &RuleList {
        &self.rules
    }

    fn rules_mut(&mut self) -> &mut RuleList {
        &mut self.rules
    }

    fn validate(&mut self) -> ValidationFlags {
        self.flags.style_name_missing = self.rules.style().name.trim().is_empty();
        if let Some(form) = &self.filter_form {
            self.flags.filter_attribute_missing = form.attribute_missing();
        }
        self.flags
    }
}
