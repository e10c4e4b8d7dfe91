//! In-memory style tree edited by the console
//!
//! ```text
//! Style
//!   ├── name: String
//!   └── rules: Vec<Rule>          (order matters: first match wins)
//!       ├── name, title, description
//!       ├── maxScale, minScale?
//!       ├── filter: Option<String> (CQL)
//!       └── symbolizers: Vec<Symbolizer>
//! ```

pub mod color_map;
pub mod symbolizer;

pub use color_map::{ColorFunction, ColorMap, ColorPoint, FunctionKind};
pub use symbolizer::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Max scale given to freshly created rules
pub const DEFAULT_MAX_SCALE: f64 = 5_000_000_000.0;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    pub name: String,
    pub title: String,
    pub description: String,
    pub max_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_scale: Option<f64>,
    pub symbolizers: Vec<Symbolizer>,
    pub filter: Option<String>,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            description: String::new(),
            max_scale: DEFAULT_MAX_SCALE,
            min_scale: None,
            symbolizers: Vec::new(),
            filter: None,
        }
    }
}

impl Rule {
    /// Create an empty rule named `<prefix>-<unix millis>`
    pub fn new(prefix: &str) -> Self {
        Self {
            name: format!("{}-{}", prefix, chrono::Utc::now().timestamp_millis()),
            ..Default::default()
        }
    }

    pub fn with_symbolizer(mut self, symbolizer: Symbolizer) -> Self {
        self.symbolizers.push(symbolizer);
        self
    }

    pub fn with_max_scale(mut self, max_scale: f64) -> Self {
        self.max_scale = max_scale;
        self
    }

    /// First raster symbolizer of the rule, if any
    pub fn raster_mut(&mut self) -> Option<&mut RasterSymbolizer> {
        self.symbolizers.iter_mut().find_map(|s| match s {
            Symbolizer::Raster(raster) => Some(raster),
            _ => None,
        })
    }
}

impl Style {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn find_rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    /// Append a rule, renaming it if its name is already taken.
    /// Returns the index of the new rule.
    pub fn push_rule(&mut self, mut rule: Rule) -> usize {
        let base_name = rule.name.clone();
        let mut counter = 0;
        while self.rules.iter().any(|r| r.name == rule.name) {
            counter += 1;
            rule.name = format!("{}_{}", base_name, counter);
        }
        debug!("Adding rule {} to style {}", rule.name, self.name);
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Swap the rule at `index` with its predecessor. No-op at the top.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.rules.len() {
            return false;
        }
        shift_element(&mut self.rules, index, index - 1)
    }

    /// Swap the rule at `index` with its successor. No-op at the bottom.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.rules.len() {
            return false;
        }
        shift_element(&mut self.rules, index, index + 1)
    }

    pub fn remove_rule(&mut self, index: usize) -> Option<Rule> {
        if index < self.rules.len() {
            Some(self.rules.remove(index))
        } else {
            None
        }
    }

    /// Replace the local rules with the authoritative list from the server
    pub fn replace_rules(&mut self, rules: Vec<Rule>) {
        debug!(
            "Replacing {} local rules of style {} with {} rules",
            self.rules.len(),
            self.name,
            rules.len()
        );
        self.rules = rules;
    }
}

/// Move the element at `from` to position `to`, shifting the elements in
/// between by one. Returns false when either index is out of bounds or
/// both are equal.
pub fn shift_element<T>(items: &mut [T], from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    true
}
