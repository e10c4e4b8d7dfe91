//! Rule selection, ordering and deletion shared by both editors

use std::sync::Arc;

use tracing::{debug, info};

use super::Confirm;
use crate::errors::StyleError;
use crate::style::{Rule, Style};

pub struct RuleList {
    style: Style,
    selected: Option<String>,
    confirm: Arc<dyn Confirm>,
}

impl RuleList {
    pub fn new(style: Style, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            style,
            selected: None,
            confirm,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Append a rule and select it. Returns the (possibly uniquified) name.
    pub fn add(&mut self, rule: Rule) -> String {
        let index = self.style.push_rule(rule);
        let name = self.style.rules[index].name.clone();
        self.selected = Some(name.clone());
        name
    }

    /// Select the rule named `name`; unknown names clear the selection
    pub fn select(&mut self, name: &str) -> Result<(), StyleError> {
        if self.style.find_rule(name).is_none() {
            self.selected = None;
            return Err(StyleError::RuleNotFound(name.to_string()));
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .as_deref()
            .and_then(|name| self.style.index_of(name))
    }

    pub fn selected(&self) -> Option<&Rule> {
        self.selected_index().map(|i| &self.style.rules[i])
    }

    pub fn selected_mut(&mut self) -> Option<&mut Rule> {
        match self.selected_index() {
            Some(i) => Some(&mut self.style.rules[i]),
            None => None,
        }
    }

    /// Move the selected rule one place up. No-op at the top.
    pub fn move_up(&mut self) -> bool {
        match self.selected_index() {
            Some(index) => {
                let moved = self.style.move_up(index);
                if moved {
                    debug!("Moved rule {} up to {}", self.style.rules[index - 1].name, index - 1);
                }
                moved
            }
            None => false,
        }
    }

    /// Move the selected rule one place down. No-op at the bottom.
    pub fn move_down(&mut self) -> bool {
        match self.selected_index() {
            Some(index) => {
                let moved = self.style.move_down(index);
                if moved {
                    debug!("Moved rule {} down to {}", self.style.rules[index + 1].name, index + 1);
                }
                moved
            }
            None => false,
        }
    }

    /// Remove the selected rule after confirmation
    pub fn delete_selected(&mut self) -> bool {
        let index = match self.selected_index() {
            Some(index) => index,
            None => return false,
        };
        let message = format!("Delete rule '{}'?", self.style.rules[index].name);
        if !self.confirm.confirm(&message) {
            debug!("Deletion of rule {} declined", self.style.rules[index].name);
            return false;
        }
        if let Some(rule) = self.style.remove_rule(index) {
            info!("Deleted rule {}", rule.name);
        }
        self.selected = None;
        true
    }

    /// Remove every rule after confirmation
    pub fn delete_all(&mut self) -> bool {
        if self.style.rules.is_empty() {
            return false;
        }
        if !self.confirm.confirm("Delete all rules?") {
            debug!("Deletion of all rules declined");
            return false;
        }
        info!("Deleted {} rules from style {}", self.style.rules.len(), self.style.name);
        self.style.rules.clear();
        self.selected = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(confirm: bool) -> RuleList {
        let mut style = Style::new("s");
        for name in ["a", "b", "c"] {
            style.push_rule(Rule {
                name: name.to_string(),
                ..Default::default()
            });
        }
        RuleList::new(style, Arc::new(move |_: &str| confirm))
    }

    #[test]
    fn selection_follows_moved_rule() {
        let mut rules = list(true);
        rules.select("b").unwrap();
        assert!(rules.move_up());
        assert_eq!(rules.selected_index(), Some(0));
        assert!(!rules.move_up());
        assert_eq!(rules.style().rule_names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn moves_without_selection_do_nothing() {
        let mut rules = list(true);
        assert!(!rules.move_down());
        assert_eq!(
            rules.select("missing"),
            Err(StyleError::RuleNotFound("missing".to_string()))
        );
        assert!(!rules.move_up());
    }

    #[test]
    fn declined_deletion_leaves_rules_intact() {
        let mut rules = list(false);
        let before = rules.style().clone();
        rules.select("a").unwrap();
        assert!(!rules.delete_selected());
        assert!(!rules.delete_all());
        assert_eq!(rules.style(), &before);
        assert_eq!(rules.selected_name(), Some("a"));
    }

    #[test]
    fn confirmed_deletion_clears_selection() {
        let mut rules = list(true);
        rules.select("c").unwrap();
        assert!(rules.delete_selected());
        assert_eq!(rules.style().rule_names(), vec!["a", "b"]);
        assert!(rules.selected().is_none());
        assert!(rules.delete_all());
        assert!(rules.style().rules.is_empty());
    }
}
