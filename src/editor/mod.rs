//! Editing state machines for vector and raster styles
//!
//! Editors own the [`Style`] being edited and talk to the outside world
//! only through injected collaborators ([`Confirm`], [`Notifier`]).

pub mod raster;
pub mod rules;
pub mod vector;

pub use raster::{classify, RasterEditor, RasterMode, RasterView};
pub use rules::RuleList;
pub use vector::{VectorEditor, VectorView};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::style::Style;

/// Modal confirmation, answered synchronously by the user
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// Non-blocking user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

/// Reports notifications through the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Success => info!("{}", message),
            NotificationLevel::Warning => warn!("{}", message),
            NotificationLevel::Error => error!("{}", message),
        }
    }
}

/// Inline validation flags shown next to the offending inputs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFlags {
    pub style_name_missing: bool,
    pub filter_attribute_missing: bool,
}

impl ValidationFlags {
    pub fn is_valid(&self) -> bool {
        !self.style_name_missing && !self.filter_attribute_missing
    }
}

/// Common access to the style held by an editor
pub trait StyleEditor {
    fn rules(&self) -> &RuleList;

    fn rules_mut(&mut self) -> &mut RuleList;

    fn style(&self) -> &Style {
        self.rules().style()
    }

    fn style_mut(&mut self) -> &mut Style {
        self.rules_mut().style_mut()
    }

    fn validate(&mut self) -> ValidationFlags;
}
