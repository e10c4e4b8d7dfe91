//! An editing session: one editor, one style, one backend
//!
//! Saving sends the whole style; the server's copy is authoritative and
//! its rules replace the local ones, unless a newer save already landed.
//! Every applied change queues a debounced repaint when a map view is
//! attached.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::{Backend, RequestSequencer};
use crate::editor::{Notifier, RasterEditor, StyleEditor, ValidationFlags};
use crate::errors::BackendError;
use crate::repaint::RepaintScheduler;
use crate::style::{ColorMap, Style};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Validation flags blocked the request
    Invalid(ValidationFlags),
    /// Server rules replaced the local ones
    Applied,
    /// A newer response had already been applied
    Stale,
    /// The backend rejected the request; local state is unchanged
    Failed,
}

/// A save that has been validated and tagged but not yet answered
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub tag: u64,
    pub create: bool,
    pub style: Style,
}

pub struct EditSession<E: StyleEditor> {
    editor: E,
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    sequencer: RequestSequencer,
    persisted: bool,
    repaint: Option<RepaintScheduler>,
    last_repaint: Option<JoinHandle<bool>>,
}

impl<E: StyleEditor> EditSession<E> {
    pub fn new(editor: E, backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            editor,
            backend,
            notifier,
            sequencer: RequestSequencer::new(),
            persisted: false,
            repaint: None,
            last_repaint: None,
        }
    }

    /// Repaint the map through `scheduler` after each applied change
    pub fn with_repaint(mut self, scheduler: RepaintScheduler) -> Self {
        self.repaint = Some(scheduler);
        self
    }

    /// Mark the style as already known to the server, so saves update it
    pub fn persisted(mut self, persisted: bool) -> Self {
        self.persisted = persisted;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn style(&self) -> &Style {
        self.editor.style()
    }

    /// Queue a repaint of the current style. Without a scheduler this does
    /// nothing.
    pub fn request_repaint(&mut self) {
        if let Some(scheduler) = &self.repaint {
            self.last_repaint = Some(scheduler.schedule(self.editor.style().clone()));
        }
    }

    /// Take the handle of the most recently queued repaint
    pub fn take_repaint(&mut self) -> Option<JoinHandle<bool>> {
        self.last_repaint.take()
    }

    /// Validate and tag a save. A missing style name blocks it.
    pub fn begin_save(&mut self) -> Result<PendingSave, ValidationFlags> {
        let flags = self.editor.validate();
        if flags.style_name_missing {
            debug!("Save blocked: style name missing");
            return Err(flags);
        }
        Ok(PendingSave {
            tag: self.sequencer.next(),
            create: !self.persisted,
            style: self.editor.style().clone(),
        })
    }

    pub async fn send(&self, pending: &PendingSave) -> Result<Style, BackendError> {
        if pending.create {
            self.backend.create_style(&pending.style).await
        } else {
            self.backend.update_style(&pending.style).await
        }
    }

    /// Apply the answer to `pending`
    pub fn finish_save(
        &mut self,
        pending: &PendingSave,
        result: Result<Style, BackendError>,
    ) -> SaveOutcome {
        match result {
            Ok(saved) => {
                if !self.sequencer.accept(pending.tag) {
                    return SaveOutcome::Stale;
                }
                self.persisted = true;
                self.editor.style_mut().replace_rules(saved.rules);
                self.request_repaint();
                info!("Saved style {}", pending.style.name);
                self.notifier
                    .success(&format!("Style '{}' saved", pending.style.name));
                SaveOutcome::Applied
            }
            Err(err) => {
                self.notifier.error(&format!(
                    "Failed to save style '{}': {}",
                    pending.style.name, err
                ));
                SaveOutcome::Failed
            }
        }
    }

    pub async fn save(&mut self) -> SaveOutcome {
        let pending = match self.begin_save() {
            Ok(pending) => pending,
            Err(flags) => return SaveOutcome::Invalid(flags),
        };
        let result = self.send(&pending).await;
        self.finish_save(&pending, result)
    }
}

impl EditSession<RasterEditor> {
    /// Spread a palette over the value range of a data histogram and assign
    /// it to the selected rule. Returns the number of breakpoints written,
    /// or `None` when the histogram or palette could not be applied.
    pub async fn fill_palette_from_histogram(
        &mut self,
        data_id: &str,
        index: u32,
        inverse: bool,
    ) -> Option<usize> {
        let histogram = match self.backend.get_histogram(data_id).await {
            Ok(histogram) => histogram,
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to load histogram of {}: {}", data_id, err));
                return None;
            }
        };

        match self
            .editor
            .apply_palette_to_selected(index, histogram.min, histogram.max, inverse)
        {
            Ok(count) => {
                if count > 0 {
                    self.request_repaint();
                }
                Some(count)
            }
            Err(err) => {
                self.notifier.error(&err.to_string());
                None
            }
        }
    }

    /// Replace the selected rule's breakpoints with the server's computation
    pub async fn load_server_palette(&mut self, interval: u32) -> Option<usize> {
        let style_name = self.editor.style().name.clone();
        let rule_name = self.editor.rules().selected_name()?.to_string();

        let mut points = match self
            .backend
            .get_palette(&style_name, &rule_name, interval)
            .await
        {
            Ok(points) => points,
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to load palette of {}: {}", rule_name, err));
                return None;
            }
        };
        points.sort_by(|a, b| a.data.total_cmp(&b.data));

        let rule = self.editor.rules_mut().selected_mut()?;
        let raster = rule.raster_mut()?;
        let count = points.len();
        raster
            .color_map
            .get_or_insert_with(ColorMap::default)
            .set_points(points);
        debug!("Loaded {} server palette points for {}", count, rule_name);
        self.request_repaint();
        Some(count)
    }
}
