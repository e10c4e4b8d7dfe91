//! Debounced map/chart repaint after style mutations

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::config::EditorConfig;
use crate::style::Style;

/// Map or chart widget that renders a style
pub trait MapView: Send + Sync {
    fn repaint(&self, style: &Style);
}

/// Runs one repaint per burst of edits, a fixed delay after the last one
pub struct RepaintScheduler {
    delay: Duration,
    generation: Arc<AtomicU64>,
    view: Arc<dyn MapView>,
}

impl RepaintScheduler {
    pub fn new(delay: Duration, view: Arc<dyn MapView>) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            view,
        }
    }

    pub fn from_config(config: &EditorConfig, view: Arc<dyn MapView>) -> Self {
        Self::new(Duration::from_millis(config.repaint_delay_ms), view)
    }

    /// Queue a repaint of `style`, superseding any repaint still pending.
    /// The task resolves to whether it actually repainted.
    pub fn schedule(&self, style: Style) -> JoinHandle<bool> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let view = Arc::clone(&self.view);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                trace!("Repaint {} superseded", generation);
                return false;
            }
            view.repaint(&style);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingView {
        painted: Mutex<Vec<String>>,
    }

    impl MapView for RecordingView {
        fn repaint(&self, style: &Style) {
            self.painted.lock().unwrap().push(style.name.clone());
        }
    }

    #[tokio::test]
    async fn bursts_collapse_into_last_repaint() {
        let view = Arc::new(RecordingView::default());
        let scheduler = RepaintScheduler::new(Duration::from_millis(20), view.clone());

        let first = scheduler.schedule(Style::new("one"));
        let second = scheduler.schedule(Style::new("two"));
        let third = scheduler.schedule(Style::new("three"));

        assert!(!first.await.unwrap());
        assert!(!second.await.unwrap());
        assert!(third.await.unwrap());
        assert_eq!(*view.painted.lock().unwrap(), vec!["three".to_string()]);
    }

    #[tokio::test]
    async fn spaced_edits_each_repaint() {
        let view = Arc::new(RecordingView::default());
        let scheduler = RepaintScheduler::new(Duration::from_millis(5), view.clone());

        assert!(scheduler.schedule(Style::new("a")).await.unwrap());
        assert!(scheduler.schedule(Style::new("b")).await.unwrap());
        assert_eq!(view.painted.lock().unwrap().len(), 2);
    }
}
