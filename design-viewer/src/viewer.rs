//! The viewer host.
//!
//! Owns the loaded document, the mounted component instances and their
//! timers. Timer firings come back through one channel and are delivered
//! only to the mount that scheduled them.

use std::collections::HashMap;
use std::time::Duration;

use design_core::{
    load, Document, DocumentKey, DocumentSource, InstanceTable, Lifecycle, LoadState, ObjectId,
    Trigger,
};
use design_renderer::{Action, BackendType, Composition, Renderer, Viewport};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::timers::{TimerEvent, TimerSet};
use crate::{Mode, ScriptStep, ViewerConfig, ViewerError, ViewerResult};

/// Interactive document host.
pub struct Viewer {
    mode: Mode,
    viewport: Viewport,
    renderer: Renderer,
    key: Option<DocumentKey>,
    state: LoadState,
    instances: InstanceTable,
    timers: HashMap<ObjectId, TimerSet>,
    tx: mpsc::UnboundedSender<TimerEvent>,
    rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl Viewer {
    /// Create a viewer with nothing loaded.
    #[must_use]
    pub fn new(config: &ViewerConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            mode: config.mode,
            viewport: config.viewport,
            renderer: Renderer::new(config.renderer_config()),
            key: None,
            state: LoadState::Loading,
            instances: InstanceTable::new(),
            timers: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Host mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Backend frames are composed with.
    #[must_use]
    pub fn backend(&self) -> BackendType {
        self.renderer.active_backend()
    }

    /// Current lookup state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The loaded document, once ready.
    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.state.record().map(|record| &record.doc)
    }

    /// Mounted component instances.
    #[must_use]
    pub fn instances(&self) -> &InstanceTable {
        &self.instances
    }

    /// Timers waiting to fire across all instances.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.values().map(TimerSet::pending).sum()
    }

    /// Resize the viewport. Component state is unaffected.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Look a document up and mount its components.
    ///
    /// Anything previously open is unmounted first.
    pub async fn open(&mut self, source: &dyn DocumentSource, key: DocumentKey) -> &LoadState {
        self.unmount_all();
        self.state = LoadState::Loading;
        self.state = load(source, &key).await;
        self.key = Some(key);
        self.sync();
        &self.state
    }

    /// Re-read the open document and apply it as an edit.
    ///
    /// # Errors
    ///
    /// Fails in runtime mode, before a document is open, or when the lookup
    /// fails. The current document stays in place on failure.
    pub async fn reload(&mut self, source: &dyn DocumentSource) -> ViewerResult<()> {
        if self.mode == Mode::Runtime {
            return Err(ViewerError::ReadOnly);
        }
        let key = self.key.clone().ok_or(ViewerError::NotLoaded)?;
        let record = source.fetch(&key).await?;
        self.replace_document(record.doc)
    }

    /// Replace the document in preview mode.
    ///
    /// Instances whose kind and structure are unchanged keep their state;
    /// others are remounted and removed components are unmounted.
    ///
    /// # Errors
    ///
    /// Fails in runtime mode or when no document is open.
    pub fn replace_document(&mut self, document: Document) -> ViewerResult<()> {
        if self.mode == Mode::Runtime {
            return Err(ViewerError::ReadOnly);
        }
        let LoadState::Ready(record) = &mut self.state else {
            return Err(ViewerError::NotLoaded);
        };
        record.doc = document;
        tracing::info!("Document {} replaced", record.id);
        self.sync();
        Ok(())
    }

    fn sync(&mut self) {
        let changes = match &self.state {
            LoadState::Ready(record) => self.instances.sync(&record.doc),
            _ => return,
        };
        self.apply_lifecycle(changes);
    }

    fn apply_lifecycle(&mut self, changes: Vec<Lifecycle>) {
        for change in changes {
            match change {
                Lifecycle::Mounted {
                    object_id,
                    instance,
                    effects,
                } => {
                    let mut timers = TimerSet::new(object_id.clone(), instance, self.tx.clone());
                    timers.apply(&effects);
                    self.timers.insert(object_id, timers);
                }
                Lifecycle::Unmounted {
                    object_id,
                    instance,
                } => {
                    if self
                        .timers
                        .get(&object_id)
                        .is_some_and(|timers| timers.instance() == instance)
                    {
                        self.timers.remove(&object_id);
                    }
                }
                Lifecycle::Reconfigured {
                    object_id, effects, ..
                } => {
                    if let Some(timers) = self.timers.get_mut(&object_id) {
                        timers.apply(&effects);
                    }
                }
            }
        }
    }

    /// Deliver a trigger to a component. Returns whether it was mounted.
    pub fn dispatch(&mut self, object: &ObjectId, trigger: &Trigger) -> bool {
        let Some((_, effects)) = self.instances.dispatch(object, trigger) else {
            tracing::debug!("No instance for {object}, ignoring {trigger:?}");
            return false;
        };
        if let Some(timers) = self.timers.get_mut(object) {
            timers.apply(&effects);
        }
        true
    }

    /// Deliver an action taken from a composed visual tree.
    pub fn handle_action(&mut self, action: &Action) -> bool {
        self.dispatch(&action.object, &action.trigger)
    }

    /// Deliver a timer firing. Firings from previous mounts are dropped.
    pub fn handle_timer(&mut self, event: &TimerEvent) -> bool {
        let trigger = Trigger::Timer(event.key);
        let Some(effects) = self
            .instances
            .dispatch_to(&event.object, event.instance, &trigger)
        else {
            return false;
        };
        if let Some(timers) = self.timers.get_mut(&event.object) {
            timers.apply(&effects);
        }
        true
    }

    /// Wait for the next timer firing.
    pub async fn next_timer(&mut self) -> Option<TimerEvent> {
        self.rx.recv().await
    }

    /// Let timers run for `duration`, delivering every firing in between.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let event = tokio::select! {
                biased;
                event = self.rx.recv() => event,
                () = tokio::time::sleep_until(deadline) => None,
            };
            match event {
                Some(event) => {
                    self.handle_timer(&event);
                }
                None => break,
            }
        }
    }

    /// Run one scripted step.
    ///
    /// # Errors
    ///
    /// Fails when a reload fails.
    pub async fn run_step(
        &mut self,
        source: &dyn DocumentSource,
        step: &ScriptStep,
    ) -> ViewerResult<()> {
        tracing::debug!("Step: {step}");
        match step {
            ScriptStep::Tap { object, trigger } => {
                self.dispatch(object, trigger);
            }
            ScriptStep::Wait(duration) => self.run_for(*duration).await,
            ScriptStep::Reload => self.reload(source).await?,
        }
        Ok(())
    }

    /// Compose the current frame.
    ///
    /// # Errors
    ///
    /// Fails when no document is open or the viewport is unusable.
    pub fn compose(&mut self) -> ViewerResult<Composition> {
        let LoadState::Ready(record) = &self.state else {
            return Err(ViewerError::NotLoaded);
        };
        let composition = self
            .renderer
            .render(&record.doc, self.viewport, &self.instances)?;
        tracing::trace!(
            "Frame {} of {}: {} rendered, {} skipped",
            self.renderer.frame_count(),
            record.id,
            composition.rendered.len(),
            composition.skipped.len()
        );
        Ok(composition)
    }

    /// Frames composed since the viewer was created.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.renderer.frame_count()
    }

    fn unmount_all(&mut self) {
        let changes = self.instances.clear();
        self.apply_lifecycle(changes);
        self.timers.clear();
    }

    /// Unmount every component and cancel every timer.
    pub fn close(&mut self) {
        self.unmount_all();
        tracing::info!("Viewer closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::{Canvas, DocumentRecord, MemorySource};

    async fn viewer(mode: Mode) -> Viewer {
        let source = MemorySource::new();
        source
            .insert(DocumentRecord {
                id: "blank".into(),
                title: String::new(),
                doc: Document::new(Canvas::new(375.0, 667.0)),
                thumbnail: None,
                owner: None,
            })
            .expect("insert");
        let mut viewer = Viewer::new(&ViewerConfig {
            mode,
            ..ViewerConfig::default()
        });
        viewer.open(&source, DocumentKey::Id("blank".into())).await;
        viewer
    }

    #[tokio::test]
    async fn test_runtime_document_is_read_only() {
        let mut runtime = viewer(Mode::Runtime).await;
        let replaced = runtime.replace_document(Document::new(Canvas::new(10.0, 10.0)));
        assert!(matches!(replaced, Err(ViewerError::ReadOnly)));

        let mut preview = viewer(Mode::Preview).await;
        preview
            .replace_document(Document::new(Canvas::new(10.0, 10.0)))
            .expect("preview accepts edits");
        assert!(preview
            .document()
            .is_some_and(|doc| (doc.canvas.width - 10.0).abs() < f32::EPSILON));
    }

    #[tokio::test]
    async fn test_compose_counts_frames() {
        let mut viewer = viewer(Mode::Runtime).await;
        viewer.compose().expect("first frame");
        viewer.compose().expect("second frame");
        assert_eq!(viewer.frame_count(), 2);
    }

    #[tokio::test]
    async fn test_compose_requires_a_document() {
        let mut viewer = Viewer::new(&ViewerConfig::default());
        assert!(matches!(viewer.compose(), Err(ViewerError::NotLoaded)));
        assert_eq!(viewer.frame_count(), 0);
        assert!(!viewer.dispatch(&ObjectId::new("card"), &Trigger::Tap));
    }
}
