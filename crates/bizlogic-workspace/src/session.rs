//! Editor orchestration: toolbox fragments and program text arrive
//! independently, the workspace is injected once both are available.
//!
//! A toolbox change never hot-swaps into a live workspace. The session
//! serializes the current program, tears the workspace down and injects a
//! new one with the newer toolbox.

use bizlogic_core::toolbox::{Fragment, ToolboxGeneration, ToolboxTracker};
use tracing::{debug, info};

use crate::error::WorkspaceError;
use crate::library::WorkspaceLibrary;
use crate::sync::{WorkspaceSynchronizer, EMPTY_PROGRAM};

/// What a session step did to the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Toolbox or program text is still missing.
    Waiting,
    Initialized(ToolboxGeneration),
    /// A newer toolbox replaced the live workspace; the program was preserved.
    Reinitialized(ToolboxGeneration),
    Unchanged,
}

pub struct EditorSession<L: WorkspaceLibrary> {
    tracker: ToolboxTracker,
    sync: WorkspaceSynchronizer<L>,
    // Outer None: the version has not been loaded yet.
    program: Option<Option<String>>,
}

impl<L: WorkspaceLibrary> EditorSession<L> {
    pub fn new(library: L, container: L::Container) -> Self {
        Self::with_tracker(ToolboxTracker::new(), library, container)
    }

    pub fn with_tracker(tracker: ToolboxTracker, library: L, container: L::Container) -> Self {
        EditorSession {
            tracker,
            sync: WorkspaceSynchronizer::new(library, container),
            program: None,
        }
    }

    pub fn tracker(&self) -> &ToolboxTracker {
        &self.tracker
    }

    pub fn synchronizer(&self) -> &WorkspaceSynchronizer<L> {
        &self.sync
    }

    /// Records a fragment document and reconciles the workspace.
    pub fn offer_fragment(
        &mut self,
        fragment: Fragment,
        document: impl Into<String>,
    ) -> Result<SessionEvent, WorkspaceError> {
        if self.tracker.update(fragment, document).is_none() {
            debug!(fragment = %fragment, missing = ?self.tracker.missing(), "toolbox not rebuilt");
        }
        self.reconcile()
    }

    /// Supplies the selected version's program text.
    ///
    /// Before injection the text is held until a toolbox exists; afterwards
    /// it replaces the workspace content in place.
    pub fn load_program(&mut self, text: Option<String>) -> Result<SessionEvent, WorkspaceError> {
        if self.sync.is_ready() {
            let text = text
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or(EMPTY_PROGRAM);
            self.sync.replace_program(text)?;
            return Ok(SessionEvent::Unchanged);
        }
        self.program = Some(text);
        self.reconcile()
    }

    pub fn program_text(&self) -> Result<String, WorkspaceError> {
        self.sync.program_text()
    }

    pub fn replace_program(&mut self, text: &str) -> Result<(), WorkspaceError> {
        self.sync.replace_program(text)
    }

    fn reconcile(&mut self) -> Result<SessionEvent, WorkspaceError> {
        let Some(toolbox) = self.tracker.latest().cloned() else {
            return Ok(SessionEvent::Waiting);
        };
        let Some(program) = self.program.clone() else {
            return Ok(SessionEvent::Waiting);
        };

        match self.sync.generation() {
            None => {
                self.sync.initialize(&toolbox, program.as_deref())?;
                Ok(SessionEvent::Initialized(toolbox.generation))
            }
            Some(current) if current < toolbox.generation => {
                let preserved = self.sync.teardown();
                info!(
                    from = %current,
                    to = %toolbox.generation,
                    "toolbox changed, reinjecting workspace"
                );
                self.program = Some(preserved.clone());
                self.sync.initialize(&toolbox, preserved.as_deref())?;
                Ok(SessionEvent::Reinitialized(toolbox.generation))
            }
            Some(_) => Ok(SessionEvent::Unchanged),
        }
    }
}
