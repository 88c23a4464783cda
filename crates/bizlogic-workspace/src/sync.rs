//! Inject-once workspace state machine.
//!
//! A workspace is injected exactly once per toolbox generation. After
//! that, program text only flows through [`WorkspaceSynchronizer::replace_program`]
//! (clear then load) and [`WorkspaceSynchronizer::program_text`] (read),
//! neither of which injects again.

use bizlogic_core::{CompositeToolbox, ToolboxGeneration};
use tracing::{debug, info, warn};

use crate::error::WorkspaceError;
use crate::library::{InjectOptions, WorkspaceLibrary};

/// Program loaded when a version carries no program text.
pub const EMPTY_PROGRAM: &str = r#"<xml xmlns="http://www.w3.org/1999/xhtml"></xml>"#;

enum SyncState<W> {
    Uninitialized,
    Ready {
        workspace: W,
        generation: ToolboxGeneration,
    },
}

pub struct WorkspaceSynchronizer<L: WorkspaceLibrary> {
    library: L,
    container: L::Container,
    state: SyncState<L::Workspace>,
}

impl<L: WorkspaceLibrary> WorkspaceSynchronizer<L> {
    pub fn new(library: L, container: L::Container) -> Self {
        WorkspaceSynchronizer {
            library,
            container,
            state: SyncState::Uninitialized,
        }
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SyncState::Ready { .. })
    }

    /// Generation of the toolbox the live workspace was injected with.
    pub fn generation(&self) -> Option<ToolboxGeneration> {
        match &self.state {
            SyncState::Ready { generation, .. } => Some(*generation),
            SyncState::Uninitialized => None,
        }
    }

    pub fn workspace(&self) -> Option<&L::Workspace> {
        match &self.state {
            SyncState::Ready { workspace, .. } => Some(workspace),
            SyncState::Uninitialized => None,
        }
    }

    /// Injects a workspace with `toolbox` and loads `program_text`.
    ///
    /// Absent or blank text loads [`EMPTY_PROGRAM`]. The text is parsed
    /// before injecting, so a malformed program leaves the synchronizer
    /// uninitialized.
    pub fn initialize(
        &mut self,
        toolbox: &CompositeToolbox,
        program_text: Option<&str>,
    ) -> Result<(), WorkspaceError> {
        if self.is_ready() {
            return Err(WorkspaceError::AlreadyInitialized);
        }
        let text = program_text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(EMPTY_PROGRAM);
        let dom = self.library.text_to_dom(text)?;

        let options = InjectOptions::new(toolbox.document.clone());
        let mut workspace = self.library.inject(&self.container, &options)?;
        if let Err(err) = self.library.dom_to_workspace(&dom, &mut workspace) {
            self.library.dispose(workspace);
            return Err(err);
        }

        info!(generation = %toolbox.generation, "workspace initialized");
        self.state = SyncState::Ready {
            workspace,
            generation: toolbox.generation,
        };
        Ok(())
    }

    /// Serializes the current workspace content.
    pub fn program_text(&self) -> Result<String, WorkspaceError> {
        match &self.state {
            SyncState::Ready { workspace, .. } => {
                let dom = self.library.workspace_to_dom(workspace);
                Ok(self.library.dom_to_text(&dom))
            }
            SyncState::Uninitialized => Err(WorkspaceError::NotReady),
        }
    }

    /// Replaces the workspace content with `text` without re-injecting.
    ///
    /// On error the previous content is kept.
    pub fn replace_program(&mut self, text: &str) -> Result<(), WorkspaceError> {
        let SyncState::Ready { workspace, .. } = &mut self.state else {
            return Err(WorkspaceError::NotReady);
        };
        let dom = self.library.text_to_dom(text)?;
        let snapshot = self.library.workspace_to_dom(workspace);

        self.library.clear(workspace);
        if let Err(err) = self.library.dom_to_workspace(&dom, workspace) {
            warn!(error = %err, "program load failed, restoring previous content");
            self.library.clear(workspace);
            self.library.dom_to_workspace(&snapshot, workspace)?;
            return Err(err);
        }
        debug!("workspace program replaced");
        Ok(())
    }

    /// Disposes the live workspace and returns its last program text.
    pub fn teardown(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, SyncState::Uninitialized) {
            SyncState::Ready {
                workspace,
                generation,
            } => {
                let text = self
                    .library
                    .dom_to_text(&self.library.workspace_to_dom(&workspace));
                self.library.dispose(workspace);
                info!(generation = %generation, "workspace torn down");
                Some(text)
            }
            SyncState::Uninitialized => None,
        }
    }
}
