//! Seam between the synchronizer and the visual-workspace library.

use crate::error::WorkspaceError;

/// Options passed to [`WorkspaceLibrary::inject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectOptions {
    /// Composite toolbox document.
    pub toolbox: String,
    pub trashcan: bool,
    pub sounds: bool,
    /// Location of the library's media assets.
    pub media: String,
}

impl InjectOptions {
    pub fn new(toolbox: impl Into<String>) -> Self {
        InjectOptions {
            toolbox: toolbox.into(),
            trashcan: true,
            sounds: false,
            media: "./blockly/".to_string(),
        }
    }
}

/// Primitives of the external visual-workspace library.
///
/// A workspace is created by [`inject`](WorkspaceLibrary::inject), which is
/// expensive and bound to one toolbox. Everything else operates on an
/// existing workspace or on detached DOM values.
pub trait WorkspaceLibrary {
    /// Host element the workspace is rendered into.
    type Container;
    /// Live workspace handle.
    type Workspace;
    /// Parsed program document.
    type Dom;

    fn inject(
        &mut self,
        container: &Self::Container,
        options: &InjectOptions,
    ) -> Result<Self::Workspace, WorkspaceError>;

    fn text_to_dom(&self, text: &str) -> Result<Self::Dom, WorkspaceError>;

    /// Appends the blocks described by `dom` to `workspace`.
    fn dom_to_workspace(
        &mut self,
        dom: &Self::Dom,
        workspace: &mut Self::Workspace,
    ) -> Result<(), WorkspaceError>;

    fn workspace_to_dom(&self, workspace: &Self::Workspace) -> Self::Dom;

    fn dom_to_text(&self, dom: &Self::Dom) -> String;

    /// Removes every block from `workspace`.
    fn clear(&mut self, workspace: &mut Self::Workspace);

    /// Releases a workspace. The default drops the handle.
    fn dispose(&mut self, workspace: Self::Workspace) {
        drop(workspace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_options_defaults() {
        let options = InjectOptions::new("<xml></xml>");
        assert_eq!(options.toolbox, "<xml></xml>");
        assert!(options.trashcan);
        assert!(!options.sounds);
        assert_eq!(options.media, "./blockly/");
    }
}
