//! In-process workspace backend built on [`XmlElement`].
//!
//! Used by the CLI to validate and normalize program text and by tests to
//! observe how often a workspace is injected.

use tracing::debug;

use crate::dom::XmlElement;
use crate::error::WorkspaceError;
use crate::library::{InjectOptions, WorkspaceLibrary};

/// Namespace of serialized program documents.
pub const PROGRAM_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Root element name of program and toolbox documents.
const ROOT: &str = "xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryWorkspace {
    container: String,
    toolbox: XmlElement,
    options: InjectOptions,
    blocks: Vec<XmlElement>,
}

impl MemoryWorkspace {
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn toolbox(&self) -> &XmlElement {
        &self.toolbox
    }

    pub fn options(&self) -> &InjectOptions {
        &self.options
    }

    /// Top-level blocks in load order.
    pub fn blocks(&self) -> &[XmlElement] {
        &self.blocks
    }
}

#[derive(Debug, Default)]
pub struct XmlWorkspaceLibrary {
    injections: usize,
    disposals: usize,
}

impl XmlWorkspaceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful injections so far.
    pub fn injection_count(&self) -> usize {
        self.injections
    }

    pub fn disposal_count(&self) -> usize {
        self.disposals
    }
}

fn parse_root(text: &str, what: &str) -> Result<XmlElement, WorkspaceError> {
    let element = XmlElement::parse(text)?;
    if element.name != ROOT {
        return Err(WorkspaceError::Serialization {
            reason: format!("{} root must be <{}>, found <{}>", what, ROOT, element.name),
        });
    }
    Ok(element)
}

impl WorkspaceLibrary for XmlWorkspaceLibrary {
    type Container = String;
    type Workspace = MemoryWorkspace;
    type Dom = XmlElement;

    fn inject(
        &mut self,
        container: &String,
        options: &InjectOptions,
    ) -> Result<MemoryWorkspace, WorkspaceError> {
        let toolbox = parse_root(&options.toolbox, "toolbox")?;
        self.injections += 1;
        debug!(container = %container, injections = self.injections, "workspace injected");
        Ok(MemoryWorkspace {
            container: container.clone(),
            toolbox,
            options: options.clone(),
            blocks: Vec::new(),
        })
    }

    fn text_to_dom(&self, text: &str) -> Result<XmlElement, WorkspaceError> {
        parse_root(text, "program")
    }

    fn dom_to_workspace(
        &mut self,
        dom: &XmlElement,
        workspace: &mut MemoryWorkspace,
    ) -> Result<(), WorkspaceError> {
        if dom.name != ROOT {
            return Err(WorkspaceError::Library {
                reason: format!("cannot load <{}> into a workspace", dom.name),
            });
        }
        workspace.blocks.extend(dom.elements().cloned());
        Ok(())
    }

    fn workspace_to_dom(&self, workspace: &MemoryWorkspace) -> XmlElement {
        workspace
            .blocks
            .iter()
            .cloned()
            .fold(XmlElement::new(ROOT), XmlElement::with_child)
    }

    fn dom_to_text(&self, dom: &XmlElement) -> String {
        dom.to_document(PROGRAM_NAMESPACE)
    }

    fn clear(&mut self, workspace: &mut MemoryWorkspace) {
        workspace.blocks.clear();
    }

    fn dispose(&mut self, workspace: MemoryWorkspace) {
        self.disposals += 1;
        debug!(container = %workspace.container, "workspace disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = concat!(
        r#"<xml><block type="controls_if"><value name="IF0">"#,
        r#"<block type="logic_boolean"><field name="BOOL">TRUE</field></block>"#,
        r#"</value></block>"#,
        r#"<block type="math_number"><field name="NUM">3</field></block></xml>"#,
    );

    fn injected(library: &mut XmlWorkspaceLibrary) -> MemoryWorkspace {
        library
            .inject(
                &"editor".to_string(),
                &InjectOptions::new("<xml><category name=\"Logic\"></category></xml>"),
            )
            .unwrap()
    }

    #[test]
    fn load_then_serialize_preserves_blocks() {
        let mut library = XmlWorkspaceLibrary::new();
        let mut workspace = injected(&mut library);
        let dom = library.text_to_dom(PROGRAM).unwrap();
        library.dom_to_workspace(&dom, &mut workspace).unwrap();
        assert_eq!(workspace.blocks().len(), 2);

        let text = library.dom_to_text(&library.workspace_to_dom(&workspace));
        assert!(text.starts_with(r#"<xml xmlns="http://www.w3.org/1999/xhtml">"#));
        assert_eq!(XmlElement::parse(&text).unwrap(), dom);
    }

    #[test]
    fn dom_to_workspace_appends() {
        let mut library = XmlWorkspaceLibrary::new();
        let mut workspace = injected(&mut library);
        let dom = library.text_to_dom(PROGRAM).unwrap();
        library.dom_to_workspace(&dom, &mut workspace).unwrap();
        library.dom_to_workspace(&dom, &mut workspace).unwrap();
        assert_eq!(workspace.blocks().len(), 4);
        library.clear(&mut workspace);
        assert!(workspace.blocks().is_empty());
    }

    #[test]
    fn non_program_root_is_rejected() {
        let library = XmlWorkspaceLibrary::new();
        let err = library.text_to_dom("<block type=\"x\"></block>").unwrap_err();
        assert!(matches!(err, WorkspaceError::Serialization { .. }));
    }

    #[test]
    fn malformed_toolbox_is_not_injected() {
        let mut library = XmlWorkspaceLibrary::new();
        let err = library
            .inject(&"editor".to_string(), &InjectOptions::new("<xml><category></xml>"))
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Serialization { .. }));
        assert_eq!(library.injection_count(), 0);
    }
}
