//! Workspace synchronization for the visual program editor.
//!
//! The external visual-workspace library is reached only through the
//! [`WorkspaceLibrary`] trait. [`WorkspaceSynchronizer`] owns the workspace
//! handle and enforces the inject-once / reload contract;
//! [`EditorSession`] drives it from toolbox fragments and the version's
//! program text as they arrive.
//!
//! # Modules
//!
//! - [`error`]: WorkspaceError
//! - [`dom`]: owned XML element tree with structural equality
//! - [`library`]: the WorkspaceLibrary trait and injection options
//! - [`memory`]: XmlWorkspaceLibrary, an in-process library backend
//! - [`sync`]: WorkspaceSynchronizer state machine
//! - [`session`]: EditorSession orchestration

pub mod dom;
pub mod error;
pub mod library;
pub mod memory;
pub mod session;
pub mod sync;

pub use dom::{XmlElement, XmlNode};
pub use error::WorkspaceError;
pub use library::{InjectOptions, WorkspaceLibrary};
pub use memory::{MemoryWorkspace, XmlWorkspaceLibrary};
pub use session::{EditorSession, SessionEvent};
pub use sync::{WorkspaceSynchronizer, EMPTY_PROGRAM};
