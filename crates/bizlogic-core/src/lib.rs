pub mod collection;
pub mod entity;
pub mod environment;
pub mod error;
pub mod id;
pub mod selection;
pub mod toolbox;

// Re-export commonly used types
pub use collection::Collection;
pub use entity::{Entity, InterfaceRecord, ProgramRecord, VersionRecord};
pub use environment::{
    ArgumentDescriptor, ArgumentField, EnvironmentRecord, FunctionDescriptor, FunctionLibrary,
    InterfaceDetail, ReferenceDescriptor,
};
pub use error::CoreError;
pub use id::{InterfaceId, ProgramId, VersionId};
pub use selection::{Selection, SelectionEntry};
pub use toolbox::{
    assemble, CompositeToolbox, Fragment, FragmentSet, ToolboxGeneration, ToolboxTracker,
};
