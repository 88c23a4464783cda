//! Typed records for the Interface → Program → Version hierarchy.
//!
//! Every record is an [`Entity`]: an id, a title and the record's own
//! resource URL. Records are built from server rows and are immutable
//! except through the explicit setters used when a version is saved.

use std::fmt;

use serde::Serialize;

use crate::environment::EnvironmentRecord;
use crate::id::{InterfaceId, ProgramId, VersionId};

/// Common shape of all hierarchy records.
pub trait Entity {
    /// Typed identifier of the record.
    type Id: Copy + Eq + fmt::Debug + fmt::Display;

    /// Human-readable record kind, used in not-found errors and logs.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
    fn title(&self) -> &str;
    fn url(&self) -> &str;
}

fn record_url(collection_url: &str, id: impl fmt::Display) -> String {
    format!("{}/{}", collection_url.trim_end_matches('/'), id)
}

/// A program interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceRecord {
    id: InterfaceId,
    title: String,
    url: String,
}

impl InterfaceRecord {
    pub fn new(id: InterfaceId, title: impl Into<String>, collection_url: &str) -> Self {
        InterfaceRecord {
            id,
            title: title.into(),
            url: record_url(collection_url, id),
        }
    }
}

impl Entity for InterfaceRecord {
    type Id = InterfaceId;
    const KIND: &'static str = "interface";

    fn id(&self) -> InterfaceId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// A program. Belongs to exactly one interface; the relation is expressed
/// by the scope it was fetched under, not stored on the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramRecord {
    id: ProgramId,
    title: String,
    url: String,
}

impl ProgramRecord {
    pub fn new(id: ProgramId, title: impl Into<String>, collection_url: &str) -> Self {
        ProgramRecord {
            id,
            title: title.into(),
            url: record_url(collection_url, id),
        }
    }
}

impl Entity for ProgramRecord {
    type Id = ProgramId;
    const KIND: &'static str = "program";

    fn id(&self) -> ProgramId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// A program version: the record that carries the serialized visual program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionRecord {
    id: VersionId,
    title: String,
    url: String,
    description: String,
    /// Serialized program document. `None` until the detail is loaded.
    program_text: Option<String>,
    /// Set lazily together with the program text.
    environment: Option<EnvironmentRecord>,
    detail_loaded: bool,
}

impl VersionRecord {
    pub fn new(
        id: VersionId,
        title: impl Into<String>,
        description: impl Into<String>,
        collection_url: &str,
    ) -> Self {
        VersionRecord {
            id,
            title: title.into(),
            url: record_url(collection_url, id),
            description: description.into(),
            program_text: None,
            environment: None,
            detail_loaded: false,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn program_text(&self) -> Option<&str> {
        self.program_text.as_deref()
    }

    pub fn environment(&self) -> Option<&EnvironmentRecord> {
        self.environment.as_ref()
    }

    /// True once the version detail has been loaded from the server.
    ///
    /// Saving program text does not count: the environment only comes
    /// with the detail.
    pub fn is_loaded(&self) -> bool {
        self.detail_loaded
    }

    pub fn mark_loaded(&mut self) {
        self.detail_loaded = true;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_program_text(&mut self, text: impl Into<String>) {
        self.program_text = Some(text.into());
    }

    pub fn set_environment(&mut self, environment: Option<EnvironmentRecord>) {
        self.environment = environment;
    }
}

impl Entity for VersionRecord {
    type Id = VersionId;
    const KIND: &'static str = "version";

    fn id(&self) -> VersionId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}
