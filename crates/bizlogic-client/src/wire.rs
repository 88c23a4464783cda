//! Wire types for REST responses and request bodies.
//!
//! List endpoints answer `{ "results": [...] }` (paginated) while some
//! unpaginated ones answer a bare array; [`decode_rows`] accepts both.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bizlogic_core::{
    EnvironmentRecord, InterfaceId, InterfaceRecord, ProgramId, ProgramRecord, VersionId,
    VersionRecord,
};

use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
}

/// Decodes the rows of a list response.
pub fn decode_rows<T: DeserializeOwned>(
    what: &'static str,
    value: Value,
) -> Result<Vec<T>, ClientError> {
    let rows = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<Page<T>>(value).map(|page| page.results)
    };
    rows.map_err(|err| ClientError::Decode {
        what,
        reason: err.to_string(),
    })
}

/// Decodes a single-object response.
pub fn decode_one<T: DeserializeOwned>(what: &'static str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|err| ClientError::Decode {
        what,
        reason: err.to_string(),
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceRow {
    pub id: InterfaceId,
    pub title: String,
}

impl InterfaceRow {
    pub fn into_record(self, collection_url: &str) -> InterfaceRecord {
        InterfaceRecord::new(self.id, self.title, collection_url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramRow {
    pub id: ProgramId,
    pub title: String,
}

impl ProgramRow {
    pub fn into_record(self, collection_url: &str) -> ProgramRecord {
        ProgramRecord::new(self.id, self.title, collection_url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionRow {
    pub id: VersionId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl VersionRow {
    pub fn into_record(self, collection_url: &str) -> VersionRecord {
        VersionRecord::new(
            self.id,
            self.title,
            self.description.unwrap_or_default(),
            collection_url,
        )
    }
}

/// `GET /program-version/{id}`: the row plus program text and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionDetail {
    pub id: VersionId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub xml: Option<String>,
    #[serde(default)]
    pub environment: Option<Value>,
}

impl VersionDetail {
    /// Copies the detail onto a cached record.
    pub fn apply_to(self, record: &mut VersionRecord) {
        if let Some(title) = self.title {
            record.set_title(title);
        }
        if let Some(description) = self.description {
            record.set_description(description);
        }
        record.set_program_text(self.xml.unwrap_or_default());
        record.set_environment(
            self.environment
                .filter(|env| !env.is_null())
                .map(EnvironmentRecord::new),
        );
        record.mark_loaded();
    }
}

/// `PUT /program-version/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct SaveVersionBody<'a> {
    pub id: VersionId,
    pub title: &'a str,
    pub description: &'a str,
    pub xml: &'a str,
}

/// `POST /program-version` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVersionBody<'a> {
    pub program: ProgramId,
    pub title: &'a str,
    pub description: &'a str,
    pub xml: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use bizlogic_core::Entity;

    #[test]
    fn decode_rows_accepts_paginated_and_bare_lists() {
        let paginated: Vec<ProgramRow> = decode_rows(
            "program",
            json!({ "count": 1, "next": null, "results": [{ "id": 9, "title": "p" }] }),
        )
        .unwrap();
        assert_eq!(paginated[0].id, ProgramId(9));

        let bare: Vec<ProgramRow> =
            decode_rows("program", json!([{ "id": 1, "title": "q" }])).unwrap();
        assert_eq!(bare[0].title, "q");
    }

    #[test]
    fn decode_rows_reports_shape_errors() {
        let err = decode_rows::<ProgramRow>("program", json!({ "rows": [] })).unwrap_err();
        assert!(matches!(err, ClientError::Decode { what: "program", .. }));
    }

    #[test]
    fn version_detail_fills_record() {
        let mut record = VersionRow {
            id: VersionId(2),
            title: "v".into(),
            description: None,
        }
        .into_record("/v");
        let detail: VersionDetail = decode_one(
            "version",
            json!({ "id": 2, "description": "d", "xml": "<xml></xml>", "environment": null }),
        )
        .unwrap();
        detail.apply_to(&mut record);
        assert_eq!(record.program_text(), Some("<xml></xml>"));
        assert_eq!(record.description(), "d");
        assert_eq!(record.title(), "v");
        assert!(record.environment().is_none());
    }
}
