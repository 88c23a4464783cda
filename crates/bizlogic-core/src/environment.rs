//! Descriptor data feeding the dynamic toolbox fragments.
//!
//! These mirror the server payloads: reference descriptors, the argument
//! fields of a program interface, and the function libraries carried by a
//! version's environment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::id::InterfaceId;

/// Opaque environment payload attached to a version.
///
/// Only used to generate the function-library fragment, so it is kept as
/// raw JSON and interpreted on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentRecord(Value);

impl EnvironmentRecord {
    pub fn new(data: Value) -> Self {
        EnvironmentRecord(data)
    }

    pub fn data(&self) -> &Value {
        &self.0
    }

    /// Function libraries declared by this environment.
    ///
    /// An environment without a `libraries` key declares none.
    pub fn function_libraries(&self) -> Result<Vec<FunctionLibrary>, CoreError> {
        match self.0.get("libraries") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(libraries) => serde_json::from_value(libraries.clone()).map_err(|err| {
                CoreError::MalformedFragment {
                    reason: format!("environment libraries: {err}"),
                }
            }),
        }
    }
}

/// A library of callable functions exposed to programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionLibrary {
    pub title: String,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<FunctionArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArgument {
    #[serde(default)]
    pub name: Option<String>,
}

/// A model type that programs may reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDescriptor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub verbose_name: Option<String>,
    pub content_type: String,
}

/// Program interface detail: the arguments a program receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDetail {
    pub id: InterfaceId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub fields: Vec<ArgumentField>,
}

/// One (possibly dotted) field of an argument, e.g. `foreign_value.string_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentField {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}
