//! Requests feeding the dynamic toolbox fragments.
//!
//! Reference descriptors and interface argument fields are fetched
//! independently of the hierarchy cache; function libraries come from the
//! loaded version's environment.

use bizlogic_core::toolbox::{argument_fields_fragment, function_libs_fragment, references_fragment};
use bizlogic_core::{InterfaceDetail, InterfaceId, ReferenceDescriptor, VersionRecord};

use crate::config::Endpoints;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::wire::{decode_one, decode_rows};

/// Borrowing client for the descriptor endpoints.
pub struct DescriptorClient<'a, T> {
    transport: &'a T,
    endpoints: &'a Endpoints,
}

impl<'a, T: Transport> DescriptorClient<'a, T> {
    pub fn new(transport: &'a T, endpoints: &'a Endpoints) -> Self {
        DescriptorClient {
            transport,
            endpoints,
        }
    }

    /// `GET /reference/descriptor`.
    pub async fn fetch_reference_descriptors(
        &self,
    ) -> Result<Vec<ReferenceDescriptor>, ClientError> {
        let value = self
            .transport
            .get(&self.endpoints.reference_descriptors())
            .await?;
        decode_rows("reference descriptor", value)
    }

    /// `GET /program-interface/{id}`: the interface's arguments and fields.
    pub async fn fetch_interface_detail(
        &self,
        interface: InterfaceId,
    ) -> Result<InterfaceDetail, ClientError> {
        let value = self.transport.get(&self.endpoints.interface(interface)).await?;
        decode_one("interface", value)
    }

    /// The References fragment, freshly fetched.
    pub async fn references_fragment(&self) -> Result<String, ClientError> {
        Ok(references_fragment(&self.fetch_reference_descriptors().await?))
    }

    /// The ArgumentFields fragment of `interface`, freshly fetched.
    pub async fn argument_fields_fragment(
        &self,
        interface: InterfaceId,
    ) -> Result<String, ClientError> {
        let detail = self.fetch_interface_detail(interface).await?;
        Ok(argument_fields_fragment(&detail.arguments))
    }
}

/// The FunctionLibs fragment of a loaded version's environment.
///
/// A version without an environment contributes an empty category.
pub fn version_function_libs_fragment(version: &VersionRecord) -> Result<String, ClientError> {
    let libraries = match version.environment() {
        Some(environment) => environment.function_libraries()?,
        None => Vec::new(),
    };
    Ok(function_libs_fragment(&libraries))
}
