//! REST client side of the program editor.
//!
//! Provides the [`Transport`] seam over the REST API, the cascading
//! [`FetchCache`] for the Interface → Program → Version hierarchy, the
//! descriptor requests feeding the toolbox fragments, and version
//! save/save-as.

pub mod cache;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod transport;
pub mod wire;

pub use cache::FetchCache;
pub use config::{ClientConfig, Endpoints};
pub use descriptors::DescriptorClient;
pub use error::{ClientError, TransportError};
pub use transport::{HttpTransport, Transport};
