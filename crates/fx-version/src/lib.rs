//! This library encodes and decodes runtime stack descriptors, the compact
//! `LinuxFxVersion` and `WindowsFxVersion` strings App Service uses to pick the
//! language, version, application server or container image of a site.
//! Descriptors have the format `<TYPE>|<PAYLOAD>`, for example `NODE|18-lts`,
//! `TOMCAT|10.0-jre8` or `DOCKER|myregistry.io/app:v1`.
//!
//! ## Usage
//!
//! The spelling of the type token depends on the [`FxTarget`]. Descriptors
//! are decoded with [`decode`] and produced with [`encode`].
//!
//! ```
//! use fx_version::{FxTarget, RuntimeStack, decode, encode};
//!
//! let decoded = decode("Node|18", FxTarget::WindowsFunctionApp, None)
//!     .expect("valid descriptor");
//! assert_eq!(decoded.stack, Some(RuntimeStack::Node { version: "18".into() }));
//!
//! let encoded = encode(decoded.stack.as_ref(), FxTarget::LinuxFunctionApp, None)
//!     .expect("node runs on linux function apps");
//! assert_eq!(encoded.descriptor, "node|18");
//! ```
//!
//! Container images need the registry credentials stored in app settings to
//! tell the registry apart from the image path.
//!
//! ```
//! use fx_version::{DockerImage, FxTarget, RegistryCredentials, RuntimeStack, decode};
//!
//! let credentials = RegistryCredentials {
//!     server_url: "https://myregistry.io".into(),
//!     ..Default::default()
//! };
//!
//! let decoded = decode("DOCKER|myregistry.io/app:v1", FxTarget::LinuxWebApp, Some(&credentials))
//!     .expect("valid descriptor");
//! assert_eq!(decoded.stack, Some(RuntimeStack::Docker(DockerImage {
//!     registry_url: Some("https://myregistry.io".into()),
//!     image_name: "app".into(),
//!     image_tag: "v1".into(),
//! })));
//! ```

// NOTE: Fixed in https://github.com/la10736/rstest/pull/244 but not yet
// released.
#[cfg(test)]
use rstest_reuse::{self};

mod descriptor;
mod docker;
mod java;
mod stack;
mod target;

pub use descriptor::*;
pub use docker::*;
pub use java::{decode_java_payload, java_fx_string};
pub use stack::*;
pub use target::*;
