//! Filesystem-backed resource layer for Linked-Data-Platform style servers.
//!
//! Each regular file under the configured root is an RDF-describable
//! resource; each directory is an LDP container whose membership and
//! metadata are synthesized on demand into a turtle graph. The crate maps
//! already-authenticated requests onto stat/read/write/delete operations and
//! graph construction; authentication, ACL enforcement and HTTP routing are
//! external collaborators.

pub mod api;
pub mod config;
pub mod consts;
pub mod container;
pub mod errors;
pub mod resolver;
pub mod slug;
pub mod store;
pub mod util;

pub use api::{init_logging, LdpFs, RequestContext, RequestContextBuilder, ResourceResponse};
pub use config::Config;
pub use errors::LdpError;
pub use store::{ByteRange, ContentRange, ResourceStat};
