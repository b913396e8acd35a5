//! The orchestrating entry point of the resource layer. `LdpFs` composes the
//! path resolver, resource store, container graph builder and slug allocator
//! into one logical operation per call, and owns the translation of every
//! low-level failure into the `LdpError` taxonomy.
//!
//! Authentication, ACL enforcement and routing happen in collaborators that
//! run before this layer: a `RequestContext` is assumed to be already
//! authorized.

use crate::config::Config;
use crate::consts::TURTLE_CONTENT_TYPE;
use crate::container;
use crate::errors::LdpError;
use crate::resolver::PathResolver;
use crate::slug;
use crate::store::{self, ByteRange, ContentRange};
use crate::util::{content_type_for, parse_graph, rdf_format_for};
use anyhow::{anyhow, Error, Result};
use chrono::prelude::*;
use derive_builder::Builder;
use log::{debug, info};
use oxigraph::io::RdfFormat;
use oxigraph::model::graph::Graph as OxigraphGraph;
use std::io::Read;
use std::path::PathBuf;
use url::Url;

/// Initializes logging for the ldpfs library.
///
/// This function checks for the `LDPFS_LOG` environment variable. If it is
/// set, `RUST_LOG` is set to its value. `LDPFS_LOG` takes precedence over
/// `RUST_LOG`. The logger initialization (e.g., `env_logger::init()`) must be
/// called after this function for the log level to take effect.
pub fn init_logging() {
    // Allow LDPFS_LOG to override RUST_LOG for consistent CLI defaults.
    if let Ok(log_level) = std::env::var("LDPFS_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
}

/// Everything this layer needs to know about one already-authenticated
/// request.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct RequestContext {
    /// Virtual host the request arrived on.
    pub hostname: String,
    /// URI path of the target resource, possibly percent-encoded.
    pub path: String,
    /// Base URI used to anchor synthesized graphs; defaults to
    /// `https://<hostname>`.
    #[builder(default)]
    pub base_uri: Option<String>,
    /// When false, `get` returns attributes without opening the file.
    #[builder(default = "true")]
    pub include_body: bool,
    /// Media type the caller asked for. Containers ignore it and always
    /// answer in turtle.
    #[builder(default)]
    pub content_type: Option<String>,
    /// Single inclusive byte range for partial reads.
    #[builder(default)]
    pub range: Option<ByteRange>,
}

/// The outcome of a `get`: either a body stream plus metadata, or (for
/// body-less requests) the metadata alone.
pub struct ResourceResponse {
    pub body: Option<Box<dyn Read + Send>>,
    pub content_type: String,
    pub is_container: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub content_range: Option<ContentRange>,
}

impl ResourceResponse {
    /// Drains the body stream into memory. Convenience for tests and the CLI.
    pub fn body_bytes(self) -> Result<Vec<u8>> {
        let Some(mut body) = self.body else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        body.read_to_end(&mut out)?;
        Ok(out)
    }
}

impl std::fmt::Debug for ResourceResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceResponse")
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .field("content_type", &self.content_type)
            .field("is_container", &self.is_container)
            .field("size", &self.size)
            .field("modified", &self.modified)
            .field("content_range", &self.content_range)
            .finish()
    }
}

/// The resource-access facade over one configured resource tree.
pub struct LdpFs {
    config: Config,
    resolver: PathResolver,
}

impl LdpFs {
    pub fn new(config: Config) -> Self {
        let resolver = PathResolver::new(&config);
        LdpFs { config, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn resolve(&self, ctx: &RequestContext) -> PathBuf {
        self.resolver.resolve(&ctx.path, &ctx.hostname)
    }

    /// The URI a container graph is anchored at: base URI plus request path,
    /// with a trailing slash.
    fn container_uri(&self, ctx: &RequestContext) -> Result<String> {
        let base = match &ctx.base_uri {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}", ctx.hostname),
        };
        let mut uri = format!("{}{}", base, ctx.path);
        if !uri.ends_with('/') {
            uri.push('/');
        }
        Url::parse(&uri).map_err(|e| anyhow!("invalid container URI {}: {}", uri, e))?;
        Ok(uri)
    }

    /// Retrieves a resource. Containers answer with their synthesized turtle
    /// description regardless of the requested media type; plain resources
    /// are streamed, whole or ranged. With `include_body` off, only
    /// stat-derived attributes come back and the file is never opened.
    pub fn get(&self, ctx: &RequestContext) -> Result<ResourceResponse> {
        let path = self.resolve(ctx);
        let attrs = store::stat(&path)?;

        if attrs.is_container {
            let body = if ctx.include_body {
                let uri = self.container_uri(ctx)?;
                Some(container::describe_to_turtle(&path, &uri, &self.config)?)
            } else {
                None
            };
            let size = body.as_ref().map(|b| b.len() as u64).unwrap_or(attrs.size);
            return Ok(ResourceResponse {
                body: body.map(|b| Box::new(std::io::Cursor::new(b)) as Box<dyn Read + Send>),
                content_type: TURTLE_CONTENT_TYPE.to_string(),
                is_container: true,
                size,
                modified: attrs.modified,
                content_range: None,
            });
        }

        let content_type = content_type_for(&path, &self.config);
        if !ctx.include_body {
            return Ok(ResourceResponse {
                body: None,
                content_type,
                is_container: false,
                size: attrs.size,
                modified: attrs.modified,
                content_range: None,
            });
        }
        let (stream, content_range) = store::read(&path, ctx.range)?;
        let size = content_range.map(|r| r.chunk_len()).unwrap_or(attrs.size);
        Ok(ResourceResponse {
            body: Some(stream),
            content_type,
            is_container: false,
            size,
            modified: attrs.modified,
            content_range,
        })
    }

    /// Overwrites the target resource wholesale with `content`.
    pub fn put(&self, ctx: &RequestContext, content: impl Read) -> Result<()> {
        let path = self.resolve(ctx);
        let written = store::write(&path, content)?;
        info!("PUT {} ({} bytes)", path.display(), written);
        Ok(())
    }

    /// Deletes the target resource.
    pub fn delete(&self, ctx: &RequestContext) -> Result<()> {
        let path = self.resolve(ctx);
        store::delete(&path)?;
        info!("DELETE {}", path.display());
        Ok(())
    }

    /// Creates a new resource inside the container at `ctx.path`. The slug's
    /// character set is validated before any filesystem work; collisions are
    /// resolved by the allocator. Creating a container writes its metadata
    /// resource one level inside the allocated directory; the returned path
    /// is always the logical resource path.
    pub fn post(
        &self,
        ctx: &RequestContext,
        desired_slug: Option<&str>,
        content: impl Read,
        is_container: bool,
    ) -> Result<PathBuf> {
        if let Some(s) = desired_slug {
            slug::validate_slug(s)?;
        }
        let container_path = self.resolve(ctx);
        let target = slug::allocate(&container_path, desired_slug, self.config.max_slug_attempts)?;
        if is_container {
            let meta = container::metadata_path(&target, &self.config);
            store::write(&meta, content)?;
            info!("POST container {}", target.display());
        } else {
            store::write(&target, content)?;
            info!("POST {}", target.display());
        }
        Ok(target)
    }

    /// Existence probe: a body-less `get` with `NotFound` mapped to `false`
    /// and every other outcome to `true`.
    pub fn exists(&self, ctx: &RequestContext) -> bool {
        let mut probe = ctx.clone();
        probe.include_body = false;
        match self.get(&probe) {
            Ok(_) => true,
            Err(e) => !matches!(
                e.downcast_ref::<LdpError>(),
                Some(kind) if kind.is_not_found()
            ),
        }
    }

    /// Reads a non-container RDF resource and parses it in the requested
    /// format (default turtle). Independent of the container machinery.
    pub fn graph(&self, ctx: &RequestContext) -> Result<OxigraphGraph> {
        let path = self.resolve(ctx);
        let bytes = store::read_to_bytes(&path)?;
        let format = ctx
            .content_type
            .as_deref()
            .and_then(rdf_format_for)
            .unwrap_or(RdfFormat::Turtle);
        debug!("Parsing {} as {:?}", path.display(), format);
        parse_graph(&bytes, format).map_err(|e| {
            Error::new(LdpError::CannotParseResource {
                path,
                message: e.to_string(),
            })
        })
    }
}
