//! Defines constant NamedNodeRefs for the RDF terms used when describing
//! containers and their members, primarily from the LDP and POSIX stat
//! vocabularies.

use oxigraph::model::NamedNodeRef;

pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");

// ldp
pub const LDP_RESOURCE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#Resource");
pub const LDP_CONTAINER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#Container");
pub const LDP_BASIC_CONTAINER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#BasicContainer");
pub const LDP_CONTAINS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#contains");

// posix stat terms used for per-entry attributes
pub const STAT_FILE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/posix/stat#File");
pub const STAT_DIRECTORY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/posix/stat#Directory");
pub const STAT_SIZE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/posix/stat#size");
pub const STAT_MTIME: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/posix/stat#mtime");

pub const XSD_INTEGER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#integer");
pub const XSD_DECIMAL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#decimal");

/// Namespace for content-type hints: a member whose media type is `m` gets
/// `rdf:type <IANA_MEDIA_TYPE_NS + m + "#Resource">`.
pub const IANA_MEDIA_TYPE_NS: &str = "http://www.w3.org/ns/iana/media-types/";

/// The canonical representation for containers and RDF suffix files.
pub const TURTLE_CONTENT_TYPE: &str = "text/turtle";

/// Fallback when a file extension has no known media type.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
