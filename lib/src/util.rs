//! Helpers shared across the library: suffix-aware content-type lookup,
//! percent-encoding of URI path segments, and turtle parse/serialize
//! wrappers around oxigraph's reader and writer.

use crate::config::Config;
use crate::consts::{DEFAULT_CONTENT_TYPE, TURTLE_CONTENT_TYPE};
use anyhow::{anyhow, Result};
use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::graph::Graph as OxigraphGraph;
use oxigraph::model::Triple;
use std::path::Path;

/// Computes the media type for a filesystem entry. The RDF suffixes (`.ttl`,
/// the metadata suffix, the ACL suffix) always resolve to turtle and override
/// any extension lookup; everything else goes through the extension table
/// with a binary fallback.
pub fn content_type_for(path: &Path, config: &Config) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.ends_with(".ttl")
        || name.ends_with(&config.suffix_meta)
        || name.ends_with(&config.suffix_acl)
    {
        return TURTLE_CONTENT_TYPE.to_string();
    }
    let ext = path.extension().and_then(|ext| ext.to_str());
    let mime = ext.and_then(|ext| match ext {
        "html" | "htm" => Some("text/html"),
        "css" => Some("text/css"),
        "js" => Some("application/javascript"),
        "json" => Some("application/json"),
        "jsonld" => Some("application/ld+json"),
        "n3" => Some("text/n3"),
        "nt" => Some("application/n-triples"),
        "rdf" | "xml" => Some("application/rdf+xml"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "pdf" => Some("application/pdf"),
        _ => None,
    });
    mime.unwrap_or(DEFAULT_CONTENT_TYPE).to_string()
}

/// Maps a requested media type onto an oxigraph parser format.
pub fn rdf_format_for(content_type: &str) -> Option<RdfFormat> {
    match content_type {
        "text/turtle" | "application/x-turtle" => Some(RdfFormat::Turtle),
        "application/rdf+xml" => Some(RdfFormat::RdfXml),
        "application/n-triples" => Some(RdfFormat::NTriples),
        "text/n3" => Some(RdfFormat::Turtle),
        _ => None,
    }
}

/// Parses RDF bytes into an in-memory graph, dropping any named-graph
/// component the parser reports.
pub fn parse_graph(bytes: &[u8], format: RdfFormat) -> Result<OxigraphGraph> {
    let parser = RdfParser::from_format(format);
    let mut graph = OxigraphGraph::new();
    for quad in parser.for_reader(std::io::Cursor::new(bytes)) {
        let quad = quad?;
        let triple = Triple::new(quad.subject, quad.predicate, quad.object);
        graph.insert(&triple);
    }
    Ok(graph)
}

/// Serializes a graph to turtle bytes.
pub fn serialize_graph(graph: &OxigraphGraph) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();
    let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle).for_writer(&mut out);
    for triple in graph.iter() {
        serializer.serialize_triple(triple)?;
    }
    serializer
        .finish()
        .map_err(|e| anyhow!("turtle serializer failed: {}", e))?;
    Ok(out)
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// Percent-encodes one URI path segment. Unreserved characters pass through;
/// everything else (including `/`) is encoded, so the result is always a
/// single segment.
pub fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Decodes percent-escapes in a request path. Malformed escapes are kept
/// verbatim; the resolver accepts any input string.
pub fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(hex) = std::str::from_utf8(&bytes[i + 1..i + 3]) {
                if let Ok(v) = u8::from_str_radix(hex, 16) {
                    out.push(v);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_content_type_for() {
        let config = Config::new(PathBuf::from("/tmp"));
        let ct = |p: &str| content_type_for(Path::new(p), &config);
        assert_eq!(ct("/a/model.ttl"), "text/turtle");
        assert_eq!(ct("/a/dir/.meta"), "text/turtle");
        assert_eq!(ct("/a/photo.jpg.acl"), "text/turtle");
        assert_eq!(ct("/a/photo.jpg"), "image/jpeg");
        assert_eq!(ct("/a/index.html"), "text/html");
        assert_eq!(ct("/a/blob.unknownext"), "application/octet-stream");
        assert_eq!(ct("/a/noextension"), "application/octet-stream");
    }

    #[test]
    fn test_percent_roundtrip() {
        assert_eq!(percent_encode_segment("a b"), "a%20b");
        assert_eq!(percent_encode_segment("x/y"), "x%2Fy");
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("plain"), "plain");
        // malformed escapes pass through untouched
        assert_eq!(percent_decode("bad%2"), "bad%2");
        assert_eq!(percent_decode("bad%zz"), "bad%zz");
    }

    #[test]
    fn test_parse_and_serialize_graph() {
        let ttl = b"<http://example.org/a> <http://example.org/b> <http://example.org/c> .";
        let graph = parse_graph(ttl, RdfFormat::Turtle).unwrap();
        assert_eq!(graph.len(), 1);
        let out = serialize_graph(&graph).unwrap();
        let reparsed = parse_graph(&out, RdfFormat::Turtle).unwrap();
        assert_eq!(reparsed.len(), 1);
    }

    #[test]
    fn test_parse_graph_malformed() {
        let result = parse_graph(b"this is not turtle @@@", RdfFormat::Turtle);
        assert!(result.is_err());
    }
}
