//! Builds the RDF description of a container: the seed graph from its
//! metadata resource, container-level stat triples, and one description per
//! immediate member. The graph is built fresh per request and never cached.

use crate::config::Config;
use crate::consts::*;
use crate::errors::LdpError;
use crate::store;
use crate::util::{content_type_for, parse_graph, percent_encode_segment, serialize_graph};
use anyhow::{anyhow, Error, Result};
use log::{debug, warn};
use oxigraph::io::RdfFormat;
use oxigraph::model::graph::Graph as OxigraphGraph;
use oxigraph::model::{Literal, NamedNode, Triple};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Synthesizes the description graph for the container at `dir`, anchored at
/// `container_uri` (must end in `/`). Member descriptions are computed in
/// parallel; an entry whose stat fails is logged and omitted, never fatal.
pub fn describe(dir: &Path, container_uri: &str, config: &Config) -> Result<OxigraphGraph> {
    let container_node =
        NamedNode::new(container_uri).map_err(|e| anyhow!("invalid container URI: {}", e))?;

    let mut graph = seed_graph(dir, config)?;
    add_container_stats(&mut graph, &container_node, dir)?;

    let entries = list_entries(dir, config)?;
    debug!(
        "Describing container {} with {} entries",
        container_uri,
        entries.len()
    );

    // Entries are independent; fan out and keep whatever succeeded.
    let member_triples: Vec<Vec<Triple>> = entries
        .par_iter()
        .filter_map(|(name, path)| {
            match describe_member(&container_node, name, path, config) {
                Ok(triples) => Some(triples),
                Err(e) => {
                    warn!("Skipping member {:?} of {}: {}", name, dir.display(), e);
                    None
                }
            }
        })
        .collect();
    for triples in member_triples {
        for triple in triples {
            graph.insert(&triple);
        }
    }
    Ok(graph)
}

/// Builds the container description and serializes it to turtle bytes.
pub fn describe_to_turtle(dir: &Path, container_uri: &str, config: &Config) -> Result<Vec<u8>> {
    let graph = describe(dir, container_uri, config)?;
    serialize_graph(&graph).map_err(|e| {
        Error::new(LdpError::CannotSerializeContainer {
            message: e.to_string(),
        })
    })
}

/// Parses the metadata resource into the initial graph. A missing metadata
/// file yields an empty seed; malformed turtle is fatal for the request.
fn seed_graph(dir: &Path, config: &Config) -> Result<OxigraphGraph> {
    let meta_path = metadata_path(dir, config);
    let bytes = match std::fs::read(&meta_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(OxigraphGraph::new()),
        Err(e) => return Err(Error::new(LdpError::from_io(&meta_path, e))),
    };
    parse_graph(&bytes, RdfFormat::Turtle).map_err(|e| {
        Error::new(LdpError::CannotParseContainer {
            path: meta_path,
            message: e.to_string(),
        })
    })
}

/// The filesystem path of a container's metadata resource, one level inside
/// the directory.
pub fn metadata_path(dir: &Path, config: &Config) -> PathBuf {
    dir.join(&config.suffix_meta)
}

fn add_container_stats(
    graph: &mut OxigraphGraph,
    container_node: &NamedNode,
    dir: &Path,
) -> Result<()> {
    let attrs = store::stat(dir)?;
    graph.insert(&Triple::new(
        container_node.clone(),
        TYPE,
        LDP_BASIC_CONTAINER,
    ));
    graph.insert(&Triple::new(container_node.clone(), TYPE, LDP_CONTAINER));
    graph.insert(&Triple::new(container_node.clone(), TYPE, LDP_RESOURCE));
    graph.insert(&Triple::new(container_node.clone(), TYPE, STAT_DIRECTORY));
    insert_stat_triples(graph, container_node, &attrs);
    Ok(())
}

fn insert_stat_triples(
    graph: &mut OxigraphGraph,
    node: &NamedNode,
    attrs: &store::ResourceStat,
) {
    graph.insert(&Triple::new(
        node.clone(),
        STAT_SIZE,
        Literal::new_typed_literal(attrs.size.to_string(), XSD_INTEGER),
    ));
    if let Some(modified) = attrs.modified {
        graph.insert(&Triple::new(
            node.clone(),
            STAT_MTIME,
            Literal::new_typed_literal(modified.timestamp().to_string(), XSD_DECIMAL),
        ));
    }
}

/// Enumerates the container's immediate entries. Auxiliary resources (the
/// metadata and ACL files) seed or protect the container and are not listed
/// as members.
fn list_entries(dir: &Path, config: &Config) -> Result<Vec<(String, PathBuf)>> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| Error::new(LdpError::from_io(dir, e)))?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("Skipping non-UTF8 entry {:?} in {}", raw, dir.display());
                continue;
            }
        };
        if name.ends_with(&config.suffix_meta) || name.ends_with(&config.suffix_acl) {
            continue;
        }
        entries.push((name, entry.path()));
    }
    Ok(entries)
}

/// Describes one member as a set of triples: its kind, stat attributes, a
/// membership link from the container, and a media-type hint.
fn describe_member(
    container_node: &NamedNode,
    name: &str,
    path: &Path,
    config: &Config,
) -> Result<Vec<Triple>> {
    let attrs = store::stat(path)?;
    let mut uri = format!("{}{}", container_node.as_str(), percent_encode_segment(name));
    if attrs.is_container {
        uri.push('/');
    }
    let member = NamedNode::new(&uri).map_err(|e| anyhow!("invalid member URI {}: {}", uri, e))?;

    let mut triples = vec![Triple::new(
        container_node.clone(),
        LDP_CONTAINS,
        member.clone(),
    )];
    triples.push(Triple::new(member.clone(), TYPE, LDP_RESOURCE));
    if attrs.is_container {
        triples.push(Triple::new(member.clone(), TYPE, LDP_BASIC_CONTAINER));
        triples.push(Triple::new(member.clone(), TYPE, LDP_CONTAINER));
        triples.push(Triple::new(member.clone(), TYPE, STAT_DIRECTORY));
    } else {
        triples.push(Triple::new(member.clone(), TYPE, STAT_FILE));
        let media_type = content_type_for(path, config);
        let hint = format!("{}{}#Resource", IANA_MEDIA_TYPE_NS, media_type);
        if let Ok(hint_node) = NamedNode::new(&hint) {
            triples.push(Triple::new(member.clone(), TYPE, hint_node));
        }
    }

    let mut graph = OxigraphGraph::new();
    insert_stat_triples(&mut graph, &member, &attrs);
    triples.extend(graph.iter().map(|t| t.into_owned()));
    Ok(triples)
}
