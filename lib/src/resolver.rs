//! Maps request URIs onto absolute filesystem paths. Resolution is a pure
//! string computation; whether the resulting path exists or is readable is
//! the resource store's concern.

use crate::config::Config;
use crate::util::percent_decode;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    multi_tenant: bool,
}

impl PathResolver {
    pub fn new(config: &Config) -> Self {
        PathResolver {
            root: config.root.clone(),
            multi_tenant: config.multi_tenant,
        }
    }

    /// Resolves a request path for a virtual host to an absolute filesystem
    /// path under the configured root. Percent-escapes in the request path
    /// are decoded; empty and `.`/`..` segments are dropped so the result
    /// can never escape the root.
    pub fn resolve(&self, request_path: &str, hostname: &str) -> PathBuf {
        let mut base = self.root.clone();
        if self.multi_tenant {
            base.push(hostname);
        }
        let decoded = percent_decode(request_path);
        for segment in decoded.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            base.push(segment);
        }
        base
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(multi_tenant: bool) -> PathResolver {
        let mut config = Config::new(PathBuf::from("/data"));
        config.multi_tenant = multi_tenant;
        PathResolver::new(&config)
    }

    #[test]
    fn test_resolve_single_tenant() {
        let r = resolver(false);
        assert_eq!(
            r.resolve("/notes/todo.ttl", "example.org"),
            PathBuf::from("/data/notes/todo.ttl")
        );
        assert_eq!(r.resolve("/", "example.org"), PathBuf::from("/data"));
    }

    #[test]
    fn test_resolve_multi_tenant() {
        let r = resolver(true);
        assert_eq!(
            r.resolve("/notes/todo.ttl", "example.org"),
            PathBuf::from("/data/example.org/notes/todo.ttl")
        );
    }

    #[test]
    fn test_resolve_decodes_escapes() {
        let r = resolver(false);
        assert_eq!(
            r.resolve("/my%20notes/a%2Bb.txt", "example.org"),
            PathBuf::from("/data/my notes/a+b.txt")
        );
    }

    #[test]
    fn test_resolve_ignores_dot_segments() {
        let r = resolver(false);
        assert_eq!(
            r.resolve("/../../etc/passwd", "example.org"),
            PathBuf::from("/data/etc/passwd")
        );
        assert_eq!(
            r.resolve("//a//./b", "example.org"),
            PathBuf::from("/data/a/b")
        );
    }
}
