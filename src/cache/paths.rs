// Cache path utilities.
// Maps (kind, id, data type) keys onto the on-disk cache layout.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the default cache directory (~/.cache/conbuddy on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "conbuddy").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding every item of one kind.
pub fn kind_dir(root: &Path, kind: &str) -> PathBuf {
    root.join(sanitize_name(kind))
}

/// Path of a single stored item: `<root>/<kind>/<id>.<data_type>`.
pub fn item_path(root: &Path, kind: &str, id: &str, data_type: &str) -> PathBuf {
    kind_dir(root, kind).join(format!("{}.{}", sanitize_name(id), data_type))
}

/// Sanitize a name for use in filesystem paths.
/// View URIs like `/convention/foo` become `_convention_foo`.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("conventions"), "conventions");
        assert_eq!(sanitize_name("/convention/gencon"), "_convention_gencon");
        assert_eq!(sanitize_name("type:name"), "type_name");
    }

    #[test]
    fn test_item_paths() {
        let root = Path::new("/tmp/conbuddy");

        let p = item_path(root, "conventions", "conventions", "json");
        assert!(p.ends_with("conventions/conventions.json"));

        let p = item_path(root, "liked", "/convention/gencon-2024", "txt");
        assert!(p.ends_with("liked/_convention_gencon-2024.txt"));

        let p = item_path(root, "event_type", "/api/eventtype/ABC-123", "json");
        assert!(p.ends_with("event_type/_api_eventtype_ABC-123.json"));
    }
}
