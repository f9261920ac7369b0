//! Tenant configuration snapshots.
//!
//! A snapshot is the JSON tree a pull produces: folders and snippets, each
//! holding object/profile/rule collections plus an `infrastructure` section
//! for the VPN chain (IKE/IPsec crypto profiles, gateways, tunnels, service
//! connections, remote networks, GlobalProtect).
//!
//! Parsing is deliberately tolerant: an empty object or a snapshot without a
//! `folders` key simply yields no items, and collection entries without a
//! `name` are skipped. Only unreadable or non-JSON input is an error — the
//! one fatal class the push pipeline recognizes for its source.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::item::{
    ConfigItem, ItemKind, Location, INFRASTRUCTURE_KINDS, OBJECT_KINDS, PROFILE_KINDS, RULE_KINDS,
};

/// Errors returned when loading a tenant snapshot.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed config: {0}")]
    Malformed(String),
}

/// A parsed tenant snapshot, consumed read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    /// Wrap an already-parsed JSON value. The top level must be an object.
    pub fn from_value(root: Value) -> Result<Self, TreeError> {
        if !root.is_object() {
            return Err(TreeError::Malformed(
                "top-level config must be a JSON object".to_string(),
            ));
        }
        Ok(Self { root })
    }

    /// Parse snapshot JSON from a string.
    pub fn parse(raw: &str) -> Result<Self, TreeError> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Parse snapshot JSON from a file.
    pub fn parse_file(path: &Path) -> Result<Self, TreeError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn folder_names(&self) -> Vec<String> {
        container_names(&self.root, "folders")
    }

    pub fn snippet_names(&self) -> Vec<String> {
        container_names(&self.root, "snippets")
    }

    /// All locations in declaration order, folders before snippets.
    pub fn locations(&self) -> Vec<Location> {
        let mut out: Vec<Location> = self.folder_names().into_iter().map(Location::Folder).collect();
        out.extend(self.snippet_names().into_iter().map(Location::Snippet));
        out
    }

    /// Every configuration item in the snapshot, in declaration order:
    /// folder contents first, then each snippet (as its own item) followed by
    /// the snippet's contents.
    pub fn items(&self) -> Vec<ConfigItem> {
        let mut out = Vec::new();
        for folder in containers(&self.root, "folders") {
            let Some(name) = container_name(folder) else {
                continue;
            };
            collect_location_items(folder, &Location::Folder(name), &mut out);
        }
        for snippet in containers(&self.root, "snippets") {
            let Some(name) = container_name(snippet) else {
                continue;
            };
            let location = Location::Snippet(name.clone());
            // The snippet itself registers as a plain node: a metadata
            // container with no extracted dependencies.
            out.push(ConfigItem {
                name,
                kind: ItemKind::Snippet,
                location: location.clone(),
                data: snippet.clone(),
            });
            collect_location_items(snippet, &location, &mut out);
        }
        out
    }

    /// Items filtered to a single location name.
    pub fn items_in(&self, location_name: &str) -> Vec<ConfigItem> {
        self.items()
            .into_iter()
            .filter(|item| item.location.name() == location_name)
            .collect()
    }
}

fn collect_location_items(container: &Value, location: &Location, out: &mut Vec<ConfigItem>) {
    for kind in OBJECT_KINDS.iter().chain(PROFILE_KINDS).chain(RULE_KINDS) {
        collect_section(container.get(kind.section_key()), *kind, location, out);
    }
    if let Some(infra) = container.get("infrastructure") {
        for kind in INFRASTRUCTURE_KINDS {
            collect_section(infra.get(kind.section_key()), *kind, location, out);
        }
    }
}

fn collect_section(
    section: Option<&Value>,
    kind: ItemKind,
    location: &Location,
    out: &mut Vec<ConfigItem>,
) {
    let Some(entries) = section.and_then(Value::as_array) else {
        return;
    };
    for entry in entries {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        out.push(ConfigItem {
            name: name.to_string(),
            kind,
            location: location.clone(),
            data: entry.clone(),
        });
    }
}

fn containers<'a>(root: &'a Value, key: &str) -> Vec<&'a Value> {
    root.get(key)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().collect())
        .unwrap_or_default()
}

fn container_name(container: &Value) -> Option<String> {
    let name = container.get("name")?.as_str()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn container_names(root: &Value, key: &str) -> Vec<String> {
    containers(root, key)
        .into_iter()
        .filter_map(container_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ConfigTree;
    use crate::item::{ItemKind, Location};

    #[test]
    fn empty_object_yields_no_items() {
        let tree = ConfigTree::parse("{}").expect("parse");
        assert!(tree.items().is_empty());
        assert!(tree.folder_names().is_empty());
    }

    #[test]
    fn unexpected_section_shapes_are_skipped() {
        let tree = ConfigTree::from_value(json!({
            "folders": [
                {
                    "name": "Shared",
                    "addresses": "not-a-list",
                    "services": [{"port": 80}, {"name": "tcp-80"}]
                },
                {"addresses": [{"name": "orphan"}]}
            ]
        }))
        .expect("tree");

        let items = tree.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "tcp-80");
        assert_eq!(items[0].kind, ItemKind::ServiceObject);
    }

    #[test]
    fn snippets_register_themselves_and_their_contents() {
        let tree = ConfigTree::from_value(json!({
            "snippets": [
                {"name": "baseline", "addresses": [{"name": "dns1", "ip_netmask": "9.9.9.9/32"}]}
            ]
        }))
        .expect("tree");

        let items = tree.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ItemKind::Snippet);
        assert_eq!(items[0].name, "baseline");
        assert_eq!(items[1].location, Location::Snippet("baseline".to_string()));
    }

    #[test]
    fn infrastructure_lives_beside_object_sections() {
        let tree = ConfigTree::from_value(json!({
            "folders": [{
                "name": "Service Connections",
                "infrastructure": {
                    "ike_gateways": [{"name": "gw-primary"}],
                    "ipsec_tunnels": [{"name": "tun-primary"}]
                }
            }]
        }))
        .expect("tree");

        let items = tree.items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| i.kind == ItemKind::IkeGateway));
        assert!(items.iter().any(|i| i.kind == ItemKind::IpsecTunnel));
    }

    #[test]
    fn items_in_filters_to_one_location() {
        let tree = ConfigTree::from_value(json!({
            "folders": [
                {"name": "Shared", "addresses": [{"name": "web1"}]},
                {"name": "Branch", "addresses": [{"name": "web2"}]}
            ]
        }))
        .expect("tree");

        let items = tree.items_in("Branch");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "web2");
    }

    #[test]
    fn non_object_top_level_is_fatal() {
        assert!(ConfigTree::parse("[1, 2, 3]").is_err());
        assert!(ConfigTree::parse("not json").is_err());
    }
}
