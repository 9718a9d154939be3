//! The documentation database: a path-addressed tree of nodes.
//!
//! Every distinct dotted path names exactly one node. Ancestors are created
//! on first reference and named with their cumulative path until something
//! claims them. A node is claimed at most once (first write wins); after
//! that its derived fields (`fullName`, `id`, `issueID`) are fixed, so they
//! are computed lazily and cached.
//!
//! The tree is a plain value owned by the caller — ingestion mutates it,
//! formatters read it back through `lookup` and the collection accessors.

use crate::model::Record;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::collections::HashMap;

/// Description attached to the synthetic root node.
pub const ROOT_DESCRIPTION: &str = "These are the elements in the global namespace.";

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the documentation tree.
#[derive(Debug, Default)]
pub struct Node {
    /// Dot-delimited path; empty for the root.
    pub path: String,
    /// Last claimed name; auto-created nodes carry their cumulative path
    /// until a claim renames them.
    pub name: String,
    claim: Option<Record>,
    /// Pluralized kind → child records, in insertion order.
    collections: Vec<(String, Vec<NodeId>)>,
    full_name: OnceCell<String>,
    dom_id: OnceCell<String>,
    issue_id: OnceCell<Option<u32>>,
}

/// The path-addressed documentation database.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

const ROOT: NodeId = NodeId(0);

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let root = Node {
            path: String::new(),
            name: "[Global]".to_string(),
            claim: Some(Record {
                field_type: Some("database".to_string()),
                name: "[Global]".to_string(),
                description: Some(ROOT_DESCRIPTION.to_string()),
                ..Record::default()
            }),
            ..Node::default()
        };
        // The root's derived fields are fixed, not derived from a parent
        // chain, so they are seeded rather than computed.
        root.full_name.set("[Global]".to_string()).expect("fresh cell");
        root.dom_id.set("Global".to_string()).expect("fresh cell");

        Tree {
            nodes: vec![root],
            index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The record claimed at this node, if any.
    pub fn record(&self, id: NodeId) -> Option<&Record> {
        self.nodes[id.0].claim.as_ref()
    }

    /// The node's child collections: pluralized kind → members, in
    /// insertion order.
    pub fn collections(&self, id: NodeId) -> &[(String, Vec<NodeId>)] {
        &self.nodes[id.0].collections
    }

    /// Walk the path, creating any missing nodes along the way. Newly
    /// created nodes are named with their cumulative path-so-far.
    pub fn get_or_create(&mut self, path: &str) -> NodeId {
        if path.is_empty() {
            return ROOT;
        }
        let mut current = String::with_capacity(path.len());
        let mut id = ROOT;
        for part in path.split('.') {
            if !current.is_empty() {
                current.push('.');
            }
            current.push_str(part);
            id = match self.index.get(&current) {
                Some(&existing) => existing,
                None => {
                    let created = NodeId(self.nodes.len());
                    self.nodes.push(Node {
                        path: current.clone(),
                        name: current.clone(),
                        ..Node::default()
                    });
                    self.index.insert(current.clone(), created);
                    created
                }
            };
        }
        id
    }

    /// Non-creating walk. The empty path is the root.
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            Some(ROOT)
        } else {
            self.index.get(path).copied()
        }
    }

    /// Claim the node with the given record. A no-op returning false if the
    /// node is already claimed — claims are write-once.
    pub fn claim(&mut self, id: NodeId, record: Record) -> bool {
        let node = &mut self.nodes[id.0];
        if node.claim.is_some() {
            return false;
        }
        node.name = record.name.clone();
        node.claim = Some(record);
        true
    }

    /// True if the node's collection for `kind` already holds an entry with
    /// this name.
    pub fn collection_contains(&self, id: NodeId, kind: &str, name: &str) -> bool {
        let key = pluralize(kind);
        self.nodes[id.0]
            .collections
            .iter()
            .find(|(k, _)| *k == key)
            .is_some_and(|(_, members)| {
                members.iter().any(|&m| self.nodes[m.0].name == name)
            })
    }

    /// Append `child` to the parent's pluralized collection for `kind`,
    /// creating the collection on first use. A second entry with the same
    /// name is silently skipped (returns false).
    pub fn append_child(&mut self, parent: NodeId, kind: &str, child: NodeId) -> bool {
        let child_name = self.nodes[child.0].name.clone();
        if self.collection_contains(parent, kind, &child_name) {
            return false;
        }
        let key = pluralize(kind);
        let node = &mut self.nodes[parent.0];
        match node.collections.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(child),
            None => node.collections.push((key, vec![child])),
        }
        true
    }

    /// The display name: parent path, a kind-dependent separator, then the
    /// node's name. Computed once and cached.
    pub fn full_name(&self, id: NodeId) -> &str {
        let node = &self.nodes[id.0];
        node.full_name.get_or_init(|| {
            let Some(rec) = &node.claim else {
                return node.name.clone();
            };
            match rec.parent.as_deref().filter(|p| !p.is_empty()) {
                Some(parent) => {
                    // Members aren't dot-accessible from their class object,
                    // so they get C++-style notation instead.
                    let sep = match rec.field_type.as_deref() {
                        Some("method" | "property" | "event") => "::",
                        Some("example" | "issue") => ": ",
                        _ => ".",
                    };
                    format!("{parent}{sep}{}", rec.name)
                }
                None => rec.name.clone(),
            }
        })
    }

    /// Identifier safe for anchors and element ids: the full name with `.`
    /// and `:` turned into `_` and spaces removed.
    pub fn dom_id(&self, id: NodeId) -> &str {
        let full = self.full_name(id).to_string();
        self.nodes[id.0].dom_id.get_or_init(|| {
            full.chars()
                .filter(|&c| c != ' ')
                .map(|c| if c == '.' || c == ':' { '_' } else { c })
                .collect()
        })
    }

    /// Stable per-issue identifier; only issue records have one.
    pub fn issue_id(&self, id: NodeId) -> Option<u32> {
        let node = &self.nodes[id.0];
        *node.issue_id.get_or_init(|| {
            let rec = node.claim.as_ref()?;
            if rec.field_type.as_deref() != Some("issue") {
                return None;
            }
            let parent = rec.parent.as_deref().unwrap_or("");
            Some(annotation_hash(&format!("{parent}.{}", rec.name)))
        })
    }

    /// Serialize the whole database, root-down: claimed fields plus the
    /// derived identifiers plus every child collection.
    pub fn to_value(&self) -> Value {
        self.node_value(ROOT)
    }

    /// Serialize one node the way formatters consume it.
    pub fn node_value(&self, id: NodeId) -> Value {
        let node = &self.nodes[id.0];
        let mut map = Map::new();

        match &node.claim {
            Some(rec) => {
                if let Value::Object(fields) =
                    serde_json::to_value(rec).expect("records always serialize")
                {
                    map.extend(fields);
                }
            }
            None => {
                map.insert("name".to_string(), Value::String(node.name.clone()));
            }
        }

        map.insert(
            "fullName".to_string(),
            Value::String(self.full_name(id).to_string()),
        );
        map.insert("id".to_string(), Value::String(self.dom_id(id).to_string()));
        if let Some(issue_id) = self.issue_id(id) {
            map.insert("issueID".to_string(), Value::from(issue_id));
        }

        for (key, members) in &node.collections {
            let children = members.iter().map(|&m| self.node_value(m)).collect();
            map.insert(key.clone(), Value::Array(children));
        }
        Value::Object(map)
    }
}

/// Collection key for a kind: `kind + "s"`, then `ys → ies`, `ss → ses`.
pub fn pluralize(kind: &str) -> String {
    let mut plural = format!("{kind}s");
    if plural.ends_with("ys") {
        plural.truncate(plural.len() - 2);
        plural.push_str("ies");
    } else if plural.ends_with("ss") {
        plural.truncate(plural.len() - 2);
        plural.push_str("ses");
    }
    plural
}

/// The issue-id hash: an Adler-style checksum mod 32771 over UTF-16 code
/// units, packed as `s2 << 8 | s1`. Kept bit-for-bit stable — the values
/// end up in persisted documentation.
pub fn annotation_hash(text: &str) -> u32 {
    let mut s1: u32 = 1;
    let mut s2: u32 = 0;
    for unit in text.encode_utf16() {
        s1 = (s1 + u32::from(unit)) % 32771;
        s2 = (s2 + s1) % 32771;
    }
    (s2 << 8) | s1
}
