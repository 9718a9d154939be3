//! Turning raw annotation calls into documentation-tree insertions.
//!
//! Every `record` call is one self-contained transaction against the tree:
//! read current state, decide skip or insert, mutate. Failures and duplicate
//! registrations are collected, never propagated past the one record they
//! belong to, so a batch always runs to completion.

use crate::error::IngestError;
use crate::extract::RawCall;
use crate::model::Record;
use crate::params;
use crate::tree::{NodeId, Tree};
use serde_json::Value;

/// A registration that was skipped because a sibling of the same kind and
/// name already existed. First write wins; the skip is reported rather than
/// silently swallowed so callers can notice colliding annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub kind: String,
    pub parent: String,
    pub name: String,
}

/// Accumulates records into a caller-owned [`Tree`].
pub struct Ingester<'a> {
    tree: &'a mut Tree,
    /// Per-call failures from a batch run.
    pub errors: Vec<IngestError>,
    /// Idempotent skips observed so far.
    pub duplicates: Vec<Duplicate>,
}

impl<'a> Ingester<'a> {
    pub fn new(tree: &'a mut Tree) -> Self {
        Ingester {
            tree,
            errors: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Parse and record every call from one split source, in order. Calls
    /// that fail to parse are reported in `errors`; the rest still land.
    pub fn ingest_calls(&mut self, calls: &[RawCall]) {
        for call in calls {
            match params::parse_argument(&call.args) {
                Ok(value) => {
                    if let Err(err) = self.record(&call.kind, value) {
                        self.errors.push(err);
                    }
                }
                Err(source) => self.errors.push(IngestError::ParameterParse {
                    kind: call.kind.clone(),
                    source,
                }),
            }
        }
    }

    /// Record one annotation value under the given kind.
    pub fn record(&mut self, kind: &str, value: Value) -> Result<(), IngestError> {
        let record: Record =
            serde_json::from_value(value).map_err(|source| IngestError::InvalidRecord {
                kind: kind.to_string(),
                source,
            })?;
        self.record_parsed(kind, record);
        Ok(())
    }

    fn record_parsed(&mut self, kind: &str, mut record: Record) {
        if record.field_type.is_none() {
            record.field_type = Some(kind.to_string());
        }

        let parent_path = record.parent.clone().unwrap_or_default();
        let parent = self.tree.get_or_create(&parent_path);

        // Idempotent skip: a sibling with this name already registered
        // under the same kind-collection. Nothing else happens.
        if self.tree.collection_contains(parent, kind, &record.name) {
            self.duplicates.push(Duplicate {
                kind: kind.to_string(),
                parent: parent_path,
                name: record.name.clone(),
            });
            return;
        }

        // Sub-records are stored independently, not on the parent record.
        let examples = std::mem::take(&mut record.examples);
        let issues = std::mem::take(&mut record.issues);
        let comments = std::mem::take(&mut record.comments);

        // The claim path uses the parent as written; a parentless class
        // with a base class is then re-parented under the base so that its
        // display name and links point there.
        let full_path = record.full_path();
        let base_class = record.base_class.clone();
        if kind == "class" && base_class.is_some() && record.parent.is_none() {
            record.parent = base_class.clone();
        }

        let target = self.tree.get_or_create(&full_path);
        let record_for_subclass = record.clone();
        self.tree.claim(target, record);
        self.tree.append_child(parent, kind, target);

        // Base classes list every derived class in their subClasses
        // collection, wherever the derived class itself lives.
        if kind == "class" {
            if let Some(base) = base_class {
                let mut sub = record_for_subclass;
                sub.parent = Some(base);
                self.record_parsed("subClass", sub);
            }
        }

        for (sub_kind, sub_records) in [
            ("example", examples),
            ("issue", issues),
            ("comment", comments),
        ] {
            for mut sub in sub_records {
                if sub.parent.is_none() {
                    sub.parent = Some(full_path.clone());
                }
                self.record_parsed(sub_kind, sub);
            }
        }
    }
}
