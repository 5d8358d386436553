//! Keyed lists
//!
//! A keyed list maps key values to entry elements. Entries are containers
//! built from the list's entry schema; their key leaves are assigned through
//! the entry's field setters, and each entry registers at the list path plus a
//! key predicate (`[name=eth0]`, or `[a='1' b='2']` for composite keys).
//! Lists without a key get a generated key per entry.

use indexmap::IndexMap;
use std::time::Instant;
use uuid::Uuid;
use yangtree_core_types::ElementId;

use super::element::{unsupported, ElementSpec};
use super::schema::ListSchema;
use super::Tree;
use crate::errors::{Result, YangError};
use crate::value::Value;
use crate::{log_op_end, log_op_start};

/// Key leaf names of a list, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpec {
    fields: Vec<String>,
}

impl KeySpec {
    /// Parse a space-separated key statement; empty means keyless
    pub fn parse(spec: &str) -> Self {
        Self {
            fields: spec.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Split a key value into one part per key leaf
    ///
    /// A single-key list takes the whole value; composite values are split on
    /// single spaces.
    ///
    /// # Errors
    ///
    /// `KeyArity` if a composite value has the wrong number of parts.
    pub fn split<'k>(&self, list: &str, key: &'k str) -> Result<Vec<&'k str>> {
        if self.fields.len() == 1 {
            return Ok(vec![key]);
        }
        let parts: Vec<&str> = key.split(' ').collect();
        if parts.len() != self.fields.len() {
            return Err(YangError::KeyArity {
                list: list.to_string(),
                expected: self.fields.clone(),
                got: key.to_string(),
            });
        }
        Ok(parts)
    }

    /// Path predicate for a split key value
    pub fn predicate(&self, parts: &[&str]) -> String {
        if let ([field], [part]) = (self.fields.as_slice(), parts) {
            return format!("[{}={}]", field, part);
        }
        let pairs: Vec<String> = self
            .fields
            .iter()
            .zip(parts)
            .map(|(field, part)| format!("{}='{}'", field, part))
            .collect();
        format!("[{}]", pairs.join(" "))
    }
}

/// Base value of a list element: key value → entry element
#[derive(Debug, Clone)]
pub struct KeyedList {
    schema: ListSchema,
    members: IndexMap<String, ElementId>,
}

impl KeyedList {
    pub fn new(schema: ListSchema) -> Self {
        Self {
            schema,
            members: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &ListSchema {
        &self.schema
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<ElementId> {
        self.members.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Key values; insertion order for ordered lists
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// `(key, entry)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (&str, ElementId)> {
        self.members.iter().map(|(k, id)| (k.as_str(), *id))
    }

    pub(crate) fn insert(&mut self, key: String, entry: ElementId) {
        self.members.insert(key, entry);
    }

    pub(crate) fn take(&mut self, key: &str) -> Option<ElementId> {
        if self.schema.is_ordered() {
            self.members.shift_remove(key)
        } else {
            self.members.swap_remove(key)
        }
    }

    pub(crate) fn remove_member(&mut self, entry: ElementId) {
        self.members.retain(|_, id| *id != entry);
    }

    pub(crate) fn drain(&mut self) -> Vec<ElementId> {
        self.members.drain(..).map(|(_, id)| id).collect()
    }
}

/// Mutable handle on one list element of a tree
pub struct KeyedListMut<'t> {
    tree: &'t mut Tree,
    id: ElementId,
}

impl<'t> KeyedListMut<'t> {
    pub(crate) fn new(tree: &'t mut Tree, id: ElementId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Add an entry and return its key value
    ///
    /// Keyless lists ignore `key` and return a generated one. Keyed lists
    /// build the entry at its predicate path and assign each key leaf in key
    /// order; if any step fails the partial entry is torn down and
    /// unregistered.
    ///
    /// # Errors
    ///
    /// - `DuplicateKey` if the key value is already present
    /// - `KeyArity` if no key is given or a composite key has the wrong arity
    /// - whatever the key leaves' types reject the key parts with
    pub fn add(&mut self, key: Option<&str>) -> Result<String> {
        let list_path = self.tree.element(self.id)?.path().to_string();
        log_op_start!("list_add", path = list_path.as_str());
        let start = Instant::now();

        let key = self.add_impl(key, &list_path)?;

        log_op_end!(
            "list_add",
            duration_ms = start.elapsed().as_millis() as u64,
            path = list_path.as_str(),
            key = key.as_str()
        );
        Ok(key)
    }

    fn add_impl(&mut self, key: Option<&str>, list_path: &str) -> Result<String> {
        let plan = self.tree.plan_set(self.id, None)?;
        let (schema, name, helper) = {
            let element = self.tree.element(self.id)?;
            let list = self.tree.keyed_list(self.id)?;
            (
                list.schema().clone(),
                element.yang_name().to_string(),
                element.path_helper().cloned(),
            )
        };
        let key_spec = schema.key();

        let (key, parts, register_path) = if key_spec.is_empty() {
            (Uuid::now_v7().to_string(), Vec::new(), list_path.to_string())
        } else {
            let key = key.ok_or_else(|| YangError::KeyArity {
                list: list_path.to_string(),
                expected: key_spec.fields().to_vec(),
                got: String::new(),
            })?;
            if self.tree.keyed_list(self.id)?.contains(key) {
                return Err(YangError::DuplicateKey {
                    list: list_path.to_string(),
                    key: key.to_string(),
                });
            }
            let parts = key_spec.split(list_path, key)?;
            let predicate = key_spec.predicate(&parts);
            (
                key.to_string(),
                parts.into_iter().map(str::to_string).collect::<Vec<_>>(),
                format!("{}{}", list_path, predicate),
            )
        };

        let spec = ElementSpec::new(name)
            .parent(self.id)
            .maybe_path_helper(helper)
            .register_path(register_path);
        let entry = self.tree.instantiate_container(schema.entry(), spec)?;

        // key setters mark the list chain as they go; a later part failing
        // must not leave those marks behind
        let saved = self.tree.changed_chain(self.id)?;
        for (field, part) in key_spec.fields().iter().zip(&parts) {
            if let Err(err) = self.set_key(entry, field, part) {
                self.tree.remove_subtree(entry)?;
                self.tree.restore_changed(saved)?;
                return Err(err);
            }
        }

        self.tree.keyed_list_mut(self.id)?.insert(key.clone(), entry);
        self.tree.commit_set(plan)?;
        Ok(key)
    }

    fn set_key(&mut self, entry: ElementId, field: &str, part: &str) -> Result<()> {
        let setter = self
            .tree
            .element(entry)?
            .fields()
            .setter(field)
            .ok_or_else(|| unsupported(&format!("set_{}", field), "list entry"))?;
        setter(&mut *self.tree, &Value::from(part))
    }

    /// Remove the entry for `key`, unregistering its whole subtree
    ///
    /// # Errors
    ///
    /// `MissingKey` if no such entry exists.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let list_path = self.tree.element(self.id)?.path().to_string();
        log_op_start!("list_delete", path = list_path.as_str(), key = key);
        let start = Instant::now();

        let plan = self.tree.plan_set(self.id, None)?;
        let entry = self
            .tree
            .keyed_list_mut(self.id)?
            .take(key)
            .ok_or_else(|| YangError::MissingKey {
                list: list_path.clone(),
                key: key.to_string(),
            })?;
        self.tree.remove_subtree(entry)?;
        self.tree.commit_set(plan)?;

        log_op_end!(
            "list_delete",
            duration_ms = start.elapsed().as_millis() as u64,
            path = list_path.as_str(),
            key = key
        );
        Ok(())
    }

    /// Entry element for `key`
    ///
    /// # Errors
    ///
    /// `MissingKey` for an unknown key; nothing is created.
    pub fn entry(&self, key: &str) -> Result<ElementId> {
        self.tree
            .keyed_list(self.id)?
            .get(key)
            .ok_or_else(|| YangError::MissingKey {
                list: self
                    .tree
                    .element(self.id)
                    .map(|e| e.path().to_string())
                    .unwrap_or_default(),
                key: key.to_string(),
            })
    }

    /// Snapshot keyed by key value
    pub fn get(&self, filter: bool) -> Result<Value> {
        self.tree.get(self.id, filter)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tree
            .keyed_list(self.id)
            .map(|list| list.contains(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tree
            .keyed_list(self.id)
            .map(KeyedList::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<String> {
        self.tree
            .keyed_list(self.id)
            .map(|list| list.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
