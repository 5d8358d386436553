//! Element arena
//!
//! A `Tree` owns every element of one configuration tree in a slot arena
//! indexed by `ElementId`. Parents own their children through the arena;
//! children only hold their parent's id, which is used for path computation
//! and for climbing change tracking. Freed slots are never reused, so a stale
//! id fails with `ElementNotFound` instead of aliasing a newer element. The
//! arena therefore grows with every element ever created: a long-lived tree
//! with heavy list churn keeps one empty slot per removed element.
//!
//! All registry traffic (register on construction, unregister on removal) goes
//! through this module so it can be logged uniformly.

pub mod element;
pub mod keyed_list;
pub mod path_helper;
pub mod reference;
pub mod schema;

use indexmap::IndexMap;
use std::rc::Rc;
use std::time::Instant;
use yangtree_core_types::schema::{EVENT_REGISTER, EVENT_UNREGISTER};
use yangtree_core_types::ElementId;

pub use element::{
    ChoiceMember, ChoiceTable, Element, ElementSpec, FieldTable, LeafSlot, NodeBase, NodeValue,
    SetterHook, UnsetterHook,
};
pub use keyed_list::{KeySpec, KeyedList, KeyedListMut};
pub use path_helper::{MemoryPathHelper, PathHelper, Registered, SharedPathHelper};
pub use schema::{ChildSchema, ContainerSchema, ListSchema, NodeKind, NodeSchema};

use crate::errors::{Result, YangError};
use crate::types::{union_mismatch, LeafType, LeafValue, ReferenceValue};
use crate::value::Value;
use crate::{log_op_end, log_op_start};
use element::unsupported;

/// Side effects of a `set` call, computed before anything is touched
#[derive(Default)]
pub(crate) struct SetPlan {
    marks: Vec<ElementId>,
    unsets: Vec<UnsetterHook>,
}

/// Arena of the elements of one tree
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Option<Element>>,
    live: usize,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get an element by id
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if the id was never allocated or its element
    /// has been removed.
    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(YangError::ElementNotFound { id })
    }

    /// Get a mutable reference to an element by id
    ///
    /// Schema compilers use this to extend an element's field and choice
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` as for [`Tree::element`].
    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(YangError::ElementNotFound { id })
    }

    /// Wrap `base` in a new element
    ///
    /// The element's path is the explicit register path if given, else the
    /// parent's path plus `/name`, else `/` for a root. It registers there
    /// when a path helper is attached, and joins its parent's child map when
    /// the parent is a container.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if the parent does not exist.
    pub fn wrap(&mut self, base: NodeValue, spec: ElementSpec) -> Result<ElementId> {
        let parent_path = match spec.parent {
            Some(parent) => Some(self.element(parent)?.path().to_string()),
            None => None,
        };
        let path = match (&spec.register_path, parent_path) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(parent_path)) => child_path(&parent_path, &spec.name),
            (None, None) => "/".to_string(),
        };

        let id = ElementId::new(self.slots.len());
        let name = spec.name.clone();
        let parent = spec.parent;
        let element = Element::new(id, base, spec, path);

        if let Some(parent) = parent {
            let parent = self.element_mut(parent)?;
            if matches!(parent.base, NodeValue::Container) {
                parent.children.insert(name, id);
            }
        }
        register(
            element.path_helper(),
            element.path(),
            Registered::Element(id),
        );
        self.slots.push(Some(element));
        self.live += 1;
        Ok(id)
    }

    /// Build a subtree from its schema and register all of it
    ///
    /// The spec supplies name, parent, path helper, choice membership and
    /// optional register path; the schema supplies base types, defaults and
    /// container wiring (field setters, unsetters, choice tables).
    ///
    /// # Errors
    ///
    /// Returns the first construction error; the partial subtree is removed
    /// and unregistered before returning.
    pub fn instantiate(&mut self, schema: &NodeSchema, spec: ElementSpec) -> Result<ElementId> {
        log_op_start!("instantiate", yang_name = spec.name.as_str());
        let start = Instant::now();

        let id = self.instantiate_node(schema, spec)?;

        let mut subtree = Vec::new();
        self.collect_subtree(id, &mut subtree)?;
        let path = self.element(id)?.path().to_string();
        log_op_end!(
            "instantiate",
            duration_ms = start.elapsed().as_millis() as u64,
            path = path.as_str(),
            subtree_len = subtree.len()
        );
        Ok(id)
    }

    fn instantiate_node(&mut self, schema: &NodeSchema, spec: ElementSpec) -> Result<ElementId> {
        let mut spec = spec;
        if !schema.default_value().is_empty() {
            spec = spec.default_value(schema.default_value().clone());
        }
        match schema.kind() {
            NodeKind::Leaf(ty) => {
                if !spec.default.is_empty() {
                    ty.construct(&spec.default)?;
                }
                self.wrap(NodeValue::Leaf(LeafSlot::new(ty.clone())), spec.leaf())
            }
            NodeKind::LeafList(ty) => self.wrap(NodeValue::LeafList(ty.empty()), spec),
            NodeKind::Container(container) => self.instantiate_container(container, spec),
            NodeKind::List(list) => {
                self.wrap(NodeValue::List(KeyedList::new(list.clone())), spec.container())
            }
        }
    }

    pub(crate) fn instantiate_container(
        &mut self,
        schema: &ContainerSchema,
        spec: ElementSpec,
    ) -> Result<ElementId> {
        let helper = spec.path_helper.clone();
        let id = self.wrap(NodeValue::Container, spec.container())?;
        if let Err(err) = self.populate(id, schema, helper) {
            self.remove_subtree(id)?;
            return Err(err);
        }
        Ok(id)
    }

    fn populate(
        &mut self,
        id: ElementId,
        schema: &ContainerSchema,
        helper: Option<SharedPathHelper>,
    ) -> Result<()> {
        for (name, child) in schema.children() {
            let spec = ElementSpec::new(name)
                .parent(id)
                .maybe_path_helper(helper.clone())
                .maybe_choice(child.choice.clone());
            let child_id = self.instantiate_node(&child.node, spec)?;

            let container = self.element_mut(id)?;
            if let Some(member) = &child.choice {
                container
                    .choices
                    .add_member(&member.choice, &member.case, name);
            }
            if matches!(child.node.kind(), NodeKind::Leaf(_)) {
                container.fields.insert_setter(
                    name,
                    Rc::new(move |tree: &mut Tree, raw: &Value| tree.set_leaf(child_id, raw)),
                );
            }
            container
                .fields
                .insert_unsetter(name, Rc::new(move |tree: &mut Tree| tree.unset(child_id)));
        }
        Ok(())
    }

    /// Mark `id` changed and climb to the root
    ///
    /// With `choice`, every member of every other case of that choice in
    /// `id`'s choice table is unset first. An element with its own choice
    /// membership passes it up so its parent can deactivate sibling cases.
    ///
    /// # Errors
    ///
    /// Returns `UnmappedChoiceCase` if a sibling case member has no unset
    /// hook; this is checked along the whole chain before anything runs.
    pub fn set(&mut self, id: ElementId, choice: Option<&ChoiceMember>) -> Result<()> {
        let plan = self.plan_set(id, choice)?;
        self.commit_set(plan)
    }

    pub(crate) fn plan_set(
        &self,
        id: ElementId,
        choice: Option<&ChoiceMember>,
    ) -> Result<SetPlan> {
        let mut plan = SetPlan::default();
        let mut choice = choice.cloned();
        let mut current = Some(id);
        while let Some(cur) = current {
            let element = self.element(cur)?;
            if let Some(active) = &choice {
                for (case, member) in element.choices.sibling_members(active) {
                    let hook = element.fields.unsetter(member).ok_or_else(|| {
                        YangError::UnmappedChoiceCase {
                            choice: active.choice.clone(),
                            case: case.to_string(),
                            member: member.to_string(),
                        }
                    })?;
                    plan.unsets.push(hook);
                }
            }
            if choice.is_none() {
                choice = element.choice.clone();
            }
            plan.marks.push(cur);
            current = element.parent;
        }
        Ok(plan)
    }

    pub(crate) fn commit_set(&mut self, plan: SetPlan) -> Result<()> {
        let SetPlan { marks, unsets } = plan;
        self.run_unsets(unsets)?;
        self.mark_changed(marks)
    }

    fn run_unsets(&mut self, unsets: Vec<UnsetterHook>) -> Result<()> {
        for hook in unsets {
            hook(&mut *self)?;
        }
        Ok(())
    }

    fn mark_changed(&mut self, marks: Vec<ElementId>) -> Result<()> {
        for id in marks {
            self.element_mut(id)?.changed = true;
        }
        Ok(())
    }

    /// `changed` flags from `id` up to the root
    pub(crate) fn changed_chain(&self, id: ElementId) -> Result<Vec<(ElementId, bool)>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let element = self.element(cur)?;
            chain.push((cur, element.changed()));
            current = element.parent;
        }
        Ok(chain)
    }

    pub(crate) fn restore_changed(&mut self, chain: Vec<(ElementId, bool)>) -> Result<()> {
        for (id, changed) in chain {
            self.element_mut(id)?.changed = changed;
        }
        Ok(())
    }

    /// Append to a leaf-list (or other appendable base)
    ///
    /// The stored element registers at `path/element`.
    ///
    /// # Errors
    ///
    /// `CapabilityUnsupported` if the base cannot append, otherwise the base's
    /// validation error. A rejected append changes nothing.
    pub fn append(&mut self, id: ElementId, raw: &Value) -> Result<Value> {
        let plan = self.plan_set(id, None)?;
        let stored = self.element_mut(id)?.base.append(raw)?;
        self.commit_set(plan)?;
        self.register_member(id, &stored)?;
        Ok(stored)
    }

    /// Insert before `index`
    pub fn insert(&mut self, id: ElementId, index: usize, raw: &Value) -> Result<Value> {
        let plan = self.plan_set(id, None)?;
        let stored = self.element_mut(id)?.base.insert(index, raw)?;
        self.commit_set(plan)?;
        self.register_member(id, &stored)?;
        Ok(stored)
    }

    /// Remove the first element equal to `raw` and unregister it
    pub fn remove(&mut self, id: ElementId, raw: &Value) -> Result<Value> {
        let plan = self.plan_set(id, None)?;
        let removed = self.element_mut(id)?.base.remove(raw)?;
        self.commit_set(plan)?;
        self.unregister_member(id, &removed)?;
        Ok(removed)
    }

    /// Remove the element at `index` (or the last) and unregister it
    pub fn pop(&mut self, id: ElementId, index: Option<usize>) -> Result<Value> {
        let plan = self.plan_set(id, None)?;
        let removed = self.element_mut(id)?.base.pop(index)?;
        self.commit_set(plan)?;
        self.unregister_member(id, &removed)?;
        Ok(removed)
    }

    /// Append every value; each stored element registers exactly once
    pub fn extend(&mut self, id: ElementId, values: &[Value]) -> Result<Vec<Value>> {
        let plan = self.plan_set(id, None)?;
        let stored = self.element_mut(id)?.base.extend(values)?;
        self.commit_set(plan)?;
        for value in &stored {
            self.register_member(id, value)?;
        }
        Ok(stored)
    }

    /// Assign a leaf's value
    ///
    /// Reference leaves, and unions with a reference member, are resolved
    /// against the registry; other types go through their factory.
    /// `Value::Empty` unsets.
    ///
    /// # Errors
    ///
    /// `CapabilityUnsupported` if `id` is not a leaf, otherwise the factory,
    /// resolution or sibling-case unset error. A rejected value leaves the
    /// leaf untouched.
    pub fn set_leaf(&mut self, id: ElementId, raw: &Value) -> Result<()> {
        let SetPlan { marks, unsets } = self.plan_set(id, None)?;
        let ty = match &self.element(id)?.base {
            NodeValue::Leaf(slot) => slot.leaf_type().clone(),
            other => return Err(unsupported("set_leaf", other.type_name())),
        };
        let value = self.construct_leaf(&ty, id, raw)?;
        self.run_unsets(unsets)?;
        if let NodeValue::Leaf(slot) = &mut self.element_mut(id)?.base {
            slot.store(value);
        }
        self.mark_changed(marks)
    }

    fn construct_leaf(
        &mut self,
        ty: &LeafType,
        id: ElementId,
        raw: &Value,
    ) -> Result<Option<LeafValue>> {
        match ty {
            LeafType::Reference(reference) => Ok(Some(LeafValue::Reference(
                self.resolve_reference(reference, id, raw)?,
            ))),
            LeafType::Union(candidates) if ty.involves_reference() => {
                if raw.is_empty() {
                    return Ok(None);
                }
                for candidate in candidates {
                    if let Ok(Some(value)) = self.construct_leaf(candidate, id, raw) {
                        return Ok(Some(value));
                    }
                }
                Err(union_mismatch(raw, candidates))
            }
            other => other.construct(raw),
        }
    }

    /// Return an element to its default state
    ///
    /// Leaves lose their value, leaf-lists are emptied (members unregistered),
    /// containers unset each child, lists drop every entry. The changed flag is
    /// not cleared.
    pub fn unset(&mut self, id: ElementId) -> Result<()> {
        let element = self.element(id)?;
        let children: Vec<ElementId> = element.children.values().copied().collect();
        let is_container = matches!(element.base, NodeValue::Container);
        let is_leaf_list = matches!(element.base, NodeValue::LeafList(_));

        if is_container {
            for child in children {
                self.unset(child)?;
            }
            return Ok(());
        }
        let entries = match &mut self.element_mut(id)?.base {
            NodeValue::List(list) => Some(list.drain()),
            _ => None,
        };
        if let Some(entries) = entries {
            for entry in entries {
                self.remove_subtree(entry)?;
            }
            return Ok(());
        }
        let removed = self.element_mut(id)?.base.clear()?;
        if is_leaf_list {
            for value in &removed {
                self.unregister_member(id, value)?;
            }
        }
        Ok(())
    }

    /// Current value of an element
    ///
    /// Unset leaves read as their default; live reference pointers are
    /// re-resolved on every read.
    ///
    /// # Errors
    ///
    /// `ElementNotFound`, or `InvalidPointer` for a pointer that no longer
    /// resolves to exactly one element.
    pub fn value(&self, id: ElementId) -> Result<Value> {
        let element = self.element(id)?;
        match &element.base {
            NodeValue::Leaf(slot) => match slot.value() {
                Some(LeafValue::Reference(ReferenceValue::Pointer { path })) => {
                    self.read_pointer(id, path)
                }
                Some(value) => {
                    let value = value.to_value();
                    Ok(if value.is_empty() {
                        element.default.clone()
                    } else {
                        value
                    })
                }
                None => Ok(element.default.clone()),
            },
            NodeValue::Container | NodeValue::List(_) => self.get(id, false),
            other => Ok(other.snapshot()),
        }
    }

    /// Snapshot of an element's subtree
    ///
    /// Containers yield a map of children, lists a map keyed by key value.
    /// With `filter`, container children that never changed are omitted.
    pub fn get(&self, id: ElementId, filter: bool) -> Result<Value> {
        let element = self.element(id)?;
        match &element.base {
            NodeValue::Container => {
                let mut map = IndexMap::new();
                for (name, child) in element.children() {
                    if filter && !self.element(child)?.changed() {
                        continue;
                    }
                    map.insert(name.to_string(), self.get(child, filter)?);
                }
                Ok(Value::Map(map))
            }
            NodeValue::List(list) => {
                let mut map = IndexMap::new();
                for (key, entry) in list.entries() {
                    map.insert(key.to_string(), self.get(entry, filter)?);
                }
                Ok(Value::Map(map))
            }
            _ => self.value(id),
        }
    }

    /// Child of a container by name
    ///
    /// # Errors
    ///
    /// Returns `ChildNotFound` if the container has no such child.
    pub fn child(&self, id: ElementId, name: &str) -> Result<ElementId> {
        let element = self.element(id)?;
        element
            .children
            .get(name)
            .copied()
            .ok_or_else(|| YangError::ChildNotFound {
                parent: element.path().to_string(),
                name: name.to_string(),
            })
    }

    /// Follow a chain of child names down from `id`
    pub fn descend(&self, id: ElementId, names: &[&str]) -> Result<ElementId> {
        names
            .iter()
            .try_fold(id, |current, name| self.child(current, name))
    }

    /// Read-only view of a list element's entries
    ///
    /// # Errors
    ///
    /// `CapabilityUnsupported` if `id` is not a list.
    pub fn keyed_list(&self, id: ElementId) -> Result<&KeyedList> {
        match &self.element(id)?.base {
            NodeValue::List(list) => Ok(list),
            other => Err(unsupported("keys", other.type_name())),
        }
    }

    pub(crate) fn keyed_list_mut(&mut self, id: ElementId) -> Result<&mut KeyedList> {
        match &mut self.element_mut(id)?.base {
            NodeValue::List(list) => Ok(list),
            other => Err(unsupported("add", other.type_name())),
        }
    }

    /// Mutable handle on a list element
    ///
    /// # Errors
    ///
    /// `CapabilityUnsupported` if `id` is not a list.
    pub fn list(&mut self, id: ElementId) -> Result<KeyedListMut<'_>> {
        self.keyed_list_mut(id)?;
        Ok(KeyedListMut::new(self, id))
    }

    /// Remove an element and everything below it, unregistering all of it
    ///
    /// The element is detached from its parent's child map or list.
    pub fn remove_subtree(&mut self, id: ElementId) -> Result<()> {
        let mut doomed = Vec::new();
        self.collect_subtree(id, &mut doomed)?;

        let (parent, name) = {
            let element = self.element(id)?;
            (element.parent, element.yang_name.clone())
        };
        if let Some(parent) = parent {
            if let Ok(parent) = self.element_mut(parent) {
                match &mut parent.base {
                    NodeValue::Container => {
                        if parent.children.get(&name) == Some(&id) {
                            parent.children.shift_remove(&name);
                        }
                    }
                    NodeValue::List(list) => list.remove_member(id),
                    _ => {}
                }
            }
        }

        for doomed_id in doomed {
            let Some(element) = self
                .slots
                .get_mut(doomed_id.index())
                .and_then(Option::take)
            else {
                continue;
            };
            self.live -= 1;
            if let NodeValue::LeafList(list) = &element.base {
                for value in list.iter() {
                    unregister(
                        element.path_helper(),
                        &child_path(element.path(), &value.to_string()),
                        &Registered::Member {
                            owner: doomed_id,
                            value: value.clone(),
                        },
                    );
                }
            }
            unregister(
                element.path_helper(),
                element.path(),
                &Registered::Element(doomed_id),
            );
        }
        Ok(())
    }

    /// Post-order ids of `id`'s subtree, children first
    fn collect_subtree(&self, id: ElementId, out: &mut Vec<ElementId>) -> Result<()> {
        let element = self.element(id)?;
        for (_, child) in element.children() {
            self.collect_subtree(child, out)?;
        }
        if let NodeValue::List(list) = &element.base {
            for (_, entry) in list.entries() {
                self.collect_subtree(entry, out)?;
            }
        }
        out.push(id);
        Ok(())
    }

    fn register_member(&self, owner: ElementId, value: &Value) -> Result<()> {
        let element = self.element(owner)?;
        register(
            element.path_helper(),
            &child_path(element.path(), &value.to_string()),
            Registered::Member {
                owner,
                value: value.clone(),
            },
        );
        Ok(())
    }

    fn unregister_member(&self, owner: ElementId, value: &Value) -> Result<()> {
        let element = self.element(owner)?;
        unregister(
            element.path_helper(),
            &child_path(element.path(), &value.to_string()),
            &Registered::Member {
                owner,
                value: value.clone(),
            },
        );
        Ok(())
    }
}

pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

fn register(helper: Option<&SharedPathHelper>, path: &str, target: Registered) {
    if let Some(helper) = helper {
        tracing::debug!(event = EVENT_REGISTER, path = path, target = ?target);
        helper.borrow_mut().register(path, target);
    }
}

fn unregister(helper: Option<&SharedPathHelper>, path: &str, target: &Registered) {
    if let Some(helper) = helper {
        tracing::debug!(event = EVENT_UNREGISTER, path = path, target = ?target);
        helper.borrow_mut().unregister_entry(path, target);
    }
}
