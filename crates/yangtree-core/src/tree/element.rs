//! Tree elements
//!
//! An `Element` layers tree metadata (name, parent, path, change tracking,
//! default, choice membership) over a base value. The base is reached through
//! the `NodeBase` capability trait; operations a base does not support fail
//! with `CapabilityUnsupported` instead of being looked up dynamically.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use yangtree_core_types::ElementId;

use super::keyed_list::KeyedList;
use super::path_helper::SharedPathHelper;
use super::Tree;
use crate::errors::{Result, YangError};
use crate::types::{LeafType, LeafValue, TypedList};
use crate::value::Value;

/// Capability surface of a wrapped base value
///
/// Every mutating operation must be atomic: an `Err` leaves the base exactly
/// as it was.
pub trait NodeBase: fmt::Debug {
    /// Name used in capability errors
    fn type_name(&self) -> String;

    /// The value currently held, as supplied (used for default comparison)
    fn supplied(&self) -> Value;

    /// Read-only snapshot
    fn snapshot(&self) -> Value {
        self.supplied()
    }

    fn append(&mut self, _raw: &Value) -> Result<Value> {
        Err(unsupported("append", self.type_name()))
    }

    fn insert(&mut self, _index: usize, _raw: &Value) -> Result<Value> {
        Err(unsupported("insert", self.type_name()))
    }

    fn remove(&mut self, _raw: &Value) -> Result<Value> {
        Err(unsupported("remove", self.type_name()))
    }

    fn pop(&mut self, _index: Option<usize>) -> Result<Value> {
        Err(unsupported("pop", self.type_name()))
    }

    fn extend(&mut self, _values: &[Value]) -> Result<Vec<Value>> {
        Err(unsupported("extend", self.type_name()))
    }

    /// Return to the empty state, handing back whatever was removed
    fn clear(&mut self) -> Result<Vec<Value>> {
        Err(unsupported("unset", self.type_name()))
    }
}

pub(crate) fn unsupported(op: &str, base_type: impl Into<String>) -> YangError {
    YangError::CapabilityUnsupported {
        op: op.to_string(),
        base_type: base_type.into(),
    }
}

/// A single-valued leaf: its type and its current value, if set
#[derive(Debug, Clone)]
pub struct LeafSlot {
    ty: LeafType,
    value: Option<LeafValue>,
}

impl LeafSlot {
    pub fn new(ty: LeafType) -> Self {
        Self { ty, value: None }
    }

    /// A slot holding `raw` from the start
    ///
    /// # Errors
    ///
    /// Whatever the leaf type's factory rejects `raw` with.
    pub fn with_value(ty: LeafType, raw: &Value) -> Result<Self> {
        let value = ty.construct(raw)?;
        Ok(Self { ty, value })
    }

    pub fn leaf_type(&self) -> &LeafType {
        &self.ty
    }

    pub fn value(&self) -> Option<&LeafValue> {
        self.value.as_ref()
    }

    pub(crate) fn store(&mut self, value: Option<LeafValue>) {
        self.value = value;
    }
}

impl NodeBase for LeafSlot {
    fn type_name(&self) -> String {
        self.ty.to_string()
    }

    fn supplied(&self) -> Value {
        self.value.as_ref().map(LeafValue::to_value).unwrap_or_default()
    }

    fn clear(&mut self) -> Result<Vec<Value>> {
        let old = self.supplied();
        self.value = None;
        Ok(if old.is_empty() { Vec::new() } else { vec![old] })
    }
}

impl NodeBase for TypedList {
    fn type_name(&self) -> String {
        self.list_type().to_string()
    }

    fn supplied(&self) -> Value {
        if self.is_empty() {
            Value::Empty
        } else {
            Value::List(self.get())
        }
    }

    fn snapshot(&self) -> Value {
        Value::List(self.get())
    }

    fn append(&mut self, raw: &Value) -> Result<Value> {
        TypedList::append(self, raw)
    }

    fn insert(&mut self, index: usize, raw: &Value) -> Result<Value> {
        TypedList::insert(self, index, raw)
    }

    fn remove(&mut self, raw: &Value) -> Result<Value> {
        TypedList::remove(self, raw)
    }

    fn pop(&mut self, index: Option<usize>) -> Result<Value> {
        TypedList::pop(self, index)
    }

    fn extend(&mut self, values: &[Value]) -> Result<Vec<Value>> {
        TypedList::extend(self, values)
    }

    fn clear(&mut self) -> Result<Vec<Value>> {
        let mut removed = Vec::with_capacity(self.len());
        while !self.is_empty() {
            removed.push(TypedList::pop(self, Some(0))?);
        }
        Ok(removed)
    }
}

/// The base values a tree element can wrap
#[derive(Debug)]
pub enum NodeValue {
    Leaf(LeafSlot),
    LeafList(TypedList),
    /// Children live in the element's child map
    Container,
    List(KeyedList),
    /// Externally supplied base type
    Custom(Box<dyn NodeBase>),
}

impl NodeValue {
    fn delegate(&self) -> Option<&dyn NodeBase> {
        match self {
            NodeValue::Leaf(slot) => Some(slot as &dyn NodeBase),
            NodeValue::LeafList(list) => Some(list as &dyn NodeBase),
            NodeValue::Custom(base) => Some(&**base),
            NodeValue::Container | NodeValue::List(_) => None,
        }
    }

    fn delegate_mut(&mut self) -> Option<&mut dyn NodeBase> {
        match self {
            NodeValue::Leaf(slot) => Some(slot as &mut dyn NodeBase),
            NodeValue::LeafList(list) => Some(list as &mut dyn NodeBase),
            NodeValue::Custom(base) => Some(&mut **base),
            NodeValue::Container | NodeValue::List(_) => None,
        }
    }

    fn with_mut<R>(&mut self, op: &str, f: impl FnOnce(&mut dyn NodeBase) -> Result<R>) -> Result<R> {
        let name = self.type_name();
        match self.delegate_mut() {
            Some(base) => f(base),
            None => Err(unsupported(op, name)),
        }
    }
}

impl NodeBase for NodeValue {
    fn type_name(&self) -> String {
        match self {
            NodeValue::Container => "container".to_string(),
            NodeValue::List(_) => "list".to_string(),
            other => other
                .delegate()
                .map(|base| base.type_name())
                .unwrap_or_default(),
        }
    }

    fn supplied(&self) -> Value {
        self.delegate().map(|base| base.supplied()).unwrap_or_default()
    }

    fn snapshot(&self) -> Value {
        self.delegate().map(|base| base.snapshot()).unwrap_or_default()
    }

    fn append(&mut self, raw: &Value) -> Result<Value> {
        self.with_mut("append", |base| base.append(raw))
    }

    fn insert(&mut self, index: usize, raw: &Value) -> Result<Value> {
        self.with_mut("insert", |base| base.insert(index, raw))
    }

    fn remove(&mut self, raw: &Value) -> Result<Value> {
        self.with_mut("remove", |base| base.remove(raw))
    }

    fn pop(&mut self, index: Option<usize>) -> Result<Value> {
        self.with_mut("pop", |base| base.pop(index))
    }

    fn extend(&mut self, values: &[Value]) -> Result<Vec<Value>> {
        self.with_mut("extend", |base| base.extend(values))
    }

    fn clear(&mut self) -> Result<Vec<Value>> {
        self.with_mut("unset", |base| base.clear())
    }
}

/// Membership of an element in one case of a choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMember {
    pub choice: String,
    pub case: String,
}

impl ChoiceMember {
    pub fn new(choice: impl Into<String>, case: impl Into<String>) -> Self {
        Self {
            choice: choice.into(),
            case: case.into(),
        }
    }
}

/// Choices declared by a container: choice → case → member names
#[derive(Debug, Clone, Default)]
pub struct ChoiceTable {
    choices: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl ChoiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `member` as part of `choice`/`case`
    pub fn add_member(&mut self, choice: &str, case: &str, member: &str) {
        self.choices
            .entry(choice.to_string())
            .or_default()
            .entry(case.to_string())
            .or_default()
            .push(member.to_string());
    }

    /// Members of every case of the active member's choice except its own
    ///
    /// Yields `(case, member)` pairs; empty when the choice is not declared
    /// here.
    pub fn sibling_members<'a>(
        &'a self,
        active: &'a ChoiceMember,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.choices
            .get(&active.choice)
            .into_iter()
            .flat_map(|cases| cases.iter())
            .filter(move |(case, _)| **case != active.case)
            .flat_map(|(case, members)| members.iter().map(move |m| (case.as_str(), m.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Field setter: assigns a raw value to one child of a container
pub type SetterHook = Rc<dyn Fn(&mut Tree, &Value) -> Result<()>>;

/// Field unsetter: returns one child of a container to its default
pub type UnsetterHook = Rc<dyn Fn(&mut Tree) -> Result<()>>;

/// Per-container dispatch table from field name to hooks
#[derive(Clone, Default)]
pub struct FieldTable {
    setters: HashMap<String, SetterHook>,
    unsetters: HashMap<String, UnsetterHook>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_setter(&mut self, field: impl Into<String>, hook: SetterHook) {
        self.setters.insert(field.into(), hook);
    }

    pub fn insert_unsetter(&mut self, field: impl Into<String>, hook: UnsetterHook) {
        self.unsetters.insert(field.into(), hook);
    }

    pub fn setter(&self, field: &str) -> Option<SetterHook> {
        self.setters.get(field).cloned()
    }

    pub fn unsetter(&self, field: &str) -> Option<UnsetterHook> {
        self.unsetters.get(field).cloned()
    }
}

impl fmt::Debug for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut setters: Vec<_> = self.setters.keys().collect();
        let mut unsetters: Vec<_> = self.unsetters.keys().collect();
        setters.sort();
        unsetters.sort();
        f.debug_struct("FieldTable")
            .field("setters", &setters)
            .field("unsetters", &unsetters)
            .finish()
    }
}

/// Construction parameters for `Tree::wrap` and `Tree::instantiate`
#[derive(Clone, Default)]
pub struct ElementSpec {
    pub(crate) name: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) path_helper: Option<SharedPathHelper>,
    pub(crate) default: Value,
    pub(crate) is_container: bool,
    pub(crate) is_leaf: bool,
    pub(crate) choice: Option<ChoiceMember>,
    pub(crate) register_path: Option<String>,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn path_helper(mut self, helper: SharedPathHelper) -> Self {
        self.path_helper = Some(helper);
        self
    }

    pub(crate) fn maybe_path_helper(mut self, helper: Option<SharedPathHelper>) -> Self {
        self.path_helper = helper;
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn container(mut self) -> Self {
        self.is_container = true;
        self
    }

    pub fn leaf(mut self) -> Self {
        self.is_leaf = true;
        self
    }

    pub fn choice(mut self, member: ChoiceMember) -> Self {
        self.choice = Some(member);
        self
    }

    pub(crate) fn maybe_choice(mut self, member: Option<ChoiceMember>) -> Self {
        self.choice = member;
        self
    }

    /// Register at `path` instead of the path derived from the parent
    pub fn register_path(mut self, path: impl Into<String>) -> Self {
        self.register_path = Some(path.into());
        self
    }
}

impl fmt::Debug for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSpec")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("path_helper", &self.path_helper.is_some())
            .field("default", &self.default)
            .field("is_container", &self.is_container)
            .field("is_leaf", &self.is_leaf)
            .field("choice", &self.choice)
            .field("register_path", &self.register_path)
            .finish()
    }
}

/// A tree node: metadata over a wrapped base value
pub struct Element<B = NodeValue> {
    pub(crate) id: ElementId,
    pub(crate) yang_name: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) path: String,
    pub(crate) path_helper: Option<SharedPathHelper>,
    pub(crate) default: Value,
    pub(crate) changed: bool,
    pub(crate) is_container: bool,
    pub(crate) is_leaf: bool,
    pub(crate) choice: Option<ChoiceMember>,
    pub(crate) base: B,
    pub(crate) children: IndexMap<String, ElementId>,
    pub(crate) fields: FieldTable,
    pub(crate) choices: ChoiceTable,
}

impl<B: NodeBase> Element<B> {
    /// Build from a spec with a resolved registration path
    ///
    /// The element starts changed iff its base already holds a value that
    /// differs from the default.
    pub(crate) fn new(id: ElementId, base: B, spec: ElementSpec, path: String) -> Self {
        let supplied = base.supplied();
        let changed = !supplied.is_empty() && supplied != spec.default;
        Self {
            id,
            yang_name: spec.name,
            parent: spec.parent,
            path,
            path_helper: spec.path_helper,
            default: spec.default,
            changed,
            is_container: spec.is_container,
            is_leaf: spec.is_leaf,
            choice: spec.choice,
            base,
            children: IndexMap::new(),
            fields: FieldTable::new(),
            choices: ChoiceTable::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn yang_name(&self) -> &str {
        &self.yang_name
    }

    /// Registration path
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Default value; `Value::Empty` when none was declared
    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub fn is_container(&self) -> bool {
        self.is_container
    }

    pub fn choice(&self) -> Option<&ChoiceMember> {
        self.choice.as_ref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn path_helper(&self) -> Option<&SharedPathHelper> {
        self.path_helper.as_ref()
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    /// Named children of a container, in declaration order
    pub fn children(&self) -> impl Iterator<Item = (&str, ElementId)> {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldTable {
        &mut self.fields
    }

    pub fn choices(&self) -> &ChoiceTable {
        &self.choices
    }

    pub fn choices_mut(&mut self) -> &mut ChoiceTable {
        &mut self.choices
    }
}

impl<B: fmt::Debug> fmt::Debug for Element<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("yang_name", &self.yang_name)
            .field("path", &self.path)
            .field("changed", &self.changed)
            .field("base", &self.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_base_rejects_list_ops() {
        let mut value = NodeValue::Leaf(LeafSlot::new(LeafType::string()));
        match value.append(&Value::from("x")) {
            Err(YangError::CapabilityUnsupported { op, base_type }) => {
                assert_eq!(op, "append");
                assert_eq!(base_type, "string");
            }
            other => panic!("expected CapabilityUnsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_container_rejects_list_ops() {
        let mut value = NodeValue::Container;
        assert!(matches!(
            value.pop(None),
            Err(YangError::CapabilityUnsupported { .. })
        ));
    }

    #[test]
    fn test_choice_table_siblings() {
        let mut table = ChoiceTable::new();
        table.add_member("transport", "tcp", "port");
        table.add_member("transport", "udp", "udp-port");
        table.add_member("transport", "udp", "checksum");

        let active = ChoiceMember::new("transport", "tcp");
        let siblings: Vec<_> = table.sibling_members(&active).collect();
        assert_eq!(siblings, vec![("udp", "udp-port"), ("udp", "checksum")]);

        let undeclared = ChoiceMember::new("other", "x");
        assert_eq!(table.sibling_members(&undeclared).count(), 0);
    }

    #[test]
    fn test_new_element_changed_against_default() {
        let slot = LeafSlot::with_value(LeafType::int8(), &Value::Int(3)).unwrap();
        let spec = ElementSpec::new("mtu").leaf().default_value(3i64);
        let el = Element::new(ElementId::new(0), slot, spec, "/mtu".to_string());
        assert!(!el.changed());

        let slot = LeafSlot::with_value(LeafType::int8(), &Value::Int(4)).unwrap();
        let spec = ElementSpec::new("mtu").leaf().default_value(3i64);
        let el = Element::new(ElementId::new(0), slot, spec, "/mtu".to_string());
        assert!(el.changed());
    }
}
