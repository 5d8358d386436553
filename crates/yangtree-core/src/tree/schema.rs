//! Node schemas
//!
//! The compiled description of a subtree, as a schema compiler would hand it
//! over: leaf types, leaf-list types, containers with their children and
//! choices, and keyed lists. `Tree::instantiate` turns these into elements.

use indexmap::IndexMap;
use std::rc::Rc;

use super::element::ChoiceMember;
use super::keyed_list::KeySpec;
use crate::types::{LeafType, TypedListType};
use crate::value::Value;

/// What kind of node a schema describes
#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf(LeafType),
    LeafList(TypedListType),
    Container(Rc<ContainerSchema>),
    List(ListSchema),
}

/// A schema node: its kind plus an optional default
#[derive(Debug, Clone)]
pub struct NodeSchema {
    kind: NodeKind,
    default: Value,
}

impl NodeSchema {
    pub fn leaf(ty: LeafType) -> Self {
        Self::from_kind(NodeKind::Leaf(ty))
    }

    pub fn leaf_list(ty: TypedListType) -> Self {
        Self::from_kind(NodeKind::LeafList(ty))
    }

    pub fn container(schema: ContainerSchema) -> Self {
        Self::from_kind(NodeKind::Container(Rc::new(schema)))
    }

    pub fn list(schema: ListSchema) -> Self {
        Self::from_kind(NodeKind::List(schema))
    }

    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            default: Value::Empty,
        }
    }

    /// Attach a default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// A child slot of a container schema
#[derive(Debug, Clone)]
pub struct ChildSchema {
    pub node: NodeSchema,
    pub choice: Option<ChoiceMember>,
}

/// A container's children, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ContainerSchema {
    children: IndexMap<String, ChildSchema>,
}

impl ContainerSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a child node
    pub fn child(mut self, name: impl Into<String>, node: NodeSchema) -> Self {
        self.children
            .insert(name.into(), ChildSchema { node, choice: None });
        self
    }

    /// Declare a child node that belongs to `choice`/`case`
    pub fn case_child(
        mut self,
        choice: &str,
        case: &str,
        name: impl Into<String>,
        node: NodeSchema,
    ) -> Self {
        self.children.insert(
            name.into(),
            ChildSchema {
                node,
                choice: Some(ChoiceMember::new(choice, case)),
            },
        );
        self
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ChildSchema)> {
        self.children.iter().map(|(name, child)| (name.as_str(), child))
    }

    pub fn get(&self, name: &str) -> Option<&ChildSchema> {
        self.children.get(name)
    }
}

/// Keyed list factory: key spec, entry schema and ordering
#[derive(Debug, Clone)]
pub struct ListSchema {
    key: KeySpec,
    entry: Rc<ContainerSchema>,
    ordered: bool,
}

impl ListSchema {
    /// `key_spec` is the space-separated key leaf names; empty for a keyless
    /// list. Lists are unordered unless `ordered(true)` is applied.
    pub fn new(key_spec: &str, entry: ContainerSchema) -> Self {
        Self {
            key: KeySpec::parse(key_spec),
            entry: Rc::new(entry),
            ordered: false,
        }
    }

    /// Preserve insertion order across deletes
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn key(&self) -> &KeySpec {
        &self.key
    }

    pub fn entry(&self) -> &Rc<ContainerSchema> {
        &self.entry
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }
}
