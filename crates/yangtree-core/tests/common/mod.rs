use std::cell::RefCell;
use std::rc::Rc;

use yangtree_core::types::{LeafType, ReferenceType, TypedListType};
use yangtree_core::{
    ContainerSchema, ElementId, ElementSpec, ListSchema, MemoryPathHelper, NodeSchema,
    SharedPathHelper, Tree,
};

/// A fresh registry plus the trait-object handle elements hold
#[allow(dead_code)]
pub fn new_registry() -> (Rc<RefCell<MemoryPathHelper>>, SharedPathHelper) {
    let registry = MemoryPathHelper::shared();
    let shared: SharedPathHelper = registry.clone();
    (registry, shared)
}

/// Entry schema of `/interfaces/interface`
///
/// `name` (key), `mtu` (uint16, default 1500), `description`, `address`
/// (leaf-list of strings), and a `transport` choice with cases `tcp`
/// (`port`) and `udp` (`udp-port`, `checksum`).
#[allow(dead_code)]
pub fn interface_entry() -> ContainerSchema {
    ContainerSchema::new()
        .child("name", NodeSchema::leaf(LeafType::string()))
        .child(
            "mtu",
            NodeSchema::leaf(LeafType::uint16()).with_default(1500u32),
        )
        .child("description", NodeSchema::leaf(LeafType::string()))
        .child(
            "address",
            NodeSchema::leaf_list(TypedListType::new(vec![LeafType::string()])),
        )
        .case_child(
            "transport",
            "tcp",
            "port",
            NodeSchema::leaf(LeafType::uint16()),
        )
        .case_child(
            "transport",
            "udp",
            "udp-port",
            NodeSchema::leaf(LeafType::uint16()),
        )
        .case_child("transport", "udp", "checksum", NodeSchema::leaf(LeafType::Bool))
}

/// Root schema: `/interfaces/interface` keyed by `name`, `/system/mtu`, and
/// `/mgmt` holding reference leaves into both
#[allow(dead_code)]
pub fn device_schema(ordered: bool) -> NodeSchema {
    let interfaces = ContainerSchema::new().child(
        "interface",
        NodeSchema::list(ListSchema::new("name", interface_entry()).ordered(ordered)),
    );
    let system = ContainerSchema::new().child("mtu", NodeSchema::leaf(LeafType::uint16()));
    let mgmt = ContainerSchema::new()
        .child(
            "ifref",
            NodeSchema::leaf(LeafType::Reference(
                ReferenceType::new("/interfaces/interface/name").require_instance(true),
            )),
        )
        .child(
            "loose-ifref",
            NodeSchema::leaf(LeafType::Reference(ReferenceType::new(
                "/interfaces/interface/name",
            ))),
        )
        .child(
            "mtu-alias",
            NodeSchema::leaf(LeafType::Reference(ReferenceType::new("/system/mtu"))),
        );

    NodeSchema::container(
        ContainerSchema::new()
            .child("interfaces", NodeSchema::container(interfaces))
            .child("system", NodeSchema::container(system))
            .child("mgmt", NodeSchema::container(mgmt)),
    )
}

/// A device tree wired to a fresh registry
#[allow(dead_code)]
pub struct Device {
    pub tree: Tree,
    pub registry: Rc<RefCell<MemoryPathHelper>>,
    pub root: ElementId,
    pub interfaces: ElementId,
}

#[allow(dead_code)]
impl Device {
    pub fn new(ordered: bool) -> Self {
        let (registry, shared) = new_registry();
        let mut tree = Tree::new();
        let root = tree
            .instantiate(
                &device_schema(ordered),
                ElementSpec::new("device").path_helper(shared),
            )
            .unwrap();
        let interfaces = tree.descend(root, &["interfaces", "interface"]).unwrap();
        Self {
            tree,
            registry,
            root,
            interfaces,
        }
    }

    /// Element at `names` below the root
    pub fn at(&self, names: &[&str]) -> ElementId {
        self.tree.descend(self.root, names).unwrap()
    }

    /// Leaf `name` of the interface entry keyed `key`
    pub fn interface_leaf(&mut self, key: &str, name: &str) -> ElementId {
        let entry = self.tree.list(self.interfaces).unwrap().entry(key).unwrap();
        self.tree.child(entry, name).unwrap()
    }

    /// Registered paths, in registration order
    pub fn paths(&self) -> Vec<String> {
        self.registry
            .borrow()
            .paths()
            .map(str::to_string)
            .collect()
    }
}
