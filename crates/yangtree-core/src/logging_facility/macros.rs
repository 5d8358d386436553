//! Operation boundary macros
//!
//! Every tree operation that touches the registry (`instantiate`, `list_add`,
//! `list_delete`) brackets itself with `log_op_start!`/`log_op_end!`. The
//! engine never emits `log_op_error!`; whoever assembles the tree decides
//! whether a rejected value is worth an error line.

/// Log the start of an operation
///
/// Extra fields follow `tracing` syntax; pass the element path when there is
/// one so captured events can be told apart per subtree.
///
/// # Example
///
/// ```
/// # use yangtree_core::log_op_start;
/// log_op_start!("load_device");
/// log_op_start!("list_add", path = "/interfaces/interface", key = "eth0");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::yangtree_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::yangtree_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// An assembler timing a whole subtree build:
///
/// ```
/// # use std::time::Instant;
/// # use yangtree_core::{log_op_end, log_op_start, ContainerSchema, ElementSpec, NodeSchema, Tree};
/// # use yangtree_core::types::LeafType;
/// let schema = NodeSchema::container(
///     ContainerSchema::new().child("hostname", NodeSchema::leaf(LeafType::string())),
/// );
/// log_op_start!("load_system");
/// let start = Instant::now();
/// let mut tree = Tree::new();
/// let system = tree.instantiate(&schema, ElementSpec::new("system"))?;
/// log_op_end!(
///     "load_system",
///     duration_ms = start.elapsed().as_millis() as u64,
///     live = tree.len()
/// );
/// # let _ = system;
/// # Ok::<(), yangtree_core::YangError>(())
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::yangtree_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::yangtree_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Takes anything convertible into `ExError` and records its kind and stable
/// code.
///
/// # Example
///
/// ```
/// # use yangtree_core::{log_op_error, ElementSpec, NodeValue, Tree, Value};
/// # use yangtree_core::tree::LeafSlot;
/// # use yangtree_core::types::LeafType;
/// let mut tree = Tree::new();
/// let vlan = tree.wrap(
///     NodeValue::Leaf(LeafSlot::new(LeafType::uint16())),
///     ElementSpec::new("vlan").leaf(),
/// )?;
/// if let Err(err) = tree.set_leaf(vlan, &Value::Uint(70000)) {
///     log_op_error!("set_leaf", err, duration_ms = 0, path = "/vlan");
/// }
/// # Ok::<(), yangtree_core::YangError>(())
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::yangtree_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::yangtree_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
