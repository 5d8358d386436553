//! Reference (leafref) resolution
//!
//! A reference leaf either aliases exactly one target leaf (a live pointer,
//! re-resolved on every read) or holds a value checked against the targets'
//! values and list keys at assignment time.

use yangtree_core_types::ElementId;

use super::element::unsupported;
use super::path_helper::Registered;
use super::{NodeValue, Tree};
use crate::errors::{Result, YangError};
use crate::types::{ReferenceType, ReferenceValue};
use crate::value::Value;

impl Tree {
    /// Resolve `raw` for the reference leaf `caller`
    ///
    /// Resolution runs through the caller's path helper, relative to the
    /// caller's path:
    ///
    /// - exactly one leaf answers: a live pointer; a supplied value is written
    ///   through to the target via its parent's field setter
    /// - otherwise with `require_instance`: `raw` must equal a candidate's
    ///   value or be a key of a candidate list
    /// - otherwise the value is kept verbatim
    ///
    /// With no path helper the value is kept verbatim.
    ///
    /// # Errors
    ///
    /// - `ResolutionFailure` naming the value, path and candidates when a
    ///   required instance is missing
    /// - `CapabilityUnsupported` if the pointer target's parent has no setter
    ///   for the target leaf
    /// - whatever the target leaf rejects a written-through value with
    pub fn resolve_reference(
        &mut self,
        ty: &ReferenceType,
        caller: ElementId,
        raw: &Value,
    ) -> Result<ReferenceValue> {
        let supplied = (!raw.is_empty()).then(|| raw.clone());
        let caller_element = self.element(caller)?;
        let Some(helper) = caller_element.path_helper().cloned() else {
            return Ok(ReferenceValue::Opaque(supplied));
        };
        let caller_path = caller_element.path().to_string();

        let found = helper.borrow().get(ty.path(), Some(&caller_path));
        if let [Registered::Element(target)] = found.as_slice() {
            if self.element(*target)?.is_leaf() {
                if supplied.is_some() {
                    self.write_through(*target, ty.leaf_name(), raw)?;
                }
                return Ok(ReferenceValue::Pointer {
                    path: ty.path().to_string(),
                });
            }
        }

        if !ty.requires_instance() {
            return Ok(ReferenceValue::Opaque(supplied));
        }
        if supplied.is_none() {
            return Ok(ReferenceValue::Checked(None));
        }

        let candidates = helper.borrow().get(ty.path(), Some(&caller_path));
        for candidate in &candidates {
            if self.candidate_admits(candidate, raw)? {
                return Ok(ReferenceValue::Checked(supplied));
            }
        }
        Err(YangError::ResolutionFailure {
            value: raw.to_string(),
            path: ty.path().to_string(),
            candidates: candidates
                .iter()
                .map(|c| self.candidate_label(c))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    fn write_through(&mut self, target: ElementId, leaf_name: &str, raw: &Value) -> Result<()> {
        let parent = self
            .element(target)?
            .parent()
            .ok_or_else(|| unsupported(&format!("set_{}", leaf_name), "root"))?;
        let parent_element = self.element(parent)?;
        let setter = parent_element.fields().setter(leaf_name).ok_or_else(|| {
            unsupported(
                &format!("set_{}", leaf_name),
                parent_element.yang_name().to_string(),
            )
        })?;
        setter(&mut *self, raw)
    }

    /// Whether `raw` is a candidate's value or a key within it
    fn candidate_admits(&self, candidate: &Registered, raw: &Value) -> Result<bool> {
        let wanted = raw.to_string();
        match candidate {
            Registered::Member { value, .. } => Ok(value.to_string() == wanted),
            Registered::Element(id) => match &self.element(*id)?.base {
                NodeValue::List(list) => Ok(list.contains(&wanted)),
                NodeValue::LeafList(items) => {
                    Ok(items.iter().any(|item| item.to_string() == wanted))
                }
                NodeValue::Container => Ok(false),
                _ => Ok(self.value(*id)?.to_string() == wanted),
            },
        }
    }

    fn candidate_label(&self, candidate: &Registered) -> Result<String> {
        match candidate {
            Registered::Member { value, .. } => Ok(value.to_string()),
            Registered::Element(id) => match &self.element(*id)?.base {
                NodeValue::List(list) => Ok(format!(
                    "[{}]",
                    list.keys().collect::<Vec<_>>().join(", ")
                )),
                _ => Ok(self.value(*id)?.to_string()),
            },
        }
    }

    /// Read through a live pointer held by `caller`
    ///
    /// # Errors
    ///
    /// `InvalidPointer` unless exactly one element answers `path`.
    pub(crate) fn read_pointer(&self, caller: ElementId, path: &str) -> Result<Value> {
        let caller_element = self.element(caller)?;
        let found = match caller_element.path_helper() {
            Some(helper) => helper.borrow().get(path, Some(caller_element.path())),
            None => Vec::new(),
        };
        match found.as_slice() {
            [Registered::Element(target)] => self.value(*target),
            [Registered::Member { value, .. }] => Ok(value.clone()),
            other => Err(YangError::InvalidPointer {
                path: path.to_string(),
                matches: other.len(),
            }),
        }
    }
}
