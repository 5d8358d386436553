//! Typed lists (leaf-list values)
//!
//! A `TypedList` is an ordered sequence whose every element was accepted by at
//! least one of a fixed set of allowed leaf types. Elements are stored in the
//! normalised form produced by the first allowed type that accepts them, so
//! `"5"` appended to an integer leaf-list is held as `5`.

use std::fmt;
use std::rc::Rc;

use super::LeafType;
use crate::errors::{Result, YangError};
use crate::value::Value;

/// Factory for typed lists sharing one allowed-type set
#[derive(Debug, Clone)]
pub struct TypedListType {
    allowed: Rc<Vec<LeafType>>,
}

impl TypedListType {
    pub fn new(allowed: Vec<LeafType>) -> Self {
        Self {
            allowed: Rc::new(allowed),
        }
    }

    pub fn allowed(&self) -> &[LeafType] {
        &self.allowed
    }

    /// Validate one element, returning its normalised form
    ///
    /// # Errors
    ///
    /// `TypedListRejected` naming the value and the allowed set when no
    /// allowed type accepts it. Absent values are never accepted.
    pub fn check(&self, raw: &Value) -> Result<Value> {
        self.allowed
            .iter()
            .find_map(|ty| match ty.construct(raw) {
                Ok(Some(accepted)) => Some(accepted.to_value()),
                _ => None,
            })
            .ok_or_else(|| YangError::TypedListRejected {
                value: raw.to_string(),
                allowed: self.allowed.iter().map(ToString::to_string).collect(),
            })
    }

    /// Build an empty list
    pub fn empty(&self) -> TypedList {
        TypedList {
            ty: self.clone(),
            items: Vec::new(),
        }
    }

    /// Build a list from initial elements, validating every one
    ///
    /// # Errors
    ///
    /// The first rejection; nothing is built.
    pub fn construct(&self, initial: &[Value]) -> Result<TypedList> {
        let items = initial
            .iter()
            .map(|raw| self.check(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(TypedList {
            ty: self.clone(),
            items,
        })
    }
}

impl fmt::Display for TypedListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("leaf-list of (")?;
        for (i, ty) in self.allowed.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty)?;
        }
        f.write_str(")")
    }
}

/// An ordered sequence of validated elements
#[derive(Debug, Clone)]
pub struct TypedList {
    ty: TypedListType,
    items: Vec<Value>,
}

impl TypedList {
    pub fn list_type(&self) -> &TypedListType {
        &self.ty
    }

    /// Append one element
    ///
    /// Returns the stored (normalised) element.
    pub fn append(&mut self, raw: &Value) -> Result<Value> {
        let accepted = self.ty.check(raw)?;
        self.items.push(accepted.clone());
        Ok(accepted)
    }

    /// Insert before `index`; an index past the end appends
    pub fn insert(&mut self, index: usize, raw: &Value) -> Result<Value> {
        let accepted = self.ty.check(raw)?;
        let at = index.min(self.items.len());
        self.items.insert(at, accepted.clone());
        Ok(accepted)
    }

    /// Replace the element at `index`, returning the displaced one
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index` is not a current position, otherwise the
    /// validation error for `raw`.
    pub fn set(&mut self, index: usize, raw: &Value) -> Result<Value> {
        let len = self.items.len();
        if index >= len {
            return Err(YangError::IndexOutOfRange { index, len });
        }
        let accepted = self.ty.check(raw)?;
        Ok(std::mem::replace(&mut self.items[index], accepted))
    }

    /// Remove the first element equal to `raw`
    ///
    /// `raw` is compared in its normalised form when an allowed type accepts
    /// it, so removing `"5"` from an integer list removes `5`.
    pub fn remove(&mut self, raw: &Value) -> Result<Value> {
        let index = self
            .index_of(raw)
            .ok_or_else(|| YangError::ValueNotPresent {
                owner: self.ty.to_string(),
                value: raw.to_string(),
            })?;
        Ok(self.items.remove(index))
    }

    /// Remove and return the element at `index`, or the last one
    pub fn pop(&mut self, index: Option<usize>) -> Result<Value> {
        let len = self.items.len();
        let index = match index {
            Some(i) => i,
            None if len > 0 => len - 1,
            None => return Err(YangError::IndexOutOfRange { index: 0, len }),
        };
        if index >= len {
            return Err(YangError::IndexOutOfRange { index, len });
        }
        Ok(self.items.remove(index))
    }

    /// Append every element of `values`
    ///
    /// All elements are validated before any is stored; returns the stored
    /// forms in order.
    pub fn extend(&mut self, values: &[Value]) -> Result<Vec<Value>> {
        let accepted = values
            .iter()
            .map(|raw| self.ty.check(raw))
            .collect::<Result<Vec<_>>>()?;
        self.items.extend(accepted.iter().cloned());
        Ok(accepted)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn item(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Position of the first element equal to `raw`
    pub fn index_of(&self, raw: &Value) -> Option<usize> {
        let probe = self.ty.check(raw).unwrap_or_else(|_| raw.clone());
        self.items.iter().position(|item| *item == probe)
    }

    /// Read-only snapshot of the elements
    pub fn get(&self) -> Vec<Value> {
        self.items.clone()
    }
}

impl<'a> IntoIterator for &'a TypedList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl PartialEq for TypedList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl PartialEq<Vec<Value>> for TypedList {
    fn eq(&self, other: &Vec<Value>) -> bool {
        self.items == *other
    }
}

impl PartialEq<[Value]> for TypedList {
    fn eq(&self, other: &[Value]) -> bool {
        self.items.as_slice() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Restriction, RestrictedType};

    fn small_ints() -> TypedListType {
        TypedListType::new(vec![LeafType::Int(
            RestrictedType::new().with(Restriction::range("1..10").unwrap()),
        )])
    }

    #[test]
    fn test_append_normalises_string_input() {
        let mut list = small_ints().empty();
        list.append(&Value::from("5")).unwrap();
        assert_eq!(list, vec![Value::Int(5)]);
    }

    #[test]
    fn test_append_rejected_names_allowed_set() {
        let mut list = small_ints().empty();
        match list.append(&Value::Int(11)) {
            Err(YangError::TypedListRejected { value, allowed }) => {
                assert_eq!(value, "11");
                assert_eq!(allowed.len(), 1);
            }
            other => panic!("expected TypedListRejected, got {:?}", other),
        }
        assert!(list.is_empty());
    }

    #[test]
    fn test_set_out_of_range() {
        let mut list = small_ints().construct(&[Value::Int(1)]).unwrap();
        assert!(matches!(
            list.set(3, &Value::Int(2)),
            Err(YangError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(list.set(0, &Value::Int(2)).unwrap(), Value::Int(1));
        assert_eq!(list, vec![Value::Int(2)]);
    }

    #[test]
    fn test_extend_is_all_or_nothing() {
        let mut list = small_ints().empty();
        let err = list.extend(&[Value::Int(1), Value::Int(99)]);
        assert!(err.is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn test_pop_empty_fails() {
        let mut list = small_ints().empty();
        assert!(matches!(
            list.pop(None),
            Err(YangError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn test_remove_by_string_form() {
        let mut list = small_ints()
            .construct(&[Value::Int(3), Value::Int(4)])
            .unwrap();
        list.remove(&Value::from("3")).unwrap();
        assert_eq!(list, vec![Value::Int(4)]);
        assert!(matches!(
            list.remove(&Value::Int(3)),
            Err(YangError::ValueNotPresent { .. })
        ));
    }
}
