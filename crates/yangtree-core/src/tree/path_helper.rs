//! Path registry
//!
//! The registry maps `/`-separated path strings to whatever is registered
//! there. Its lifecycle belongs to the tree assembler; the engine only calls
//! `register`, `unregister` and `get`. `MemoryPathHelper` is the in-memory
//! implementation used by tests and by assemblers that need nothing fancier.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use yangtree_core_types::ElementId;

use crate::value::Value;

/// Something registered at a path
#[derive(Debug, Clone, PartialEq)]
pub enum Registered {
    /// A tree element
    Element(ElementId),
    /// A leaf-list member, identified by its owning leaf-list and value
    Member { owner: ElementId, value: Value },
}

/// Registry contract consumed by the engine
pub trait PathHelper {
    /// Add `target` to the set registered at `path`
    fn register(&mut self, path: &str, target: Registered);

    /// Drop everything registered at `path`
    fn unregister(&mut self, path: &str);

    /// Drop one registration at `path`
    ///
    /// Keyless list entries and repeated leaf-list values share a path; the
    /// engine uses this form so removing one does not orphan the others.
    fn unregister_entry(&mut self, path: &str, target: &Registered) {
        let _ = target;
        self.unregister(path);
    }

    /// Everything registered at paths matching `path`, in registration order
    ///
    /// Relative expressions are resolved against `caller_path`.
    fn get(&self, path: &str, caller_path: Option<&str>) -> Vec<Registered>;
}

/// Registry handle shared by every element of one tree
pub type SharedPathHelper = Rc<RefCell<dyn PathHelper>>;

/// In-memory registry keyed by exact path string
#[derive(Debug, Default)]
pub struct MemoryPathHelper {
    entries: IndexMap<String, Vec<Registered>>,
}

impl MemoryPathHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in a shareable handle
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Registered paths, in first-registration order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether anything is registered at exactly `path`
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Registrations at exactly `path`
    pub fn at(&self, path: &str) -> &[Registered] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PathHelper for MemoryPathHelper {
    fn register(&mut self, path: &str, target: Registered) {
        self.entries.entry(path.to_string()).or_default().push(target);
    }

    fn unregister(&mut self, path: &str) {
        self.entries.shift_remove(path);
    }

    fn unregister_entry(&mut self, path: &str, target: &Registered) {
        let now_empty = match self.entries.get_mut(path) {
            Some(targets) => {
                if let Some(pos) = targets.iter().position(|t| t == target) {
                    targets.remove(pos);
                }
                targets.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.entries.shift_remove(path);
        }
    }

    fn get(&self, path: &str, caller_path: Option<&str>) -> Vec<Registered> {
        let query = resolve(path, caller_path);
        self.entries
            .iter()
            .filter(|(registered, _)| segments_match(&query, &split_segments(registered)))
            .flat_map(|(_, targets)| targets.iter().cloned())
            .collect()
    }
}

/// Absolute segment list for `path`, interpreted relative to `caller_path`
fn resolve(path: &str, caller_path: Option<&str>) -> Vec<String> {
    let mut segments: Vec<String> = if path.starts_with('/') {
        Vec::new()
    } else {
        caller_path
            .map(|caller| split_segments(caller).into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    };
    for part in split_segments(path) {
        match part {
            "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments
}

/// Split on `/` outside of `[...]` predicates and quoted key values
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match c {
            '\'' if depth > 0 => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => depth = depth.saturating_sub(1),
            '/' if depth == 0 && !quoted => {
                if i > start {
                    segments.push(&path[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < path.len() {
        segments.push(&path[start..]);
    }
    segments
}

fn segment_name(segment: &str) -> &str {
    segment.split('[').next().unwrap_or(segment)
}

/// Intermediate query segments without a predicate match any predicate on
/// the registered side; the final segment must match exactly.
fn segments_match(query: &[String], registered: &[&str]) -> bool {
    if query.len() != registered.len() {
        return false;
    }
    let last = query.len().saturating_sub(1);
    query
        .iter()
        .zip(registered)
        .enumerate()
        .all(|(i, (q, r))| {
            if i == last || q.contains('[') {
                q == r
            } else {
                q == segment_name(r)
            }
        })
}
