//! Dot-separated path access into nested metadata.
//!
//! A [`MetaPath`] like `some.nested.key` or `arr.2.id` addresses a location
//! inside a [`Meta`] mapping. Segments that are canonical decimal integers
//! index into arrays positionally; every other segment is an object key.
//!
//! Lookups never fail loudly: a missing intermediate, or a scalar where a
//! container was expected, resolves to "not found".

use std::fmt;
use std::iter::{Enumerate, FusedIterator};
use std::slice;

use serde_json::{Value, map};

use metadux_types::Meta;

/// Separator between path segments.
pub const PATH_DELIMITER: char = '.';

// ---------------------------------------------------------------------------
// MetaPath
// ---------------------------------------------------------------------------

/// A parsed dot-separated path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaPath {
    segments: Vec<String>,
}

impl MetaPath {
    /// Split a path string on [`PATH_DELIMITER`].
    ///
    /// Parsing is total. Empty segments are kept and simply match nothing
    /// unless the data has an empty key.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split(PATH_DELIMITER).map(str::to_owned).collect(),
        }
    }

    /// Build a path from already-split segments.
    pub const fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for MetaPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for MetaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            f.write_str(first)?;
        }
        for segment in segments {
            write!(f, "{PATH_DELIMITER}{segment}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// get / remove / set
// ---------------------------------------------------------------------------

/// Read the value at `path`, or `None` if any segment does not resolve.
///
/// A stored `null` is a value and comes back as `Some(&Value::Null)`.
pub fn get<'a>(meta: &'a Meta, path: &MetaPath) -> Option<&'a Value> {
    let (first, rest) = path.segments.split_first()?;
    rest.iter()
        .try_fold(meta.get(first)?, |value, segment| child(value, segment))
}

/// Delete the entry at `path` from its parent container.
///
/// Object entries are removed. Array slots are overwritten with `null` so
/// the positions of later elements do not shift. Returns whether anything
/// was found at `path`.
pub fn remove(meta: &mut Meta, path: &MetaPath) -> bool {
    let Some((last, parents)) = path.segments.split_last() else {
        return false;
    };
    match parents.split_first() {
        None => meta.remove(last).is_some(),
        Some((first, middle)) => meta
            .get_mut(first)
            .and_then(|root| {
                middle
                    .iter()
                    .try_fold(root, |value, segment| child_mut(value, segment))
            })
            .is_some_and(|parent| remove_child(parent, last)),
    }
}

/// Write `value` at `path`, creating containers along the way.
///
/// Missing or scalar intermediates become empty objects. An index segment
/// into an existing array writes that slot, padding the array with `null`
/// when the index is past the end.
pub fn set(meta: &mut Meta, path: &MetaPath, value: Value) {
    let Some((first, rest)) = path.segments.split_first() else {
        return;
    };
    let slot = meta.entry(first.clone()).or_insert(Value::Null);
    set_in(slot, rest, value);
}

fn set_in(slot: &mut Value, rest: &[String], value: Value) {
    let Some((segment, rest)) = rest.split_first() else {
        *slot = value;
        return;
    };

    if let (Value::Array(items), Some(index)) = (&mut *slot, array_index(segment)) {
        if items.len() <= index {
            items.resize(index.saturating_add(1), Value::Null);
        }
        if let Some(next) = items.get_mut(index) {
            set_in(next, rest, value);
        }
        return;
    }

    if !slot.is_object() {
        *slot = Value::Object(Meta::new());
    }
    if let Value::Object(map) = slot {
        set_in(map.entry(segment.clone()).or_insert(Value::Null), rest, value);
    }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => array_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => array_index(segment).and_then(|index| items.get_mut(index)),
        _ => None,
    }
}

fn remove_child(parent: &mut Value, segment: &str) -> bool {
    match parent {
        Value::Object(map) => map.remove(segment).is_some(),
        Value::Array(items) => match array_index(segment).and_then(|index| items.get_mut(index)) {
            Some(slot) => {
                *slot = Value::Null;
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Interpret a segment as an array index. Only canonical decimal forms
/// count: `"0"` and `"12"`, not `"01"`, `"+1"`, or `""`.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|byte| byte.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical { segment.parse().ok() } else { None }
}

// ---------------------------------------------------------------------------
// deep_keys
// ---------------------------------------------------------------------------

/// Enumerate the leaf paths of `meta`, depth first.
///
/// A leaf is any value that is neither an object nor an array. Arrays are
/// walked by index. Empty containers contribute no paths. The iterator is
/// lazy and single-pass.
pub fn deep_keys(meta: &Meta) -> DeepKeys<'_> {
    DeepKeys {
        frames: vec![Frame::Object(meta.iter())],
        prefix: Vec::new(),
    }
}

/// Iterator returned by [`deep_keys`].
pub struct DeepKeys<'a> {
    frames: Vec<Frame<'a>>,
    /// Segments leading to the container of the top frame. Always one
    /// shorter than `frames`.
    prefix: Vec<String>,
}

enum Frame<'a> {
    Object(map::Iter<'a>),
    Array(Enumerate<slice::Iter<'a, Value>>),
}

impl<'a> Frame<'a> {
    fn enter(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::Object(map.iter())),
            Value::Array(items) => Some(Self::Array(items.iter().enumerate())),
            _ => None,
        }
    }

    fn next_entry(&mut self) -> Option<(String, &'a Value)> {
        match self {
            Self::Object(entries) => entries.next().map(|(key, value)| (key.clone(), value)),
            Self::Array(items) => items
                .next()
                .map(|(index, value)| (index.to_string(), value)),
        }
    }
}

impl Iterator for DeepKeys<'_> {
    type Item = MetaPath;

    fn next(&mut self) -> Option<MetaPath> {
        loop {
            let Some((segment, value)) = self.frames.last_mut()?.next_entry() else {
                self.frames.pop();
                self.prefix.pop();
                continue;
            };

            if let Some(frame) = Frame::enter(value) {
                self.prefix.push(segment);
                self.frames.push(frame);
            } else {
                let mut segments = self.prefix.clone();
                segments.push(segment);
                return Some(MetaPath::from_segments(segments));
            }
        }
    }
}

impl FusedIterator for DeepKeys<'_> {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta(value: Value) -> Meta {
        match value {
            Value::Object(map) => map,
            _ => Meta::new(),
        }
    }

    fn sample() -> Meta {
        meta(json!({
            "simple": "ABC",
            "something": {"nested": {"hello": 123, "goodbye": "xyz"}},
            "other": ["a", "b", {"key": "value"}],
            "boo": false,
            "nothing": null,
        }))
    }

    fn keys(meta: &Meta) -> Vec<String> {
        deep_keys(meta).map(|path| path.to_string()).collect()
    }

    #[test]
    fn parse_and_display_round_trip() {
        let path = MetaPath::parse("some.nested.key");
        assert_eq!(path.segments(), ["some", "nested", "key"]);
        assert_eq!(path.to_string(), "some.nested.key");
    }

    #[test]
    fn get_reads_objects_and_arrays() {
        let data = sample();
        assert_eq!(get(&data, &"simple".into()), Some(&json!("ABC")));
        assert_eq!(get(&data, &"boo".into()), Some(&json!(false)));
        assert_eq!(get(&data, &"something.nested.hello".into()), Some(&json!(123)));
        assert_eq!(get(&data, &"other.0".into()), Some(&json!("a")));
        assert_eq!(get(&data, &"other.2.key".into()), Some(&json!("value")));
        assert_eq!(get(&data, &"nothing".into()), Some(&Value::Null));
    }

    #[test]
    fn get_misses_resolve_to_none() {
        let data = sample();
        assert_eq!(get(&data, &"missing".into()), None);
        assert_eq!(get(&data, &"other.3".into()), None);
        assert_eq!(get(&data, &"other.2.missing".into()), None);
        assert_eq!(get(&data, &"something.nested.missing".into()), None);
        // Scalars are not indexable.
        assert_eq!(get(&data, &"simple.0".into()), None);
        assert_eq!(get(&data, &"nothing.deeper".into()), None);
        assert_eq!(get(&data, &"".into()), None);
    }

    #[test]
    fn array_index_requires_canonical_form() {
        let data = sample();
        assert_eq!(get(&data, &"other.01".into()), None);
        assert_eq!(get(&data, &"other.+1".into()), None);
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("-1"), None);
    }

    #[test]
    fn numeric_keys_on_objects_are_plain_keys() {
        let data = meta(json!({"map": {"0": "zero", "01": "padded"}}));
        assert_eq!(get(&data, &"map.0".into()), Some(&json!("zero")));
        assert_eq!(get(&data, &"map.01".into()), Some(&json!("padded")));
    }

    #[test]
    fn remove_deletes_object_entries() {
        let mut data = sample();
        assert!(remove(&mut data, &"something.nested".into()));
        assert_eq!(data.get("something"), Some(&json!({})));
        assert!(remove(&mut data, &"simple".into()));
        assert!(!data.contains_key("simple"));
    }

    #[test]
    fn remove_nulls_array_slots_in_place() {
        let mut data = meta(json!({"arr": [0, 1, {"abc": 123, "id": "xyz987"}]}));
        assert!(remove(&mut data, &"arr.2.id".into()));
        assert_eq!(data.get("arr"), Some(&json!([0, 1, {"abc": 123}])));
        assert!(remove(&mut data, &"arr.0".into()));
        assert_eq!(data.get("arr"), Some(&json!([null, 1, {"abc": 123}])));
    }

    #[test]
    fn remove_missing_paths_is_a_no_op() {
        let mut data = sample();
        let before = data.clone();
        assert!(!remove(&mut data, &"not.real.meta.path".into()));
        assert!(!remove(&mut data, &"other.7".into()));
        assert!(!remove(&mut data, &"simple.length".into()));
        assert!(!remove(&mut data, &MetaPath::from_segments(Vec::new())));
        assert_eq!(data, before);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut data = Meta::new();
        set(&mut data, &"a.b.c".into(), json!(1));
        set(&mut data, &"a.d".into(), json!("x"));
        assert_eq!(Value::Object(data), json!({"a": {"b": {"c": 1}, "d": "x"}}));
    }

    #[test]
    fn set_replaces_scalars_on_the_way() {
        let mut data = meta(json!({"a": 4}));
        set(&mut data, &"a.b".into(), json!(true));
        assert_eq!(Value::Object(data), json!({"a": {"b": true}}));
    }

    #[test]
    fn set_writes_and_pads_arrays() {
        let mut data = meta(json!({"arr": [0, 1]}));
        set(&mut data, &"arr.1".into(), json!("one"));
        set(&mut data, &"arr.3.id".into(), json!(7));
        assert_eq!(
            Value::Object(data),
            json!({"arr": [0, "one", null, {"id": 7}]})
        );
    }

    #[test]
    fn deep_keys_lists_leaves_depth_first() {
        let data = meta(json!({
            "some": {"nested": {"doesNotExist": true}, "hello": true},
            "other": true,
            "arr2": [true, {"x": 1}],
        }));
        assert_eq!(
            keys(&data),
            [
                "arr2.0",
                "arr2.1.x",
                "other",
                "some.hello",
                "some.nested.doesNotExist",
            ]
        );
    }

    #[test]
    fn deep_keys_skips_empty_containers() {
        let data = meta(json!({"empty": {}, "list": [], "leaf": null}));
        assert_eq!(keys(&data), ["leaf"]);
        assert!(keys(&Meta::new()).is_empty());
    }

    #[test]
    fn deep_keys_is_lazy_and_fused() {
        let data = meta(json!({"a": 1, "b": 2}));
        let mut iter = deep_keys(&data);
        assert_eq!(iter.next().map(|p| p.to_string()).as_deref(), Some("a"));
        assert_eq!(iter.next().map(|p| p.to_string()).as_deref(), Some("b"));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
