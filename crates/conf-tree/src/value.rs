//! The closed value variant and the insertion-ordered map

/// A single value inside a configuration tree.
///
/// `Comment` and `Blank` are layout markers produced and consumed by the
/// comment-preserving codecs. They only ever appear as entries of a [`Map`]
/// and are invisible to the public tree accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw text scalar; any type coercion happens above the tree.
    Scalar(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Insertion-ordered nested mapping.
    Map(Map),
    /// A comment line kept for layout, including its leading `#`.
    Comment(String),
    /// A blank line kept for layout.
    Blank,
}

impl Value {
    /// Whether this is a layout marker rather than real data.
    pub fn is_marker(&self) -> bool {
        matches!(self, Value::Comment(_) | Value::Blank)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(Value::Scalar).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(Value::from).collect())
    }
}

/// Insertion-ordered `name -> value` mapping.
///
/// Inserting an existing key overwrites its value in place, so iteration
/// order always matches first insertion. The codecs rely on this to
/// round-trip layout.
///
/// Layout markers occupy entries under reserved keys (a `#` prefix plus an
/// ordinal, which a decoded key can never collide with since `#` lines
/// decode as comments). The reserved key exists only to keep the entry
/// unique and positioned; it carries no meaning and is never exposed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the map has no entries at all, markers included.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order, layout markers included.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Look up a real entry by key. Marker entries are never returned.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, value)| name == key && !value.is_marker())
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(name, value)| name == key && !value.is_marker())
            .map(|(_, value)| value)
    }

    /// Insert a real entry, overwriting in place when the key exists.
    ///
    /// Returns the previous value for an overwrite.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let index = self
            .entries
            .iter()
            .position(|(name, existing)| *name == key && !existing.is_marker());
        match index {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a real entry by key, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self
            .entries
            .iter()
            .position(|(name, value)| name == key && !value.is_marker())?;
        Some(self.entries.remove(index).1)
    }

    /// Remove the entry at `index` (markers included), returning it.
    pub fn remove_at(&mut self, index: usize) -> (String, Value) {
        self.entries.remove(index)
    }

    /// Names of the real entries in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_marker())
            .map(|(name, _)| name.as_str())
    }

    /// Append a comment marker.
    pub fn push_comment(&mut self, text: impl Into<String>) {
        let key = self.marker_key("comment");
        self.entries.push((key, Value::Comment(text.into())));
    }

    /// Append a blank-line marker.
    pub fn push_blank(&mut self) {
        let key = self.marker_key("blankline");
        self.entries.push((key, Value::Blank));
    }

    /// Insert a marker entry at `index`, keys generated internally.
    pub fn insert_marker_at(&mut self, index: usize, value: Value) {
        debug_assert!(value.is_marker());
        let stem = match value {
            Value::Blank => "blankline",
            _ => "comment",
        };
        let key = self.marker_key(stem);
        self.entries.insert(index.min(self.entries.len()), (key, value));
    }

    fn marker_key(&self, stem: &str) -> String {
        let mut ordinal = 0;
        loop {
            let key = format!("#{stem}:{ordinal}");
            if !self.entries.iter().any(|(name, _)| *name == key) {
                return key;
            }
            ordinal += 1;
        }
    }
}
