//! Interning table for grammar symbol names.

use indexmap::IndexSet;
use smartstring::alias::String;

/// Names in first-seen order; the position is the symbol index.
#[derive(Default, Debug, Clone)]
pub struct Symtab {
    names: IndexSet<String>,
}

impl Symtab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, interning it if new.
    pub fn add(&mut self, name: &str) -> usize {
        self.names.insert_full(String::from(name)).0
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get_index(index).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Symtab;

    #[test]
    fn add_is_idempotent() {
        let mut st = Symtab::new();
        assert_eq!(st.add("foo"), 0);
        assert_eq!(st.add("bar"), 1);
        assert_eq!(st.add("foo"), 0);
        assert_eq!(st.len(), 2);
        assert_eq!(st.index("bar"), Some(1));
        assert_eq!(st.name(1), Some("bar"));
    }

    #[test]
    fn missing_lookups() {
        let mut st = Symtab::new();
        st.add("existing");
        assert_eq!(st.index("missing"), None);
        assert_eq!(st.name(42), None);
        assert!(!st.is_empty());
    }

    #[test]
    fn order_is_first_seen() {
        let mut st = Symtab::new();
        for name in ["c", "a", "c", "b", "a"] {
            st.add(name);
        }
        assert_eq!(st.iter().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }
}
