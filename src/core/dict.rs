use slab::Slab;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub ordinal: usize,
    pub text: String,
}

impl Entry {
    /// Part of `text` before the first `=`, or the whole text.
    pub fn key(&self) -> &str {
        self.text.split_once('=').map_or(self.text.as_str(), |(k, _)| k)
    }

    pub fn value(&self) -> Option<&str> {
        self.text.split_once('=').map(|(_, v)| v)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictError {
    #[error("index {index} out of range for dictionary of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("cannot grow dictionary: out of memory")]
    Exhausted,
}

/// Insertion-ordered collection shared by the environment, alias and
/// history tables.
///
/// Entries live in a slab so removed slots are recycled; `order` holds slab
/// keys in display order.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    slots: Slab<Entry>,
    order: Vec<usize>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn push_back(&mut self, text: impl Into<String>, ordinal: usize) -> Result<(), DictError> {
        let index = self.len();
        self.insert_at(index, text, ordinal)
    }

    pub fn insert_at(
        &mut self,
        index: usize,
        text: impl Into<String>,
        ordinal: usize,
    ) -> Result<(), DictError> {
        if index > self.len() {
            return Err(DictError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        self.order.try_reserve(1).map_err(|_| DictError::Exhausted)?;

        let key = self.slots.insert(Entry {
            ordinal,
            text: text.into(),
        });
        self.order.insert(index, key);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Entry> {
        if index >= self.len() {
            return None;
        }
        let key = self.order.remove(index);
        Some(self.slots.remove(key))
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.order.get(index).map(|&key| &self.slots[key])
    }

    /// Finds the entry whose text starts with `key` immediately followed by `=`.
    pub fn find_key(&self, key: &str) -> Option<(usize, &Entry)> {
        self.iter()
            .enumerate()
            .find(|(_, entry)| entry.text.strip_prefix(key).is_some_and(|rest| rest.starts_with('=')))
    }

    pub fn find_ordinal(&self, ordinal: usize) -> Option<(usize, &Entry)> {
        self.iter()
            .enumerate()
            .find(|(_, entry)| entry.ordinal == ordinal)
    }

    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.find_key(key).and_then(|(_, entry)| entry.value())
    }

    /// Sets `key=value`, overwriting an existing entry in place so the
    /// insertion position is kept.
    pub fn set_pair(&mut self, key: &str, value: &str) -> Result<(), DictError> {
        let text = format!("{}={}", key, value);
        match self.find_key(key).map(|(index, _)| index) {
            Some(index) => {
                let slot = self.order[index];
                self.slots[slot].text = text;
                Ok(())
            }
            None => {
                let ordinal = self.len();
                self.push_back(text, ordinal)
            }
        }
    }

    pub fn remove_key(&mut self, key: &str) -> Option<Entry> {
        let index = self.find_key(key).map(|(index, _)| index)?;
        self.remove_at(index)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.order.iter().map(move |&key| &self.slots[key])
    }

    /// Renders every entry's text in insertion order.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(|entry| entry.text.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut dict = Dictionary::new();
        dict.push_back("B=2", 0).unwrap();
        dict.push_back("A=1", 1).unwrap();
        dict.push_back("C=3", 2).unwrap();
        assert_eq!(dict.to_vec(), vec!["B=2", "A=1", "C=3"]);
    }

    #[test]
    fn test_insert_at_index() {
        let mut dict = Dictionary::new();
        dict.push_back("first", 0).unwrap();
        dict.push_back("third", 2).unwrap();
        dict.insert_at(1, "second", 1).unwrap();
        dict.insert_at(0, "zeroth", 9).unwrap();
        assert_eq!(dict.to_vec(), vec!["zeroth", "first", "second", "third"]);
        assert!(matches!(
            dict.insert_at(10, "nope", 0),
            Err(DictError::OutOfRange { index: 10, len: 4 })
        ));
    }

    #[test]
    fn test_removed_slots_are_reused_without_breaking_order() {
        let mut dict = Dictionary::new();
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            dict.push_back(*text, i).unwrap();
        }
        assert_eq!(dict.remove_at(0).unwrap().text, "a");
        dict.push_back("d", 3).unwrap();
        assert_eq!(dict.to_vec(), vec!["b", "c", "d"]);
        assert!(dict.remove_at(3).is_none());
    }

    #[test]
    fn test_find_key_requires_equals_after_prefix() {
        let mut dict = Dictionary::new();
        dict.push_back("PATHEXT=.exe", 0).unwrap();
        dict.push_back("PATH=/bin", 1).unwrap();
        assert_eq!(dict.value_of("PATH"), Some("/bin"));
        assert_eq!(dict.find_key("PATH").unwrap().0, 1);
        assert!(dict.find_key("PAT").is_none());
    }

    #[test]
    fn test_set_pair_overwrites_in_place() {
        let mut dict = Dictionary::new();
        dict.set_pair("A", "1").unwrap();
        dict.set_pair("B", "2").unwrap();
        dict.set_pair("A", "changed").unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.to_vec(), vec!["A=changed", "B=2"]);
    }

    #[test]
    fn test_remove_key_and_ordinal_lookup() {
        let mut dict = Dictionary::new();
        dict.push_back("x=1", 7).unwrap();
        dict.push_back("y=2", 8).unwrap();
        assert_eq!(dict.find_ordinal(8).unwrap().1.text, "y=2");
        assert_eq!(dict.remove_key("x").unwrap().ordinal, 7);
        assert!(dict.remove_key("x").is_none());
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_entry_key_value() {
        let entry = Entry {
            ordinal: 0,
            text: "K=a=b".to_string(),
        };
        assert_eq!(entry.key(), "K");
        assert_eq!(entry.value(), Some("a=b"));
    }
}
