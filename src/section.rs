use std::collections::HashMap;
use std::collections::hash_map;

use crate::error::FormatError;

/// Key/value pairs declared under one `[name]` header, or before any header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: HashMap<String, String>,
}

impl Section {
    #[must_use]
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            entries: HashMap::with_capacity(32),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visits every `(key, value)` pair. The order is unspecified.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Adds a new key. An existing key is never overwritten; the section is left as it was.
    pub(crate) fn insert(&mut self, key: &str, value: &str) -> Result<(), FormatError> {
        match self.entries.entry(key.to_owned()) {
            hash_map::Entry::Occupied(_) => Err(FormatError::KeyAlreadyExists {
                section: self.name.clone(),
                key: key.to_owned(),
            }),
            hash_map::Entry::Vacant(slot) => {
                slot.insert(value.to_owned());
                Ok(())
            }
        }
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
