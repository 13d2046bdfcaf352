//! Element Attributes
//!
//! Ordered attribute storage: get, set, remove, has.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// Attribute collection in insertion order
///
/// Names are stored lowercased, matching HTML attribute semantics.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attributes: Vec<Attr>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.attributes[i].value.as_str())
    }

    /// Check if attribute exists
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set attribute, returning the previous value if there was one
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        match self.position(name) {
            Some(i) => Some(std::mem::replace(
                &mut self.attributes[i].value,
                value.to_string(),
            )),
            None => {
                self.attributes.push(Attr {
                    name: name.to_ascii_lowercase(),
                    value: value.to_string(),
                });
                None
            }
        }
    }

    /// Remove attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.attributes.remove(i).value)
    }

    /// Whitespace-separated tokens of an attribute (class, aria-* id lists)
    pub fn tokens(&self, name: &str) -> std::str::SplitWhitespace<'_> {
        self.get(name).unwrap_or_default().split_whitespace()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}
