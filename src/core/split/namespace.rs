//! Namespace prefix table

/// Prefix → URI bindings discovered while scanning a composite document
///
/// Write-once per prefix: the first binding seen for a prefix is kept for the
/// rest of the scan and later redefinitions are ignored. The default
/// namespace is stored under the empty prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: Vec<(String, String)>,
}

impl NamespaceTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a binding; returns `false` if the prefix was already bound
    /// (the existing binding wins)
    pub fn insert(&mut self, prefix: &str, uri: &str) -> bool {
        match self.resolve(prefix) {
            Some(existing) => {
                if existing != uri {
                    tracing::warn!(
                        category = "split",
                        prefix = %prefix,
                        bound = %existing,
                        ignored = %uri,
                        "Namespace prefix redefined; keeping first binding"
                    );
                }
                false
            }
            None => {
                self.bindings.push((prefix.to_string(), uri.to_string()));
                true
            }
        }
    }

    /// URI bound to `prefix`
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Bindings in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Attribute name declaring `prefix` (`xmlns` for the default namespace)
pub fn declaration_attribute(prefix: &str) -> String {
    if prefix.is_empty() {
        "xmlns".to_string()
    } else {
        format!("xmlns:{prefix}")
    }
}

/// Prefix declared by an attribute name, if it is a namespace declaration
pub fn declared_prefix(attribute_name: &str) -> Option<&str> {
    if attribute_name == "xmlns" {
        Some("")
    } else {
        attribute_name.strip_prefix("xmlns:")
    }
}

/// Split a qualified name into `(prefix, local)`
pub fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}
