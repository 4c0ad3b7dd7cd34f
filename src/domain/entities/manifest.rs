use serde::{Deserialize, Serialize};

use super::plugin::PluginDescriptor;

/// Project-local list of installed plugins
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|p| p.name == name)
    }

    /// Append a descriptor. Returns false and leaves the manifest untouched
    /// when a plugin with the same name is already present.
    pub fn add(&mut self, descriptor: PluginDescriptor) -> bool {
        if self.contains(&descriptor.name) {
            return false;
        }
        self.plugins.push(descriptor);
        true
    }

    /// Drop every entry with a matching name, returning how many were removed
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.plugins.len();
        self.plugins.retain(|p| p.name != name);
        before - self.plugins.len()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> PluginDescriptor {
        PluginDescriptor::new(name, format!("https://example.com/{}.zip", name))
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut manifest = Manifest::new();
        assert!(manifest.add(descriptor("a")));
        let snapshot = manifest.clone();

        assert!(!manifest.add(descriptor("a").with_description("other")));
        assert_eq!(manifest, snapshot);
    }

    #[test]
    fn test_remove_filters_all_matches() {
        // Pre-existing duplicates are never deduplicated on load, only on remove
        let mut manifest = Manifest {
            plugins: vec![descriptor("a"), descriptor("b"), descriptor("a")],
        };
        assert_eq!(manifest.remove("a"), 2);
        assert_eq!(manifest.len(), 1);
        assert!(manifest.contains("b"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut manifest = Manifest {
            plugins: vec![descriptor("a")],
        };
        let snapshot = manifest.clone();
        assert_eq!(manifest.remove("missing"), 0);
        assert_eq!(manifest, snapshot);
    }

    #[test]
    fn test_empty_document_parses() {
        let manifest: Manifest = serde_yaml::from_str("plugins: []\n").unwrap();
        assert!(manifest.is_empty());
        let manifest: Manifest = serde_yaml::from_str("{}").unwrap();
        assert!(manifest.is_empty());
    }
}
