use serde::{Deserialize, Serialize};
use std::fmt;

/// Paths a plugin owns under the install root, removed on uninstall
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UninstallSpec {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub directories: Vec<String>,
}

impl UninstallSpec {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// Per-plugin metadata record, as found in a registry file or manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub download_url: String,
    #[serde(default)]
    pub extract_prefix: String,
    #[serde(default)]
    pub uninstall: UninstallSpec,
}

/// Builders for fixtures; real descriptors come from YAML
#[cfg(test)]
impl PluginDescriptor {
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            download_url: download_url.into(),
            extract_prefix: String::new(),
            uninstall: UninstallSpec::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_extract_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.extract_prefix = prefix.into();
        self
    }

    pub fn with_uninstall_file(mut self, path: impl Into<String>) -> Self {
        self.uninstall.files.push(path.into());
        self
    }

    pub fn with_uninstall_directory(mut self, path: impl Into<String>) -> Self {
        self.uninstall.directories.push(path.into());
        self
    }
}

impl fmt::Display for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} - {}", self.name, self.description)
        }
    }
}
