use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::types::ImageId;

/// The image table for a level set, loaded from a JSON manifest.
///
/// Names map to dense ids in manifest order; id 0 is always the
/// placeholder, drawn whenever a name cannot be resolved. Hosts load
/// the files behind these ids however they like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    /// Image file names, placeholder first. Index = `ImageId`.
    images: Vec<String>,
    /// Name → id lookup, derived from `images`.
    #[serde(skip)]
    by_name: HashMap<String, ImageId>,
}

impl ImageSet {
    /// A table with only the placeholder entry.
    pub fn new() -> Self {
        let mut set = Self {
            images: vec!["placeholder.png".to_string()],
            by_name: HashMap::new(),
        };
        set.rebuild_index();
        set
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut set: Self = serde_json::from_str(json)?;
        if set.images.is_empty() {
            set.images.push("placeholder.png".to_string());
        }
        set.rebuild_index();
        Ok(set)
    }

    fn rebuild_index(&mut self) {
        self.by_name = self
            .images
            .iter()
            .enumerate()
            .map(|(i, name)| (stem(name).to_string(), ImageId(i as u32)))
            .collect();
    }

    /// Register an image name, returning its id. Existing names keep
    /// their id.
    pub fn insert(&mut self, name: &str) -> ImageId {
        if let Some(id) = self.by_name.get(stem(name)) {
            return *id;
        }
        let id = ImageId(self.images.len() as u32);
        self.images.push(name.to_string());
        self.by_name.insert(stem(name).to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<ImageId> {
        self.by_name.get(stem(name)).copied()
    }

    /// Resolve a name, falling back to the placeholder with a warning.
    pub fn get_or_placeholder(&self, name: &str) -> ImageId {
        match self.get(name) {
            Some(id) => id,
            None => {
                warn!("image {name:?} not in the image set, using placeholder");
                ImageId::PLACEHOLDER
            }
        }
    }

    /// The file name behind an id, if the id is in range.
    pub fn file_name(&self, id: ImageId) -> Option<&str> {
        self.images.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for ImageSet {
    fn default() -> Self {
        Self::new()
    }
}

/// File name without directory or extension; the lookup key.
fn stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.rsplit_once('.').map_or(base, |(s, _)| s)
}
