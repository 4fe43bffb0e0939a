use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

use crate::config::AssignmentConfig;
use crate::error::{ConfigError, Result};
use crate::assign::mapping::ImageMapping;
use crate::script::types::{scene_pairs, Video};

/// Deterministic scene-to-image assignment
///
/// 1. The first image whose file name matches a title token is reserved for the
///    first scene in document order.
/// 2. Every other scene, in document order, takes the next unused image. Scenes
///    beyond the pool stay unmapped and images beyond the scenes stay unused.
pub struct ImageAssigner {
    title_patterns: Vec<Regex>,
}

impl ImageAssigner {
    pub fn new(config: &AssignmentConfig) -> Result<Self> {
        let title_patterns = config
            .title_tokens
            .iter()
            .map(|token| {
                RegexBuilder::new(token)
                    .case_insensitive(true)
                    .build()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "assignment.title_tokens".to_string(),
                        value: token.clone(),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { title_patterns })
    }

    /// Index of the first image whose file name looks like the product title card
    pub fn find_title_card(&self, images: &[PathBuf]) -> Option<usize> {
        images.iter().position(|path| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            self.title_patterns.iter().any(|pattern| pattern.is_match(&name))
        })
    }

    /// Build the mapping for `videos` from images sorted by lower-cased name
    pub fn assign(&self, videos: &[Video], images: &[PathBuf]) -> ImageMapping {
        let mut mapping = ImageMapping::new();
        let mut pool: Vec<&PathBuf> = images.iter().collect();

        let first_key = scene_pairs(videos)
            .next()
            .map(|(video, scene)| video.key_for(scene));

        if let (Some(key), Some(index)) = (first_key, self.find_title_card(images)) {
            let title = pool.remove(index);
            debug!("Reserved title card {} for {}", title.display(), key);
            mapping.insert(key, title.clone());
        }

        let mut pool = pool.into_iter();
        for (video, scene) in scene_pairs(videos) {
            let key = video.key_for(scene);
            if mapping.contains(&key) {
                continue;
            }
            match pool.next() {
                Some(image) => mapping.insert(key, image.clone()),
                None => break,
            }
        }

        info!(
            "Assigned {} of {} images to scenes",
            mapping.len(),
            images.len()
        );
        mapping
    }
}
