use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};

use crate::capabilities::ObjectStorage;

/// Filesystem bucket served under `public_base_url`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn upload(
        &self,
        image: &[u8],
        mime_type: &str,
        session_id: &str,
        slug: &str,
    ) -> Result<String> {
        let session = path_segment(session_id);
        let slug = path_segment(slug);
        if session.is_empty() || slug.is_empty() {
            bail!("session id and slug must contain at least one safe character");
        }
        let file_name = format!("{slug}.{}", extension_for_mime(mime_type));
        let dir = self.root.join(&session);
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(&file_name);
        fs::write(&path, image).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(format!("{}/{session}/{file_name}", self.public_base_url))
    }
}

/// `living-room-japandi-1a2b3c4d`: readable, and unique per image content.
pub fn render_slug(room_type: &str, style: &str, image: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image);
    let digest = hasher.finalize();
    let hash = hex::encode(&digest[..4]);
    [kebab(room_type), kebab(style), hash]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<String>>()
        .join("-")
}

fn kebab(raw: &str) -> String {
    raw.to_ascii_lowercase()
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

fn path_segment(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .collect()
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}
