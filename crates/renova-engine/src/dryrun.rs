use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use renova_contracts::render::{
    ArchitectBrief, ArchitectOutput, ArchitectResult, RoomAnalysis, SourceImage,
};
use sha2::{Digest, Sha256};

use crate::capabilities::{
    Architect, ContentPart, GenerationResponse, ImageGenerator, VisionAnalyzer,
};

const DRYRUN_WIDTH: u32 = 512;
const DRYRUN_HEIGHT: u32 = 384;

/// Offline stand-in for every model capability. Images are flat colour
/// swatches derived from the prompt, so identical prompts give identical
/// bytes.
pub struct DryrunModels;

impl ImageGenerator for DryrunModels {
    fn generate(
        &self,
        prompt: &str,
        reference: Option<&SourceImage>,
    ) -> Result<GenerationResponse> {
        let (r, g, b) = color_from_prompt(prompt, reference.map(|image| image.bytes.as_slice()));
        let image = RgbImage::from_pixel(DRYRUN_WIDTH, DRYRUN_HEIGHT, Rgb([r, g, b]));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .context("dry-run image encode failed")?;
        Ok(GenerationResponse {
            parts: vec![
                ContentPart::Text("Dry-run render preview.".to_string()),
                ContentPart::InlineImage {
                    mime_type: "image/png".to_string(),
                    bytes: out.into_inner(),
                },
            ],
        })
    }
}

impl VisionAnalyzer for DryrunModels {
    fn analyze(&self, _image: &SourceImage) -> Result<RoomAnalysis> {
        Ok(RoomAnalysis::default())
    }
}

impl Architect for DryrunModels {
    /// Keeps whatever the client asked to keep.
    fn plan(&self, _image: &SourceImage, brief: &ArchitectBrief) -> Result<ArchitectResult> {
        let mut anchors = brief.keep_elements.clone();
        if !brief.structural_elements_text.trim().is_empty() {
            anchors.push(brief.structural_elements_text.trim().to_string());
        }
        let style_vision = format!(
            "A {} reimagined in {} style. {}",
            brief.room_type.trim(),
            brief.style.trim(),
            brief.user_prompt.trim()
        )
        .trim_end()
        .to_string();
        Ok(ArchitectResult::Structured(ArchitectOutput::new(
            anchors,
            style_vision,
            None,
        )))
    }
}

fn color_from_prompt(prompt: &str, reference: Option<&[u8]>) -> (u8, u8, u8) {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    if let Some(bytes) = reference {
        hasher.update(bytes);
    }
    let digest = hasher.finalize();
    (digest[0], digest[1], digest[2])
}

#[cfg(test)]
mod tests {
    use renova_contracts::render::ModificationType;

    use super::*;

    #[test]
    fn dryrun_images_are_deterministic_pngs() -> anyhow::Result<()> {
        let first = DryrunModels.generate("japandi kitchen", None)?;
        let second = DryrunModels.generate("japandi kitchen", None)?;
        let other = DryrunModels.generate("industrial loft", None)?;
        assert_eq!(first, second);
        assert_ne!(first, other);
        let (mime, bytes) = first.first_image().expect("image part");
        assert_eq!(mime, "image/png");
        assert_eq!(image::guess_format(bytes)?, ImageFormat::Png);
        Ok(())
    }

    #[test]
    fn dryrun_architect_keeps_requested_elements() -> anyhow::Result<()> {
        let brief = ArchitectBrief {
            room_type: "living room".to_string(),
            style: "rustic".to_string(),
            user_prompt: String::new(),
            structural_elements_text: "travi in legno".to_string(),
            keep_elements: vec!["camino".to_string()],
            modification_type: ModificationType::Renovation,
            analysis: RoomAnalysis::default(),
        };
        let image = SourceImage {
            bytes: vec![1],
            mime_type: "image/png".to_string(),
        };
        let ArchitectResult::Structured(output) = DryrunModels.plan(&image, &brief)? else {
            panic!("expected structured plan");
        };
        assert_eq!(
            output.structural_anchors,
            vec!["camino".to_string(), "travi in legno".to_string()]
        );
        assert_eq!(output.style_vision, "A living room reimagined in rustic style.");
        Ok(())
    }
}
