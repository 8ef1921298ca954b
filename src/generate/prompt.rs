//! The floor replacement prompt
//!
//! The model reads image position as role: the first image is the base
//! photo, the ones after it are material references.

use super::GenerationRequest;
use crate::openrouter::ContentPart;

/// Instruction text sent ahead of the images
pub const FLOOR_PROMPT: &str = "Photorealistic interior image edit using multiple reference images: keep the base atmosphere photo exactly the same in terms of camera angle, composition, furniture, walls, lighting, shadows, and overall mood. Replace only the existing floor in the base image with the floor material, color, pattern, and texture taken from the second reference atmosphere photo. Accurately transfer the floor's plank dimensions, laying pattern (e.g. herringbone, straight, tiles), grain structure, finish (matte, satin, glossy), and natural variations. Ensure correct perspective, scale, and alignment with the room geometry. Maintain realistic contact shadows, reflections, and light interaction between the new floor and all objects. High-end interior photography quality, seamless material blending, natural color balance, ultra-realistic details, no visual artifacts or distortions.";

/// Build the ordered content: prompt, room image, then floor samples
pub fn build_content(request: &GenerationRequest) -> Vec<ContentPart> {
    let floors = request.floor_images();
    let mut content = Vec::with_capacity(2 + floors.len());
    content.push(ContentPart::text(FLOOR_PROMPT));
    content.push(ContentPart::image(&request.room_image));
    content.extend(floors.iter().map(|url| ContentPart::image(url)));
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_order() {
        let req = GenerationRequest::new(
            "room",
            vec!["f1".into(), "f2".into(), "f3".into(), "f4".into()],
        );
        let content = build_content(&req);
        assert_eq!(
            content,
            vec![
                ContentPart::text(FLOOR_PROMPT),
                ContentPart::image("room"),
                ContentPart::image("f1"),
                ContentPart::image("f2"),
                ContentPart::image("f3"),
            ]
        );
    }

    #[test]
    fn test_single_floor() {
        let req = GenerationRequest::new("room", vec!["f1".into()]);
        assert_eq!(build_content(&req).len(), 3);
    }

    #[test]
    fn test_prompt_only_replaces_floor() {
        assert!(FLOOR_PROMPT.contains("Replace only the existing floor"));
        assert!(FLOOR_PROMPT.contains("camera angle"));
    }
}
