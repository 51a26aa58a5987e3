use serde::{Deserialize, Serialize};

/// The four fixed creative directions. Compiled in; not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdConcept {
    #[serde(rename = "Premium Luxury")]
    Premium,
    #[serde(rename = "Youthful & Vibrant")]
    Vibrant,
    #[serde(rename = "High-Tech Futuristic")]
    Tech,
    #[serde(rename = "Lifestyle & Emotional")]
    Lifestyle,
}

impl AdConcept {
    pub const ALL: [AdConcept; 4] = [Self::Premium, Self::Vibrant, Self::Tech, Self::Lifestyle];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Premium => "Premium Luxury",
            Self::Vibrant => "Youthful & Vibrant",
            Self::Tech => "High-Tech Futuristic",
            Self::Lifestyle => "Lifestyle & Emotional",
        }
    }

    /// Short style tag shown on the result card.
    pub fn style(&self) -> &'static str {
        match self {
            Self::Premium => "Luxury Minimalist",
            Self::Vibrant => "Modern Pop Art",
            Self::Tech => "Cyberpunk Tech",
            Self::Lifestyle => "Warm Authentic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Premium => "Focuses on high-end appeal with sophisticated lighting and premium materials to elevate brand perceived value.",
            Self::Vibrant => "Uses high-contrast colors and dynamic shapes to stop the scroll and attract younger demographics.",
            Self::Tech => "Emphasizes innovation and the 'next-gen' aspect with neon accents and futuristic digital elements.",
            Self::Lifestyle => "Builds trust and emotional connection by placing the product in a relatable, everyday high-quality setting.",
        }
    }

    /// The generation prompt sent to Gemini for this creative direction.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Premium => "Transform this image into a high-end luxury advertisement. Place the product on a minimalist pedestal made of polished marble or dark obsidian. Use soft, cinematic studio lighting with elegant shadows. The background should be a sophisticated, blurred architectural space with neutral tones (beige, charcoal, or gold accents). Commercial grade quality, 8k resolution, professional lighting.",
            Self::Vibrant => "Transform this image into a youthful and vibrant digital ad. Use a pop-art or trendy social media aesthetic with bright, saturated pastel colors. Surround the product with energetic 3D geometric shapes (spheres, zig-zags) and dynamic lighting. The composition should feel high-energy and eye-catching for Gen Z/Millennial audiences. Sharp, clean, and modern.",
            Self::Tech => "Transform this image into a high-tech futuristic advertisement. The setting should be a sleek, dark cyberpunk lab or a floating digital space. Add glowing neon blue and magenta highlights. Include subtle digital interfaces, holographic patterns, or floating data particles in the background. Use metallic and glass textures to emphasize cutting-edge technology. Sci-fi aesthetic.",
            Self::Lifestyle => "Transform this image into an emotional lifestyle advertisement. Place the product in a realistic, cozy, sunlit modern home setting (like a wooden coffee table or a bright window sill) or a beautiful outdoor garden with soft bokeh. Use warm, natural sunlight to create a relatable and trustworthy vibe. Focus on authentic human-centric environments that make the viewer feel comfortable and connected.",
        }
    }
}

impl std::fmt::Display for AdConcept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display metadata for one concept, as served to the frontend.
#[derive(Debug, Serialize, Clone)]
pub struct ConceptInfo {
    pub id: AdConcept,
    pub style: &'static str,
    pub description: &'static str,
}

pub fn concept_catalog() -> Vec<ConceptInfo> {
    AdConcept::ALL
        .iter()
        .map(|c| ConceptInfo { id: *c, style: c.style(), description: c.description() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_has_one_entry_per_concept() {
        let catalog = concept_catalog();
        assert_eq!(catalog.len(), 4);
        for (info, concept) in catalog.iter().zip(AdConcept::ALL) {
            assert_eq!(info.id, concept);
        }
    }

    #[test]
    fn registry_texts_are_non_empty() {
        for concept in AdConcept::ALL {
            assert!(!concept.prompt().is_empty());
            assert!(!concept.style().is_empty());
            assert!(!concept.description().is_empty());
            assert!(!concept.label().is_empty());
        }
    }

    #[test]
    fn concept_serializes_as_its_label() {
        let json = serde_json::to_string(&AdConcept::Vibrant).unwrap();
        assert_eq!(json, "\"Youthful & Vibrant\"");
        let back: AdConcept = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AdConcept::Vibrant);
    }
}
