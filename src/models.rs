use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::concepts::AdConcept;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductInput {
    pub image: String, // data URL, e.g. "data:image/png;base64,...."
    pub mime_type: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProductInput {
    /// Normalizes an uploaded payload (full data URL or bare base64) into a
    /// self-contained data URL carrying the supplied mime type.
    pub fn from_upload(image: &str, mime_type: &str, name: Option<String>) -> Self {
        let image = if image.starts_with("data:") {
            image.to_string()
        } else {
            format!("data:{};base64,{}", mime_type, image)
        };
        Self { image, mime_type: mime_type.to_string(), name }
    }

    /// Raw base64 payload with the data-URL prefix stripped, as sent on the wire.
    pub fn raw_base64(&self) -> &str {
        match self.image.split_once(',') {
            Some((_, payload)) => payload,
            None => &self.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdVariation {
    pub id: AdConcept,
    pub concept: AdConcept,
    pub style: String,
    pub description: String,
    pub image: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AdVariation {
    /// Fresh loading-state entry for one concept, as published when a run starts.
    pub fn pending(concept: AdConcept) -> Self {
        Self {
            id: concept,
            concept,
            style: concept.style().to_string(),
            description: concept.description().to_string(),
            image: None,
            loading: true,
            error: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub product: Option<ProductInput>,
    pub variations: Vec<AdVariation>,
    pub generating: bool,
    /// Generation counter; a settlement carrying an older value is discarded.
    pub run: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub product: Option<UploadRequest>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadRequest {
    pub image: String,
    pub mime_type: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn upload_round_trips_through_data_url() {
        let raw = "iVBORw0KGgoAAAANSUhEUg==";
        let product = ProductInput::from_upload(raw, "image/png", Some("photo.png".into()));
        assert_eq!(product.image, format!("data:image/png;base64,{raw}"));
        assert_eq!(product.raw_base64(), raw);
    }

    #[test]
    fn upload_keeps_an_existing_data_url() {
        let url = "data:image/jpeg;base64,/9j/4AAQ";
        let product = ProductInput::from_upload(url, "image/jpeg", None);
        assert_eq!(product.image, url);
        assert_eq!(product.raw_base64(), "/9j/4AAQ");
    }

    #[test]
    fn pending_variation_is_in_loading_state_only() {
        let v = AdVariation::pending(AdConcept::Premium);
        assert_eq!(v.id, AdConcept::Premium);
        assert_eq!(v.concept, AdConcept::Premium);
        assert!(v.loading);
        assert!(v.image.is_none());
        assert!(v.error.is_none());
        assert_eq!(v.style, "Luxury Minimalist");
    }
}
