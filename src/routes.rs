use axum::{Json, extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}};
use std::{collections::HashMap, sync::Arc};
use futures::future::join_all;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;
use chrono::Utc;

use crate::{
    concepts::{concept_catalog, AdConcept, ConceptInfo},
    gemini::{AdImageGenerator, GeminiError, GENERIC_FAILURE},
    models::{AdVariation, Campaign, CreateCampaignRequest, ProductInput, UploadRequest},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<HashMap<Uuid, Campaign>>>,
    pub generator: Arc<dyn AdImageGenerator>,
}

pub async fn list_concepts() -> Json<Vec<ConceptInfo>> {
    Json(concept_catalog())
}

pub async fn create_campaign(State(state): State<AppState>, Json(body): Json<CreateCampaignRequest>) -> Json<Campaign> {
    let id = Uuid::new_v4();
    let product = body.product
        .filter(|u| !u.image.is_empty())
        .map(|u| ProductInput::from_upload(&u.image, &u.mime_type, u.name));

    tracing::info!("🚀 Creating campaign {} (product attached: {})", id, product.is_some());

    let now = Utc::now();
    let campaign = Campaign {
        id,
        product,
        variations: Vec::new(),
        generating: false,
        run: 0,
        created_at: now,
        updated_at: now,
    };
    state.store.write().insert(id, campaign.clone());
    Json(campaign)
}

pub async fn get_campaign(Path(id): Path<Uuid>, State(state): State<AppState>) -> Response {
    if let Some(c) = state.store.read().get(&id).cloned() { Json(c).into_response() } else { StatusCode::NOT_FOUND.into_response() }
}

/// Attach or replace the product photo. An empty payload means no file was
/// chosen and leaves the campaign untouched.
pub async fn attach_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(body): Json<UploadRequest>
) -> Result<Json<Campaign>, StatusCode> {
    if body.image.is_empty() {
        let guard = state.store.read();
        let campaign = guard.get(&id).ok_or(StatusCode::NOT_FOUND)?;
        return Ok(Json(campaign.clone()));
    }

    let product = ProductInput::from_upload(&body.image, &body.mime_type, body.name);
    tracing::info!("📦 Attaching product '{}' ({}) to campaign {}", product.name.as_deref().unwrap_or("unnamed"), product.mime_type, id);

    let mut guard = state.store.write();
    let campaign = guard.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    campaign.product = Some(product);
    campaign.updated_at = Utc::now();
    Ok(Json(campaign.clone()))
}

pub async fn generate_variations(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<Campaign>, StatusCode> {
    match spawn_run(&state, id) {
        RunStart::NotFound => Err(StatusCode::NOT_FOUND),
        RunStart::Skipped(campaign) => Ok(Json(campaign)),
        RunStart::Started(campaign, _settled) => Ok(Json(campaign)),
    }
}

pub enum RunStart {
    NotFound,
    /// Campaign has no product yet; the trigger is a silent no-op.
    Skipped(Campaign),
    /// Run initialized; the handle resolves once every variation has settled.
    Started(Campaign, JoinHandle<()>),
}

/// Kick off one generation run: publish four loading-state variations, fan out
/// one task per concept, and settle the run once all of them finish.
pub fn spawn_run(state: &AppState, id: Uuid) -> RunStart {
    let (product, token, snapshot) = {
        let mut guard = state.store.write();
        let campaign = match guard.get_mut(&id) {
            Some(c) => c,
            None => return RunStart::NotFound,
        };
        let product = match campaign.product.clone() {
            Some(p) => p,
            None => return RunStart::Skipped(campaign.clone()),
        };

        // Bump the token first so settlements of any in-flight run are orphaned.
        campaign.run += 1;
        campaign.generating = true;
        campaign.variations = AdConcept::ALL.iter().copied().map(AdVariation::pending).collect();
        campaign.updated_at = Utc::now();
        (product, campaign.run, campaign.clone())
    };

    tracing::info!("🚀 Starting run {} for campaign {} with {} concepts", token, id, AdConcept::ALL.len());

    let mut tasks = Vec::new();
    for concept in AdConcept::ALL {
        let state = state.clone();
        let product = product.clone();
        tasks.push(tokio::spawn(async move {
            let result = state.generator.generate_ad(&product, concept.prompt()).await;
            settle_variation(&state, id, token, concept, result);
        }));
    }

    let supervisor = state.clone();
    let settled = tokio::spawn(async move {
        join_all(tasks).await;
        finish_run(&supervisor, id, token);
    });

    RunStart::Started(snapshot, settled)
}

/// Applies one concept's outcome to its own slot, replace-by-identifier.
/// Results from a superseded run are dropped.
fn settle_variation(state: &AppState, id: Uuid, token: u64, concept: AdConcept, result: Result<String, GeminiError>) {
    let mut guard = state.store.write();
    let campaign = match guard.get_mut(&id) {
        Some(c) => c,
        None => return,
    };
    if campaign.run != token {
        tracing::info!("⏭️ Discarding stale result for '{}' (run {} superseded by {})", concept, token, campaign.run);
        return;
    }

    campaign.variations = campaign.variations.iter().map(|v| {
        if v.id != concept { return v.clone(); }
        let mut settled = v.clone();
        settled.loading = false;
        match &result {
            Ok(image) => {
                settled.image = Some(image.clone());
                settled.error = None;
            }
            Err(e) => {
                settled.error = Some(failure_message(e));
                settled.image = None;
            }
        }
        settled
    }).collect();
    campaign.updated_at = Utc::now();

    match &result {
        Ok(image) => tracing::info!("✅ Concept '{}' settled with image: {}", concept, preview(image)),
        Err(e) => tracing::error!("❌ Concept '{}' failed: {}", concept, e),
    }
}

/// Marks the run settled once every concept has landed, then logs a summary.
fn finish_run(state: &AppState, id: Uuid, token: u64) {
    let mut guard = state.store.write();
    let campaign = match guard.get_mut(&id) {
        Some(c) => c,
        None => return,
    };
    if campaign.run != token { return; }

    campaign.generating = false;
    campaign.updated_at = Utc::now();

    let summary: Vec<String> = campaign.variations.iter().map(|v| {
        let outcome = match (&v.image, &v.error) {
            (Some(image), _) => preview(image),
            (None, Some(err)) => format!("error: {}", err),
            (None, None) => "pending".to_string(),
        };
        format!("{}: {}", v.concept, outcome)
    }).collect();
    tracing::info!("✅ Run {} settled with {} variations: {}", token, campaign.variations.len(), summary.join(", "));
}

/// Human-readable text for a failed variation; never empty.
fn failure_message(e: &GeminiError) -> String {
    let message = e.to_string();
    if message.is_empty() { GENERIC_FAILURE.to_string() } else { message }
}

fn preview(data: &str) -> String {
    if data.len() > 50 { format!("{}...[{} chars total]", &data[..50], data.len()) } else { data.to_string() }
}
