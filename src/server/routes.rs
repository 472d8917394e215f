//! Axum route handlers for the MoodyBot HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`
//! - `POST /api/users`, `GET /api/users/:id`
//! - `GET  /api/chat/sessions/:user_id`, `POST /api/chat/sessions`
//! - `GET  /api/chat/messages/:session_id`, `POST /api/chat/messages`
//! - `GET  /api/journal/:user_id`, `POST /api/journal`, `GET /api/journal/prompt?mood=`
//! - `GET  /api/quotes/:user_id`, `POST /api/quotes`, `POST /api/quotes/generate`
//! - `GET  /api/mood/:user_id`, `POST /api/mood`
//! - `GET  /api/damage-profile/:user_id`, `POST /api/damage-profile/analyze`
//! - `GET  /api/reflection-stacks`
//! - `POST /api/validation`
//! - `POST /api/persona/analyze`, `POST /api/persona/outcome`, `GET /api/persona/insights`

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::chat::handler::{self as generate, QuoteDraft, INTERACTIONS};
use crate::chat::modes::{mode_config, resolve_mode, AUTO_MODE};
use crate::chat::validation::{generate_validation, ValidationOutcome, ValidationRequest};
use crate::llms::base_llm::ChatCompletion;
use crate::llms::providers::OpenRouterCompletion;
use crate::persona::{PersonaAnalysis, PersonaEngine, PersonaStack};
use crate::storage::{MemStorage, Storage};
use crate::types::records::{
    ChatMessage, ChatSession, DamageProfile, InsertChatMessage, InsertChatSession,
    InsertDamageProfile, InsertJournalEntry, InsertMoodEntry, InsertQuoteCard, InsertUser,
    JournalEntry, MoodEntry, QuoteCard, RecordId, ReflectionStack, User,
};
use crate::utilities::config::AppConfig;
use crate::utilities::errors::{ApiError, LlmError};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub llm: Arc<dyn ChatCompletion>,
    pub engine: PersonaEngine,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// In-memory storage and an OpenRouter client built from `config`.
    pub fn new(config: AppConfig) -> Result<Self, LlmError> {
        let llm = OpenRouterCompletion::from_config(&config)?;
        Ok(Self::with_parts(Arc::new(MemStorage::new()), Arc::new(llm), config))
    }

    pub fn with_parts(
        storage: Arc<dyn Storage>,
        llm: Arc<dyn ChatCompletion>,
        config: AppConfig,
    ) -> Self {
        Self {
            storage,
            llm,
            engine: PersonaEngine::new(),
            config: Arc::new(config),
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/users", post(create_user_handler))
        .route("/api/users/:id", get(get_user_handler))
        .route("/api/chat/sessions", post(create_session_handler))
        .route("/api/chat/sessions/:user_id", get(list_sessions_handler))
        .route("/api/chat/messages", post(send_message_handler))
        .route("/api/chat/messages/:session_id", get(list_messages_handler))
        .route("/api/journal", post(create_journal_handler))
        .route("/api/journal/prompt", get(journal_prompt_handler))
        .route("/api/journal/:user_id", get(list_journal_handler))
        .route("/api/quotes", post(create_quote_handler))
        .route("/api/quotes/generate", post(generate_quote_handler))
        .route("/api/quotes/:user_id", get(list_quotes_handler))
        .route("/api/mood", post(create_mood_handler))
        .route("/api/mood/:user_id", get(list_moods_handler))
        .route("/api/damage-profile/analyze", post(analyze_damage_handler))
        .route("/api/damage-profile/:user_id", get(get_damage_profile_handler))
        .route("/api/reflection-stacks", get(list_reflection_stacks_handler))
        .route("/api/validation", post(validation_handler))
        .route("/api/persona/analyze", post(persona_analyze_handler))
        .route("/api/persona/outcome", post(persona_outcome_handler))
        .route("/api/persona/insights", get(persona_insights_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "moodybot",
        "llmConfigured": state.config.has_api_key(),
    }))
}

// ============================================================================
// Users
// ============================================================================

async fn create_user_handler(
    State(state): State<AppState>,
    Json(user): Json<InsertUser>,
) -> ApiResult<User> {
    if user.username.trim().is_empty() || user.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password required".into()));
    }
    Ok(Json(state.storage.create_user(user).await?))
}

async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> ApiResult<User> {
    state
        .storage
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

// ============================================================================
// Chat
// ============================================================================

async fn list_sessions_handler(
    State(state): State<AppState>,
    Path(user_id): Path<RecordId>,
) -> ApiResult<Vec<ChatSession>> {
    Ok(Json(state.storage.get_chat_sessions_by_user(user_id).await?))
}

async fn create_session_handler(
    State(state): State<AppState>,
    Json(session): Json<InsertChatSession>,
) -> ApiResult<ChatSession> {
    if !session.mode.eq_ignore_ascii_case(AUTO_MODE) && mode_config(&session.mode).is_none() {
        return Err(ApiError::UnknownMode(session.mode));
    }
    Ok(Json(state.storage.create_chat_session(session).await?))
}

async fn list_messages_handler(
    State(state): State<AppState>,
    Path(session_id): Path<RecordId>,
) -> ApiResult<Vec<ChatMessage>> {
    Ok(Json(state.storage.get_chat_messages(session_id).await?))
}

/// Body of `POST /api/chat/messages`. The text may come as `content` or
/// `message`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub session_id: RecordId,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub user_message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_auto_selected: Option<bool>,
}

/// POST /api/chat/messages — store a message and, for user messages,
/// generate and store the assistant reply.
async fn send_message_handler(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<SendMessageResponse> {
    let content = request
        .content
        .or(request.message)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message content required".into()))?;
    let role = request.role.unwrap_or_else(|| "user".to_string());

    let session = state
        .storage
        .get_chat_session(request.session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".into()))?;

    if role != "user" {
        let user_message = state
            .storage
            .create_chat_message(InsertChatMessage { session_id: session.id, role, content })
            .await?;
        return Ok(Json(SendMessageResponse {
            user_message,
            ai_message: None,
            selected_mode: None,
            is_auto_selected: None,
        }));
    }

    let mode = resolve_mode(request.mode.as_deref(), &session.mode, &content)?;
    let history = state.storage.get_chat_messages(session.id).await?;

    let user_message = state
        .storage
        .create_chat_message(InsertChatMessage {
            session_id: session.id,
            role,
            content: content.clone(),
        })
        .await?;

    let reply = generate::generate_chat_response(
        state.llm.as_ref(),
        &state.config.model_dynamic,
        &mode,
        &content,
        &history,
        Some(session.user_id),
        session.id,
    )
    .await;

    let ai_message = state
        .storage
        .create_chat_message(InsertChatMessage {
            session_id: session.id,
            role: "assistant".into(),
            content: reply.text,
        })
        .await?;

    Ok(Json(SendMessageResponse {
        user_message,
        ai_message: Some(ai_message),
        selected_mode: Some(mode.name),
        is_auto_selected: Some(mode.is_auto_selected),
    }))
}

// ============================================================================
// Journal
// ============================================================================

async fn list_journal_handler(
    State(state): State<AppState>,
    Path(user_id): Path<RecordId>,
) -> ApiResult<Vec<JournalEntry>> {
    Ok(Json(state.storage.get_journal_entries(user_id).await?))
}

async fn create_journal_handler(
    State(state): State<AppState>,
    Json(entry): Json<InsertJournalEntry>,
) -> ApiResult<JournalEntry> {
    Ok(Json(state.storage.create_journal_entry(entry).await?))
}

#[derive(Debug, Deserialize)]
struct JournalPromptQuery {
    mood: Option<String>,
}

async fn journal_prompt_handler(
    State(state): State<AppState>,
    Query(query): Query<JournalPromptQuery>,
) -> impl IntoResponse {
    let prompt = generate::generate_journal_prompt(
        state.llm.as_ref(),
        &state.config.model_dynamic,
        query.mood.as_deref(),
    )
    .await;
    Json(serde_json::json!({ "prompt": prompt }))
}

// ============================================================================
// Quotes
// ============================================================================

async fn list_quotes_handler(
    State(state): State<AppState>,
    Path(user_id): Path<RecordId>,
) -> ApiResult<Vec<QuoteCard>> {
    Ok(Json(state.storage.get_quote_cards(user_id).await?))
}

async fn create_quote_handler(
    State(state): State<AppState>,
    Json(card): Json<InsertQuoteCard>,
) -> ApiResult<QuoteCard> {
    Ok(Json(state.storage.create_quote_card(card).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateQuoteRequest {
    #[serde(default)]
    journal_content: String,
    user_id: Option<RecordId>,
}

async fn generate_quote_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuoteRequest>,
) -> ApiResult<QuoteCard> {
    let user_id = match request.user_id {
        Some(id) if !request.journal_content.trim().is_empty() => id,
        _ => return Err(ApiError::BadRequest("Journal content and user ID required".into())),
    };

    let QuoteDraft { quote, source } = generate::generate_quote_card(
        state.llm.as_ref(),
        &state.config.model_dynamic,
        &request.journal_content,
        user_id,
    )
    .await;

    let card = state
        .storage
        .create_quote_card(InsertQuoteCard {
            user_id,
            quote,
            source: Some(source),
            image_url: None,
        })
        .await?;
    Ok(Json(card))
}

// ============================================================================
// Mood
// ============================================================================

async fn list_moods_handler(
    State(state): State<AppState>,
    Path(user_id): Path<RecordId>,
) -> ApiResult<Vec<MoodEntry>> {
    Ok(Json(state.storage.get_mood_entries(user_id).await?))
}

async fn create_mood_handler(
    State(state): State<AppState>,
    Json(mood): Json<InsertMoodEntry>,
) -> ApiResult<MoodEntry> {
    if !mood.intensity_in_range() {
        return Err(ApiError::BadRequest(format!(
            "Intensity must be between {} and {}",
            InsertMoodEntry::MIN_INTENSITY,
            InsertMoodEntry::MAX_INTENSITY
        )));
    }
    Ok(Json(state.storage.create_mood_entry(mood).await?))
}

// ============================================================================
// Damage profile and reflection stacks
// ============================================================================

async fn get_damage_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<RecordId>,
) -> ApiResult<DamageProfile> {
    state
        .storage
        .get_damage_profile(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Damage profile not found".into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeDamageRequest {
    user_id: Option<RecordId>,
}

async fn analyze_damage_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeDamageRequest>,
) -> ApiResult<DamageProfile> {
    let user_id = request
        .user_id
        .ok_or_else(|| ApiError::BadRequest("User ID required".into()))?;

    let journal: Vec<String> = state
        .storage
        .get_journal_entries(user_id)
        .await?
        .into_iter()
        .map(|entry| entry.content)
        .collect();
    let moods = state.storage.get_mood_entries(user_id).await?;

    let analysis = generate::analyze_damage_patterns(
        state.llm.as_ref(),
        &state.config.model_dynamic,
        &journal,
        &moods,
        user_id,
    )
    .await;

    let profile = state
        .storage
        .upsert_damage_profile(InsertDamageProfile {
            user_id,
            patterns: analysis.patterns,
            triggers: analysis.triggers,
            loops: analysis.loops,
        })
        .await?;
    Ok(Json(profile))
}

async fn list_reflection_stacks_handler(
    State(state): State<AppState>,
) -> ApiResult<Vec<ReflectionStack>> {
    Ok(Json(state.storage.get_reflection_stacks().await?))
}

// ============================================================================
// Validation
// ============================================================================

async fn validation_handler(
    State(state): State<AppState>,
    Json(request): Json<ValidationRequest>,
) -> ApiResult<ValidationOutcome> {
    request.check()?;
    let outcome = generate_validation(
        state.llm.as_ref(),
        &state.config.model_validation,
        &request,
    )
    .await;
    tracing::info!(
        target: INTERACTIONS,
        kind = "validation",
        mode = request.mode.as_str(),
        fallback = outcome.is_fallback,
        "Validation interaction"
    );
    Ok(Json(outcome))
}

// ============================================================================
// Persona engine
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonaAnalyzeRequest {
    user_input: String,
    #[serde(default)]
    user_id: Option<String>,
}

async fn persona_analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<PersonaAnalyzeRequest>,
) -> Json<PersonaAnalysis> {
    let analysis = state.engine.analyze(&request.user_input, request.user_id.as_deref());
    tracing::info!(
        target: INTERACTIONS,
        kind = "persona_analysis",
        user = ?request.user_id,
        mode = %analysis.mode(),
        confidence = analysis.confidence,
        "Persona analysis interaction"
    );
    Json(analysis)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonaOutcomeRequest {
    user_id: String,
    persona_stack: PersonaStack,
    success: bool,
}

async fn persona_outcome_handler(
    State(state): State<AppState>,
    Json(request): Json<PersonaOutcomeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("User ID required".into()));
    }
    state
        .engine
        .record_outcome(&request.user_id, &request.persona_stack, request.success);
    Ok(Json(serde_json::json!({
        "recorded": true,
        "key": request.persona_stack.performance_key(),
    })))
}

async fn persona_insights_handler(State(state): State<AppState>) -> Json<BTreeMap<String, i64>> {
    Json(state.engine.performance_insights())
}
