//! Compose session handlers for the REST API.
//!
//! One session per in-progress message; all draft mutation, generation,
//! preview, and sending goes through these endpoints. Locks on the session
//! registry are never held across provider or dispatch awaits.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use outreach_core::compose::session::{ComposeSession, DraftEdit, RenderedPreview};
use outreach_types::batch::SendBatchResult;
use outreach_types::compose::AudienceId;
use outreach_types::draft::MessageDraft;
use outreach_types::template::{Template, TemplateId};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Wire view of a compose session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub step: String,
    pub draft: MessageDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_id: Option<AudienceId>,
}

impl SessionView {
    fn from_session(session: &ComposeSession) -> Self {
        Self {
            id: session.id,
            step: session.step().to_string(),
            draft: session.draft().clone(),
            audience_id: session.audience_id().cloned(),
        }
    }
}

/// Template selection payload. Templates are supplied by the caller; this
/// service does not store a template library.
#[derive(Debug, Deserialize)]
pub struct SelectTemplateBody {
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// Audience selection payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAudienceBody {
    pub audience_id: String,
}

fn session_link(id: Uuid) -> String {
    format!("/api/v1/compose/sessions/{id}")
}

/// POST /api/v1/compose/sessions - Start a new compose session.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = ComposeSession::new();
    let view = SessionView::from_session(&session);
    let id = session.id;
    state.sessions.insert(id, session);

    tracing::info!(session_id = %id, "compose session created");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(view, request_id, elapsed)
        .with_link("self", &session_link(id))
        .with_link("template", &format!("{}/template", session_link(id)));
    Ok(Json(resp))
}

/// GET /api/v1/compose/sessions/:id - Inspect a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state.sessions.get(&id).ok_or(AppError::SessionNotFound)?;
    let view = SessionView::from_session(&session);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp =
        ApiResponse::success(view, request_id, elapsed).with_link("self", &session_link(id));
    Ok(Json(resp))
}

/// DELETE /api/v1/compose/sessions/:id - Abandon a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .sessions
        .remove(&id)
        .ok_or(AppError::SessionNotFound)?;
    tracing::info!(session_id = %id, "compose session abandoned");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true}),
        request_id,
        elapsed,
    );
    Ok(Json(resp))
}

/// POST /api/v1/compose/sessions/:id/template - Select a template and
/// advance to audience selection.
pub async fn select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectTemplateBody>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if body.subject.trim().is_empty() && body.body.trim().is_empty() {
        return Err(AppError::Validation(
            "template must have a subject or a body".to_string(),
        ));
    }

    let template = Template::new(TemplateId::new(), body.name, body.subject, body.body);

    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or(AppError::SessionNotFound)?;
    session.select_template(&template)?;
    let view = SessionView::from_session(&session);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp =
        ApiResponse::success(view, request_id, elapsed).with_link("self", &session_link(id));
    Ok(Json(resp))
}

/// POST /api/v1/compose/sessions/:id/audience - Select an audience and
/// advance to editing. The audience is validated against the directory at
/// send time, not here.
pub async fn select_audience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectAudienceBody>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if body.audience_id.trim().is_empty() {
        return Err(AppError::Validation("audienceId must not be empty".to_string()));
    }

    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or(AppError::SessionNotFound)?;
    session.select_audience(AudienceId(body.audience_id))?;
    let view = SessionView::from_session(&session);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp =
        ApiResponse::success(view, request_id, elapsed).with_link("self", &session_link(id));
    Ok(Json(resp))
}

/// PUT /api/v1/compose/sessions/:id/draft - Edit the draft. Absent fields
/// are left unchanged.
pub async fn edit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edit): Json<DraftEdit>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or(AppError::SessionNotFound)?;
    session.edit(edit)?;
    let view = SessionView::from_session(&session);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp =
        ApiResponse::success(view, request_id, elapsed).with_link("self", &session_link(id));
    Ok(Json(resp))
}

/// POST /api/v1/compose/sessions/:id/generate - Ask the draft generator
/// for a candidate and merge it into the draft.
///
/// The registry lock is released before the provider call; the session is
/// re-fetched afterwards because it may have been deleted while the call
/// was in flight.
pub async fn generate_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let context = {
        let session = state.sessions.get(&id).ok_or(AppError::SessionNotFound)?;
        session.generation_context()?
    };

    let generated = state
        .generator
        .generate(&context, state.generation_timeout, &state.shutdown)
        .await?;

    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or(AppError::SessionNotFound)?;
    session.apply_generated(generated)?;
    let view = SessionView::from_session(&session);

    let elapsed = start.elapsed().as_millis() as u64;
    tracing::info!(session_id = %id, elapsed_ms = elapsed, "draft generated");

    let resp =
        ApiResponse::success(view, request_id, elapsed).with_link("self", &session_link(id));
    Ok(Json(resp))
}

/// POST /api/v1/compose/sessions/:id/back - Step back to the immediate
/// predecessor. Field values survive.
pub async fn step_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or(AppError::SessionNotFound)?;
    session.back()?;
    let view = SessionView::from_session(&session);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp =
        ApiResponse::success(view, request_id, elapsed).with_link("self", &session_link(id));
    Ok(Json(resp))
}

/// POST /api/v1/compose/sessions/:id/preview - Advance from editing to
/// the preview step and render the draft against sample attributes.
pub async fn advance_to_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RenderedPreview>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or(AppError::SessionNotFound)?;
    session.advance_to_preview()?;
    let preview = session.preview()?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(preview, request_id, elapsed)
        .with_link("self", &format!("{}/preview", session_link(id)))
        .with_link("send", &format!("{}/send", session_link(id)));
    Ok(Json(resp))
}

/// GET /api/v1/compose/sessions/:id/preview - Re-render the preview
/// without changing the step.
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RenderedPreview>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state.sessions.get(&id).ok_or(AppError::SessionNotFound)?;
    let preview = session.preview()?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(preview, request_id, elapsed)
        .with_link("self", &format!("{}/preview", session_link(id)));
    Ok(Json(resp))
}

/// POST /api/v1/compose/sessions/:id/send - Dispatch the draft to the
/// selected audience. The session is discarded once a batch result exists.
pub async fn send(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SendBatchResult>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (audience_id, draft) = {
        let session = state.sessions.get(&id).ok_or(AppError::SessionNotFound)?;
        let (audience_id, draft) = session.confirm_send()?;
        (audience_id.clone(), draft.clone())
    };

    let result = state
        .dispatcher
        .send(&audience_id, &draft, &state.shutdown)
        .await?;

    // A batch result exists, so the session's work is done even when some
    // recipients failed.
    state.sessions.remove(&id);

    let elapsed = start.elapsed().as_millis() as u64;
    tracing::info!(
        session_id = %id,
        total_sent = result.total_sent,
        failed = result.failures.len(),
        elapsed_ms = elapsed,
        "batch dispatched"
    );

    let resp = ApiResponse::success(result, request_id, elapsed);
    Ok(Json(resp))
}
