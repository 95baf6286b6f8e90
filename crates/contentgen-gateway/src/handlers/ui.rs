//! Server-rendered Interaction Surface, one `Surface` per session cookie.
//!
//! The session's lock is released while the provider call runs, so the surface shows
//! `Submitting` to any request that arrives meanwhile and that request is turned away with 409.

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use contentgen_core::{
    render_page,
    surface::{MSG_GENERATION_FAILED, MSG_IN_FLIGHT},
    ContentCategory, ErrorReport, SubmitRejected,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::sessions::SessionHandle;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SurfaceForm {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub prompt: String,
}

fn page_response(session: &SessionHandle, status: StatusCode, html: String) -> Response {
    let mut res = (status, Html(html)).into_response();
    if let Some(cookie) = session.set_cookie() {
        res.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    res
}

/// `GET /`
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers);
    let html = {
        let surface = session.surface.lock().await;
        render_page(&surface, None)
    };
    page_response(&session, StatusCode::OK, html)
}

/// `POST /`
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SurfaceForm>,
) -> Response {
    let session = state.sessions.resolve(&headers);

    let request = {
        let mut surface = session.surface.lock().await;
        if surface.is_submitting() {
            tracing::info!(session = %session.id, "submission rejected: request already in flight");
            let html = render_page(&surface, Some(MSG_IN_FLIGHT));
            return page_response(&session, StatusCode::CONFLICT, html);
        }
        surface.set_category(ContentCategory::from_tag(form.kind.as_deref()));
        surface.set_prompt(form.prompt);
        match surface.begin_submit() {
            Ok(request) => request,
            Err(SubmitRejected::EmptyPrompt) | Err(SubmitRejected::InFlight) => {
                let html = render_page(&surface, None);
                return page_response(&session, StatusCode::OK, html);
            }
        }
    };

    // Spawned: the outcome is applied to the surface even if the client disconnects.
    let expose = state.config.expose_details();
    let dispatcher = Arc::clone(&state.dispatcher);
    let surface = Arc::clone(&session.surface);
    let task = tokio::spawn(async move {
        let outcome = dispatcher.generate(request).await.map_err(|e| e.report(expose));
        let mut surface = surface.lock().await;
        surface.finish(outcome);
        render_page(&surface, None)
    });

    let html = match task.await {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(session = %session.id, error = %e, "generation task failed");
            let mut surface = session.surface.lock().await;
            surface.finish(Err(ErrorReport::new(MSG_GENERATION_FAILED)));
            render_page(&surface, None)
        }
    };
    page_response(&session, StatusCode::OK, html)
}
