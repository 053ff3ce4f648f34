//! Route handlers.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::completion::INPUT_CHARS;
use crate::format::format_conversation;
use crate::session::FlashLevel;
use crate::types::Message;
use crate::util::text::truncate_chars;

use super::error::AppError;
use super::session::Session;
use super::templates;
use super::AppState;

pub const NO_RESPONSE_NOTICE: &str = "Sorry, I could not get a response. Please try again.";
pub const NETWORK_ERROR_NOTICE: &str = "Network error. Please check your connection and try again.";
pub const CLEARED_NOTICE: &str = "Conversation cleared.";

const CHAT_PATH: &str = "/chat";

#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub async fn index() -> Result<Html<String>, AppError> {
    Ok(Html(templates::render_index()?))
}

pub async fn chat_page(mut session: Session) -> Result<(Session, Html<String>), AppError> {
    let flashes = session.data.take_flashes();
    let conversation = format_conversation(session.data.conversation_mut().messages());
    let body = templates::render_chat(&conversation, &flashes)?;
    Ok((session, Html(body)))
}

pub async fn send_message(
    State(state): State<AppState>,
    mut session: Session,
    form: Result<Form<ChatForm>, FormRejection>,
) -> (Session, Redirect) {
    // An unreadable body counts as an empty message.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, session = %session.id(), "Ignoring unreadable chat form");
            ChatForm::default()
        }
    };
    let user_message = form.message.trim();

    if !user_message.is_empty() {
        let user_message = truncate_chars(user_message, INPUT_CHARS);
        let conversation = session.data.conversation_mut();
        conversation.push(Message::user(user_message));

        match state
            .responder
            .get_response(user_message, conversation.messages())
            .await
        {
            Ok(reply) if !reply.is_empty() => {
                conversation.push(Message::assistant(reply));
            }
            Ok(_) => {
                session.data.flash(FlashLevel::Error, NO_RESPONSE_NOTICE);
            }
            Err(e) => {
                error!(error = %e, session = %session.id(), "Error getting AI response");
                session.data.flash(FlashLevel::Error, NETWORK_ERROR_NOTICE);
            }
        }
    }

    let dropped = session.data.conversation_mut().enforce_cap();
    if dropped > 0 {
        debug!(dropped, session = %session.id(), "Trimmed conversation history");
    }

    (session, Redirect::to(CHAT_PATH))
}

pub async fn clear(mut session: Session) -> (Session, Redirect) {
    session.data.conversation = None;
    session.data.flash(FlashLevel::Info, CLEARED_NOTICE);
    info!(session = %session.id(), "Conversation cleared");
    (session, Redirect::to(CHAT_PATH))
}

pub async fn stylesheet() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/css; charset=utf-8")],
        templates::STYLESHEET,
    )
}

pub async fn not_found() -> Response {
    match templates::render_index() {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(e) => AppError(e).into_response(),
    }
}
