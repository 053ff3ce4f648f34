//! Embedded page templates and static assets.

use std::sync::OnceLock;

use minijinja::{context, Environment};

use crate::error::ChatError;
use crate::format::DisplayMessage;
use crate::session::Flash;

pub const STYLESHEET: &str = include_str!("../../static/style.css");

static ENVIRONMENT: OnceLock<Environment<'static>> = OnceLock::new();

/// Get (or build) the shared template environment.
fn environment() -> &'static Environment<'static> {
    ENVIRONMENT.get_or_init(|| {
        let mut env = Environment::new();
        for (name, source) in [
            ("base.html", include_str!("../../templates/base.html")),
            ("index.html", include_str!("../../templates/index.html")),
            ("chat.html", include_str!("../../templates/chat.html")),
        ] {
            env.add_template(name, source)
                .expect("embedded templates must parse");
        }
        env
    })
}

/// Landing page. Also used as the 404 and 500 body.
pub fn render_index() -> Result<String, ChatError> {
    let template = environment().get_template("index.html")?;
    Ok(template.render(context! {})?)
}

/// Chat page with the formatted conversation and any pending notices.
pub fn render_chat(conversation: &[DisplayMessage], flashes: &[Flash]) -> Result<String, ChatError> {
    let template = environment().get_template("chat.html")?;
    Ok(template.render(context! {
        conversation => conversation,
        flashes => flashes,
    })?)
}
