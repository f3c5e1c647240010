//! src/routes/home.rs
use crate::configuration::Theme;
use crate::notify::{Notice, Severity};
use crate::session_state::TypedSession;
use crate::subscription::{SubscriptionController, View};
use crate::utils::e500;
use actix_web::{http::header::ContentType, web, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use htmlescape::encode_minimal;
use std::fmt::Write;

#[tracing::instrument(name = "GET /", skip(session, controller, theme, flash_messages))]
pub async fn home(
    session: TypedSession,
    controller: web::Data<SubscriptionController>,
    theme: web::Data<Theme>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, actix_web::Error> {
    let visitor = session.visitor().map_err(e500)?;
    let notices: Vec<Notice> = flash_messages.iter().map(Notice::from_flash).collect();

    let body = render(controller.view(&visitor), *theme.get_ref(), &notices);

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// The whole page for a given view. `Submitting` renders the form with its
/// controls disabled.
pub fn render(view: View, theme: Theme, notices: &[Notice]) -> String {
    let content = match view {
        View::ShowConfirmation => thank_you_section(),
        View::ShowForm => hero_section(false),
        View::Submitting => hero_section(true),
    };
    let toasts = toasts_html(notices);
    let theme = theme.as_str();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>TrendAI News</title>
    <style>{STYLE}</style>
</head>
<body class="theme-{theme}">
    <div class="toasts">{toasts}</div>
    <main class="container">
{content}
    </main>
</body>
</html>"#
    )
}

fn toasts_html(notices: &[Notice]) -> String {
    let mut html = String::new();
    for notice in notices {
        let severity = match notice.severity {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        // Writing into a `String` cannot fail.
        let _ = write!(
            html,
            r#"<div class="toast toast-{severity}" role="status"><strong>{}</strong><p>{}</p></div>"#,
            encode_minimal(&notice.title),
            encode_minimal(&notice.description),
        );
    }
    html
}

fn hero_section(submitting: bool) -> String {
    let (disabled, button) = if submitting {
        (" disabled", "Subscribing&hellip;")
    } else {
        ("", "Join the AI Revolution &rarr;")
    };

    format!(
        r#"        <header class="brand">
            <h1>TrendAI News</h1>
        </header>
        <section class="hero">
            <h2>AI-Powered News <span class="accent">Intelligence</span></h2>
            <p class="lead">Get the latest AI and tech breakthroughs curated by artificial intelligence.
            No noise, just the insights that matter.</p>
            <ul class="features">
                <li>Real-time</li>
                <li>Trending</li>
                <li>AI-Curated</li>
            </ul>
        </section>
        <form action="/subscriptions" method="post" class="signup">
            <fieldset{disabled}>
                <label>Email address
                    <input
                        type="email"
                        name="email"
                        placeholder="Enter your email for AI news insights"
                    >
                </label>
                <button type="submit">{button}</button>
            </fieldset>
        </form>"#
    )
}

fn thank_you_section() -> String {
    r#"        <section class="thank-you">
            <h1>Welcome to the <span class="accent">AI Revolution!</span></h1>
            <p class="lead">You're now part of an exclusive community of AI enthusiasts and innovators.</p>
            <ul class="features">
                <li><h3>Daily Insights</h3><p>Get curated AI news delivered to your inbox</p></li>
                <li><h3>Breaking News</h3><p>First to know about major AI breakthroughs</p></li>
                <li><h3>Expert Analysis</h3><p>In-depth analysis from AI industry leaders</p></li>
            </ul>
            <h3>What's Next?</h3>
            <p>Your first AI-curated newsletter will arrive within the next 24 hours.
            In the meantime, we're already analyzing the latest trends just for you.</p>
        </section>"#
        .to_string()
}

const STYLE: &str = "\
body{margin:0;min-height:100vh;font-family:Poppins,sans-serif;color:#f5f5f5}\
.theme-neon{background:#121212}\
.theme-gradient{background:linear-gradient(135deg,#121212,#1f2937)}\
.theme-midnight{background:#0b1026}\
.container{max-width:56rem;margin:0 auto;padding:4rem 1rem;text-align:center}\
.accent{color:#39ff14}\
.lead{color:#f4c430;font-size:1.25rem}\
.features{display:flex;justify-content:center;gap:2rem;list-style:none;padding:0}\
.signup fieldset{border:0;display:flex;flex-direction:column;gap:1rem;max-width:32rem;margin:0 auto}\
.signup input{padding:1rem;border-radius:.5rem;border:2px solid #888;background:transparent;color:inherit}\
.signup button{padding:1rem;border:0;border-radius:.5rem;background:#ff6f61;color:#fff;font-weight:600}\
.toasts{position:fixed;top:1rem;right:1rem;display:flex;flex-direction:column;gap:.5rem}\
.toast{padding:.75rem 1rem;border-radius:.5rem;background:#1f1f1f;border-left:4px solid #888}\
.toast-success{border-color:#39ff14}.toast-warning{border-color:#f4c430}.toast-error{border-color:#ff6f61}";
