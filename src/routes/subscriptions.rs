//! src/routes/subscriptions.rs
use crate::notify::FlashNotifier;
use crate::session_state::TypedSession;
use crate::subscription::{SubmitOutcome, SubscriptionController};
use crate::utils::{e500, see_other};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct SubscriberForm {
    // The landing page always posts the field; a missing one reads as empty.
    #[serde(default)]
    pub email: String,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(form, session, controller),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = %form.email,
        session_id = tracing::field::Empty,
    )
)]
pub async fn subscribe(
    form: web::Form<SubscriberForm>,
    session: TypedSession,
    controller: web::Data<SubscriptionController>,
) -> Result<HttpResponse, actix_web::Error> {
    let visitor = session.visitor().map_err(e500)?;
    tracing::Span::current().record("session_id", &tracing::field::display(&visitor.session));

    let outcome = controller
        .submit(&visitor, &form.email, &FlashNotifier)
        .await;
    tracing::info!(?outcome, "Subscription form handled");

    if outcome == SubmitOutcome::Subscribed {
        session.mark_confirmed().map_err(e500)?;
    }

    Ok(see_other("/"))
}
