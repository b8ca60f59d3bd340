use anyhow::Context as _;
use tracing::{debug, info};

use campus_bus::{BusConsumer, Delivery};
use campus_events::Event;

use crate::dedupe::Deduplicator;
use crate::mailer::Mailer;
use crate::template::{
    PASSWORD_RESET_SUBJECT, VERIFICATION_SUBJECT, password_reset_link, render_email_verification,
    render_password_reset, verification_link,
};

/// Drive outgoing mail off the shared event stream.
pub async fn run<M: Mailer, D: Deduplicator>(
    mailer: M,
    dedupe: D,
    consumer: BusConsumer,
    base_url: String,
) -> anyhow::Result<()> {
    consumer
        .run(|delivery| handle(mailer.clone(), dedupe.clone(), base_url.clone(), delivery))
        .await
        .context("notification consumer loop exited")
}

async fn handle<M: Mailer, D: Deduplicator>(
    mailer: M,
    dedupe: D,
    base_url: String,
    delivery: Delivery,
) -> anyhow::Result<()> {
    let event = match delivery.envelope.event()? {
        Some(event) => event,
        None => return Ok(()),
    };

    let Some((to, subject, html)) = mail_for_event(&event, &base_url) else {
        return Ok(());
    };

    if !dedupe.first_seen(delivery.envelope.event_id).await {
        debug!(
            event_id = %delivery.envelope.event_id,
            routing_key = %delivery.envelope.routing_key,
            "duplicate delivery, mail already sent"
        );
        return Ok(());
    }

    // A claim must not outlive a failed send, or the bus retry for this
    // event id would be skipped as a duplicate and the mail never go out.
    if let Err(e) = mailer.send(&to, subject, &html).await {
        dedupe.release(delivery.envelope.event_id).await;
        return Err(e);
    }
    info!(
        event_id = %delivery.envelope.event_id,
        routing_key = %delivery.envelope.routing_key,
        "mail sent"
    );
    Ok(())
}

/// Map an event to the mail it triggers, if any. Entity-creation events are
/// the auth service's business; only auth's own notification events produce
/// mail here.
fn mail_for_event(event: &Event, base_url: &str) -> Option<(String, &'static str, String)> {
    match event {
        Event::EmailVerification(p) => {
            let link = verification_link(base_url, &p.verification_token);
            Some((
                p.email.clone(),
                VERIFICATION_SUBJECT,
                render_email_verification(&p.name, &link),
            ))
        }
        Event::PasswordReset(p) => {
            let link = password_reset_link(base_url, &p.reset_token);
            Some((
                p.email.clone(),
                PASSWORD_RESET_SUBJECT,
                render_password_reset(&link),
            ))
        }
        Event::StudentCreated(_) | Event::TeacherCreated(_) | Event::ParentCreated(_) => None,
    }
}
