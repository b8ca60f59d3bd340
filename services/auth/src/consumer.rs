use anyhow::Context as _;
use tracing::{debug, info};

use campus_bus::{BusConsumer, Delivery};

use crate::state::AppState;
use crate::usecase::provision::{ProvisionOutcome, ProvisionUserUseCase};

/// Drive account provisioning off the shared event stream. Runs until the
/// consumer loop itself fails (individual handler failures go through the
/// bus retry/dead-letter path).
pub async fn run(state: AppState, consumer: BusConsumer) -> anyhow::Result<()> {
    consumer
        .run(|delivery| handle(state.clone(), delivery))
        .await
        .context("auth consumer loop exited")
}

async fn handle(state: AppState, delivery: Delivery) -> anyhow::Result<()> {
    let event = match delivery.envelope.event()? {
        Some(event) => event,
        None => {
            debug!(
                event_id = %delivery.envelope.event_id,
                routing_key = %delivery.envelope.routing_key,
                "skipping unknown routing key"
            );
            return Ok(());
        }
    };

    let usecase = ProvisionUserUseCase {
        users: state.user_repo(),
        verification_secret: state.secrets.verification.clone(),
    };
    match usecase.execute(&event).await? {
        ProvisionOutcome::Created(user_id) => {
            info!(
                event_id = %delivery.envelope.event_id,
                routing_key = %delivery.envelope.routing_key,
                user_id = %user_id,
                "provisioned account"
            );
        }
        ProvisionOutcome::AlreadyProvisioned(user_id) => {
            debug!(
                event_id = %delivery.envelope.event_id,
                user_id = %user_id,
                "account already provisioned, skipping redelivery"
            );
        }
        ProvisionOutcome::Ignored => {}
    }
    Ok(())
}
