//! Stream entry field layout.
//!
//! The envelope travels as one JSON field; `routing_key` is duplicated at the
//! top level so `XRANGE` output stays greppable, and `attempts` counts failed
//! handler runs for the retry budget.

use std::collections::HashMap;

use campus_events::EventEnvelope;

use crate::error::BusError;

pub(crate) const FIELD_ENVELOPE: &str = "envelope";
pub(crate) const FIELD_ROUTING_KEY: &str = "routing_key";
pub(crate) const FIELD_ATTEMPTS: &str = "attempts";
pub(crate) const FIELD_ERROR: &str = "error";

pub(crate) fn entry_fields(
    envelope: &EventEnvelope,
    attempts: u32,
) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
    Ok(vec![
        (FIELD_ROUTING_KEY, envelope.routing_key.clone()),
        (FIELD_ENVELOPE, serde_json::to_string(envelope)?),
        (FIELD_ATTEMPTS, attempts.to_string()),
    ])
}

pub(crate) fn parse_fields(
    fields: &HashMap<String, String>,
) -> Result<(EventEnvelope, u32), BusError> {
    let raw = fields
        .get(FIELD_ENVELOPE)
        .ok_or_else(|| BusError::Malformed("missing envelope field".to_owned()))?;
    let envelope: EventEnvelope = serde_json::from_str(raw)
        .map_err(|e| BusError::Malformed(format!("envelope is not valid JSON: {e}")))?;
    let attempts = match fields.get(FIELD_ATTEMPTS) {
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| BusError::Malformed(format!("attempts is not a number: {v}")))?,
        None => 0,
    };
    Ok((envelope, attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_events::{Event, ParentCreated};

    fn sample_envelope() -> EventEnvelope {
        let event = Event::ParentCreated(ParentCreated {
            parent_id: "p-1".to_owned(),
            email: "parent@campus.test".to_owned(),
        });
        EventEnvelope::new("teacher-service", &event).unwrap()
    }

    #[test]
    fn should_round_trip_entry_fields() {
        let envelope = sample_envelope();
        let fields: HashMap<String, String> = entry_fields(&envelope, 2)
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();

        let (parsed, attempts) = parse_fields(&fields).unwrap();
        assert_eq!(parsed, envelope);
        assert_eq!(attempts, 2);
    }

    #[test]
    fn should_default_attempts_to_zero() {
        let envelope = sample_envelope();
        let mut fields: HashMap<String, String> = entry_fields(&envelope, 0)
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        fields.remove(FIELD_ATTEMPTS);

        let (_, attempts) = parse_fields(&fields).unwrap();
        assert_eq!(attempts, 0);
    }

    #[test]
    fn should_reject_entry_without_envelope() {
        let fields = HashMap::from([(FIELD_ROUTING_KEY.to_owned(), "parent.created".to_owned())]);
        assert!(matches!(
            parse_fields(&fields),
            Err(BusError::Malformed(_))
        ));
    }

    #[test]
    fn should_reject_entry_with_broken_envelope_json() {
        let fields = HashMap::from([(FIELD_ENVELOPE.to_owned(), "{not json".to_owned())]);
        assert!(matches!(
            parse_fields(&fields),
            Err(BusError::Malformed(_))
        ));
    }
}
