//! Request-id stamping shared by every service router.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use uuid::Uuid;

/// Header each inbound request carries after the layer runs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Mints a fresh UUID per request so log lines can be correlated across the
/// handler stack.
#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Build the request-id layer. Apply with `.layer(request_id_layer())` in router.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(
        HeaderName::from_static(REQUEST_ID_HEADER),
        MakeUuidRequestId,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minted_id() -> String {
        let mut make = MakeUuidRequestId;
        let id = make.make_request_id(&Request::new(())).unwrap();
        id.header_value().to_str().unwrap().to_owned()
    }

    #[test]
    fn should_mint_uuid_request_ids() {
        assert!(minted_id().parse::<Uuid>().is_ok());
    }

    #[test]
    fn should_mint_distinct_ids_per_request() {
        assert_ne!(minted_id(), minted_id());
    }
}
