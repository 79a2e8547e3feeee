use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use mac2hostname_resolver::HostnameResolver;
use mac2hostname_sql::SqlConnection;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Path of the lookup endpoint.
pub const MAC2HOSTNAME_PATH: &str = "/mac2hostname";

/// Body returned when the `mac` parameter is absent.
pub const MISSING_MAC_MESSAGE: &str = "mac param not provided";

/// Body returned for storage failures; details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error - checkout logs on the server";

/// Query parameters of a lookup. Repeated keys resolve to their first occurrence.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct LookupParams {
    /// Raw MAC address as sent.
    pub mac: Option<String>,

    /// `hostname_base`, or its alias `group`.
    pub group: Option<String>,
}

impl LookupParams {
    /// Picks the lookup parameters out of decoded query pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                pairs
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| value.clone())
            })
        };

        Self {
            mac: first(&["mac"]),
            group: first(&["hostname_base", "group"]),
        }
    }
}

/// Builds the service router around a resolver.
pub fn router<C>(resolver: HostnameResolver<C>) -> Router
where
    C: SqlConnection,
{
    Router::new()
        .route(MAC2HOSTNAME_PATH, get(mac2hostname::<C>))
        .with_state(resolver)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn mac2hostname<C>(
    State(resolver): State<HostnameResolver<C>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    C: SqlConnection,
{
    let LookupParams { mac, group } = LookupParams::from_pairs(&pairs);

    let Some(mac) = mac else {
        warn!("{MISSING_MAC_MESSAGE}");
        return (StatusCode::BAD_REQUEST, MISSING_MAC_MESSAGE).into_response();
    };

    match resolver.resolve(&mac, group.as_deref()).await {
        Ok(hostname) => hostname.into_response(),
        Err(e) => {
            error!(%mac, "failed to resolve hostname: {e:?}");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
        }
    }
}
