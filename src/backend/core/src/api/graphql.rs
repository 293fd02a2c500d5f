//! GraphQL transport.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use std::time::Instant;

use super::AppState;
use crate::middleware::AuthContext;
use crate::observability::metrics::record_graphql_duration;
use crate::rbac::Actor;

/// Execute a GraphQL request as the authenticated caller.
pub async fn graphql_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let started = Instant::now();
    let request = request.into_inner().data(Actor::from_auth(&auth));

    let response = state.schema.execute(request).await;

    record_graphql_duration(started.elapsed().as_secs_f64());
    response.into()
}

pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
