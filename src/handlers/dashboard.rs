use axum::{
    extract::{Query, State},
    response::Html,
};
use common::{Horizon, Ticker};
use tracing::instrument;
use validator::{Validate, ValidationErrors};

use crate::pipeline::{self, PipelineOutcome};
use crate::schemas::{AppState, DashboardQuery, ForecastRequest};
use crate::views;

/// The single page: the form alone on first load, form plus results after
/// a submission.
#[instrument(skip(state))]
pub async fn dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Html<String> {
    let outcome = resolve(&state, &query).await;
    Html(views::render(&query, &outcome))
}

/// Maps the raw submission onto the pipeline: no submission and invalid
/// submissions halt here, before any fetch.
async fn resolve(state: &AppState, query: &DashboardQuery) -> PipelineOutcome {
    let Some(request) = ForecastRequest::from_query(query) else {
        return PipelineOutcome::AwaitingInput;
    };

    if let Err(errors) = request.validate() {
        return PipelineOutcome::InvalidRequest(validation_messages(&errors));
    }

    // Both parses are guarded by the validation above.
    let (Some(ticker), Some(horizon)) = (
        Ticker::parse(&request.ticker),
        Horizon::years(request.years),
    ) else {
        return PipelineOutcome::InvalidRequest(vec!["Invalid request.".to_string()]);
    };

    let today = chrono::Utc::now().date_naive();
    pipeline::run(
        state.source.as_ref(),
        &ticker,
        horizon,
        state.config.fetch_range(today),
        today,
    )
    .await
}

fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field| {
            field.iter().map(|err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value.".to_string())
            })
        })
        .collect();
    messages.sort();
    messages
}
