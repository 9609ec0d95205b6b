//! HTTP request handlers for the Childcare Subsidy Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_household;
use crate::error::{EngineError, EngineResult};
use crate::models::HouseholdInput;
use crate::scenario::{ScenarioGenerator, ScenarioMetric, filter_scenarios, find_best, sort_scenarios};

use super::request::{CalculationRequest, ScenarioRequest};
use super::response::{ApiError, ApiErrorResponse, CalculationResponse, ScenarioBatchResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/scenarios", post(scenarios_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: EngineError) -> Response {
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Converts a JSON extraction failure into a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the failure.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a household and returns its subsidy and cost calculation.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match perform_calculation(&state, request) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                policy_period = %response.result.policy_period,
                children = response.result.costs.len(),
                weekly_out_of_pocket = %response.result.totals.weekly.out_of_pocket,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            error_response(err)
        }
    }
}

fn perform_calculation(state: &AppState, request: CalculationRequest) -> EngineResult<CalculationResponse> {
    let schedule = state.select_schedule(request.policy_period.as_deref(), request.as_of)?;
    let input = HouseholdInput::try_from(request.household)?;
    let result = calculate_household(&input, schedule)?;

    Ok(CalculationResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        result,
    })
}

/// Handler for POST /scenarios endpoint.
///
/// Generates, filters, and sorts work-arrangement scenarios for a household.
/// The sweep runs on the blocking pool.
async fn scenarios_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing scenario request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || perform_scenarios(&state, request))
        .await
        .unwrap_or_else(|err| {
            Err(EngineError::CalculationError {
                message: format!("scenario generation aborted: {}", err),
            })
        });

    match outcome {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                policy_period = %response.policy_period,
                scenarios = response.scenarios.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Scenario generation completed successfully"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Scenario generation failed"
            );
            error_response(err)
        }
    }
}

fn perform_scenarios(state: &AppState, mut request: ScenarioRequest) -> EngineResult<ScenarioBatchResponse> {
    let schedule = state.select_schedule(request.policy_period.as_deref(), request.as_of)?;
    let mode = request.scenario_mode()?;
    let input = HouseholdInput::try_from(request.household)?;

    let mut generator = ScenarioGenerator::new(schedule);
    if let Some(salt) = request.salt {
        generator = generator.with_salt(salt);
    }
    let generated = generator.generate(&input, &mode)?;

    let mut scenarios = filter_scenarios(&generated, &request.filter.unwrap_or_default());
    if let Some(sort) = request.sort {
        sort_scenarios(&mut scenarios, sort.metric, sort.order);
    }
    let best_by_net_income = find_best(&scenarios, ScenarioMetric::NetIncome).map(|s| s.id);

    Ok(ScenarioBatchResponse {
        batch_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        policy_period: schedule.period.clone(),
        salt: generator.salt(),
        scenarios,
        best_by_net_income,
    })
}
