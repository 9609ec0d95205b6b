//! HTTP API module for the Childcare Subsidy Engine.
//!
//! This module exposes household calculation and scenario generation over
//! REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculationRequest, HouseholdRequest, ParentRequest, ScenarioModeRequest, ScenarioRequest,
    SortRequest,
};
pub use response::{ApiError, CalculationResponse, ScenarioBatchResponse};
pub use state::AppState;
