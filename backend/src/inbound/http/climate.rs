//! Orchestrator Service handler.
//!
//! ```text
//! GET /?postal_code=22021-001
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::domain::TemperatureResult;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorBody, query_error_handler};
use crate::inbound::http::state::OrchestratorState;

/// Query string accepted by `GET /`.
///
/// A missing `postal_code` is treated as empty and rejected by validation.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PostalCodeQueryParams {
    /// Postal code as `ddddd-ddd` or `dddddddd`.
    #[serde(default)]
    #[param(example = "22021-001")]
    pub postal_code: String,
}

/// Query extractor configuration answering undecodable query strings with `422`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Resolve a postal code to the current temperature of its city.
#[utoipa::path(
    get,
    path = "/",
    params(PostalCodeQueryParams),
    responses(
        (status = 200, description = "Current temperatures", body = TemperatureResult),
        (status = 404, description = "Postal code not found", body = ErrorBody),
        (status = 422, description = "Invalid postal code", body = ErrorBody),
        (status = 500, description = "Upstream failure", body = ErrorBody)
    ),
    tags = ["climate"],
    operation_id = "getTemperaturesByPostalCode"
)]
#[get("/")]
pub async fn get_temperatures(
    state: web::Data<OrchestratorState>,
    query: web::Query<PostalCodeQueryParams>,
) -> ApiResult<web::Json<TemperatureResult>> {
    let PostalCodeQueryParams { postal_code } = query.into_inner();
    debug!(postal_code = %postal_code, "climate lookup requested");
    let result = state.lookup.temperatures_for(&postal_code).await?;
    Ok(web::Json(result))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use super::*;
    use crate::domain::ClassifiedError;
    use crate::domain::ports::{ClimateLookup, FixtureClimateLookup, MockClimateLookup};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    async fn call(lookup: Arc<dyn ClimateLookup>, uri: &str) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(OrchestratorState::new(lookup)))
                .app_data(query_config())
                .service(get_temperatures),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn answers_with_temperatures() {
        let (status, body) = call(Arc::new(FixtureClimateLookup), "/?postal_code=22021001").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"city":"Rio de Janeiro","temp_C":30,"temp_F":86,"temp_K":303.15}"#
        );
    }

    #[actix_web::test]
    async fn missing_parameter_reaches_validation_as_empty() {
        let mut lookup = MockClimateLookup::new();
        lookup
            .expect_temperatures_for()
            .withf(|raw| raw.is_empty())
            .times(1)
            .return_once(|_| {
                Err(ClassifiedError::validation(
                    "invalid postal code",
                    "invalid postal code",
                    "postal code must match ddddd-ddd or dddddddd",
                ))
            });

        let (status, body) = call(Arc::new(lookup), "/").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, r#"{"message":"invalid postal code"}"#);
    }

    #[actix_web::test]
    async fn duplicated_parameter_is_invalid_without_a_lookup() {
        let mut lookup = MockClimateLookup::new();
        lookup.expect_temperatures_for().never();

        let (status, body) = call(
            Arc::new(lookup),
            "/?postal_code=22021001&postal_code=22021002",
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, r#"{"message":"invalid postal code"}"#);
    }

    #[rstest]
    #[case::not_found(
        ClassifiedError::not_found("can not find postal code", "status 404"),
        StatusCode::NOT_FOUND
    )]
    #[case::unknown(
        ClassifiedError::unknown("Unknown error getting climate", "status 401: bad key"),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[actix_web::test]
    async fn maps_classified_errors_to_statuses(
        #[case] failure: ClassifiedError,
        #[case] expected: StatusCode,
    ) {
        let message = failure.message().to_owned();
        let mut lookup = MockClimateLookup::new();
        lookup
            .expect_temperatures_for()
            .withf(|raw| raw == "22021-001")
            .times(1)
            .return_once(move |_| Err(failure));

        let (status, body) = call(Arc::new(lookup), "/?postal_code=22021-001").await;

        assert_eq!(status, expected);
        let decoded: ErrorBody = serde_json::from_str(&body).expect("error body");
        assert_eq!(decoded.message, message);
        assert!(!body.contains("status 4"), "cause leaked: {body}");
    }
}
