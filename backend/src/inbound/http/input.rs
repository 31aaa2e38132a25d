//! Input Service handler.
//!
//! ```text
//! POST / {"postal_code":"22021001"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::TemperatureResult;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorBody, json_error_handler};
use crate::inbound::http::state::InputState;

/// Request body for `POST /`.
///
/// A missing `postal_code` is treated as empty and rejected by validation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PostalCodeRequest {
    /// Eight digit postal code without separators.
    #[serde(default)]
    #[schema(example = "22021001")]
    pub postal_code: String,
}

/// JSON extractor configuration answering malformed bodies with `400`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Accept a postal code and answer with the current temperatures of its city.
#[utoipa::path(
    post,
    path = "/",
    request_body = PostalCodeRequest,
    responses(
        (status = 200, description = "Current temperatures", body = TemperatureResult),
        (status = 400, description = "Malformed JSON body", body = ErrorBody),
        (status = 404, description = "Postal code not found", body = ErrorBody),
        (status = 422, description = "Invalid postal code", body = ErrorBody),
        (status = 500, description = "Downstream failure", body = ErrorBody)
    ),
    tags = ["input"],
    operation_id = "submitPostalCode"
)]
#[post("/")]
pub async fn submit_postal_code(
    state: web::Data<InputState>,
    payload: web::Json<PostalCodeRequest>,
) -> ApiResult<web::Json<TemperatureResult>> {
    let PostalCodeRequest { postal_code } = payload.into_inner();
    debug!(postal_code = %postal_code, "postal code submitted");
    let result = state.intake.submit(&postal_code).await?;
    Ok(web::Json(result))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use super::*;
    use crate::domain::ClassifiedError;
    use crate::domain::ports::MockPostalCodeIntake;
    use crate::inbound::http::error::INVALID_REQUEST_BODY;
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::{App, test};
    use rstest::rstest;

    async fn post(intake: MockPostalCodeIntake, body: &'static str) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(InputState::new(Arc::new(intake))))
                .app_data(json_config())
                .service(submit_postal_code),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(ContentType::json())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn passes_result_through() {
        let mut intake = MockPostalCodeIntake::new();
        intake
            .expect_submit()
            .withf(|raw| raw == "22021001")
            .times(1)
            .return_once(|_| Ok(TemperatureResult::from_celsius("Rio de Janeiro", 30.0)));

        let (status, body) = post(intake, r#"{"postal_code":"22021001"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"city":"Rio de Janeiro","temp_C":30,"temp_F":86,"temp_K":303.15}"#
        );
    }

    #[rstest]
    #[case::not_json("postal_code=22021001")]
    #[case::truncated(r#"{"postal_code":"#)]
    #[case::wrong_type(r#"{"postal_code":22021001}"#)]
    #[actix_web::test]
    async fn malformed_bodies_are_bad_requests(#[case] body: &'static str) {
        let mut intake = MockPostalCodeIntake::new();
        intake.expect_submit().never();

        let (status, response) = post(intake, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let decoded: ErrorBody = serde_json::from_str(&response).expect("error body");
        assert_eq!(decoded.message, INVALID_REQUEST_BODY);
    }

    #[actix_web::test]
    async fn missing_field_reaches_validation_as_empty() {
        let mut intake = MockPostalCodeIntake::new();
        intake
            .expect_submit()
            .withf(|raw| raw.is_empty())
            .times(1)
            .return_once(|_| {
                Err(ClassifiedError::validation(
                    "invalid postal code",
                    "invalid postal code",
                    "postal code must have 8 digits",
                ))
            });

        let (status, body) = post(intake, "{}").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, r#"{"message":"invalid postal code"}"#);
    }

    #[actix_web::test]
    async fn not_found_downstream_is_404() {
        let mut intake = MockPostalCodeIntake::new();
        intake.expect_submit().times(1).return_once(|_| {
            Err(ClassifiedError::not_found(
                "can not find postal code",
                "upstream resource not found: status 404",
            ))
        });

        let (status, body) = post(intake, r#"{"postal_code":"99999999"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"message":"can not find postal code"}"#);
    }
}
