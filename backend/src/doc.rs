//! OpenAPI documentation configuration.
//!
//! One document per service. Each registers:
//!
//! - **Paths**: the service's lookup endpoint and both health probes
//! - **Schemas**: [`TemperatureResult`] and [`ErrorBody`]
//!
//! Swagger UI serves the documents in debug builds only.

use utoipa::OpenApi;

use crate::domain::TemperatureResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::input::PostalCodeRequest;

/// OpenAPI document for the Input Service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Input service API",
        description = "Public entry point accepting a postal code and answering with current temperatures."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::input::submit_postal_code,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(PostalCodeRequest, TemperatureResult, ErrorBody)),
    tags(
        (name = "input", description = "Postal code submission"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct InputApiDoc;

/// OpenAPI document for the Orchestrator Service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orchestrator service API",
        description = "Resolves a postal code to its city and the city's current temperature."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::climate::get_temperatures,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(TemperatureResult, ErrorBody)),
    tags(
        (name = "climate", description = "Temperature lookup by postal code"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct OrchestratorApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case::input(InputApiDoc::openapi())]
    #[case::orchestrator(OrchestratorApiDoc::openapi())]
    fn temperature_schema_uses_wire_names(#[case] doc: utoipa::openapi::OpenApi) {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get("TemperatureResult").expect("TemperatureResult schema");

        for field in ["city", "temp_C", "temp_F", "temp_K"] {
            assert_object_schema_has_field(schema, field);
        }
        let error = schemas.get("ErrorBody").expect("ErrorBody schema");
        assert_object_schema_has_field(error, "message");
    }

    #[rstest]
    #[case::input(InputApiDoc::openapi(), "post")]
    #[case::orchestrator(OrchestratorApiDoc::openapi(), "get")]
    fn documents_root_lookup_and_probes(
        #[case] doc: utoipa::openapi::OpenApi,
        #[case] verb: &str,
    ) {
        let root = doc.paths.paths.get("/").expect("root path");
        let operation = match verb {
            "post" => root.post.as_ref(),
            _ => root.get.as_ref(),
        };
        assert!(operation.is_some(), "missing {verb} /");
        assert!(doc.paths.paths.contains_key("/health/ready"));
        assert!(doc.paths.paths.contains_key("/health/live"));
    }
}
