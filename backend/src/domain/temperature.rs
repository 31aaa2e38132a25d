//! Celsius conversion and the terminal temperature payload.

use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// Convert Celsius into `(fahrenheit, kelvin)`.
///
/// # Examples
/// ```
/// use postal_climate::domain::temperature::convert;
///
/// assert_eq!(convert(0.0), (32.0, 273.15));
/// assert_eq!(convert(30.0), (86.0, 303.15));
/// ```
#[must_use]
pub fn convert(celsius: f64) -> (f64, f64) {
    let fahrenheit = celsius * 1.8 + 32.0;
    let kelvin = celsius + 273.15;
    (fahrenheit, kelvin)
}

/// Temperatures for one city in three scales.
///
/// Serialised identically by both services; the Input Service passes the
/// Orchestrator payload through unchanged. Values are single precision on the
/// wire and integral values are written without a fractional part.
///
/// # Examples
/// ```
/// use postal_climate::domain::TemperatureResult;
///
/// let result = TemperatureResult::from_celsius("Rio de Janeiro", 30.0);
/// let json = serde_json::to_string(&result).expect("serialise");
/// assert_eq!(
///     json,
///     r#"{"city":"Rio de Janeiro","temp_C":30,"temp_F":86,"temp_K":303.15}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureResult {
    /// Resolved city name.
    #[schema(example = "Rio de Janeiro")]
    pub city: String,
    /// Temperature in Celsius.
    #[serde(rename = "temp_C", serialize_with = "serialize_compact")]
    #[schema(example = 30)]
    pub celsius: f32,
    /// Temperature in Fahrenheit.
    #[serde(rename = "temp_F", serialize_with = "serialize_compact")]
    #[schema(example = 86)]
    pub fahrenheit: f32,
    /// Temperature in Kelvin.
    #[serde(rename = "temp_K", serialize_with = "serialize_compact")]
    #[schema(example = 303.15)]
    pub kelvin: f32,
}

impl TemperatureResult {
    /// Run the converter over a Celsius reading for `city`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "temperatures are published in single precision"
    )]
    pub fn from_celsius(city: impl Into<String>, celsius: f64) -> Self {
        let (fahrenheit, kelvin) = convert(celsius);
        Self {
            city: city.into(),
            celsius: celsius as f32,
            fahrenheit: fahrenheit as f32,
            kelvin: kelvin as f32,
        }
    }
}

// Largest magnitude below which every integral f32 fits an i64 exactly.
const COMPACT_LIMIT: f32 = 1.0e15;

#[expect(
    clippy::cast_possible_truncation,
    reason = "integral values below COMPACT_LIMIT convert to i64 exactly"
)]
fn serialize_compact<S>(value: &f32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 && value.abs() < COMPACT_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f32(*value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::freezing(0.0, 32.0, 273.15)]
    #[case::warm(30.0, 86.0, 303.15)]
    #[case::absolute_zero(-273.15, -459.67, 0.0)]
    #[case::crossover(-40.0, -40.0, 233.15)]
    fn converts_to_single_precision_scales(
        #[case] celsius: f64,
        #[case] fahrenheit: f32,
        #[case] kelvin: f32,
    ) {
        let result = TemperatureResult::from_celsius("city", celsius);
        assert_eq!(result.fahrenheit, fahrenheit);
        assert_eq!(result.kelvin, kelvin);
    }

    #[test]
    fn convert_uses_exact_formulas() {
        let celsius = 25.3_f64;
        let (fahrenheit, kelvin) = convert(celsius);
        assert_eq!(fahrenheit.to_bits(), (celsius * 1.8 + 32.0).to_bits());
        assert_eq!(kelvin.to_bits(), (celsius + 273.15).to_bits());
    }

    #[test]
    fn serialises_fractional_values_with_shortest_form() {
        let result = TemperatureResult::from_celsius("Curitiba", 25.3);
        let json = serde_json::to_string(&result).expect("serialise");
        assert_eq!(
            json,
            r#"{"city":"Curitiba","temp_C":25.3,"temp_F":77.54,"temp_K":298.45}"#
        );
    }

    #[test]
    fn decodes_integral_json_numbers() {
        let body = r#"{"city":"Rio de Janeiro","temp_C":30,"temp_F":86,"temp_K":303.15}"#;
        let decoded: TemperatureResult = serde_json::from_str(body).expect("decode");
        assert_eq!(decoded, TemperatureResult::from_celsius("Rio de Janeiro", 30.0));
    }
}
