//! Location and climate records produced by the upstream resolvers.

/// Address record resolved from a postal code.
///
/// ## Invariants
/// - An empty `city` is a valid resolver result; the climate lookup treats it
///   as "postal code not found".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Postal code as echoed by the upstream.
    pub postal_code: String,
    /// Street line.
    pub address_line1: String,
    /// Complement line.
    pub address_line2: String,
    /// Neighbourhood.
    pub neighborhood: String,
    /// City name.
    pub city: String,
    /// State abbreviation.
    pub state: String,
    /// Region codes published alongside the address.
    pub region_codes: RegionCodes,
}

/// Administrative region codes attached to a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionCodes {
    /// IBGE municipality code.
    pub ibge: String,
    /// GIA code.
    pub gia: String,
    /// Telephone area code.
    pub area_code: String,
    /// SIAFI code.
    pub siafi: String,
}

impl Location {
    /// Whether the upstream resolved the code to an actual city.
    pub fn has_city(&self) -> bool {
        !self.city.is_empty()
    }
}

/// Current weather reading for a city.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClimateReading {
    /// Current temperature in Celsius.
    pub celsius: f64,
    /// Location name reported by the weather source.
    pub source_location: String,
    /// Region reported by the weather source.
    pub source_region: String,
    /// Country reported by the weather source.
    pub source_country: String,
    /// When the weather source last refreshed the reading.
    pub last_updated: String,
}
