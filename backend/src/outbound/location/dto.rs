//! DTOs for decoding postal code lookup responses.
//!
//! Every field defaults to empty, so the upstream's `{"erro": true}` answer for
//! an unknown code decodes to a location without a city.

use serde::Deserialize;

use crate::domain::{Location, RegionCodes};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct AddressDto {
    pub(super) cep: String,
    pub(super) logradouro: String,
    pub(super) complemento: String,
    pub(super) bairro: String,
    pub(super) localidade: String,
    pub(super) uf: String,
    pub(super) ibge: String,
    pub(super) gia: String,
    pub(super) ddd: String,
    pub(super) siafi: String,
}

impl AddressDto {
    pub(super) fn into_domain(self) -> Location {
        Location {
            postal_code: self.cep,
            address_line1: self.logradouro,
            address_line2: self.complemento,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
            region_codes: RegionCodes {
                ibge: self.ibge,
                gia: self.gia,
                area_code: self.ddd,
                siafi: self.siafi,
            },
        }
    }
}
