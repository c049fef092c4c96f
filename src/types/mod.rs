pub mod dto;
pub mod feature;
pub mod nominatim;
pub mod overpass;
pub mod place;
