mod carrier_repository;
mod geocoder;
mod map_renderer;

pub use carrier_repository::CarrierRepository;
pub use geocoder::{GeocodeError, Geocoder};
pub use map_renderer::{MapRenderer, RenderError};
