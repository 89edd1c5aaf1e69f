mod csv_carrier_loader;
mod google_geocoder;
mod in_memory_carrier_repo;
mod leaflet_map_renderer;
mod nominatim_geocoder;

pub use csv_carrier_loader::{
    decode_dataset, parse_carriers, raw_content_url, CsvCarrierLoader, IngestError, LoadReport,
};
pub use google_geocoder::{GoogleGeocoder, DEFAULT_GOOGLE_BASE_URL};
pub use in_memory_carrier_repo::InMemoryCarrierRepository;
pub use leaflet_map_renderer::{escape_html, LeafletMapRenderer, DEFAULT_MAP_ZOOM};
pub use nominatim_geocoder::{NominatimGeocoder, DEFAULT_NOMINATIM_BASE_URL};
