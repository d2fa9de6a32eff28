pub mod sbr_api;

pub use sbr_api::SbrApiClient;
