pub mod config;
pub mod dcmfind_toml;
pub mod logger;

pub use config::*;
pub use dcmfind_toml::{
    DcmfindToml, apply_file_to_request, load_dcmfind_toml, parse_dcmfind_toml,
};
pub use logger::setup_logging;
