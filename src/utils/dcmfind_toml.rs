//! Load `.dcmfind.toml` from the search directory (CLI only). Library callers build a
//! [`SearchRequest`](crate::SearchRequest) themselves.

use serde::Deserialize;
use std::path::Path;

use crate::SearchRequest;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DcmfindToml {
    #[serde(default)]
    pub settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    pub file_pattern: Option<String>,
    pub recursive: Option<bool>,
    pub follow_links: Option<bool>,
    pub limit: Option<usize>,
    pub parallelism: Option<usize>,
    pub progress: Option<bool>,
    pub verbose: Option<bool>,
}

/// Load the settings file from `dir`. `Ok(None)` if there is no readable file; `Err` if it is
/// malformed, so the caller can warn once logging is set up.
pub fn load_dcmfind_toml(dir: &Path) -> anyhow::Result<Option<DcmfindToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    parse_dcmfind_toml(&s)
        .map(Some)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

pub fn parse_dcmfind_toml(s: &str) -> Result<DcmfindToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite request field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $request:expr, $section_field:ident => $request_field:ident) => {
        if let Some(v) = $section.$section_field.clone() {
            $request.$request_field = v;
        }
    };
}

/// Apply file settings to `request` (only fields present in the file). Call before applying CLI.
/// `progress` lands in `show_progress`; the caller still gates it on stdout being a terminal.
pub fn apply_file_to_request(file: &DcmfindToml, request: &mut SearchRequest) {
    let s = &file.settings;
    apply_file_opt!(s, request, file_pattern => file_pattern);
    apply_file_opt!(s, request, recursive => recursive);
    apply_file_opt!(s, request, follow_links => follow_links);
    apply_file_opt!(s, request, parallelism => parallelism);
    apply_file_opt!(s, request, progress => show_progress);
    if let Some(limit) = s.limit {
        request.limit = Some(limit);
    }
}
