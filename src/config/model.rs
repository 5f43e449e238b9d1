use std::path::PathBuf;

#[derive(Debug)]
pub struct Config {
    pub debug_config: DebugConfig,
    pub pages: u32,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub struct DebugConfig {
    pub skip_mass: bool,
    pub skip_national: bool,
    pub skip_geocoding: bool,
    pub event_limit: Option<usize>,
}

#[derive(Debug)]
pub struct InboxConfig {
    pub token_path: PathBuf,
    pub max_results: u32,
}
