use crate::config::model::{Config, DebugConfig, InboxConfig};
use std::env;
use std::path::PathBuf;

pub fn load_config() -> Config {
    let pages = load_u32_config("SCRAPE_PAGES", 3);
    let output_path = load_path_config("OUTPUT_PATH", "audubon_events.json");

    let skip_mass = load_bool_config("DEBUG_SKIP_MASS", false);
    let skip_national = load_bool_config("DEBUG_SKIP_NATIONAL", false);
    let skip_geocoding = load_bool_config("DEBUG_SKIP_GEOCODING", false);
    let event_limit = load_usize_config("DEBUG_EVENT_LIMIT");

    Config {
        debug_config: DebugConfig {
            skip_mass,
            skip_national,
            skip_geocoding,
            event_limit,
        },
        pages,
        output_path,
    }
}

pub fn load_inbox_config() -> InboxConfig {
    InboxConfig {
        token_path: load_path_config("GMAIL_TOKEN_PATH", "token.json"),
        max_results: load_u32_config("INBOX_MAX_RESULTS", 10),
    }
}

fn load_path_config(name: &str, default: &str) -> PathBuf {
    env::var(name).unwrap_or_else(|_| default.to_string()).into()
}

fn load_u32_config(name: &str, default: u32) -> u32 {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| {
            panic!(
                "Invalid config '{}'. Expected a positive integer number.",
                name
            )
        })
}

fn load_bool_config(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| {
            panic!(
                "Invalid config '{}'. Expected either 'true' or 'false'",
                name
            )
        })
}

fn load_usize_config(name: &str) -> Option<usize> {
    match env::var(name) {
        Ok(value) => {
            Some(value.parse().unwrap_or_else(|_| {
                panic!("Invalid config '{}'. Expected an integer number.", name)
            }))
        }
        Err(_) => None,
    }
}
