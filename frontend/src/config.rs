//! Réglages fixés à la compilation (`trunk build` avec `API_URL=… LOG_LEVEL=…`).

use log::LevelFilter;

/* URL de base de l'API, sans slash final */
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Délai avant la redirection qui suit une action réussie (login, création…).
pub const REDIRECT_DELAY_MS: u32 = 2_000;
/// Début du fondu visuel, avant la redirection.
pub const FADE_DELAY_MS: u32 = 1_000;
/// Durée de vie d'un message flash dans la console d'administration.
pub const FLASH_DELAY_MS: u32 = 3_000;
/// Taille maximale d'une image de visite envoyée par l'admin.
pub const MAX_IMAGE_BYTES: f64 = 2.0 * 1024.0 * 1024.0;

pub fn api_url() -> &'static str {
    option_env!("API_URL")
        .map(|u| u.trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_API_URL)
}

pub fn log_level() -> LevelFilter {
    parse_level(option_env!("LOG_LEVEL").unwrap_or("info"))
}

fn parse_level(raw: &str) -> LevelFilter {
    raw.trim().parse().unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("bavard"), LevelFilter::Info);
    }

    #[test]
    fn api_url_has_no_trailing_slash() {
        assert!(!api_url().ends_with('/'));
    }
}
