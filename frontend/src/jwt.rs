//! Lecture (sans vérification) de la charge utile d'un JWT.
//! Sert uniquement à l'affichage ; la validité reste l'affaire du backend.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct DisplayClaims {
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
}

pub fn decode_claims(token: &str) -> Option<DisplayClaims> {
    let payload = token.split('.').nth(1)?;
    // certains émetteurs gardent le padding
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.signature", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn reads_display_names() {
        let claims = decode_claims(&token_with(r#"{"id":3,"nom":"Rakoto","prenom":"Hery"}"#)).unwrap();
        assert_eq!(claims.nom.as_deref(), Some("Rakoto"));
        assert_eq!(claims.prenom.as_deref(), Some("Hery"));
    }

    #[test]
    fn missing_claims_are_none() {
        assert_eq!(decode_claims(&token_with(r#"{"id":3}"#)), Some(DisplayClaims::default()));
    }

    #[test]
    fn opaque_tokens_are_ignored() {
        assert_eq!(decode_claims("pas-un-jwt"), None);
        assert_eq!(decode_claims("a.%%%.c"), None);
    }
}
