use thiserror::Error;

/// Toutes les erreurs qu'un écran peut rencontrer en parlant à l'API.
/// `Display` donne le texte affiché tel quel à l'utilisateur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Pas de jeton pour l'espace demandé : aucune requête n'est partie.
    #[error("Vous n'êtes pas connecté. Veuillez vous connecter.")]
    Unauthenticated,

    /// 401 sur un appel authentifié ; le jeton a déjà été purgé.
    #[error("Votre session a expiré. Veuillez vous reconnecter.")]
    Expired,

    /// Contrôle côté client, la requête n'est jamais envoyée.
    #[error("{0}")]
    Validation(String),

    /// Réponse 4xx/5xx du backend.
    #[error("{}", .message.as_deref().unwrap_or("Le serveur a refusé la requête."))]
    Rejected { status: u16, message: Option<String> },

    #[error("Erreur de connexion au serveur. Veuillez réessayer plus tard.")]
    Network(String),

    /// Réponse 2xx dont la forme ne correspond pas au contrat attendu.
    #[error("Réponse de l'API invalide : {0}")]
    Contract(String),

    #[error("Requête invalide : {0}")]
    Encode(String),

    /// Session reçue mais impossible à enregistrer dans le navigateur.
    #[error("Impossible d'enregistrer la session : {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Message du backend quand il en a fourni un, sinon le texte propre à l'écran.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message: Some(m), .. } => m.clone(),
            ApiError::Rejected { message: None, .. } | ApiError::Network(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Expired => Some(401),
            _ => None,
        }
    }

    /// Vrai quand l'utilisateur doit repasser par l'écran de connexion.
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::Unauthenticated | ApiError::Expired)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("écriture de `{key}` impossible : {reason}")]
    Write { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = ApiError::Rejected { status: 409, message: Some("Créneau complet".into()) };
        assert_eq!(err.message_or("Une erreur est survenue."), "Créneau complet");

        let err = ApiError::Rejected { status: 500, message: None };
        assert_eq!(err.message_or("Une erreur est survenue."), "Une erreur est survenue.");
    }

    #[test]
    fn transport_failures_use_the_screen_fallback() {
        let err = ApiError::Network("TypeError: Failed to fetch".into());
        assert_eq!(err.message_or("Impossible de se connecter au serveur."), "Impossible de se connecter au serveur.");
    }

    #[test]
    fn validation_and_session_errors_keep_their_text() {
        assert_eq!(
            ApiError::Validation("Tous les champs sont requis.".into()).message_or("x"),
            "Tous les champs sont requis."
        );
        assert!(ApiError::Expired.needs_login());
        assert!(ApiError::Unauthenticated.needs_login());
        assert!(!ApiError::Network(String::new()).needs_login());
        assert_eq!(ApiError::Expired.status(), Some(401));
    }
}
