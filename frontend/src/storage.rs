//! Stockage des jetons, un espace de clés par type de compte.
//!
//! Le jeton et l'identifiant du sujet sont toujours écrits ou effacés
//! ensemble : aucun appelant ne peut observer l'un sans l'autre.

use std::fmt;

use gloo::storage::{LocalStorage, Storage};
use log::{debug, warn};

use crate::error::StorageError;

/* -------------------------------------------------------------------------- */
/*                                 espaces                                    */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Tourist,
    Admin,
}

impl Namespace {
    pub const fn token_key(self) -> &'static str {
        match self {
            Namespace::Tourist => "token",
            Namespace::Admin => "adminToken",
        }
    }

    pub const fn subject_key(self) -> &'static str {
        match self {
            Namespace::Tourist => "user_id",
            Namespace::Admin => "admin_id",
        }
    }

    /// Clés d'affichage : (nom, prénom). Seul l'espace admin en a.
    pub const fn display_keys(self) -> Option<(&'static str, &'static str)> {
        match self {
            Namespace::Tourist => None,
            Namespace::Admin => Some(("adminNom", "adminPrenom")),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Namespace::Tourist => "touriste",
            Namespace::Admin => "admin",
        })
    }
}

/* -------------------------------------------------------------------------- */
/*                              support clé/valeur                            */
/* -------------------------------------------------------------------------- */

pub trait KeyValueStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &'static str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`, valeurs brutes (pas de JSON autour).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError::Write { key, reason: format!("{e:?}") })
    }

    fn remove(&self, key: &str) {
        let _ = LocalStorage::raw().remove_item(key);
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    use super::KeyValueStore;
    use crate::error::StorageError;

    /// Support en mémoire ; les clones partagent le même contenu.
    #[derive(Clone, Debug, Default)]
    pub struct MemoryStore {
        items: Rc<RefCell<HashMap<String, String>>>,
        failing: Rc<RefCell<HashSet<&'static str>>>,
    }

    impl MemoryStore {
        pub fn with(pairs: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (k, v) in pairs {
                store.items.borrow_mut().insert(k.to_string(), v.to_string());
            }
            store
        }

        /// Toute écriture future de `key` échouera (quota plein, mode privé…).
        pub fn fail_writes_to(&self, key: &'static str) {
            self.failing.borrow_mut().insert(key);
        }

        pub fn get(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        pub fn len(&self) -> usize {
            self.items.borrow().len()
        }
    }

    impl KeyValueStore for MemoryStore {
        fn read(&self, key: &str) -> Option<String> {
            self.get(key)
        }

        fn write(&self, key: &'static str, value: &str) -> Result<(), StorageError> {
            if self.failing.borrow().contains(key) {
                return Err(StorageError::Write { key, reason: "quota dépassé".into() });
            }
            self.items.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) {
            self.items.borrow_mut().remove(key);
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                               magasin de jetons                            */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayName {
    pub nom: String,
    pub prenom: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub subject_id: i64,
    pub display: Option<DisplayName>,
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"***")
            .field("subject_id", &self.subject_id)
            .field("display", &self.display)
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenStore<S> {
    backend: S,
}

impl TokenStore<BrowserStorage> {
    pub fn browser() -> Self {
        Self::new(BrowserStorage)
    }
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Session complète de l'espace, ou `None`.
    /// Un jeton sans identifiant exploitable est purgé au passage.
    pub fn get(&self, ns: Namespace) -> Option<StoredSession> {
        let token = self.backend.read(ns.token_key()).filter(|t| !t.is_empty())?;
        let subject_id = self
            .backend
            .read(ns.subject_key())
            .and_then(|raw| raw.trim().parse::<i64>().ok());

        let Some(subject_id) = subject_id else {
            warn!("espace {ns} : jeton présent sans identifiant, purge");
            self.clear(ns);
            return None;
        };

        let display = ns.display_keys().map(|(nom, prenom)| DisplayName {
            nom: self.backend.read(nom).unwrap_or_default(),
            prenom: self.backend.read(prenom).unwrap_or_default(),
        });

        Some(StoredSession { token, subject_id, display })
    }

    pub fn token(&self, ns: Namespace) -> Option<String> {
        self.get(ns).map(|s| s.token)
    }

    /// Écrit jeton + identifiant (+ noms d'affichage). En cas d'échec
    /// partiel l'espace est vidé, jamais laissé à moitié écrit.
    pub fn set(&self, ns: Namespace, session: &StoredSession) -> Result<(), StorageError> {
        let written = self
            .backend
            .write(ns.token_key(), &session.token)
            .and_then(|_| self.backend.write(ns.subject_key(), &session.subject_id.to_string()));

        if let Err(e) = written {
            self.clear(ns);
            return Err(e);
        }

        if let (Some((nom_key, prenom_key)), Some(display)) = (ns.display_keys(), &session.display) {
            for (key, value) in [(nom_key, &display.nom), (prenom_key, &display.prenom)] {
                if let Err(e) = self.backend.write(key, value) {
                    warn!("espace {ns} : {e}");
                }
            }
        }

        debug!("espace {ns} : session enregistrée pour le sujet {}", session.subject_id);
        Ok(())
    }

    pub fn clear(&self, ns: Namespace) {
        self.backend.remove(ns.token_key());
        self.backend.remove(ns.subject_key());
        if let Some((nom, prenom)) = ns.display_keys() {
            self.backend.remove(nom);
            self.backend.remove(prenom);
        }
        debug!("espace {ns} : session effacée");
    }
}
