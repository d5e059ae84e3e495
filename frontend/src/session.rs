use log::{debug, warn};
use yew::prelude::*;

use crate::api::{ApiClient, BrowserClient, Transport};
use crate::error::ApiError;
use crate::models::Profile;
use crate::scope::ViewScope;
use crate::storage::{KeyValueStore, Namespace};

/* ---------------- structure session ---------------- */
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub namespace: Namespace,
    pub subject_id: i64,
    pub profile: Profile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    NoToken,
    Expired,
    /// Échec transitoire : le jeton est conservé.
    Unreachable,
}

impl Reason {
    pub const fn message(self) -> &'static str {
        match self {
            Reason::NoToken => "Vous n'êtes pas connecté. Veuillez vous connecter.",
            Reason::Expired => "Votre session a expiré. Veuillez vous reconnecter.",
            Reason::Unreachable => "Erreur de connexion au serveur. Veuillez réessayer plus tard.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Authenticated(Session),
    Unauthenticated(Reason),
}

impl Resolution {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Resolution::Authenticated(s) => Some(s),
            Resolution::Unauthenticated(_) => None,
        }
    }
}

/// Jeton stocké + sonde de profil. Seul un 401 efface le jeton
/// (l'effacement est fait par le client HTTP lui-même).
pub async fn resolve<T: Transport, S: KeyValueStore>(client: &ApiClient<T, S>, ns: Namespace) -> Resolution {
    let Some(stored) = client.tokens().get(ns) else {
        debug!("espace {ns} : aucun jeton");
        return Resolution::Unauthenticated(Reason::NoToken);
    };

    let probe = match ns {
        Namespace::Tourist => client.tourist_profile().await,
        Namespace::Admin => client.admin(stored.subject_id).await.map(Profile::from),
    };

    match probe {
        Ok(profile) => Resolution::Authenticated(Session { namespace: ns, subject_id: stored.subject_id, profile }),
        Err(ApiError::Expired) => Resolution::Unauthenticated(Reason::Expired),
        Err(ApiError::Unauthenticated) => Resolution::Unauthenticated(Reason::NoToken),
        Err(e) => {
            warn!("espace {ns} : sonde de profil en échec : {e:?}");
            Resolution::Unauthenticated(Reason::Unreachable)
        }
    }
}

/* ---------------- hook pratique -------------------- */

/// Chaque appelant fait sa propre sonde ; `None` tant qu'elle n'a pas répondu.
#[hook]
pub fn use_session(ns: Namespace) -> UseStateHandle<Option<Resolution>> {
    let resolution = use_state(|| None::<Resolution>);

    {
        let resolution = resolution.clone();
        use_effect_with(ns, move |ns| {
            let ns = *ns;
            let scope = ViewScope::new();
            scope.spawn(async move {
                let client = BrowserClient::browser();
                resolution.set(Some(resolve(&client, ns).await));
            });
            move || scope.close()
        });
    }

    resolution
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{client, FakeTransport};

    const PROFILE: &str = r#"{"touriste":{"nom":"Rabe","prenom":"Lova","email":"lova@mail.mg"}}"#;

    #[test]
    fn no_token_resolves_without_network() {
        for ns in [Namespace::Tourist, Namespace::Admin] {
            let transport = FakeTransport::default().reply(200, PROFILE);
            let r = block_on(resolve(&client(&transport, &MemoryStore::default()), ns));
            assert_eq!(r, Resolution::Unauthenticated(Reason::NoToken));
            assert_eq!(transport.count(), 0);
        }
    }

    #[test]
    fn profile_ok_authenticates() {
        let store = MemoryStore::with(&[("token", "t1"), ("user_id", "7")]);
        let transport = FakeTransport::default().reply(200, PROFILE);

        let r = block_on(resolve(&client(&transport, &store), Namespace::Tourist));
        let session = r.session().expect("authentifié");
        assert_eq!(session.subject_id, 7);
        assert_eq!(session.profile.full_name(), "Lova Rabe");
        assert_eq!(transport.requests()[0].path, "/touriste/profile");
    }

    #[test]
    fn expired_token_is_purged() {
        let store = MemoryStore::with(&[("token", "t1"), ("user_id", "7")]);
        let transport = FakeTransport::default().reply(401, r#"{"error":"jwt expired"}"#);

        let r = block_on(resolve(&client(&transport, &store), Namespace::Tourist));
        assert_eq!(r, Resolution::Unauthenticated(Reason::Expired));
        assert_eq!(store.get("token"), None);
        assert_eq!(store.get("user_id"), None);
    }

    #[test]
    fn outage_keeps_the_token() {
        let store = MemoryStore::with(&[("token", "t1"), ("user_id", "7")]);

        for transport in [FakeTransport::default().fail("Failed to fetch"), FakeTransport::default().reply(500, "")] {
            let r = block_on(resolve(&client(&transport, &store), Namespace::Tourist));
            assert_eq!(r, Resolution::Unauthenticated(Reason::Unreachable));
            assert_eq!(store.get("token").as_deref(), Some("t1"));
        }
    }

    #[test]
    fn admin_probe_reads_its_own_record() {
        let store = MemoryStore::with(&[("adminToken", "a1"), ("admin_id", "3")]);
        let transport =
            FakeTransport::default().reply(200, r#"{"prenom":"Hery","nom":"Rakoto","telephone":331234567}"#);

        let r = block_on(resolve(&client(&transport, &store), Namespace::Admin));
        assert_eq!(transport.requests()[0].path, "/admin/3");
        assert_eq!(r.session().unwrap().profile.contact.as_deref(), Some("331234567"));
    }

    #[test]
    fn orphan_token_is_purged_before_probing() {
        let store = MemoryStore::with(&[("token", "t1")]);
        let transport = FakeTransport::default().reply(200, PROFILE);

        let r = block_on(resolve(&client(&transport, &store), Namespace::Tourist));
        assert_eq!(r, Resolution::Unauthenticated(Reason::NoToken));
        assert_eq!(transport.count(), 0);
        assert_eq!(store.len(), 0);
    }
}
