use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::storage::{KeyValueStore, Namespace, TokenStore};
use crate::Route;

/// Efface jeton, identifiant et noms d'affichage de l'espace ; l'autre espace reste intact.
pub fn sign_out<S: KeyValueStore>(tokens: &TokenStore<S>, ns: Namespace) {
    tokens.clear(ns);
    info!("déconnexion {ns}");
}

#[derive(Properties, PartialEq)]
pub struct LogoutProps {
    pub namespace: Namespace,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(Logout)]
pub fn logout(props: &LogoutProps) -> Html {
    let navigator = use_navigator();
    let ns = props.namespace;

    let onclick = Callback::from(move |_| {
        sign_out(&TokenStore::browser(), ns);
        if let Some(navigator) = &navigator {
            navigator.replace(&Route::login_for(ns));
        }
    });

    html! { <button class={props.class.clone()} {onclick}>{ "Déconnexion" }</button> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn only_the_given_namespace_is_cleared() {
        let backend = MemoryStore::with(&[
            ("token", "t1"),
            ("user_id", "7"),
            ("adminToken", "a1"),
            ("admin_id", "1"),
            ("adminNom", "Rakoto"),
            ("adminPrenom", "Hery"),
        ]);
        let tokens = TokenStore::new(backend.clone());

        sign_out(&tokens, Namespace::Admin);
        assert_eq!(backend.len(), 2);
        assert_eq!(tokens.token(Namespace::Tourist).as_deref(), Some("t1"));

        sign_out(&tokens, Namespace::Tourist);
        assert_eq!(backend.len(), 0);
    }
}
