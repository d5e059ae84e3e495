use gloo_timers::future::TimeoutFuture;
use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::{ApiClient, BrowserClient, Transport};
use crate::config::{FADE_DELAY_MS, REDIRECT_DELAY_MS};
use crate::error::ApiError;
use crate::forms::{self, bind_input};
use crate::guard::ReturnTo;
use crate::models::Credentials;
use crate::scope::use_view_scope;
use crate::storage::{KeyValueStore, Namespace, StoredSession};
use crate::Route;

/* -------------------------------------------------------------------------- */
/*                              service de connexion                          */
/* -------------------------------------------------------------------------- */

/// Contrôle local → `POST …/login` → enregistrement atomique de la session.
/// Un email sans `@` ne part jamais sur le réseau.
pub async fn sign_in<T: Transport, S: KeyValueStore>(
    client: &ApiClient<T, S>,
    ns: Namespace,
    credentials: &Credentials,
) -> Result<StoredSession, ApiError> {
    forms::check_email(&credentials.email).map_err(|m| ApiError::Validation(m.to_string()))?;
    forms::check_required(&[&credentials.password]).map_err(|m| ApiError::Validation(m.to_string()))?;

    let session = client.login(ns, credentials).await?;
    client.tokens().set(ns, &session)?;
    info!("connexion {ns} réussie, sujet {}", session.subject_id);
    Ok(session)
}

/// Origine mémorisée par le garde si elle est exploitable, sinon l'accueil de l'espace.
pub fn landing(ns: Namespace, return_to: Option<&ReturnTo>) -> Route {
    return_to
        .and_then(|r| Route::recognize(&r.path))
        .filter(|route| !matches!(route, Route::NotFound | Route::Login | Route::AdminLogin))
        .unwrap_or_else(|| Route::home_for(ns))
}

fn error_text(err: &ApiError) -> String {
    match err {
        ApiError::Network(reason) => format!("Erreur réseau : {reason}"),
        other => other.to_string(),
    }
}

/* -------------------------------------------------------------------------- */
/*                               composant login                              */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub namespace: Namespace,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let ns = props.namespace;
    let navigator = use_navigator();
    let return_to = use_location().and_then(|l| l.state::<ReturnTo>());
    let scope = use_view_scope();

    let email = use_state(String::new);
    let password = use_state(String::new);
    let show_password = use_state(|| false);
    let error = use_state(String::new);
    let busy = use_state(|| false);
    let success = use_state(|| false);
    let fading = use_state(|| false);

    let email_ok = email.is_empty() || forms::is_email(&email);

    /* ------------------ callback du <form onsubmit=…> --------------------- */
    let onsubmit = {
        let (email, password) = (email.clone(), password.clone());
        let (error, busy, success, fading) = (error.clone(), busy.clone(), success.clone(), fading.clone());
        let return_to = return_to.clone();

        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            if *busy {
                return;
            }
            error.set(String::new());
            busy.set(true);

            let credentials = Credentials { email: (*email).clone(), password: (*password).clone() };
            let (error, busy, success, fading) = (error.clone(), busy.clone(), success.clone(), fading.clone());
            let navigator = navigator.clone();
            let return_to = return_to.clone();

            scope.spawn(async move {
                if let Err(e) = sign_in(&BrowserClient::browser(), ns, &credentials).await {
                    error.set(error_text(&e));
                    busy.set(false);
                    return;
                }
                success.set(true);

                TimeoutFuture::new(FADE_DELAY_MS).await;
                fading.set(true);
                TimeoutFuture::new(REDIRECT_DELAY_MS - FADE_DELAY_MS).await;

                let Some(navigator) = navigator else { return };
                let target = landing(ns, return_to.as_deref());
                match return_to.and_then(|r| r.draft.clone()) {
                    Some(draft) => navigator.push_with_state(&target, draft),
                    None => navigator.push(&target),
                }
            });
        })
    };

    let toggle = {
        let show_password = show_password.clone();
        Callback::from(move |_| show_password.set(!*show_password))
    };

    let title = match ns {
        Namespace::Tourist => "Connexion",
        Namespace::Admin => "Connexion Administrateur",
    };
    let notice = return_to.as_ref().and_then(|r| r.notice).unwrap_or_default();

    /* ---------------------------- rendu ---------------------------------- */
    html! {
        <div class={classes!("login-container", (*fading).then_some("fade-out"))}>
            <h2>{ title }</h2>
            { forms::notice(notice, "notice") }

            <form {onsubmit}>
                <input type="email" placeholder="Email" value={(*email).clone()} oninput={bind_input(&email)} />
                if !email_ok {
                    <p class="error">{ forms::BAD_EMAIL }</p>
                }
                <div class="password-field">
                    <input
                        type={if *show_password { "text" } else { "password" }}
                        placeholder="Mot de passe"
                        value={(*password).clone()}
                        oninput={bind_input(&password)}
                    />
                    <button type="button" onclick={toggle}>
                        { if *show_password { "Masquer" } else { "Afficher" } }
                    </button>
                </div>
                <button type="submit" disabled={*busy || !email_ok || email.is_empty()}>
                    { if *busy { "Connexion…" } else { "Se connecter" } }
                </button>
            </form>

            if *success {
                <p class="success">{"Connexion réussie ! Redirection..."}</p>
            }
            { forms::notice(&error, "error") }
        </div>
    }
}
