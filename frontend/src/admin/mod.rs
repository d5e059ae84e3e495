//! Console d'administration : tous les écrans passent par `AdminLayout`.

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::config::{FLASH_DELAY_MS, REDIRECT_DELAY_MS};
use crate::error::ApiError;
use crate::Route;

pub mod admins;
pub mod dashboard;
pub mod guides;
pub mod reservations;
pub mod visits;

pub const SESSION_EXPIRED: &str = "Session expirée. Veuillez vous reconnecter.";

/// Texte à afficher pour un échec d'appel, et s'il faut repasser par la connexion.
pub fn failure(err: &ApiError, fallback: &str) -> (String, bool) {
    if err.needs_login() {
        (SESSION_EXPIRED.to_string(), true)
    } else {
        (err.message_or(fallback), false)
    }
}

/// Navigation différée (laisse le temps de lire le message affiché).
pub async fn go_later(navigator: Option<Navigator>, route: Route) {
    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
    if let Some(navigator) = navigator {
        navigator.push(&route);
    }
}

/// Message qui s'efface seul après quelques secondes.
#[hook]
pub fn use_flash() -> UseStateHandle<String> {
    let message = use_state(String::new);
    {
        let handle = message.clone();
        use_effect_with((*message).clone(), move |text| {
            let timer = (!text.is_empty()).then(|| Timeout::new(FLASH_DELAY_MS, move || handle.set(String::new())));
            move || drop(timer)
        });
    }
    message
}
