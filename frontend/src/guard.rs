use yew::prelude::*;
use yew_router::prelude::*;

use crate::booking::BookingDraft;
use crate::session::{use_session, Reason, Resolution, Session};
use crate::storage::Namespace;
use crate::Route;

/// État de navigation transmis à l'écran de connexion : d'où l'on vient,
/// et le brouillon de réservation en cours s'il y en avait un.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnTo {
    pub path: String,
    pub draft: Option<BookingDraft>,
    pub notice: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GuardOutcome {
    Pending,
    Render(Session),
    Redirect(Reason),
}

/// Rien de protégé n'est rendu tant que la sonde n'a pas répondu positivement.
pub fn decide(resolution: Option<&Resolution>) -> GuardOutcome {
    match resolution {
        None => GuardOutcome::Pending,
        Some(Resolution::Authenticated(session)) => GuardOutcome::Render(session.clone()),
        Some(Resolution::Unauthenticated(reason)) => GuardOutcome::Redirect(*reason),
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    pub namespace: Namespace,
    #[prop_or_default]
    pub children: Children,
}

/// Les enfants lisent la session avec `use_context::<Session>()`.
#[function_component(Guard)]
pub fn guard(props: &GuardProps) -> Html {
    let resolution = use_session(props.namespace);
    let navigator = use_navigator();
    let location = use_location();
    let outcome = decide((*resolution).as_ref());

    {
        let ns = props.namespace;
        use_effect_with(outcome.clone(), move |outcome| {
            if let (GuardOutcome::Redirect(reason), Some(navigator)) = (outcome, navigator) {
                let return_to = ReturnTo {
                    path: location.as_ref().map(|l| l.path().to_string()).unwrap_or_default(),
                    draft: location.as_ref().and_then(|l| l.state::<BookingDraft>()).map(|d| (*d).clone()),
                    notice: (*reason != Reason::NoToken).then(|| reason.message()),
                };
                log::info!("accès protégé ({ns}) refusé : {reason:?}, retour prévu vers {}", return_to.path);
                navigator.push_with_state(&Route::login_for(ns), return_to);
            }
            || ()
        });
    }

    match outcome {
        GuardOutcome::Pending => html!(<p class="loading">{"Chargement…"}</p>),
        GuardOutcome::Redirect(_) => html!(<p class="loading">{"Redirection vers la connexion…"}</p>),
        GuardOutcome::Render(session) => html! {
            <ContextProvider<Session> context={session}>
                { for props.children.iter() }
            </ContextProvider<Session>>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;

    #[test]
    fn nothing_renders_while_pending() {
        assert_eq!(decide(None), GuardOutcome::Pending);
    }

    #[test]
    fn every_unauthenticated_reason_redirects() {
        for reason in [Reason::NoToken, Reason::Expired, Reason::Unreachable] {
            assert_eq!(decide(Some(&Resolution::Unauthenticated(reason))), GuardOutcome::Redirect(reason));
        }
    }

    #[test]
    fn authenticated_session_is_handed_to_children() {
        let session = Session { namespace: Namespace::Admin, subject_id: 3, profile: Profile::default() };
        assert_eq!(decide(Some(&Resolution::Authenticated(session.clone()))), GuardOutcome::Render(session));
    }
}
