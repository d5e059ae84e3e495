use std::rc::Rc;

use log::warn;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::BrowserClient;
use crate::booking::{BookingDraft, BookingEvent, BookingFlow, BookingStage, EntryError, FlowEffect, VisitType};
use crate::error::ApiError;
use crate::guard::ReturnTo;
use crate::scope::use_view_scope;
use crate::session::{Reason, Session};
use crate::storage::Namespace;
use crate::Route;

/// Réponse du backend traduite en événement ; un 401 renvoie à la connexion.
fn outcome_event(result: Result<(), ApiError>) -> BookingEvent {
    match result {
        Ok(()) => BookingEvent::SubmitSucceeded,
        Err(e) if e.needs_login() => BookingEvent::SessionExpired(Reason::Expired.message().to_string()),
        Err(e) => BookingEvent::SubmitFailed(e.message_or("Une erreur est survenue.")),
    }
}

/// Après reconnexion, l'utilisateur revient sur ce formulaire avec son brouillon.
fn relogin_target(draft: BookingDraft) -> (Route, ReturnTo) {
    let return_to = ReturnTo {
        path: Route::Reservation.to_path(),
        draft: Some(draft),
        notice: Some(Reason::Expired.message()),
    };
    (Route::login_for(Namespace::Tourist), return_to)
}

/* -------------------------------------------------------------------------- */
/*                     réducteur : machine + effet en attente                 */
/* -------------------------------------------------------------------------- */

/// Chaque effet porte un numéro pour que deux effets identiques successifs
/// soient tous deux exécutés.
#[derive(Clone, Debug, PartialEq)]
struct FlowState {
    entry: Result<BookingFlow, EntryError>,
    effect: Option<(u32, FlowEffect)>,
}

impl FlowState {
    fn new(draft: Option<BookingDraft>, tourist_id: Option<i64>) -> Self {
        match BookingFlow::enter(draft, tourist_id) {
            Ok((flow, effect)) => Self { entry: Ok(flow), effect: effect.map(|e| (1, e)) },
            Err(e) => Self { entry: Err(e), effect: None },
        }
    }
}

impl Reducible for FlowState {
    type Action = BookingEvent;

    fn reduce(self: Rc<Self>, event: BookingEvent) -> Rc<Self> {
        let mut next = (*self).clone();
        let seq = next.effect.as_ref().map_or(0, |(n, _)| *n);
        if let Ok(flow) = &mut next.entry {
            if let Some(effect) = flow.apply(event) {
                next.effect = Some((seq + 1, effect));
            }
        }
        Rc::new(next)
    }
}

/* -------------------------------------------------------------------------- */
/*                                 formulaire                                 */
/* -------------------------------------------------------------------------- */

#[function_component(ReservationForm)]
pub fn reservation_form() -> Html {
    let session = use_context::<Session>();
    let location = use_location();
    let navigator = use_navigator();
    let scope = use_view_scope();

    let state = {
        let draft = location.as_ref().and_then(|l| l.state::<BookingDraft>()).map(|d| (*d).clone());
        let tourist_id = session.as_ref().map(|s| s.subject_id);
        use_reducer(move || FlowState::new(draft, tourist_id))
    };

    /* ---------------- exécution des effets ---------------- */
    {
        let dispatcher = state.dispatcher();
        use_effect_with(state.effect.clone(), move |effect| {
            match effect.clone().map(|(_, e)| e) {
                Some(FlowEffect::ChooseGuide(draft)) => {
                    if let Some(nav) = &navigator {
                        nav.push_with_state(&Route::ChooseGuide, draft);
                    }
                }
                Some(FlowEffect::Submit(payload)) => scope.spawn(async move {
                    let result = BrowserClient::browser().create_reservation(&payload).await;
                    if let Err(e) = &result {
                        warn!("réservation refusée : {e:?}");
                    }
                    dispatcher.dispatch(outcome_event(result));
                }),
                Some(FlowEffect::Confirm) => {
                    if let Some(nav) = &navigator {
                        nav.push(&Route::Confirmation);
                    }
                }
                Some(FlowEffect::Relogin(draft)) => {
                    if let Some(nav) = &navigator {
                        let (route, return_to) = relogin_target(draft);
                        nav.push_with_state(&route, return_to);
                    }
                }
                None => {}
            }
            || ()
        });
    }

    let flow = match &state.entry {
        Ok(flow) => flow,
        Err(e) => {
            return html! {
                <div class="reservation">
                    <p class="error">{ e.to_string() }</p>
                    <Link<Route> to={Route::Dashboard}>{"Choisir une visite"}</Link<Route>>
                </div>
            };
        }
    };

    /* ---------------- handlers ---------------- */
    let on_date = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: InputEvent| {
            dispatcher.dispatch(BookingEvent::DateEntered(e.target_unchecked_into::<HtmlInputElement>().value()))
        })
    };
    let on_duration = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: InputEvent| {
            dispatcher.dispatch(BookingEvent::DurationEntered(e.target_unchecked_into::<HtmlInputElement>().value()))
        })
    };
    let on_type = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            dispatcher.dispatch(BookingEvent::VisitTypeChosen(VisitType::from_select(&value)))
        })
    };
    let onsubmit = {
        let dispatcher = state.dispatcher();
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            dispatcher.dispatch(BookingEvent::SubmitRequested);
        })
    };

    let draft = flow.draft();
    let selected = draft.visit_type.map(VisitType::value).unwrap_or_default();

    html! {
        <div class="reservation">
            <h2>{"Réserver une visite"}</h2>
            if let Some(visit) = &draft.visit {
                <p class="visit-summary">{ visit.title() }</p>
            }

            <form {onsubmit}>
                <label>{"Date de l'activité"}
                    <input type="date" value={draft.date.clone()} oninput={on_date} />
                </label>
                <label>{"Durée (jours)"}
                    <input type="number" min="1" value={draft.duration.clone()} oninput={on_duration} />
                </label>
                <label>{"Type de visite"}
                    <select onchange={on_type}>
                        <option value="" selected={selected.is_empty()}>{"-- Choisir --"}</option>
                        <option value="libre" selected={selected == "libre"}>{"Visite libre"}</option>
                        <option value="guide" selected={selected == "guide"}>{"Visite guidée"}</option>
                    </select>
                </label>
                if draft.guide_id.is_some() && selected == "guide" {
                    <p class="muted">{"Guide sélectionné."}</p>
                }

                <button type="submit" disabled={flow.is_busy()}>
                    { if flow.is_busy() { "Envoi…" } else { "Réserver" } }
                </button>
            </form>

            if let Some(msg) = flow.error() {
                <p class="error">{ msg }</p>
            }
            if *flow.stage() == BookingStage::Submitted {
                <p class="success">{"Réservation enregistrée."}</p>
            }
        </div>
    }
}
