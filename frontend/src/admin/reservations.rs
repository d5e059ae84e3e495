use log::info;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use super::{failure, go_later, use_flash};
use crate::api::BrowserClient;
use crate::models::ReservationRow;
use crate::scope::{use_view_scope, Loadable};
use crate::Route;

/// Filtre client : sous-chaînes insensibles à la casse, champ vide = tout passe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservationFilter {
    pub nom: String,
    pub ville: String,
    pub kind: String,
}

impl ReservationFilter {
    pub fn matches(&self, row: &ReservationRow) -> bool {
        let has = |haystack: &str, needle: &str| haystack.to_lowercase().contains(&needle.to_lowercase());
        has(&row.tourist_name(), &self.nom) && has(&row.visite_ville, &self.ville) && has(&row.visite_type, &self.kind)
    }

    pub fn apply<'a>(&self, rows: &'a [ReservationRow]) -> Vec<&'a ReservationRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

fn filter_input(filter: &UseStateHandle<ReservationFilter>, set: fn(&mut ReservationFilter, String)) -> Callback<InputEvent> {
    let filter = filter.clone();
    Callback::from(move |e: InputEvent| {
        let mut next = (*filter).clone();
        set(&mut next, e.target_unchecked_into::<HtmlInputElement>().value());
        filter.set(next);
    })
}

#[function_component(ReservationList)]
pub fn reservation_list() -> Html {
    let navigator = use_navigator();
    let scope = use_view_scope();
    let rows = use_state(|| Loadable::<Vec<ReservationRow>>::Loading);
    let filter = use_state(ReservationFilter::default);
    let busy = use_state(|| false);
    let flash = use_flash();

    /* -------------- chargement initial -------------- */
    {
        let (rows, flash, navigator, scope) = (rows.clone(), flash.clone(), navigator.clone(), scope.clone());
        use_effect_with((), move |_| {
            scope.spawn(async move {
                match BrowserClient::browser().reservations().await {
                    Ok(list) => rows.set(Loadable::Ready(list)),
                    Err(e) => {
                        let (text, relog) = failure(&e, "Erreur lors du chargement des réservations.");
                        rows.set(Loadable::Failed(text.clone()));
                        flash.set(text);
                        if relog {
                            go_later(navigator, Route::AdminLogin).await;
                        }
                    }
                }
            });
            || ()
        });
    }

    /* -------------- suppression -------------- */
    let on_delete = {
        let (rows, flash, busy) = (rows.clone(), flash.clone(), busy.clone());
        move |id: i64| {
            let (rows, flash, busy, navigator, scope) =
                (rows.clone(), flash.clone(), busy.clone(), navigator.clone(), scope.clone());
            Callback::from(move |_| {
                if *busy || !gloo_dialogs::confirm("Confirmer la suppression de cette réservation ?") {
                    return;
                }
                busy.set(true);
                let (rows, flash, busy, navigator) = (rows.clone(), flash.clone(), busy.clone(), navigator.clone());
                scope.spawn(async move {
                    let outcome = BrowserClient::browser().delete_reservation(id).await;
                    busy.set(false);
                    match outcome {
                        Ok(()) => {
                            info!("réservation {id} supprimée");
                            if let Loadable::Ready(list) = &*rows {
                                rows.set(Loadable::Ready(
                                    list.iter().filter(|r| r.id_activite_touristique != id).cloned().collect(),
                                ));
                            }
                            flash.set("Réservation supprimée avec succès.".into());
                        }
                        Err(e) => {
                            let (text, relog) = failure(&e, "Erreur lors de la suppression.");
                            flash.set(text);
                            if relog {
                                go_later(navigator, Route::AdminLogin).await;
                            }
                        }
                    }
                });
            })
        }
    };

    let table = match &*rows {
        Loadable::Loading => html!(<p class="loading">{"Chargement..."}</p>),
        Loadable::Failed(_) => Html::default(),
        Loadable::Ready(list) => {
            let shown = filter.apply(list);
            if shown.is_empty() {
                html!(<p class="muted">{"Aucune réservation trouvée."}</p>)
            } else {
                html! {
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{"Touriste"}</th><th>{"Visite"}</th><th>{"Type"}</th>
                                <th>{"Date"}</th><th>{"Durée"}</th><th>{"Guide"}</th><th>{"Actions"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for shown.into_iter().map(|r| html! {
                                <tr key={r.id_activite_touristique}>
                                    <td>{ r.tourist_name() }</td>
                                    <td>{ format!("{}, {}", r.visite_ville, r.visite_pays) }</td>
                                    <td>{ &r.visite_type }</td>
                                    <td>{ &r.date_activite }</td>
                                    <td>{ format!("{} jour(s)", r.duree) }</td>
                                    <td>{ r.guide_label() }</td>
                                    <td>
                                        <button disabled={*busy} onclick={on_delete(r.id_activite_touristique)}>
                                            {"Supprimer"}
                                        </button>
                                    </td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                }
            }
        }
    };

    html! {
        <div class="reservation-list">
            <h2>{"Liste des réservations"}</h2>
            { crate::forms::notice(&flash, "flash") }

            <form class="filters" onsubmit={Callback::from(|e: SubmitEvent| e.prevent_default())}>
                <input placeholder="Nom du touriste" value={filter.nom.clone()} oninput={filter_input(&filter, |f, v| f.nom = v)} />
                <input placeholder="Ville" value={filter.ville.clone()} oninput={filter_input(&filter, |f, v| f.ville = v)} />
                <input placeholder="Type" value={filter.kind.clone()} oninput={filter_input(&filter, |f, v| f.kind = v)} />
            </form>

            { table }
        </div>
    }
}
