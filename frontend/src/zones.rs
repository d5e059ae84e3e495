//! Accueil (liste des types de zone) et navigateur de visites par catégorie.

use log::debug;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::BrowserClient;
use crate::booking::BookingDraft;
use crate::catalog::Category;
use crate::models::Visit;
use crate::scope::{Loadable, ViewScope};
use crate::Route;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    html! {
        <div class="dashboard">
            <h1>{"Où partir ?"}</h1>
            <div class="zone-grid">
                { for Category::ALL.into_iter().map(|category| html! {
                    <Link<Route> to={Route::Zone { category }} classes="zone-card">
                        <h2>{ category.label() }</h2>
                        <p>{ category.headline() }</p>
                    </Link<Route>>
                }) }
            </div>
        </div>
    }
}

/* -------------------------------------------------------------------------- */
/*                           visites d'une catégorie                          */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct CategoryBrowserProps {
    pub category: Category,
}

#[function_component(CategoryBrowser)]
pub fn category_browser(props: &CategoryBrowserProps) -> Html {
    let navigator = use_navigator();
    let visits = use_state(|| Loadable::<Vec<Visit>>::Loading);

    {
        let visits = visits.clone();
        use_effect_with(props.category, move |category| {
            let category = *category;
            visits.set(Loadable::Loading);

            let scope = ViewScope::new();
            scope.spawn(async move {
                let loaded = BrowserClient::browser().visits_by_category(category).await;
                visits.set(match loaded {
                    Ok(list) => {
                        debug!("{} visites « {category} »", list.len());
                        Loadable::Ready(list)
                    }
                    Err(e) => Loadable::Failed(e.message_or(&format!("Erreur lors du chargement des {category}s"))),
                });
            });
            move || scope.close()
        });
    }

    let reserve = move |visit: Visit| {
        let navigator = navigator.clone();
        Callback::from(move |_| {
            if let Some(navigator) = &navigator {
                navigator.push_with_state(&Route::Reservation, BookingDraft::from_visit(visit.clone()));
            }
        })
    };

    let body = match &*visits {
        Loadable::Loading => html!(<p class="loading">{"Chargement…"}</p>),
        Loadable::Failed(msg) => html!(<p class="error">{ format!("Erreur : {msg}") }</p>),
        Loadable::Ready(list) if list.is_empty() => html!(<p class="muted">{"Aucune visite pour le moment."}</p>),
        Loadable::Ready(list) => html! {
            <div class="visit-grid">
                { for list.iter().map(|visit| html! {
                    <div class="visit-card" key={visit.id_visite}>
                        if let Some(src) = visit.image_src() {
                            <img src={src} alt={visit.title()} />
                        }
                        <h2>{ visit.title() }</h2>
                        <p>{ &visit.description }</p>
                        <button onclick={reserve(visit.clone())}>{"Réserver une visite"}</button>
                    </div>
                }) }
            </div>
        },
    };

    html! {
        <div class="category-browser">
            <h1>{ props.category.headline() }</h1>
            { body }
        </div>
    }
}
