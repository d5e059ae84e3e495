use yew::prelude::*;
use yew_router::prelude::*;

use crate::catalog::Category;
use crate::forms::{self, bind_input};
use crate::logout::Logout;
use crate::session::{use_session, Resolution};
use crate::storage::Namespace;
use crate::Route;

/* ---------------- widget profil ---------------- */

#[function_component(ProfileWidget)]
fn profile_widget() -> Html {
    let resolution = use_session(Namespace::Tourist);

    match &*resolution {
        None => html!(<span class="profile-widget loading">{"Chargement du profil..."}</span>),
        Some(Resolution::Authenticated(session)) => html! {
            <div class="profile-widget">
                <Link<Route> to={Route::Profile} classes="profile-link">
                    <img class="avatar" src={session.profile.avatar_url(40)} alt="avatar" />
                    <span>{ session.profile.full_name() }</span>
                </Link<Route>>
                <Logout namespace={Namespace::Tourist} />
            </div>
        },
        Some(Resolution::Unauthenticated(reason)) => html! {
            <div class="profile-widget">
                <span class="muted">{ reason.message() }</span>
                <Link<Route> to={Route::Login}>{"Se connecter"}</Link<Route>>
            </div>
        },
    }
}

/* ---------------- recherche de zone ------------ */

#[function_component(ZoneSearch)]
fn zone_search() -> Html {
    let navigator = use_navigator();
    let query = use_state(String::new);
    let error = use_state(String::new);

    let onsubmit = {
        let (query, error) = (query.clone(), error.clone());
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            match Category::from_search(&query) {
                Ok(category) => {
                    error.set(String::new());
                    query.set(String::new());
                    if let Some(navigator) = &navigator {
                        navigator.push(&Route::Zone { category });
                    }
                }
                Err(e) => error.set(e.to_string()),
            }
        })
    };

    html! {
        <form class="zone-search" {onsubmit}>
            <input
                type="search"
                placeholder="Rechercher une zone (plage, montagne…)"
                value={(*query).clone()}
                oninput={bind_input(&query)}
            />
            <button type="submit">{"Rechercher"}</button>
            { forms::notice(&error, "error") }
        </form>
    }
}

#[function_component(SiteHeader)]
pub fn site_header() -> Html {
    html! {
        <header class="header">
            <div class="header-left">
                <Link<Route> to={Route::Dashboard} classes="header-title">{"Tourisme Madagascar"}</Link<Route>>
            </div>
            <ZoneSearch />
            <ProfileWidget />
        </header>
    }
}
