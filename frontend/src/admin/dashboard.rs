use web_sys::HtmlSelectElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::BrowserClient;
use crate::catalog::Category;
use crate::models::Visit;
use crate::scope::{Loadable, ViewScope};
use crate::session::Session;
use crate::Route;

/* ---------------- visites modifiables ---------------- */

#[function_component(VisitPicker)]
fn visit_picker() -> Html {
    let category = use_state(|| Category::Plage);
    let visits = use_state(|| Loadable::<Vec<Visit>>::Loading);

    {
        let visits = visits.clone();
        use_effect_with(*category, move |category| {
            let category = *category;
            visits.set(Loadable::Loading);
            let scope = ViewScope::new();
            scope.spawn(async move {
                visits.set(match BrowserClient::browser().visits_by_category(category).await {
                    Ok(list) => Loadable::Ready(list),
                    Err(e) => Loadable::Failed(e.message_or("Erreur lors du chargement des visites.")),
                });
            });
            move || scope.close()
        });
    }

    let onchange = {
        let category = category.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(c) = select.value().parse() {
                category.set(c);
            }
        })
    };

    html! {
        <section class="visit-picker">
            <h3>{"Visites"}</h3>
            <select {onchange}>
                { for Category::ALL.into_iter().map(|c| html! {
                    <option value={c.slug()} selected={c == *category}>{ c.label() }</option>
                }) }
            </select>
            {
                match &*visits {
                    Loadable::Loading => html!(<p class="loading">{"Chargement..."}</p>),
                    Loadable::Failed(msg) => html!(<p class="error">{ msg }</p>),
                    Loadable::Ready(list) => html! {
                        <ul>
                            { for list.iter().map(|v| html! {
                                <li key={v.id_visite}>
                                    { v.title() }{ " " }
                                    <Link<Route> to={Route::AdminEditVisit { id: v.id_visite }}>{"Modifier"}</Link<Route>>
                                </li>
                            }) }
                        </ul>
                    },
                }
            }
        </section>
    }
}

#[function_component(AdminDashboard)]
pub fn admin_dashboard() -> Html {
    let name = use_context::<Session>().map(|s| s.profile.full_name()).unwrap_or_default();

    html! {
        <div class="admin-dashboard">
            <h2>{ format!("Bienvenue {name}") }</h2>
            <div class="admin-cards">
                <Link<Route> to={Route::AdminReservations} classes="admin-card">{"Gérer les réservations"}</Link<Route>>
                <Link<Route> to={Route::AdminNewGuide} classes="admin-card">{"Ajouter un guide"}</Link<Route>>
                <Link<Route> to={Route::AdminCreate} classes="admin-card">{"Créer un administrateur"}</Link<Route>>
            </div>
            <VisitPicker />
        </div>
    }
}
