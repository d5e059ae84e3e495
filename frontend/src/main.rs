use yew::prelude::*;
use yew_router::prelude::*;

mod admin;
mod api;
mod auth;
mod booking;
mod catalog;
mod config;
mod confirmation;
mod endpoints;
mod error;
mod forms;
mod guard;
mod guides;
mod header;
mod jwt;
mod layout;
mod logger;
mod logout;
mod models;
mod profile;
mod reservation;
mod scope;
mod session;
mod storage;
#[cfg(test)]
mod testing;
mod zones;

use catalog::Category;
use guard::Guard;
use layout::{AdminLayout, SiteLayout};
use storage::Namespace;

/* -------------------- routing -------------------- */

#[derive(Routable, Clone, Debug, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/dashboard")]
    Dashboard,
    #[at("/Authentification/Connexion")]
    Login,
    #[at("/authentification/ProfileUser")]
    Profile,
    #[at("/typezone/:category")]
    Zone { category: Category },
    #[at("/reservation")]
    Reservation,
    #[at("/ChoixGuide")]
    ChooseGuide,
    #[at("/confirmation")]
    Confirmation,
    #[at("/admin/login")]
    AdminLogin,
    #[at("/Admin/DashboardAdmin")]
    AdminDashboard,
    #[at("/admin/reservations")]
    AdminReservations,
    #[at("/admin/creer")]
    AdminCreate,
    #[at("/admin/modifier/:id")]
    AdminEdit { id: i64 },
    #[at("/admin/guides/nouveau")]
    AdminNewGuide,
    #[at("/admin/visites/:id/modifier")]
    AdminEditVisit { id: i64 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    pub fn login_for(ns: Namespace) -> Self {
        match ns {
            Namespace::Tourist => Route::Login,
            Namespace::Admin => Route::AdminLogin,
        }
    }

    /// Destination par défaut après une connexion réussie.
    pub fn home_for(ns: Namespace) -> Self {
        match ns {
            Namespace::Tourist => Route::Dashboard,
            Namespace::Admin => Route::AdminDashboard,
        }
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home | Route::Dashboard => html!(<SiteLayout><zones::Dashboard /></SiteLayout>),
        Route::Login => html!(<auth::LoginForm namespace={Namespace::Tourist} />),
        Route::Profile => html! {
            <SiteLayout><Guard namespace={Namespace::Tourist}><profile::ProfilePage /></Guard></SiteLayout>
        },
        Route::Zone { category } => html!(<SiteLayout><zones::CategoryBrowser {category} /></SiteLayout>),
        Route::Reservation => html! {
            <SiteLayout><Guard namespace={Namespace::Tourist}><reservation::ReservationForm /></Guard></SiteLayout>
        },
        Route::ChooseGuide => html!(<SiteLayout><guides::GuideChoice /></SiteLayout>),
        Route::Confirmation => html!(<SiteLayout><confirmation::Confirmation /></SiteLayout>),

        Route::AdminLogin => html!(<auth::LoginForm namespace={Namespace::Admin} />),
        Route::AdminDashboard => html!(<AdminLayout><admin::dashboard::AdminDashboard /></AdminLayout>),
        Route::AdminReservations => html!(<AdminLayout><admin::reservations::ReservationList /></AdminLayout>),
        Route::AdminCreate => html!(<AdminLayout><admin::admins::CreateAdmin /></AdminLayout>),
        Route::AdminEdit { id } => html!(<AdminLayout><admin::admins::EditAdmin {id} /></AdminLayout>),
        Route::AdminNewGuide => html!(<AdminLayout><admin::guides::CreateGuide /></AdminLayout>),
        Route::AdminEditVisit { id } => html!(<AdminLayout><admin::visits::EditVisit {id} /></AdminLayout>),

        Route::NotFound => html!(<h1>{"404 – Page introuvable"}</h1>),
    }
}

/* -------------------- entry point ---------------- */

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    logger::init(config::log_level());
    log::info!("API : {}", config::api_url());
    yew::Renderer::<App>::new().render();
}
