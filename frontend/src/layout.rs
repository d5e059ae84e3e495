use yew::prelude::*;
use yew_router::prelude::*;

use crate::guard::Guard;
use crate::header::SiteHeader;
use crate::logout::Logout;
use crate::session::Session;
use crate::storage::{Namespace, TokenStore};
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    #[prop_or_default]
    pub children: Children,
}

/* -------------------------------------------------------------------------- */
/*                                côté touriste                               */
/* -------------------------------------------------------------------------- */

#[function_component(SiteLayout)]
pub fn site_layout(props: &LayoutProps) -> Html {
    html! {
        <>
            <SiteHeader />
            <main class="main-content">
                { for props.children.iter() }
            </main>
        </>
    }
}

/* -------------------------------------------------------------------------- */
/*                          console d'administration                          */
/* -------------------------------------------------------------------------- */

/// Nom affiché dans la barre : celui enregistré à la connexion, sinon le profil sondé.
fn admin_label(session: &Session) -> String {
    TokenStore::browser()
        .get(Namespace::Admin)
        .and_then(|s| s.display)
        .map(|d| format!("{} {}", d.prenom, d.nom).trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| session.profile.full_name())
}

#[function_component(AdminShell)]
fn admin_shell(props: &LayoutProps) -> Html {
    let Some(session) = use_context::<Session>() else {
        return Html::default();
    };

    html! {
        <>
            <header class="header">
                <div class="header-title">{"Administration"}</div>
                <div class="header-user">{ admin_label(&session) }</div>
                <div class="header-logout">
                    <Logout namespace={Namespace::Admin} />
                </div>
            </header>

            <nav class="nav">
                <ul class="nav-list">
                    <li class="nav-item"><Link<Route> to={Route::AdminDashboard}>{"Tableau de bord"}</Link<Route>></li>
                    <li class="nav-item"><Link<Route> to={Route::AdminReservations}>{"Réservations"}</Link<Route>></li>
                    <li class="nav-item"><Link<Route> to={Route::AdminNewGuide}>{"Ajouter un guide"}</Link<Route>></li>
                    <li class="nav-item"><Link<Route> to={Route::AdminCreate}>{"Créer un administrateur"}</Link<Route>></li>
                    <li class="nav-item">
                        <Link<Route> to={Route::AdminEdit { id: session.subject_id }}>{"Mon compte"}</Link<Route>>
                    </li>
                </ul>
            </nav>

            <main class="main-content">
                { for props.children.iter() }
            </main>
        </>
    }
}

/// Toute la console passe par le garde de l'espace admin.
#[function_component(AdminLayout)]
pub fn admin_layout(props: &LayoutProps) -> Html {
    html! {
        <Guard namespace={Namespace::Admin}>
            <AdminShell>
                { for props.children.iter() }
            </AdminShell>
        </Guard>
    }
}
