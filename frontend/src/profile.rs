use yew::prelude::*;

use crate::logout::Logout;
use crate::models::{or_undefined, Profile};
use crate::session::Session;
use crate::storage::Namespace;

/// Lignes affichées, dans l'ordre de la fiche.
pub fn profile_rows(profile: &Profile) -> [(&'static str, &str); 5] {
    [
        ("Nom", or_undefined(&profile.nom)),
        ("Prénom", or_undefined(&profile.prenom)),
        ("Email", or_undefined(&profile.email)),
        ("Numéro", or_undefined(&profile.contact)),
        ("Adresse", or_undefined(&profile.adresse)),
    ]
}

/// Rendu sous le garde touriste : le profil vient de la sonde de session.
#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let Some(session) = use_context::<Session>() else {
        return html!(<h2 class="error">{"Vous n'êtes pas connecté. Veuillez vous connecter."}</h2>);
    };
    let profile = &session.profile;

    html! {
        <div class="profile">
            <h2>{"Profil utilisateur"}</h2>
            <div class="profile-card">
                <img class="avatar" src={profile.avatar_url(96)} alt="avatar" />
                <h3>{ format!("{} {}", or_undefined(&profile.prenom), or_undefined(&profile.nom)) }</h3>
                <p class="muted">{ or_undefined(&profile.email) }</p>
            </div>
            <div class="profile-details">
                { for profile_rows(profile).into_iter().map(|(label, value)| html! {
                    <p><strong>{ format!("{label} :") }</strong>{ " " }{ value }</p>
                }) }
            </div>
            <Logout namespace={Namespace::Tourist} />
        </div>
    }
}
