use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(Confirmation)]
pub fn confirmation() -> Html {
    html! {
        <div class="confirmation">
            <h2>{"Réservation confirmée !"}</h2>
            <p>{"Votre demande a bien été enregistrée. Merci pour votre confiance."}</p>
            <Link<Route> to={Route::Dashboard}>{"Retour à l'accueil"}</Link<Route>>
        </div>
    }
}
