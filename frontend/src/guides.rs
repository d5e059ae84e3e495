use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::BrowserClient;
use crate::booking::BookingDraft;
use crate::models::Guide;
use crate::scope::{use_view_scope, Loadable};
use crate::Route;

/// Le brouillon reçu repart vers le formulaire avec le guide choisi ;
/// sans brouillon, le formulaire signalera l'absence de visite.
pub fn attach_guide(draft: Option<&BookingDraft>, guide_id: i64) -> BookingDraft {
    draft.cloned().unwrap_or_default().with_guide(guide_id)
}

fn guide_card(guide: &Guide, on_pick: Callback<MouseEvent>) -> Html {
    let name = format!("{} {}", guide.prenom, guide.nom);
    html! {
        <div class="guide-card" key={guide.id_guide}>
            {
                match guide.photo_src() {
                    Some(src) => html!(<img src={src} alt={name.clone()} />),
                    None => html!(<div class="photo-placeholder"><span>{"Aucune photo"}</span></div>),
                }
            }
            <h3>{ name }</h3>
            <p>{ guide.speciality_label() }</p>
            <button onclick={on_pick}>{"Choisir ce guide"}</button>
        </div>
    }
}

#[function_component(GuideChoice)]
pub fn guide_choice() -> Html {
    let navigator = use_navigator();
    let draft = use_location().and_then(|l| l.state::<BookingDraft>());
    let scope = use_view_scope();
    let guides = use_state(|| Loadable::<Vec<Guide>>::Loading);

    {
        let guides = guides.clone();
        use_effect_with((), move |_| {
            scope.spawn(async move {
                guides.set(match BrowserClient::browser().guides().await {
                    Ok(list) => Loadable::Ready(list),
                    Err(e) => Loadable::Failed(e.message_or("Erreur lors du chargement des guides")),
                });
            });
            || ()
        });
    }

    let pick = move |guide_id: i64| {
        let navigator = navigator.clone();
        let draft = draft.clone();
        Callback::from(move |_| {
            if let Some(navigator) = &navigator {
                navigator.push_with_state(&Route::Reservation, attach_guide(draft.as_deref(), guide_id));
            }
        })
    };

    html! {
        <div class="guide-choice">
            <h2>{"Choisissez un guide"}</h2>
            {
                match &*guides {
                    Loadable::Loading => html!(<p class="loading">{"Chargement…"}</p>),
                    Loadable::Failed(msg) => html!(<p class="error">{ format!("Erreur : {msg}") }</p>),
                    Loadable::Ready(list) => html! {
                        <div class="guide-grid">
                            { for list.iter().map(|g| guide_card(g, pick(g.id_guide))) }
                        </div>
                    },
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::VisitType;
    use crate::models::Visit;

    #[test]
    fn chosen_guide_is_merged_into_the_draft() {
        let visit = Visit {
            id_visite: 5,
            pays: "Madagascar".into(),
            ville: "Isalo".into(),
            kind: "foret".into(),
            description: String::new(),
            image: None,
        };
        let mut draft = BookingDraft::from_visit(visit);
        draft.date = "2026-12-01".into();

        let back = attach_guide(Some(&draft), 4);
        assert_eq!(back.visit_id(), Some(5));
        assert_eq!(back.guide_id, Some(4));
        assert_eq!(back.visit_type, Some(VisitType::Guide));
        assert_eq!(back.date, "2026-12-01");
    }

    #[test]
    fn missing_draft_still_carries_the_guide() {
        let back = attach_guide(None, 4);
        assert_eq!(back.visit_id(), None);
        assert_eq!(back.guide_id, Some(4));
    }
}
