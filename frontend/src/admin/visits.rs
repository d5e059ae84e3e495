use log::warn;
use web_sys::{File, HtmlInputElement, HtmlTextAreaElement, Url};
use yew::prelude::*;
use yew_router::prelude::*;

use super::{failure, go_later};
use crate::api::{BrowserClient, Part};
use crate::forms::{self, notice};
use crate::models::Visit;
use crate::scope::use_view_scope;
use crate::Route;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisitForm {
    pub pays: String,
    pub ville: String,
    pub kind: String,
    pub description: String,
}

impl From<&Visit> for VisitForm {
    fn from(v: &Visit) -> Self {
        Self { pays: v.pays.clone(), ville: v.ville.clone(), kind: v.kind.clone(), description: v.description.clone() }
    }
}

impl VisitForm {
    /// Tous les champs texte partent, l'image seulement si une nouvelle a été choisie.
    pub fn parts(&self, image: Option<File>) -> Vec<(String, Part)> {
        let mut parts: Vec<(String, Part)> = [
            ("pays", &self.pays),
            ("ville", &self.ville),
            ("type", &self.kind),
            ("description", &self.description),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), Part::Text(value.clone())))
        .collect();

        if let Some(file) = image {
            parts.push(("image".to_string(), Part::File(file)));
        }
        parts
    }
}

/// Remplace l'URL d'aperçu courante et rend l'ancienne, à révoquer.
fn swap_object_url(slot: &mut Option<String>, next: String) -> Option<String> {
    slot.replace(next)
}

/// Bouton d'envoi : désactivé tant que le PUT est en cours.
fn submit_button(busy: bool) -> (bool, &'static str) {
    if busy { (true, "Mise à jour…") } else { (false, "Mettre à jour") }
}

fn revoke(url: Option<String>) {
    if let Some(url) = url {
        if let Err(e) = Url::revoke_object_url(&url) {
            warn!("révocation de l'aperçu impossible : {e:?}");
        }
    }
}

fn text_field(form: &UseStateHandle<VisitForm>, set: fn(&mut VisitForm, String)) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let mut next = (*form).clone();
        set(&mut next, e.target_unchecked_into::<HtmlInputElement>().value());
        form.set(next);
    })
}

#[derive(Properties, PartialEq)]
pub struct EditVisitProps {
    pub id: i64,
}

#[function_component(EditVisit)]
pub fn edit_visit(props: &EditVisitProps) -> Html {
    let navigator = use_navigator();
    let scope = use_view_scope();
    let form = use_state(VisitForm::default);
    let image = use_state(|| None::<File>);
    let preview = use_state(|| None::<String>);
    let object_url = use_mut_ref(|| None::<String>);
    let loading = use_state(|| true);
    let busy = use_state(|| false);
    let message = use_state(String::new);
    let error = use_state(String::new);

    /* -------------- chargement -------------- */
    {
        let (form, preview, loading, error, scope) =
            (form.clone(), preview.clone(), loading.clone(), error.clone(), scope.clone());
        let navigator = navigator.clone();
        use_effect_with(props.id, move |id| {
            let id = *id;
            scope.spawn(async move {
                let relog = match BrowserClient::browser().visit(id).await {
                    Ok(visit) => {
                        form.set(VisitForm::from(&visit));
                        preview.set(visit.image_src());
                        false
                    }
                    Err(e) => {
                        let (text, relog) = failure(&e, "Erreur lors du chargement des données.");
                        error.set(text);
                        relog
                    }
                };
                loading.set(false);
                if relog {
                    go_later(navigator, Route::AdminLogin).await;
                }
            });
            || ()
        });
    }

    // dernier aperçu local libéré au démontage
    {
        let object_url = object_url.clone();
        use_effect_with((), move |_| move || revoke(object_url.borrow_mut().take()));
    }

    /* -------------- nouvelle image -------------- */
    let on_image = {
        let (image, preview, error, object_url) = (image.clone(), preview.clone(), error.clone(), object_url.clone());
        Callback::from(move |e: Event| {
            let Some(file) = forms::picked_file(&e) else { return };
            if let Err(text) = forms::check_image_size(file.size()) {
                error.set(text.into());
                return;
            }
            match Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    revoke(swap_object_url(&mut object_url.borrow_mut(), url.clone()));
                    preview.set(Some(url));
                }
                Err(e) => warn!("aperçu indisponible : {e:?}"),
            }
            error.set(String::new());
            image.set(Some(file));
        })
    };

    let on_description = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            next.description = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            form.set(next);
        })
    };

    let onsubmit = {
        let (form, image, message, error, busy) = (form.clone(), image.clone(), message.clone(), error.clone(), busy.clone());
        let id = props.id;
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            if *busy {
                return;
            }
            message.set(String::new());
            error.set(String::new());
            busy.set(true);

            let parts = form.parts((*image).clone());
            let (message, error, busy, navigator) = (message.clone(), error.clone(), busy.clone(), navigator.clone());
            scope.spawn(async move {
                match BrowserClient::browser().update_visit(id, parts).await {
                    Ok(confirmation) => {
                        message.set(confirmation.unwrap_or_else(|| "Visite mise à jour avec succès !".into()));
                        go_later(navigator, Route::AdminDashboard).await;
                    }
                    Err(e) => {
                        let (text, relog) = failure(&e, "Erreur lors de la mise à jour.");
                        error.set(text);
                        busy.set(false);
                        if relog {
                            go_later(navigator, Route::AdminLogin).await;
                        }
                    }
                }
            });
        })
    };

    if *loading {
        return html!(<p class="loading">{"Chargement..."}</p>);
    }
    let (disabled, label) = submit_button(*busy);

    html! {
        <div class="admin-form">
            <h2>{"Modifier la Visite Touristique"}</h2>
            { notice(&message, "success") }
            { notice(&error, "error") }
            <form {onsubmit}>
                <input placeholder="Pays" value={form.pays.clone()} oninput={text_field(&form, |f, v| f.pays = v)} />
                <input placeholder="Ville" value={form.ville.clone()} oninput={text_field(&form, |f, v| f.ville = v)} />
                <input placeholder="Type (ex: Plage, Montagne...)" value={form.kind.clone()}
                    oninput={text_field(&form, |f, v| f.kind = v)} />
                <textarea placeholder="Description" value={form.description.clone()} oninput={on_description} />
                if let Some(src) = (*preview).clone() {
                    <img class="preview" src={src} alt="Aperçu" />
                }
                <input type="file" accept="image/*" onchange={on_image} />
                <button type="submit" disabled={disabled}>{ label }</button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_use_backend_names() {
        let visit = Visit {
            id_visite: 3,
            pays: "Madagascar".into(),
            ville: "Morondava".into(),
            kind: "monument".into(),
            description: "Allée des baobabs".into(),
            image: Some("iVBOR".into()),
        };
        let parts = VisitForm::from(&visit).parts(None);
        let names: Vec<&str> = parts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["pays", "ville", "type", "description"]);
        assert!(matches!(&parts[2].1, Part::Text(t) if t == "monument"));
    }

    #[test]
    fn update_button_is_locked_while_sending() {
        assert_eq!(submit_button(true), (true, "Mise à jour…"));
        assert_eq!(submit_button(false), (false, "Mettre à jour"));
    }

    #[test]
    fn each_new_preview_hands_back_the_previous_one() {
        let mut slot = None;
        assert_eq!(swap_object_url(&mut slot, "blob:a".into()), None);
        assert_eq!(swap_object_url(&mut slot, "blob:b".into()).as_deref(), Some("blob:a"));
        assert_eq!(slot.as_deref(), Some("blob:b"));
    }
}
