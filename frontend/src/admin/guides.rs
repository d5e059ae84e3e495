use web_sys::{File, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

use super::{failure, go_later};
use crate::api::{BrowserClient, Part};
use crate::forms::{self, notice};
use crate::scope::use_view_scope;
use crate::Route;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuideForm {
    pub prenom: String,
    pub nom: String,
    pub numero: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
    pub specialite: String,
    pub commentaire: String,
}

impl GuideForm {
    /// Champs vides non envoyés ; la confirmation reste côté client.
    pub fn parts(&self, photo: Option<File>) -> Result<Vec<(String, Part)>, &'static str> {
        forms::check_passwords(&self.password, &self.confirmation)?;

        let mut parts: Vec<(String, Part)> = [
            ("prenom", &self.prenom),
            ("nom", &self.nom),
            ("numero", &self.numero),
            ("email", &self.email),
            ("password", &self.password),
            ("specialite", &self.specialite),
            ("commentaire", &self.commentaire),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name.to_string(), Part::Text(value.clone())))
        .collect();

        if let Some(file) = photo {
            parts.push(("photo".to_string(), Part::File(file)));
        }
        Ok(parts)
    }
}

fn text_field(form: &UseStateHandle<GuideForm>, set: fn(&mut GuideForm, String)) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let mut next = (*form).clone();
        set(&mut next, e.target_unchecked_into::<HtmlInputElement>().value());
        form.set(next);
    })
}

#[function_component(CreateGuide)]
pub fn create_guide() -> Html {
    let navigator = use_navigator();
    let scope = use_view_scope();
    let form = use_state(GuideForm::default);
    let photo = use_state(|| None::<File>);
    let message = use_state(String::new);
    let error = use_state(String::new);
    let busy = use_state(|| false);

    let on_photo = {
        let photo = photo.clone();
        Callback::from(move |e: Event| photo.set(forms::picked_file(&e)))
    };
    let on_comment = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            next.commentaire = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            form.set(next);
        })
    };

    let onsubmit = {
        let (form, photo, message, error, busy) = (form.clone(), photo.clone(), message.clone(), error.clone(), busy.clone());
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            message.set(String::new());
            let parts = match form.parts((*photo).clone()) {
                Ok(p) => p,
                Err(text) => return error.set(text.into()),
            };
            error.set(String::new());
            busy.set(true);

            let (form, photo, message, error, busy, navigator) =
                (form.clone(), photo.clone(), message.clone(), error.clone(), busy.clone(), navigator.clone());
            scope.spawn(async move {
                match BrowserClient::browser().create_guide(parts).await {
                    Ok(()) => {
                        message.set("Guide ajouté avec succès !".into());
                        form.set(GuideForm::default());
                        photo.set(None);
                        go_later(navigator, Route::AdminDashboard).await;
                    }
                    Err(e) => {
                        let (text, relog) = failure(&e, "Erreur lors de l'ajout du guide.");
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

    html! {
        <div class="admin-form">
            <h2>{"Ajouter un Guide Touristique"}</h2>
            { notice(&message, "success") }
            { notice(&error, "error") }
            <form {onsubmit}>
                <input placeholder="Prénom" value={form.prenom.clone()} oninput={text_field(&form, |f, v| f.prenom = v)} />
                <input placeholder="Nom" value={form.nom.clone()} oninput={text_field(&form, |f, v| f.nom = v)} />
                <input placeholder="Numéro" value={form.numero.clone()} oninput={text_field(&form, |f, v| f.numero = v)} />
                <input type="email" placeholder="Email" value={form.email.clone()} oninput={text_field(&form, |f, v| f.email = v)} />
                <input type="password" placeholder="Mot de passe" value={form.password.clone()}
                    oninput={text_field(&form, |f, v| f.password = v)} />
                <input type="password" placeholder="Confirmer le mot de passe" value={form.confirmation.clone()}
                    oninput={text_field(&form, |f, v| f.confirmation = v)} />
                <input placeholder="Spécialité" value={form.specialite.clone()} oninput={text_field(&form, |f, v| f.specialite = v)} />
                <textarea placeholder="Commentaire" value={form.commentaire.clone()} oninput={on_comment} />
                <input type="file" accept="image/*" onchange={on_photo} />
                <button type="submit" disabled={*busy}>{"Ajouter le guide"}</button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(parts: &[(String, Part)]) -> Vec<&str> {
        parts.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn empty_fields_and_confirmation_are_not_sent() {
        let form = GuideForm {
            prenom: "Tiana".into(),
            nom: "Rasoa".into(),
            password: "pw".into(),
            confirmation: "pw".into(),
            ..GuideForm::default()
        };
        let parts = form.parts(None).unwrap();
        assert_eq!(names(&parts), ["prenom", "nom", "password"]);
    }

    #[test]
    fn mismatched_passwords_block_the_upload() {
        let form = GuideForm { password: "a".into(), confirmation: "b".into(), ..GuideForm::default() };
        assert_eq!(form.parts(None).unwrap_err(), forms::PASSWORD_MISMATCH);
    }
}
