//! Création et modification des comptes administrateur.

use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use super::{failure, go_later};
use crate::api::BrowserClient;
use crate::error::ApiError;
use crate::forms::{self, notice};
use crate::models::{AdminPayload, AdminRecord};
use crate::scope::use_view_scope;
use crate::Route;

pub const CHECK_FIELDS: &str = "Veuillez vérifier les informations saisies.";
pub const EMAIL_TAKEN: &str = "Cet email est déjà utilisé.";
const LOAD_FAILED: &str = "Erreur lors du chargement de l'administrateur.";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminForm {
    pub prenom: String,
    pub nom: String,
    pub telephone: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl From<AdminRecord> for AdminForm {
    fn from(a: AdminRecord) -> Self {
        Self {
            prenom: a.prenom.unwrap_or_default(),
            nom: a.nom.unwrap_or_default(),
            telephone: a.telephone.unwrap_or_default(),
            email: a.email.unwrap_or_default(),
            ..Self::default()
        }
    }
}

impl AdminForm {
    pub fn passwords_match(&self) -> bool {
        forms::check_passwords(&self.password, &self.confirmation).is_ok()
    }

    /// Création : mot de passe non vide, confirmé, et email plausible.
    pub fn can_create(&self) -> bool {
        !self.password.is_empty() && self.passwords_match() && forms::is_email(&self.email)
    }

    /// Modification : les quatre champs d'identité sont requis.
    pub fn can_update(&self) -> bool {
        forms::check_required(&[&self.prenom, &self.nom, &self.telephone, &self.email]).is_ok()
            && forms::is_email(&self.email)
    }

    fn payload(&self, password: Option<String>) -> Result<AdminPayload, &'static str> {
        Ok(AdminPayload {
            prenom: self.prenom.trim().to_string(),
            nom: self.nom.trim().to_string(),
            telephone: forms::parse_phone(&self.telephone)?,
            email: self.email.trim().to_string(),
            password,
        })
    }

    pub fn create_payload(&self) -> Result<AdminPayload, &'static str> {
        if !self.can_create() {
            return Err(CHECK_FIELDS);
        }
        self.payload(Some(self.password.clone()))
    }

    pub fn update_payload(&self) -> Result<AdminPayload, &'static str> {
        if !self.can_update() {
            return Err(CHECK_FIELDS);
        }
        self.payload(None)
    }
}

/// Un 400 à la création signifie un email déjà pris.
pub fn create_error_text(err: &ApiError) -> (String, bool) {
    match err.status() {
        Some(400) => (EMAIL_TAKEN.to_string(), false),
        _ => failure(err, "Erreur lors de l'inscription."),
    }
}

fn field(form: &UseStateHandle<AdminForm>, set: fn(&mut AdminForm, String)) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let mut next = (*form).clone();
        set(&mut next, e.target_unchecked_into::<HtmlInputElement>().value());
        form.set(next);
    })
}

fn identity_fields(form: &UseStateHandle<AdminForm>) -> Html {
    let email_ok = form.email.is_empty() || forms::is_email(&form.email);
    html! {
        <>
            <input placeholder="Prénom" value={form.prenom.clone()} oninput={field(form, |f, v| f.prenom = v)} />
            <input placeholder="Nom" value={form.nom.clone()} oninput={field(form, |f, v| f.nom = v)} />
            <input placeholder="Téléphone" value={form.telephone.clone()} oninput={field(form, |f, v| f.telephone = v)} />
            <input type="email" placeholder="Email" value={form.email.clone()} oninput={field(form, |f, v| f.email = v)} />
            if !email_ok {
                <p class="error">{ forms::BAD_EMAIL }</p>
            }
        </>
    }
}

/* -------------------------------------------------------------------------- */
/*                                  création                                  */
/* -------------------------------------------------------------------------- */

#[function_component(CreateAdmin)]
pub fn create_admin() -> Html {
    let navigator = use_navigator();
    let scope = use_view_scope();
    let form = use_state(AdminForm::default);
    let message = use_state(String::new);
    let busy = use_state(|| false);

    let onsubmit = {
        let (form, message, busy) = (form.clone(), message.clone(), busy.clone());
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let payload = match form.create_payload() {
                Ok(p) => p,
                Err(text) => return message.set(text.into()),
            };
            message.set(String::new());
            busy.set(true);

            let (message, busy, navigator) = (message.clone(), busy.clone(), navigator.clone());
            scope.spawn(async move {
                match BrowserClient::browser().create_admin(&payload).await {
                    Ok(()) => {
                        message.set("Inscription réussie ! Redirection...".into());
                        go_later(navigator, Route::AdminDashboard).await;
                    }
                    Err(e) => {
                        let (text, relog) = create_error_text(&e);
                        message.set(text);
                        busy.set(false);
                        if relog {
                            go_later(navigator, Route::AdminLogin).await;
                        }
                    }
                }
            });
        })
    };

    let mismatch = !form.confirmation.is_empty() && !form.passwords_match();

    html! {
        <div class="admin-form">
            <h2>{"Création d'un compte"}</h2>
            <form {onsubmit}>
                { identity_fields(&form) }
                <input type="password" placeholder="Mot de passe" value={form.password.clone()}
                    oninput={field(&form, |f, v| f.password = v)} />
                <input type="password" placeholder="Confirmer le mot de passe" value={form.confirmation.clone()}
                    oninput={field(&form, |f, v| f.confirmation = v)} />
                if mismatch {
                    <p class="error">{ forms::PASSWORD_MISMATCH }</p>
                }
                <button type="submit" disabled={*busy || !form.can_create()}>
                    { if *busy { "Création…" } else { "Créer le compte" } }
                </button>
            </form>
            { notice(&message, "message") }
        </div>
    }
}

/* -------------------------------------------------------------------------- */
/*                                modification                                */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct EditAdminProps {
    pub id: i64,
}

#[function_component(EditAdmin)]
pub fn edit_admin(props: &EditAdminProps) -> Html {
    let navigator = use_navigator();
    let scope = use_view_scope();
    let form = use_state(AdminForm::default);
    let loading = use_state(|| true);
    let message = use_state(String::new);
    let busy = use_state(|| false);

    {
        let (form, loading, message, scope) = (form.clone(), loading.clone(), message.clone(), scope.clone());
        let navigator = navigator.clone();
        use_effect_with(props.id, move |id| {
            let id = *id;
            scope.spawn(async move {
                let relog = match BrowserClient::browser().admin(id).await {
                    Ok(record) => {
                        form.set(record.into());
                        false
                    }
                    Err(e) => {
                        let (text, relog) = failure(&e, LOAD_FAILED);
                        message.set(text);
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

    let onsubmit = {
        let (form, message, busy) = (form.clone(), message.clone(), busy.clone());
        let id = props.id;
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let payload = match form.update_payload() {
                Ok(p) => p,
                Err(text) => return message.set(text.into()),
            };
            message.set(String::new());
            busy.set(true);

            let (message, busy, navigator) = (message.clone(), busy.clone(), navigator.clone());
            scope.spawn(async move {
                match BrowserClient::browser().update_admin(id, &payload).await {
                    Ok(()) => {
                        message.set("Administrateur mis à jour avec succès ! Redirection...".into());
                        go_later(navigator, Route::AdminDashboard).await;
                    }
                    Err(e) => {
                        let (text, relog) = failure(&e, "Erreur lors de la mise à jour.");
                        message.set(text);
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

    html! {
        <div class="admin-form">
            <h2>{"Modifier l'administrateur"}</h2>
            <form {onsubmit}>
                { identity_fields(&form) }
                <button type="submit" disabled={*busy || !form.can_update()}>
                    { if *busy { "Enregistrement…" } else { "Enregistrer" } }
                </button>
            </form>
            { notice(&message, "message") }
        </div>
    }
}
