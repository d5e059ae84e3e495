//! Contrôles de saisie côté client et liaisons champ → état.

use web_sys::{File, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::MAX_IMAGE_BYTES;

pub const REQUIRED: &str = "Tous les champs sont requis.";
pub const PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas.";
pub const BAD_EMAIL: &str = "L'email doit contenir un @.";
pub const BAD_PHONE: &str = "Le numéro de téléphone ne doit contenir que des chiffres.";
pub const IMAGE_TOO_BIG: &str = "L'image est trop volumineuse (max 2 Mo).";

/* -------------------------------- contrôles ------------------------------- */

pub fn is_email(raw: &str) -> bool {
    raw.contains('@')
}

pub fn check_email(raw: &str) -> Result<(), &'static str> {
    if is_email(raw) { Ok(()) } else { Err(BAD_EMAIL) }
}

pub fn check_required(fields: &[&str]) -> Result<(), &'static str> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        Err(REQUIRED)
    } else {
        Ok(())
    }
}

pub fn check_passwords(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password == confirmation { Ok(()) } else { Err(PASSWORD_MISMATCH) }
}

/// Téléphone saisi librement (espaces tolérés), envoyé en entier.
pub fn parse_phone(raw: &str) -> Result<i64, &'static str> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(BAD_PHONE);
    }
    digits.parse().map_err(|_| BAD_PHONE)
}

pub fn check_image_size(bytes: f64) -> Result<(), &'static str> {
    if bytes > MAX_IMAGE_BYTES { Err(IMAGE_TOO_BIG) } else { Ok(()) }
}

/* -------------------------------- liaisons -------------------------------- */

pub fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_textarea(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let area: HtmlTextAreaElement = e.target_unchecked_into();
        state.set(area.value());
    })
}

pub fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        state.set(select.value());
    })
}

/// Premier fichier d'un `<input type="file">`.
pub fn picked_file(e: &Event) -> Option<File> {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.files().and_then(|files| files.get(0))
}

/// Ligne de message sous un formulaire ; rien si vide.
pub fn notice(text: &str, class: &'static str) -> Html {
    if text.is_empty() {
        Html::default()
    } else {
        html!(<p class={class}>{ text }</p>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_only_needs_an_at_sign() {
        assert_eq!(check_email("lova@mail.mg"), Ok(()));
        assert_eq!(check_email("lova.mail.mg"), Err(BAD_EMAIL));
    }

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(check_required(&["Rabe", "Lova"]), Ok(()));
        assert_eq!(check_required(&["Rabe", "  "]), Err(REQUIRED));
    }

    #[test]
    fn phone_keeps_digits_only() {
        assert_eq!(parse_phone("034 12 345 67"), Ok(341234567));
        assert_eq!(parse_phone("+261"), Err(BAD_PHONE));
        assert_eq!(parse_phone(""), Err(BAD_PHONE));
    }

    #[test]
    fn image_limit_is_two_mebibytes() {
        assert!(check_image_size(2.0 * 1024.0 * 1024.0).is_ok());
        assert_eq!(check_image_size(2.0 * 1024.0 * 1024.0 + 1.0), Err(IMAGE_TOO_BIG));
    }

    #[test]
    fn passwords_must_match() {
        assert!(check_passwords("abc", "abc").is_ok());
        assert_eq!(check_passwords("abc", "abd"), Err(PASSWORD_MISMATCH));
    }
}
