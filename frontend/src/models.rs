//! Formes échangées avec l'API et leur normalisation en types canoniques.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::jwt;
use crate::storage::{DisplayName, Namespace, StoredSession};

/* --------- champs texte que le backend envoie parfois en nombre ---------- */
fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Image transportée en base64, utilisable telle quelle dans un `src`.
pub fn data_uri(base64: Option<&str>) -> Option<String> {
    base64
        .filter(|b| !b.is_empty())
        .map(|b| format!("data:image/jpeg;base64,{b}"))
}

/* -------------------------------------------------------------------------- */
/*                             visites & guides                               */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id_visite: i64,
    #[serde(default)]
    pub pays: String,
    #[serde(default)]
    pub ville: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Visit {
    pub fn image_src(&self) -> Option<String> {
        data_uri(self.image.as_deref())
    }

    pub fn title(&self) -> String {
        format!("{}, {}", self.ville, self.pays)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Guide {
    pub id_guide: i64,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub specialite: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Guide {
    pub fn photo_src(&self) -> Option<String> {
        data_uri(self.photo.as_deref())
    }

    pub fn speciality_label(&self) -> String {
        format!("Spécialité: {}", self.specialite.as_deref().unwrap_or("Non spécifiée"))
    }
}

/* -------------------------------------------------------------------------- */
/*                                 profils                                    */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TouristRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub nom: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub prenom: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub adresse: Option<String>,
}

/// `GET /touriste/profile` → `{ "touriste": { … } }`
#[derive(Clone, Debug, Deserialize)]
pub struct TouristEnvelope {
    pub touriste: TouristRecord,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AdminRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub prenom: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nom: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telephone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
}

/// Profil unique, quel que soit l'espace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub adresse: Option<String>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.prenom.as_deref(), self.nom.as_deref()].into_iter().flatten().collect();
        if parts.is_empty() {
            "Utilisateur".to_string()
        } else {
            parts.join(" ")
        }
    }

    pub fn avatar_url(&self, size: u32) -> String {
        format!(
            "https://ui-avatars.com/api/?name={}&background=random&size={size}",
            self.full_name().replace(' ', "+")
        )
    }
}

/// Valeur affichée d'un champ de profil.
pub fn or_undefined(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("Non défini")
}

impl From<TouristRecord> for Profile {
    fn from(t: TouristRecord) -> Self {
        Profile { nom: t.nom, prenom: t.prenom, email: t.email, contact: t.numero, adresse: t.adresse }
    }
}

impl From<AdminRecord> for Profile {
    fn from(a: AdminRecord) -> Self {
        Profile { nom: a.nom, prenom: a.prenom, email: a.email, contact: a.telephone, adresse: None }
    }
}

/* -------------------------------------------------------------------------- */
/*                                  login                                     */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    fn as_i64(&self) -> Option<i64> {
        match self {
            IdValue::Number(n) => Some(*n),
            IdValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct LoginUser {
    id_touriste: Option<IdValue>,
    id_admin: Option<IdValue>,
    nom: Option<String>,
    prenom: Option<String>,
}

/// Réponse brute de `POST /touriste/login` ou `POST /admin/login`.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    token: Option<String>,
    user: Option<LoginUser>,
    user_id: Option<IdValue>,
    id_touriste: Option<IdValue>,
    id_admin: Option<IdValue>,
}

impl LoginResponse {
    /// Formes acceptées pour l'identifiant, dans l'ordre :
    /// `user.id_<espace>`, `user_id`, `id_<espace>`.
    pub fn into_session(self, ns: Namespace) -> Result<StoredSession, ApiError> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Contract("token manquant".into()))?;

        let user = self.user.unwrap_or_default();
        let (nested, top) = match ns {
            Namespace::Tourist => (user.id_touriste, self.id_touriste),
            Namespace::Admin => (user.id_admin, self.id_admin),
        };
        let subject_id = nested
            .or(self.user_id)
            .or(top)
            .and_then(|id| id.as_i64())
            .ok_or_else(|| ApiError::Contract("ID utilisateur manquant".into()))?;

        let display = match ns {
            Namespace::Tourist => None,
            Namespace::Admin => {
                let claims = jwt::decode_claims(&token).unwrap_or_default();
                Some(DisplayName {
                    nom: claims.nom.or(user.nom).unwrap_or_default(),
                    prenom: claims.prenom.or(user.prenom).unwrap_or_default(),
                })
            }
        };

        Ok(StoredSession { token, subject_id, display })
    }
}

/* -------------------------------------------------------------------------- */
/*                               réservations                                 */
/* -------------------------------------------------------------------------- */

/// Corps de `POST /reservation`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReservationPayload {
    pub date_activite: String,
    pub duree: u32,
    pub id_visite: i64,
    pub id_touriste: i64,
    pub id_guide: Option<i64>,
}

/// Ligne de `GET /reservation` (console admin).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReservationRow {
    pub id_activite_touristique: i64,
    #[serde(default)]
    pub date_activite: String,
    #[serde(default)]
    pub duree: i64,
    #[serde(default)]
    pub touriste_prenom: String,
    #[serde(default)]
    pub touriste_nom: String,
    #[serde(default)]
    pub visite_pays: String,
    #[serde(default)]
    pub visite_ville: String,
    #[serde(default)]
    pub visite_type: String,
    #[serde(default)]
    pub guide_prenom: Option<String>,
    #[serde(default)]
    pub guide_nom: Option<String>,
}

impl ReservationRow {
    pub fn tourist_name(&self) -> String {
        format!("{} {}", self.touriste_prenom, self.touriste_nom)
    }

    pub fn guide_label(&self) -> String {
        match (&self.guide_prenom, &self.guide_nom) {
            (Some(p), Some(n)) if !p.is_empty() && !n.is_empty() => format!("{p} {n}"),
            _ => "Non assigné".to_string(),
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                                   admin                                    */
/* -------------------------------------------------------------------------- */

/// Corps de `POST /admin` et `PUT /admin/:id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdminPayload {
    pub prenom: String,
    pub nom: String,
    pub telephone: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    use super::*;

    fn login(body: &str) -> LoginResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn tourist_id_nested_under_user() {
        let s = login(r#"{"token":"t1","user":{"id_touriste":7}}"#).into_session(Namespace::Tourist).unwrap();
        assert_eq!(s.token, "t1");
        assert_eq!(s.subject_id, 7);
        assert_eq!(s.display, None);
    }

    #[test]
    fn flat_id_shapes_are_accepted() {
        let a = login(r#"{"token":"t","user_id":"12"}"#).into_session(Namespace::Tourist).unwrap();
        let b = login(r#"{"token":"t","id_admin":4}"#).into_session(Namespace::Admin).unwrap();
        assert_eq!(a.subject_id, 12);
        assert_eq!(b.subject_id, 4);
    }

    #[test]
    fn other_namespace_id_does_not_count() {
        let err = login(r#"{"token":"t","user":{"id_admin":4}}"#).into_session(Namespace::Tourist).unwrap_err();
        assert_eq!(err, ApiError::Contract("ID utilisateur manquant".into()));
    }

    #[test]
    fn missing_token_is_reported_first() {
        let err = login(r#"{"user":{"id_touriste":7}}"#).into_session(Namespace::Tourist).unwrap_err();
        assert_eq!(err.to_string(), "Réponse de l'API invalide : token manquant");
    }

    #[test]
    fn admin_names_come_from_token_then_user() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"nom":"Rakoto"}"#);
        let body = format!(r#"{{"token":"h.{payload}.s","user":{{"id_admin":2,"nom":"Ignoré","prenom":"Hery"}}}}"#);
        let s = login(&body).into_session(Namespace::Admin).unwrap();
        assert_eq!(s.display, Some(DisplayName { nom: "Rakoto".into(), prenom: "Hery".into() }));
    }

    #[test]
    fn numeric_contact_fields_become_text() {
        let env: TouristEnvelope =
            serde_json::from_str(r#"{"touriste":{"nom":"Rabe","prenom":"Lova","numero":341234567,"adresse":""}}"#)
                .unwrap();
        let profile = Profile::from(env.touriste);
        assert_eq!(profile.contact.as_deref(), Some("341234567"));
        assert_eq!(or_undefined(&profile.adresse), "Non défini");
        assert_eq!(profile.full_name(), "Lova Rabe");
    }

    #[test]
    fn visit_image_becomes_data_uri() {
        let v: Visit = serde_json::from_str(
            r#"{"id_visite":1,"pays":"Madagascar","ville":"Nosy Be","type":"plage","description":"","image":"iVBOR"}"#,
        )
        .unwrap();
        assert_eq!(v.image_src().as_deref(), Some("data:image/jpeg;base64,iVBOR"));
        assert_eq!(v.kind, "plage");
        assert_eq!(v.title(), "Nosy Be, Madagascar");

        let bare: Visit = serde_json::from_str(r#"{"id_visite":2,"image":null}"#).unwrap();
        assert_eq!(bare.image_src(), None);
    }

    #[test]
    fn reservation_payload_shape() {
        let p = ReservationPayload {
            date_activite: "2026-12-01".into(),
            duree: 3,
            id_visite: 5,
            id_touriste: 7,
            id_guide: None,
        };
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            serde_json::json!({"date_activite":"2026-12-01","duree":3,"id_visite":5,"id_touriste":7,"id_guide":null})
        );
    }

    #[test]
    fn guide_label_needs_both_names() {
        let row: ReservationRow = serde_json::from_str(
            r#"{"id_activite_touristique":1,"guide_prenom":"Tiana","guide_nom":null}"#,
        )
        .unwrap();
        assert_eq!(row.guide_label(), "Non assigné");
    }
}
