//! Un appel par point d'entrée REST consommé par l'interface.

use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiClient, ApiRequest, Part, Transport};
use crate::catalog::Category;
use crate::error::ApiError;
use crate::models::{
    AdminPayload, AdminRecord, Credentials, Guide, LoginResponse, Profile, ReservationPayload, ReservationRow,
    TouristEnvelope, Visit,
};
use crate::storage::{KeyValueStore, Namespace, StoredSession};

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    /* ------------------------------ sessions ------------------------------ */

    /// Échange identifiants → session normalisée. N'écrit rien dans le stockage.
    pub async fn login(&self, ns: Namespace, credentials: &Credentials) -> Result<StoredSession, ApiError> {
        let path = match ns {
            Namespace::Tourist => "/touriste/login",
            Namespace::Admin => "/admin/login",
        };
        let response: LoginResponse = self
            .public(ApiRequest::post(path).json(credentials)?)
            .await
            .map_err(|e| match e {
                ApiError::Rejected { status, message: None } => ApiError::Rejected {
                    status,
                    message: Some(format!("Erreur de connexion (code {status})")),
                },
                other => other,
            })?;
        response.into_session(ns)
    }

    pub async fn tourist_profile(&self) -> Result<Profile, ApiError> {
        let envelope: TouristEnvelope = self.authed(Namespace::Tourist, ApiRequest::get("/touriste/profile")).await?;
        Ok(envelope.touriste.into())
    }

    /* ------------------------------- admins ------------------------------- */

    pub async fn admin(&self, id: i64) -> Result<AdminRecord, ApiError> {
        self.authed(Namespace::Admin, ApiRequest::get(format!("/admin/{id}"))).await
    }

    pub async fn create_admin(&self, payload: &AdminPayload) -> Result<(), ApiError> {
        let _: Value = self.authed(Namespace::Admin, ApiRequest::post("/admin").json(payload)?).await?;
        Ok(())
    }

    pub async fn update_admin(&self, id: i64, payload: &AdminPayload) -> Result<(), ApiError> {
        let _: Value = self
            .authed(Namespace::Admin, ApiRequest::put(format!("/admin/{id}")).json(payload)?)
            .await?;
        Ok(())
    }

    /* ------------------------------- visites ------------------------------ */

    pub async fn visits_by_category(&self, category: Category) -> Result<Vec<Visit>, ApiError> {
        self.maybe_authed(Namespace::Tourist, ApiRequest::get(format!("/visites/{}", category.slug())))
            .await
    }

    pub async fn visit(&self, id: i64) -> Result<Visit, ApiError> {
        self.maybe_authed(Namespace::Admin, ApiRequest::get(format!("/visites/{id}"))).await
    }

    /// Renvoie le message de confirmation du backend s'il y en a un.
    pub async fn update_visit(&self, id: i64, parts: Vec<(String, Part)>) -> Result<Option<String>, ApiError> {
        let body: Option<MessageBody> = self
            .authed(Namespace::Admin, ApiRequest::put(format!("/visites/{id}")).multipart(parts))
            .await?;
        Ok(body.and_then(|b| b.message))
    }

    /* ------------------------------- guides ------------------------------- */

    pub async fn guides(&self) -> Result<Vec<Guide>, ApiError> {
        self.public(ApiRequest::get("/guides")).await
    }

    pub async fn create_guide(&self, parts: Vec<(String, Part)>) -> Result<(), ApiError> {
        let _: Value = self.authed(Namespace::Admin, ApiRequest::post("/guides").multipart(parts)).await?;
        Ok(())
    }

    /* ---------------------------- réservations ---------------------------- */

    pub async fn create_reservation(&self, payload: &ReservationPayload) -> Result<(), ApiError> {
        let _: Value = self
            .authed(Namespace::Tourist, ApiRequest::post("/reservation").json(payload)?)
            .await?;
        Ok(())
    }

    pub async fn reservations(&self) -> Result<Vec<ReservationRow>, ApiError> {
        self.authed(Namespace::Admin, ApiRequest::get("/reservation")).await
    }

    pub async fn delete_reservation(&self, id: i64) -> Result<(), ApiError> {
        let _: Value = self
            .authed(Namespace::Admin, ApiRequest::delete(format!("/reservation/{id}")))
            .await?;
        Ok(())
    }
}
