use std::future::Future;

use gloo_net::http::{Method, RequestBuilder};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use web_sys::{File, FormData};

use crate::config;
use crate::error::ApiError;
use crate::storage::{BrowserStorage, KeyValueStore, Namespace, TokenStore};

/* -------------------------------------------------------------------------- */
/*                                requêtes                                    */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug)]
pub enum Part {
    Text(String),
    File(File),
}

#[derive(Clone, Debug)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<(String, Part)>),
}

#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Body,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), bearer: None, body: Body::Empty }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<(String, Part)>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }

    fn bearer(mut self, token: String) -> Self {
        self.bearer = Some(token);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/* -------------------------------------------------------------------------- */
/*                                transport                                   */
/* -------------------------------------------------------------------------- */

/// Envoi brut d'une requête. `Err` = échec réseau, jamais un statut HTTP.
pub trait Transport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<RawResponse, String>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlooTransport {
    base: String,
}

impl GlooTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

fn to_form_data(parts: &[(String, Part)]) -> Result<FormData, String> {
    let form = FormData::new().map_err(|e| format!("{e:?}"))?;
    for (name, part) in parts {
        match part {
            Part::Text(value) => form.append_with_str(name, value),
            Part::File(file) => form.append_with_blob_and_filename(name, file, &file.name()),
        }
        .map_err(|e| format!("{e:?}"))?;
    }
    Ok(form)
}

impl Transport for GlooTransport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<RawResponse, String>> {
        let url = format!("{}{}", self.base, request.path);

        async move {
            let mut builder = RequestBuilder::new(&url).method(request.method);
            if let Some(token) = &request.bearer {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }

            // multipart : le navigateur pose lui-même le Content-Type et la frontière
            let prepared = match request.body {
                Body::Empty => builder.build(),
                Body::Json(value) => builder.json(&value),
                Body::Multipart(parts) => builder.body(to_form_data(&parts)?),
            }
            .map_err(|e| e.to_string())?;

            let response = prepared.send().await.map_err(|e| e.to_string())?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(RawResponse { status, body })
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                                 client                                     */
/* -------------------------------------------------------------------------- */

/// Extrait le message d'erreur d'un corps JSON du backend.
fn rejection(raw: &RawResponse) -> ApiError {
    let json: Value = serde_json::from_str(&raw.body).unwrap_or(Value::Null);

    let validation = json.get("errors").and_then(Value::as_object).map(|errors| {
        let flat: Vec<String> = errors
            .values()
            .flat_map(|v| match v {
                Value::Array(items) => items.iter().map(value_text).collect(),
                other => vec![value_text(other)],
            })
            .collect();
        format!("Erreur de validation : {}", flat.join(", "))
    });

    let message = validation.or_else(|| {
        ["error", "message"]
            .iter()
            .find_map(|k| json.get(*k).and_then(Value::as_str).map(str::to_string))
    });

    ApiError::Rejected { status: raw.status, message }
}

fn value_text(v: &Value) -> String {
    v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())
}

fn decode<R: DeserializeOwned>(raw: RawResponse) -> Result<R, ApiError> {
    // 204 / corps vide : accepté pour `()` et les `Option`
    let body = if raw.body.trim().is_empty() { "null" } else { raw.body.as_str() };
    serde_json::from_str(body).map_err(|e| ApiError::Contract(e.to_string()))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient<T, S> {
    transport: T,
    tokens: TokenStore<S>,
}

pub type BrowserClient = ApiClient<GlooTransport, BrowserStorage>;

impl BrowserClient {
    pub fn browser() -> Self {
        ApiClient::new(GlooTransport::new(config::api_url()), TokenStore::browser())
    }
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(transport: T, tokens: TokenStore<S>) -> Self {
        Self { transport, tokens }
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    async fn exchange(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let target = format!("{} {}", request.method, request.path);
        debug!("→ {target}");

        let raw = self.transport.send(request).await.map_err(|e| {
            warn!("{target} : échec réseau : {e}");
            ApiError::Network(e)
        })?;

        debug!("← {target} : {}", raw.status);
        if raw.is_success() {
            Ok(raw)
        } else {
            Err(rejection(&raw))
        }
    }

    /// Un 401 sur une requête porteuse du jeton purge l'espace.
    async fn exchange_as(&self, ns: Namespace, request: ApiRequest) -> Result<RawResponse, ApiError> {
        match self.exchange(request).await {
            Err(ApiError::Rejected { status: 401, .. }) => {
                warn!("espace {ns} : 401, jeton purgé");
                self.tokens.clear(ns);
                Err(ApiError::Expired)
            }
            other => other,
        }
    }

    pub async fn public<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        decode(self.exchange(request).await?)
    }

    /// Sans jeton : `Unauthenticated`, et rien ne part sur le réseau.
    pub async fn authed<R: DeserializeOwned>(&self, ns: Namespace, request: ApiRequest) -> Result<R, ApiError> {
        let token = self.tokens.token(ns).ok_or(ApiError::Unauthenticated)?;
        decode(self.exchange_as(ns, request.bearer(token)).await?)
    }

    /// Joint le jeton s'il existe ; la requête part dans tous les cas.
    pub async fn maybe_authed<R: DeserializeOwned>(&self, ns: Namespace, request: ApiRequest) -> Result<R, ApiError> {
        match self.tokens.token(ns) {
            Some(token) => decode(self.exchange_as(ns, request.bearer(token)).await?),
            None => self.public(request).await,
        }
    }
}
