use std::{env, fs::File, io::BufReader, path::{Path, PathBuf}};

use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{bail, Context, Result};
use log::info;
use rustls::{pki_types::CertificateDer, ServerConfig};
use rustls_pemfile::{certs, private_key};

const DEFAULT_BIND: &str = "0.0.0.0:8444";

/* ---------- configuration (env, `.env` accepté) ------------------------- */

#[derive(Debug, Clone, PartialEq)]
struct TlsFiles {
    cert: PathBuf,
    key: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
struct Settings {
    bind: String,
    dist: PathBuf,
    tls: Option<TlsFiles>,
}

impl Settings {
    fn from_env() -> Result<Self> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // dossier généré par `trunk build`
        let dist = read("STATIC_DIST")
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../frontend/dist"));

        let tls = match (read("TLS_CERT"), read("TLS_KEY")) {
            (Some(cert), Some(key)) => Some(TlsFiles { cert: cert.into(), key: key.into() }),
            (None, None) => None,
            _ => bail!("TLS_CERT et TLS_KEY doivent être définis ensemble"),
        };

        Ok(Self { bind: read("STATIC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()), dist, tls })
    }
}

/* ---------- TLS --------------------------------------------------------- */

fn build_tls_config(files: &TlsFiles) -> Result<ServerConfig> {
    let mut r = BufReader::new(
        File::open(&files.cert).with_context(|| format!("ouverture du certificat {}", files.cert.display()))?,
    );
    let chain: Vec<CertificateDer<'static>> = certs(&mut r).collect::<Result<_, _>>().context("lecture du certificat")?;

    let mut r = BufReader::new(
        File::open(&files.key).with_context(|| format!("ouverture de la clé {}", files.key.display()))?,
    );
    let key = private_key(&mut r)
        .context("lecture de la clé privée")?
        .with_context(|| format!("aucune clé privée dans {}", files.key.display()))?;

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .context("configuration TLS")
}

/* ---------- Fallback SPA (index.html) ----------------------------------- */

async fn spa_fallback(req: HttpRequest, dist: web::Data<PathBuf>) -> actix_web::Result<HttpResponse> {
    Ok(NamedFile::open(dist.join("index.html"))?.into_response(&req))
}

/* ---------- main -------------------------------------------------------- */

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;
    if !settings.dist.join("index.html").is_file() {
        log::warn!("{} ne contient pas d'index.html (lancer `trunk build`)", settings.dist.display());
    }
    info!("fichiers servis depuis {}", settings.dist.display());

    let dist = settings.dist.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(dist.clone()))
            .service(Files::new("/", &dist).index_file("index.html"))
            .default_service(web::to(spa_fallback))
    });

    let server = match &settings.tls {
        Some(files) => {
            info!("écoute HTTPS sur {}", settings.bind);
            server.bind_rustls_0_23(&settings.bind, build_tls_config(files)?)
        }
        None => {
            info!("écoute HTTP sur {}", settings.bind);
            server.bind(&settings.bind)
        }
    }
    .with_context(|| format!("impossible d'écouter sur {}", settings.bind))?;

    server.run().await.context("arrêt du serveur")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_are_plain_http_on_8444() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind, DEFAULT_BIND);
        assert!(s.dist.ends_with("frontend/dist"));
        assert_eq!(s.tls, None);
    }

    #[test]
    fn both_tls_paths_enable_https() {
        let s = settings(&[("TLS_CERT", "certs/dev-cert.pem"), ("TLS_KEY", "certs/dev-key.pem"), ("STATIC_BIND", "127.0.0.1:9000")])
            .unwrap();
        assert_eq!(s.bind, "127.0.0.1:9000");
        assert_eq!(s.tls.unwrap().key, PathBuf::from("certs/dev-key.pem"));
    }

    #[test]
    fn half_tls_configuration_is_refused() {
        assert!(settings(&[("TLS_CERT", "certs/dev-cert.pem")]).is_err());
        assert!(settings(&[("TLS_CERT", "a.pem"), ("TLS_KEY", "  ")]).is_err());
    }

    #[test]
    fn missing_certificate_is_an_error_not_a_panic() {
        let files = TlsFiles { cert: "/nonexistent/cert.pem".into(), key: "/nonexistent/key.pem".into() };
        let err = build_tls_config(&files).unwrap_err();
        assert!(err.to_string().contains("ouverture du certificat"));
    }
}
