//! Gestionnaire `GET`/`PUT /schedule?workspace=<name>` indépendant du transport.
//!
//! Le serveur HTTP qui l'héberge se contente de traduire sa requête en
//! [`Request`] et de renvoyer la [`Response`] telle quelle.

use crate::storage::{validate_workspace, Storage};
use serde_json::{json, Value};
use tracing::{info, warn};

/// En-tête portant le jeton d'écriture partagé.
pub const TOKEN_HEADER: &str = "x-schedule-token";
pub const DEFAULT_WORKSPACE: &str = "default";

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,PUT,OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type,x-schedule-token"),
];

#[derive(Debug, Clone, Default)]
pub struct EndpointConfig {
    /// Jeton exigé pour les écritures ; `None` (ou vide) : écritures libres.
    pub write_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    pub workspace: Option<String>,
    pub token: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Option<Value>,
}

impl Response {
    fn new(status: u16, body: Option<Value>) -> Self {
        Self {
            status,
            headers: CORS_HEADERS.to_vec(),
            body,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, Some(json!({ "error": message.into() })))
    }
}

pub fn handle<S: Storage + ?Sized>(storage: &S, config: &EndpointConfig, req: &Request) -> Response {
    let workspace = req
        .workspace
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .unwrap_or(DEFAULT_WORKSPACE);

    match req.method.to_ascii_uppercase().as_str() {
        "OPTIONS" => Response::new(204, None),
        "GET" => {
            if let Err(err) = validate_workspace(workspace) {
                return Response::error(400, err.to_string());
            }
            match storage.load(workspace) {
                Ok(blob) => Response::new(200, Some(blob.unwrap_or_else(|| json!({})))),
                Err(err) => {
                    warn!(workspace, error = %err, "schedule load failed");
                    Response::error(500, err.to_string())
                }
            }
        }
        "PUT" => put(storage, config, workspace, req),
        other => Response::error(405, format!("method not allowed: {other}")),
    }
}

fn put<S: Storage + ?Sized>(
    storage: &S,
    config: &EndpointConfig,
    workspace: &str,
    req: &Request,
) -> Response {
    if let Some(expected) = config.write_token.as_deref().filter(|t| !t.is_empty()) {
        if req.token.as_deref() != Some(expected) {
            warn!(workspace, "schedule write rejected: bad token");
            return Response::error(401, "unauthorized");
        }
    }

    let Some(body) = req.body.as_deref().filter(|b| !b.trim().is_empty()) else {
        return Response::error(400, "missing body");
    };
    let blob: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(err) => return Response::error(400, format!("invalid JSON body: {err}")),
    };
    if let Err(err) = validate_workspace(workspace) {
        return Response::error(400, err.to_string());
    }

    match storage.save(workspace, &blob) {
        Ok(()) => {
            info!(workspace, "schedule stored");
            Response::new(200, Some(json!({ "ok": true })))
        }
        Err(err) => {
            warn!(workspace, error = %err, "schedule store failed");
            Response::error(500, err.to_string())
        }
    }
}
