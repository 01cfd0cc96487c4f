use crate::{KvsEngine, KvsError, Value};
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use log::{debug, info, warn};
use percent_encoding::percent_decode_str;
use std::future::Future;
use std::io;
use thiserror::Error;
use tokio::net::TcpListener;

pub const INTERNAL_ERROR_MESSAGE: &str = "500 Internal storage error.\n";
pub const BAD_REQUEST_MESSAGE: &str = "400 Malformed form data.\n";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str =
    "Sorry, only GET, POST and DELETE methods are allowed";

const VALUE_FIELD: &str = "value";

pub fn not_found_message(key: &str) -> String {
    format!("404 There is no record in the storage for key '{key}'.\n")
}

/// Failures of a single request, each mapped to a fixed response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] KvsError),
    #[error("malformed form data: {0}")]
    MalformedForm(String),
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> ApiError {
        ApiError::MalformedForm(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Storage(e) => {
                warn!("Storage error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
            ApiError::MalformedForm(msg) => {
                info!("Rejected form: {msg}");
                (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE).into_response()
            }
        }
    }
}

/// HTTP front end mapping GET, POST and DELETE on `/<key>` to an engine.
pub struct KvServer<E: KvsEngine> {
    engine: E,
}

impl<E: KvsEngine> KvServer<E> {
    pub fn new(engine: E) -> KvServer<E> {
        KvServer { engine }
    }

    /// Every path is served; `/` maps to the empty key.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(process::<E>)
            .with_state(self.engine.clone())
    }

    pub async fn start(
        &self,
        addr: &str,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Listen at {}", listener.local_addr()?);
        self.serve(listener, shutdown).await
    }

    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> io::Result<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn process<E: KvsEngine>(
    State(engine): State<E>,
    method: Method,
    uri: Uri,
    request: Request,
) -> Result<Response, ApiError> {
    let key = key_from_path(uri.path());
    debug!("{method} /{key}");

    match method.as_str() {
        "GET" => match engine.get(key.clone())? {
            Some(value) => Ok(format!("{key} is a {value}\n").into_response()),
            None => {
                info!("No such key in storage: {key}");
                Ok((StatusCode::NOT_FOUND, not_found_message(&key)).into_response())
            }
        },
        "POST" => {
            let value = form_value(&uri, request).await?;
            engine.set(key.clone(), Value::Text(value.clone()))?;
            Ok(format!("{key} is set to {value}\n").into_response())
        }
        "DELETE" => {
            engine.remove(key.clone())?;
            Ok(format!("{key} is deleted\n").into_response())
        }
        _ => Ok((StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE).into_response()),
    }
}

/// The path without its leading `/`, percent-decoded. Invalid UTF-8 is
/// replaced rather than rejected.
fn key_from_path(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// First `value` field of an urlencoded or multipart body, then of the query
/// string. Only a missing field yields the empty string.
async fn form_value(uri: &Uri, request: Request) -> Result<String, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase());

    let from_body = match content_type.as_deref() {
        Some("application/x-www-form-urlencoded") => {
            let body = Bytes::from_request(request, &())
                .await
                .map_err(|e| ApiError::MalformedForm(e.to_string()))?;
            first_value(&body)
        }
        Some("multipart/form-data") => {
            let mut multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| ApiError::MalformedForm(e.to_string()))?;
            multipart_value(&mut multipart).await?
        }
        _ => None,
    };

    Ok(from_body
        .or_else(|| uri.query().and_then(|q| first_value(q.as_bytes())))
        .unwrap_or_default())
}

fn first_value(input: &[u8]) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(name, _)| *name == VALUE_FIELD)
        .map(|(_, value)| value.into_owned())
}

async fn multipart_value(multipart: &mut Multipart) -> Result<Option<String>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        // file uploads are not form values
        if field.name() == Some(VALUE_FIELD) && field.file_name().is_none() {
            return Ok(Some(field.text().await?));
        }
    }
    Ok(None)
}
