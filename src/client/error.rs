use std::error::Error as StdError;

use url::Url;

use super::{Auth, HttpResponse};
use crate::domain::ValidationError;
use crate::transport::{DecodeError, decode_api_error};

/// Opaque failure reported by an [`HttpTransport`](super::HttpTransport).
pub type TransportError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`XmsClient`](super::XmsClient).
///
/// Every failure reaches the caller; nothing is retried or replaced by a default value.
pub enum XmsError {
    /// The request never produced a response (DNS, TLS, connect, timeout, bad endpoint URL).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The server answered, but with a status or body this client does not recognize.
    /// `body` holds the response bytes exactly as received.
    #[error("unexpected response with HTTP status {status}")]
    UnexpectedResponse { status: u16, body: Vec<u8> },

    /// XMS rejected the request with a structured `{code, text}` error.
    #[error("API error {code}: {text}")]
    Api { code: String, text: String },

    /// HTTP 401. Carries the credentials that were used.
    #[error("unauthorized for service plan `{service_plan_id}`")]
    Unauthorized {
        service_plan_id: String,
        token: String,
    },

    /// HTTP 404. Carries the requested URL.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// A successful response could not be decoded into the expected type.
    #[error("decoding error: {0}")]
    Decoding(#[source] DecodeError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Map a non-2xx response to an [`XmsError`]; 2xx responses pass through.
pub(crate) fn classify(
    response: HttpResponse,
    url: &Url,
    auth: &Auth,
) -> Result<HttpResponse, XmsError> {
    if (200..=299).contains(&response.status) {
        return Ok(response);
    }

    let err = match response.status {
        400 | 403 => match std::str::from_utf8(&response.body).map(decode_api_error) {
            Ok(Ok(api)) => XmsError::Api {
                code: api.code,
                text: api.text,
            },
            _ => unexpected(response),
        },
        401 => XmsError::Unauthorized {
            service_plan_id: auth.service_plan_id().as_str().to_owned(),
            token: auth.token().as_str().to_owned(),
        },
        404 => XmsError::NotFound {
            url: url.as_str().to_owned(),
        },
        _ => unexpected(response),
    };

    tracing::warn!(url = %url, error = %err, "XMS request failed");
    Err(err)
}

/// Decode a 2xx body. A body that is not JSON at all counts as an unexpected response.
pub(crate) fn decode_body<T>(
    response: HttpResponse,
    decode: impl FnOnce(&str) -> Result<T, DecodeError>,
) -> Result<T, XmsError> {
    let Some(decoded) = std::str::from_utf8(&response.body).ok().map(decode) else {
        return Err(unexpected(response));
    };
    decoded.map_err(|err| {
        if err.is_syntax() {
            unexpected(response)
        } else {
            XmsError::Decoding(err)
        }
    })
}

fn unexpected(response: HttpResponse) -> XmsError {
    XmsError::UnexpectedResponse {
        status: response.status,
        body: response.body,
    }
}
