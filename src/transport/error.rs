use serde::Deserialize;

/// Failure to turn a response body into a typed result.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no `type` discriminator")]
    MissingType,

    #[error("response has unknown `type` discriminator: {0}")]
    UnknownType(String),

    #[error("invalid base64 in `{field}`: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid hex in `{field}`: {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("invalid timestamp in `{field}`: {value}")]
    Timestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("response has no `{key}` array")]
    MissingItems { key: &'static str },
}

impl DecodeError {
    /// `true` when the body is not JSON at all, as opposed to JSON of the wrong shape.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Json(err) if err.is_syntax() || err.is_eof())
    }
}

/// Structured error body returned with 400 and 403 responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub text: String,
}

pub fn decode_api_error(json: &str) -> Result<ApiErrorBody, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_api_error_reads_code_and_text() {
        let body = decode_api_error(r#"{"code":"yes_this_is_code","text":"the text"}"#).unwrap();
        assert_eq!(body.code, "yes_this_is_code");
        assert_eq!(body.text, "the text");
    }

    #[test]
    fn decode_api_error_requires_both_fields() {
        let err = decode_api_error(r#"{"code":"x"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(!err.is_syntax());
    }

    #[test]
    fn syntax_errors_are_distinguished_from_shape_errors() {
        let err = decode_api_error("<html>").unwrap_err();
        assert!(err.is_syntax());

        let err = decode_api_error("").unwrap_err();
        assert!(err.is_syntax());

        let err = decode_api_error("[]").unwrap_err();
        assert!(!err.is_syntax());
    }
}
