// Canonical response envelope used by MAST services.
//
// A canonical body looks like
// `{"api_version": "1.0", "value": ..., "errors": [...], "exception": {...}}`
// with at most one of `exception`, `errors` or `value` meaningful, in that
// order of severity. An empty `errors` list is not a failure. Anything
// without `api_version == "1.0"` is a plain JSON body and is passed through
// untouched; a body claiming version 1.0 that does not decode is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

pub const CANONICAL_API_VERSION: &str = "1.0";

/// A remote exception serialized by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteException {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub traceback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResponse {
    pub api_version: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub exception: Option<RemoteException>,
}

impl CanonicalResponse {
    /// Interpret `body` as a canonical response.
    ///
    /// `Ok(None)` for plain bodies. A body tagged `"api_version": "1.0"`
    /// whose fields have the wrong shape is a `Deserialization` error.
    pub fn detect(body: &Value) -> Result<Option<Self>, Error> {
        let version = body.get("api_version").and_then(Value::as_str);
        if version != Some(CANONICAL_API_VERSION) {
            return Ok(None);
        }
        serde_json::from_value(body.clone())
            .map(Some)
            .map_err(|e| Error::Deserialization {
                message: format!("malformed canonical response: {e}"),
                body: body.to_string(),
            })
    }

    pub fn is_error(&self) -> bool {
        self.exception.is_some() || self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Strip the envelope: the `value` on success, the remote messages otherwise.
    ///
    /// An empty `errors` list with no `value` yields `Value::Null`. An envelope
    /// carrying none of `exception`, `errors` or `value` is rejected.
    pub fn into_result(self) -> Result<Value, Error> {
        if let Some(exc) = self.exception {
            let mut messages = vec![
                format!("Remote Exception     type: {}", exc.kind),
                format!("Remote Exception  message: {}", exc.message),
            ];
            messages.extend(
                exc.args
                    .iter()
                    .map(|arg| format!("Remote Exception      arg: {arg}")),
            );
            if let Some(tb) = exc.traceback {
                messages.extend(
                    tb.lines()
                        .filter(|l| !l.is_empty())
                        .map(|l| format!("Remote Exception traceback: {l}")),
                );
            }
            return Err(Error::Remote { messages });
        }

        match (self.errors, self.value) {
            (Some(errors), _) if !errors.is_empty() => Err(Error::Remote { messages: errors }),
            (_, Some(value)) => Ok(value),
            (Some(_), None) => Ok(Value::Null),
            (None, None) => Err(Error::Deserialization {
                message: "canonical response has none of 'exception', 'errors' or 'value'"
                    .into(),
                body: serde_json::json!({ "api_version": self.api_version }).to_string(),
            }),
        }
    }
}
