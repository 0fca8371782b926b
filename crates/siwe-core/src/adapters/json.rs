//! # JSON Facade
//!
//! Dynamic-input adapter over [`SiweApi`] for callers holding untyped JSON
//! (HTTP handlers, scripting bridges). Typed inputs cannot carry unknown keys;
//! this is where the key allow-lists are enforced.
//!
//! ## Allow-lists
//!
//! | Object | Keys |
//! |--------|------|
//! | params | `signature`, `domain`, `nonce`, `time` |
//! | opts | `provider`, `suppressExceptions` |
//!
//! `provider` is accepted and ignored; contract-wallet verification is out of
//! scope.

use serde_json::{json, Map, Value};

use crate::domain::errors::SiweError;
use crate::domain::message::{MessageFields, MessageInput, SiweMessage};
use crate::domain::verification::{
    parse_instant, SiweResponse, VerificationFailure, VerifyOpts, VerifyParams,
};
use crate::ports::inbound::SiweApi;

/// Keys accepted in verification params.
pub const VERIFY_PARAMS_KEYS: [&str; 4] = ["signature", "domain", "nonce", "time"];

/// Keys accepted in verification options.
pub const VERIFY_OPTS_KEYS: [&str; 2] = ["provider", "suppressExceptions"];

/// Keys of `object` absent from `allowed`.
pub fn check_invalid_keys(object: &Map<String, Value>, allowed: &[&str]) -> Vec<String> {
    object
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect()
}

/// JSON front end for a [`SiweApi`] implementation.
pub struct JsonSiweFacade<S: SiweApi> {
    api: S,
}

impl<S: SiweApi> JsonSiweFacade<S> {
    pub fn new(api: S) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &S {
        &self.api
    }

    /// Build a message from a JSON string (raw EIP-4361 text) or object (fields).
    pub fn create_message(&self, input: &Value) -> Result<SiweMessage, SiweError> {
        let input = match input {
            Value::String(raw) => MessageInput::FromText(raw.clone()),
            Value::Object(_) => {
                let fields: MessageFields = serde_json::from_value(input.clone())
                    .map_err(|e| SiweError::MalformedInput(e.to_string()))?;
                MessageInput::FromFields(fields)
            }
            other => {
                return Err(SiweError::MalformedInput(format!(
                    "expected message text or object, got {}",
                    json_type(other)
                )))
            }
        };
        self.api.create_message(input)
    }

    /// Field validation that refuses extra arguments.
    ///
    /// Guards against callers passing a signature here instead of to `verify`.
    pub fn validate_message(&self, message: &SiweMessage, args: &[Value]) -> Result<(), SiweError> {
        if !args.is_empty() {
            return Err(SiweError::UnexpectedArguments { count: args.len() });
        }
        self.api.validate_message(message)
    }

    /// Verify with untyped params and options.
    ///
    /// Input errors go through the same raise-or-return channel as
    /// verification failures.
    pub async fn verify(
        &self,
        message: SiweMessage,
        params: &Value,
        opts: Option<&Value>,
    ) -> Result<SiweResponse, VerificationFailure> {
        let empty = Map::new();
        let opts = match opts {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(other) => {
                let error = SiweError::MalformedInput(format!(
                    "verify options must be an object, got {}",
                    json_type(other)
                ));
                return Err(VerificationFailure { data: message, error });
            }
        };
        let suppress = opts
            .get("suppressExceptions")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match Self::typed_inputs(params, opts) {
            Ok((params, mut typed_opts)) => {
                typed_opts.suppress_exceptions = suppress;
                self.api.verify(message, params, typed_opts).await
            }
            Err(error) => {
                tracing::debug!(error = %error, "rejected verification input");
                let failure = VerificationFailure { data: message, error };
                if suppress {
                    Ok(failure.into_response())
                } else {
                    Err(failure)
                }
            }
        }
    }

    fn typed_inputs(
        params: &Value,
        opts: &Map<String, Value>,
    ) -> Result<(VerifyParams, VerifyOpts), SiweError> {
        let params = params.as_object().ok_or_else(|| {
            SiweError::MalformedInput(format!(
                "verify params must be an object, got {}",
                json_type(params)
            ))
        })?;

        let invalid_params = check_invalid_keys(params, &VERIFY_PARAMS_KEYS);
        if !invalid_params.is_empty() {
            return Err(SiweError::InvalidParams {
                target: "VerifyParams",
                keys: invalid_params,
            });
        }

        let invalid_opts = check_invalid_keys(opts, &VERIFY_OPTS_KEYS);
        if !invalid_opts.is_empty() {
            return Err(SiweError::InvalidParams {
                target: "VerifyOpts",
                keys: invalid_opts,
            });
        }
        if opts.get("suppressExceptions").is_some_and(|v| !v.is_boolean()) {
            return Err(SiweError::MalformedInput(
                "suppressExceptions must be a boolean".to_string(),
            ));
        }

        // A missing signature is recovered as empty and fails the address check
        let signature = match params.get("signature") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(SiweError::InvalidSignature {
                    reason: format!("expected a hex string, found {other}"),
                })
            }
        };

        let time = match params.get("time") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(parse_instant("time", text)?),
            Some(other) => {
                return Err(SiweError::InvalidTimeFormat {
                    field: "time",
                    received: other.to_string(),
                })
            }
        };

        Ok((
            VerifyParams {
                signature,
                domain: optional_string(params, "domain")?,
                nonce: optional_string(params, "nonce")?,
                time,
            },
            VerifyOpts::default(),
        ))
    }
}

/// JSON shape of a verification outcome:
/// `{ "success", "data", "error": { "type", "message", "expected"?, "received"? } }`.
pub fn response_to_json(response: &SiweResponse) -> Value {
    let mut out = json!({
        "success": response.success,
        "data": serde_json::to_value(&response.data).unwrap_or(Value::Null),
    });
    if let Some(error) = &response.error {
        out["error"] = error_to_json(error);
    }
    out
}

/// JSON shape of a [`SiweError`].
pub fn error_to_json(error: &SiweError) -> Value {
    let mut out = json!({
        "type": error.kind(),
        "message": error.to_string(),
    });

    let diagnostics = match error {
        SiweError::InvalidAddress { expected, received }
        | SiweError::InvalidMessageVersion { expected, received }
        | SiweError::DomainMismatch { expected, received }
        | SiweError::NonceMismatch { expected, received }
        | SiweError::ExpiredMessage { expected, received }
        | SiweError::NotYetValidMessage { expected, received } => {
            Some((expected.as_str(), received.as_str()))
        }
        _ => None,
    };
    if let Some((expected, received)) = diagnostics {
        out["expected"] = Value::from(expected);
        out["received"] = Value::from(received);
    }
    out
}

fn optional_string(params: &Map<String, Value>, key: &str) -> Result<Option<String>, SiweError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        // Empty values mean "do not check"
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(SiweError::MalformedInput(format!(
            "{key} must be a string, got {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
