//! # EIP-4361 Parser
//!
//! Positional, line-oriented grammar:
//!
//! ```text
//! [scheme://]<domain> wants you to sign in with your Ethereum account:
//! <address>
//!
//! [<statement>
//! ]
//! URI: <uri>
//! Version: <version>
//! Chain ID: <chain-id>
//! Nonce: <nonce>
//! [Issued At: <date-time>]
//! [Expiration Time: <date-time>]
//! [Not Before: <date-time>]
//! [Request ID: <request-id>]
//! [Resources:
//! - <resource>
//! ...]
//! ```
//!
//! The parser only checks structure. Field-level rules (EIP-55 casing, nonce
//! shape, timestamp validity, version) are enforced when the message is
//! constructed from the parsed fields.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Text between the domain and the end of the header line.
pub const HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";

const URI_TAG: &str = "URI: ";
const VERSION_TAG: &str = "Version: ";
const CHAIN_ID_TAG: &str = "Chain ID: ";
const NONCE_TAG: &str = "Nonce: ";
const ISSUED_AT_TAG: &str = "Issued At: ";
const EXPIRATION_TIME_TAG: &str = "Expiration Time: ";
const NOT_BEFORE_TAG: &str = "Not Before: ";
const REQUEST_ID_TAG: &str = "Request ID: ";
const RESOURCES_TAG: &str = "Resources:";
const RESOURCE_ITEM_TAG: &str = "- ";

lazy_static! {
    static ref HEADER: Regex = Regex::new(
        r"^(?:(?P<scheme>[A-Za-z][A-Za-z0-9+\-.]*)://)?(?P<domain>\S+) wants you to sign in with your Ethereum account:$"
    )
    .expect("header pattern compiles");
    static ref TOKEN: Regex = Regex::new(r"^\S+$").expect("token pattern compiles");
    static ref DECIMAL: Regex = Regex::new(r"^[0-9]+$").expect("decimal pattern compiles");
}

/// Structured parse failure: which line, what the grammar wanted there, what it got.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: expected {expected}, found {found:?}")]
pub struct ParseError {
    /// 1-based line number (one past the last line for truncated input)
    pub line: usize,
    /// Grammar element expected at this line
    pub expected: &'static str,
    /// Text found instead (empty when input ended)
    pub found: String,
}

/// Fields read from a raw message, before field-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub scheme: Option<String>,
    pub domain: String,
    pub address: String,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: Option<String>,
    pub expiration_time: Option<String>,
    pub not_before: Option<String>,
    pub request_id: Option<String>,
    pub resources: Option<Vec<String>>,
}

/// Cursor over the message lines.
struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.split('\n').collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn error(&self, expected: &'static str) -> ParseError {
        ParseError {
            line: self.pos + 1,
            expected,
            found: self.peek().unwrap_or_default().to_string(),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        let line = self.peek().ok_or_else(|| self.error(expected))?;
        self.pos += 1;
        Ok(line)
    }

    fn empty(&mut self, expected: &'static str) -> Result<(), ParseError> {
        match self.peek() {
            Some("") => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error(expected)),
        }
    }

    /// Required `Tag: value` line with a non-empty value.
    fn field(&mut self, tag: &str, expected: &'static str) -> Result<&'a str, ParseError> {
        match self.peek().and_then(|line| line.strip_prefix(tag)) {
            Some(value) if !value.is_empty() => {
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.error(expected)),
        }
    }

    /// Optional `Tag: value` line; a present tag with an empty value is an error
    /// unless `allow_empty` is set.
    fn optional_field(
        &mut self,
        tag: &str,
        allow_empty: bool,
        expected: &'static str,
    ) -> Result<Option<&'a str>, ParseError> {
        match self.peek().and_then(|line| line.strip_prefix(tag)) {
            Some(value) if allow_empty || !value.is_empty() => {
                self.pos += 1;
                Ok(Some(value))
            }
            Some(_) => Err(self.error(expected)),
            None => Ok(None),
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

/// Parse a raw EIP-4361 message.
///
/// Lines must appear in the fixed order; anything left over after the last
/// recognized line is rejected.
pub fn parse_message(raw: &str) -> Result<ParsedMessage, ParseError> {
    let mut lines = Lines::new(raw);

    // Header
    const HEADER_EXPECTED: &str = "\"<domain> wants you to sign in with your Ethereum account:\"";
    let header = lines.next(HEADER_EXPECTED)?;
    let caps = HEADER.captures(header).ok_or(ParseError {
        line: 1,
        expected: HEADER_EXPECTED,
        found: header.to_string(),
    })?;
    let scheme = caps.name("scheme").map(|m| m.as_str().to_string());
    let domain = caps["domain"].to_string();

    // Address
    let address = match lines.peek() {
        Some(line) if TOKEN.is_match(line) => {
            lines.pos += 1;
            line.to_string()
        }
        _ => return Err(lines.error("address")),
    };

    // Statement block
    lines.empty("empty line after address")?;
    let statement = match lines.peek() {
        Some("") => {
            lines.pos += 1;
            None
        }
        Some(_) => {
            let statement = lines.next("statement")?.to_string();
            lines.empty("empty line after statement")?;
            Some(statement)
        }
        None => return Err(lines.error("statement or empty line")),
    };

    // Required body
    let uri = lines.field(URI_TAG, "\"URI: <uri>\"")?.to_string();
    let version = lines.field(VERSION_TAG, "\"Version: <version>\"")?.to_string();

    let chain_line = lines.pos;
    let chain_text = lines.field(CHAIN_ID_TAG, "\"Chain ID: <integer>\"")?;
    let chain_id = DECIMAL
        .is_match(chain_text)
        .then(|| chain_text.parse::<u64>().ok())
        .flatten()
        .ok_or(ParseError {
            line: chain_line + 1,
            expected: "\"Chain ID: <integer>\"",
            found: format!("{CHAIN_ID_TAG}{chain_text}"),
        })?;

    let nonce = lines.field(NONCE_TAG, "\"Nonce: <nonce>\"")?.to_string();

    // Optional body, still in fixed order
    let issued_at = lines
        .optional_field(ISSUED_AT_TAG, false, "\"Issued At: <date-time>\"")?
        .map(str::to_string);
    let expiration_time = lines
        .optional_field(EXPIRATION_TIME_TAG, false, "\"Expiration Time: <date-time>\"")?
        .map(str::to_string);
    let not_before = lines
        .optional_field(NOT_BEFORE_TAG, false, "\"Not Before: <date-time>\"")?
        .map(str::to_string);
    let request_id = lines
        .optional_field(REQUEST_ID_TAG, true, "\"Request ID: <request-id>\"")?
        .map(str::to_string);

    let resources = if lines.peek() == Some(RESOURCES_TAG) {
        lines.pos += 1;
        let mut resources = Vec::new();
        while let Some(line) = lines.peek() {
            match line.strip_prefix(RESOURCE_ITEM_TAG) {
                Some(resource) if !resource.is_empty() => {
                    resources.push(resource.to_string());
                    lines.pos += 1;
                }
                _ => return Err(lines.error("\"- <resource>\"")),
            }
        }
        Some(resources)
    } else {
        None
    };

    if !lines.is_done() {
        return Err(lines.error("end of message"));
    }

    Ok(ParsedMessage {
        scheme,
        domain,
        address,
        statement,
        uri,
        version,
        chain_id,
        nonce,
        issued_at,
        expiration_time,
        not_before,
        request_id,
        resources,
    })
}
