use std::fmt;

use serde::{Deserialize, Serialize};

/// An 11-digit CPF that has passed checksum validation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Cpf(pub(crate) String);

impl Cpf {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The CPF with all but the last two digits hidden, for logging.
    pub fn masked(&self) -> String {
        format!("*********{}", &self.0[9..])
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `DD/MM/YYYY` birthdate naming a real calendar day, kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Birthdate(pub(crate) String);

impl Birthdate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Birthdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity carried in the `login` query parameter. Field order is the
/// serialization order.
#[derive(Debug, Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub(crate) cpf: &'a str,
    #[serde(rename = "dataNascimento")]
    pub(crate) data_nascimento: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    LoginAutomatico,
}

/// What the caller decides about a token before it is signed.
#[derive(Debug, Clone, Copy)]
pub struct ClaimsInput {
    pub kind: TokenKind,
    /// Lifetime of the token. Passed through as given, never clamped.
    pub expiration_seconds: u64,
}

impl ClaimsInput {
    pub fn login(expiration_seconds: u64) -> Self {
        Self {
            kind: TokenKind::LoginAutomatico,
            expiration_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Header {
    pub(crate) alg: &'static str,
    pub(crate) typ: &'static str,
}

impl Header {
    pub(crate) const HS256: Header = Header {
        alg: "HS256",
        typ: "JWT",
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
    pub tipo: TokenKind,
    pub iat: u64,
    pub exp: u64,
}
