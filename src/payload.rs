use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
    error::LoginError,
    types::{Birthdate, Cpf, LoginPayload},
};

/// Serialize `{"cpf":..,"dataNascimento":..}` and encode it with padded standard base64.
pub fn encode_payload(cpf: &Cpf, birthdate: &Birthdate) -> Result<String, LoginError> {
    let payload = LoginPayload {
        cpf: cpf.as_str(),
        data_nascimento: birthdate.as_str(),
    };

    let json = serde_json::to_string(&payload)?;

    Ok(STANDARD.encode(json))
}
