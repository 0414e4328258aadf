use url::{form_urlencoded::byte_serialize, Url};

use crate::error::LoginError;

/// Append the `login` and `auth` query parameters to `base_url`.
///
/// `base_url` only has to parse as an absolute URL; it is used verbatim, so a
/// fragment such as `#/` stays in front of the query like a single-page-app route.
///
/// The parameters are expected to be base64 and token text. Values are escaped
/// with form encoding, which differs from `encodeURIComponent` only outside that
/// alphabet (a space becomes `+`, `~` is escaped).
pub fn compose_url(
    base_url: &str,
    encoded_payload: &str,
    token: &str,
) -> Result<String, LoginError> {
    check_base_url(base_url)?;

    Ok(format!(
        "{base_url}?login={}&auth={}",
        percent_encode(encoded_payload),
        percent_encode(token)
    ))
}

pub(crate) fn check_base_url(base_url: &str) -> Result<(), LoginError> {
    Url::parse(base_url).map_err(|source| LoginError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    Ok(())
}

// Leaves ASCII alphanumerics and `-_.*` alone; `+`, `/` and `=` become %2B, %2F, %3D.
fn percent_encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_base64_padding() {
        assert_eq!(
            compose_url("https://x.test/#/", "cGF5bG9hZA==", "a.b.c").unwrap(),
            "https://x.test/#/?login=cGF5bG9hZA%3D%3D&auth=a.b.c"
        );
    }

    #[test]
    fn escapes_base64_alphabet() {
        assert_eq!(percent_encode("ab+/cd=="), "ab%2B%2Fcd%3D%3D");
        assert_eq!(percent_encode("x-y_z.w"), "x-y_z.w");
    }

    #[test]
    fn rejects_relative_url() {
        assert!(matches!(
            compose_url("x.test/#/", "cGF5bG9hZA==", "a.b.c"),
            Err(LoginError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            compose_url("", "cGF5bG9hZA==", "a.b.c"),
            Err(LoginError::InvalidBaseUrl { .. })
        ));
    }
}
