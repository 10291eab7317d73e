//! Token-endpoint selection.
//!
//! A claims request addresses each delivery point separately: claims meant
//! for the identity token live under `id_token`, claims meant for the
//! userinfo response under `userinfo`. The mapper resolves which key to
//! consult from the type of the token being assembled.

/// Token type string carried by identity tokens
const TOKEN_TYPE_ID: &str = "ID";
/// Token type string carried by bearer access tokens
const TOKEN_TYPE_BEARER: &str = "Bearer";

/// The delivery point a claims request fragment addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Claims delivered inside the identity token
    IdToken,
    /// Claims delivered in the userinfo response
    Userinfo,
}

impl Endpoint {
    /// The JSON key of this endpoint inside a claims request
    pub fn key(&self) -> &'static str {
        match self {
            Endpoint::IdToken => "id_token",
            Endpoint::Userinfo => "userinfo",
        }
    }

    /// Resolve the endpoint for a token type. Tokens without a type are
    /// userinfo responses; identity and bearer tokens map to `id_token`;
    /// anything else is not a claims delivery point.
    pub fn from_token_type(token_type: Option<&str>) -> Option<Endpoint> {
        match token_type {
            None => Some(Endpoint::Userinfo),
            Some(TOKEN_TYPE_ID) | Some(TOKEN_TYPE_BEARER) => Some(Endpoint::IdToken),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_token_types_to_endpoints() {
        assert_eq!(Endpoint::from_token_type(None), Some(Endpoint::Userinfo));
        assert_eq!(Endpoint::from_token_type(Some("ID")), Some(Endpoint::IdToken));
        assert_eq!(
            Endpoint::from_token_type(Some("Bearer")),
            Some(Endpoint::IdToken)
        );
        assert_eq!(Endpoint::from_token_type(Some("Refresh")), None);
    }

    #[test]
    fn it_exposes_the_request_keys() {
        assert_eq!(Endpoint::IdToken.key(), "id_token");
        assert_eq!(Endpoint::Userinfo.key(), "userinfo");
    }
}
