//! Authentication token issued together with a refresh token.

use serde::Serialize;

use crate::domain::entities::token::Token;

/// Result of a login that also hands out a refresh token
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    #[serde(rename = "authentication_token")]
    pub auth_token: Token,
    pub refresh_token: Token,
}

impl TokenPair {
    pub fn new(auth_token: Token, refresh_token: Token) -> Self {
        Self {
            auth_token,
            refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::token::TokenScope;
    use chrono::{Duration, Utc};

    #[test]
    fn test_pair_serialization() {
        let now = Utc::now();
        let pair = TokenPair::new(
            Token::issued("AUTH".into(), 1, now + Duration::hours(2), TokenScope::Authentication),
            Token::issued("REFRESH".into(), 1, now + Duration::days(7), TokenScope::Refresh),
        );

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["authentication_token"]["token"], "AUTH");
        assert_eq!(json["refresh_token"]["token"], "REFRESH");
        assert!(json["refresh_token"].get("scope").is_none());
    }
}
