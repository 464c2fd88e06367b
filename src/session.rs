//! Admin session handling.
//!
//! Login sets a cookie holding the hex SHA-256 of the configured admin
//! password; every gated request checks the cookie against the same
//! hash. Changing the password changes the token, which invalidates all
//! outstanding sessions at once.

use sha2::{Digest, Sha256};

use charty_core::models::AUTH_COOKIE;

/// Session lifetime: seven days.
const SESSION_MAX_AGE_SECS: u64 = 604_800;

/// Derive the session token for the configured password.
pub fn session_token(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build the `Set-Cookie` value that opens a session.
pub fn login_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        AUTH_COOKIE, token, SESSION_MAX_AGE_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that closes a session (Max-Age 0).
pub fn logout_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", AUTH_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull the session token out of a `Cookie` request header.
pub fn cookie_token(header: Option<&str>) -> Option<&str> {
    for pair in header?.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == AUTH_COOKIE {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_stable_hex() {
        let token = session_token("1234@@Ff");
        assert_eq!(token, session_token("1234@@Ff"));
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, session_token("other"));
    }

    #[test]
    fn test_login_cookie_round_trips_through_header() {
        let token = session_token("secret");
        let cookie = login_cookie(&token, false);
        assert!(cookie.starts_with("charty_admin="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));

        // Browsers echo back just the name=value pair.
        let header = cookie.split(';').next().unwrap().to_string();
        assert_eq!(cookie_token(Some(&header)), Some(token.as_str()));
    }

    #[test]
    fn test_secure_flag_is_appended_when_configured() {
        assert!(login_cookie("t", true).ends_with("; Secure"));
        assert!(logout_cookie(true).ends_with("; Secure"));
    }

    #[test]
    fn test_logout_cookie_expires_immediately() {
        let cookie = logout_cookie(false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("charty_admin=;"));
    }

    #[test]
    fn test_cookie_token_parses_among_other_cookies() {
        let header = "theme=dark; charty_admin=abc123; lang=ar";
        assert_eq!(cookie_token(Some(header)), Some("abc123"));
        assert_eq!(cookie_token(Some("theme=dark")), None);
        assert_eq!(cookie_token(None), None);
    }
}
