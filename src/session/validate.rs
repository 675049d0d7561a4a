use super::SessionError;
use crate::types::*;
use rand::Rng;

/// Characters session codes are drawn from
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random session code
pub fn generate_session_id() -> SessionId {
    let mut rng = rand::rng();
    (0..SESSION_ID_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Pick an avatar color for a new participant
pub fn pick_color() -> String {
    let mut rng = rand::rng();
    USER_COLORS[rng.random_range(0..USER_COLORS.len())].to_string()
}

pub fn validate_username(raw: &str) -> Result<String, SessionError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(SessionError::EmptyUsername);
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(SessionError::UsernameTooLong);
    }
    Ok(username.to_string())
}

/// Trim and upper-case a typed session code, checking its length
pub fn normalize_session_id(raw: &str) -> Result<SessionId, SessionError> {
    let session_id = raw.trim();
    if session_id.is_empty() {
        return Err(SessionError::EmptySessionId);
    }
    if session_id.chars().count() != SESSION_ID_LENGTH {
        return Err(SessionError::InvalidSessionId);
    }
    Ok(session_id.to_uppercase())
}

pub fn validate_message(raw: &str) -> Result<String, SessionError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(SessionError::EmptyMessage);
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(SessionError::MessageTooLong);
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_session_id_shape() {
        for _ in 0..50 {
            let id = generate_session_id();
            assert_eq!(id.len(), SESSION_ID_LENGTH);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert_eq!(normalize_session_id(&id), Ok(id.clone()));
        }
    }

    #[test]
    fn test_pick_color_from_palette() {
        let color = pick_color();
        assert!(USER_COLORS.contains(&color.as_str()));
    }

    #[test]
    fn test_username_rules() {
        assert_eq!(validate_username("  ada  "), Ok("ada".to_string()));
        assert_eq!(validate_username("   "), Err(SessionError::EmptyUsername));
        assert_eq!(
            validate_username(&"x".repeat(21)),
            Err(SessionError::UsernameTooLong)
        );
        assert!(validate_username(&"ü".repeat(20)).is_ok());
    }

    #[test]
    fn test_session_id_rules() {
        assert_eq!(normalize_session_id(" ab12cd34 "), Ok("AB12CD34".to_string()));
        assert_eq!(normalize_session_id(""), Err(SessionError::EmptySessionId));
        assert_eq!(
            normalize_session_id("ABC"),
            Err(SessionError::InvalidSessionId)
        );
        assert_eq!(
            normalize_session_id("ABCDEFGHI"),
            Err(SessionError::InvalidSessionId)
        );
    }

    #[test]
    fn test_message_rules() {
        assert_eq!(validate_message(" hi "), Ok("hi".to_string()));
        assert_eq!(validate_message("\n\t"), Err(SessionError::EmptyMessage));
        assert!(validate_message(&"a".repeat(500)).is_ok());
        assert_eq!(
            validate_message(&"a".repeat(501)),
            Err(SessionError::MessageTooLong)
        );
    }
}
