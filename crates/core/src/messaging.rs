//! Buyer/seller message validation.

/// Longest message body accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Trim a message body and check it is non-empty and within the limit.
///
/// Returns the trimmed body on success.
pub fn validate_message_body(body: &str) -> Result<String, String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err("Message body must not be empty".to_string());
    }
    let chars = trimmed.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(format!(
            "Message body is {chars} characters; the limit is {MAX_MESSAGE_CHARS}"
        ));
    }
    Ok(trimmed.to_string())
}
