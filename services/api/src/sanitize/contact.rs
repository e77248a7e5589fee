use serde_json::Value;

use super::{FieldReader, Mode, ValidationErrors};
use crate::models::NewContactMessage;

pub fn new_contact_message(raw: &Value) -> Result<NewContactMessage, ValidationErrors> {
    let mut r = FieldReader::new(raw, Mode::Create)?;
    let name = r.required_text("name");
    let email = r.email("email");
    let message = r.required_text("message");
    r.finish()?;

    Ok(NewContactMessage {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        message: message.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_and_lowercases() {
        let msg = new_contact_message(&json!({
            "name": " Ana ",
            "email": "ANA@Mail.com",
            "message": " hello ",
        }))
        .unwrap();
        assert_eq!(msg.name, "Ana");
        assert_eq!(msg.email, "ana@mail.com");
        assert_eq!(msg.message, "hello");
    }

    #[test]
    fn whitespace_only_message_is_rejected() {
        let errors = new_contact_message(&json!({
            "name": "Ana",
            "email": "ana@mail.com",
            "message": "   ",
        }))
        .unwrap_err();
        assert!(errors.has("message"));
        assert_eq!(errors.fields().len(), 1);
    }
}
