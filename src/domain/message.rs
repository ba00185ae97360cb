use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vu::VirtualUser;

/// Device the messages are sent from
pub const DEFAULT_DEVICE_ID: &str = "68bb295f7670ccfbc643551b";
/// Destination number (MSISDN)
pub const DEFAULT_NUMBER: &str = "5511945106709";
/// Text placed in front of the virtual-user id
pub const DEFAULT_MESSAGE_PREFIX: &str = "Usuario Virtual ";

/// Payload errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

/// Body of a single `POST /send/nt` call.
///
/// Field order matters: it is the order of the keys in the serialized body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub device_id: String,
    pub number: String,
    pub message: String,
}

impl MessageRequest {
    /// Reject requests with any empty field
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.device_id.is_empty() {
            return Err(PayloadError::EmptyField("device_id"));
        }
        if self.number.is_empty() {
            return Err(PayloadError::EmptyField("number"));
        }
        if self.message.is_empty() {
            return Err(PayloadError::EmptyField("message"));
        }
        Ok(())
    }

    /// Compact JSON body
    pub fn to_json(&self) -> Result<String, PayloadError> {
        serde_json::to_string(self).map_err(|e| PayloadError::Serialization(e.to_string()))
    }
}

/// Static template every request is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub device_id: String,
    pub number: String,
    pub message_prefix: String,
}

impl Default for MessagePayload {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            number: DEFAULT_NUMBER.to_string(),
            message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
        }
    }
}

impl MessagePayload {
    /// Build the request for one iteration of `vu`
    pub fn for_virtual_user(&self, vu: VirtualUser) -> MessageRequest {
        MessageRequest {
            device_id: self.device_id.clone(),
            number: self.number.clone(),
            message: format!("{}{}", self.message_prefix, vu.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_body_for_vu_3_is_exact() {
        let request = MessagePayload::default().for_virtual_user(VirtualUser::new(3));
        assert_eq!(
            request.to_json().unwrap(),
            r#"{"device_id":"68bb295f7670ccfbc643551b","number":"5511945106709","message":"Usuario Virtual 3"}"#
        );
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(10)]
    fn test_fixed_fields_do_not_depend_on_vu(#[case] id: u32) {
        let request = MessagePayload::default().for_virtual_user(VirtualUser::new(id));
        assert_eq!(request.device_id, DEFAULT_DEVICE_ID);
        assert_eq!(request.number, DEFAULT_NUMBER);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_iteration_does_not_change_message() {
        let payload = MessagePayload::default();
        let first = payload.for_virtual_user(VirtualUser { id: 4, iteration: 0 });
        let later = payload.for_virtual_user(VirtualUser { id: 4, iteration: 12 });
        assert_eq!(first, later);
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut request = MessagePayload::default().for_virtual_user(VirtualUser::new(1));
        request.number.clear();
        assert_eq!(request.validate(), Err(PayloadError::EmptyField("number")));

        let empty_device = MessageRequest {
            device_id: String::new(),
            number: "1".into(),
            message: "x".into(),
        };
        assert_eq!(
            empty_device.validate(),
            Err(PayloadError::EmptyField("device_id"))
        );
    }

    proptest! {
        #[test]
        fn prop_message_is_prefix_plus_vu(id in 1u32..=u32::MAX) {
            let request = MessagePayload::default().for_virtual_user(VirtualUser::new(id));
            prop_assert_eq!(request.message, format!("Usuario Virtual {}", id));
        }
    }
}
