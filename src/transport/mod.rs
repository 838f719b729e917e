//! Transport layer: wire-format details (serialization/deserialization).

mod notification;

pub use notification::{
    decode_notification_json_response, encode_notification_json, notifications_endpoint,
};
