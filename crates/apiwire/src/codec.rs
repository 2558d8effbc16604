//! JSON body conversion.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{DecodeError, Error};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Converts request and response bodies to and from JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(value).map_err(|e| DecodeError::Encode(e).into())
    }

    /// Decode a response body.
    ///
    /// An empty (or all-whitespace) body decodes as JSON `null`, so `()`
    /// and `Option<T>` targets accept `204 No Content` responses.
    pub fn decode<R: DeserializeOwned>(&self, body: &[u8]) -> Result<R, Error> {
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            b"null".as_slice()
        } else {
            body
        };
        serde_json::from_slice(body).map_err(|e| DecodeError::Decode(e).into())
    }
}
