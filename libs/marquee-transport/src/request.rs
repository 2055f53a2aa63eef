use bytes::Bytes;
use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CallError;

/// Percent-encode a value for use as one path segment.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// A unary call: method, origin-form path and optional JSON body.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Bytes>,
}

impl RemoteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns [`CallError::Json`] if `body` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, CallError> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }
}

/// A successful (2xx) answer.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RemoteResponse {
    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns [`CallError::Json`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CallError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Body {
        value: i32,
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(encode_segment("the movie/2"), "the%20movie%2F2");
        assert_eq!(encode_segment("plain"), "plain");
    }

    #[test]
    fn json_body_round_trips_through_response() {
        let req = RemoteRequest::put("/x").with_json(&Body { value: 7 }).unwrap();
        assert_eq!(req.method, Method::PUT);

        let resp = RemoteResponse {
            status: StatusCode::OK,
            body: req.body.unwrap(),
        };
        assert_eq!(resp.json::<Body>().unwrap(), Body { value: 7 });
    }
}
