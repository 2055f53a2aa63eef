#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use marquee_transport::{CallError, Connection, Connector, RemoteRequest, RemoteResponse};
use parking_lot::Mutex;

/// Connector that never touches the network and records every address it
/// was asked to connect to.
#[derive(Default)]
pub struct RecordingConnector {
    pub connected: Mutex<Vec<String>>,
    pub refuse: Mutex<Vec<String>>,
}

impl RecordingConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refuse(&self, address: &str) {
        self.refuse.lock().push(address.to_owned());
    }

    pub fn connected(&self) -> Vec<String> {
        self.connected.lock().clone()
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn Connection>, CallError> {
        if self.refuse.lock().iter().any(|a| a == address) {
            return Err(CallError::Connect {
                address: address.to_owned(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        self.connected.lock().push(address.to_owned());
        Ok(Box::new(NullConnection {
            address: address.to_owned(),
        }))
    }
}

pub struct NullConnection {
    address: String,
}

#[async_trait]
impl Connection for NullConnection {
    fn address(&self) -> &str {
        &self.address
    }

    async fn call(&mut self, _request: RemoteRequest) -> Result<RemoteResponse, CallError> {
        Ok(RemoteResponse {
            status: http::StatusCode::NO_CONTENT,
            body: bytes::Bytes::new(),
        })
    }
}
