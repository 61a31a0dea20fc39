//! Owned real-time connection used for streaming execution updates.
//!
//! The client owns its transport and has an explicit `open`/`close`
//! lifecycle. Nothing here is process-global, so tests hand in a fake
//! transport and inspect it afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::{BindError, Result};

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    pub payload: Value,
}

/// The connection primitive a [`LiveClient`] drives.
pub trait Transport {
    fn connect(&mut self, url: &str) -> Result<()>;
    fn send(&mut self, frame: &Frame) -> Result<()>;
    fn disconnect(&mut self);
}

pub struct LiveClient<T: Transport> {
    url: String,
    transport: T,
    open: bool,
}

impl<T: Transport> LiveClient<T> {
    pub fn new(url: impl Into<String>, transport: T) -> Self {
        Self {
            url: url.into(),
            transport,
            open: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Connect if not already connected.
    pub fn open(&mut self) -> Result<()> {
        if self.open {
            return Ok(());
        }
        self.transport.connect(&self.url)?;
        self.open = true;
        info!(url = %self.url, "live connection opened");
        Ok(())
    }

    /// Disconnect if connected.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.transport.disconnect();
        self.open = false;
        info!(url = %self.url, "live connection closed");
    }

    pub fn emit(&mut self, event: impl Into<String>, payload: Value) -> Result<()> {
        if !self.open {
            return Err(BindError::NotConnected);
        }
        let frame = Frame {
            event: event.into(),
            payload,
        };
        debug!(event = %frame.event, "emitting frame");
        self.transport.send(&frame)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Tear down and hand the transport back.
    pub fn into_transport(mut self) -> T {
        self.close();
        self.transport
    }
}
