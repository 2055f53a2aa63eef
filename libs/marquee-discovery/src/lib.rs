//! Client-side service discovery.
//!
//! - [`Registry`]: the directory contract (register, deregister, heartbeat,
//!   lookup). [`InMemoryRegistry`] is the in-process implementation,
//!   [`RemoteRegistry`] talks to a registry service over the transport.
//! - [`HeartbeatReporter`]: cancellable task keeping one instance live.
//! - [`ServiceInstance`]: start/stop lifecycle of a registered instance.
//! - [`Resolver`]: logical service name to an open connection.

mod error;
mod heartbeat;
mod instance;
mod lifecycle;
mod memory;
mod registry;
mod remote;
mod resolver;
mod throttled_log;
pub mod wire;

pub use error::RegistryError;
pub use heartbeat::{DEFAULT_HEARTBEAT_INTERVAL, HeartbeatReporter};
pub use instance::{InstanceId, InstanceInfo};
pub use lifecycle::ServiceInstance;
pub use memory::{DEFAULT_LIVENESS_WINDOW, InMemoryRegistry};
pub use registry::Registry;
pub use remote::RemoteRegistry;
pub use resolver::{ResolveError, Resolver};
pub use throttled_log::ThrottledLog;
