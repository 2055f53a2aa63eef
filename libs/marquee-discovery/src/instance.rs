use std::fmt;

/// Identifier of one running instance: `<service>-<random u64>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a fresh id for an instance of `service`.
    #[must_use]
    pub fn generate(service: &str) -> Self {
        Self(format!("{service}-{}", rand::random::<u64>()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for InstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the registry needs to know about one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    pub id: InstanceId,
    pub service: String,
    /// `host:port` other services use to reach the instance.
    pub address: String,
}

impl InstanceInfo {
    pub fn new(id: InstanceId, service: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            service: service.into(),
            address: address.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_service_prefix() {
        let id = InstanceId::generate("rating");
        assert!(id.as_str().starts_with("rating-"));
        let suffix = &id.as_str()["rating-".len()..];
        assert!(suffix.parse::<u64>().is_ok());
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(InstanceId::generate("movie"), InstanceId::generate("movie"));
    }
}
