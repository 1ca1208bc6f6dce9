//! Typed cache values

use pulse_db::{Server, ServerStatus};

/// One stored shape per variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    Server(Server),
    Status(ServerStatus),
    Servers(Vec<Server>),
    Statuses(Vec<ServerStatus>),
}

impl CacheValue {
    pub fn kind(&self) -> &'static str {
        match self {
            CacheValue::Server(_) => "server",
            CacheValue::Status(_) => "status",
            CacheValue::Servers(_) => "servers",
            CacheValue::Statuses(_) => "statuses",
        }
    }
}

/// An entity that can be stored in the cache alone or as a sequence
pub trait CacheEntity: Clone + Send + Sync + Sized + 'static {
    fn into_value(self) -> CacheValue;

    fn from_value(value: &CacheValue) -> Option<Self>;

    fn many_into_value(items: Vec<Self>) -> CacheValue;

    fn many_from_value(value: &CacheValue) -> Option<Vec<Self>>;
}

impl CacheEntity for Server {
    fn into_value(self) -> CacheValue {
        CacheValue::Server(self)
    }

    fn from_value(value: &CacheValue) -> Option<Self> {
        match value {
            CacheValue::Server(server) => Some(server.clone()),
            _ => None,
        }
    }

    fn many_into_value(items: Vec<Self>) -> CacheValue {
        CacheValue::Servers(items)
    }

    fn many_from_value(value: &CacheValue) -> Option<Vec<Self>> {
        match value {
            CacheValue::Servers(servers) => Some(servers.clone()),
            _ => None,
        }
    }
}

impl CacheEntity for ServerStatus {
    fn into_value(self) -> CacheValue {
        CacheValue::Status(self)
    }

    fn from_value(value: &CacheValue) -> Option<Self> {
        match value {
            CacheValue::Status(status) => Some(status.clone()),
            _ => None,
        }
    }

    fn many_into_value(items: Vec<Self>) -> CacheValue {
        CacheValue::Statuses(items)
    }

    fn many_from_value(value: &CacheValue) -> Option<Vec<Self>> {
        match value {
            CacheValue::Statuses(statuses) => Some(statuses.clone()),
            _ => None,
        }
    }
}
