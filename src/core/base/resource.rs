//! Resource
//!
use crate::utils::format_time_nanos_curr;
use std::fmt;

/// ResourceType represents the classification of resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Common = 0,
    Web,
    Rpc,
    APIGateway,
    DBSQL,
    Cache,
    MQ,
}

impl Default for ResourceType {
    fn default() -> Self {
        Self::Common
    }
}

impl From<u8> for ResourceType {
    fn from(num: u8) -> Self {
        match num {
            1 => Self::Web,
            2 => Self::Rpc,
            3 => Self::APIGateway,
            4 => Self::DBSQL,
            5 => Self::Cache,
            6 => Self::MQ,
            _ => Self::Common,
        }
    }
}

/// TrafficType describes the direction of traffic relative to the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficType {
    Outbound,
    Inbound,
}

impl Default for TrafficType {
    fn default() -> Self {
        Self::Outbound
    }
}

/// ResourceWrapper uniquely identifies a resource by name; the type and
/// traffic direction are descriptive only. Equality and hashing are by
/// name, matching the calling-tree's assumption that one resource name
/// always maps to one `ClusterNode`.
#[derive(Debug, Clone)]
pub struct ResourceWrapper {
    name: String,
    resource_type: ResourceType,
    flow_type: TrafficType,
}

impl Default for ResourceWrapper {
    fn default() -> Self {
        Self {
            name: format_time_nanos_curr(),
            resource_type: ResourceType::default(),
            flow_type: TrafficType::default(),
        }
    }
}

impl fmt::Display for ResourceWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{name={}, type={:?}, flowType={:?}}}",
            self.name, self.resource_type, self.flow_type
        )
    }
}

impl PartialEq for ResourceWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceWrapper {}

impl std::hash::Hash for ResourceWrapper {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl ResourceWrapper {
    pub fn new(name: String, resource_type: ResourceType, flow_type: TrafficType) -> Self {
        Self {
            name,
            resource_type,
            flow_type,
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn flow_type(&self) -> TrafficType {
        self.flow_type
    }
}
