//! The calling-tree node graph: `EntranceNode` (per context) ->
//! `DefaultNode` (per context x resource) -> `ClusterNode` (per resource,
//! process-global). See `node_storage` for the registries that guarantee
//! one `ClusterNode` per resource name.
mod cluster_node;
mod default_node;
mod entrance_node;
mod statistic_node;

pub use cluster_node::*;
pub use default_node::*;
pub use entrance_node::*;
pub use statistic_node::*;
