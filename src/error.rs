use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no path between waypoints {source} and {target}")]
    DisconnectedWaypoint { r#source: NodeId, target: NodeId },
    #[error("dominant component is empty after road-class filtering")]
    EmptyDominantComponent,
    #[error("unknown node id: {0}")]
    UnknownNode(NodeId),
    #[error("invalid waypoint set: {0}")]
    InvalidWaypoints(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("routing pool error: {0}")]
    ThreadPool(String),
}
