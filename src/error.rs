use thiserror::Error;

/// Errors raised when a raw snapshot payload fails the structural shape check.
///
/// Shape errors fail fast: nothing is mutated and no partial snapshot is
/// produced.
#[derive(Error, Debug, Clone)]
pub enum SnapshotShapeError {
    #[error("canvas data must be a JSON object, found {0}")]
    NotAnObject(String),

    #[error("canvas data field '{0}' is missing or not an array")]
    MissingArray(&'static str),

    #[error("canvas data record is malformed: {0}")]
    MalformedRecord(String),
}

/// Errors that can occur while rebuilding a live graph from a snapshot.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error(transparent)]
    Shape(#[from] SnapshotShapeError),

    #[error("graph host rejected node '{node_id}': {message}")]
    NodeConstruction { node_id: String, message: String },

    // The endpoint field must not be called `source`, or thiserror would
    // treat it as the error's cause.
    #[error("graph host rejected edge from '{source_id}' to '{target}': {message}")]
    EdgeConstruction {
        source_id: String,
        target: String,
        message: String,
    },
}

/// Internal failures of the port alignment validator.
///
/// These never propagate to callers: the public entry point converts them
/// into a single synthetic error entry on the report.
#[derive(Error, Debug, Clone)]
pub enum PortAlignmentError {
    #[error("out port '{0}' does not follow the out-<row> id pattern")]
    MalformedPortId(String),

    #[error("out port '{0}' carries no local-frame placement")]
    MissingPlacement(String),
}

/// Internal failure of a single publish sub-check.
///
/// Swallowed by the publish validator so one buggy check cannot suppress
/// the findings of the others.
#[derive(Error, Debug, Clone)]
pub enum CheckError {
    #[error("node '{node_id}' carries a malformed branch list")]
    BadBranchList { node_id: String },
}

/// Errors raised by a graph host when a cell operation cannot be applied.
#[derive(Error, Debug, Clone)]
pub enum HostError {
    #[error("cell '{0}' does not exist")]
    UnknownCell(String),

    #[error("node '{node_id}' has no port '{port_id}'")]
    UnknownPort { node_id: String, port_id: String },

    #[error("cell id '{0}' is already taken")]
    DuplicateCell(String),
}

/// Errors raised by task persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not encode task artifact: {0}")]
    Encode(String),

    #[error("could not decode task artifact: {0}")]
    Decode(String),

    #[error("could not access artifact file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("task '{0}' not found")]
    TaskNotFound(String),
}
