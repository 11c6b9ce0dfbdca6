use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Insert position refers past the end of the record list.
    IndexOutOfRange { index: usize, len: usize },
    /// Live records and their baseline have drifted apart.
    SnapshotMisaligned { records: usize, snapshot: usize },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range ({len} record(s))")
            }
            Self::SnapshotMisaligned { records, snapshot } => {
                write!(f, "snapshot has {snapshot} record(s), document has {records}")
            }
        }
    }
}

impl std::error::Error for ReconError {}
