//! Error types for the wardplate-core crate.
//!
//! Budget rejection is deliberately *not* here: `UpgradeRegistry::apply`
//! signals it with a boolean because it is a normal outcome, not a failure.
//! The errors below cover the recoverable failure paths -- unknown persisted
//! keys, failed factory construction, malformed records -- none of which are
//! fatal to the host; callers log and continue.

/// Errors that can occur during upgrade and tracker bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum WardplateError {
    /// A persisted upgrade record referenced a key with no registered factory.
    #[error("unknown upgrade key: {key}")]
    UnknownUpgradeKey {
        /// The unrecognized upgrade key.
        key: String,
    },

    /// A tracker key had no registered factory.
    #[error("unknown tracker key: {key}")]
    UnknownTrackerKey {
        /// The unrecognized tracker key.
        key: String,
    },

    /// A registered factory failed to construct its tracker.
    #[error("tracker construction failed for {key}: {reason}")]
    TrackerConstruction {
        /// The tracker key whose factory failed.
        key: String,
        /// Description of why construction failed.
        reason: String,
    },

    /// A persisted record was missing required fields or out of range.
    #[error("malformed record: {context}")]
    MalformedRecord {
        /// Description of what was wrong with the record.
        context: String,
    },
}
