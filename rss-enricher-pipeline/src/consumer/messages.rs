//! Message types for the consumer.

/// Position of a record in the input topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPosition {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

/// A record received from the input topic.
///
/// Lives for one poll cycle only and is owned by the session loop.
#[derive(Debug, Clone)]
pub struct InboundRecord {
    pub position: RecordPosition,
    /// Raw payload bytes; empty for records without a payload.
    pub payload: Vec<u8>,
    /// Consumer group the record was received under.
    pub group_id: String,
}

/// Result of a single successful poll.
#[derive(Debug, Clone)]
pub enum Polled {
    /// A record to process.
    Record(InboundRecord),
    /// The consumer caught up with the end of a partition.
    PartitionEof { partition: i32 },
}
