use serde::{Deserialize, Serialize};

/// How a call was set up
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CallMode {
    Direct,
    Group,
    Adhoc,
}

/// Media kind of a call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CallType {
    Audio,
    Video,
    Group,
    Adhoc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

/// Disposition of a call as last reported by the call layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CallStatus {
    Pending,
    Accepted,
    Missed,
    Declined,
    Deleted,
    GenericGroupCall,
    OutgoingRing,
    Ringing,
    Joined,
}

/// A single call history record, keyed by `call_id`
///
/// Records are values: once cached they are never mutated in place, only
/// replaced by a newer record with the same `call_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryDetails {
    /// Unique call identifier
    pub call_id: String,

    /// Conversation or call link the call belongs to
    pub peer_id: String,

    /// Who started ringing, if anyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ringer_id: Option<String>,

    pub mode: CallMode,

    #[serde(rename = "type")]
    pub call_type: CallType,

    pub direction: CallDirection,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    pub status: CallStatus,
}

impl CallHistoryDetails {
    /// Create a pending direct audio call record
    pub fn new(call_id: impl Into<String>, peer_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            call_id: call_id.into(),
            peer_id: peer_id.into(),
            ringer_id: None,
            mode: CallMode::Direct,
            call_type: CallType::Audio,
            direction: CallDirection::Outgoing,
            timestamp,
            status: CallStatus::Pending,
        }
    }

    pub fn with_ringer(mut self, ringer_id: impl Into<String>) -> Self {
        self.ringer_id = Some(ringer_id.into());
        self
    }

    pub fn with_mode(mut self, mode: CallMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_type(mut self, call_type: CallType) -> Self {
        self.call_type = call_type;
        self
    }

    pub fn with_direction(mut self, direction: CallDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_status(mut self, status: CallStatus) -> Self {
        self.status = status;
        self
    }
}
