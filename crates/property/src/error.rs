use crate::codec::CodecError;
use crate::registry::PropertyId;
use crate::supply::DeviceError;

/// Outcome of a failed property read, write or snapshot.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The device has nothing to report. Not an operator-facing error.
    #[error("no data available")]
    NoData,

    /// The device is absent or not ready yet.
    #[error("temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("device failure: {0}")]
    DeviceFailure(#[source] DeviceError),

    /// Stored text matched neither an enum entry nor an integer.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] CodecError),

    #[error("out of memory")]
    AllocationFailure,

    #[error("unknown property {0}")]
    UnknownProperty(PropertyId),

    #[error("no attribute named `{0}`")]
    UnknownAttribute(String),

    #[error("attribute `{0}` is read-only")]
    ReadOnly(String),
}

impl AccessError {
    /// Errors a snapshot recovers from by leaving the property out.
    pub fn is_skippable(&self) -> bool {
        matches!(self, AccessError::NoData | AccessError::TemporarilyUnavailable)
    }
}

impl From<DeviceError> for AccessError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NoData => AccessError::NoData,
            DeviceError::NotPresent | DeviceError::Busy => AccessError::TemporarilyUnavailable,
            other => AccessError::DeviceFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_classification() {
        assert!(matches!(AccessError::from(DeviceError::NoData), AccessError::NoData));
        assert!(matches!(
            AccessError::from(DeviceError::NotPresent),
            AccessError::TemporarilyUnavailable
        ));
        assert!(matches!(
            AccessError::from(DeviceError::Busy),
            AccessError::TemporarilyUnavailable
        ));
        assert!(matches!(
            AccessError::from(DeviceError::Other("i2c timeout".into())),
            AccessError::DeviceFailure(DeviceError::Other(_))
        ));
    }

    #[test]
    fn test_skippable() {
        assert!(AccessError::NoData.is_skippable());
        assert!(AccessError::TemporarilyUnavailable.is_skippable());
        assert!(!AccessError::AllocationFailure.is_skippable());
        assert!(!AccessError::DeviceFailure(DeviceError::NotSupported).is_skippable());
    }
}
