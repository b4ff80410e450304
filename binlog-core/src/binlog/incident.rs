use bytes::Bytes;
use bytes_reader::{ReadBytesExt, ReadFromBytes, ReadMyEnc, Result};

/// Data of IncidentEvent
///
/// an incident on the master that may have corrupted the log; decoded
/// so downstream consumers can react, never a reason to stop parsing
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentData {
    /// 1 marks lost events
    pub incident_type: u16,
    pub message: String,
}

impl ReadFromBytes for IncidentData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let incident_type = input.read_le_u16()?;
        let message = input.read_lpstring()?;
        let message = String::from_utf8_lossy(message.as_ref()).into_owned();
        Ok(IncidentData {
            incident_type,
            message,
        })
    }
}
