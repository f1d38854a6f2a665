// crates/mtsurvey-core/src/metadata/channel.rs

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::{ChannelFileTags, ChannelHeader, SensorCalibration};
use crate::session::SessionState;

/// Everything the wizard knows about one physical channel. Pure composition:
/// the three parts share a channel number but persist independently, each in
/// its own session namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyChannel {
    pub file_tags: ChannelFileTags,
    pub header: ChannelHeader,
    pub calibration: SensorCalibration,
}

impl SurveyChannel {
    pub fn load_or_init(session: &mut SessionState, channel_no: i64) -> Result<Self> {
        let (file_tags, _) = ChannelFileTags::load_or_init(session, channel_no)?;
        let (header, _) = ChannelHeader::load_or_init(session, channel_no)?;
        let (calibration, _) = SensorCalibration::load_or_init(session, channel_no)?;
        Ok(Self {
            file_tags,
            header,
            calibration,
        })
    }

    pub fn channel_no(&self) -> i64 {
        self.header.channel_no
    }
}
