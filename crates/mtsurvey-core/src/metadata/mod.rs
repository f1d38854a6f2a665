pub mod calibration;
pub mod channel;
pub mod file_tags;
pub mod header;

pub use calibration::SensorCalibration;
pub use channel::SurveyChannel;
pub use file_tags::ChannelFileTags;
pub use header::ChannelHeader;
