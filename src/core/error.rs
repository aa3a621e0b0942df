use thiserror::Error;

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

/// Failure taxonomy for the frame loop and the matrix library.
///
/// `PoseUnavailable` and `DeviceParamsMissing` are transient frame-skip
/// conditions; `InvalidArgument` is a programming error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
	#[error("head tracker has not produced a pose yet")]
	PoseUnavailable,
	#[error("no saved device parameters, viewer is not configured")]
	DeviceParamsMissing,
	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),
}
