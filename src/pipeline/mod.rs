//! FSL pipeline script and change-log emission
//!
//! Nothing here invokes FSL; this module only writes the artifacts a user
//! runs or reads afterwards:
//! - The `bet`/`eddy_correct`/`dtifit` shell script for the filtered data
//! - The `key = value` change log describing what was removed

/// Change-log emission
pub mod report;
/// FSL fitting-script emission
pub mod script;

pub use report::ChangeReport;
pub use script::write_fsl_script;
