//! logsift - keyword search across log files with merged context windows
//!
//! Module layout:
//! - kernel::services::ports: data contracts (events, targets, settings)
//! - kernel::services::adapters: filter, scanner, matcher, channel, coordinator
//! - kernel::search: foreground state assembling the result text
//! - kernel::find: find-and-navigate over the assembled text

pub mod kernel;
