pub mod download;
pub mod format;
pub mod http;
pub mod logging;
pub mod timing;
