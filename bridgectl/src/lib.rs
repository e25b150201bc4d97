#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # bridgectl
//!
//! Hands out free TCP ports over HTTP.
//!
//! Each `GET /api/request` walks upward from a fixed base port, checks every
//! candidate once and answers with the first one that was free at the moment
//! it was checked. Nothing is reserved and nothing is remembered between
//! requests, so two callers asking at the same time can receive the same
//! port.
//!
//! ## Core Types
//!
//! - [`Port`] and [`PortRange`]: port numbers and search windows
//! - [`PortProber`]: the sequential search
//! - [`PortOccupancyChecker`]: the availability check it relies on
//! - [`ControllerConfig`]: startup configuration
//! - [`Error`] and [`Result`]: error handling
//! - [`Logger`] and [`LogLevel`]: logging
//!
//! ## Examples
//!
//! ```
//! use bridgectl::port::occupancy::MockOccupancyChecker;
//! use bridgectl::{Port, PortProber};
//!
//! let checker = MockOccupancyChecker::from_ports([10000, 10001, 10002]);
//! let prober = PortProber::new(checker, Port::try_from(10000).unwrap(), 1000).unwrap();
//! assert_eq!(prober.find_available().unwrap().value(), 10003);
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod port;

pub use config::ControllerConfig;
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use port::occupancy::{
    BindOccupancyChecker, CommandOccupancyChecker, PortOccupancyChecker,
};
pub use port::prober::PortProber;
pub use port::{Port, PortRange};
