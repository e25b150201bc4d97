//! Startup configuration for the controller.
//!
//! The base port and the search limit are fixed for the lifetime of the
//! process. They live in [`ControllerConfig`] so that the front end and the
//! prober receive them explicitly instead of reading globals.
//!
//! # Examples
//!
//! ```
//! use bridgectl::config::ControllerConfig;
//!
//! let config = ControllerConfig::default()
//!     .with_listen("127.0.0.1:5480".parse().unwrap());
//!
//! assert_eq!(config.base_port.value(), 10000);
//! assert_eq!(config.listen.port(), 5480);
//! config.validate().unwrap();
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use crate::error::Error;
use crate::{Port, PortRange, Result};

/// Port the HTTP front end listens on.
pub const DEFAULT_LISTEN_PORT: u16 = 5480;

/// First candidate of every search.
pub const DEFAULT_BASE_PORT: u16 = 10_000;

/// Number of candidates examined before a search gives up.
pub const DEFAULT_SEARCH_LIMIT: u16 = 1000;

/// Configuration handed to the front end and the prober at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Address the HTTP server binds.
    pub listen: SocketAddr,
    /// First port examined by each search.
    pub base_port: Port,
    /// Maximum number of ports examined by each search.
    pub search_limit: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_LISTEN_PORT)),
            base_port: Port(DEFAULT_BASE_PORT),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl ControllerConfig {
    /// Replaces the listening address.
    #[must_use]
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    /// The window of ports one search may examine.
    ///
    /// # Errors
    ///
    /// Returns an error if the search limit is zero.
    pub fn search_range(&self) -> Result<PortRange> {
        Ok(PortRange::starting_at(self.base_port, self.search_limit)?)
    }

    /// Checks the configuration for values the controller cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the search limit is zero or the
    /// search window would contain the listening port.
    pub fn validate(&self) -> Result<()> {
        if self.search_limit == 0 {
            return Err(Error::Validation {
                field: "search_limit".into(),
                message: "must examine at least one port".into(),
            });
        }

        let range = self.search_range()?;
        if let Ok(listen_port) = Port::try_from(self.listen.port()) {
            if range.contains(listen_port) {
                return Err(Error::Validation {
                    field: "listen".into(),
                    message: format!("port {listen_port} overlaps the search range {range}"),
                });
            }
        }

        Ok(())
    }
}
