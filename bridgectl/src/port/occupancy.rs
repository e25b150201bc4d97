//! Port occupancy checking.
//!
//! The prober only needs a yes/no answer for a single port, so the check sits
//! behind the [`PortOccupancyChecker`] trait. [`BindOccupancyChecker`] asks the
//! operating system directly, [`CommandOccupancyChecker`] delegates to an
//! external program, and [`MockOccupancyChecker`] serves tests.

use std::collections::HashSet;
use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::process::Command;
use std::sync::Arc;

use crate::error::Error;
use crate::{Port, Result};

/// Trait for checking whether a port is in use on this host.
///
/// # Examples
///
/// ```
/// use bridgectl::port::occupancy::{MockOccupancyChecker, PortOccupancyChecker};
/// use bridgectl::Port;
///
/// let checker = MockOccupancyChecker::from_ports([10000]);
/// assert!(checker.is_occupied(Port::try_from(10000).unwrap()).unwrap());
/// assert!(!checker.is_occupied(Port::try_from(10001).unwrap()).unwrap());
/// ```
pub trait PortOccupancyChecker: Send + Sync {
    /// Returns `Ok(true)` if `port` is occupied and `Ok(false)` if it is free.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OccupancyCheckFailed`] when the check could not be
    /// carried out at all.
    fn is_occupied(&self, port: Port) -> Result<bool>;
}

impl<C: PortOccupancyChecker + ?Sized> PortOccupancyChecker for Box<C> {
    fn is_occupied(&self, port: Port) -> Result<bool> {
        (**self).is_occupied(port)
    }
}

impl<C: PortOccupancyChecker + ?Sized> PortOccupancyChecker for Arc<C> {
    fn is_occupied(&self, port: Port) -> Result<bool> {
        (**self).is_occupied(port)
    }
}

/// Checks a port by binding a TCP listener to it on all interfaces.
///
/// The listener is dropped as soon as the bind succeeds, so nothing stays
/// reserved. A caller can still lose the port to another process between the
/// check and its own bind.
///
/// Only "address in use" counts as occupied. Any other bind failure, such as
/// a missing permission, is reported as [`Error::OccupancyCheckFailed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BindOccupancyChecker;

impl PortOccupancyChecker for BindOccupancyChecker {
    fn is_occupied(&self, port: Port) -> Result<bool> {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port.value()));
        match TcpListener::bind(addr) {
            Ok(listener) => {
                drop(listener);
                Ok(false)
            }
            Err(e) => bind_failure_verdict(port, e),
        }
    }
}

/// Maps a failed bind on `port` to the checker's answer.
fn bind_failure_verdict(port: Port, err: io::Error) -> Result<bool> {
    if err.kind() == ErrorKind::AddrInUse {
        log::debug!("port {port} in use: {err}");
        Ok(true)
    } else {
        Err(Error::occupancy(port, err))
    }
}

/// Checks a port by running an external program.
///
/// The program is run as `program [args...] <port>`. Its trimmed standard
/// output is read as a count of sockets using the port: `0` means free and
/// anything else, including output that is not a number, means occupied. A
/// program that cannot be started or exits unsuccessfully is a check failure.
///
/// # Examples
///
/// ```no_run
/// use bridgectl::port::occupancy::{CommandOccupancyChecker, PortOccupancyChecker};
/// use bridgectl::Port;
///
/// let checker = CommandOccupancyChecker::new("bash").arg("portcheck.sh");
/// let occupied = checker.is_occupied(Port::try_from(10000).unwrap()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CommandOccupancyChecker {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandOccupancyChecker {
    /// Creates a checker that runs `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument placed before the port number.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments placed before the port number.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl PortOccupancyChecker for CommandOccupancyChecker {
    fn is_occupied(&self, port: Port) -> Result<bool> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(port.to_string())
            .output()
            .map_err(|e| Error::occupancy(port, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::occupancy(
                port,
                format!("check exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let verdict = stdout.trim();
        log::debug!("check for port {port} reported {verdict:?}");

        Ok(!matches!(verdict.parse::<u64>(), Ok(0)))
    }
}

/// Test checker with a fixed set of occupied ports.
///
/// Ports listed as failing make [`is_occupied`](PortOccupancyChecker::is_occupied)
/// return an error instead of an answer.
#[derive(Debug, Clone, Default)]
pub struct MockOccupancyChecker {
    occupied_ports: HashSet<Port>,
    failing_ports: HashSet<Port>,
}

impl MockOccupancyChecker {
    /// Creates a checker that treats `occupied_ports` as in use.
    #[must_use]
    pub fn new(occupied_ports: HashSet<Port>) -> Self {
        Self {
            occupied_ports,
            failing_ports: HashSet::new(),
        }
    }

    /// Creates a checker that reports every port as free.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a checker from raw port numbers, skipping 0.
    #[must_use]
    pub fn from_ports(ports: impl IntoIterator<Item = u16>) -> Self {
        Self::new(
            ports
                .into_iter()
                .filter_map(|p| Port::try_from(p).ok())
                .collect(),
        )
    }

    /// Marks `port` as in use.
    pub fn mark_occupied(&mut self, port: Port) {
        self.occupied_ports.insert(port);
    }

    /// Makes the check for `port` fail.
    pub fn mark_failing(&mut self, port: Port) {
        self.failing_ports.insert(port);
    }
}

impl PortOccupancyChecker for MockOccupancyChecker {
    fn is_occupied(&self, port: Port) -> Result<bool> {
        if self.failing_ports.contains(&port) {
            return Err(Error::occupancy(port, "simulated check failure"));
        }
        Ok(self.occupied_ports.contains(&port))
    }
}
