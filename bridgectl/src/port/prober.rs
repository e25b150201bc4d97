//! Sequential port probing.
//!
//! Starting at a base port, every candidate is checked once, in ascending
//! order, and the first free one is returned. Nothing is reserved: the
//! answer only says the port was free at the moment it was checked, so two
//! callers probing at the same time can be handed the same port.

use crate::config::DEFAULT_SEARCH_LIMIT;
use crate::error::Error;
use crate::{Port, PortRange, Result};

use super::occupancy::{BindOccupancyChecker, PortOccupancyChecker};

/// Finds the first free port at or above a fixed base.
///
/// # Type Parameters
///
/// * `C` - The occupancy checker (defaults to [`BindOccupancyChecker`])
///
/// # Examples
///
/// ```
/// use bridgectl::port::occupancy::MockOccupancyChecker;
/// use bridgectl::port::prober::PortProber;
/// use bridgectl::Port;
///
/// let checker = MockOccupancyChecker::from_ports([10000, 10001, 10002]);
/// let prober = PortProber::new(checker, Port::try_from(10000).unwrap(), 1000).unwrap();
///
/// assert_eq!(prober.find_available().unwrap().value(), 10003);
/// ```
#[derive(Debug, Clone)]
pub struct PortProber<C: PortOccupancyChecker = BindOccupancyChecker> {
    checker: C,
    range: PortRange,
}

impl<C: PortOccupancyChecker> PortProber<C> {
    /// Creates a prober that examines at most `limit` ports starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPortRange`] if `limit` is zero.
    pub fn new(checker: C, base: Port, limit: u16) -> Result<Self> {
        let range = PortRange::starting_at(base, limit)?;
        Ok(Self { checker, range })
    }

    /// The window of ports a single probe may examine.
    #[must_use]
    pub fn search_range(&self) -> &PortRange {
        &self.range
    }

    /// The occupancy checker in use.
    #[must_use]
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Returns the first free port at or above the base.
    ///
    /// # Errors
    ///
    /// - [`Error::PortExhausted`] if every port in the window is occupied
    /// - [`Error::OccupancyCheckFailed`] if a check could not be carried out
    pub fn find_available(&self) -> Result<Port> {
        match self.find_next_available(self.range.min())? {
            Some(port) => Ok(port),
            None => {
                log::warn!("no free port in {}", self.range);
                Err(Error::PortExhausted { range: self.range })
            }
        }
    }

    /// Walks upward from `start` and returns the first free port in the
    /// window, or `None` once the window is used up.
    ///
    /// Each candidate is checked exactly once. A failing check ends the
    /// search with that error.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the checker.
    pub fn find_next_available(&self, start: Port) -> Result<Option<Port>> {
        if !self.range.contains(start) {
            return Ok(None);
        }

        let window = PortRange::new(start, self.range.max())?;
        for candidate in window {
            if self.checker.is_occupied(candidate)? {
                log::debug!("port {candidate} occupied, trying next");
                continue;
            }
            log::debug!("port {candidate} free");
            return Ok(Some(candidate));
        }

        Ok(None)
    }
}

/// Returns the first free port at or above `base`, using the default
/// search limit.
///
/// # Errors
///
/// See [`PortProber::find_available`].
///
/// # Examples
///
/// ```
/// use bridgectl::port::occupancy::MockOccupancyChecker;
/// use bridgectl::port::prober::find_available;
/// use bridgectl::Port;
///
/// let checker = MockOccupancyChecker::empty();
/// let port = find_available(checker, Port::try_from(10000).unwrap()).unwrap();
/// assert_eq!(port.value(), 10000);
/// ```
pub fn find_available<C: PortOccupancyChecker>(checker: C, base: Port) -> Result<Port> {
    PortProber::new(checker, base, DEFAULT_SEARCH_LIMIT)?.find_available()
}
