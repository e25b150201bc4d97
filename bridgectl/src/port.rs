//! Port and port range types.
//!
//! A [`Port`] is a bindable TCP port number and a [`PortRange`] is the
//! inclusive window a probe walks through. The submodules hold the
//! availability check and the sequential prober built on top of them.

use std::fmt;

pub mod occupancy;
pub mod prober;

#[cfg(test)]
mod proptests;

/// A TCP port number in `1..=65535`.
///
/// Port 0 is rejected: binding it asks the operating system for an ephemeral
/// port, so an availability check against it would always succeed.
///
/// # Examples
///
/// ```
/// use bridgectl::Port;
///
/// let port = Port::try_from(10000).unwrap();
/// assert_eq!(port.value(), 10000);
///
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(pub(crate) u16);

impl Port {
    /// The lowest valid port number.
    pub const MIN: u16 = 1;

    /// The highest valid port number.
    pub const MAX: u16 = 65535;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the port `offset` places above this one, or `None` past 65535.
    ///
    /// # Examples
    ///
    /// ```
    /// use bridgectl::Port;
    ///
    /// let port = Port::try_from(10000).unwrap();
    /// assert_eq!(port.checked_add(3).unwrap().value(), 10003);
    ///
    /// let last = Port::try_from(65535).unwrap();
    /// assert!(last.checked_add(1).is_none());
    /// ```
    #[must_use]
    pub const fn checked_add(self, offset: u16) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidPortError {
                value,
                reason: "port 0 is not bindable".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a number is not a usable port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The rejected value.
    pub value: u16,
    /// Why it was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

/// An inclusive range of ports, walked in ascending order.
///
/// # Examples
///
/// ```
/// use bridgectl::{Port, PortRange};
///
/// let range = PortRange::new(
///     Port::try_from(10000).unwrap(),
///     Port::try_from(10002).unwrap(),
/// ).unwrap();
///
/// assert_eq!(range.len(), 3);
/// let ports: Vec<u16> = range.iter().map(Port::value).collect();
/// assert_eq!(ports, vec![10000, 10001, 10002]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    min: Port,
    max: Port,
}

impl PortRange {
    /// Creates a range from `min` to `max`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is below `min`.
    pub fn new(min: Port, max: Port) -> Result<Self, InvalidPortRangeError> {
        if max < min {
            Err(InvalidPortRangeError {
                min,
                max,
                reason: "max must be greater than or equal to min".into(),
            })
        } else {
            Ok(Self { min, max })
        }
    }

    /// Creates the window of at most `count` ports starting at `start`.
    ///
    /// The window is clamped at [`Port::MAX`], so it may hold fewer than
    /// `count` ports near the top of the port space.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bridgectl::{Port, PortRange};
    ///
    /// let range = PortRange::starting_at(Port::try_from(10000).unwrap(), 1000).unwrap();
    /// assert_eq!(range.max().value(), 10999);
    ///
    /// let clamped = PortRange::starting_at(Port::try_from(65000).unwrap(), 1000).unwrap();
    /// assert_eq!(clamped.max().value(), 65535);
    /// ```
    pub fn starting_at(start: Port, count: u16) -> Result<Self, InvalidPortRangeError> {
        if count == 0 {
            return Err(InvalidPortRangeError {
                min: start,
                max: start,
                reason: "a search window needs at least one port".into(),
            });
        }

        let max = start.checked_add(count - 1).unwrap_or(Port(Port::MAX));
        Self::new(start, max)
    }

    /// Returns the first port of the range.
    #[must_use]
    pub const fn min(&self) -> Port {
        self.min
    }

    /// Returns the last port of the range.
    #[must_use]
    pub const fn max(&self) -> Port {
        self.max
    }

    /// Returns `true` if `port` falls inside the range.
    #[must_use]
    pub const fn contains(&self, port: Port) -> bool {
        port.value() >= self.min.value() && port.value() <= self.max.value()
    }

    /// Returns the number of ports in the range.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.max.value() as u32 - self.min.value() as u32 + 1
    }

    /// Always `false`; a constructed range holds at least one port.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the range in ascending order.
    #[must_use]
    pub fn iter(self) -> PortRangeIter {
        PortRangeIter {
            next: u32::from(self.min.value()),
            end: u32::from(self.max.value()),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl IntoIterator for PortRange {
    type Item = Port;
    type IntoIter = PortRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over a [`PortRange`].
///
/// Counts in `u32` so that a range ending at 65535 terminates cleanly.
#[derive(Debug, Clone)]
pub struct PortRangeIter {
    next: u32,
    end: u32,
}

impl Iterator for PortRangeIter {
    type Item = Port;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let port = u16::try_from(self.next).ok().map(Port)?;
        self.next += 1;
        Some(port)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PortRangeIter {}

/// Error returned when two ports do not form a valid range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortRangeError {
    /// Requested lower bound.
    pub min: Port,
    /// Requested upper bound.
    pub max: Port,
    /// Why the range was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidPortRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid port range {}-{}: {}",
            self.min, self.max, self.reason
        )
    }
}

impl std::error::Error for InvalidPortRangeError {}
