//! Device configuration, addressing, and validation.
//!
//! [`DeviceConfig`] names the instance, carries its device number and sizes
//! its buffer. [`validate()`](DeviceConfig::validate) checks the values a
//! host would refuse at registration time; no number is allocated here.

use std::error::Error;
use std::fmt;

use globalmem_core::BufferConfig;

// ── DeviceNumber ───────────────────────────────────────────────────

/// Major/minor pair identifying a character device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceNumber {
    /// Driver-level number, shared by every minor of the driver.
    pub major: u32,
    /// Instance number within the driver.
    pub minor: u32,
}

impl DeviceNumber {
    /// Width of the minor field in an encoded number.
    pub const MINOR_BITS: u32 = 20;
    /// Largest representable major (12 bits).
    pub const MAX_MAJOR: u32 = (1 << 12) - 1;
    /// Largest representable minor.
    pub const MAX_MINOR: u32 = (1 << Self::MINOR_BITS) - 1;

    /// Build a device number.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Pack into the kernel-internal `major << 20 | minor` layout.
    ///
    /// Out-of-range fields are masked; call
    /// [`DeviceConfig::validate`] first to reject them.
    pub const fn encode(self) -> u32 {
        ((self.major & Self::MAX_MAJOR) << Self::MINOR_BITS) | (self.minor & Self::MAX_MINOR)
    }

    /// Unpack an encoded number.
    pub const fn decode(raw: u32) -> Self {
        Self {
            major: raw >> Self::MINOR_BITS,
            minor: raw & Self::MAX_MINOR,
        }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

// ── DeviceConfig ───────────────────────────────────────────────────

/// Everything needed to bring up a [`Device`](crate::Device).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Node name the host exposes the device under. Default: `"globalmem"`.
    pub name: String,
    /// Device number. Default: 230:0.
    pub number: DeviceNumber,
    /// Backing buffer parameters. Default: 4096 bytes.
    pub buffer: BufferConfig,
}

impl DeviceConfig {
    /// Default node name.
    pub const DEFAULT_NAME: &'static str = "globalmem";

    /// Default (statically assigned) major number.
    pub const DEFAULT_MAJOR: u32 = 230;

    /// Default config with a different buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BufferConfig::new(capacity),
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.name.contains(['/', '\0']) {
            return Err(ConfigError::InvalidName {
                name: self.name.clone(),
            });
        }
        if self.number.major > DeviceNumber::MAX_MAJOR {
            return Err(ConfigError::MajorOutOfRange {
                major: self.number.major,
            });
        }
        if self.number.minor > DeviceNumber::MAX_MINOR {
            return Err(ConfigError::MinorOutOfRange {
                minor: self.number.minor,
            });
        }
        if self.buffer.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_owned(),
            number: DeviceNumber::new(Self::DEFAULT_MAJOR, 0),
            buffer: BufferConfig::default(),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`DeviceConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The node name is empty.
    EmptyName,
    /// The node name contains `/` or NUL.
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// Major number does not fit in 12 bits.
    MajorOutOfRange {
        /// The configured major.
        major: u32,
    },
    /// Minor number does not fit in 20 bits.
    MinorOutOfRange {
        /// The configured minor.
        minor: u32,
    },
    /// Buffer capacity is zero.
    ZeroCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "device name is empty"),
            Self::InvalidName { name } => {
                write!(f, "device name {name:?} contains '/' or NUL")
            }
            Self::MajorOutOfRange { major } => {
                write!(f, "major {major} exceeds {}", DeviceNumber::MAX_MAJOR)
            }
            Self::MinorOutOfRange { minor } => {
                write!(f, "minor {minor} exceeds {}", DeviceNumber::MAX_MINOR)
            }
            Self::ZeroCapacity => write!(f, "buffer capacity must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_device() {
        let config = DeviceConfig::default();
        assert_eq!(config.name, "globalmem");
        assert_eq!(config.number, DeviceNumber::new(230, 0));
        assert_eq!(config.buffer.capacity, 0x1000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn encode_matches_mkdev_layout() {
        let n = DeviceNumber::new(230, 0);
        assert_eq!(n.encode(), 230 << 20);
        assert_eq!(DeviceNumber::decode(n.encode()), n);
        assert_eq!(DeviceNumber::decode(DeviceNumber::new(1, 3).encode()).minor, 3);
        assert_eq!(n.to_string(), "230:0");
    }

    #[test]
    fn validate_rejects_bad_names() {
        let mut config = DeviceConfig::default();
        config.name.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));

        config.name = "dev/globalmem".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidName { .. })
        ));
    }

    #[test]
    fn validate_rejects_wide_numbers() {
        let mut config = DeviceConfig::default();
        config.number.major = 4096;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MajorOutOfRange { major: 4096 })
        );

        let mut config = DeviceConfig::default();
        config.number.minor = 1 << 20;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MinorOutOfRange { minor: 1 << 20 })
        );
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let config = DeviceConfig::with_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }
}
