//! The machine being compiled for.
//!
//! Only the parts the front end consumes live here: which architecture, and how
//! wide its machine word is. Integer literals are range checked against the word.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

/// A supported target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TargetArch {
    /// 32-bit x86
    X86,
    /// 64-bit x86-64
    X86_64,
}

impl TargetArch {
    /// The architecture this compiler was built for, falling back to x86-64
    pub fn detect() -> Self {
        if cfg!(target_arch = "x86") {
            TargetArch::X86
        } else if cfg!(target_arch = "x86_64") {
            TargetArch::X86_64
        } else {
            tracing::warn!(
                "unable to detect a supported host architecture, defaulting to {}",
                TargetArch::X86_64
            );
            TargetArch::X86_64
        }
    }

    /// Size of a machine word in bytes
    pub fn word_size(&self) -> usize {
        match self {
            TargetArch::X86 => 4,
            TargetArch::X86_64 => 8,
        }
    }

    /// The name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            TargetArch::X86 => "x86",
            TargetArch::X86_64 => "x86-64",
        }
    }
}

impl Display for TargetArch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an architecture name isn't recognized
#[derive(Debug, Error)]
#[error("unsupported target architecture {0:?}, use x86 or x86-64")]
pub struct UnknownTargetError(pub String);

impl FromStr for TargetArch {
    type Err = UnknownTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetArch::iter()
            .find(|arch| arch.name() == s)
            .ok_or_else(|| UnknownTargetError(s.to_string()))
    }
}

/// What the front end knows about its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    arch: TargetArch,
    word_size: usize,
}

impl TargetInfo {
    /// Creates target info for an architecture
    pub fn new(arch: TargetArch) -> Self {
        Self {
            arch,
            word_size: arch.word_size(),
        }
    }

    /// Target info for the host
    pub fn host() -> Self {
        Self::new(TargetArch::detect())
    }

    pub fn arch(&self) -> TargetArch {
        self.arch
    }

    /// Word size in bytes
    pub fn word_size(&self) -> usize {
        self.word_size
    }

    /// Largest signed integer representable in one machine word
    pub fn max_word_value(&self) -> i64 {
        match self.word_size {
            4 => i32::MAX as i64,
            _ => i64::MAX,
        }
    }
}

impl Default for TargetInfo {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parse_arch_names() {
        assert_eq!("x86".parse::<TargetArch>().unwrap(), TargetArch::X86);
        assert_eq!("x86-64".parse::<TargetArch>().unwrap(), TargetArch::X86_64);
        assert!("arm".parse::<TargetArch>().is_err());
        assert!("x86_64".parse::<TargetArch>().is_err());
    }

    #[test]
    fn word_sizes() {
        assert_eq!(TargetInfo::new(TargetArch::X86).word_size(), 4);
        assert_eq!(TargetInfo::new(TargetArch::X86_64).word_size(), 8);
        assert_eq!(
            TargetInfo::new(TargetArch::X86).max_word_value(),
            2147483647
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for arch in TargetArch::iter() {
            assert_eq!(arch.to_string().parse::<TargetArch>().unwrap(), arch);
        }
    }
}
