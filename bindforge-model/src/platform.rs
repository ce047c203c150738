//! Target platforms and calling conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target platform a binding set is generated for.
///
/// The platform decides how addresses are discovered at runtime: every
/// platform except [`Platform::Android`] goes through the external address
/// table, while Android resolves non-structor members by mangled name
/// against the already-loaded host image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows (MSVC ABI conventions).
    Windows,
    /// macOS.
    Mac,
    /// iOS.
    Ios,
    /// Android (dynamic symbol lookup platform).
    Android,
}

impl Platform {
    /// All platforms, in a stable order.
    pub const ALL: [Platform; 4] = [
        Platform::Windows,
        Platform::Mac,
        Platform::Ios,
        Platform::Android,
    ];

    /// Returns true if this platform discovers addresses by mangled-symbol
    /// lookup instead of the address table.
    #[must_use]
    pub const fn uses_symbol_lookup(self) -> bool {
        matches!(self, Platform::Android)
    }

    /// Parses a platform from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "windows" | "win" => Some(Self::Windows),
            "mac" | "macos" => Some(Self::Mac),
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            _ => None,
        }
    }

    /// Lowercase platform name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calling convention metadata handed to the trampoline collaborator.
///
/// The non-default conventions only exist on Windows; the target binary
/// there was built with MSVC and uses a mix of `thiscall` member functions
/// and two nonstandard register conventions for specific functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallingConvention {
    /// Platform default C convention.
    Default,
    /// Explicit cdecl.
    Cdecl,
    /// stdcall (Windows).
    Stdcall,
    /// fastcall (Windows).
    Fastcall,
    /// thiscall member convention (Windows).
    Thiscall,
    /// Nonstandard optimized convention used by parts of the target binary
    /// (Windows).
    Optcall,
    /// Nonstandard member variant of [`CallingConvention::Optcall`]
    /// (Windows).
    Membercall,
}

impl CallingConvention {
    /// Returns true if the trampoline can express this convention on the
    /// given platform.
    #[must_use]
    pub const fn supported_on(self, platform: Platform) -> bool {
        match self {
            Self::Default | Self::Cdecl => true,
            Self::Stdcall | Self::Fastcall | Self::Thiscall | Self::Optcall | Self::Membercall => {
                matches!(platform, Platform::Windows)
            }
        }
    }

    /// Variant name as it appears in emitted source.
    #[must_use]
    pub const fn variant_name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Cdecl => "Cdecl",
            Self::Stdcall => "Stdcall",
            Self::Fastcall => "Fastcall",
            Self::Thiscall => "Thiscall",
            Self::Optcall => "Optcall",
            Self::Membercall => "Membercall",
        }
    }
}

impl fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variant_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("windows"), Some(Platform::Windows));
        assert_eq!(Platform::parse("MacOS"), Some(Platform::Mac));
        assert_eq!(Platform::parse("android"), Some(Platform::Android));
        assert_eq!(Platform::parse("amiga"), None);
    }

    #[test]
    fn test_symbol_lookup_platform() {
        assert!(Platform::Android.uses_symbol_lookup());
        assert!(!Platform::Windows.uses_symbol_lookup());
        assert!(!Platform::Mac.uses_symbol_lookup());
        assert!(!Platform::Ios.uses_symbol_lookup());
    }

    #[test]
    fn test_convention_support() {
        assert!(CallingConvention::Thiscall.supported_on(Platform::Windows));
        assert!(!CallingConvention::Thiscall.supported_on(Platform::Android));
        assert!(!CallingConvention::Optcall.supported_on(Platform::Mac));
        for platform in Platform::ALL {
            assert!(CallingConvention::Cdecl.supported_on(platform));
            assert!(CallingConvention::Default.supported_on(platform));
        }
    }
}
