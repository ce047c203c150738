//! Dynamic symbol resolution against the already-loaded host image.
//!
//! Only one platform discovers addresses this way; everywhere else the
//! address table is authoritative.

use crate::address::NativeAddress;

/// The external dynamic symbol resolver.
pub trait SymbolResolver: Send + Sync {
    /// Resolves a mangled symbol to an address, or `None` if the host
    /// image does not export it.
    fn resolve(&self, symbol: &str) -> Option<NativeAddress>;
}

/// Resolver that never finds anything. Default collaborator on platforms
/// that do not use symbol lookup.
#[derive(Debug, Default)]
pub struct NullResolver;

impl SymbolResolver for NullResolver {
    fn resolve(&self, _symbol: &str) -> Option<NativeAddress> {
        None
    }
}

/// Resolver backed by `dlsym` over the process's own image.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct SelfImageResolver;

#[cfg(unix)]
impl SymbolResolver for SelfImageResolver {
    fn resolve(&self, symbol: &str) -> Option<NativeAddress> {
        let name = std::ffi::CString::new(symbol).ok()?;
        // RTLD_DEFAULT searches the images already mapped into this
        // process, which is exactly where the target binary lives.
        let ptr = unsafe { libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr()) };
        if ptr.is_null() {
            None
        } else {
            Some(NativeAddress(ptr as usize))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_resolver() {
        assert!(NullResolver.resolve("_ZN4vane6Widget4tickEv").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_self_image_resolver_finds_libc_symbol() {
        // strlen is exported by every mapped libc; a plain C symbol has no
        // mangling to get wrong.
        let resolver = SelfImageResolver;
        assert!(resolver.resolve("strlen").is_some());
        assert!(resolver.resolve("definitely_not_a_symbol_bindforge").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_self_image_resolver_rejects_interior_nul() {
        let resolver = SelfImageResolver;
        assert!(resolver.resolve("bad\0symbol").is_none());
    }
}
