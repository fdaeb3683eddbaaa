//! Memory protection for secret material
//!
//! Two hardening measures back every buffer that holds a master secret,
//! an encrypted master secret or an intermediate Feistel half:
//!
//! 1. **Core dump prevention**: `setrlimit(RLIMIT_CORE, 0)` so a crash never
//!    writes secret material to disk.
//!
//! 2. **Memory locking**: `mlock()` keeps the pages of a [`SecretBuffer`] out
//!    of swap for as long as the buffer lives.
//!
//! Both are best-effort. Containers and unprivileged users often cannot lock
//! memory, so failures are logged and the buffer is still zeroized on drop.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use zeroize::Zeroize;

static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Set after the first mlock failure so the warning is emitted once.
static MLOCK_WARNED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process.
///
/// Call once, early in `main`. Returns `true` if core dumps are disabled
/// (including when a previous call already did it).
///
/// # Example
/// ```
/// seedshard_core::memory::disable_core_dumps();
/// ```
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        unix::disable_core_dumps_impl()
    }

    #[cfg(not(unix))]
    {
        log::warn!("core dump prevention not supported on this platform");
        false
    }
}

/// A fixed-size byte buffer that is mlocked while alive and zeroized on drop.
///
/// The length is fixed at construction, so the heap allocation never moves
/// and the locked region stays valid. Zeroization runs on every exit path,
/// including early returns through `?` and unwinding.
///
/// # Example
/// ```
/// use seedshard_core::memory::SecretBuffer;
/// let mut buf = SecretBuffer::new(32);
/// buf.as_mut_slice()[..5].copy_from_slice(b"hello");
/// assert_eq!(&buf.as_slice()[..5], b"hello");
/// ```
pub struct SecretBuffer {
    data: Vec<u8>,
    locked: bool,
}

impl SecretBuffer {
    /// Create a zero-filled buffer of `len` bytes and try to lock it.
    pub fn new(len: usize) -> Self {
        let data = vec![0u8; len];
        let locked = if data.is_empty() {
            true
        } else {
            lock_pages(data.as_ptr(), data.len())
        };

        if !locked && !MLOCK_WARNED.swap(true, Ordering::Relaxed) {
            log::warn!("failed to mlock {} bytes, secret pages may be swapped", len);
        }

        Self { data, locked }
    }

    /// Copy `bytes` into a new locked buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = Self::new(bytes.len());
        buf.data.copy_from_slice(bytes);
        buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the pages are actually locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Clone for SecretBuffer {
    fn clone(&self) -> Self {
        Self::from_slice(&self.data)
    }
}

impl PartialEq for SecretBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for SecretBuffer {}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &self.data.len())
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        let len = self.data.len();
        // Zeroize before unlocking
        self.data.zeroize();
        if self.locked && len > 0 {
            unlock_pages(self.data.as_ptr(), len);
        }
    }
}

fn lock_pages(ptr: *const u8, len: usize) -> bool {
    #[cfg(unix)]
    {
        // SAFETY: callers pass a live allocation of at least `len` bytes.
        unsafe { unix::mlock_impl(ptr, len) }
    }

    #[cfg(not(unix))]
    {
        let _ = (ptr, len);
        false
    }
}

fn unlock_pages(ptr: *const u8, len: usize) {
    #[cfg(unix)]
    {
        // SAFETY: same region previously handed to `lock_pages`.
        unsafe {
            unix::munlock_impl(ptr, len);
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (ptr, len);
    }
}

#[cfg(unix)]
mod unix {
    pub fn disable_core_dumps_impl() -> bool {
        // SAFETY: setrlimit with RLIMIT_CORE=0 is a standard POSIX operation
        unsafe {
            let rlim = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            if libc::setrlimit(libc::RLIMIT_CORE, &rlim) != 0 {
                let errno = std::io::Error::last_os_error();
                log::warn!("failed to disable core dumps: {}", errno);
                return false;
            }
        }
        true
    }

    pub unsafe fn mlock_impl(ptr: *const u8, len: usize) -> bool {
        if libc::mlock(ptr as *const libc::c_void, len) != 0 {
            let errno = std::io::Error::last_os_error();
            log::debug!("mlock of {} bytes failed: {}", len, errno);
            return false;
        }
        true
    }

    pub unsafe fn munlock_impl(ptr: *const u8, len: usize) -> bool {
        libc::munlock(ptr as *const libc::c_void, len) == 0
    }
}
