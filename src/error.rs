use std::cell::RefCell;
use std::fmt;

/// Errors raised by drivers and the C FFI layer.
///
/// The frame handoff itself never fails: connectivity problems show up
/// as `Device::is_connected() == false`, not as an error value.
#[derive(Debug, thiserror::Error)]
pub enum LeapError {
    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Driver already attached to a listener")]
    AlreadyAttached,

    #[error("Failed to spawn driver thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Event channel full, event dropped")]
    ChannelFull,

    #[error("Event channel disconnected")]
    ChannelDisconnected,

    #[error("Null pointer passed as `{0}`")]
    NullPointer(&'static str),

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Last-error storage for the C FFI layer.
///
/// Meant to live in a `thread_local!`: the pointer from `as_ptr` stays
/// valid until the same thread calls `set` or `clear` again.
pub(crate) struct LastError {
    message: RefCell<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: RefCell::new(String::new()),
        }
    }

    pub fn set(&self, err: &LeapError) {
        *self.message.borrow_mut() = fmt::format(format_args!("{}\0", err));
    }

    pub fn clear(&self) {
        self.message.borrow_mut().clear();
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        let msg = self.message.borrow();
        if msg.is_empty() {
            std::ptr::null()
        } else {
            msg.as_ptr() as *const std::ffi::c_char
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_last_error_roundtrip() {
        let last = LastError::new();
        assert!(last.as_ptr().is_null());

        last.set(&LeapError::IndexOutOfRange { index: 3, len: 2 });
        let msg = unsafe { CStr::from_ptr(last.as_ptr()) };
        assert_eq!(msg.to_str().unwrap(), "Index 3 out of range (len 2)");

        last.clear();
        assert!(last.as_ptr().is_null());
    }
}
