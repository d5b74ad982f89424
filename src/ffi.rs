//! C FFI layer for leapsdk.
//!
//! Provides an opaque handle-based API for C/C++ hosts.
//! The generated C header is written to `include/leapsdk.h` by cbindgen.

use crate::callback::CallbackId;
use crate::device::Device;
use crate::error::LastError;
use crate::synthetic::SyntheticDriver;
use crate::types::{Finger, Frame, Hand};
use crate::LeapError;
use std::ffi::{c_char, c_int, c_void};

thread_local! {
    /// Last error message for C consumers, one per calling thread.
    static LAST_ERROR: LastError = const { LastError::new() };
}

fn set_last_error(err: &LeapError) {
    LAST_ERROR.with(|last| last.set(err));
}

/// Opaque device handle for C consumers.
pub struct LsDevice(Device);

/// Opaque frame handle. Only valid for the duration of a callback.
pub struct LsFrame(Frame);

/// Frame callback. `frame` is only valid until the callback returns.
pub type LsFrameCallback = extern "C" fn(user_data: *mut c_void, frame: *const LsFrame);

/// Hand data in C-compatible layout.
#[repr(C)]
pub struct LsHand {
    pub id: i32,
    /// Palm position [x, y, z] in millimeters.
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub normal: [f32; 3],
    pub velocity: [f32; 3],
    pub ball_position: [f32; 3],
    pub ball_radius: f32,
    pub finger_count: u32,
}

/// Finger data in C-compatible layout.
#[repr(C)]
pub struct LsFinger {
    pub id: i32,
    /// Tip position [x, y, z] in millimeters.
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub velocity: [f32; 3],
    pub length: f32,
    pub width: f32,
    pub is_tool: bool,
}

/// Host context pointer handed back to a C callback.
struct UserData(*mut c_void);

// SAFETY: the pointer is never dereferenced on the Rust side. Callers of
// `ls_device_add_callback` promise it may be used from the update thread.
unsafe impl Send for UserData {}

impl UserData {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

fn hand_to_c(id: i32, hand: &Hand) -> LsHand {
    LsHand {
        id,
        position: hand.position().into(),
        direction: hand.direction().into(),
        normal: hand.normal().into(),
        velocity: hand.velocity().into(),
        ball_position: hand.ball_position().into(),
        ball_radius: hand.ball_radius(),
        finger_count: hand.fingers().len() as u32,
    }
}

fn finger_to_c(id: i32, finger: &Finger) -> LsFinger {
    LsFinger {
        id,
        position: finger.position().into(),
        direction: finger.direction().into(),
        velocity: finger.velocity().into(),
        length: finger.length(),
        width: finger.width(),
        is_tool: finger.is_tool(),
    }
}

fn nth_hand(frame: &Frame, index: usize) -> Result<(i32, &Hand), LeapError> {
    frame
        .hands()
        .iter()
        .nth(index)
        .map(|(&id, hand)| (id, hand))
        .ok_or(LeapError::IndexOutOfRange {
            index,
            len: frame.hands().len(),
        })
}

/// Create a device backed by the synthetic sensor (configured from
/// `LEAPSDK_SYNTH_*` environment variables).
#[no_mangle]
pub extern "C" fn ls_device_create() -> *mut LsDevice {
    let device = Device::create(SyntheticDriver::from_env());
    Box::into_raw(Box::new(LsDevice(device)))
}

/// Close a device and free its resources.
///
/// # Safety
/// `dev` must be a pointer returned by `ls_device_create`, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_device_destroy(dev: *mut LsDevice) {
    if !dev.is_null() {
        drop(Box::from_raw(dev));
    }
}

/// Deliver the newest frame to all callbacks. Call once per host loop tick.
///
/// # Safety
/// `dev` must be a valid device pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_device_update(dev: *mut LsDevice) {
    if let Some(dev) = dev.as_mut() {
        dev.0.update();
    }
}

/// # Safety
/// `dev` must be a valid device pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_device_is_connected(dev: *const LsDevice) -> bool {
    dev.as_ref().map(|d| d.0.is_connected()).unwrap_or(false)
}

/// # Safety
/// `dev` must be a valid device pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_device_is_initialized(dev: *const LsDevice) -> bool {
    dev.as_ref().map(|d| d.0.is_initialized()).unwrap_or(false)
}

/// Number of frames replaced before an update picked them up.
///
/// # Safety
/// `dev` must be a valid device pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_device_dropped_frames(dev: *const LsDevice) -> u64 {
    dev.as_ref().map(|d| d.0.dropped_frames()).unwrap_or(0)
}

/// Register a frame callback. Returns its id, or 0 on error.
///
/// # Safety
/// `dev` must be a valid device pointer, or null. `user_data` must stay
/// valid, and usable from the thread calling `ls_device_update`, until
/// the callback is removed or the device destroyed.
#[no_mangle]
pub unsafe extern "C" fn ls_device_add_callback(
    dev: *mut LsDevice,
    callback: Option<LsFrameCallback>,
    user_data: *mut c_void,
) -> u64 {
    let Some(dev) = dev.as_mut() else {
        set_last_error(&LeapError::NullPointer("dev"));
        return 0;
    };
    let Some(callback) = callback else {
        set_last_error(&LeapError::NullPointer("callback"));
        return 0;
    };

    let user_data = UserData(user_data);
    let id = dev.0.add_callback(move |frame| {
        let frame = LsFrame(frame);
        callback(user_data.get(), &frame);
    });
    id.0
}

/// Remove a frame callback. Unknown ids are ignored.
///
/// # Safety
/// `dev` must be a valid device pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_device_remove_callback(dev: *mut LsDevice, id: u64) {
    if let Some(dev) = dev.as_mut() {
        dev.0.remove_callback(CallbackId(id));
    }
}

/// # Safety
/// `frame` must be the pointer passed to a running callback, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_frame_id(frame: *const LsFrame) -> i64 {
    frame.as_ref().map(|f| f.0.id()).unwrap_or(0)
}

/// Capture time in microseconds.
///
/// # Safety
/// `frame` must be the pointer passed to a running callback, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_frame_timestamp(frame: *const LsFrame) -> i64 {
    frame.as_ref().map(|f| f.0.timestamp()).unwrap_or(0)
}

/// # Safety
/// `frame` must be the pointer passed to a running callback, or null.
#[no_mangle]
pub unsafe extern "C" fn ls_frame_hand_count(frame: *const LsFrame) -> c_int {
    frame.as_ref().map(|f| f.0.hands().len() as c_int).unwrap_or(0)
}

/// Copy the hand at `index` (ascending hand id order) into `out`.
/// Returns 0 on success, -1 on error (check `ls_last_error()`).
///
/// # Safety
/// `frame` must be the pointer passed to a running callback, or null.
/// `out` must point to a writable `LsHand`, or be null.
#[no_mangle]
pub unsafe extern "C" fn ls_frame_hand(frame: *const LsFrame, index: c_int, out: *mut LsHand) -> c_int {
    let Some(frame) = frame.as_ref() else {
        set_last_error(&LeapError::NullPointer("frame"));
        return -1;
    };
    if out.is_null() {
        set_last_error(&LeapError::NullPointer("out"));
        return -1;
    }

    match nth_hand(&frame.0, usize::try_from(index).unwrap_or(usize::MAX)) {
        Ok((id, hand)) => {
            out.write(hand_to_c(id, hand));
            0
        }
        Err(e) => {
            set_last_error(&e);
            -1
        }
    }
}

/// Copy finger `finger_index` (ascending finger id order) of hand
/// `hand_index` into `out`. Returns 0 on success, -1 on error.
///
/// # Safety
/// `frame` must be the pointer passed to a running callback, or null.
/// `out` must point to a writable `LsFinger`, or be null.
#[no_mangle]
pub unsafe extern "C" fn ls_frame_finger(
    frame: *const LsFrame,
    hand_index: c_int,
    finger_index: c_int,
    out: *mut LsFinger,
) -> c_int {
    let Some(frame) = frame.as_ref() else {
        set_last_error(&LeapError::NullPointer("frame"));
        return -1;
    };
    if out.is_null() {
        set_last_error(&LeapError::NullPointer("out"));
        return -1;
    }

    let finger = nth_hand(&frame.0, usize::try_from(hand_index).unwrap_or(usize::MAX)).and_then(|(_, hand)| {
        let index = usize::try_from(finger_index).unwrap_or(usize::MAX);
        hand.fingers()
            .iter()
            .nth(index)
            .ok_or(LeapError::IndexOutOfRange {
                index,
                len: hand.fingers().len(),
            })
    });

    match finger {
        Ok((&id, finger)) => {
            out.write(finger_to_c(id, finger));
            0
        }
        Err(e) => {
            set_last_error(&e);
            -1
        }
    }
}

/// Get the last error raised on the calling thread. Returns NULL if none.
/// The returned pointer is valid until the next leapsdk API call that
/// fails on the same thread.
#[no_mangle]
pub extern "C" fn ls_last_error() -> *const c_char {
    LAST_ERROR.with(|last| last.as_ptr())
}

/// Reset the calling thread's last error message.
#[no_mangle]
pub extern "C" fn ls_clear_error() {
    LAST_ERROR.with(|last| last.clear());
}
