//! Hiding the system pointer while the crosshair stands in for it.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

pub trait CursorControl: Send {
    fn hide(&mut self) -> anyhow::Result<()>;
    fn show(&mut self) -> anyhow::Result<()>;
}

/// Swaps the common system cursors for a blank one and reloads the user's
/// cursor scheme to restore them.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct SystemCursor;

#[cfg(windows)]
impl CursorControl for SystemCursor {
    fn hide(&mut self) -> anyhow::Result<()> {
        use windows::Win32::System::LibraryLoader::GetModuleHandleW;
        use windows::Win32::UI::WindowsAndMessaging::{
            CreateCursor, SetSystemCursor, OCR_HAND, OCR_IBEAM, OCR_NORMAL,
        };

        const SIDE: i32 = 32;
        let and_plane = [0xFFu8; (SIDE * SIDE / 8) as usize];
        let xor_plane = [0x00u8; (SIDE * SIDE / 8) as usize];
        let hinstance = unsafe { GetModuleHandleW(None)? };
        for (swapped, id) in [OCR_NORMAL, OCR_IBEAM, OCR_HAND].into_iter().enumerate() {
            // SetSystemCursor takes ownership of the handle, so each id gets its own.
            let result = unsafe {
                CreateCursor(
                    hinstance,
                    0,
                    0,
                    SIDE,
                    SIDE,
                    and_plane.as_ptr() as *const _,
                    xor_plane.as_ptr() as *const _,
                )
                .and_then(|blank| SetSystemCursor(blank, id))
            };
            if let Err(err) = result {
                if swapped > 0 {
                    let _ = self.show();
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn show(&mut self) -> anyhow::Result<()> {
        use windows::Win32::UI::WindowsAndMessaging::{
            SystemParametersInfoW, SPI_SETCURSORS, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
        };
        unsafe {
            SystemParametersInfoW(SPI_SETCURSORS, 0, None, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0))?;
        }
        Ok(())
    }
}

#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct SystemCursor;

#[cfg(not(windows))]
impl CursorControl for SystemCursor {
    fn hide(&mut self) -> anyhow::Result<()> {
        anyhow::bail!("hiding the system cursor is not supported on this platform")
    }

    fn show(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Cursor stand-in that keeps a display counter like `ShowCursor` does.
#[derive(Clone, Default)]
pub struct MockCursor {
    state: Arc<MockCursorState>,
}

#[derive(Default)]
struct MockCursorState {
    display_count: AtomicI32,
    hide_calls: AtomicUsize,
    show_calls: AtomicUsize,
    fail_hide: AtomicBool,
}

impl MockCursor {
    pub fn new() -> (Self, MockCursorHandle) {
        let cursor = Self::default();
        let handle = MockCursorHandle {
            state: Arc::clone(&cursor.state),
        };
        (cursor, handle)
    }
}

impl CursorControl for MockCursor {
    fn hide(&mut self) -> anyhow::Result<()> {
        self.state.hide_calls.fetch_add(1, Ordering::SeqCst);
        self.state.display_count.fetch_sub(1, Ordering::SeqCst);
        if self.state.fail_hide.load(Ordering::SeqCst) {
            anyhow::bail!("mock cursor hidden only partly");
        }
        Ok(())
    }

    fn show(&mut self) -> anyhow::Result<()> {
        self.state.show_calls.fetch_add(1, Ordering::SeqCst);
        self.state.display_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone)]
pub struct MockCursorHandle {
    state: Arc<MockCursorState>,
}

impl MockCursorHandle {
    /// Zero means the cursor is in its original state.
    pub fn display_count(&self) -> i32 {
        self.state.display_count.load(Ordering::SeqCst)
    }

    pub fn hide_calls(&self) -> usize {
        self.state.hide_calls.load(Ordering::SeqCst)
    }

    pub fn show_calls(&self) -> usize {
        self.state.show_calls.load(Ordering::SeqCst)
    }

    /// Make `hide` change the cursor and then report an error.
    pub fn fail_hide(&self, fail: bool) {
        self.state.fail_hide.store(fail, Ordering::SeqCst);
    }
}
