//! Always-on-top crosshair marking the anchor while a position is picked.

use crate::error::CaptureError;
use crate::geometry::Anchor;
use std::sync::{Arc, Mutex};

/// Crosshair window edge length in device pixels.
pub const CROSSHAIR_SIZE: i32 = 32;

/// Top-left corner that centres a `size` x `size` overlay on `point`.
pub fn overlay_origin(point: Anchor, size: i32) -> (i32, i32) {
    let half = size as f64 / 2.0;
    ((point.x - half).round() as i32, (point.y - half).round() as i32)
}

/// Marker shown at the live anchor. It never takes focus and never receives
/// pointer input.
pub trait AnchorOverlay: Send {
    fn show(&mut self, point: Anchor) -> Result<(), CaptureError>;
    fn set_position(&mut self, point: Anchor);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// Overlay that only records what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct NoopAnchorOverlay {
    visible: bool,
    position: Option<Anchor>,
}

impl NoopAnchorOverlay {
    pub fn position(&self) -> Option<Anchor> {
        self.position
    }
}

impl AnchorOverlay for NoopAnchorOverlay {
    fn show(&mut self, point: Anchor) -> Result<(), CaptureError> {
        self.visible = true;
        self.position = Some(point);
        Ok(())
    }

    fn set_position(&mut self, point: Anchor) {
        self.position = Some(point);
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Test overlay whose state is observable through a [`MockOverlayHandle`].
#[derive(Clone, Default)]
pub struct MockAnchorOverlay {
    state: Arc<Mutex<MockOverlayState>>,
}

#[derive(Debug, Default)]
struct MockOverlayState {
    visible: bool,
    position: Option<Anchor>,
    moves: usize,
    fail_show: bool,
}

impl MockAnchorOverlay {
    pub fn new() -> (Self, MockOverlayHandle) {
        let overlay = Self::default();
        let handle = MockOverlayHandle {
            state: Arc::clone(&overlay.state),
        };
        (overlay, handle)
    }
}

impl AnchorOverlay for MockAnchorOverlay {
    fn show(&mut self, point: Anchor) -> Result<(), CaptureError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CaptureError::OverlayUnavailable("lock".into()))?;
        if state.fail_show {
            return Err(CaptureError::OverlayUnavailable("mock refused show".into()));
        }
        state.visible = true;
        state.position = Some(point);
        Ok(())
    }

    fn set_position(&mut self, point: Anchor) {
        if let Ok(mut state) = self.state.lock() {
            state.position = Some(point);
            state.moves += 1;
        }
    }

    fn hide(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.visible = false;
        }
    }

    fn is_visible(&self) -> bool {
        self.state.lock().map(|s| s.visible).unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct MockOverlayHandle {
    state: Arc<Mutex<MockOverlayState>>,
}

impl MockOverlayHandle {
    pub fn is_visible(&self) -> bool {
        self.state.lock().map(|s| s.visible).unwrap_or(false)
    }

    pub fn position(&self) -> Option<Anchor> {
        self.state.lock().ok().and_then(|s| s.position)
    }

    pub fn moves(&self) -> usize {
        self.state.lock().map(|s| s.moves).unwrap_or(0)
    }

    pub fn fail_show(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_show = fail;
        }
    }
}

#[cfg(windows)]
struct OverlayThread {
    hwnd: isize,
    join: std::thread::JoinHandle<()>,
}

/// Layered, click-through crosshair window owned by its own thread.
#[cfg(windows)]
#[derive(Default)]
pub struct CrosshairOverlay {
    thread: Option<OverlayThread>,
    visible: bool,
}

#[cfg(windows)]
impl CrosshairOverlay {
    fn ensure_window(&mut self) -> anyhow::Result<isize> {
        if let Some(th) = &self.thread {
            return Ok(th.hwnd);
        }
        let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<anyhow::Result<isize>>(1);
        let join = std::thread::spawn(move || run_crosshair_window(ready_tx));
        let hwnd = ready_rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .map_err(|_| anyhow::anyhow!("crosshair window did not signal readiness"))??;
        self.thread = Some(OverlayThread { hwnd, join });
        Ok(hwnd)
    }

    fn hwnd(&self) -> Option<windows::Win32::Foundation::HWND> {
        self.thread
            .as_ref()
            .map(|th| windows::Win32::Foundation::HWND(th.hwnd as *mut _))
    }
}

#[cfg(windows)]
fn run_crosshair_window(ready: std::sync::mpsc::SyncSender<anyhow::Result<isize>>) {
    use windows::core::{w, PCWSTR};
    use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM};
    use windows::Win32::Graphics::Gdi::{
        BeginPaint, CreatePen, DeleteObject, EndPaint, FillRect, GetStockObject, LineTo, MoveToEx,
        SelectObject, BLACK_BRUSH, HBRUSH, PAINTSTRUCT, PS_SOLID,
    };
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, PostQuitMessage,
        RegisterClassW, SetLayeredWindowAttributes, TranslateMessage, CS_HREDRAW, CS_VREDRAW,
        HMENU, LWA_COLORKEY, MSG, WM_DESTROY, WM_PAINT, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE,
        WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
    };

    unsafe extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        if msg == WM_PAINT {
            let mut paint = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut paint);
            let rect = RECT {
                left: 0,
                top: 0,
                right: CROSSHAIR_SIZE,
                bottom: CROSSHAIR_SIZE,
            };
            // Black is the colour key, so only the pen strokes stay visible.
            FillRect(hdc, &rect, HBRUSH(GetStockObject(BLACK_BRUSH).0));
            let pen = CreatePen(PS_SOLID, 2, COLORREF(0x002020ff));
            let old = SelectObject(hdc, pen);
            let mid = CROSSHAIR_SIZE / 2;
            let _ = MoveToEx(hdc, mid, 0, None);
            let _ = LineTo(hdc, mid, CROSSHAIR_SIZE);
            let _ = MoveToEx(hdc, 0, mid, None);
            let _ = LineTo(hdc, CROSSHAIR_SIZE, mid);
            SelectObject(hdc, old);
            let _ = DeleteObject(pen);
            let _ = EndPaint(hwnd, &paint);
            return LRESULT(0);
        }
        if msg == WM_DESTROY {
            PostQuitMessage(0);
        }
        DefWindowProcW(hwnd, msg, wparam, lparam)
    }

    unsafe {
        let class_name = w!("AirFolderCrosshair");
        let hinstance = GetModuleHandleW(None).unwrap_or_default();
        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wndproc),
            hInstance: hinstance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };
        let _ = RegisterClassW(&wc);
        let hwnd = match CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE,
            wc.lpszClassName,
            PCWSTR::null(),
            WS_POPUP,
            0,
            0,
            CROSSHAIR_SIZE,
            CROSSHAIR_SIZE,
            None,
            HMENU::default(),
            hinstance,
            None,
        ) {
            Ok(hwnd) if !hwnd.0.is_null() => hwnd,
            Ok(_) => {
                let _ = ready.send(Err(anyhow::anyhow!(windows::core::Error::from_win32())));
                return;
            }
            Err(e) => {
                let _ = ready.send(Err(anyhow::anyhow!(e)));
                return;
            }
        };
        let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 0, LWA_COLORKEY);
        let _ = ready.send(Ok(hwnd.0 as isize));

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0).into() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(windows)]
impl AnchorOverlay for CrosshairOverlay {
    fn show(&mut self, point: Anchor) -> Result<(), CaptureError> {
        use windows::Win32::UI::WindowsAndMessaging::{
            SetWindowPos, HWND_TOPMOST, SWP_ASYNCWINDOWPOS, SWP_NOACTIVATE, SWP_SHOWWINDOW,
        };
        let raw = self
            .ensure_window()
            .map_err(|e| CaptureError::OverlayUnavailable(e.to_string()))?;
        let hwnd = windows::Win32::Foundation::HWND(raw as *mut _);
        let (x, y) = overlay_origin(point, CROSSHAIR_SIZE);
        unsafe {
            SetWindowPos(
                hwnd,
                HWND_TOPMOST,
                x,
                y,
                CROSSHAIR_SIZE,
                CROSSHAIR_SIZE,
                SWP_NOACTIVATE | SWP_SHOWWINDOW | SWP_ASYNCWINDOWPOS,
            )
            .map_err(|e| CaptureError::OverlayUnavailable(e.to_string()))?;
        }
        self.visible = true;
        Ok(())
    }

    fn set_position(&mut self, point: Anchor) {
        use windows::Win32::UI::WindowsAndMessaging::{
            SetWindowPos, HWND_TOPMOST, SWP_ASYNCWINDOWPOS, SWP_NOACTIVATE, SWP_NOSIZE,
        };
        let Some(hwnd) = self.hwnd() else {
            return;
        };
        let (x, y) = overlay_origin(point, CROSSHAIR_SIZE);
        unsafe {
            let _ = SetWindowPos(
                hwnd,
                HWND_TOPMOST,
                x,
                y,
                0,
                0,
                SWP_NOACTIVATE | SWP_NOSIZE | SWP_ASYNCWINDOWPOS,
            );
        }
    }

    fn hide(&mut self) {
        use windows::Win32::UI::WindowsAndMessaging::{ShowWindowAsync, SW_HIDE};
        if let Some(hwnd) = self.hwnd() {
            unsafe {
                let _ = ShowWindowAsync(hwnd, SW_HIDE);
            }
        }
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(windows)]
impl Drop for CrosshairOverlay {
    fn drop(&mut self) {
        if let Some(th) = self.thread.take() {
            unsafe {
                let _ = windows::Win32::UI::WindowsAndMessaging::PostMessageW(
                    windows::Win32::Foundation::HWND(th.hwnd as *mut _),
                    windows::Win32::UI::WindowsAndMessaging::WM_CLOSE,
                    windows::Win32::Foundation::WPARAM(0),
                    windows::Win32::Foundation::LPARAM(0),
                );
            }
            let _ = th.join.join();
        }
    }
}

pub fn default_overlay() -> Box<dyn AnchorOverlay> {
    #[cfg(windows)]
    {
        Box::new(CrosshairOverlay::default())
    }
    #[cfg(not(windows))]
    {
        Box::new(NoopAnchorOverlay::default())
    }
}
