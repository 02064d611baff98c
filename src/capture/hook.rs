//! Low-level pointer and keyboard hooks used while picking an anchor.

use crate::error::CaptureError;
use crate::geometry::Anchor;
#[cfg(windows)]
use anyhow::anyhow;
#[cfg(windows)]
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureEvent {
    PointerMoved(Anchor),
    PointerConfirmed(Anchor),
    Cancelled,
}

/// Wakes the UI thread after an event was queued.
pub type UiWaker = Arc<dyn Fn() + Send + Sync>;

/// Delivery end of a capture session, handed to the hook backend.
#[derive(Clone)]
pub struct CaptureSink {
    sender: Sender<CaptureEvent>,
    waker: Option<UiWaker>,
}

impl CaptureSink {
    pub fn new(sender: Sender<CaptureEvent>, waker: Option<UiWaker>) -> Self {
        Self { sender, waker }
    }

    /// Queue `event` for the UI thread. Returns `false` once the receiving
    /// side is gone.
    pub fn send(&self, event: CaptureEvent) -> bool {
        let delivered = self.sender.send(event).is_ok();
        if let Some(wake) = &self.waker {
            wake();
        }
        delivered
    }
}

pub trait CaptureHookBackend: Send {
    fn install(&mut self, sink: CaptureSink) -> Result<(), CaptureError>;
    fn uninstall(&mut self);
    fn is_installed(&self) -> bool;
}

#[cfg(windows)]
struct HookThread {
    thread_id: u32,
    join: std::thread::JoinHandle<()>,
}

/// Global pointer + keyboard hooks running on a dedicated message-loop thread.
#[cfg(windows)]
#[derive(Default)]
pub struct DefaultCaptureHookBackend {
    hook_thread: Option<HookThread>,
}

#[cfg(windows)]
impl CaptureHookBackend for DefaultCaptureHookBackend {
    fn install(&mut self, sink: CaptureSink) -> Result<(), CaptureError> {
        if self.hook_thread.is_some() {
            return Ok(());
        }

        hook_dispatch().set_sink(Some(sink));
        hook_dispatch().enabled.store(true, Ordering::Release);

        match spawn_hook_thread() {
            Ok(thread) => {
                self.hook_thread = Some(thread);
                Ok(())
            }
            Err(err) => {
                hook_dispatch().enabled.store(false, Ordering::Release);
                hook_dispatch().set_sink(None);
                Err(CaptureError::HookInstallationFailed(err.to_string()))
            }
        }
    }

    fn uninstall(&mut self) {
        hook_dispatch().enabled.store(false, Ordering::Release);
        hook_dispatch().set_sink(None);

        if let Some(th) = self.hook_thread.take() {
            use windows::Win32::Foundation::{LPARAM, WPARAM};
            use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};
            unsafe {
                let _ = PostThreadMessageW(th.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
            let _ = th.join.join();
            tracing::debug!("capture hooks removed");
        }
    }

    fn is_installed(&self) -> bool {
        self.hook_thread.is_some()
    }
}

/// Install the mouse hook, then the keyboard hook. When the keyboard hook
/// fails the mouse hook is removed again, so either both are in place or
/// neither is.
fn install_hook_pair<H, E>(
    install_mouse: impl FnOnce() -> Result<H, E>,
    install_keyboard: impl FnOnce() -> Result<H, E>,
    unhook: impl FnOnce(H),
) -> Result<(H, H), E> {
    let mouse = install_mouse()?;
    match install_keyboard() {
        Ok(keyboard) => Ok((mouse, keyboard)),
        Err(err) => {
            unhook(mouse);
            Err(err)
        }
    }
}

#[cfg(windows)]
fn hook_handle(
    result: windows::core::Result<windows::Win32::UI::WindowsAndMessaging::HHOOK>,
) -> anyhow::Result<windows::Win32::UI::WindowsAndMessaging::HHOOK> {
    match result {
        Ok(h) if !h.0.is_null() => Ok(h),
        Ok(_) => Err(anyhow!(windows::core::Error::from_win32())),
        Err(e) => Err(anyhow!(e)),
    }
}

#[cfg(windows)]
fn spawn_hook_thread() -> anyhow::Result<HookThread> {
    use std::time::Duration;
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, PeekMessageW, SetWindowsHookExW, TranslateMessage,
        UnhookWindowsHookEx, MSG, PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL,
    };

    let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<anyhow::Result<u32>>(1);

    let join = std::thread::spawn(move || {
        let mut msg = MSG::default();
        unsafe {
            let _ = PeekMessageW(&mut msg, None, 0, 0, PM_NOREMOVE);
        }
        let thread_id = unsafe { GetCurrentThreadId() };

        let hmodule = match unsafe { GetModuleHandleW(None) } {
            Ok(h) => h,
            Err(e) => {
                let _ = ready_tx.send(Err(anyhow!(e)));
                return;
            }
        };

        let hooks = install_hook_pair(
            || hook_handle(unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), hmodule, 0) }),
            || {
                hook_handle(unsafe {
                    SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), hmodule, 0)
                })
            },
            |hook| unsafe {
                let _ = UnhookWindowsHookEx(hook);
            },
        );
        let (mouse_hook, keyboard_hook) = match hooks {
            Ok(pair) => pair,
            Err(err) => {
                let _ = ready_tx.send(Err(err));
                return;
            }
        };

        let _ = ready_tx.send(Ok(thread_id));

        loop {
            let r = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            if r.0 == 0 || r.0 == -1 {
                break;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        unsafe {
            let _ = UnhookWindowsHookEx(mouse_hook);
            let _ = UnhookWindowsHookEx(keyboard_hook);
        }
    });

    let thread_id = ready_rx
        .recv_timeout(Duration::from_secs(2))
        .map_err(|_| anyhow!("hook thread did not signal readiness"))??;

    Ok(HookThread { thread_id, join })
}

/// Shared state between the hook procedures and the backend.
#[cfg_attr(not(windows), allow(dead_code))]
struct HookDispatch {
    enabled: AtomicBool,
    sink: Mutex<Option<CaptureSink>>,
}

#[cfg_attr(not(windows), allow(dead_code))]
impl HookDispatch {
    fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            sink: Mutex::new(None),
        }
    }

    fn set_sink(&self, sink: Option<CaptureSink>) {
        if let Ok(mut guard) = self.sink.lock() {
            *guard = sink;
        }
    }

    /// Waits for the sink lock; a confirm or cancel must never be lost.
    fn forward(&self, event: CaptureEvent) {
        if let Ok(guard) = self.sink.lock() {
            if let Some(sink) = guard.as_ref() {
                let _ = sink.send(event);
            }
        }
    }
}

#[cfg(windows)]
static HOOK_DISPATCH: OnceCell<HookDispatch> = OnceCell::new();

#[cfg(windows)]
fn hook_dispatch() -> &'static HookDispatch {
    HOOK_DISPATCH.get_or_init(HookDispatch::new)
}

#[cfg(windows)]
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: windows::Win32::Foundation::WPARAM,
    l_param: windows::Win32::Foundation::LPARAM,
) -> windows::Win32::Foundation::LRESULT {
    use windows::Win32::Foundation::LRESULT;
    use windows::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, HC_ACTION, HHOOK, MSLLHOOKSTRUCT, WM_LBUTTONDOWN, WM_MOUSEMOVE,
    };

    if n_code == HC_ACTION as i32 {
        let msg = w_param.0 as u32;
        let dispatch = hook_dispatch();

        if dispatch.enabled.load(Ordering::Acquire) {
            let info = &*(l_param.0 as *const MSLLHOOKSTRUCT);
            let point = Anchor::new(info.pt.x as f64, info.pt.y as f64);
            if msg == WM_MOUSEMOVE {
                dispatch.forward(CaptureEvent::PointerMoved(point));
            } else if msg == WM_LBUTTONDOWN {
                // Nothing after the confirm is forwarded.
                dispatch.enabled.store(false, Ordering::Release);
                dispatch.forward(CaptureEvent::PointerConfirmed(point));
                return LRESULT(1);
            }
        }
    }

    CallNextHookEx(HHOOK(std::ptr::null_mut()), n_code, w_param, l_param)
}

#[cfg(windows)]
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: windows::Win32::Foundation::WPARAM,
    l_param: windows::Win32::Foundation::LPARAM,
) -> windows::Win32::Foundation::LRESULT {
    use windows::Win32::Foundation::LRESULT;
    use windows::Win32::UI::Input::KeyboardAndMouse::VK_ESCAPE;
    use windows::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, WM_KEYDOWN, WM_SYSKEYDOWN,
    };

    if n_code == HC_ACTION as i32 {
        let msg = w_param.0 as u32;
        if msg == WM_KEYDOWN || msg == WM_SYSKEYDOWN {
            let info = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
            let dispatch = hook_dispatch();
            if info.vkCode == VK_ESCAPE.0 as u32 && dispatch.enabled.load(Ordering::Acquire) {
                dispatch.enabled.store(false, Ordering::Release);
                dispatch.forward(CaptureEvent::Cancelled);
                return LRESULT(1);
            }
        }
    }

    CallNextHookEx(HHOOK(std::ptr::null_mut()), n_code, w_param, l_param)
}

#[cfg(not(windows))]
#[derive(Default)]
pub struct DefaultCaptureHookBackend;

#[cfg(not(windows))]
impl CaptureHookBackend for DefaultCaptureHookBackend {
    fn install(&mut self, _sink: CaptureSink) -> Result<(), CaptureError> {
        Err(CaptureError::HookInstallationFailed(
            "global input hooks are not supported on this platform".into(),
        ))
    }

    fn uninstall(&mut self) {}

    fn is_installed(&self) -> bool {
        false
    }
}

/// In-memory backend for tests. Tracks the mouse and keyboard hooks
/// separately so a half-finished install is observable.
#[derive(Clone)]
pub struct MockCaptureHookBackend {
    state: Arc<MockHookState>,
}

#[derive(Default)]
struct MockHookState {
    install_count: AtomicUsize,
    uninstall_count: AtomicUsize,
    mouse_hook_installs: AtomicUsize,
    mouse_hook: AtomicBool,
    keyboard_hook: AtomicBool,
    fail_install: AtomicBool,
    fail_keyboard: AtomicBool,
    sink: Mutex<Option<CaptureSink>>,
}

impl MockCaptureHookBackend {
    pub fn new() -> (Self, MockCaptureHandle) {
        let state = Arc::new(MockHookState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockCaptureHandle { state },
        )
    }
}

impl CaptureHookBackend for MockCaptureHookBackend {
    fn install(&mut self, sink: CaptureSink) -> Result<(), CaptureError> {
        let state = &self.state;
        let mut guard = state
            .sink
            .lock()
            .map_err(|_| CaptureError::HookInstallationFailed("lock".into()))?;
        if guard.is_some() {
            return Ok(());
        }
        install_hook_pair(
            || {
                if state.fail_install.load(Ordering::SeqCst) {
                    return Err(CaptureError::HookInstallationFailed(
                        "mock refused mouse hook".into(),
                    ));
                }
                state.mouse_hook_installs.fetch_add(1, Ordering::SeqCst);
                state.mouse_hook.store(true, Ordering::SeqCst);
                Ok(())
            },
            || {
                if state.fail_keyboard.load(Ordering::SeqCst) {
                    return Err(CaptureError::HookInstallationFailed(
                        "mock refused keyboard hook".into(),
                    ));
                }
                state.keyboard_hook.store(true, Ordering::SeqCst);
                Ok(())
            },
            |()| state.mouse_hook.store(false, Ordering::SeqCst),
        )?;
        state.install_count.fetch_add(1, Ordering::SeqCst);
        *guard = Some(sink);
        Ok(())
    }

    fn uninstall(&mut self) {
        if let Ok(mut guard) = self.state.sink.lock() {
            if guard.take().is_some() {
                self.state.mouse_hook.store(false, Ordering::SeqCst);
                self.state.keyboard_hook.store(false, Ordering::SeqCst);
                self.state.uninstall_count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn is_installed(&self) -> bool {
        match self.state.sink.lock() {
            Ok(guard) => guard.is_some(),
            Err(_) => false,
        }
    }
}

#[derive(Clone)]
pub struct MockCaptureHandle {
    state: Arc<MockHookState>,
}

impl MockCaptureHandle {
    pub fn install_count(&self) -> usize {
        self.state.install_count.load(Ordering::SeqCst)
    }

    pub fn uninstall_count(&self) -> usize {
        self.state.uninstall_count.load(Ordering::SeqCst)
    }

    /// Number of times the mouse hook went in, including installs that were
    /// rolled back.
    pub fn mouse_hook_installs(&self) -> usize {
        self.state.mouse_hook_installs.load(Ordering::SeqCst)
    }

    /// Hooks currently registered.
    pub fn installed_hooks(&self) -> usize {
        usize::from(self.state.mouse_hook.load(Ordering::SeqCst))
            + usize::from(self.state.keyboard_hook.load(Ordering::SeqCst))
    }

    pub fn fail_install(&self, fail: bool) {
        self.state.fail_install.store(fail, Ordering::SeqCst);
    }

    /// Make the keyboard hook fail after the mouse hook went in.
    pub fn fail_keyboard(&self, fail: bool) {
        self.state.fail_keyboard.store(fail, Ordering::SeqCst);
    }

    pub fn emit(&self, event: CaptureEvent) -> bool {
        match self.state.sink.lock() {
            Ok(guard) => guard.as_ref().map(|sink| sink.send(event)).unwrap_or(false),
            Err(_) => false,
        }
    }
}
