// Native camera backends, one per platform.

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "windows")]
pub use self::windows::WindowsBackend;
