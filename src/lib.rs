//! VoluKey - 全局热键音量控制引擎
//!
//! 把"键盘组合键"和"修饰键 + 鼠标动作"统一抽象为可配置的全局热键，
//! 管理它们从配置、校验、系统注册到限频派发的完整生命周期

/// Action binding and registry
pub mod action;

/// Event routing engine
pub mod engine;

/// Hotkey model and lifecycle
pub mod hotkey;

/// Profile persistence
pub mod profile;

/// Registration backends
pub mod registry;

/// Utility modules
pub mod utils;

pub use engine::{HotkeyEngine, InputEvent};
pub use hotkey::{
    Activator, GenericHotkeyProxy, Hotkey, HotkeyDescriptor, HotkeyError, HotkeyKind,
    HotkeyResult, HotkeySet, KeyCode, KeyboardHotkey, Modifiers, MouseAction, MouseHookHotkey,
};
pub use profile::{HotkeyProfile, ProfileStore};
