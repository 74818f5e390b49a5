//! 热键模块
//!
//! # 功能
//!
//! - 修饰键与触发器的强类型表达（[`Modifiers`]、[`Activator`]）
//! - 两种热键变体：独占系统槽位的键盘热键与共享底层钩子的鼠标热键
//! - 有效 / 启用 / 激活三维状态机与限频派发
//! - 设置界面用的双实例代理（[`GenericHotkeyProxy`]），切换类型不丢配置
//! - 运行时属主集合（[`HotkeySet`]）与可序列化描述符（[`HotkeyDescriptor`]）
//!
//! # 使用示例
//!
//! ```
//! use std::sync::Arc;
//! use volukey::action::ActionHandle;
//! use volukey::hotkey::{Hotkey, HotkeySet, KeyCode, KeyboardHotkey, Modifiers};
//! use volukey::registry::SlotRegistry;
//!
//! let registrar = Arc::new(SlotRegistry::new());
//! let mut hotkey = KeyboardHotkey::new(registrar);
//! hotkey.set_modifiers(Modifiers::default().with_ctrl(true));
//! hotkey.set_key(KeyCode::VolumeUp);
//! hotkey.set_action(Some(ActionHandle::new("volume_up", || {})));
//!
//! let mut set = HotkeySet::new();
//! set.push(Hotkey::Keyboard(hotkey));
//! set.activate_enabled();
//! // ... 程序退出前
//! set.deactivate_all();
//! ```

mod activator;
mod base;
mod descriptor;
mod error;
mod keyboard;
mod modifiers;
mod mouse;
mod proxy;
mod set;

pub use activator::{Activator, KeyCode, MouseAction};
pub use base::{DEFAULT_MAX_FREQUENCY, Hotkey};
pub use descriptor::{ActivatorKind, HotkeyDescriptor};
pub use error::{HotkeyError, HotkeyResult};
pub use keyboard::KeyboardHotkey;
pub use modifiers::Modifiers;
pub use mouse::MouseHookHotkey;
pub use proxy::{GenericHotkeyProxy, HotkeyKind};
pub use set::HotkeySet;
