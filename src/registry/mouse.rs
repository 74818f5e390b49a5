//! 鼠标钩子分发器模块
//!
//! 所有鼠标热键复用同一个底层钩子的进程内实现
//!
//! 与键盘注册器的关键不对称：鼠标注册不会被系统拒绝，
//! 冲突由钩子自己的查找表消化——后注册的组合键替换表项，
//! 被替换的热键保留令牌但不再命中事件。
//! 真正的 SetWindowsHookEx 回调会把事件投递到这里做表查找

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{HotkeyBinding, HotkeyRegistrar, RegistrationId};
use crate::hotkey::{HotkeyError, HotkeyResult, Modifiers, MouseAction};

/// 钩子捕获到的一次鼠标输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// 鼠标动作
    pub action: MouseAction,
    /// 事件发生时按下的修饰键
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// 创建新的鼠标事件
    pub fn new(action: MouseAction, modifiers: Modifiers) -> Self {
        Self { action, modifiers }
    }
}

/// 钩子查找表内部状态
#[derive(Default)]
struct HookTable {
    /// 组合键 -> 注册标识（事件命中用）
    bindings: HashMap<HotkeyBinding, RegistrationId>,
    /// 注册标识 -> 组合键（注销时反查）
    ids: HashMap<RegistrationId, HotkeyBinding>,
}

/// 鼠标钩子分发器
///
/// 一个实例对应一个底层钩子，内部维护 `{修饰键, 鼠标动作} -> 注册标识` 表；
/// [`match_event`](Self::match_event) 把进入的鼠标事件解析到命中的注册，
/// 由持有热键的一方调用其 `dispatch()`
///
/// # Examples
///
/// ```
/// use volukey::hotkey::{Activator, Modifiers, MouseAction};
/// use volukey::registry::{HotkeyBinding, HotkeyRegistrar, MouseEvent, MouseHookDispatcher};
///
/// let hook = MouseHookDispatcher::new();
/// let binding = HotkeyBinding::new(
///     Modifiers::none().with_ctrl(true),
///     Activator::Mouse(MouseAction::WheelUp),
/// );
/// let id = hook.register(&binding).unwrap();
///
/// let event = MouseEvent::new(MouseAction::WheelUp, Modifiers::none().with_ctrl(true));
/// assert_eq!(hook.match_event(&event), Some(id));
///
/// let other = MouseEvent::new(MouseAction::WheelDown, Modifiers::none().with_ctrl(true));
/// assert_eq!(hook.match_event(&other), None);
/// ```
pub struct MouseHookDispatcher {
    next_id: AtomicU64,
    inner: Mutex<HookTable>,
}

impl MouseHookDispatcher {
    /// 创建新的钩子分发器
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: Mutex::new(HookTable::default()),
        }
    }

    /// 查找命中某个鼠标事件的注册
    ///
    /// 没有命中时返回 `None`（事件放行给系统）
    pub fn match_event(&self, event: &MouseEvent) -> Option<RegistrationId> {
        let binding = HotkeyBinding::new(event.modifiers, crate::hotkey::Activator::Mouse(event.action));
        self.lock_table().bindings.get(&binding).copied()
    }

    /// 获取查找表中的条目数量
    pub fn registered_count(&self) -> usize {
        self.lock_table().bindings.len()
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, HookTable> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MouseHookDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyRegistrar for MouseHookDispatcher {
    fn register(&self, binding: &HotkeyBinding) -> HotkeyResult<RegistrationId> {
        if !binding.activator.is_mouse() {
            return Err(HotkeyError::RegistrationFailed {
                binding: binding.to_string(),
                reason: "keyboard binding offered to the mouse hook".to_string(),
            });
        }

        let mut table = self.lock_table();
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::SeqCst));

        // 同一组合键的后注册者替换表项，前者不再命中事件
        if let Some(displaced) = table.bindings.insert(*binding, id) {
            tracing::debug!(
                binding = %binding,
                displaced = %displaced,
                "Mouse hook table entry replaced"
            );
        }
        table.ids.insert(id, *binding);

        tracing::debug!(binding = %binding, id = %id, "Registered mouse hotkey");
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) {
        let mut table = self.lock_table();

        match table.ids.remove(&id) {
            Some(binding) => {
                // 只有当表项仍然指向本注册时才移除，避免误删替换者
                if table.bindings.get(&binding) == Some(&id) {
                    table.bindings.remove(&binding);
                }
                tracing::debug!(binding = %binding, id = %id, "Unregistered mouse hotkey");
            }
            None => {
                tracing::debug!(id = %id, "Unregister for unknown mouse registration, ignoring");
            }
        }
    }

    fn is_registered(&self, binding: &HotkeyBinding) -> bool {
        self.lock_table().bindings.contains_key(binding)
    }
}
