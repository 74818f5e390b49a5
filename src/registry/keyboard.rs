//! 键盘注册器模块
//!
//! 每个键盘热键独占一个注册槽位的进程内实现
//!
//! 槽位是进程级的稀缺资源：同一组合键只能注册一次，
//! 再次注册会得到冲突错误（与系统全局热键的拒绝行为一致）。
//! 真正的 RegisterHotKey 后端接入点就在这一层之外

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{HotkeyBinding, HotkeyRegistrar, RegistrationId};
use crate::hotkey::{HotkeyError, HotkeyResult};

/// 默认槽位上限
///
/// 一个托盘应用只需要少量全局热键；上限主要用于及早暴露泄漏
pub const DEFAULT_SLOT_CAPACITY: usize = 32;

/// 槽位表内部状态
#[derive(Default)]
struct SlotTable {
    /// 组合键 -> 注册标识
    slots: HashMap<HotkeyBinding, RegistrationId>,
    /// 注册标识 -> 组合键（注销时反查）
    ids: HashMap<RegistrationId, HotkeyBinding>,
}

/// 键盘槽位注册器
///
/// # Examples
///
/// ```
/// use volukey::hotkey::{Activator, KeyCode, Modifiers};
/// use volukey::registry::{HotkeyBinding, HotkeyRegistrar, SlotRegistry};
///
/// let registry = SlotRegistry::new();
/// let binding = HotkeyBinding::new(
///     Modifiers::none().with_ctrl(true),
///     Activator::Key(KeyCode::F7),
/// );
///
/// let id = registry.register(&binding).unwrap();
/// assert!(registry.is_registered(&binding));
///
/// // 同一组合键的第二次注册被拒绝
/// assert!(registry.register(&binding).is_err());
///
/// registry.unregister(id);
/// assert!(!registry.is_registered(&binding));
/// ```
pub struct SlotRegistry {
    capacity: usize,
    next_id: AtomicU64,
    inner: Mutex<SlotTable>,
}

impl SlotRegistry {
    /// 创建使用默认槽位上限的注册器
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SLOT_CAPACITY)
    }

    /// 创建指定槽位上限的注册器
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            next_id: AtomicU64::new(1),
            inner: Mutex::new(SlotTable::default()),
        }
    }

    /// 获取当前占用的槽位数量
    pub fn registered_count(&self) -> usize {
        self.lock_table().slots.len()
    }

    /// 预占一个组合键，模拟其他程序已持有该组合
    ///
    /// 被预占的组合键对本进程表现为注册冲突；返回的标识可用于解除预占
    pub fn occupy(&self, binding: &HotkeyBinding) -> HotkeyResult<RegistrationId> {
        self.register(binding)
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, SlotTable> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyRegistrar for SlotRegistry {
    fn register(&self, binding: &HotkeyBinding) -> HotkeyResult<RegistrationId> {
        let mut table = self.lock_table();

        if table.slots.contains_key(binding) {
            tracing::debug!(binding = %binding, "Keyboard slot already taken");
            return Err(HotkeyError::Conflict {
                binding: binding.to_string(),
            });
        }

        if table.slots.len() >= self.capacity {
            tracing::warn!(
                binding = %binding,
                capacity = self.capacity,
                "Keyboard slot capacity exhausted"
            );
            return Err(HotkeyError::SlotsExhausted {
                capacity: self.capacity,
            });
        }

        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        table.slots.insert(*binding, id);
        table.ids.insert(id, *binding);

        tracing::debug!(binding = %binding, id = %id, "Registered keyboard hotkey");
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) {
        let mut table = self.lock_table();

        match table.ids.remove(&id) {
            Some(binding) => {
                table.slots.remove(&binding);
                tracing::debug!(binding = %binding, id = %id, "Unregistered keyboard hotkey");
            }
            None => {
                tracing::debug!(id = %id, "Unregister for unknown keyboard registration, ignoring");
            }
        }
    }

    fn is_registered(&self, binding: &HotkeyBinding) -> bool {
        self.lock_table().slots.contains_key(binding)
    }
}
