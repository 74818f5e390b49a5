//! 注册能力模块
//!
//! 定义热键与操作系统注册层之间的契约
//!
//! # 模块结构
//!
//! - `keyboard` - 键盘注册器：每个热键独占一个注册槽位
//! - `mouse` - 鼠标钩子分发器：多个鼠标热键复用同一个底层钩子
//!
//! 真正的系统调用（RegisterHotKey / SetWindowsHookEx）在本 crate 范围之外；
//! 这里提供的进程内实现是后端接入的接缝，同时也是测试替身

mod keyboard;
mod mouse;

pub use keyboard::SlotRegistry;
pub use mouse::{MouseEvent, MouseHookDispatcher};

use std::fmt;
use std::sync::Arc;

use crate::hotkey::{Activator, HotkeyResult, Modifiers};

/// 注册描述符
///
/// 一次注册对应的 `{修饰键, 触发器}` 组合，按值哈希与比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    /// 修饰键集合
    pub modifiers: Modifiers,
    /// 触发器
    pub activator: Activator,
}

impl HotkeyBinding {
    /// 创建新的注册描述符
    pub fn new(modifiers: Modifiers, activator: Activator) -> Self {
        Self {
            modifiers,
            activator,
        }
    }
}

impl fmt::Display for HotkeyBinding {
    /// 格式化为 "Ctrl+Shift+F7" 形式（无修饰键时只显示触发器）
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.activator)
        } else {
            write!(f, "{}+{}", self.modifiers, self.activator)
        }
    }
}

/// 注册标识
///
/// 标识注册器内的一条活跃注册，由注册器分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(pub(crate) u64);

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 注册能力契约
///
/// 键盘注册器和鼠标钩子分发器都实现此契约；
/// 热键核心只依赖这三个操作，不关心背后是哪种原生机制
pub trait HotkeyRegistrar: Send + Sync {
    /// 注册一个组合键
    ///
    /// 成功返回注册标识；组合键被占用时返回 [`HotkeyError::Conflict`]
    ///
    /// [`HotkeyError::Conflict`]: crate::hotkey::HotkeyError::Conflict
    fn register(&self, binding: &HotkeyBinding) -> HotkeyResult<RegistrationId>;

    /// 注销一条注册
    ///
    /// 对未知标识是无害的空操作
    fn unregister(&self, id: RegistrationId);

    /// 检查某个组合键当前是否已注册
    fn is_registered(&self, binding: &HotkeyBinding) -> bool;
}

/// 注册令牌
///
/// 代表一条活跃的系统级注册，同一时刻只属于一个热键实例。
/// 唯一预期的释放路径是显式调用 [`release`](Self::release)；
/// 令牌在未释放时被丢弃会触发告警日志并兜底注销——
/// 这保证注册槽位在任何退出路径上都不会泄漏
pub struct RegistrationToken {
    id: RegistrationId,
    registrar: Option<Arc<dyn HotkeyRegistrar>>,
}

impl RegistrationToken {
    /// 创建新令牌（仅供注册流程内部使用）
    pub(crate) fn new(id: RegistrationId, registrar: Arc<dyn HotkeyRegistrar>) -> Self {
        Self {
            id,
            registrar: Some(registrar),
        }
    }

    /// 获取注册标识
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// 显式释放令牌，注销对应的注册
    pub fn release(mut self) {
        if let Some(registrar) = self.registrar.take() {
            registrar.unregister(self.id);
        }
    }
}

impl Drop for RegistrationToken {
    fn drop(&mut self) {
        // 显式 release 之后 registrar 已被取走，这里只处理遗漏路径
        if let Some(registrar) = self.registrar.take() {
            tracing::warn!(
                id = %self.id,
                "Registration token dropped without explicit release, unregistering"
            );
            registrar.unregister(self.id);
        }
    }
}

impl fmt::Debug for RegistrationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationToken")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
