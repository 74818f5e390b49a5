//! 鼠标钩子热键变体
//!
//! 多个鼠标热键复用同一个底层钩子（注册器形态见 `registry::mouse`），
//! 冲突由钩子的查找表消化而非系统拒绝
//!
//! 有效性规则：侧键（XButton1 / XButton2）无条件有效；
//! 滚轮方向必须至少附带一个修饰键（否则会吞掉正常滚动）；
//! 左/中/右键不允许作为热键

use std::sync::Arc;
use std::time::Instant;

use crate::action::ActionHandle;
use crate::registry::{HotkeyBinding, HotkeyRegistrar, RegistrationId};

use super::activator::{Activator, MouseAction};
use super::base::HotkeyCore;
use super::modifiers::Modifiers;

/// 鼠标钩子热键
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use volukey::hotkey::{Modifiers, MouseAction, MouseHookHotkey};
/// use volukey::registry::MouseHookDispatcher;
///
/// let hook = Arc::new(MouseHookDispatcher::new());
/// let mut hotkey = MouseHookHotkey::new(hook);
///
/// // 裸滚轮无效，加上修饰键后有效
/// hotkey.set_mouse_action(MouseAction::WheelUp);
/// assert!(!hotkey.is_valid());
///
/// hotkey.set_modifiers(Modifiers::none().with_ctrl(true));
/// assert!(hotkey.is_valid());
/// ```
#[derive(Debug)]
pub struct MouseHookHotkey {
    core: HotkeyCore,
    mouse_action: Option<MouseAction>,
}

impl MouseHookHotkey {
    /// 创建新的鼠标热键：无动作、无效、未激活
    pub fn new(registrar: Arc<dyn HotkeyRegistrar>) -> Self {
        let mut hotkey = Self {
            core: HotkeyCore::new(registrar),
            mouse_action: None,
        };
        let validity = hotkey.check_validity();
        hotkey.core.valid = validity.0;
        hotkey.core.invalid_reason = validity.1;
        hotkey
    }

    /// 获取当前鼠标动作
    pub fn mouse_action(&self) -> Option<MouseAction> {
        self.mouse_action
    }

    /// 设置鼠标动作
    ///
    /// 变更会重新计算有效性；热键处于激活状态时会重新注册
    pub fn set_mouse_action(&mut self, action: MouseAction) {
        self.mouse_action = Some(action);
        self.after_mutation();
    }

    /// 清除鼠标动作（回到未分配状态）
    pub fn clear_mouse_action(&mut self) {
        self.mouse_action = None;
        self.after_mutation();
    }

    /// 获取修饰键集合
    pub fn modifiers(&self) -> Modifiers {
        self.core.modifiers
    }

    /// 设置修饰键集合
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.core.modifiers = modifiers;
        self.after_mutation();
    }

    /// 获取触发器（如果已分配鼠标动作）
    pub fn activator(&self) -> Option<Activator> {
        self.mouse_action.map(Activator::Mouse)
    }

    /// 计算有效性
    ///
    /// 侧键无条件有效；滚轮方向要求至少一个修饰键；其余动作一律无效
    pub fn check_validity(&self) -> (bool, String) {
        match self.mouse_action {
            None => (false, "no mouse action assigned".to_string()),
            Some(action) if action.is_extra_button() => (true, String::new()),
            Some(action) if action.is_wheel() => {
                if self.core.modifiers.is_empty() {
                    (
                        false,
                        "wheel direction requires at least one modifier".to_string(),
                    )
                } else {
                    (true, String::new())
                }
            }
            Some(_) => (false, "mouse button cannot be used as a hotkey".to_string()),
        }
    }

    /// 显式覆盖有效性（粘滞到下一次变更操作）
    pub fn set_is_valid(&mut self, valid: bool, reason: impl Into<String>) {
        self.core.set_is_valid(valid, reason.into());
    }

    /// 检查配置是否有效
    pub fn is_valid(&self) -> bool {
        self.core.valid
    }

    /// 获取无效原因（有效时为空字符串）
    pub fn invalid_reason(&self) -> &str {
        &self.core.invalid_reason
    }

    /// 检查启用偏好
    pub fn enabled(&self) -> bool {
        self.core.enabled
    }

    /// 更新启用偏好
    pub fn set_enabled(&mut self, enabled: bool) {
        let binding = self.binding();
        self.core.set_enabled(enabled, binding);
    }

    /// 检查激活状态
    pub fn active(&self) -> bool {
        self.core.active
    }

    /// 激活热键并登记到钩子查找表
    pub fn activate(&mut self) {
        let binding = self.binding();
        self.core.activate(binding);
    }

    /// 停用热键并从查找表移除
    pub fn deactivate(&mut self) {
        self.core.deactivate();
    }

    /// 获取绑定的动作
    pub fn action(&self) -> Option<&ActionHandle> {
        self.core.action.as_ref()
    }

    /// 绑定动作
    pub fn set_action(&mut self, action: Option<ActionHandle>) {
        self.core.action = action;
    }

    /// 获取最大触发频率（Hz）
    pub fn max_frequency(&self) -> f32 {
        self.core.max_frequency
    }

    /// 设置最大触发频率（Hz），非正值被忽略
    pub fn set_max_frequency(&mut self, max_frequency: f32) {
        self.core.set_max_frequency(max_frequency);
    }

    /// 检查当前能否执行动作（有效 且 启用 且 激活）
    pub fn can_perform_action(&self) -> bool {
        self.core.can_perform_action()
    }

    /// 分发一次触发事件
    pub fn dispatch(&mut self) -> bool {
        self.core.dispatch_at(Instant::now())
    }

    /// 带时间戳的分发（事件回放与限频测试用）
    pub(crate) fn dispatch_at(&mut self, now: Instant) -> bool {
        self.core.dispatch_at(now)
    }

    /// 构造注册描述符（未分配动作时为 `None`）
    pub fn binding(&self) -> Option<HotkeyBinding> {
        self.mouse_action
            .map(|action| HotkeyBinding::new(self.core.modifiers, Activator::Mouse(action)))
    }

    /// 获取当前注册标识（如果已登记）
    pub fn token_id(&self) -> Option<RegistrationId> {
        self.core.token_id()
    }

    /// 变更操作的共同收尾
    fn after_mutation(&mut self) {
        let validity = self.check_validity();
        let binding = self.binding();
        self.core.finish_mutation(validity, binding);
    }
}

impl Clone for MouseHookHotkey {
    /// 克隆语义：除 `active`（强制 false）与注册令牌（强制空）外逐字段拷贝；
    /// 绑定的动作与原热键共享同一引用
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone_inactive(),
            mouse_action: self.mouse_action,
        }
    }
}

impl PartialEq for MouseHookHotkey {
    /// 冲突语义的相等：相同修饰键与相同鼠标动作即相等
    fn eq(&self, other: &Self) -> bool {
        self.core.modifiers == other.core.modifiers && self.mouse_action == other.mouse_action
    }
}
