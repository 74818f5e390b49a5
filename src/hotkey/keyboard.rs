//! 键盘热键变体
//!
//! 每个键盘热键独占一个系统级注册槽位，可以各自独立地碰到注册冲突
//!
//! 有效性规则：分配了非哨兵按键即有效，不要求附带修饰键
//! （媒体键裸绑定是音量控制的主要用法）

use std::sync::Arc;
use std::time::Instant;

use crate::action::ActionHandle;
use crate::registry::{HotkeyBinding, HotkeyRegistrar, RegistrationId};

use super::activator::{Activator, KeyCode};
use super::base::HotkeyCore;
use super::modifiers::Modifiers;

/// 键盘热键
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use volukey::hotkey::{KeyCode, KeyboardHotkey, Modifiers};
/// use volukey::registry::SlotRegistry;
///
/// let registrar = Arc::new(SlotRegistry::new());
/// let mut hotkey = KeyboardHotkey::new(registrar);
///
/// // 新建的热键无效（尚未分配按键）且未激活
/// assert!(!hotkey.is_valid());
/// assert!(!hotkey.active());
///
/// hotkey.set_modifiers(Modifiers::none().with_ctrl(true));
/// hotkey.set_key(KeyCode::VolumeUp);
/// assert!(hotkey.is_valid());
/// ```
#[derive(Debug)]
pub struct KeyboardHotkey {
    core: HotkeyCore,
    key: Option<KeyCode>,
}

impl KeyboardHotkey {
    /// 创建新的键盘热键：无按键、无效、未激活
    pub fn new(registrar: Arc<dyn HotkeyRegistrar>) -> Self {
        let mut hotkey = Self {
            core: HotkeyCore::new(registrar),
            key: None,
        };
        let validity = hotkey.check_validity();
        hotkey.core.valid = validity.0;
        hotkey.core.invalid_reason = validity.1;
        hotkey
    }

    /// 获取当前按键
    pub fn key(&self) -> Option<KeyCode> {
        self.key
    }

    /// 设置按键
    ///
    /// 变更会重新计算有效性；热键处于激活状态时会重新注册，
    /// 使系统反映新的组合键
    pub fn set_key(&mut self, key: KeyCode) {
        self.key = Some(key);
        self.after_mutation();
    }

    /// 清除按键（回到未分配状态）
    pub fn clear_key(&mut self) {
        self.key = None;
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

    /// 获取触发器（如果已分配按键）
    pub fn activator(&self) -> Option<Activator> {
        self.key.map(Activator::Key)
    }

    /// 计算有效性
    ///
    /// 键盘热键有效当且仅当分配了按键且不是 `KeyCode::None` 哨兵值
    pub fn check_validity(&self) -> (bool, String) {
        match self.key {
            Some(key) if !key.is_none() => (true, String::new()),
            _ => (false, "no key assigned".to_string()),
        }
    }

    /// 显式覆盖有效性
    ///
    /// 覆盖是粘滞的：在下一次变更操作（set_key / set_modifiers 等）
    /// 重新计算之前一直生效
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

    /// 激活热键并注册到系统
    ///
    /// 未启用时静默保持未激活；注册冲突时热键保持激活但无令牌，
    /// 有效性被标记为 false（"already in use by another program"）
    pub fn activate(&mut self) {
        let binding = self.binding();
        self.core.activate(binding);
    }

    /// 停用热键并释放注册
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
    ///
    /// 不满足执行条件或触发频率超限时静默丢弃；返回是否真正触发
    pub fn dispatch(&mut self) -> bool {
        self.core.dispatch_at(Instant::now())
    }

    /// 带时间戳的分发（事件回放与限频测试用）
    pub(crate) fn dispatch_at(&mut self, now: Instant) -> bool {
        self.core.dispatch_at(now)
    }

    /// 构造注册描述符（未分配按键或哨兵值时为 `None`）
    pub fn binding(&self) -> Option<HotkeyBinding> {
        self.key
            .filter(|key| !key.is_none())
            .map(|key| HotkeyBinding::new(self.core.modifiers, Activator::Key(key)))
    }

    /// 获取当前注册标识（如果已注册）
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

impl Clone for KeyboardHotkey {
    /// 克隆语义：除 `active`（强制 false）与注册令牌（强制空）外逐字段拷贝；
    /// 绑定的动作与原热键共享同一引用
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone_inactive(),
            key: self.key,
        }
    }
}

impl PartialEq for KeyboardHotkey {
    /// 冲突语义的相等：相同修饰键与相同按键即相等，
    /// enabled / active / 动作不参与比较
    fn eq(&self, other: &Self) -> bool {
        self.core.modifiers == other.core.modifiers && self.key == other.key
    }
}
