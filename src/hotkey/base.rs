//! 热键共享行为模块
//!
//! 两个热键变体共用的状态机：有效性、启用/激活标志、
//! 限频分发、注册生命周期的收敛逻辑
//!
//! 调度约定：本模块的方法都是同步的，不做内部加锁，
//! 所有变更和 `dispatch()` 都应在单一处理上下文（引擎事件循环）上执行

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::action::ActionHandle;
use crate::registry::{HotkeyBinding, HotkeyRegistrar, RegistrationId, RegistrationToken};

use super::keyboard::KeyboardHotkey;
use super::mouse::MouseHookHotkey;
use super::modifiers::Modifiers;

/// 默认最大触发频率（Hz）
pub const DEFAULT_MAX_FREQUENCY: f32 = 10.0;

/// 注册冲突时写入的无效原因
pub(crate) const CONFLICT_REASON: &str = "already in use by another program";

/// 热键变体共享的内部状态
///
/// 三个独立关注点在这里汇合：有效性（配置是否成立）、
/// 用户偏好（enabled）、系统注册状态（token）。
/// `reconcile_registration` 负责让三者保持一致且不泄漏注册槽位
pub(crate) struct HotkeyCore {
    pub(crate) modifiers: Modifiers,
    pub(crate) action: Option<ActionHandle>,
    pub(crate) enabled: bool,
    pub(crate) active: bool,
    pub(crate) valid: bool,
    pub(crate) invalid_reason: String,
    pub(crate) max_frequency: f32,
    pub(crate) last_dispatch: Option<Instant>,
    pub(crate) token: Option<RegistrationToken>,
    pub(crate) registrar: Arc<dyn HotkeyRegistrar>,
    /// 显式 set_is_valid 覆盖是否生效（粘滞到下一次变更操作）
    pub(crate) validity_overridden: bool,
}

impl HotkeyCore {
    /// 创建初始状态：无效、未激活、未启用任何注册
    pub(crate) fn new(registrar: Arc<dyn HotkeyRegistrar>) -> Self {
        Self {
            modifiers: Modifiers::default(),
            action: None,
            enabled: true,
            active: false,
            valid: false,
            invalid_reason: String::new(),
            max_frequency: DEFAULT_MAX_FREQUENCY,
            last_dispatch: None,
            token: None,
            registrar,
            validity_overridden: false,
        }
    }

    /// 变更操作的收尾：清除有效性覆盖、写入重新计算的有效性、
    /// 并在激活状态下重新注册以让系统反映新的组合键
    pub(crate) fn finish_mutation(
        &mut self,
        validity: (bool, String),
        binding: Option<HotkeyBinding>,
    ) {
        self.validity_overridden = false;
        self.valid = validity.0;
        self.invalid_reason = validity.1;

        if self.active {
            self.reconcile_registration(binding);
        }
    }

    /// 显式覆盖有效性，粘滞到下一次变更操作
    pub(crate) fn set_is_valid(&mut self, valid: bool, reason: String) {
        self.valid = valid;
        self.invalid_reason = reason;
        self.validity_overridden = true;
    }

    /// 激活热键
    ///
    /// 未启用时静默降级为未激活（不变量：active 蕴含 enabled）
    pub(crate) fn activate(&mut self, binding: Option<HotkeyBinding>) {
        self.active = self.enabled;
        self.reconcile_registration(binding);
    }

    /// 停用热键并释放注册
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.reconcile_registration(None);
    }

    /// 更新启用偏好
    ///
    /// 停用启用偏好会把激活中的热键降级为未激活并释放注册
    pub(crate) fn set_enabled(&mut self, enabled: bool, binding: Option<HotkeyBinding>) {
        self.enabled = enabled;
        if !enabled {
            self.active = false;
        }
        self.reconcile_registration(binding);
    }

    /// 让系统注册状态与 enabled/active 收敛
    ///
    /// 所有会创建或废弃令牌的路径都经过这里，保证令牌恰好释放一次
    pub(crate) fn reconcile_registration(&mut self, binding: Option<HotkeyBinding>) {
        if !self.enabled || !self.active {
            if let Some(token) = self.token.take() {
                tracing::debug!(id = %token.id(), "Releasing hotkey registration");
                token.release();
            }
            return;
        }

        // 重复注册保护：先释放旧令牌再注册新组合
        if let Some(token) = self.token.take() {
            token.release();
        }

        // 没有触发器就没有可注册的组合键
        let Some(binding) = binding else {
            return;
        };

        match self.registrar.register(&binding) {
            Ok(id) => {
                tracing::debug!(binding = %binding, id = %id, "Hotkey registered");
                self.token = Some(RegistrationToken::new(id, Arc::clone(&self.registrar)));
                // 之前的冲突标记到此失效：组合键已经注册成功
                if !self.validity_overridden && self.invalid_reason == CONFLICT_REASON {
                    self.valid = true;
                    self.invalid_reason.clear();
                }
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(binding = %binding, "Hotkey conflict: combination owned elsewhere");
                self.valid = false;
                self.invalid_reason = CONFLICT_REASON.to_string();
                // active 保持 true：用户视角下热键仍"开着"，只是暂时无法触发
            }
            Err(e) => {
                tracing::warn!(binding = %binding, error = %e, "Hotkey registration failed");
            }
        }
    }

    /// 检查热键当前能否执行动作
    pub(crate) fn can_perform_action(&self) -> bool {
        self.valid && self.enabled && self.active
    }

    /// 带时间戳的分发（限频判定、动作调用），返回是否真正触发
    pub(crate) fn dispatch_at(&mut self, now: Instant) -> bool {
        if !self.can_perform_action() {
            return false;
        }

        let min_interval = Duration::from_secs_f32(1.0 / self.max_frequency);
        if let Some(last) = self.last_dispatch
            && now.duration_since(last) < min_interval
        {
            tracing::trace!("Hotkey dispatch rate-limited, dropping");
            return false;
        }

        if let Some(action) = &self.action {
            action.perform();
        }
        self.last_dispatch = Some(now);
        true
    }

    /// 更新最大触发频率
    ///
    /// 非正值违反不变量，忽略并告警
    pub(crate) fn set_max_frequency(&mut self, max_frequency: f32) {
        if max_frequency <= 0.0 {
            tracing::warn!(max_frequency, "Ignoring non-positive max frequency");
            return;
        }
        self.max_frequency = max_frequency;
    }

    /// 克隆语义：active 强制为 false、令牌强制为空，动作共享引用
    pub(crate) fn clone_inactive(&self) -> Self {
        Self {
            modifiers: self.modifiers,
            action: self.action.clone(),
            enabled: self.enabled,
            active: false,
            valid: self.valid,
            invalid_reason: self.invalid_reason.clone(),
            max_frequency: self.max_frequency,
            last_dispatch: self.last_dispatch,
            token: None,
            registrar: Arc::clone(&self.registrar),
            validity_overridden: self.validity_overridden,
        }
    }

    /// 获取当前令牌对应的注册标识（如果已注册）
    pub(crate) fn token_id(&self) -> Option<RegistrationId> {
        self.token.as_ref().map(|token| token.id())
    }
}

impl fmt::Debug for HotkeyCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyCore")
            .field("modifiers", &self.modifiers)
            .field("enabled", &self.enabled)
            .field("active", &self.active)
            .field("valid", &self.valid)
            .field("invalid_reason", &self.invalid_reason)
            .field("max_frequency", &self.max_frequency)
            .field("registered", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

/// 热键：两个具体变体上的封闭枚举
///
/// 集合层（查重、批量停用、事件路由）通过它统一持有两种变体；
/// 分发逻辑是调用点上的显式 match，而非开放继承层次上的双重分发
#[derive(Debug, Clone)]
pub enum Hotkey {
    /// 键盘热键
    Keyboard(KeyboardHotkey),
    /// 鼠标钩子热键
    MouseHook(MouseHookHotkey),
}

impl Hotkey {
    /// 获取变体名称（用于日志）
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Keyboard(_) => "Keyboard",
            Self::MouseHook(_) => "MouseHook",
        }
    }

    /// 检查配置是否有效
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Keyboard(hotkey) => hotkey.is_valid(),
            Self::MouseHook(hotkey) => hotkey.is_valid(),
        }
    }

    /// 检查当前能否执行动作
    pub fn can_perform_action(&self) -> bool {
        match self {
            Self::Keyboard(hotkey) => hotkey.can_perform_action(),
            Self::MouseHook(hotkey) => hotkey.can_perform_action(),
        }
    }

    /// 激活热键
    pub fn activate(&mut self) {
        match self {
            Self::Keyboard(hotkey) => hotkey.activate(),
            Self::MouseHook(hotkey) => hotkey.activate(),
        }
    }

    /// 停用热键并释放注册
    pub fn deactivate(&mut self) {
        match self {
            Self::Keyboard(hotkey) => hotkey.deactivate(),
            Self::MouseHook(hotkey) => hotkey.deactivate(),
        }
    }

    /// 检查启用偏好
    pub fn enabled(&self) -> bool {
        match self {
            Self::Keyboard(hotkey) => hotkey.enabled(),
            Self::MouseHook(hotkey) => hotkey.enabled(),
        }
    }

    /// 检查激活状态
    pub fn active(&self) -> bool {
        match self {
            Self::Keyboard(hotkey) => hotkey.active(),
            Self::MouseHook(hotkey) => hotkey.active(),
        }
    }

    /// 分发一次触发事件
    pub fn dispatch(&mut self) -> bool {
        match self {
            Self::Keyboard(hotkey) => hotkey.dispatch(),
            Self::MouseHook(hotkey) => hotkey.dispatch(),
        }
    }

    /// 获取当前注册标识（如果已注册）
    pub fn token_id(&self) -> Option<RegistrationId> {
        match self {
            Self::Keyboard(hotkey) => hotkey.token_id(),
            Self::MouseHook(hotkey) => hotkey.token_id(),
        }
    }

    /// 冲突语义的相等比较
    ///
    /// 同一具体变体、相同修饰键、相同触发器即视为相等；
    /// enabled / active / 绑定的动作不参与比较
    pub fn conflicts_with(&self, other: &Hotkey) -> bool {
        match (self, other) {
            (Self::Keyboard(a), Self::Keyboard(b)) => a == b,
            (Self::MouseHook(a), Self::MouseHook(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Hotkey {
    fn eq(&self, other: &Self) -> bool {
        self.conflicts_with(other)
    }
}
