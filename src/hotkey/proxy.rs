//! 通用热键代理模块
//!
//! 让设置界面在"键盘触发"与"鼠标触发"之间来回切换而不丢失任一侧的配置
//!
//! 代理由一个显式的类型选择器加两份按需构造的变体实例组成：
//! 实例在第一次切换到对应类型时创建，之后永不丢弃；
//! 修饰键是跨变体同步的单一值，触发器与有效性则各自独立

use std::fmt;
use std::sync::Arc;

use crate::registry::{HotkeyRegistrar, RegistrationId};

use super::activator::{Activator, KeyCode, MouseAction};
use super::base::Hotkey;
use super::keyboard::KeyboardHotkey;
use super::modifiers::Modifiers;
use super::mouse::MouseHookHotkey;

/// 热键类型选择器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HotkeyKind {
    /// 尚未选择触发类型
    #[default]
    Undefined,
    /// 键盘触发
    Keyboard,
    /// 鼠标触发
    MouseHook,
}

impl fmt::Display for HotkeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "Undefined",
            Self::Keyboard => "Keyboard",
            Self::MouseHook => "MouseHook",
        };
        write!(f, "{}", name)
    }
}

/// 通用热键代理
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use volukey::hotkey::{GenericHotkeyProxy, HotkeyKind, KeyCode, MouseAction};
/// use volukey::registry::{MouseHookDispatcher, SlotRegistry};
///
/// let mut proxy = GenericHotkeyProxy::new(
///     Arc::new(SlotRegistry::new()),
///     Arc::new(MouseHookDispatcher::new()),
/// );
///
/// proxy.set_kind(HotkeyKind::Keyboard);
/// proxy.set_key(KeyCode::Left);
///
/// // 切到鼠标再切回来，键盘侧的配置原样保留
/// proxy.set_kind(HotkeyKind::MouseHook);
/// proxy.set_mouse_action(MouseAction::XButton1);
/// proxy.set_kind(HotkeyKind::Keyboard);
/// assert_eq!(proxy.keyboard().unwrap().key(), Some(KeyCode::Left));
/// ```
pub struct GenericHotkeyProxy {
    kind: HotkeyKind,
    keyboard: Option<KeyboardHotkey>,
    mouse: Option<MouseHookHotkey>,
    /// 跨变体同步的修饰键值，也是新实例的种子
    staged_modifiers: Modifiers,
    /// 跨变体同步的启用偏好
    staged_enabled: bool,
    keyboard_registrar: Arc<dyn HotkeyRegistrar>,
    mouse_registrar: Arc<dyn HotkeyRegistrar>,
}

impl GenericHotkeyProxy {
    /// 创建新的代理：类型未定、两个实例都未构造
    pub fn new(
        keyboard_registrar: Arc<dyn HotkeyRegistrar>,
        mouse_registrar: Arc<dyn HotkeyRegistrar>,
    ) -> Self {
        Self {
            kind: HotkeyKind::Undefined,
            keyboard: None,
            mouse: None,
            staged_modifiers: Modifiers::default(),
            staged_enabled: true,
            keyboard_registrar,
            mouse_registrar,
        }
    }

    /// 获取当前触发类型
    pub fn kind(&self) -> HotkeyKind {
        self.kind
    }

    /// 切换触发类型
    ///
    /// 第一次切换到某个类型时构造该变体实例，并用代理当前的
    /// 修饰键状态作为种子；实例一旦创建永不丢弃，
    /// 切换到已存在实例的类型只是选择器变化，不触碰任何配置
    pub fn set_kind(&mut self, kind: HotkeyKind) {
        match kind {
            HotkeyKind::Keyboard if self.keyboard.is_none() => {
                let mut hotkey = KeyboardHotkey::new(Arc::clone(&self.keyboard_registrar));
                hotkey.set_modifiers(self.staged_modifiers);
                hotkey.set_enabled(self.staged_enabled);
                self.keyboard = Some(hotkey);
            }
            HotkeyKind::MouseHook if self.mouse.is_none() => {
                let mut hotkey = MouseHookHotkey::new(Arc::clone(&self.mouse_registrar));
                hotkey.set_modifiers(self.staged_modifiers);
                hotkey.set_enabled(self.staged_enabled);
                self.mouse = Some(hotkey);
            }
            _ => {}
        }
        self.kind = kind;
    }

    /// 获取键盘实例（如果已创建）
    pub fn keyboard(&self) -> Option<&KeyboardHotkey> {
        self.keyboard.as_ref()
    }

    /// 获取鼠标实例（如果已创建）
    pub fn mouse(&self) -> Option<&MouseHookHotkey> {
        self.mouse.as_ref()
    }

    /// 获取当前类型对应的修饰键集合
    ///
    /// 类型未定时没有实例可读，返回代理暂存的修饰键值
    /// （新代理上即全 false，见 DESIGN.md 的约定）
    pub fn modifiers(&self) -> Modifiers {
        match self.kind {
            HotkeyKind::Keyboard => self
                .keyboard
                .as_ref()
                .map(|hotkey| hotkey.modifiers())
                .unwrap_or(self.staged_modifiers),
            HotkeyKind::MouseHook => self
                .mouse
                .as_ref()
                .map(|hotkey| hotkey.modifiers())
                .unwrap_or(self.staged_modifiers),
            HotkeyKind::Undefined => self.staged_modifiers,
        }
    }

    /// 整体写入修饰键
    ///
    /// 写入暂存值和两个已存在的实例；之后创建的实例也会以此为种子——
    /// 修饰键是两个变体共享的单一同步值
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.staged_modifiers = modifiers;
        if let Some(keyboard) = &mut self.keyboard {
            keyboard.set_modifiers(modifiers);
        }
        if let Some(mouse) = &mut self.mouse {
            mouse.set_modifiers(modifiers);
        }
    }

    /// 读取 Alt 状态
    pub fn alt(&self) -> bool {
        self.modifiers().alt()
    }

    /// 设置 Alt 键（同步到两个变体）
    pub fn set_alt(&mut self, alt: bool) {
        self.set_modifiers(self.staged_modifiers.with_alt(alt));
    }

    /// 读取 Ctrl 状态
    pub fn ctrl(&self) -> bool {
        self.modifiers().ctrl()
    }

    /// 设置 Ctrl 键（同步到两个变体）
    pub fn set_ctrl(&mut self, ctrl: bool) {
        self.set_modifiers(self.staged_modifiers.with_ctrl(ctrl));
    }

    /// 读取 Shift 状态
    pub fn shift(&self) -> bool {
        self.modifiers().shift()
    }

    /// 设置 Shift 键（同步到两个变体）
    pub fn set_shift(&mut self, shift: bool) {
        self.set_modifiers(self.staged_modifiers.with_shift(shift));
    }

    /// 读取 Win 状态
    pub fn win(&self) -> bool {
        self.modifiers().win()
    }

    /// 设置 Win 键（同步到两个变体）
    pub fn set_win(&mut self, win: bool) {
        self.set_modifiers(self.staged_modifiers.with_win(win));
    }

    /// 设置键盘按键
    ///
    /// 仅在当前类型为键盘时生效；否则是无副作用的空操作，
    /// 尤其不会悄悄创建或改动鼠标实例
    pub fn set_key(&mut self, key: KeyCode) {
        if self.kind == HotkeyKind::Keyboard
            && let Some(keyboard) = &mut self.keyboard
        {
            keyboard.set_key(key);
        }
    }

    /// 设置鼠标动作
    ///
    /// 仅在当前类型为鼠标时生效；否则是无副作用的空操作
    pub fn set_mouse_action(&mut self, action: MouseAction) {
        if self.kind == HotkeyKind::MouseHook
            && let Some(mouse) = &mut self.mouse
        {
            mouse.set_mouse_action(action);
        }
    }

    /// 获取当前实例的触发器
    pub fn activator(&self) -> Option<Activator> {
        match self.kind {
            HotkeyKind::Keyboard => self.keyboard.as_ref().and_then(|hotkey| hotkey.activator()),
            HotkeyKind::MouseHook => self.mouse.as_ref().and_then(|hotkey| hotkey.activator()),
            HotkeyKind::Undefined => None,
        }
    }

    /// 检查当前实例的有效性
    ///
    /// 类型未定时没有实例可查，返回 false；
    /// 切换类型不会在两个实例之间转移或重置有效性
    pub fn is_valid(&self) -> bool {
        match self.kind {
            HotkeyKind::Keyboard => self.keyboard.as_ref().is_some_and(|hotkey| hotkey.is_valid()),
            HotkeyKind::MouseHook => self.mouse.as_ref().is_some_and(|hotkey| hotkey.is_valid()),
            HotkeyKind::Undefined => false,
        }
    }

    /// 检查启用偏好
    pub fn enabled(&self) -> bool {
        self.staged_enabled
    }

    /// 更新启用偏好（同步到两个变体）
    pub fn set_enabled(&mut self, enabled: bool) {
        self.staged_enabled = enabled;
        if let Some(keyboard) = &mut self.keyboard {
            keyboard.set_enabled(enabled);
        }
        if let Some(mouse) = &mut self.mouse {
            mouse.set_enabled(enabled);
        }
    }

    /// 绑定动作到两个变体
    ///
    /// 动作与触发方式无关，切换类型后仍指向同一动作
    pub fn set_action(&mut self, action: Option<crate::action::ActionHandle>) {
        if let Some(keyboard) = &mut self.keyboard {
            keyboard.set_action(action.clone());
        }
        if let Some(mouse) = &mut self.mouse {
            mouse.set_action(action.clone());
        }
    }

    /// 激活当前实例
    pub fn activate(&mut self) {
        match self.kind {
            HotkeyKind::Keyboard => {
                if let Some(keyboard) = &mut self.keyboard {
                    keyboard.activate();
                }
            }
            HotkeyKind::MouseHook => {
                if let Some(mouse) = &mut self.mouse {
                    mouse.activate();
                }
            }
            HotkeyKind::Undefined => {
                tracing::debug!("Activate on undefined hotkey kind, ignoring");
            }
        }
    }

    /// 停用两个实例
    ///
    /// 无论当前选择器指向哪个类型，都释放任何一侧持有的注册，
    /// 保证代理被丢弃前不遗留系统注册
    pub fn deactivate(&mut self) {
        if let Some(keyboard) = &mut self.keyboard {
            keyboard.deactivate();
        }
        if let Some(mouse) = &mut self.mouse {
            mouse.deactivate();
        }
    }

    /// 获取当前实例的注册标识（如果已注册）
    pub fn token_id(&self) -> Option<RegistrationId> {
        match self.kind {
            HotkeyKind::Keyboard => self.keyboard.as_ref().and_then(|hotkey| hotkey.token_id()),
            HotkeyKind::MouseHook => self.mouse.as_ref().and_then(|hotkey| hotkey.token_id()),
            HotkeyKind::Undefined => None,
        }
    }

    /// 把当前实例克隆为运行时热键
    ///
    /// 克隆遵循热键的克隆语义（未激活、无令牌、共享动作引用）；
    /// 类型未定时返回 `None`
    pub fn to_hotkey(&self) -> Option<Hotkey> {
        match self.kind {
            HotkeyKind::Keyboard => self.keyboard.clone().map(Hotkey::Keyboard),
            HotkeyKind::MouseHook => self.mouse.clone().map(Hotkey::MouseHook),
            HotkeyKind::Undefined => None,
        }
    }

    /// 检查是否与另一个代理占用同一组合键
    ///
    /// `None` 直接返回 false；否则要求类型一致且两个当前实例
    /// 按冲突语义相等（enabled / active / 动作不参与比较）
    pub fn is_already_in_use_by(&self, other: Option<&GenericHotkeyProxy>) -> bool {
        let Some(other) = other else {
            return false;
        };
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            HotkeyKind::Keyboard => match (&self.keyboard, &other.keyboard) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            HotkeyKind::MouseHook => match (&self.mouse, &other.mouse) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            // 双方都未定类型：没有实例可比较
            HotkeyKind::Undefined => false,
        }
    }
}

impl fmt::Debug for GenericHotkeyProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericHotkeyProxy")
            .field("kind", &self.kind)
            .field("keyboard", &self.keyboard)
            .field("mouse", &self.mouse)
            .field("staged_modifiers", &self.staged_modifiers)
            .field("staged_enabled", &self.staged_enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MouseHookDispatcher, SlotRegistry};

    fn proxy() -> GenericHotkeyProxy {
        GenericHotkeyProxy::new(
            Arc::new(SlotRegistry::new()),
            Arc::new(MouseHookDispatcher::new()),
        )
    }

    #[test]
    fn test_new_proxy_is_undefined() {
        let proxy = proxy();
        assert_eq!(proxy.kind(), HotkeyKind::Undefined);
        assert!(proxy.keyboard().is_none());
        assert!(proxy.mouse().is_none());
        assert!(!proxy.is_valid());
        // 类型未定时修饰键读取暂存值：全 false
        assert!(!proxy.alt() && !proxy.ctrl() && !proxy.shift() && !proxy.win());
    }

    #[test]
    fn test_switching_preserves_both_configurations() {
        let mut proxy = proxy();

        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_key(KeyCode::Left);

        proxy.set_kind(HotkeyKind::MouseHook);
        proxy.set_mouse_action(MouseAction::XButton1);

        proxy.set_kind(HotkeyKind::Keyboard);
        // 中间的鼠标编辑不影响键盘侧
        assert_eq!(proxy.keyboard().unwrap().key(), Some(KeyCode::Left));
        assert_eq!(
            proxy.mouse().unwrap().mouse_action(),
            Some(MouseAction::XButton1)
        );
    }

    #[test]
    fn test_modifiers_shared_across_variants() {
        let mut proxy = proxy();

        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_alt(true);

        // 切到鼠标侧，新实例以共享的修饰键为种子
        proxy.set_kind(HotkeyKind::MouseHook);
        assert!(proxy.alt());
        assert!(proxy.mouse().unwrap().modifiers().alt());

        // 在鼠标侧改修饰键，键盘侧同步
        proxy.set_ctrl(true);
        assert!(proxy.keyboard().unwrap().modifiers().ctrl());
        assert!(proxy.keyboard().unwrap().modifiers().alt());
    }

    #[test]
    fn test_cross_kind_activator_set_is_noop() {
        let mut proxy = proxy();
        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_key(KeyCode::Left);

        // 键盘类型下设置鼠标动作：不创建也不改动鼠标实例
        proxy.set_mouse_action(MouseAction::XButton1);
        assert!(proxy.mouse().is_none());

        proxy.set_kind(HotkeyKind::MouseHook);
        proxy.set_mouse_action(MouseAction::XButton2);

        // 鼠标类型下设置按键：键盘实例不变
        proxy.set_key(KeyCode::Right);
        assert_eq!(proxy.keyboard().unwrap().key(), Some(KeyCode::Left));
        assert_eq!(
            proxy.mouse().unwrap().mouse_action(),
            Some(MouseAction::XButton2)
        );
    }

    #[test]
    fn test_validity_is_per_instance() {
        let mut proxy = proxy();
        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_key(KeyCode::Left);
        assert!(proxy.is_valid());

        // 鼠标侧尚未配置：切过去后无效
        proxy.set_kind(HotkeyKind::MouseHook);
        assert!(!proxy.is_valid());

        // 切换不会转移或重置有效性
        proxy.set_kind(HotkeyKind::Keyboard);
        assert!(proxy.is_valid());
    }

    #[test]
    fn test_is_already_in_use_by() {
        let make = |enabled: bool| {
            let mut p = proxy();
            p.set_kind(HotkeyKind::Keyboard);
            p.set_ctrl(true);
            p.set_key(KeyCode::Left);
            p.set_enabled(enabled);
            p
        };

        let a = make(true);
        let b = make(false);
        // enabled 不参与冲突比较
        assert!(a.is_already_in_use_by(Some(&b)));

        // 按键不同
        let mut c = make(true);
        c.set_key(KeyCode::Right);
        assert!(!a.is_already_in_use_by(Some(&c)));

        // 修饰键不同
        let mut d = make(true);
        d.set_shift(true);
        assert!(!a.is_already_in_use_by(Some(&d)));

        // 类型不同
        let mut e = proxy();
        e.set_kind(HotkeyKind::MouseHook);
        e.set_ctrl(true);
        e.set_mouse_action(MouseAction::XButton1);
        assert!(!a.is_already_in_use_by(Some(&e)));

        // 与空比较
        assert!(!a.is_already_in_use_by(None));
    }

    #[test]
    fn test_undefined_kind_never_in_use() {
        let a = proxy();
        let b = proxy();
        assert!(!a.is_already_in_use_by(Some(&b)));
    }

    #[test]
    fn test_deactivate_releases_both_sides() {
        let keyboard_registrar = Arc::new(SlotRegistry::new());
        let mouse_hook = Arc::new(MouseHookDispatcher::new());
        let mut proxy = GenericHotkeyProxy::new(
            Arc::clone(&keyboard_registrar) as Arc<dyn HotkeyRegistrar>,
            Arc::clone(&mouse_hook) as Arc<dyn HotkeyRegistrar>,
        );

        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_key(KeyCode::F7);
        proxy.activate();
        assert_eq!(keyboard_registrar.registered_count(), 1);

        // 键盘侧仍持有注册时切到鼠标侧并激活
        proxy.set_kind(HotkeyKind::MouseHook);
        proxy.set_mouse_action(MouseAction::XButton1);
        proxy.activate();
        assert_eq!(mouse_hook.registered_count(), 1);

        // 一次停用清掉两侧的注册
        proxy.deactivate();
        assert_eq!(keyboard_registrar.registered_count(), 0);
        assert_eq!(mouse_hook.registered_count(), 0);
    }

    #[test]
    fn test_to_hotkey_follows_clone_semantics() {
        let mut proxy = proxy();
        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_key(KeyCode::Left);
        proxy.activate();

        let hotkey = proxy.to_hotkey().unwrap();
        assert!(!hotkey.active());
        assert!(hotkey.token_id().is_none());
        assert!(matches!(hotkey, Hotkey::Keyboard(_)));

        assert!(self::proxy().to_hotkey().is_none());

        proxy.deactivate();
    }
}
