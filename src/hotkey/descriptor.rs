//! 热键描述符模块
//!
//! 配置文件与内存模型之间的转换层：描述符是可序列化的扁平结构，
//! 加载时尽量宽容——无法识别的触发器或动作只降级为无效 / 未绑定，
//! 不会让整个配置加载失败

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::ActionRegistry;
use crate::registry::HotkeyRegistrar;

use super::modifiers::Modifiers;
use super::proxy::{GenericHotkeyProxy, HotkeyKind};

/// 触发器类别标签
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivatorKind {
    /// 未选择触发方式
    #[default]
    None,
    /// 键盘按键
    Key,
    /// 鼠标动作
    Mouse,
}

/// 单个热键的持久化形式
///
/// # Examples
///
/// ```
/// use volukey::hotkey::HotkeyDescriptor;
///
/// let json = r#"{
///     "enabled": true,
///     "modifiers": { "ctrl": true },
///     "activator_kind": "key",
///     "activator_value": "VolumeUp",
///     "action_identifier": "volume_up"
/// }"#;
/// let descriptor: HotkeyDescriptor = serde_json::from_str(json).unwrap();
/// assert!(descriptor.enabled);
/// assert_eq!(descriptor.activator_value, "VolumeUp");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotkeyDescriptor {
    /// 用户的启用偏好
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 修饰键集合
    #[serde(default)]
    pub modifiers: Modifiers,
    /// 触发器类别
    #[serde(default)]
    pub activator_kind: ActivatorKind,
    /// 触发器名称，如 "VolumeUp" 或 "WheelUp"
    #[serde(default)]
    pub activator_value: String,
    /// 绑定动作的标识符
    #[serde(default)]
    pub action_identifier: String,
}

fn default_enabled() -> bool {
    true
}

impl HotkeyDescriptor {
    /// 从代理提取持久化描述
    pub fn from_proxy(proxy: &GenericHotkeyProxy, action_identifier: impl Into<String>) -> Self {
        let (activator_kind, activator_value) = match proxy.kind() {
            HotkeyKind::Keyboard => {
                let value = proxy
                    .keyboard()
                    .and_then(|hotkey| hotkey.key())
                    .map(|key| key.name().to_string())
                    .unwrap_or_default();
                (ActivatorKind::Key, value)
            }
            HotkeyKind::MouseHook => {
                let value = proxy
                    .mouse()
                    .and_then(|hotkey| hotkey.mouse_action())
                    .map(|action| action.name().to_string())
                    .unwrap_or_default();
                (ActivatorKind::Mouse, value)
            }
            HotkeyKind::Undefined => (ActivatorKind::None, String::new()),
        };

        Self {
            enabled: proxy.enabled(),
            modifiers: proxy.modifiers(),
            activator_kind,
            activator_value,
            action_identifier: action_identifier.into(),
        }
    }

    /// 把描述符实例化为代理
    ///
    /// 启用偏好和修饰键总是加载；无法解析的触发器名称只记录日志，
    /// 得到的实例保持无效；注册表中找不到的动作标识则不绑定动作
    pub fn into_proxy(
        &self,
        keyboard_registrar: Arc<dyn HotkeyRegistrar>,
        mouse_registrar: Arc<dyn HotkeyRegistrar>,
        actions: &ActionRegistry,
    ) -> GenericHotkeyProxy {
        let mut proxy = GenericHotkeyProxy::new(keyboard_registrar, mouse_registrar);
        proxy.set_enabled(self.enabled);
        proxy.set_modifiers(self.modifiers);

        match self.activator_kind {
            ActivatorKind::Key => {
                proxy.set_kind(HotkeyKind::Keyboard);
                match self.activator_value.parse() {
                    Ok(key) => proxy.set_key(key),
                    Err(e) => {
                        tracing::warn!(
                            value = %self.activator_value,
                            error = %e,
                            "Unknown key name in hotkey config, hotkey stays invalid"
                        );
                    }
                }
            }
            ActivatorKind::Mouse => {
                proxy.set_kind(HotkeyKind::MouseHook);
                match self.activator_value.parse() {
                    Ok(action) => proxy.set_mouse_action(action),
                    Err(e) => {
                        tracing::warn!(
                            value = %self.activator_value,
                            error = %e,
                            "Unknown mouse action in hotkey config, hotkey stays invalid"
                        );
                    }
                }
            }
            ActivatorKind::None => {}
        }

        if self.action_identifier.is_empty() {
            return proxy;
        }
        match actions.get(&self.action_identifier) {
            Some(action) => proxy.set_action(Some(action.clone())),
            None => {
                tracing::warn!(
                    action = %self.action_identifier,
                    "Unknown action identifier in hotkey config, hotkey stays unbound"
                );
            }
        }
        proxy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::activator::{KeyCode, MouseAction};
    use crate::registry::{MouseHookDispatcher, SlotRegistry};

    fn registrars() -> (Arc<dyn HotkeyRegistrar>, Arc<dyn HotkeyRegistrar>) {
        (
            Arc::new(SlotRegistry::new()),
            Arc::new(MouseHookDispatcher::new()),
        )
    }

    #[test]
    fn test_proxy_round_trip_keyboard() {
        let (kb, mouse) = registrars();
        let mut proxy = GenericHotkeyProxy::new(Arc::clone(&kb), Arc::clone(&mouse));
        proxy.set_kind(HotkeyKind::Keyboard);
        proxy.set_ctrl(true);
        proxy.set_key(KeyCode::VolumeUp);
        proxy.set_enabled(false);

        let descriptor = HotkeyDescriptor::from_proxy(&proxy, "volume_up");
        assert_eq!(descriptor.activator_kind, ActivatorKind::Key);
        assert_eq!(descriptor.activator_value, "VolumeUp");
        assert!(!descriptor.enabled);

        let restored = descriptor.into_proxy(kb, mouse, &ActionRegistry::new());
        assert_eq!(restored.kind(), HotkeyKind::Keyboard);
        assert_eq!(restored.keyboard().unwrap().key(), Some(KeyCode::VolumeUp));
        assert!(restored.ctrl());
        assert!(!restored.enabled());
        assert!(restored.is_valid());
    }

    #[test]
    fn test_proxy_round_trip_mouse() {
        let (kb, mouse) = registrars();
        let mut proxy = GenericHotkeyProxy::new(Arc::clone(&kb), Arc::clone(&mouse));
        proxy.set_kind(HotkeyKind::MouseHook);
        proxy.set_mouse_action(MouseAction::XButton2);

        let descriptor = HotkeyDescriptor::from_proxy(&proxy, "toggle_mute");
        assert_eq!(descriptor.activator_kind, ActivatorKind::Mouse);
        assert_eq!(descriptor.activator_value, "XButton2");

        let restored = descriptor.into_proxy(kb, mouse, &ActionRegistry::new());
        assert_eq!(
            restored.mouse().unwrap().mouse_action(),
            Some(MouseAction::XButton2)
        );
    }

    #[test]
    fn test_unknown_key_name_degrades_to_invalid() {
        let (kb, mouse) = registrars();
        let descriptor = HotkeyDescriptor {
            enabled: true,
            modifiers: Modifiers::default().with_alt(true),
            activator_kind: ActivatorKind::Key,
            activator_value: "NoSuchKey".to_string(),
            action_identifier: String::new(),
        };

        let proxy = descriptor.into_proxy(kb, mouse, &ActionRegistry::new());
        // 启用偏好和修饰键照常加载，触发器缺失使实例无效
        assert!(proxy.enabled());
        assert!(proxy.alt());
        assert_eq!(proxy.kind(), HotkeyKind::Keyboard);
        assert!(!proxy.is_valid());
        assert!(proxy.keyboard().unwrap().key().is_none());
    }

    #[test]
    fn test_unknown_action_leaves_hotkey_unbound() {
        let (kb, mouse) = registrars();
        let descriptor = HotkeyDescriptor {
            enabled: true,
            modifiers: Modifiers::default(),
            activator_kind: ActivatorKind::Key,
            activator_value: "F7".to_string(),
            action_identifier: "no_such_action".to_string(),
        };

        let proxy = descriptor.into_proxy(kb, mouse, &ActionRegistry::new());
        assert!(proxy.is_valid());
        assert!(proxy.keyboard().unwrap().action().is_none());
    }

    #[test]
    fn test_descriptor_binds_registered_action() {
        let (kb, mouse) = registrars();
        let mut actions = ActionRegistry::new();
        actions.register(crate::action::ActionHandle::new("volume_up", || {}));

        let descriptor = HotkeyDescriptor {
            enabled: true,
            modifiers: Modifiers::default(),
            activator_kind: ActivatorKind::Key,
            activator_value: "VolumeUp".to_string(),
            action_identifier: "volume_up".to_string(),
        };

        let proxy = descriptor.into_proxy(kb, mouse, &actions);
        let action = proxy.keyboard().unwrap().action().unwrap();
        assert_eq!(action.name(), "volume_up");
    }

    #[test]
    fn test_serde_defaults() {
        let descriptor: HotkeyDescriptor = serde_json::from_str("{}").unwrap();
        assert!(descriptor.enabled);
        assert_eq!(descriptor.activator_kind, ActivatorKind::None);
        assert!(descriptor.activator_value.is_empty());
    }

    #[test]
    fn test_key_names_case_insensitive_on_load() {
        let (kb, mouse) = registrars();
        let descriptor = HotkeyDescriptor {
            enabled: true,
            modifiers: Modifiers::default(),
            activator_kind: ActivatorKind::Key,
            activator_value: "volumeup".to_string(),
            action_identifier: String::new(),
        };

        let proxy = descriptor.into_proxy(kb, mouse, &ActionRegistry::new());
        assert_eq!(proxy.keyboard().unwrap().key(), Some(KeyCode::VolumeUp));
    }
}
