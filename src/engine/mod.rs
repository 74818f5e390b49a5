//! 热键引擎模块
//!
//! # 功能
//!
//! - 把原始输入事件路由到对应热键并执行其动作
//! - 从配置档案整体重建热键集合（先停用旧集合再建新集合）
//! - 通过 `tokio` mpsc 通道接收平台钩子线程转发的事件
//!
//! # 使用示例
//!
//! ```no_run
//! use volukey::action::{ActionHandle, ActionRegistry};
//! use volukey::engine::HotkeyEngine;
//! use volukey::profile::HotkeyProfile;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut actions = ActionRegistry::new();
//!     actions.register(ActionHandle::new("volume_up", || {}));
//!
//!     let (mut engine, _events) = HotkeyEngine::new();
//!     engine.apply_profile(&HotkeyProfile::new(), &actions);
//!     engine.run().await;
//! }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::ActionRegistry;
use crate::hotkey::{HotkeyKind, HotkeySet};
use crate::profile::HotkeyProfile;
use crate::registry::{
    HotkeyRegistrar, MouseEvent, MouseHookDispatcher, RegistrationId, SlotRegistry,
};

/// 事件通道容量
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 平台钩子转发的原始输入事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// 键盘热键触发，操作系统回调直接携带注册标识
    Keyboard { id: RegistrationId },
    /// 底层鼠标钩子观察到的动作与当时按下的修饰键
    Mouse(MouseEvent),
}

/// 热键引擎
///
/// 持有键盘槽位注册表、共享鼠标钩子分发器和当前热键集合，
/// 在事件循环中完成 事件 -> 热键 -> 动作 的路由
pub struct HotkeyEngine {
    hotkeys: HotkeySet,
    keyboard_registry: Arc<SlotRegistry>,
    mouse_hook: Arc<MouseHookDispatcher>,
    events: mpsc::Receiver<InputEvent>,
}

impl HotkeyEngine {
    /// 创建引擎与对应的事件发送端
    pub fn new() -> (Self, mpsc::Sender<InputEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let engine = Self {
            hotkeys: HotkeySet::new(),
            keyboard_registry: Arc::new(SlotRegistry::new()),
            mouse_hook: Arc::new(MouseHookDispatcher::new()),
            events: rx,
        };
        (engine, tx)
    }

    /// 当前热键集合
    pub fn hotkeys(&self) -> &HotkeySet {
        &self.hotkeys
    }

    /// 键盘槽位注册表
    pub fn keyboard_registry(&self) -> &Arc<SlotRegistry> {
        &self.keyboard_registry
    }

    /// 共享鼠标钩子分发器
    pub fn mouse_hook(&self) -> &Arc<MouseHookDispatcher> {
        &self.mouse_hook
    }

    /// 用档案整体重建热键集合
    ///
    /// 先停用并清空旧集合再实例化新档案；类型未定、
    /// 或与已加入的热键重复的条目跳过并记录日志，
    /// 最后统一激活所有启用的热键
    pub fn apply_profile(&mut self, profile: &HotkeyProfile, actions: &ActionRegistry) {
        self.hotkeys.clear();

        for descriptor in &profile.hotkeys {
            let proxy = descriptor.into_proxy(
                Arc::clone(&self.keyboard_registry) as Arc<dyn HotkeyRegistrar>,
                Arc::clone(&self.mouse_hook) as Arc<dyn HotkeyRegistrar>,
                actions,
            );
            if proxy.kind() == HotkeyKind::Undefined {
                tracing::warn!("Profile entry has no activator kind, skipping");
                continue;
            }
            let Some(hotkey) = proxy.to_hotkey() else {
                continue;
            };
            if self.hotkeys.is_already_in_use(&hotkey) {
                tracing::warn!(
                    activator = %descriptor.activator_value,
                    "Duplicate hotkey in profile, skipping"
                );
                continue;
            }
            self.hotkeys.push(hotkey);
        }

        self.hotkeys.activate_enabled();
        tracing::info!(count = self.hotkeys.len(), "Hotkey profile applied");
    }

    /// 处理一个输入事件，返回是否有动作被执行
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Keyboard { id } => self.hotkeys.dispatch_by_token(id),
            InputEvent::Mouse(mouse_event) => match self.mouse_hook.match_event(&mouse_event) {
                Some(id) => self.hotkeys.dispatch_by_token(id),
                None => false,
            },
        }
    }

    /// 事件循环：消费事件直到所有发送端关闭，退出前释放全部注册
    pub async fn run(&mut self) {
        tracing::info!("Hotkey engine started");
        while let Some(event) = self.events.recv().await {
            self.handle_event(event);
        }
        self.hotkeys.deactivate_all();
        tracing::info!("Hotkey engine stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::action::ActionHandle;
    use crate::hotkey::{ActivatorKind, Hotkey, HotkeyDescriptor, Modifiers};

    fn counting_registry() -> (ActionRegistry, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let up = Arc::new(AtomicUsize::new(0));
        let down = Arc::new(AtomicUsize::new(0));
        let mut actions = ActionRegistry::new();
        let up_hits = Arc::clone(&up);
        actions.register(ActionHandle::new("volume_up", move || {
            up_hits.fetch_add(1, Ordering::SeqCst);
        }));
        let down_hits = Arc::clone(&down);
        actions.register(ActionHandle::new("volume_down", move || {
            down_hits.fetch_add(1, Ordering::SeqCst);
        }));
        (actions, up, down)
    }

    fn key_descriptor(key: &str, action: &str) -> HotkeyDescriptor {
        HotkeyDescriptor {
            enabled: true,
            modifiers: Modifiers::default().with_ctrl(true),
            activator_kind: ActivatorKind::Key,
            activator_value: key.to_string(),
            action_identifier: action.to_string(),
        }
    }

    fn wheel_descriptor(direction: &str, action: &str) -> HotkeyDescriptor {
        HotkeyDescriptor {
            enabled: true,
            modifiers: Modifiers::default().with_ctrl(true),
            activator_kind: ActivatorKind::Mouse,
            activator_value: direction.to_string(),
            action_identifier: action.to_string(),
        }
    }

    #[test]
    fn test_apply_profile_registers_enabled_hotkeys() {
        let (actions, _, _) = counting_registry();
        let (mut engine, _tx) = HotkeyEngine::new();

        let mut disabled = key_descriptor("VolumeDown", "volume_down");
        disabled.enabled = false;
        let profile = HotkeyProfile {
            hotkeys: vec![key_descriptor("VolumeUp", "volume_up"), disabled],
        };
        engine.apply_profile(&profile, &actions);

        assert_eq!(engine.hotkeys().len(), 2);
        assert_eq!(engine.keyboard_registry().registered_count(), 1);
    }

    #[test]
    fn test_apply_profile_skips_duplicates() {
        let (actions, _, _) = counting_registry();
        let (mut engine, _tx) = HotkeyEngine::new();

        let profile = HotkeyProfile {
            hotkeys: vec![
                key_descriptor("VolumeUp", "volume_up"),
                key_descriptor("VolumeUp", "volume_down"),
            ],
        };
        engine.apply_profile(&profile, &actions);
        assert_eq!(engine.hotkeys().len(), 1);
    }

    #[test]
    fn test_reapply_releases_previous_registrations() {
        let (actions, _, _) = counting_registry();
        let (mut engine, _tx) = HotkeyEngine::new();

        let first = HotkeyProfile {
            hotkeys: vec![key_descriptor("VolumeUp", "volume_up")],
        };
        engine.apply_profile(&first, &actions);
        assert_eq!(engine.keyboard_registry().registered_count(), 1);

        // 换成鼠标方案后键盘槽位全部归还
        let second = HotkeyProfile {
            hotkeys: vec![wheel_descriptor("WheelUp", "volume_up")],
        };
        engine.apply_profile(&second, &actions);
        assert_eq!(engine.keyboard_registry().registered_count(), 0);
        assert_eq!(engine.mouse_hook().registered_count(), 1);
    }

    #[test]
    fn test_keyboard_event_dispatches_action() {
        let (actions, up, _) = counting_registry();
        let (mut engine, _tx) = HotkeyEngine::new();
        engine.apply_profile(
            &HotkeyProfile {
                hotkeys: vec![key_descriptor("VolumeUp", "volume_up")],
            },
            &actions,
        );

        let id = engine
            .hotkeys()
            .iter()
            .next()
            .and_then(Hotkey::token_id)
            .unwrap();
        assert!(engine.handle_event(InputEvent::Keyboard { id }));
        assert_eq!(up.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mouse_event_requires_exact_modifiers() {
        let (actions, up, _) = counting_registry();
        let (mut engine, _tx) = HotkeyEngine::new();
        engine.apply_profile(
            &HotkeyProfile {
                hotkeys: vec![wheel_descriptor("WheelUp", "volume_up")],
            },
            &actions,
        );

        let wrong = InputEvent::Mouse(MouseEvent {
            action: crate::hotkey::MouseAction::WheelUp,
            modifiers: Modifiers::default(),
        });
        assert!(!engine.handle_event(wrong));

        let exact = InputEvent::Mouse(MouseEvent {
            action: crate::hotkey::MouseAction::WheelUp,
            modifiers: Modifiers::default().with_ctrl(true),
        });
        assert!(engine.handle_event(exact));
        assert_eq!(up.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_consumes_events_until_senders_drop() {
        let (actions, up, down) = counting_registry();
        let (mut engine, tx) = HotkeyEngine::new();
        engine.apply_profile(
            &HotkeyProfile {
                hotkeys: vec![
                    key_descriptor("VolumeUp", "volume_up"),
                    key_descriptor("VolumeDown", "volume_down"),
                ],
            },
            &actions,
        );

        let ids: Vec<_> = engine
            .hotkeys()
            .iter()
            .filter_map(Hotkey::token_id)
            .collect();
        assert_eq!(ids.len(), 2);

        tx.send(InputEvent::Keyboard { id: ids[0] }).await.unwrap();
        tx.send(InputEvent::Keyboard { id: ids[1] }).await.unwrap();
        drop(tx);

        engine.run().await;
        assert_eq!(up.load(Ordering::SeqCst) + down.load(Ordering::SeqCst), 2);
        // 退出时释放全部注册
        assert_eq!(engine.keyboard_registry().registered_count(), 0);
    }
}
