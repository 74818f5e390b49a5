//! 触发器模块
//!
//! 定义热键的具体触发值：键盘键码或鼠标动作
//!
//! 键码集合是一个封闭的枚举，不追求还原原生虚拟键码表，
//! 只覆盖音量控制场景常用的按键（字母、数字、功能键、方向键、媒体键）

use std::fmt;
use std::str::FromStr;

use super::error::HotkeyError;

/// 键盘键码
///
/// `KeyCode::None` 是"未分配按键"的哨兵值，持有它的键盘热键视为无效
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// 未分配按键（哨兵值）
    #[default]
    None,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    /// 媒体键：音量加
    VolumeUp,
    /// 媒体键：音量减
    VolumeDown,
    /// 媒体键：静音
    VolumeMute,
    /// 媒体键：播放/暂停
    MediaPlayPause,
    /// 媒体键：下一曲
    MediaNextTrack,
    /// 媒体键：上一曲
    MediaPrevTrack,
}

/// 键码与名称的对照表
///
/// `Display` 和 `FromStr` 共用这一张表，保证序列化往返一致
const KEY_NAMES: &[(KeyCode, &str)] = &[
    (KeyCode::None, "None"),
    (KeyCode::A, "A"),
    (KeyCode::B, "B"),
    (KeyCode::C, "C"),
    (KeyCode::D, "D"),
    (KeyCode::E, "E"),
    (KeyCode::F, "F"),
    (KeyCode::G, "G"),
    (KeyCode::H, "H"),
    (KeyCode::I, "I"),
    (KeyCode::J, "J"),
    (KeyCode::K, "K"),
    (KeyCode::L, "L"),
    (KeyCode::M, "M"),
    (KeyCode::N, "N"),
    (KeyCode::O, "O"),
    (KeyCode::P, "P"),
    (KeyCode::Q, "Q"),
    (KeyCode::R, "R"),
    (KeyCode::S, "S"),
    (KeyCode::T, "T"),
    (KeyCode::U, "U"),
    (KeyCode::V, "V"),
    (KeyCode::W, "W"),
    (KeyCode::X, "X"),
    (KeyCode::Y, "Y"),
    (KeyCode::Z, "Z"),
    (KeyCode::Num0, "0"),
    (KeyCode::Num1, "1"),
    (KeyCode::Num2, "2"),
    (KeyCode::Num3, "3"),
    (KeyCode::Num4, "4"),
    (KeyCode::Num5, "5"),
    (KeyCode::Num6, "6"),
    (KeyCode::Num7, "7"),
    (KeyCode::Num8, "8"),
    (KeyCode::Num9, "9"),
    (KeyCode::F1, "F1"),
    (KeyCode::F2, "F2"),
    (KeyCode::F3, "F3"),
    (KeyCode::F4, "F4"),
    (KeyCode::F5, "F5"),
    (KeyCode::F6, "F6"),
    (KeyCode::F7, "F7"),
    (KeyCode::F8, "F8"),
    (KeyCode::F9, "F9"),
    (KeyCode::F10, "F10"),
    (KeyCode::F11, "F11"),
    (KeyCode::F12, "F12"),
    (KeyCode::Left, "Left"),
    (KeyCode::Right, "Right"),
    (KeyCode::Up, "Up"),
    (KeyCode::Down, "Down"),
    (KeyCode::Space, "Space"),
    (KeyCode::Enter, "Enter"),
    (KeyCode::Escape, "Escape"),
    (KeyCode::Tab, "Tab"),
    (KeyCode::Backspace, "Backspace"),
    (KeyCode::Insert, "Insert"),
    (KeyCode::Delete, "Delete"),
    (KeyCode::Home, "Home"),
    (KeyCode::End, "End"),
    (KeyCode::PageUp, "PageUp"),
    (KeyCode::PageDown, "PageDown"),
    (KeyCode::VolumeUp, "VolumeUp"),
    (KeyCode::VolumeDown, "VolumeDown"),
    (KeyCode::VolumeMute, "VolumeMute"),
    (KeyCode::MediaPlayPause, "MediaPlayPause"),
    (KeyCode::MediaNextTrack, "MediaNextTrack"),
    (KeyCode::MediaPrevTrack, "MediaPrevTrack"),
];

impl KeyCode {
    /// 检查是否为"未分配按键"哨兵值
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// 获取键名（用于日志和持久化）
    pub fn name(&self) -> &'static str {
        KEY_NAMES
            .iter()
            .find(|(key, _)| key == self)
            .map(|(_, name)| *name)
            .unwrap_or("None")
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KeyCode {
    type Err = HotkeyError;

    /// 解析键名（不区分大小写）
    ///
    /// # Examples
    ///
    /// ```
    /// use volukey::hotkey::KeyCode;
    ///
    /// assert_eq!("VolumeUp".parse::<KeyCode>().unwrap(), KeyCode::VolumeUp);
    /// assert_eq!("left".parse::<KeyCode>().unwrap(), KeyCode::Left);
    /// assert!("NotAKey".parse::<KeyCode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEY_NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(key, _)| *key)
            .ok_or_else(|| HotkeyError::InvalidFormat(s.to_string()))
    }
}

/// 鼠标动作
///
/// 包含标准按钮、侧键和滚轮方向；有效性规则由鼠标热键变体决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// 左键
    Left,
    /// 右键
    Right,
    /// 中键
    Middle,
    /// 侧键 1（后退键）
    XButton1,
    /// 侧键 2（前进键）
    XButton2,
    /// 滚轮向上
    WheelUp,
    /// 滚轮向下
    WheelDown,
}

/// 鼠标动作与名称的对照表
const MOUSE_NAMES: &[(MouseAction, &str)] = &[
    (MouseAction::Left, "Left"),
    (MouseAction::Right, "Right"),
    (MouseAction::Middle, "Middle"),
    (MouseAction::XButton1, "XButton1"),
    (MouseAction::XButton2, "XButton2"),
    (MouseAction::WheelUp, "WheelUp"),
    (MouseAction::WheelDown, "WheelDown"),
];

impl MouseAction {
    /// 检查是否为侧键（XButton1 / XButton2）
    pub fn is_extra_button(&self) -> bool {
        matches!(self, Self::XButton1 | Self::XButton2)
    }

    /// 检查是否为滚轮方向
    pub fn is_wheel(&self) -> bool {
        matches!(self, Self::WheelUp | Self::WheelDown)
    }

    /// 获取动作名称（用于日志和持久化）
    pub fn name(&self) -> &'static str {
        MOUSE_NAMES
            .iter()
            .find(|(action, _)| action == self)
            .map(|(_, name)| *name)
            .unwrap_or("Left")
    }
}

impl fmt::Display for MouseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MouseAction {
    type Err = HotkeyError;

    /// 解析鼠标动作名称（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MOUSE_NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(action, _)| *action)
            .ok_or_else(|| HotkeyError::InvalidFormat(s.to_string()))
    }
}

/// 触发器：键盘键码或鼠标动作的和类型
///
/// 某一变体的热键只会持有匹配的分支，永远不会同时持有两者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activator {
    /// 键盘按键
    Key(KeyCode),
    /// 鼠标动作
    Mouse(MouseAction),
}

impl Activator {
    /// 检查是否为键盘触发器
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// 检查是否为鼠标触发器
    pub fn is_mouse(&self) -> bool {
        matches!(self, Self::Mouse(_))
    }

    /// 获取键码（如果是键盘触发器）
    pub fn key(&self) -> Option<KeyCode> {
        match self {
            Self::Key(key) => Some(*key),
            _ => None,
        }
    }

    /// 获取鼠标动作（如果是鼠标触发器）
    pub fn mouse(&self) -> Option<MouseAction> {
        match self {
            Self::Mouse(action) => Some(*action),
            _ => None,
        }
    }
}

impl fmt::Display for Activator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Mouse(action) => write!(f, "{}", action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_round_trip() {
        for (key, name) in KEY_NAMES {
            assert_eq!(name.parse::<KeyCode>().unwrap(), *key);
            assert_eq!(key.to_string(), *name);
        }
    }

    #[test]
    fn test_key_code_parse_case_insensitive() {
        assert_eq!("volumeup".parse::<KeyCode>().unwrap(), KeyCode::VolumeUp);
        assert_eq!("F7".parse::<KeyCode>().unwrap(), KeyCode::F7);
        assert_eq!("f7".parse::<KeyCode>().unwrap(), KeyCode::F7);
    }

    #[test]
    fn test_key_code_parse_unknown() {
        let result = "NotAKey".parse::<KeyCode>();
        assert!(matches!(result, Err(HotkeyError::InvalidFormat(_))));
    }

    #[test]
    fn test_key_code_sentinel() {
        assert!(KeyCode::None.is_none());
        assert!(!KeyCode::Left.is_none());
        assert_eq!(KeyCode::default(), KeyCode::None);
    }

    #[test]
    fn test_mouse_action_classification() {
        assert!(MouseAction::XButton1.is_extra_button());
        assert!(MouseAction::XButton2.is_extra_button());
        assert!(!MouseAction::WheelUp.is_extra_button());

        assert!(MouseAction::WheelUp.is_wheel());
        assert!(MouseAction::WheelDown.is_wheel());
        assert!(!MouseAction::Middle.is_wheel());

        assert!(!MouseAction::Left.is_extra_button() && !MouseAction::Left.is_wheel());
    }

    #[test]
    fn test_mouse_action_round_trip() {
        for (action, name) in MOUSE_NAMES {
            assert_eq!(name.parse::<MouseAction>().unwrap(), *action);
            assert_eq!(action.to_string(), *name);
        }
    }

    #[test]
    fn test_activator_accessors() {
        let key = Activator::Key(KeyCode::Left);
        assert!(key.is_key());
        assert_eq!(key.key(), Some(KeyCode::Left));
        assert_eq!(key.mouse(), None);

        let mouse = Activator::Mouse(MouseAction::WheelUp);
        assert!(mouse.is_mouse());
        assert_eq!(mouse.mouse(), Some(MouseAction::WheelUp));
        assert_eq!(mouse.key(), None);
    }

    #[test]
    fn test_activator_display() {
        assert_eq!(Activator::Key(KeyCode::F7).to_string(), "F7");
        assert_eq!(Activator::Mouse(MouseAction::WheelDown).to_string(), "WheelDown");
    }
}
