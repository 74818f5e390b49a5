//! 修饰键模块
//!
//! 定义热键组合中的修饰键集合（Shift / Ctrl / Alt / Win）

use std::fmt;

use serde::{Deserialize, Serialize};

/// 修饰键集合
///
/// 按值比较的小型值类型，序列化为四个布尔字段，
/// 与持久化描述符中的 `{shift, ctrl, alt, super}` 一致
///
/// # Examples
///
/// ```
/// use volukey::hotkey::Modifiers;
///
/// let mods = Modifiers::default().with_ctrl(true).with_shift(true);
/// assert!(mods.ctrl());
/// assert!(!mods.is_empty());
/// assert_eq!(mods.to_string(), "Ctrl+Shift");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift 键
    pub shift: bool,
    /// Ctrl 键
    pub ctrl: bool,
    /// Alt 键
    pub alt: bool,
    /// Win / Super 键
    #[serde(rename = "super")]
    pub win: bool,
}

impl Modifiers {
    /// 创建空的修饰键集合
    pub fn none() -> Self {
        Self::default()
    }

    /// 检查是否没有任何修饰键
    ///
    /// # Examples
    ///
    /// ```
    /// use volukey::hotkey::Modifiers;
    ///
    /// assert!(Modifiers::none().is_empty());
    /// assert!(!Modifiers::none().with_alt(true).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.win)
    }

    /// 读取 Shift 状态
    pub fn shift(&self) -> bool {
        self.shift
    }

    /// 读取 Ctrl 状态
    pub fn ctrl(&self) -> bool {
        self.ctrl
    }

    /// 读取 Alt 状态
    pub fn alt(&self) -> bool {
        self.alt
    }

    /// 读取 Win 状态
    pub fn win(&self) -> bool {
        self.win
    }

    /// 设置 Shift 键
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// 设置 Ctrl 键
    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    /// 设置 Alt 键
    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    /// 设置 Win 键
    pub fn with_win(mut self, win: bool) -> Self {
        self.win = win;
        self
    }
}

impl fmt::Display for Modifiers {
    /// 格式化为 "Ctrl+Shift+Alt+Win" 形式，空集合显示为 "None"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let mut first = true;
        for (set, name) in [
            (self.ctrl, "Ctrl"),
            (self.shift, "Shift"),
            (self.alt, "Alt"),
            (self.win, "Win"),
        ] {
            if set {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}
