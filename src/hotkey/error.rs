//! 热键相关错误类型

use thiserror::Error;

/// 热键相关错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HotkeyError {
    /// 无效的触发器格式（按键或鼠标动作字符串无法解析）
    #[error("Invalid activator format: {0}")]
    InvalidFormat(String),

    /// 组合键已被其他程序占用
    #[error("Hotkey '{binding}' is already in use by another program")]
    Conflict {
        /// 冲突的组合键描述
        binding: String,
    },

    /// 注册槽位已耗尽
    #[error("No free hotkey slots left (capacity {capacity})")]
    SlotsExhausted {
        /// 注册器的槽位上限
        capacity: usize,
    },

    /// 热键注册失败（非冲突原因）
    #[error("Failed to register hotkey '{binding}': {reason}")]
    RegistrationFailed {
        /// 待注册的组合键描述
        binding: String,
        /// 失败原因
        reason: String,
    },
}

impl HotkeyError {
    /// 检查是否为冲突错误
    ///
    /// 冲突错误会被热键本地恢复（标记为无效而非向上传播）
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// 热键模块的结果类型
pub type HotkeyResult<T> = Result<T, HotkeyError>;
