//! 全局错误处理模块
//!
//! 提供统一的应用错误类型和用户友好的错误消息
//!
//! # 功能
//!
//! - 统一的 `AppError` 类型，聚合所有模块错误
//! - 用户友好的错误消息
//! - 错误代码用于界面层处理
//! - 错误恢复建议
//!
//! # 使用示例
//!
//! ```
//! use volukey::utils::error::AppError;
//!
//! fn example() -> Result<(), AppError> {
//!     // 从其他错误类型自动转换
//!     // let profile: HotkeyProfile = json.parse()?;
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hotkey::HotkeyError;
use crate::profile::ProfileError;

/// 应用错误类型
///
/// 聚合所有模块的错误类型，提供统一的错误处理接口
#[derive(Error, Debug)]
pub enum AppError {
    /// 热键错误
    #[error("Hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),

    /// 配置档案错误
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 错误代码
///
/// 用于界面层识别和处理特定错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 热键错误 (1xxx)
    /// 组合键已被占用
    HotkeyConflict,
    /// 系统槽位用尽
    HotkeySlotsExhausted,
    /// 无法解析的按键或动作名称
    HotkeyInvalidFormat,
    /// 注册失败
    HotkeyRegistrationFailed,

    // 配置错误 (2xxx)
    /// 配置档案无效
    ProfileInvalid,

    // 通用错误 (9xxx)
    /// 内部错误
    InternalError,
}

/// 错误上下文信息
///
/// 提供用户友好的错误信息和恢复建议
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// 错误代码
    pub code: ErrorCode,
    /// 用户友好的错误消息
    pub message: String,
    /// 详细错误信息（用于日志）
    pub detail: Option<String>,
    /// 恢复建议
    pub recovery_hint: Option<String>,
    /// 是否可恢复
    pub recoverable: bool,
}

impl ErrorContext {
    /// 创建新的错误上下文
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
            recovery_hint: None,
            recoverable: true,
        }
    }

    /// 设置详细信息
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 设置恢复建议
    pub fn with_recovery_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    /// 标记为不可恢复
    pub fn not_recoverable(mut self) -> Self {
        self.recoverable = false;
        self
    }
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Hotkey(HotkeyError::Conflict { .. }) => ErrorCode::HotkeyConflict,
            AppError::Hotkey(HotkeyError::SlotsExhausted { .. }) => {
                ErrorCode::HotkeySlotsExhausted
            }
            AppError::Hotkey(HotkeyError::InvalidFormat(_)) => ErrorCode::HotkeyInvalidFormat,
            AppError::Hotkey(HotkeyError::RegistrationFailed { .. }) => {
                ErrorCode::HotkeyRegistrationFailed
            }

            AppError::Profile(ProfileError::Json(_)) => ErrorCode::ProfileInvalid,

            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// 获取用户友好的错误消息
    ///
    /// 返回适合直接显示给用户的错误消息
    pub fn user_message(&self) -> String {
        match self {
            AppError::Hotkey(HotkeyError::Conflict { .. }) => {
                "该组合键已被其他程序占用，请换一个组合".to_string()
            }
            AppError::Hotkey(HotkeyError::SlotsExhausted { .. }) => {
                "热键数量已达上限，请先删除不用的热键".to_string()
            }
            AppError::Hotkey(HotkeyError::InvalidFormat(_)) => {
                "无法识别的按键或鼠标动作名称".to_string()
            }
            AppError::Hotkey(HotkeyError::RegistrationFailed { .. }) => {
                "热键注册失败，请重试".to_string()
            }

            AppError::Profile(ProfileError::Json(_)) => "配置文件格式错误".to_string(),

            AppError::Internal(msg) => {
                format!("内部错误: {}", msg)
            }
        }
    }

    /// 获取完整的错误上下文
    pub fn context(&self) -> ErrorContext {
        let code = self.code();
        let message = self.user_message();

        let mut ctx = ErrorContext::new(code, message).with_detail(self.to_string());

        ctx.recovery_hint = self.recovery_hint();

        if !self.is_recoverable() {
            ctx = ctx.not_recoverable();
        }

        ctx
    }

    /// 获取恢复建议
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            AppError::Hotkey(HotkeyError::Conflict { .. }) => {
                Some("加上一个修饰键（如 Ctrl 或 Shift）通常可以避开冲突".to_string())
            }
            AppError::Hotkey(HotkeyError::SlotsExhausted { .. }) => {
                Some("请在设置中禁用或删除部分热键后重试".to_string())
            }
            AppError::Profile(ProfileError::Json(_)) => {
                Some("请检查配置文件，或删除它以恢复默认配置".to_string())
            }
            _ => None,
        }
    }

    /// 检查错误是否可恢复
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Internal(_))
    }

    /// 检查是否是组合键冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Hotkey(HotkeyError::Conflict { .. }))
    }

    /// 检查是否是配置档案错误
    pub fn is_profile_error(&self) -> bool {
        matches!(self, AppError::Profile(_))
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 将任意错误转换为内部错误
impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
