//! 配置档案模块
//!
//! # 功能
//!
//! - 热键配置的整体序列化形式（[`HotkeyProfile`]）
//! - JSON 字符串与档案之间的转换
//! - 无锁共享的当前档案存储（[`ProfileStore`]），读多写少场景用 `ArcSwap`
//!
//! # 使用示例
//!
//! ```
//! use volukey::profile::{HotkeyProfile, ProfileStore};
//!
//! let store = ProfileStore::new();
//! assert!(store.load().hotkeys.is_empty());
//!
//! let profile: HotkeyProfile =
//!     r#"{ "hotkeys": [] }"#.parse().unwrap();
//! store.store(profile);
//! ```

use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::hotkey::HotkeyDescriptor;

/// 档案操作错误
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// JSON 序列化 / 反序列化失败
    #[error("Profile JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 档案操作结果类型
pub type ProfileResult<T> = Result<T, ProfileError>;

/// 热键配置档案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotkeyProfile {
    /// 档案中的全部热键描述
    #[serde(default)]
    pub hotkeys: Vec<HotkeyDescriptor>,
}

impl HotkeyProfile {
    /// 创建空档案
    pub fn new() -> Self {
        Self::default()
    }

    /// 序列化为带缩进的 JSON 字符串
    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromStr for HotkeyProfile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// 当前生效档案的共享存储
///
/// 派发热路径只读档案，更新只在用户保存设置时发生，
/// 用 `ArcSwap` 做无锁读、整体替换写
#[derive(Debug, Default)]
pub struct ProfileStore {
    current: ArcSwap<HotkeyProfile>,
}

impl ProfileStore {
    /// 创建存储，初始为空档案
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取当前档案的快照
    pub fn load(&self) -> Arc<HotkeyProfile> {
        self.current.load_full()
    }

    /// 整体替换当前档案
    pub fn store(&self, profile: HotkeyProfile) {
        tracing::debug!(hotkeys = profile.hotkeys.len(), "Storing hotkey profile");
        self.current.store(Arc::new(profile));
    }
}
