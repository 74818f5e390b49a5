//! 动作模块
//!
//! 定义热键绑定的不透明动作能力和动作注册表
//!
//! 热键核心只决定**是否**以及**何时**调用动作，从不关心动作做了什么；
//! 音量增减、静音、播放/暂停等动作体由外部组件提供

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 动作回调类型
pub type ActionFn = Arc<dyn Fn() + Send + Sync>;

/// 动作句柄
///
/// 不透明的可调用能力：一个名称加一个回调。
/// 克隆是浅拷贝，克隆体与原句柄共享同一个回调引用
///
/// # Examples
///
/// ```
/// use volukey::action::ActionHandle;
///
/// let action = ActionHandle::new("volume_up", || {});
/// assert_eq!(action.name(), "volume_up");
///
/// let clone = action.clone();
/// assert!(ActionHandle::same_handle(&action, &clone));
/// ```
#[derive(Clone)]
pub struct ActionHandle {
    name: Arc<str>,
    callback: ActionFn,
}

impl ActionHandle {
    /// 创建新的动作句柄
    pub fn new(name: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            name: name.into().into(),
            callback: Arc::new(callback),
        }
    }

    /// 从已有回调创建动作句柄
    pub fn from_callback(name: impl Into<String>, callback: ActionFn) -> Self {
        Self {
            name: name.into().into(),
            callback,
        }
    }

    /// 获取动作名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 执行动作
    pub fn perform(&self) {
        (self.callback)();
    }

    /// 检查两个句柄是否共享同一个回调引用
    ///
    /// 用于验证克隆语义：热键克隆后动作是共享引用而非深拷贝
    pub fn same_handle(a: &ActionHandle, b: &ActionHandle) -> bool {
        Arc::ptr_eq(&a.callback, &b.callback)
    }
}

impl PartialEq for ActionHandle {
    /// 按名称比较；回调本身无法比较
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// 动作注册表
///
/// 持久化描述符中的 `action_identifier` 通过此表解析为具体句柄
///
/// # Examples
///
/// ```
/// use volukey::action::{ActionHandle, ActionRegistry};
///
/// let mut registry = ActionRegistry::new();
/// registry.register(ActionHandle::new("volume_up", || {}));
///
/// assert!(registry.get("volume_up").is_some());
/// assert!(registry.get("unknown").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionHandle>,
}

impl ActionRegistry {
    /// 创建空的动作注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个动作，以其名称为标识符
    ///
    /// 同名动作会被替换
    pub fn register(&mut self, action: ActionHandle) {
        let name = action.name().to_string();
        if self.actions.insert(name.clone(), action).is_some() {
            tracing::debug!(action = %name, "Replaced existing action registration");
        }
    }

    /// 按标识符查找动作
    pub fn get(&self, identifier: &str) -> Option<&ActionHandle> {
        self.actions.get(identifier)
    }

    /// 获取已注册的动作数量
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// 检查注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
