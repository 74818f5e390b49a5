//! 热键集合模块
//!
//! 运行时持有的全部热键的属主集合：负责重复检测、
//! 批量激活 / 停用以及按注册标识路由触发事件

use crate::registry::RegistrationId;

use super::base::Hotkey;

/// 热键属主集合
///
/// 程序退出前调用 [`HotkeySet::deactivate_all`] 统一释放注册，
/// 不依赖逐个析构的顺序
#[derive(Debug, Default)]
pub struct HotkeySet {
    hotkeys: Vec<Hotkey>,
}

impl HotkeySet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 集合中的热键数量
    pub fn len(&self) -> usize {
        self.hotkeys.len()
    }

    /// 集合是否为空
    pub fn is_empty(&self) -> bool {
        self.hotkeys.is_empty()
    }

    /// 遍历集合
    pub fn iter(&self) -> impl Iterator<Item = &Hotkey> {
        self.hotkeys.iter()
    }

    /// 检查候选热键是否与集合中已有的热键占用同一组合
    ///
    /// 比较遵循冲突语义：类型、修饰键、触发器一致即冲突，
    /// enabled 与绑定的动作不参与比较
    pub fn is_already_in_use(&self, candidate: &Hotkey) -> bool {
        self.hotkeys
            .iter()
            .any(|existing| existing.conflicts_with(candidate))
    }

    /// 查找与候选冲突的已有热键
    pub fn find_conflict(&self, candidate: &Hotkey) -> Option<&Hotkey> {
        self.hotkeys
            .iter()
            .find(|existing| existing.conflicts_with(candidate))
    }

    /// 加入热键，不做重复检查
    ///
    /// 需要去重的调用方先用 [`HotkeySet::is_already_in_use`] 检查
    pub fn push(&mut self, hotkey: Hotkey) {
        self.hotkeys.push(hotkey);
    }

    /// 激活集合中所有启用的热键
    pub fn activate_enabled(&mut self) {
        for hotkey in &mut self.hotkeys {
            if hotkey.enabled() {
                hotkey.activate();
            }
        }
    }

    /// 停用集合中的全部热键并释放注册
    pub fn deactivate_all(&mut self) {
        for hotkey in &mut self.hotkeys {
            hotkey.deactivate();
        }
    }

    /// 移除并返回指定位置的热键，移除前先停用以归还注册
    pub fn remove(&mut self, index: usize) -> Hotkey {
        let mut hotkey = self.hotkeys.remove(index);
        hotkey.deactivate();
        hotkey
    }

    /// 清空集合，先停用再移除
    pub fn clear(&mut self) {
        self.deactivate_all();
        self.hotkeys.clear();
    }

    /// 按注册标识路由一次触发
    ///
    /// 返回动作是否真正执行（未命中、被限频或无动作时为 false）
    pub fn dispatch_by_token(&mut self, id: RegistrationId) -> bool {
        for hotkey in &mut self.hotkeys {
            if hotkey.token_id() == Some(id) {
                return hotkey.dispatch();
            }
        }
        tracing::debug!(id = %id, "No hotkey bound to registration id");
        false
    }
}
