use crate::core::event::{EventKind, InputEvent, KeyInput};
use crate::core::page::Page;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 預設攔截的快捷鍵：複製、檢視原始碼、儲存、列印
pub const DEFAULT_BLOCKED_KEYS: [&str; 4] = ["c", "u", "s", "p"];

/// 防複製守則：要攔下哪些預設行為。
///
/// 比對是精確且區分大小寫的，只看 ctrl 修飾鍵；
/// ctrl+shift+C 送出的 key 是 "C"，不會命中 "c"。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPolicy {
    pub block_context_menu: bool,
    pub blocked_keys: BTreeSet<String>,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            block_context_menu: true,
            blocked_keys: DEFAULT_BLOCKED_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl GuardPolicy {
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            block_context_menu: true,
            blocked_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// 快捷鍵攔截判準：ctrl 按住且 key 在攔截集合內
    pub fn should_block_key(&self, input: &KeyInput) -> bool {
        input.modifiers.ctrl && self.blocked_keys.contains(input.key.as_str())
    }
}

/// 把兩個攔截處理器掛上頁面。
///
/// 右鍵選單攔截走累加監聽器，快捷鍵攔截佔用 keydown 插槽，
/// 對應原始掛載方式的不對稱（addEventListener vs onkeydown）。
pub fn install_guard(page: &mut Page, policy: &GuardPolicy) {
    if policy.block_context_menu {
        page.add_event_listener(EventKind::ContextMenu, |_, state| state.prevent_default());
    }

    let policy = policy.clone();
    page.set_handler(EventKind::KeyDown, move |event, state| {
        if let InputEvent::KeyDown(input) = event {
            if policy.should_block_key(input) {
                state.prevent_default();
            }
        }
    });
}
