use serde::{Deserialize, Serialize};

/// 事件種類，序列化時使用 DOM 事件名稱（contextmenu、keydown...）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    ContextMenu,
    KeyDown,
    KeyUp,
    Click,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ContextMenu => "contextmenu",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Click => "click",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 修飾鍵狀態，對應 KeyboardEvent 的 ctrlKey/altKey/shiftKey/metaKey
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// 一次按鍵輸入；key 使用 KeyboardEvent.key 的字彙（"c"、"C"、"F12"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub repeat: bool,
}

impl KeyInput {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    pub fn with_ctrl(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
            repeat: false,
        }
    }
}

/// 指標輸入；button 2 為次要鍵（右鍵）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerInput {
    pub x: i32,
    pub y: i32,
    pub button: u8,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            button: 0,
        }
    }
}

impl PointerInput {
    pub fn secondary_at(x: i32, y: i32) -> Self {
        Self { x, y, button: 2 }
    }
}

/// 送達文件目標的單一輸入事件
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ContextMenu(PointerInput),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    Click(PointerInput),
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::ContextMenu(_) => EventKind::ContextMenu,
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::Click(_) => EventKind::Click,
        }
    }

    /// 報表用的簡短描述，例如 "ctrl+s" 或 "button 2 @ (120, 40)"
    pub fn describe(&self) -> String {
        match self {
            InputEvent::KeyDown(input) | InputEvent::KeyUp(input) => {
                let mut parts = Vec::new();
                if input.modifiers.ctrl {
                    parts.push("ctrl");
                }
                if input.modifiers.alt {
                    parts.push("alt");
                }
                if input.modifiers.shift {
                    parts.push("shift");
                }
                if input.modifiers.meta {
                    parts.push("meta");
                }
                parts.push(input.key.as_str());
                parts.join("+")
            }
            InputEvent::ContextMenu(pointer) | InputEvent::Click(pointer) => {
                format!("button {} @ ({}, {})", pointer.button, pointer.x, pointer.y)
            }
        }
    }
}

/// 單次派送的事件狀態；處理器透過它取消預設行為
#[derive(Debug, Default)]
pub struct EventState {
    default_prevented: bool,
    immediate_propagation_stopped: bool,
}

impl EventState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// 派送完成後的最終結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    pub default_prevented: bool,
    pub handlers_run: usize,
}
