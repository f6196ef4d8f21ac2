use crate::core::event::{Disposition, EventKind, EventState, InputEvent};
use std::collections::HashMap;

type Handler = Box<dyn Fn(&InputEvent, &mut EventState) + Send + Sync>;

/// 無頭文件目標：保存事件處理器註冊，並以同步方式派送事件。
///
/// 兩種註冊方式對應瀏覽器的兩種掛載語意：
/// - `add_event_listener` 累加，依註冊順序執行（addEventListener）
/// - `set_handler` 每種事件只有一個插槽，後設定者取代前者（onkeydown 屬性）
pub struct Page {
    listeners: HashMap<EventKind, Vec<Handler>>,
    assigned: HashMap<EventKind, Handler>,
}

impl Page {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            assigned: HashMap::new(),
        }
    }

    pub fn add_event_listener<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&InputEvent, &mut EventState) + Send + Sync + 'static,
    {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn set_handler<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&InputEvent, &mut EventState) + Send + Sync + 'static,
    {
        self.assigned.insert(kind, Box::new(handler));
    }

    /// 對應 `element.onkeydown = null`，回傳是否真的移除了處理器
    pub fn clear_handler(&mut self, kind: EventKind) -> bool {
        self.assigned.remove(&kind).is_some()
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        let listeners = self.listeners.get(&kind).map(Vec::len).unwrap_or(0);
        let assigned = usize::from(self.assigned.contains_key(&kind));
        listeners + assigned
    }

    /// 同步派送單一事件：先跑累加的監聽器，再跑插槽處理器。
    /// 沒有任何處理器時事件原樣通過。
    pub fn dispatch(&self, event: &InputEvent) -> Disposition {
        let kind = event.kind();
        let mut state = EventState::new();
        let mut handlers_run = 0;

        if let Some(listeners) = self.listeners.get(&kind) {
            for listener in listeners {
                listener(event, &mut state);
                handlers_run += 1;
                if state.immediate_propagation_stopped() {
                    break;
                }
            }
        }

        if !state.immediate_propagation_stopped() {
            if let Some(handler) = self.assigned.get(&kind) {
                handler(event, &mut state);
                handlers_run += 1;
            }
        }

        tracing::debug!(
            "Dispatched {}: default_prevented={}, handlers_run={}",
            kind,
            state.default_prevented(),
            handlers_run
        );

        Disposition {
            default_prevented: state.default_prevented(),
            handlers_run,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{KeyInput, PointerInput};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_without_handlers_passes_through() {
        let page = Page::new();
        let disposition = page.dispatch(&InputEvent::KeyDown(KeyInput::plain("a")));

        assert!(!disposition.default_prevented);
        assert_eq!(disposition.handlers_run, 0);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut page = Page::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            page.add_event_listener(EventKind::Click, move |_, _| {
                order.lock().unwrap().push(tag);
            });
        }

        let disposition = page.dispatch(&InputEvent::Click(PointerInput::default()));

        assert_eq!(disposition.handlers_run, 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_set_handler_replaces_previous_assignment() {
        let mut page = Page::new();

        page.set_handler(EventKind::KeyDown, |_, state| state.prevent_default());
        page.set_handler(EventKind::KeyDown, |_, _| {});

        let disposition = page.dispatch(&InputEvent::KeyDown(KeyInput::plain("x")));

        // 第二次設定取代了第一個會取消預設行為的處理器
        assert!(!disposition.default_prevented);
        assert_eq!(disposition.handlers_run, 1);
        assert_eq!(page.handler_count(EventKind::KeyDown), 1);
    }

    #[test]
    fn test_assigned_handler_runs_after_listeners() {
        let mut page = Page::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let listener_order = Arc::clone(&order);
        page.add_event_listener(EventKind::KeyDown, move |_, _| {
            listener_order.lock().unwrap().push("listener");
        });

        let assigned_order = Arc::clone(&order);
        page.set_handler(EventKind::KeyDown, move |_, _| {
            assigned_order.lock().unwrap().push("assigned");
        });

        page.dispatch(&InputEvent::KeyDown(KeyInput::plain("a")));

        assert_eq!(*order.lock().unwrap(), vec!["listener", "assigned"]);
    }

    #[test]
    fn test_stop_immediate_propagation_skips_remaining_handlers() {
        let mut page = Page::new();

        page.add_event_listener(EventKind::KeyDown, |_, state| {
            state.stop_immediate_propagation();
        });
        page.add_event_listener(EventKind::KeyDown, |_, state| state.prevent_default());
        page.set_handler(EventKind::KeyDown, |_, state| state.prevent_default());

        let disposition = page.dispatch(&InputEvent::KeyDown(KeyInput::plain("a")));

        assert!(!disposition.default_prevented);
        assert_eq!(disposition.handlers_run, 1);
    }

    #[test]
    fn test_clear_handler() {
        let mut page = Page::new();
        page.set_handler(EventKind::KeyDown, |_, state| state.prevent_default());

        assert!(page.clear_handler(EventKind::KeyDown));
        assert!(!page.clear_handler(EventKind::KeyDown));

        let disposition = page.dispatch(&InputEvent::KeyDown(KeyInput::plain("s")));
        assert!(!disposition.default_prevented);
    }

    #[test]
    fn test_dispatch_only_touches_matching_kind() {
        let mut page = Page::new();
        page.add_event_listener(EventKind::ContextMenu, |_, state| state.prevent_default());

        let disposition = page.dispatch(&InputEvent::Click(PointerInput::secondary_at(5, 5)));

        assert!(!disposition.default_prevented);
        assert_eq!(disposition.handlers_run, 0);
    }
}
