use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::registry::StatusRegistry;

/// Route a mouse event to the dismiss control it lands on, if any.
///
/// Returns `true` when a widget consumed the click; the application should
/// then skip its own handling of the event.
pub fn handle_mouse_event(registry: &StatusRegistry, event: &MouseEvent) -> bool {
    if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
        return false;
    }
    for widget in registry.widgets() {
        if widget.hit_dismiss(event.column, event.row) {
            widget.dismiss();
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;
    use crate::widget::StatusWidget;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::widgets::Widget;
    use std::time::Duration;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn click_on_the_dismiss_control_hides_the_widget() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::with_message(&registry, "Uploading");
        let w = w
            .attach(&Target::region("btn1", Rect::new(0, 0, 20, 3)), false)
            .unwrap();
        w.show();
        w.fast_forward(Duration::from_secs(2));

        let area = crate::ui::render::placement(&w, Rect::new(0, 0, 80, 24)).unwrap();
        let mut buf = Buffer::empty(area);
        (&w).render(area, &mut buf);

        let (x, y) = (area.right() - 2, area.y + 1);
        assert!(handle_mouse_event(&registry, &click(x, y)));
        // Default behavior hides without unregistering.
        w.fast_forward(Duration::from_secs(2));
        assert!(!w.is_visible());
        assert!(registry.contains("smart-btn1"));
    }

    #[test]
    fn click_elsewhere_is_not_consumed() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::with_message(&registry, "Uploading");
        let w = w
            .attach(&Target::region("btn1", Rect::new(0, 0, 20, 3)), false)
            .unwrap();
        w.show();
        assert!(!handle_mouse_event(&registry, &click(70, 20)));
        assert!(registry.contains("smart-btn1"));
    }
}
