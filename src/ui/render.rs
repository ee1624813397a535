use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::registry::StatusRegistry;
use crate::types::{Outcome, Phase};
use crate::ui::spinner;
use crate::widget::StatusWidget;

/// Height of every status container: one content row plus borders.
pub const WIDGET_HEIGHT: u16 = 3;

const MIN_WIDTH: u16 = 12;

/// Draw every visible registered widget. Call inside any `terminal.draw`
/// closure, after the application's own content so the indicators sit on
/// top of it.
pub fn render_widgets(f: &mut Frame, registry: &StatusRegistry) {
    let screen = f.size();
    for widget in registry.widgets() {
        match placement(&widget, screen) {
            Some(area) => f.render_widget(&widget, area),
            None => widget.clear_close_cell(),
        }
    }
}

/// Where `widget` lands on a screen of the given size: directly under its
/// anchor region (left edges aligned), or docked to the bottom edge for
/// screen-level widgets. `None` when the widget is invisible or off-screen.
pub fn placement(widget: &StatusWidget, screen: Rect) -> Option<Rect> {
    let st = widget.state.borrow();
    if st.destroyed || st.fade.opacity_at(Instant::now()) <= 0.0 {
        return None;
    }
    let desired = match st.anchor {
        Some(anchor) => {
            let width = (content_width(&st.message) as u16).max(MIN_WIDTH);
            Rect::new(anchor.x, anchor.y + anchor.height, width, WIDGET_HEIGHT)
        }
        None => Rect::new(
            screen.x,
            screen.bottom().saturating_sub(WIDGET_HEIGHT),
            screen.width,
            WIDGET_HEIGHT,
        ),
    };
    if screen.intersects(desired) {
        Some(desired.intersection(screen))
    } else {
        None
    }
}

fn content_width(message: &Text<'_>) -> usize {
    // glyph + space + message + space + close mark + two border columns
    message.width() + 6
}

fn glyph_for(phase: Phase, outcome: Option<Outcome>, alive: std::time::Duration) -> Span<'static> {
    match (phase, outcome) {
        (Phase::Loading, _) => Span::styled(
            spinner::frame_at(alive),
            Style::default().fg(Color::Cyan),
        ),
        (Phase::Final, Some(Outcome::Success)) => {
            Span::styled(spinner::CHECK_MARK, Style::default().fg(Color::Green))
        }
        (Phase::Final, _) => Span::styled(spinner::WARNING_MARK, Style::default().fg(Color::Red)),
    }
}

/// Clip `content` to at most `budget` display columns.
fn clip_to_width(content: &str, budget: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for c in content.chars() {
        let w = c.to_string().width();
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

impl Widget for &StatusWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut st = self.state.borrow_mut();
        let opacity = st.fade.opacity_at(Instant::now());
        if st.destroyed || opacity <= 0.0 || area.width < 4 || area.height < WIDGET_HEIGHT {
            st.close_cell = None;
            return;
        }

        // Mid-fade widgets render dimmed; the terminal has no real alpha.
        let overlay = if opacity < 1.0 {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        let block = Block::default().borders(Borders::ALL).border_style(overlay);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 3 || inner.height == 0 {
            st.close_cell = None;
            return;
        }

        let glyph = glyph_for(st.phase, st.outcome, st.created.elapsed());
        let mut spans: Vec<Span<'static>> = vec![
            Span::styled(glyph.content.clone(), glyph.style.patch(overlay)),
            Span::raw(" "),
        ];

        // As much of the first message line as fits, leaving room for the
        // dismiss control on the right.
        let budget = inner.width.saturating_sub(4) as usize;
        let mut used = 0usize;
        if let Some(line) = st.message.lines.first() {
            for span in &line.spans {
                let w = span.content.width();
                if used + w <= budget {
                    spans.push(Span::styled(
                        span.content.clone().into_owned(),
                        span.style.patch(overlay),
                    ));
                    used += w;
                } else {
                    let clipped = clip_to_width(&span.content, budget - used);
                    if !clipped.is_empty() {
                        spans.push(Span::styled(clipped, span.style.patch(overlay)));
                    }
                    break;
                }
            }
        }

        let row = Rect::new(inner.x, inner.y, inner.width, 1);
        Paragraph::new(Line::from(spans)).render(row, buf);

        let close_x = inner.right().saturating_sub(1);
        buf.get_mut(close_x, inner.y)
            .set_symbol(spinner::CLOSE_MARK)
            .set_style(overlay);
        st.close_cell = Some((close_x, inner.y));
    }
}
