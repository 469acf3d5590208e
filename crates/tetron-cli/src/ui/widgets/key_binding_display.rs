use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// A help entry: keys, the action they trigger, and whether the current phase accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding<'a> {
    pub keys: &'a [&'a str],
    pub action: &'a str,
    pub enabled: bool,
}

impl<'a> KeyBinding<'a> {
    pub const fn new(keys: &'a [&'a str], action: &'a str) -> Self {
        Self {
            keys,
            action,
            enabled: true,
        }
    }

    #[must_use]
    pub const fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

/// One-line help bar. Bindings the session would reject are dimmed.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self { bindings }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const ACTION_STYLE: Style = Style::new().fg(Color::Gray);
const DISABLED_STYLE: Style = Style::new().fg(Color::DarkGray);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![];
        for binding in self.bindings {
            if !spans.is_empty() {
                spans.push(Span::styled(" | ", SEPARATOR_STYLE));
            }
            let (key_style, action_style) = if binding.enabled {
                (KEY_STYLE, ACTION_STYLE)
            } else {
                (DISABLED_STYLE, DISABLED_STYLE)
            };
            let keys = binding.keys.join("/");
            spans.push(Span::styled(keys, key_style));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(binding.action, action_style));
        }

        Line::from(spans).centered().render(area, buf);
    }
}
