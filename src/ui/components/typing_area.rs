use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::drill::DrillState;
use crate::ui::theme::Theme;

/// Target text split into typed, mistyped and pending parts.
pub struct TypingArea<'a> {
    drill: &'a DrillState,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(drill: &'a DrillState, theme: &'a Theme) -> Self {
        Self { drill, theme }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Done,
    Wrong,
    Cursor,
    Todo,
}

/// A render token maps a single character to its display representation.
#[derive(Debug)]
struct RenderToken {
    part: Part,
    display: String,
    is_line_break: bool,
}

fn push_tokens(tokens: &mut Vec<RenderToken>, chars: &[char], part: Part) {
    for &ch in chars {
        let (display, is_line_break) = match ch {
            '\n' => ("\u{21b5}".to_string(), true), // ↵
            '\t' => ("\u{2192}".to_string(), false), // →
            ' ' if part == Part::Wrong => ("\u{00b7}".to_string(), false), // ·
            _ => (ch.to_string(), false),
        };
        tokens.push(RenderToken {
            part,
            display,
            is_line_break,
        });
    }
}

/// Done text, then the pending wrong input, then the rest of the target
/// with its first character marked as the cursor.
fn build_render_tokens(done: &[char], wrong: &[char], todo: &[char]) -> Vec<RenderToken> {
    let mut tokens = Vec::with_capacity(done.len() + wrong.len() + todo.len());
    push_tokens(&mut tokens, done, Part::Done);
    push_tokens(&mut tokens, wrong, Part::Wrong);
    if let Some((first, rest)) = todo.split_first() {
        push_tokens(&mut tokens, std::slice::from_ref(first), Part::Cursor);
        push_tokens(&mut tokens, rest, Part::Todo);
    }
    tokens
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let tokens = build_render_tokens(self.drill.done(), self.drill.wrong(), self.drill.todo());

        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<Span> = Vec::new();
        for token in tokens {
            let style = match token.part {
                Part::Done => Style::default().fg(colors.text_correct()),
                Part::Wrong => Style::default()
                    .fg(colors.text_incorrect())
                    .bg(colors.text_incorrect_bg()),
                Part::Cursor => Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg()),
                Part::Todo => Style::default().fg(colors.text_pending()),
            };
            current.push(Span::styled(token.display, style));
            if token.is_line_break {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
        lines.push(Line::from(current));

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
