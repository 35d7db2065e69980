use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

/// One-line header: drill title, timer, live speed and typo count.
pub struct StatusBar<'a> {
    pub title: &'a str,
    pub elapsed_secs: Option<f64>,
    pub wpm: f64,
    pub typos: usize,
    pub theme: &'a Theme,
}

impl StatusBar<'_> {
    fn timer(&self) -> String {
        match self.elapsed_secs {
            Some(secs) => format!("{secs:.1} sec"),
            None => "Go!".to_string(),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let base = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.title),
                base.fg(colors.accent()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" | {} ", self.timer()), base),
        ];
        if self.wpm > 0.0 {
            spans.push(Span::styled(format!(" | {:.0} wpm ", self.wpm), base));
        }
        spans.push(Span::styled(format!(" | {} typos ", self.typos), base));
        spans.push(Span::styled(" | Esc to stop ", base.fg(colors.text_pending())));

        Paragraph::new(Line::from(spans)).style(base).render(area, buf);
    }
}
