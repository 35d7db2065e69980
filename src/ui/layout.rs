use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions of the drill view.
pub struct DrillLayout {
    pub header: Rect,
    pub main: Rect,
    pub speed: Rect,
    pub progress: Rect,
}

impl DrillLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        let footer = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(vertical[2]);

        Self {
            header: vertical[0],
            main: vertical[1],
            speed: footer[0],
            progress: footer[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_cover_the_screen() {
        let layout = DrillLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.main.height, 20);
        assert_eq!(layout.speed.width + layout.progress.width, 80);
        assert_eq!(layout.progress.y, 21);
    }
}
