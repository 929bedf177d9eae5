//! Terminal presenter for [`UiUpdate`]s.
//!
//! Static output (schedule tables, suggestions, errors) is printed as lines in
//! the same box-drawing style as the logger. The clock and countdown share one
//! status line that is redrawn in place when the presenter runs live.

use crossterm::{
    queue,
    style::{Color, Print, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

use crate::geo::types::GeoCandidate;
use crate::schedule::types::Prayer;
use crate::session::view::{ScheduleView, UiUpdate};

/// Colour palette for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub active: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::DarkGrey,
            active: Color::Green,
            error: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            accent: Color::DarkBlue,
            text: Color::Black,
            muted: Color::DarkGrey,
            active: Color::DarkGreen,
            error: Color::DarkRed,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }
}

pub struct TerminalPresenter<W: Write> {
    out: W,
    theme: Theme,
    /// Redraw the status line in place.
    live: bool,
    status_visible: bool,
    clock: Option<String>,
    countdown: Option<(Prayer, String)>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, dark_mode: bool, live: bool) -> Self {
        Self {
            out,
            theme: Theme::for_mode(dark_mode),
            live,
            status_visible: false,
            clock: None,
            countdown: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Current status line text, `HH:MM:SS │ Isha in 1h 0m 0s`.
    pub fn status_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(clock) = &self.clock {
            parts.push(clock.clone());
        }
        if let Some((prayer, remaining)) = &self.countdown {
            parts.push(format!("{prayer} in {remaining}"));
        }
        parts.join(" │ ")
    }

    pub fn present(&mut self, update: &UiUpdate) -> io::Result<()> {
        match update {
            UiUpdate::Clock(text) => {
                self.clock = Some(text.clone());
                self.draw_status()
            }
            UiUpdate::Countdown {
                prayer, remaining, ..
            } => {
                self.countdown = Some((*prayer, remaining.clone()));
                self.draw_status()
            }
            UiUpdate::ActivePrayer(prayer) => {
                self.end_status()?;
                let line = format!("Now: {prayer}");
                writeln!(self.out, "┣ {}", line.with(self.theme.active))
            }
            UiUpdate::Schedule(view) => {
                self.end_status()?;
                self.render_schedule(view)
            }
            UiUpdate::Suggestions(candidates) => {
                self.end_status()?;
                self.render_suggestions(candidates)
            }
            UiUpdate::SuggestionsCleared => Ok(()),
            UiUpdate::Loading(true) => {
                self.end_status()?;
                writeln!(
                    self.out,
                    "┣ {}",
                    "Loading prayer times...".with(self.theme.muted)
                )
            }
            UiUpdate::Loading(false) => Ok(()),
            UiUpdate::Error(message) => {
                self.end_status()?;
                writeln!(
                    self.out,
                    "┣[{}] {}",
                    "ERROR".with(self.theme.error),
                    message
                )
            }
            UiUpdate::MethodChanged(method) => {
                self.end_status()?;
                writeln!(self.out, "┣ Calculation method: {method}")
            }
        }
    }

    fn draw_status(&mut self) -> io::Result<()> {
        if !self.live {
            return Ok(());
        }
        let line = self.status_line();
        queue!(
            self.out,
            Print('\r'),
            Clear(ClearType::CurrentLine),
            Print(format!("┃ {}", line.with(self.theme.accent)))
        )?;
        self.out.flush()?;
        self.status_visible = true;
        Ok(())
    }

    /// Print the status line as a plain line, for non-live output.
    pub fn print_status(&mut self) -> io::Result<()> {
        self.end_status()?;
        let line = self.status_line();
        if line.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "┃ {}", line.with(self.theme.accent))?;
        self.out.flush()
    }

    /// Close an in-place status line before exiting.
    pub fn finish(&mut self) -> io::Result<()> {
        self.end_status()?;
        self.out.flush()
    }

    fn end_status(&mut self) -> io::Result<()> {
        if self.status_visible {
            writeln!(self.out)?;
            self.status_visible = false;
        }
        Ok(())
    }

    pub fn render_schedule(&mut self, view: &ScheduleView) -> io::Result<()> {
        let theme = self.theme;
        writeln!(self.out, "┃")?;
        writeln!(
            self.out,
            "┣ {}",
            view.location.as_str().with(theme.accent).bold()
        )?;
        writeln!(
            self.out,
            "┃   {}",
            format!("{} · {}", view.hijri_date, view.method_name).with(theme.muted)
        )?;
        writeln!(self.out, "┃")?;

        for row in &view.rows {
            let line = format!("{:<8} {:>8}", row.prayer.name(), row.display_time);
            if row.active {
                writeln!(self.out, "┃ {} {}", "▸".with(theme.active), line.with(theme.active).bold())?;
            } else {
                writeln!(self.out, "┃   {}", line.with(theme.text))?;
            }
        }

        writeln!(self.out, "┃")?;
        writeln!(
            self.out,
            "┃   Last third of the night begins at {}",
            view.last_third
        )?;
        writeln!(
            self.out,
            "┃   Next: {} in {}",
            view.next_prayer.name().with(theme.accent),
            view.countdown
        )?;
        self.out.flush()
    }

    pub fn render_suggestions(&mut self, candidates: &[GeoCandidate]) -> io::Result<()> {
        if candidates.is_empty() {
            writeln!(
                self.out,
                "┣ {}",
                "No cities found - you can still search manually".with(self.theme.muted)
            )?;
            return self.out.flush();
        }

        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(
                self.out,
                "┃ {:>2}. {} {}",
                index + 1,
                candidate.name.as_str().with(self.theme.text).bold(),
                candidate.subtitle().with(self.theme.muted)
            )?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::strip_ansi_codes;
    use crate::schedule::method::CalculationMethod;
    use crate::session::view::ScheduleRow;

    fn rendered(presenter: TerminalPresenter<Vec<u8>>) -> String {
        strip_ansi_codes(&String::from_utf8(presenter.into_inner()).unwrap())
    }

    fn view() -> ScheduleView {
        let rows = Prayer::ALL
            .iter()
            .zip(["5:00 AM", "12:15 PM", "3:45 PM", "6:30 PM", "8:00 PM"])
            .map(|(prayer, time)| ScheduleRow {
                prayer: *prayer,
                time: String::new(),
                display_time: time.to_string(),
                active: *prayer == Prayer::Maghrib,
            })
            .collect();
        ScheduleView {
            location: "Cairo".to_string(),
            timezone: "Africa/Cairo".to_string(),
            hijri_date: "25 Rajab 1447 AH".to_string(),
            method: CalculationMethod::default(),
            method_name: "Islamic Society of North America".to_string(),
            rows,
            next_prayer: Prayer::Isha,
            countdown: "1h 0m 0s".to_string(),
            seconds_until_next: 3600,
            last_third: "1:30 AM".to_string(),
        }
    }

    #[test]
    fn test_schedule_table() {
        let mut presenter = TerminalPresenter::new(Vec::new(), true, false);
        presenter
            .present(&UiUpdate::Schedule(Box::new(view())))
            .unwrap();
        let text = rendered(presenter);

        assert!(text.contains("┣ Cairo"));
        assert!(text.contains("25 Rajab 1447 AH · Islamic Society of North America"));
        assert!(text.contains("┃ ▸ Maghrib   6:30 PM"));
        assert!(text.contains("┃   Fajr      5:00 AM"));
        assert!(text.contains("Last third of the night begins at 1:30 AM"));
        assert!(text.contains("Next: Isha in 1h 0m 0s"));
    }

    #[test]
    fn test_status_line_only_drawn_live() {
        let mut quiet = TerminalPresenter::new(Vec::new(), false, false);
        quiet.present(&UiUpdate::Clock("19:00:00".into())).unwrap();
        quiet
            .present(&UiUpdate::Countdown {
                prayer: Prayer::Isha,
                remaining: "1h 0m 0s".into(),
                seconds: 3600,
            })
            .unwrap();
        assert_eq!(quiet.status_line(), "19:00:00 │ Isha in 1h 0m 0s");
        assert!(rendered(quiet).is_empty());

        let mut live = TerminalPresenter::new(Vec::new(), false, true);
        live.present(&UiUpdate::Clock("19:00:00".into())).unwrap();
        live.present(&UiUpdate::Error("Search failed".into())).unwrap();
        let text = rendered(live);
        assert!(text.contains("┃ 19:00:00"));
        assert!(text.contains("\n┣[ERROR] Search failed\n"));
    }

    #[test]
    fn test_print_status_writes_a_plain_line() {
        let mut presenter = TerminalPresenter::new(Vec::new(), true, false);
        presenter.print_status().unwrap();
        presenter.present(&UiUpdate::Clock("04:00:00".into())).unwrap();
        presenter.print_status().unwrap();
        presenter.finish().unwrap();
        assert_eq!(rendered(presenter), "┃ 04:00:00\n");
    }

    #[test]
    fn test_suggestions_list() {
        let candidate = GeoCandidate {
            name: "London".into(),
            country: "United Kingdom".into(),
            region: "England".into(),
            latitude: 51.5,
            longitude: -0.12,
            priority: 109.0,
            place_type: "city".into(),
            place_class: "place".into(),
            importance: 0.9,
            display_name: "London, England, United Kingdom".into(),
        };
        let mut presenter = TerminalPresenter::new(Vec::new(), true, false);
        presenter.render_suggestions(&[candidate]).unwrap();
        presenter.render_suggestions(&[]).unwrap();
        let text = rendered(presenter);

        assert!(text.contains(" 1. London England, United Kingdom"));
        assert!(text.contains("No cities found"));
    }
}
