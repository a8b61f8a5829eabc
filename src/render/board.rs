//! Streaming terminal sink for evaluation runs.
//!
//! Prints one panel per persona as results arrive, then the two-column
//! feedback board and the summary.

use std::io::{self, Write};
use std::time::Duration;

use console::{measure_text_width, pad_str, style, Alignment, Term};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::evaluator::{EvaluationEvent, EvaluationReport, EventSink, PersonaOutcome};
use crate::persona::PersonaKind;

use super::style::{icon, Column, DisplayStyle};

const MAX_WIDTH: usize = 120;
const GUTTER: usize = 3;

/// Event sink that renders to a terminal (or any writer).
pub struct TerminalSink<W: Write> {
    out: W,
    width: usize,
    spinner: Option<ProgressBar>,
    show_progress: bool,
}

impl TerminalSink<io::Stdout> {
    /// Sink on stdout, sized to the terminal; `progress` enables the spinner
    pub fn stdout(progress: bool) -> Self {
        let (_, cols) = Term::stdout().size();
        let mut sink = Self::new(io::stdout(), cols as usize);
        sink.show_progress = progress;
        sink
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width: width.clamp(40, MAX_WIDTH),
            spinner: None,
            show_progress: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn start_spinner(&mut self, kind: PersonaKind) {
        if !self.show_progress {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(format!("{} {}: Thinking...", icon(kind), kind.role()));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn write_panel(&mut self, outcome: &PersonaOutcome) -> io::Result<()> {
        let tone = DisplayStyle::for_kind(outcome.kind).style();
        writeln!(
            self.out,
            "{} {}  {}",
            icon(outcome.kind),
            style(outcome.role).bold(),
            style(format!("({:.1}s)", outcome.elapsed_ms as f64 / 1000.0)).dim()
        )?;
        for line in wrap(&outcome.text, self.width.saturating_sub(2)) {
            let line = if outcome.is_failed() {
                style(line).red().to_string()
            } else {
                tone.apply_to(line).to_string()
            };
            writeln!(self.out, "  {}", line)?;
        }
        writeln!(self.out)
    }

    fn write_board(&mut self, report: &EvaluationReport) -> io::Result<()> {
        let col_width = (self.width - GUTTER) / 2;

        writeln!(self.out, "{}", style("Team Feedback").bold().cyan())?;
        writeln!(self.out, "{}", style("═".repeat(self.width)).dim())?;

        let left = column_lines(report, Column::Left, col_width);
        let right = column_lines(report, Column::Right, col_width);

        for i in 0..left.len().max(right.len()) {
            let l = left.get(i).map(String::as_str).unwrap_or("");
            let r = right.get(i).map(String::as_str).unwrap_or("");
            let row = format!(
                "{}{}{}",
                pad_str(l, col_width, Alignment::Left, None),
                " ".repeat(GUTTER),
                r
            );
            writeln!(self.out, "{}", row.trim_end())?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "{}", style("📋 Summary").bold())?;
        writeln!(self.out, "{}", style("─".repeat(self.width)).dim())?;
        writeln!(self.out, "{}", report.summary())?;
        self.out.flush()
    }

    fn handle(&mut self, event: EvaluationEvent) -> io::Result<()> {
        match event {
            EvaluationEvent::Started { kind } => {
                self.start_spinner(kind);
                Ok(())
            }
            EvaluationEvent::Finished(outcome) => {
                self.stop_spinner();
                self.write_panel(&outcome)
            }
            EvaluationEvent::Completed(report) => {
                self.stop_spinner();
                self.write_board(&report)
            }
        }
    }
}

impl<W: Write> EventSink for TerminalSink<W> {
    fn emit(&mut self, event: EvaluationEvent) {
        if let Err(e) = self.handle(event) {
            debug!(error = %e, "Failed to write evaluation output");
        }
    }
}

/// Header plus wrapped, styled text for every persona in one column.
fn column_lines(report: &EvaluationReport, column: Column, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in PersonaKind::all()
        .iter()
        .filter(|k| Column::for_kind(**k) == column)
        .filter_map(|k| report.get(*k))
    {
        let tone = DisplayStyle::for_kind(outcome.kind).style();
        lines.push(format!("{} {}", icon(outcome.kind), style(outcome.role).bold()));
        for line in wrap(&outcome.text, width) {
            lines.push(tone.apply_to(line).to_string());
        }
        lines.push(String::new());
    }
    lines
}

/// Greedy word wrap. Existing line breaks are kept; overlong words are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.trim_end().lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            let mut word_width = measure_text_width(&word);

            while word_width > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                let split_at = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                let rest = word.split_off(split_at);
                lines.push(word);
                word = rest;
                word_width = measure_text_width(&word);
            }

            if word.is_empty() {
                continue;
            }

            let needed = if current.is_empty() { word_width } else { current_width + 1 + word_width };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&word);
            current_width += word_width;
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{ContextSharing, OutcomeStatus};

    fn outcome(kind: PersonaKind, text: &str) -> PersonaOutcome {
        PersonaOutcome {
            kind,
            role: kind.role(),
            text: text.to_string(),
            status: OutcomeStatus::Completed,
            elapsed_ms: 1200,
        }
    }

    fn report() -> EvaluationReport {
        EvaluationReport {
            day: 1,
            scenario: "Day 1".into(),
            decision: "Buy pens".into(),
            context_sharing: ContextSharing::None,
            outcomes: PersonaKind::all()
                .iter()
                .map(|k| outcome(*k, &format!("{} says ok", k.slug())))
                .collect(),
        }
    }

    fn render(events: Vec<EvaluationEvent>) -> String {
        let mut sink = TerminalSink::new(Vec::new(), 80);
        for event in events {
            sink.emit(event);
        }
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
    }

    #[test]
    fn test_panel_streamed_per_persona() {
        let out = render(vec![
            EvaluationEvent::Started { kind: PersonaKind::Finance },
            EvaluationEvent::Finished(outcome(PersonaKind::Finance, "Within budget.")),
        ]);
        assert!(out.contains("Finance Officer"));
        assert!(out.contains("(1.2s)"));
        assert!(out.contains("Within budget."));
        assert!(!out.contains("Summary"));
    }

    #[test]
    fn test_quiet_stdout_sink_has_no_spinner() {
        let mut sink = TerminalSink::stdout(false);
        sink.start_spinner(PersonaKind::Finance);
        assert!(sink.spinner.is_none());

        let mut sink = TerminalSink::new(Vec::new(), 80);
        sink.emit(EvaluationEvent::Started { kind: PersonaKind::Finance });
        assert!(sink.spinner.is_none());
    }

    #[test]
    fn test_board_and_summary() {
        let out = render(vec![EvaluationEvent::Completed(report())]);

        assert!(out.contains("Team Feedback"));
        assert!(out.contains("Summary"));
        assert!(out.contains(&report().summary()));

        // Finance (left) and supplier (right) headers share a row
        let row = out
            .lines()
            .find(|l| l.contains("Finance Officer"))
            .unwrap();
        assert!(row.contains("Supplier Representative"));
    }
}
