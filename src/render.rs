//! Presentation side of the dashboard.
//!
//! [`RenderSink`] is what the dashboard drives; [`TextSink`] is the plain-text rendition used
//! by the binary.

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::account::AccountStyle;
use crate::clock::Clock;
use crate::format::format_absolute_date;
use crate::format::format_amount;
use crate::format::format_countdown;
use crate::format::format_relative_date;
use crate::ledger::MovementEntry;
use crate::ledger::Summary;

pub trait RenderSink {
    fn show_movements(&mut self, entries: &[MovementEntry], style: &AccountStyle);
    fn show_balance(&mut self, balance: Decimal, style: &AccountStyle);
    fn show_summary(&mut self, summary: &Summary, style: &AccountStyle);
    fn show_countdown(&mut self, remaining_secs: u32);
    fn show_date(&mut self, now: DateTime<Utc>, style: &AccountStyle);
    fn show_login_form(&mut self);
    fn hide_login_form(&mut self);
    fn show_logout_control(&mut self);
    fn hide_logout_control(&mut self);
    fn set_welcome_message(&mut self, text: &str);
    fn set_app_visible(&mut self, visible: bool);
}

/// Renders the dashboard as lines of text, buffered until [`TextSink::drain`].
///
/// Consecutive countdown updates are coalesced: only the latest one is emitted, in its place
/// among the other lines.
#[derive(Debug)]
pub struct TextSink<C> {
    clock: C,
    lines: Vec<String>,
    countdown: Option<u32>,
}

impl<C: Clock> TextSink<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            lines: Vec::new(),
            countdown: None,
        }
    }

    pub fn drain(&mut self) -> Vec<String> {
        self.flush_countdown();
        std::mem::take(&mut self.lines)
    }

    fn push(&mut self, line: String) {
        self.flush_countdown();
        self.lines.push(line);
    }

    fn flush_countdown(&mut self) {
        if let Some(remaining_secs) = self.countdown.take() {
            self.lines.push(format!("timer {}", format_countdown(remaining_secs)));
        }
    }
}

impl<C: Clock> RenderSink for TextSink<C> {
    fn show_movements(&mut self, entries: &[MovementEntry], style: &AccountStyle) {
        let now = self.clock.now();
        self.push("movements:".to_owned());
        // Most recent row on top.
        for entry in entries.iter().rev() {
            self.push(format!(
                "  {} {} | {} | {}",
                entry.position + 1,
                entry.kind(),
                format_relative_date(entry.date, now, &style.locale),
                format_amount(entry.amount, &style.currency),
            ));
        }
    }

    fn show_balance(&mut self, balance: Decimal, style: &AccountStyle) {
        self.push(format!("balance {}", format_amount(balance, &style.currency)));
    }

    fn show_summary(&mut self, summary: &Summary, style: &AccountStyle) {
        self.push(format!(
            "in {} | out {} | interest {}",
            format_amount(summary.income, &style.currency),
            format_amount(summary.expense, &style.currency),
            format_amount(summary.interest, &style.currency),
        ));
    }

    fn show_countdown(&mut self, remaining_secs: u32) {
        self.countdown = Some(remaining_secs);
    }

    fn show_date(&mut self, now: DateTime<Utc>, style: &AccountStyle) {
        self.push(format!(
            "as of {} {}",
            format_absolute_date(now, &style.locale),
            now.format("%H:%M")
        ));
    }

    fn show_login_form(&mut self) {
        self.push("[login form shown]".to_owned());
    }

    fn hide_login_form(&mut self) {
        self.push("[login form hidden]".to_owned());
    }

    fn show_logout_control(&mut self) {
        self.push("[logout shown]".to_owned());
    }

    fn hide_logout_control(&mut self) {
        self.push("[logout hidden]".to_owned());
    }

    fn set_welcome_message(&mut self, text: &str) {
        self.push(text.to_owned());
    }

    fn set_app_visible(&mut self, visible: bool) {
        self.push(format!("[app {}]", if visible { "visible" } else { "hidden" }));
    }
}
