//! Turns the wall clock and the current preferences into display strings.

use std::fmt::Display;

use chrono::{DateTime, Locale, TimeZone};

use crate::preferences::Preferences;

/// Date shown when no locale could be resolved.
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// The three strings drawn on the panel, derived from one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub time: String,
    pub meridiem: Option<String>,
    pub date: String,
}

/// strftime pattern for `HH:mm:ss`, `HH:mm`, `h:mm:ss` or `h:mm`.
pub fn time_format(use_24_hour: bool, show_seconds: bool) -> &'static str {
    match (use_24_hour, show_seconds) {
        (true, true) => "%H:%M:%S",
        (true, false) => "%H:%M",
        (false, true) => "%-I:%M:%S",
        (false, false) => "%-I:%M",
    }
}

/// Full-style date pattern: weekday, month, day and year in the order the
/// language writes them. Other languages get the weekday followed by the
/// locale's own numeric date.
fn full_date_format(tag: &str) -> &'static str {
    let language = tag.split('_').next().unwrap_or_default();
    match language {
        "ja" | "zh" => "%Y年%-m月%-d日%A",
        "ko" => "%Y년 %-m월 %-d일 %A",
        "de" => "%A, %-d. %B %Y",
        "es" | "pt" => "%A, %-d de %B de %Y",
        "fr" | "it" => "%A %-d %B %Y",
        "en" if tag != "en_US" => "%A, %-d %B %Y",
        "en" | "POSIX" => "%A, %B %-d, %Y",
        _ => "%A, %x",
    }
}

/// Maps a POSIX locale value such as `ja_JP.UTF-8` or `de_DE@euro` to a
/// known locale. `C` is treated as `POSIX`.
pub fn resolve_locale(value: &str) -> Option<Locale> {
    let tag = value.split(['.', '@']).next().unwrap_or_default().trim();
    match tag {
        "" => None,
        "C" => Some(Locale::POSIX),
        tag => Locale::try_from(tag).ok(),
    }
}

/// The user's locale for time formatting, from `LC_ALL`, `LC_TIME` or `LANG`.
fn locale_from_env() -> Option<(Locale, String)> {
    ["LC_ALL", "LC_TIME", "LANG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| {
            let locale = resolve_locale(&value)?;
            Some((locale, format!("{locale:?}")))
        })
}

#[derive(Debug)]
pub struct ClockRenderer {
    locale: Option<Locale>,
    date_format: &'static str,
    last: Option<DisplaySnapshot>,
}

impl ClockRenderer {
    /// A renderer for `locale`, or the fixed fallback formats when `None`.
    pub fn new(locale: Option<Locale>) -> Self {
        let date_format = match locale {
            Some(locale) => full_date_format(&format!("{locale:?}")),
            None => FALLBACK_DATE_FORMAT,
        };
        Self {
            locale,
            date_format,
            last: None,
        }
    }

    pub fn from_env() -> Self {
        match locale_from_env() {
            Some((locale, tag)) => {
                log::info!("formatting dates for locale {tag}");
                Self::new(Some(locale))
            }
            None => {
                log::info!("no usable locale, using ISO dates");
                Self::new(None)
            }
        }
    }

    pub fn snapshot<Tz>(&self, at: &DateTime<Tz>, prefs: &Preferences) -> DisplaySnapshot
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let time = at
            .format(time_format(prefs.use_24_hour, prefs.show_seconds))
            .to_string();
        let (meridiem, date) = match self.locale {
            Some(locale) => {
                // Many locales define no AM/PM strings.
                let meridiem = at.format_localized("%p", locale).to_string();
                let meridiem = if meridiem.is_empty() {
                    at.format("%p").to_string()
                } else {
                    meridiem
                };
                (
                    meridiem,
                    at.format_localized(self.date_format, locale).to_string(),
                )
            }
            None => (
                at.format("%p").to_string(),
                at.format(self.date_format).to_string(),
            ),
        };
        DisplaySnapshot {
            time,
            meridiem: (!prefs.use_24_hour).then_some(meridiem),
            date,
        }
    }

    /// Recomputes the snapshot for `at`. Returns `true` when it differs from
    /// the one drawn last.
    pub fn refresh<Tz>(&mut self, at: &DateTime<Tz>, prefs: &Preferences) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let next = self.snapshot(at, prefs);
        if self.last.as_ref() == Some(&next) {
            return false;
        }
        self.last = Some(next);
        true
    }

    pub fn current(&self) -> Option<&DisplaySnapshot> {
        self.last.as_ref()
    }
}
