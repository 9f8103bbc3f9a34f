//! English/Arabic names, numerals, and number/date formatting.
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Month, Weekday};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

const WESTERN_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Display language of the calendar.  Arabic is laid out right-to-left and
/// renders numbers with Arabic-Indic digits.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn is_rtl(self) -> bool {
        self == Locale::Ar
    }

    pub fn month_name(self, month: Month) -> &'static str {
        match self {
            Locale::En => match month {
                Month::January => "January",
                Month::February => "February",
                Month::March => "March",
                Month::April => "April",
                Month::May => "May",
                Month::June => "June",
                Month::July => "July",
                Month::August => "August",
                Month::September => "September",
                Month::October => "October",
                Month::November => "November",
                Month::December => "December",
            },
            Locale::Ar => match month {
                Month::January => "يناير",
                Month::February => "فبراير",
                Month::March => "مارس",
                Month::April => "أبريل",
                Month::May => "مايو",
                Month::June => "يونيو",
                Month::July => "يوليو",
                Month::August => "أغسطس",
                Month::September => "سبتمبر",
                Month::October => "أكتوبر",
                Month::November => "نوفمبر",
                Month::December => "ديسمبر",
            },
        }
    }

    /// Abbreviated month name.  Arabic has no customary abbreviations, so the
    /// full name is used.
    pub fn month_abbr(self, month: Month) -> &'static str {
        match self {
            Locale::En => &self.month_name(month)[..3],
            Locale::Ar => self.month_name(month),
        }
    }

    pub fn weekday_short(self, wd: Weekday) -> &'static str {
        match self {
            Locale::En => match wd {
                Weekday::Sunday => "Su",
                Weekday::Monday => "Mo",
                Weekday::Tuesday => "Tu",
                Weekday::Wednesday => "We",
                Weekday::Thursday => "Th",
                Weekday::Friday => "Fr",
                Weekday::Saturday => "Sa",
            },
            Locale::Ar => match wd {
                Weekday::Sunday => "أحد",
                Weekday::Monday => "اثنين",
                Weekday::Tuesday => "ثلاثاء",
                Weekday::Wednesday => "أربعاء",
                Weekday::Thursday => "خميس",
                Weekday::Friday => "جمعة",
                Weekday::Saturday => "سبت",
            },
        }
    }

    /// Render the ASCII digits in `s` in this locale's numerals
    pub fn numerals(self, s: &str) -> String {
        match self {
            Locale::En => s.to_owned(),
            Locale::Ar => to_arabic_numerals(s),
        }
    }

    /// "November 6, 2025" / "٦ نوفمبر ٢٠٢٥"
    pub fn format_long(self, date: Date) -> String {
        match self {
            Locale::En => format!(
                "{} {}, {}",
                self.month_name(date.month()),
                date.day(),
                date.year()
            ),
            Locale::Ar => self.numerals(&format!(
                "{} {} {}",
                date.day(),
                self.month_name(date.month()),
                date.year()
            )),
        }
    }

    /// "Nov 6, 2025" / "٦ نوفمبر ٢٠٢٥"
    pub fn format_short(self, date: Date) -> String {
        match self {
            Locale::En => format!(
                "{} {}, {}",
                self.month_abbr(date.month()),
                date.day(),
                date.year()
            ),
            Locale::Ar => self.format_long(date),
        }
    }

    /// Format `value` rounded to `decimals` places with thousands grouping,
    /// e.g. "1,234.56" or "١٬٢٣٤٫٥٦"
    pub fn format_number(self, value: f64, decimals: usize) -> String {
        let (group_sep, decimal_sep) = match self {
            Locale::En => (',', '.'),
            Locale::Ar => ('٬', '٫'),
        };
        let plain = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (plain.as_str(), None),
        };
        let mut out = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
        if value.is_sign_negative() && plain.chars().any(|c| c.is_ascii_digit() && c != '0') {
            out.push('-');
        }
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(group_sep);
            }
            out.push(ch);
        }
        if let Some(frac) = frac_part {
            out.push(decimal_sep);
            out.push_str(frac);
        }
        self.numerals(&out)
    }

    /// Format an amount of Saudi riyals with two decimal places
    pub fn format_sar(self, amount: f64) -> String {
        let mut s = self.format_number(amount, 2);
        s.push_str(match self {
            Locale::En => " SAR",
            Locale::Ar => " ر.س",
        });
        s
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Locale, ParseLocaleError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            _ => Err(ParseLocaleError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown locale {0:?}; expected \"en\" or \"ar\"")]
pub struct ParseLocaleError(String);

/// Convert Western digits (0-9) to Arabic-Indic digits (٠-٩)
pub fn to_arabic_numerals(s: &str) -> String {
    s.chars()
        .map(|ch| {
            WESTERN_DIGITS
                .iter()
                .position(|&d| d == ch)
                .map_or(ch, |i| ARABIC_INDIC_DIGITS[i])
        })
        .collect()
}

/// Convert Arabic-Indic digits (٠-٩) to Western digits (0-9)
pub fn to_western_numerals(s: &str) -> String {
    s.chars()
        .map(|ch| {
            ARABIC_INDIC_DIGITS
                .iter()
                .position(|&d| d == ch)
                .map_or(ch, |i| WESTERN_DIGITS[i])
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` date, accepting Arabic-Indic digits as well
pub fn parse_iso_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(&to_western_numerals(s.trim()), &YMD_FMT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_numeral_conversion() {
        assert_eq!(to_arabic_numerals("2025-11-06"), "٢٠٢٥-١١-٠٦");
        assert_eq!(to_western_numerals("١٢٣ abc"), "123 abc");
        assert_eq!(to_western_numerals(&to_arabic_numerals("1447")), "1447");
    }

    #[test]
    fn test_format_long() {
        let d = date!(2025 - 11 - 06);
        assert_eq!(Locale::En.format_long(d), "November 6, 2025");
        assert_eq!(Locale::Ar.format_long(d), "٦ نوفمبر ٢٠٢٥");
        assert_eq!(Locale::En.format_short(d), "Nov 6, 2025");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(Locale::En.format_number(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(Locale::En.format_number(999.0, 0), "999");
        assert_eq!(Locale::En.format_number(-1000.5, 1), "-1,000.5");
        assert_eq!(Locale::En.format_number(-0.001, 2), "0.00");
        assert_eq!(Locale::Ar.format_number(1234.56, 2), "١٬٢٣٤٫٥٦");
    }

    #[test]
    fn test_format_sar() {
        assert_eq!(Locale::En.format_sar(1234.56), "1,234.56 SAR");
        assert_eq!(Locale::Ar.format_sar(1234.56), "١٬٢٣٤٫٥٦ ر.س");
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2025-02-28").unwrap(), date!(2025 - 02 - 28));
        assert_eq!(parse_iso_date(" ٢٠٢٥-٠٢-٢٨ ").unwrap(), date!(2025 - 02 - 28));
        assert!(parse_iso_date("2025-02-30").is_err());
        assert!(parse_iso_date("tomorrow").is_err());
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("AR".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }
}
