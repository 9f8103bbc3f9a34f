//! Hijri (Islamic) calendar overlay.
//!
//! The built-in [`ApproximateHijri`] converter is an arithmetic (tabular)
//! approximation.  It routinely disagrees with the observed or Umm al-Qura
//! calendars by a day or two, and near the end of a year it can even report
//! a 30th or 31st day.  It must not be used for religious or legal
//! determinations; supply an accurate [`HijriConverter`] instead.
use crate::locale::Locale;
use std::fmt;
use time::Date;

/// Julian Day Number of 1 Muharram 1 AH as used by the approximation
const ISLAMIC_EPOCH_JDN: i64 = 1_948_440;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HijriMonth {
    Muharram = 1,
    Safar,
    RabiAlAwwal,
    RabiAlThani,
    JumadaAlAwwal,
    JumadaAlThani,
    Rajab,
    Shaban,
    Ramadan,
    Shawwal,
    DhuAlQidah,
    DhuAlHijjah,
}

impl HijriMonth {
    const ALL: [HijriMonth; 12] = [
        HijriMonth::Muharram,
        HijriMonth::Safar,
        HijriMonth::RabiAlAwwal,
        HijriMonth::RabiAlThani,
        HijriMonth::JumadaAlAwwal,
        HijriMonth::JumadaAlThani,
        HijriMonth::Rajab,
        HijriMonth::Shaban,
        HijriMonth::Ramadan,
        HijriMonth::Shawwal,
        HijriMonth::DhuAlQidah,
        HijriMonth::DhuAlHijjah,
    ];

    /// Returns the month's number, from 1 (Muharram) to 12 (Dhu al-Hijjah)
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<HijriMonth> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn name(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                HijriMonth::Muharram => "Muharram",
                HijriMonth::Safar => "Safar",
                HijriMonth::RabiAlAwwal => "Rabi' al-Awwal",
                HijriMonth::RabiAlThani => "Rabi' al-Thani",
                HijriMonth::JumadaAlAwwal => "Jumada al-Awwal",
                HijriMonth::JumadaAlThani => "Jumada al-Thani",
                HijriMonth::Rajab => "Rajab",
                HijriMonth::Shaban => "Sha'ban",
                HijriMonth::Ramadan => "Ramadan",
                HijriMonth::Shawwal => "Shawwal",
                HijriMonth::DhuAlQidah => "Dhu al-Qi'dah",
                HijriMonth::DhuAlHijjah => "Dhu al-Hijjah",
            },
            Locale::Ar => match self {
                HijriMonth::Muharram => "محرم",
                HijriMonth::Safar => "صفر",
                HijriMonth::RabiAlAwwal => "ربيع الأول",
                HijriMonth::RabiAlThani => "ربيع الآخر",
                HijriMonth::JumadaAlAwwal => "جمادى الأولى",
                HijriMonth::JumadaAlThani => "جمادى الآخرة",
                HijriMonth::Rajab => "رجب",
                HijriMonth::Shaban => "شعبان",
                HijriMonth::Ramadan => "رمضان",
                HijriMonth::Shawwal => "شوال",
                HijriMonth::DhuAlQidah => "ذو القعدة",
                HijriMonth::DhuAlHijjah => "ذو الحجة",
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HijriDate {
    pub year: i32,
    pub month: HijriMonth,
    pub day: u8,
}

impl HijriDate {
    /// "15 Jumada al-Awwal 1447" / "١٥ جمادى الأولى ١٤٤٧"
    pub fn format(&self, locale: Locale) -> String {
        locale.numerals(&format!(
            "{} {} {}",
            self.day,
            self.month.name(locale),
            self.year
        ))
    }

    /// "Jumada al-Awwal 1447", as shown under a month's title
    pub fn format_month_year(&self, locale: Locale) -> String {
        locale.numerals(&format!("{} {}", self.month.name(locale), self.year))
    }

    pub fn holiday(&self) -> Option<&'static IslamicHoliday> {
        ISLAMIC_HOLIDAYS
            .iter()
            .find(|h| h.month == self.month && h.day == self.day)
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(Locale::En))
    }
}

/// Capability for converting Gregorian dates to Hijri dates.  Deployments
/// with stricter accuracy needs can plug in their own implementation;
/// closures of type `Fn(Date) -> HijriDate` qualify.
pub trait HijriConverter {
    fn to_hijri(&self, date: Date) -> HijriDate;
}

impl<F: Fn(Date) -> HijriDate> HijriConverter for F {
    fn to_hijri(&self, date: Date) -> HijriDate {
        self(date)
    }
}

/// Arithmetic Gregorian-to-Hijri approximation via the Julian Day Number,
/// assuming 30-year cycles of 10631 days and 29.5-day months.  See the
/// module documentation for its limitations.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ApproximateHijri;

impl HijriConverter for ApproximateHijri {
    fn to_hijri(&self, date: Date) -> HijriDate {
        let days = i64::from(date.to_julian_day()) - ISLAMIC_EPOCH_JDN;
        let year = (30 * days + 10646).div_euclid(10631);
        let day_of_year = days - ((year - 1) * 10631).div_euclid(30);
        // x / 29.5 == 2x / 59
        let month = (div_ceil(2 * (day_of_year - 29), 59) + 1).clamp(1, 12);
        let day = day_of_year - ((month - 1) * 59).div_euclid(2) + 1;
        HijriDate {
            year: i32::try_from(year).unwrap_or_default(),
            month: u8::try_from(month)
                .ok()
                .and_then(HijriMonth::from_number)
                .unwrap_or(HijriMonth::Muharram),
            day: u8::try_from(day).unwrap_or(1),
        }
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IslamicHoliday {
    pub month: HijriMonth,
    pub day: u8,
    pub name_en: &'static str,
    pub name_ar: &'static str,
}

impl IslamicHoliday {
    pub fn name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.name_en,
            Locale::Ar => self.name_ar,
        }
    }
}

pub static ISLAMIC_HOLIDAYS: &[IslamicHoliday] = &[
    IslamicHoliday {
        month: HijriMonth::Muharram,
        day: 1,
        name_en: "Islamic New Year",
        name_ar: "رأس السنة الهجرية",
    },
    IslamicHoliday {
        month: HijriMonth::Muharram,
        day: 10,
        name_en: "Day of Ashura",
        name_ar: "يوم عاشوراء",
    },
    IslamicHoliday {
        month: HijriMonth::RabiAlAwwal,
        day: 12,
        name_en: "Prophet's Birthday",
        name_ar: "المولد النبوي",
    },
    IslamicHoliday {
        month: HijriMonth::Rajab,
        day: 27,
        name_en: "Isra and Mi'raj",
        name_ar: "الإسراء والمعراج",
    },
    IslamicHoliday {
        month: HijriMonth::Shaban,
        day: 15,
        name_en: "Laylat al-Bara'ah",
        name_ar: "ليلة البراءة",
    },
    IslamicHoliday {
        month: HijriMonth::Ramadan,
        day: 1,
        name_en: "Start of Ramadan",
        name_ar: "بداية رمضان",
    },
    IslamicHoliday {
        month: HijriMonth::Ramadan,
        day: 27,
        name_en: "Laylat al-Qadr",
        name_ar: "ليلة القدر",
    },
    IslamicHoliday {
        month: HijriMonth::Shawwal,
        day: 1,
        name_en: "Eid al-Fitr",
        name_ar: "عيد الفطر",
    },
    IslamicHoliday {
        month: HijriMonth::DhuAlHijjah,
        day: 9,
        name_en: "Day of Arafah",
        name_ar: "يوم عرفة",
    },
    IslamicHoliday {
        month: HijriMonth::DhuAlHijjah,
        day: 10,
        name_en: "Eid al-Adha",
        name_ar: "عيد الأضحى",
    },
];
