//! Sexagenary calendar engine: stem-branch pillars for year, month, day, and
//! hour of a solar date-time, plus the stem/branch attribute lookups.
//!
//! Conventions used by this engine:
//! - The 60-cycle is anchored at year 2000 = 甲子 (cycle position 0), so the
//!   12-year animal cycle puts 鼠 on year 2000.
//! - Year and month pillars follow the calendar year and month directly, with
//!   no solar-term boundary handling.
//! - The day pillar is derived from the Julian day number of the Gregorian
//!   date; the hour pillar does not roll the day over at 23:00.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{Element, FourPillars, StemBranchPair, Zodiac};

/// Days between CE day 1 (0001-01-01) and the Julian day epoch.
const JDN_OFFSET: i64 = 1_721_425;

/// Year sitting at cycle position 0 (甲子).
const CYCLE_ANCHOR_YEAR: i32 = 2000;

/// Two-hour slot labels, indexed by hour branch.
const HOUR_RANGE_LABELS: [&str; 12] = [
    "子时 23:00-01:00",
    "丑时 01:00-03:00",
    "寅时 03:00-05:00",
    "卯时 05:00-07:00",
    "辰时 07:00-09:00",
    "巳时 09:00-11:00",
    "午时 11:00-13:00",
    "未时 13:00-15:00",
    "申时 15:00-17:00",
    "酉时 17:00-19:00",
    "戌时 19:00-21:00",
    "亥时 21:00-23:00",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct SexagenaryCalendar;

impl SexagenaryCalendar {
    pub fn new() -> Self {
        SexagenaryCalendar
    }

    /// All four pillars for a normalized solar date-time.
    pub fn compute_four_pillars(&self, datetime: NaiveDateTime) -> FourPillars {
        FourPillars {
            year: self.year_pillar(datetime.year()),
            month: self.month_pillar(datetime.year(), datetime.month()),
            day: self.day_pillar(datetime.date()),
            hour: self.hour_pillar(datetime.date(), datetime.hour()),
        }
    }

    pub fn year_pillar(&self, year: i32) -> StemBranchPair {
        let position = (year - CYCLE_ANCHOR_YEAR).rem_euclid(60) as usize;
        StemBranchPair::from_cycle_position(position)
    }

    /// Month branch is fixed per month (month 1 is 寅); the stem is derived
    /// from the year stem by the traditional rule (甲/己 years open on 丙).
    pub fn month_pillar(&self, year: i32, month: u32) -> StemBranchPair {
        let year_stem = self.year_pillar(year).stem as usize;
        let first_month_stem = (year_stem % 5) * 2 + 2;
        let month = month as usize;
        let stem_index = (first_month_stem + month - 1) % 10;
        let branch_index = (month + 1) % 12;
        StemBranchPair::from_indices(stem_index, branch_index)
    }

    pub fn day_pillar(&self, date: NaiveDate) -> StemBranchPair {
        let jdn = i64::from(date.num_days_from_ce()) + JDN_OFFSET;
        let stem_index = (jdn + 9).rem_euclid(10) as usize;
        let branch_index = (jdn + 1).rem_euclid(12) as usize;
        StemBranchPair::from_indices(stem_index, branch_index)
    }

    /// Hour branch covers two clock hours (23:00-00:59 is 子); the stem is
    /// derived from the day stem by the traditional rule (甲/己 days open on 甲子).
    pub fn hour_pillar(&self, date: NaiveDate, hour: u32) -> StemBranchPair {
        let branch_index = ((hour as usize + 1) / 2) % 12;
        let day_stem = self.day_pillar(date).stem as usize;
        let stem_index = ((day_stem % 5) * 2 + branch_index) % 10;
        StemBranchPair::from_indices(stem_index, branch_index)
    }

    /// Animal of the 12-year cycle for a calendar year.
    pub fn zodiac_animal_of(&self, year: i32) -> Zodiac {
        let index = (year - CYCLE_ANCHOR_YEAR).rem_euclid(12) as usize;
        Zodiac::from_index(index).unwrap_or(Zodiac::Rat)
    }

    pub fn element_of(&self, symbol: char) -> Option<Element> {
        element_of(symbol)
    }

    /// Display label for the two-hour slot containing a 0-23 clock hour.
    pub fn hour_range_label(&self, hour: u32) -> &'static str {
        HOUR_RANGE_LABELS[((hour as usize + 1) / 2) % 12]
    }
}

/// Element of a stem or branch character, `None` for anything outside the
/// 22 valid symbols.
pub fn element_of(symbol: char) -> Option<Element> {
    match symbol {
        '甲' | '乙' | '寅' | '卯' => Some(Element::Wood),
        '丙' | '丁' | '巳' | '午' => Some(Element::Fire),
        '戊' | '己' | '辰' | '戌' | '丑' | '未' => Some(Element::Earth),
        '庚' | '辛' | '申' | '酉' => Some(Element::Gold),
        '壬' | '癸' | '亥' | '子' => Some(Element::Water),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Branch, Stem};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_year_pillar_anchor() {
        let calendar = SexagenaryCalendar::new();
        assert_eq!(calendar.year_pillar(2000).cycle_name(), "甲子");
        assert_eq!(calendar.year_pillar(2001).cycle_name(), "乙丑");
        assert_eq!(calendar.year_pillar(1999).cycle_name(), "癸亥");
        assert_eq!(calendar.year_pillar(2060).cycle_name(), "甲子");
    }

    #[test]
    fn test_zodiac_cycle() {
        let calendar = SexagenaryCalendar::new();
        assert_eq!(calendar.zodiac_animal_of(2000), Zodiac::Rat);
        assert_eq!(calendar.zodiac_animal_of(2001), Zodiac::Ox);
        assert_eq!(calendar.zodiac_animal_of(2012), Zodiac::Rat);
        assert_eq!(calendar.zodiac_animal_of(1999), Zodiac::Pig);
        assert_eq!(calendar.zodiac_animal_of(2000).name(), "鼠");
    }

    #[test]
    fn test_zodiac_matches_year_branch() {
        let calendar = SexagenaryCalendar::new();
        for year in 1900..2100 {
            assert_eq!(
                calendar.zodiac_animal_of(year),
                calendar.year_pillar(year).branch.zodiac()
            );
        }
    }

    #[test]
    fn test_day_pillar_anchor() {
        let calendar = SexagenaryCalendar::new();
        // JDN 2451545 maps to 戊午
        assert_eq!(calendar.day_pillar(date(2000, 1, 1)).cycle_name(), "戊午");
        assert_eq!(calendar.day_pillar(date(2000, 1, 2)).cycle_name(), "己未");
        // 60 days later the pillar repeats
        assert_eq!(calendar.day_pillar(date(2000, 3, 1)).cycle_name(), "戊午");
    }

    #[test]
    fn test_hour_branch_slots() {
        let calendar = SexagenaryCalendar::new();
        let day = date(2000, 1, 1);
        assert_eq!(calendar.hour_pillar(day, 23).branch, Branch::Zi);
        assert_eq!(calendar.hour_pillar(day, 0).branch, Branch::Zi);
        assert_eq!(calendar.hour_pillar(day, 1).branch, Branch::Chou);
        assert_eq!(calendar.hour_pillar(day, 2).branch, Branch::Chou);
        assert_eq!(calendar.hour_pillar(day, 12).branch, Branch::Wu);
        assert_eq!(calendar.hour_pillar(day, 22).branch, Branch::Hai);
    }

    #[test]
    fn test_hour_stem_follows_day_stem() {
        let calendar = SexagenaryCalendar::new();
        // 2000-01-01 is a 戊 day, so its 子 hour opens on 壬
        let day = date(2000, 1, 1);
        assert_eq!(calendar.hour_pillar(day, 0).cycle_name(), "壬子");
        assert_eq!(calendar.hour_pillar(day, 10).cycle_name(), "丁巳");
    }

    #[test]
    fn test_month_pillar_rule() {
        let calendar = SexagenaryCalendar::new();
        // 甲 year opens on 丙寅
        assert_eq!(calendar.month_pillar(2000, 1).cycle_name(), "丙寅");
        assert_eq!(calendar.month_pillar(2000, 6).cycle_name(), "辛未");
        assert_eq!(calendar.month_pillar(2000, 12).cycle_name(), "丁丑");
        // 乙 year opens on 戊寅
        assert_eq!(calendar.month_pillar(2001, 1).cycle_name(), "戊寅");
        assert_eq!(calendar.month_pillar(2000, 11).branch, Branch::Zi);
    }

    #[test]
    fn test_compute_four_pillars() {
        let calendar = SexagenaryCalendar::new();
        let datetime = date(2000, 6, 15).and_hms_opt(10, 0, 0).unwrap();
        let pillars = calendar.compute_four_pillars(datetime);
        assert_eq!(pillars.year.cycle_name(), "甲子");
        assert_eq!(pillars.month.cycle_name(), "辛未");
        assert_eq!(pillars.day.cycle_name(), "甲辰");
        assert_eq!(pillars.hour.cycle_name(), "己巳");
    }

    #[test]
    fn test_element_of_covers_all_symbols() {
        for stem in Stem::all() {
            let symbol = stem.name().chars().next().unwrap();
            assert_eq!(element_of(symbol), Some(stem.element()));
        }
        for branch in Branch::all() {
            let symbol = branch.name().chars().next().unwrap();
            assert_eq!(element_of(symbol), Some(branch.element()));
        }
        assert_eq!(element_of('星'), None);
        assert_eq!(element_of('x'), None);
    }

    #[test]
    fn test_hour_range_label() {
        let calendar = SexagenaryCalendar::new();
        assert_eq!(calendar.hour_range_label(0), "子时 23:00-01:00");
        assert_eq!(calendar.hour_range_label(23), "子时 23:00-01:00");
        assert_eq!(calendar.hour_range_label(9), "巳时 09:00-11:00");
        assert_eq!(calendar.hour_range_label(10), "巳时 09:00-11:00");
        assert_eq!(calendar.hour_range_label(14), "未时 13:00-15:00");
    }
}
