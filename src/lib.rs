use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod narrative;
pub mod sexagenary;

pub use narrative::{key_points, personality_sentences};
pub use sexagenary::{element_of, SexagenaryCalendar};

// ---------------------------
// ## Enumerations
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn name(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    pub fn name(self) -> &'static str {
        match self {
            Polarity::Yang => "阳",
            Polarity::Yin => "阴",
        }
    }
}

/// The five elements, in the fixed tally order 金木水火土.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Gold = 0,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    pub fn all() -> impl Iterator<Item = Element> {
        [
            Element::Gold,
            Element::Wood,
            Element::Water,
            Element::Fire,
            Element::Earth,
        ]
        .iter()
        .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Gold => "金",
            Element::Wood => "木",
            Element::Water => "水",
            Element::Fire => "火",
            Element::Earth => "土",
        }
    }

    /// Display color for chart rendering.
    pub fn color(self) -> &'static str {
        match self {
            Element::Gold => "#FFD700",
            Element::Wood => "#228B22",
            Element::Water => "#1E90FF",
            Element::Fire => "#FF4500",
            Element::Earth => "#8B4513",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stem {
    Jia = 0,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub fn from_index(index: usize) -> Option<Stem> {
        match index {
            0 => Some(Stem::Jia),
            1 => Some(Stem::Yi),
            2 => Some(Stem::Bing),
            3 => Some(Stem::Ding),
            4 => Some(Stem::Wu),
            5 => Some(Stem::Ji),
            6 => Some(Stem::Geng),
            7 => Some(Stem::Xin),
            8 => Some(Stem::Ren),
            9 => Some(Stem::Gui),
            _ => None,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Stem> {
        Stem::all().find(|stem| stem.name().starts_with(symbol))
    }

    pub fn all() -> impl Iterator<Item = Stem> {
        (0..10).map(Stem::from_index).flatten()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stem::Jia => "甲",
            Stem::Yi => "乙",
            Stem::Bing => "丙",
            Stem::Ding => "丁",
            Stem::Wu => "戊",
            Stem::Ji => "己",
            Stem::Geng => "庚",
            Stem::Xin => "辛",
            Stem::Ren => "壬",
            Stem::Gui => "癸",
        }
    }

    pub fn element(self) -> Element {
        match self {
            Stem::Jia | Stem::Yi => Element::Wood,
            Stem::Bing | Stem::Ding => Element::Fire,
            Stem::Wu | Stem::Ji => Element::Earth,
            Stem::Geng | Stem::Xin => Element::Gold,
            Stem::Ren | Stem::Gui => Element::Water,
        }
    }

    pub fn polarity(self) -> Polarity {
        if (self as usize) % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Zi = 0,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub fn from_index(index: usize) -> Option<Branch> {
        match index {
            0 => Some(Branch::Zi),
            1 => Some(Branch::Chou),
            2 => Some(Branch::Yin),
            3 => Some(Branch::Mao),
            4 => Some(Branch::Chen),
            5 => Some(Branch::Si),
            6 => Some(Branch::Wu),
            7 => Some(Branch::Wei),
            8 => Some(Branch::Shen),
            9 => Some(Branch::You),
            10 => Some(Branch::Xu),
            11 => Some(Branch::Hai),
            _ => None,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Branch> {
        Branch::all().find(|branch| branch.name().starts_with(symbol))
    }

    pub fn all() -> impl Iterator<Item = Branch> {
        (0..12).map(Branch::from_index).flatten()
    }

    pub fn name(self) -> &'static str {
        match self {
            Branch::Zi => "子",
            Branch::Chou => "丑",
            Branch::Yin => "寅",
            Branch::Mao => "卯",
            Branch::Chen => "辰",
            Branch::Si => "巳",
            Branch::Wu => "午",
            Branch::Wei => "未",
            Branch::Shen => "申",
            Branch::You => "酉",
            Branch::Xu => "戌",
            Branch::Hai => "亥",
        }
    }

    pub fn element(self) -> Element {
        match self {
            Branch::Yin | Branch::Mao => Element::Wood,
            Branch::Si | Branch::Wu => Element::Fire,
            Branch::Shen | Branch::You => Element::Gold,
            Branch::Hai | Branch::Zi => Element::Water,
            Branch::Chen | Branch::Xu | Branch::Chou | Branch::Wei => Element::Earth,
        }
    }

    /// Zodiac animal carried by this branch (子 is 鼠, and so on around the cycle).
    pub fn zodiac(self) -> Zodiac {
        match self {
            Branch::Zi => Zodiac::Rat,
            Branch::Chou => Zodiac::Ox,
            Branch::Yin => Zodiac::Tiger,
            Branch::Mao => Zodiac::Rabbit,
            Branch::Chen => Zodiac::Dragon,
            Branch::Si => Zodiac::Snake,
            Branch::Wu => Zodiac::Horse,
            Branch::Wei => Zodiac::Goat,
            Branch::Shen => Zodiac::Monkey,
            Branch::You => Zodiac::Rooster,
            Branch::Xu => Zodiac::Dog,
            Branch::Hai => Zodiac::Pig,
        }
    }

    pub fn polarity(self) -> Polarity {
        if (self as usize) % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zodiac {
    Rat = 0,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl Zodiac {
    pub fn from_index(index: usize) -> Option<Zodiac> {
        match index {
            0 => Some(Zodiac::Rat),
            1 => Some(Zodiac::Ox),
            2 => Some(Zodiac::Tiger),
            3 => Some(Zodiac::Rabbit),
            4 => Some(Zodiac::Dragon),
            5 => Some(Zodiac::Snake),
            6 => Some(Zodiac::Horse),
            7 => Some(Zodiac::Goat),
            8 => Some(Zodiac::Monkey),
            9 => Some(Zodiac::Rooster),
            10 => Some(Zodiac::Dog),
            11 => Some(Zodiac::Pig),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = Zodiac> {
        (0..12).map(Zodiac::from_index).flatten()
    }

    pub fn name(self) -> &'static str {
        match self {
            Zodiac::Rat => "鼠",
            Zodiac::Ox => "牛",
            Zodiac::Tiger => "虎",
            Zodiac::Rabbit => "兔",
            Zodiac::Dragon => "龙",
            Zodiac::Snake => "蛇",
            Zodiac::Horse => "马",
            Zodiac::Goat => "羊",
            Zodiac::Monkey => "猴",
            Zodiac::Rooster => "鸡",
            Zodiac::Dog => "狗",
            Zodiac::Pig => "猪",
        }
    }

    /// Guardian deity (本命佛) associated with the animal by convention.
    pub fn guardian_deity(self) -> &'static str {
        match self {
            Zodiac::Rat => "千手观音",
            Zodiac::Ox | Zodiac::Tiger => "虚空藏菩萨",
            Zodiac::Rabbit => "文殊菩萨",
            Zodiac::Dragon | Zodiac::Snake => "普贤菩萨",
            Zodiac::Horse => "大势至菩萨",
            Zodiac::Goat | Zodiac::Monkey => "大日如来",
            Zodiac::Rooster => "不动尊菩萨",
            Zodiac::Dog | Zodiac::Pig => "阿弥陀佛",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constellation {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Date ranges per constellation, (start month, start day) to (end month, end day),
/// both ends inclusive. Capricorn wraps across the year boundary.
const CONSTELLATION_RANGES: [(Constellation, (u32, u32), (u32, u32)); 12] = [
    (Constellation::Aries, (3, 21), (4, 19)),
    (Constellation::Taurus, (4, 20), (5, 20)),
    (Constellation::Gemini, (5, 21), (6, 21)),
    (Constellation::Cancer, (6, 22), (7, 22)),
    (Constellation::Leo, (7, 23), (8, 22)),
    (Constellation::Virgo, (8, 23), (9, 22)),
    (Constellation::Libra, (9, 23), (10, 23)),
    (Constellation::Scorpio, (10, 24), (11, 22)),
    (Constellation::Sagittarius, (11, 23), (12, 21)),
    (Constellation::Capricorn, (12, 22), (1, 19)),
    (Constellation::Aquarius, (1, 20), (2, 18)),
    (Constellation::Pisces, (2, 19), (3, 20)),
];

impl Constellation {
    /// Resolves the constellation for a solar (month, day). Falls back to the
    /// first table entry if nothing matches, which cannot happen for a real date.
    pub fn from_month_day(month: u32, day: u32) -> Constellation {
        for &(constellation, (start_month, start_day), (end_month, end_day)) in
            CONSTELLATION_RANGES.iter()
        {
            let matched = if start_month > end_month {
                // Range wraps across the year boundary
                (month == start_month && day >= start_day)
                    || (month == end_month && day <= end_day)
                    || month > start_month
                    || month < end_month
            } else {
                (month == start_month && day >= start_day)
                    || (month == end_month && day <= end_day)
                    || (month > start_month && month < end_month)
            };
            if matched {
                return constellation;
            }
        }
        CONSTELLATION_RANGES[0].0
    }

    pub fn name(self) -> &'static str {
        match self {
            Constellation::Aries => "白羊座",
            Constellation::Taurus => "金牛座",
            Constellation::Gemini => "双子座",
            Constellation::Cancer => "巨蟹座",
            Constellation::Leo => "狮子座",
            Constellation::Virgo => "处女座",
            Constellation::Libra => "天秤座",
            Constellation::Scorpio => "天蝎座",
            Constellation::Sagittarius => "射手座",
            Constellation::Capricorn => "摩羯座",
            Constellation::Aquarius => "水瓶座",
            Constellation::Pisces => "双鱼座",
        }
    }
}

// ---------------------------
// ## Structures
// ---------------------------

/// One stem-branch pair. Only the 60 combinations reachable from a cycle
/// position are ever produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemBranchPair {
    pub stem: Stem,
    pub branch: Branch,
}

impl StemBranchPair {
    pub fn from_cycle_position(position: usize) -> StemBranchPair {
        let position = position % 60;
        StemBranchPair::from_indices(position % 10, position % 12)
    }

    pub(crate) fn from_indices(stem_index: usize, branch_index: usize) -> StemBranchPair {
        StemBranchPair {
            stem: Stem::from_index(stem_index % 10).unwrap_or(Stem::Jia),
            branch: Branch::from_index(branch_index % 12).unwrap_or(Branch::Zi),
        }
    }

    /// Two-character display name, e.g. "甲子".
    pub fn cycle_name(&self) -> String {
        format!("{}{}", self.stem.name(), self.branch.name())
    }
}

impl fmt::Display for StemBranchPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.name(), self.branch.name())
    }
}

/// The four pillars of a birth moment, coarse to fine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: StemBranchPair,
    pub month: StemBranchPair,
    pub day: StemBranchPair,
    pub hour: StemBranchPair,
}

impl FourPillars {
    pub fn iter(&self) -> impl Iterator<Item = StemBranchPair> {
        [self.year, self.month, self.day, self.hour].into_iter()
    }
}

/// Element counts across the eight stem/branch characters of the four pillars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTally {
    counts: [u32; 5],
}

impl ElementTally {
    pub fn from_pillars(pillars: &FourPillars) -> ElementTally {
        let mut tally = ElementTally::default();
        for pillar in pillars.iter() {
            tally.add(pillar.stem.element());
            tally.add(pillar.branch.element());
        }
        tally
    }

    pub fn add(&mut self, element: Element) {
        self.counts[element as usize] += 1;
    }

    /// Counts the element of a raw stem/branch character. Symbols outside the
    /// 22 valid characters contribute nothing.
    pub fn add_symbol(&mut self, symbol: char) {
        if let Some(element) = element_of(symbol) {
            self.add(element);
        }
    }

    pub fn count(&self, element: Element) -> u32 {
        self.counts[element as usize]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Iterates counts in the fixed element order 金木水火土.
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::all().map(move |element| (element, self.count(element)))
    }

    /// Element with the highest count; ties resolve to the earliest element
    /// in the fixed order.
    pub fn max_element(&self) -> Element {
        let mut best = Element::Gold;
        for element in Element::all() {
            if self.count(element) > self.count(best) {
                best = element;
            }
        }
        best
    }

    /// Element with the lowest count; ties resolve to the earliest element
    /// in the fixed order.
    pub fn min_element(&self) -> Element {
        let mut worst = Element::Gold;
        for element in Element::all() {
            if self.count(element) < self.count(worst) {
                worst = element;
            }
        }
        worst
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInput {
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub is_lunar: bool,
    pub birth_hour: u32,
}

impl BirthInput {
    pub fn generate_chart(&self) -> ChartRecord {
        generate_chart(self)
    }
}

/// One assembled chart. Built once per generation call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub is_lunar: bool,
    pub birth_hour: u32,
    pub zodiac: Zodiac,
    pub guardian_deity: String,
    pub constellation: Constellation,
    pub pillars: FourPillars,
    pub tally: ElementTally,
    pub personality: Vec<String>,
    pub key_points: Vec<String>,
}

// ---------------------------
// ## Date Normalizer
// ---------------------------

/// Resolves the birth input to a solar date-time with the hour fixed to the
/// birth-hour slot and minutes/seconds zeroed.
///
/// Lunar dates are shifted by a flat 30 days. This is a placeholder offset,
/// not a calendrical lunar-to-solar conversion; callers must not rely on
/// exactness for lunar input.
pub fn normalize_birth_datetime(input: &BirthInput) -> NaiveDateTime {
    let mut date = input.birth_date;
    if input.is_lunar {
        date += ChronoDuration::days(30);
    }
    let hour = input.birth_hour.min(23);
    date.and_hms_opt(hour, 0, 0).expect("hour clamped to 0-23")
}

// ---------------------------
// ## Chart Assembler
// ---------------------------

/// Builds a complete chart record from the birth input.
pub fn generate_chart(input: &BirthInput) -> ChartRecord {
    let calendar = SexagenaryCalendar::new();
    let birth_datetime = normalize_birth_datetime(input);

    let pillars = calendar.compute_four_pillars(birth_datetime);
    let zodiac = calendar.zodiac_animal_of(birth_datetime.year());
    let guardian_deity = zodiac.guardian_deity().to_string();
    let constellation = Constellation::from_month_day(birth_datetime.month(), birth_datetime.day());
    let tally = ElementTally::from_pillars(&pillars);
    let personality = narrative::personality_sentences(pillars.day.stem, &tally);
    let key_points = narrative::key_points(zodiac, &guardian_deity, constellation, &tally);

    ChartRecord {
        id: next_chart_id(),
        generated_at: Utc::now(),
        name: input.name.clone(),
        gender: input.gender,
        birth_date: input.birth_date,
        is_lunar: input.is_lunar,
        birth_hour: input.birth_hour,
        zodiac,
        guardian_deity,
        constellation,
        pillars,
        tally,
        personality,
        key_points,
    }
}

/// Millisecond timestamp plus a random suffix. Unique within a process
/// lifetime with probabilistic, non-cryptographic guarantees.
fn next_chart_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

// ---------------------------
// ## Presentation Helpers
// ---------------------------

/// Space-joined pillar names in year-month-day-hour order, e.g. "甲子 辛未 甲辰 己巳".
pub fn format_pillars(record: &ChartRecord) -> String {
    record
        .pillars
        .iter()
        .map(|pillar| pillar.cycle_name())
        .collect::<Vec<_>>()
        .join(" ")
}
