//! Templated personality and summary text derived from the day stem and the
//! five-element tally.

use crate::{Constellation, Element, ElementTally, Stem, Zodiac};

/// Slots counted into a full tally: one element per stem and branch of the
/// four pillars.
const ELEMENT_SLOTS: f64 = 8.0;

/// Fixed trait sentence for each day stem.
fn day_stem_trait(stem: Stem) -> &'static str {
    match stem {
        Stem::Jia => "甲木参天，为人正直进取，勇于开拓，乐于扶助他人。",
        Stem::Yi => "乙木柔韧，性情温和细腻，善于顺势而为，适应力强。",
        Stem::Bing => "丙火如日，热情开朗，精力充沛，待人光明磊落。",
        Stem::Ding => "丁火如烛，心思缜密，感情细腻，重情重义。",
        Stem::Wu => "戊土厚重，稳健踏实，言出必行，是可托付之人。",
        Stem::Ji => "己土包容，随和善良，长于调和众人，不露锋芒。",
        Stem::Geng => "庚金刚健，果断刚毅，讲求原则，行事干脆利落。",
        Stem::Xin => "辛金温润，敏锐精致，追求完美，审美出众。",
        Stem::Ren => "壬水奔流，聪明豁达，胸怀宽广，应变自如。",
        Stem::Gui => "癸水润物，温柔内敛，直觉敏锐，富于想象。",
    }
}

/// Personality text: the day-stem trait sentence followed by a sentence
/// naming the strongest and weakest element of the tally.
pub fn personality_sentences(day_stem: Stem, tally: &ElementTally) -> Vec<String> {
    let strongest = tally.max_element();
    let weakest = tally.min_element();
    vec![
        day_stem_trait(day_stem).to_string(),
        format!(
            "五行之中{}最旺，{}偏弱，宜求平衡之道。",
            strongest.name(),
            weakest.name()
        ),
    ]
}

/// Chart summary lines: zodiac and guardian, constellation, then the share
/// of each represented element in fixed element order.
pub fn key_points(
    zodiac: Zodiac,
    guardian_deity: &str,
    constellation: Constellation,
    tally: &ElementTally,
) -> Vec<String> {
    let mut points = vec![
        format!("生肖{}，守护神{}", zodiac.name(), guardian_deity),
        constellation.name().to_string(),
    ];
    for (element, count) in tally.iter() {
        if count == 0 {
            continue;
        }
        let percent = f64::from(count) / ELEMENT_SLOTS * 100.0;
        points.push(format!("{}占{:.1}%", element.name(), percent));
    }
    points
}
