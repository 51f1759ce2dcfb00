use bazi_core::{format_pillars, generate_chart, BirthInput, Gender};
use chrono::NaiveDate;

fn main() {
    // Example usage
    let input = BirthInput {
        name: "测试用户".to_string(),
        gender: Gender::Male,
        birth_date: NaiveDate::from_ymd_opt(2000, 6, 15).expect("valid date"),
        is_lunar: false,
        birth_hour: 10,
    };

    let chart = generate_chart(&input);
    println!("四柱: {}", format_pillars(&chart));
    println!("{:#?}", chart);
}
