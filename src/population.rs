// src/population.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Approximate national populations used to turn an employment-to-population
/// ratio into an employment count. Each country appears once; lookup order
/// for partial matches is the order below.
pub static POPULATION_PROXY: &[(&str, u64)] = &[
    ("India", 1_417_173_000),
    ("China", 1_425_887_337),
    ("United States", 338_289_857),
    ("Indonesia", 277_534_122),
    ("Pakistan", 240_485_658),
    ("Brazil", 215_313_498),
    ("Nigeria", 223_804_632),
    ("Bangladesh", 171_186_372),
    ("Russia", 144_444_359),
    ("Mexico", 128_932_753),
    ("Japan", 123_294_513),
    ("Ethiopia", 130_000_000),
    ("Philippines", 120_595_548),
    ("Egypt", 110_000_000),
    ("Germany", 84_405_100),
    ("Vietnam", 98_186_856),
    ("DR Congo", 99_010_000),
    ("Turkey", 86_749_700),
    ("Iran", 91_567_416),
    ("Thailand", 71_801_915),
    ("United Kingdom", 67_736_802),
    ("Tanzania", 65_497_748),
    ("France", 68_017_000),
    ("South Africa", 60_142_978),
    ("Kenya", 54_054_487),
    ("Myanmar", 54_732_500),
    ("Sudan", 47_753_632),
    ("Uganda", 48_582_220),
    ("Angola", 36_815_961),
    ("Algeria", 44_945_000),
    ("Iraq", 43_533_592),
    ("Canada", 39_742_154),
    ("Afghanistan", 42_972_958),
    ("Ukraine", 38_000_000),
    ("Saudi Arabia", 36_408_820),
    ("Morocco", 38_081_755),
    ("Uzbekistan", 35_896_996),
    ("Malaysia", 34_305_500),
    ("Yemen", 34_449_825),
    ("Peru", 34_352_719),
    ("Australia", 26_603_400),
    ("Colombia", 52_085_168),
    ("Sri Lanka", 22_156_000),
    ("Syria", 22_125_490),
    ("Poland", 37_654_000),
    ("Romania", 18_970_458),
    ("Chile", 19_600_000),
    ("Kazakhstan", 20_331_129),
    ("Tajikistan", 10_143_200),
    ("Netherlands", 17_750_000),
    ("South Korea", 51_908_400),
    ("Greece", 10_640_801),
    ("Portugal", 10_426_199),
    ("Austria", 9_108_202),
    ("Hungary", 9_673_107),
    ("Sweden", 10_549_347),
    ("Azerbaijan", 10_139_177),
    ("Belgium", 11_690_814),
    ("Tunisia", 12_356_117),
    ("Cuba", 10_500_981),
    ("Czech Republic", 10_510_785),
    ("Israel", 9_656_842),
    ("Switzerland", 8_776_000),
    ("Bulgaria", 6_840_000),
    ("Serbia", 6_690_121),
    ("Hong Kong", 7_685_600),
    ("Denmark", 5_903_037),
    ("Singapore", 5_917_600),
    ("Slovakia", 5_460_721),
    ("Finland", 5_571_665),
    ("Norway", 5_547_933),
    ("Ireland", 5_127_900),
    ("New Zealand", 5_228_100),
    ("Costa Rica", 5_180_829),
    ("Lebanon", 5_489_094),
    ("Panama", 4_408_581),
    ("Iceland", 397_413),
    ("Luxembourg", 683_201),
];

static EXACT: Lazy<HashMap<&'static str, u64>> =
    Lazy::new(|| POPULATION_PROXY.iter().copied().collect());

/// Population for `area`: exact name first, then the first proxy entry where
/// one name contains the other (case-insensitive).
pub fn population_for(area: &str) -> Option<u64> {
    if let Some(&p) = EXACT.get(area) {
        return Some(p);
    }
    let low = area.trim().to_lowercase();
    if low.is_empty() {
        return None;
    }
    POPULATION_PROXY
        .iter()
        .find(|(name, _)| {
            let name = name.to_lowercase();
            name.contains(&low) || low.contains(&name)
        })
        .map(|&(_, p)| p)
}

/// Employment count from an employment-to-population ratio. Ratios above 1
/// are read as percentages.
pub fn employment_from_ratio(ratio: f64, population: u64) -> Option<f64> {
    if !ratio.is_finite() {
        return None;
    }
    let share = if ratio > 1.0 { ratio / 100.0 } else { ratio };
    Some(share * population as f64)
}
