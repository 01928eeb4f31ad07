use super::{CatalogError, ConditionSource};
use crate::gauge::domain::{Category, Condition, ConditionId, ConditionStatus};
use chrono::NaiveDate;

/// Built-in catalog shipped with the gauge.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedCatalog;

impl ConditionSource for SeedCatalog {
    fn load(&self) -> Result<Vec<Condition>, CatalogError> {
        Ok(seed_conditions())
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn fulfilled(on: NaiveDate) -> (ConditionStatus, Option<NaiveDate>) {
    (ConditionStatus::Fulfilled { date: on }, Some(on))
}

fn active(since: NaiveDate) -> (ConditionStatus, Option<NaiveDate>) {
    (ConditionStatus::Active { since }, Some(since))
}

fn emerging(percentage: f64) -> (ConditionStatus, Option<NaiveDate>) {
    (ConditionStatus::Emerging { percentage }, None)
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &'static str,
    category: Category,
    reference: &'static str,
    quote: &'static str,
    weight: f64,
    (status, fulfilled): (ConditionStatus, Option<NaiveDate>),
    confidence: f64,
    source: &'static str,
) -> Condition {
    Condition {
        id: ConditionId::new(id),
        category,
        scripture_reference: reference.to_string(),
        scripture_quote: quote.to_string(),
        weight,
        current_status: status,
        fulfillment_date: fulfilled,
        confidence_score: confidence,
        data_source: source.to_string(),
    }
}

fn seed_conditions() -> Vec<Condition> {
    use Category::*;

    vec![
        seed(
            "ezekiel-36-24",
            IsraelJerusalem,
            "Ezekiel 36:24",
            "I will take you from among the nations, gather you out of all countries",
            10.0,
            fulfilled(date(1948, 5, 14)),
            1.0,
            "Historical record - Israel declared independence",
        ),
        seed(
            "isaiah-66-8",
            IsraelJerusalem,
            "Isaiah 66:8",
            "A nation born in one day",
            10.0,
            fulfilled(date(1948, 5, 14)),
            1.0,
            "Historical record",
        ),
        seed(
            "luke-21-24",
            IsraelJerusalem,
            "Luke 21:24",
            "Jerusalem will be trampled on by the Gentiles until...",
            10.0,
            fulfilled(date(1967, 6, 7)),
            1.0,
            "Six-Day War - Jerusalem reunified",
        ),
        seed(
            "zechariah-12-3",
            IsraelJerusalem,
            "Zechariah 12:3",
            "Jerusalem a burdensome stone for all people",
            9.0,
            active(date(1967, 6, 7)),
            0.95,
            "UN resolutions, international disputes",
        ),
        seed(
            "revelation-13-17",
            Technology,
            "Revelation 13:17",
            "No man might buy or sell without the mark",
            9.0,
            emerging(0.75),
            0.8,
            "CBDCs, digital payments, cashless society trends",
        ),
        seed(
            "revelation-13-15",
            Technology,
            "Revelation 13:15",
            "He had power to give life unto the image",
            8.0,
            emerging(0.85),
            0.85,
            "AI advancement, deepfakes, virtual beings",
        ),
        seed(
            "daniel-12-4",
            Technology,
            "Daniel 12:4",
            "Knowledge shall be increased",
            7.0,
            fulfilled(date(2000, 1, 1)),
            1.0,
            "Internet, information explosion",
        ),
        seed(
            "ezekiel-38-5",
            Geopolitical,
            "Ezekiel 38:5",
            "Persia, Ethiopia, and Libya with them",
            8.0,
            active(date(2015, 1, 1)),
            0.85,
            "Russia-Iran-Turkey cooperation",
        ),
        seed(
            "matthew-24-7-wars",
            Geopolitical,
            "Matthew 24:7",
            "Nation shall rise against nation",
            7.0,
            active(date(1914, 1, 1)),
            1.0,
            "WWI, WWII, ongoing conflicts",
        ),
        seed(
            "revelation-16-12",
            Geopolitical,
            "Revelation 16:12",
            "The kings from the East",
            7.0,
            emerging(0.7),
            0.75,
            "China's rise, Asian military buildup",
        ),
        seed(
            "luke-21-11",
            NaturalDisasters,
            "Luke 21:11",
            "Great earthquakes shall be in divers places",
            7.0,
            active(date(1900, 1, 1)),
            0.9,
            "USGS data - increasing frequency",
        ),
        seed(
            "matthew-24-7-famines",
            NaturalDisasters,
            "Matthew 24:7",
            "There shall be famines, and pestilences",
            7.0,
            active(date(2020, 1, 1)),
            0.85,
            "COVID-19, food supply disruptions",
        ),
        seed(
            "2-timothy-3-1",
            MoralDecline,
            "2 Timothy 3:1-5",
            "In the last days perilous times shall come",
            6.0,
            active(date(1960, 1, 1)),
            0.8,
            "Cultural indicators, moral statistics",
        ),
        seed(
            "matthew-24-12",
            MoralDecline,
            "Matthew 24:12",
            "The love of many shall wax cold",
            6.0,
            emerging(0.7),
            0.75,
            "Social polarization, declining empathy",
        ),
        seed(
            "matthew-24-14",
            GospelReach,
            "Matthew 24:14",
            "Gospel preached in all the world",
            8.0,
            emerging(0.92),
            0.95,
            "Joshua Project - 95% reached",
        ),
        seed(
            "matthew-24-9",
            Persecution,
            "Matthew 24:9",
            "Ye shall be hated of all nations",
            5.0,
            active(date(2000, 1, 1)),
            0.8,
            "Open Doors persecution index",
        ),
        seed(
            "matthew-24-11",
            Deception,
            "Matthew 24:11",
            "Many false prophets shall rise",
            6.0,
            active(date(1970, 1, 1)),
            0.85,
            "New Age, cults, false teachings",
        ),
        seed(
            "2-peter-3-3",
            Deception,
            "2 Peter 3:3",
            "There shall come scoffers",
            5.0,
            active(date(1859, 1, 1)),
            0.9,
            "Post-Darwin secular worldview",
        ),
        seed(
            "daniel-9-27",
            TemplePreparation,
            "Daniel 9:27",
            "He shall confirm the covenant",
            9.0,
            (ConditionStatus::NotMet, None),
            0.0,
            "No peace covenant yet",
        ),
        seed(
            "2-thessalonians-2-4",
            TemplePreparation,
            "2 Thessalonians 2:4",
            "He sits in the temple of God",
            9.0,
            emerging(0.3),
            0.4,
            "Temple Institute preparations",
        ),
        seed(
            "numbers-19",
            TemplePreparation,
            "Numbers 19",
            "Red heifer for purification",
            7.0,
            emerging(0.9),
            0.9,
            "Red heifers in Israel 2022",
        ),
        seed(
            "luke-21-25",
            GlobalSigns,
            "Luke 21:25",
            "Distress of nations, with perplexity",
            7.0,
            active(date(2020, 1, 1)),
            0.85,
            "Global anxiety, mental health crisis",
        ),
        seed(
            "1-thessalonians-5-3",
            GlobalSigns,
            "1 Thessalonians 5:3",
            "When they say Peace and safety",
            7.0,
            emerging(0.6),
            0.7,
            "UN peace initiatives, global security efforts",
        ),
        seed(
            "revelation-13-7",
            GlobalSigns,
            "Revelation 13:7",
            "Authority over every tribe and nation",
            8.0,
            emerging(0.5),
            0.6,
            "Global governance initiatives",
        ),
    ]
}
