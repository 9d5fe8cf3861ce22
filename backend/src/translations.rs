//! English to Hebrew display names.
//!
//! Festival names are matched exactly, then by prefix so that numbered days
//! ("Pesach 7", "Sukkot 2") resolve to the festival. Portion names go through
//! a normalized key to absorb transliteration differences between sources.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::calendar::HebrewDate;

/// Prefix of every parsha display string.
pub const PARSHA_PREFIX: &str = "פרשת ";

/// Festival names, in prefix-match priority order.
pub const YOMTOV_TRANSLATIONS: &[(&str, &str)] = &[
    ("Erev Rosh Hashana", "ערב ראש השנה"),
    ("Rosh Hashana", "ראש השנה"),
    ("Rosh Hashanah", "ראש השנה"),
    ("Erev Yom Kippur", "ערב יום כיפור"),
    ("Yom Kippur", "יום כיפור"),
    ("Erev Sukkos", "ערב סוכות"),
    ("Erev Sukkot", "ערב סוכות"),
    ("Sukkot", "סוכות"),
    ("Sukkos", "סוכות"),
    ("Hoshana Rabba", "הושענא רבה"),
    ("Shmini Atzeres", "שמיני עצרת"),
    ("Shmini Atzeret / Simchat Tora", "שמיני עצרת / שמחת תורה"),
    ("Shmini Atzeret", "שמיני עצרת"),
    ("Shemini Atzeret", "שמיני עצרת"),
    ("Simchas Tora", "שמחת תורה"),
    ("Simchat Tora", "שמחת תורה"),
    ("Simchas Torah", "שמחת תורה"),
    ("Simchat Torah", "שמחת תורה"),
    ("Erev Pesach", "ערב פסח"),
    ("Pesach", "פסח"),
    ("Passover", "פסח"),
    ("Erev Shavuos", "ערב שבועות"),
    ("Erev Shavuot", "ערב שבועות"),
    ("Shavuos", "שבועות"),
    ("Shavuot", "שבועות"),
    ("Chol HaMoed", "חול המועד"),
    ("Chanukah", "חנוכה"),
    ("Hanukkah", "חנוכה"),
    ("Purim", "פורים"),
    ("Tu BiShvat", "ט״ו בשבט"),
    ("Tu B'Shvat", "ט״ו בשבט"),
    ("Lag BaOmer", "ל״ג בעומר"),
    ("Lag B'Omer", "ל״ג בעומר"),
    ("Tisha B'Av", "תשעה באב"),
    ("Yom HaShoah", "יום השואה"),
    ("Yom HaZikaron", "יום הזיכרון"),
    ("Yom HaAtzmaut", "יום העצמאות"),
    ("Yom Yerushalayim", "יום ירושלים"),
];

/// Weekly portions, including the spellings used by common sources.
pub const PARSHA_TRANSLATIONS: &[(&str, &str)] = &[
    // Bereshit
    ("Bereshit", "בראשית"),
    ("Noach", "נח"),
    ("Lech-Lecha", "לך לך"),
    ("Vayera", "וירא"),
    ("Chayei Sara", "חיי שרה"),
    ("Toldot", "תולדות"),
    ("Vayetzei", "ויצא"),
    ("Vayishlach", "וישלח"),
    ("Vayeshev", "וישב"),
    ("Miketz", "מקץ"),
    ("Vayigash", "ויגש"),
    ("Vayechi", "ויחי"),
    // Shemot
    ("Shemot", "שמות"),
    ("Vaera", "וארא"),
    ("Bo", "בא"),
    ("Beshalach", "בשלח"),
    ("Yitro", "יתרו"),
    ("Mishpatim", "משפטים"),
    ("Terumah", "תרומה"),
    ("Tetzaveh", "תצוה"),
    ("Ki Tisa", "כי תשא"),
    ("Vayakhel", "ויקהל"),
    ("Pekudei", "פקודי"),
    // Vayikra
    ("Vayikra", "ויקרא"),
    ("Tzav", "צו"),
    ("Shmini", "שמיני"),
    ("Shemini", "שמיני"),
    ("Tazria", "תזריע"),
    ("Metzora", "מצורע"),
    ("Achrei Mot", "אחרי מות"),
    ("Kedoshim", "קדושים"),
    ("Emor", "אמור"),
    ("Behar", "בהר"),
    ("Bechukotai", "בחוקותי"),
    // Bamidbar
    ("Bamidbar", "במדבר"),
    ("Nasso", "נשא"),
    ("Beha'alotcha", "בהעלותך"),
    ("Shelach", "שלח"),
    ("Korach", "קרח"),
    ("Chukat", "חוקת"),
    ("Balak", "בלק"),
    ("Pinchas", "פנחס"),
    ("Matot", "מטות"),
    ("Masei", "מסעי"),
    // Devarim
    ("Devarim", "דברים"),
    ("Vaetchanan", "ואתחנן"),
    ("Eikev", "עקב"),
    ("Ekev", "עקב"),
    ("Re'eh", "ראה"),
    ("Shoftim", "שופטים"),
    ("Ki Teitzei", "כי תצא"),
    ("Ki Tetzei", "כי תצא"),
    ("Ki Tavo", "כי תבוא"),
    ("Nitzavim", "נצבים"),
    ("Vayeilech", "וילך"),
    ("Ha'Azinu", "האזינו"),
    ("Vezot Haberakhah", "וזאת הברכה"),
    // Alternate spellings
    ("Lech Lecha", "לך לך"),
    ("Chayei Sarah", "חיי שרה"),
    ("Vayeitzei", "ויצא"),
    ("Ki Sisa", "כי תשא"),
    ("Acharei Mot", "אחרי מות"),
    ("Bechukosai", "בחוקותי"),
    ("Beha'aloscha", "בהעלותך"),
    ("Shlach", "שלח"),
    ("Chukas", "חוקת"),
    ("Matos", "מטות"),
    ("Mas'ei", "מסעי"),
    ("Va'eschanan", "ואתחנן"),
    ("Re'e", "ראה"),
    ("Ki Seitzei", "כי תצא"),
    ("Ki Tetze", "כי תצא"),
    ("Ki Savo", "כי תבוא"),
    ("Vayelech", "וילך"),
    ("V'Zot HaBerachah", "וזאת הברכה"),
    ("Vzot Haberachah", "וזאת הברכה"),
    // Combined readings
    ("Vayakhel-Pekudei", "ויקהל-פקודי"),
    ("Vayakhel-Pekudey", "ויקהל-פקודי"),
    ("Tazria-Metzora", "תזריע-מצורע"),
    ("Tazria-Metsora", "תזריע-מצורע"),
    ("Achrei Mot-Kedoshim", "אחרי מות-קדושים"),
    ("Acharei Mot-Kedoshim", "אחרי מות-קדושים"),
    ("Behar-Bechukotai", "בהר-בחוקותי"),
    ("Behar-Bechukosai", "בהר-בחוקותי"),
    ("Chukat-Balak", "חוקת-בלק"),
    ("Chukas-Balak", "חוקת-בלק"),
    ("Matot-Masei", "מטות-מסעי"),
    ("Matos-Masei", "מטות-מסעי"),
    ("Matot-Mas'ei", "מטות-מסעי"),
    ("Nitzavim-Vayelech", "נצבים-וילך"),
    ("Nitzavim-Vayeilech", "נצבים-וילך"),
];

pub const MONTH_TRANSLATIONS: &[(&str, &str)] = &[
    ("Nisan", "ניסן"),
    ("Iyar", "אייר"),
    ("Sivan", "סיון"),
    ("Tammuz", "תמוז"),
    ("Av", "אב"),
    ("Elul", "אלול"),
    ("Tishrei", "תשרי"),
    ("Cheshvan", "חשון"),
    ("Kislev", "כסלו"),
    ("Teves", "טבת"),
    ("Tevet", "טבת"),
    ("Shevat", "שבט"),
    ("Adar", "אדר"),
    ("Adar I", "אדר א'"),
    ("Adar II", "אדר ב'"),
];

struct ParshaLookup {
    exact: HashMap<String, &'static str>,
    normalized: HashMap<String, &'static str>,
}

fn parsha_lookup() -> &'static ParshaLookup {
    static LOOKUP: OnceLock<ParshaLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| ParshaLookup {
        exact: PARSHA_TRANSLATIONS
            .iter()
            .map(|(en, he)| (en.to_lowercase(), *he))
            .collect(),
        normalized: PARSHA_TRANSLATIONS
            .iter()
            .map(|(en, he)| (normalize_key(en), *he))
            .collect(),
    })
}

/// Lookup key: lowercase, without apostrophes, hyphens or spaces.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\'' | '’' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Hebrew name of a festival; unknown names pass through unchanged.
pub fn translate_yomtov(name: &str) -> String {
    if let Some((_, he)) = YOMTOV_TRANSLATIONS.iter().find(|(en, _)| *en == name) {
        return he.to_string();
    }
    YOMTOV_TRANSLATIONS
        .iter()
        .find(|(en, _)| name.starts_with(en))
        .map(|(_, he)| he.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Hebrew portion name without the display prefix, if known.
pub fn lookup_parsha(name: &str) -> Option<&'static str> {
    let lookup = parsha_lookup();
    lookup
        .exact
        .get(&name.to_lowercase())
        .or_else(|| lookup.normalized.get(&normalize_key(name)))
        .copied()
}

/// Display form of a portion: `פרשת <name>`, Hebrew when known.
pub fn translate_parsha(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("Parashat ").unwrap_or(name).trim();
    format!("{}{}", PARSHA_PREFIX, lookup_parsha(name).unwrap_or(name))
}

pub fn translate_month(name: &str) -> String {
    MONTH_TRANSLATIONS
        .iter()
        .find(|(en, _)| *en == name)
        .map(|(_, he)| he.to_string())
        .unwrap_or_else(|| name.to_string())
}

const ONES: [&str; 10] = ["", "א", "ב", "ג", "ד", "ה", "ו", "ז", "ח", "ט"];
const TENS: [&str; 10] = ["", "י", "כ", "ל", "מ", "נ", "ס", "ע", "פ", "צ"];
const HUNDREDS: [&str; 10] = ["", "ק", "ר", "ש", "ת", "תק", "תר", "תש", "תת", "תתק"];

/// Gershayim before the last letter, or a geresh after a single letter.
fn punctuate(letters: &str) -> String {
    let chars: Vec<char> = letters.chars().collect();
    match chars.len() {
        0 => String::new(),
        1 => format!("{}'", letters),
        n => {
            let head: String = chars[..n - 1].iter().collect();
            format!("{}\"{}", head, chars[n - 1])
        }
    }
}

/// Letters for 0..=99, with 15 and 16 written as 9+6 and 9+7.
fn tens_and_ones(n: u32) -> String {
    match n {
        15 => "טו".to_string(),
        16 => "טז".to_string(),
        _ => format!("{}{}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
    }
}

/// Day of the month in Hebrew numerals (`כ"ד`, `ט"ו`, `א'`).
pub fn day_to_hebrew(day: u8) -> String {
    punctuate(&tens_and_ones(u32::from(day) % 100))
}

/// Year in Hebrew numerals without the thousands (5785 → `תשפ"ה`).
pub fn year_to_hebrew(year: i32) -> String {
    let short = year.rem_euclid(1000) as u32;
    let letters = format!("{}{}", HUNDREDS[(short / 100) as usize], tens_and_ones(short % 100));
    punctuate(&letters)
}

/// Hebrew date of a Gregorian date, e.g. `כ"ד טבת תשפ"ה`.
pub fn hebrew_date_label(date: NaiveDate) -> String {
    let h = HebrewDate::from_gregorian(date);
    format!(
        "{} {} {}",
        day_to_hebrew(h.day),
        translate_month(h.month_name()),
        year_to_hebrew(h.year)
    )
}
