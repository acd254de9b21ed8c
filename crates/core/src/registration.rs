//! Event registration entries.
//!
//! A [`RegistrationEntry`] is built from an untrusted key/value payload,
//! validated, and either exported to CSV (see [`crate::csv_export`]) or
//! discarded. Entries are never persisted.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::validation::FieldErrors;

// ---------------------------------------------------------------------------
// Select-option constants
// ---------------------------------------------------------------------------

/// Institutions a participant may register from (rendered as a select box).
/// Membership is not validated; the form only offers these options.
pub const SCHOOLS: &[&str] = &[
    "函館工業高等専門学校",
    "苫小牧工業高等専門学校",
    "釧路工業高等専門学校",
    "旭川工業高等専門学校",
    "八戸工業高等専門学校",
    "一関工業高等専門学校",
    "仙台高等専門学校",
    "秋田工業高等専門学校",
    "鶴岡工業高等専門学校",
    "福島工業高等専門学校",
    "茨城工業高等専門学校",
    "小山工業高等専門学校",
    "群馬工業高等専門学校",
    "木更津工業高等専門学校",
    "東京工業高等専門学校",
    "東京都立産業技術高等専門学校",
    "サレジオ工業高等専門学校",
    "長岡工業高等専門学校",
    "富山高等専門学校",
    "石川工業高等専門学校",
    "金沢工業高等専門学校",
    "福井工業高等専門学校",
    "長野工業高等専門学校",
    "岐阜工業高等専門学校",
    "沼津工業高等専門学校",
    "豊田工業高等専門学校",
    "鳥羽商船高等専門学校",
    "鈴鹿工業高等専門学校",
    "近畿大学工業高等専門学校",
    "舞鶴工業高等専門学校",
    "大阪府立大学工業高等専門学校",
    "明石工業高等専門学校",
    "神戸市立工業高等専門学校",
    "奈良工業高等専門学校",
    "和歌山工業高等専門学校",
    "米子工業高等専門学校",
    "松江工業高等専門学校",
    "津山工業高等専門学校",
    "広島商船高等専門学校",
    "呉工業高等専門学校",
    "徳山工業高等専門学校",
    "宇部工業高等専門学校",
    "大島商船高等専門学校",
    "阿南工業高等専門学校",
    "香川高等専門学校",
    "新居浜工業高等専門学校",
    "弓削商船高等専門学校",
    "高知工業高等専門学校",
    "北九州工業高等専門学校",
    "久留米工業高等専門学校",
    "有明工業高等専門学校",
    "佐世保工業高等専門学校",
    "熊本高等専門学校",
    "大分工業高等専門学校",
    "都城工業高等専門学校",
    "鹿児島工業高等専門学校",
    "沖縄工業高等専門学校",
];

/// Grade levels (5 regular course years, 2 advanced course years).
pub const GRADES: &[&str] = &[
    "本科1年生",
    "本科2年生",
    "本科3年生",
    "本科4年生",
    "本科5年生",
    "専攻科1年生",
    "専攻科2年生",
];

/// Fixed options for the "how did you hear about us" multi-select.
pub const REFERRAL_SOURCES: &[&str] = &[
    "友人・先輩に勧められたから",
    "Twitterのツイートを見て知った",
    "Facebookの記事を見て知った",
    "その他",
];

// ---------------------------------------------------------------------------
// RegistrationEntry
// ---------------------------------------------------------------------------

/// A single submitted registration. Transient: validated, exported, dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationEntry {
    pub name_kanji: String,
    pub name_kana: String,
    pub email: String,
    pub gender: String,
    /// Raw year/month/day strings as submitted; see [`Self::birthday`].
    pub birth_year: String,
    pub birth_month: String,
    pub birth_day: String,
    pub school: String,
    pub grade: String,
    pub major: String,
    pub chat_handle: String,
    pub twitter: String,
    pub github: String,
    pub facebook: String,
    pub motivation: String,
    pub portfolio: String,
    /// Ordered multi-select answer. Blank entries are kept here and only
    /// dropped at CSV export time.
    pub referral_sources: Vec<String>,
    /// Raw opt-in flag value, exported verbatim.
    pub mail_opt_in: String,
}

impl RegistrationEntry {
    /// Build an entry from an untrusted key/value map.
    ///
    /// Only the keys enumerated here are read. Unknown keys, and values of
    /// the wrong JSON type, are silently ignored.
    pub fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        let mut entry = Self::default();
        for (key, value) in map {
            let slot = match key.as_str() {
                "name_kanji" => &mut entry.name_kanji,
                "name_kana" => &mut entry.name_kana,
                "email" => &mut entry.email,
                "gender" => &mut entry.gender,
                "birth_year" => &mut entry.birth_year,
                "birth_month" => &mut entry.birth_month,
                "birth_day" => &mut entry.birth_day,
                "school" => &mut entry.school,
                "grade" => &mut entry.grade,
                "major" => &mut entry.major,
                "chat_handle" => &mut entry.chat_handle,
                "twitter" => &mut entry.twitter,
                "github" => &mut entry.github,
                "facebook" => &mut entry.facebook,
                "motivation" => &mut entry.motivation,
                "portfolio" => &mut entry.portfolio,
                "mail_opt_in" => &mut entry.mail_opt_in,
                "referral_sources" => {
                    if let Value::Array(items) = value {
                        entry.referral_sources = items
                            .iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect();
                    }
                    continue;
                }
                _ => continue,
            };
            if let Some(s) = value.as_str() {
                *slot = s.to_string();
            }
        }
        entry
    }

    /// The submitted birth date, if year/month/day form a real calendar date.
    ///
    /// Each component is coerced from its leading ASCII digits; a value with
    /// no leading digits coerces to 0 and can never form a valid date.
    pub fn birthday(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            leading_digits(&self.birth_year) as i32,
            leading_digits(&self.birth_month),
            leading_digits(&self.birth_day),
        )
    }

    /// Check all rules and return the accumulated field errors.
    ///
    /// Rules never short-circuit: a present-but-overlong email that also
    /// fails the format check collects every applicable message.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let required: [(&str, &str); 9] = [
            ("name_kanji", &self.name_kanji),
            ("name_kana", &self.name_kana),
            ("email", &self.email),
            ("gender", &self.gender),
            ("school", &self.school),
            ("grade", &self.grade),
            ("major", &self.major),
            ("motivation", &self.motivation),
            ("chat_handle", &self.chat_handle),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.add(field, "is required");
            }
        }

        let bounded: [(&str, &str, usize); 6] = [
            ("name_kanji", &self.name_kanji, 50),
            ("name_kana", &self.name_kana, 50),
            ("email", &self.email, 256),
            ("facebook", &self.facebook, 256),
            ("twitter", &self.twitter, 50),
            ("github", &self.github, 50),
        ];
        for (field, value, max) in bounded {
            if value.chars().count() > max {
                errors.add(field, format!("must be at most {max} characters"));
            }
        }

        if !email_format_valid(&self.email) {
            errors.add("email", "is not a valid email address");
        }

        if self.birth_year.trim().is_empty() || self.birthday().is_none() {
            errors.add("birthday", "must be a valid date");
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Coercion and format helpers
// ---------------------------------------------------------------------------

/// Coerce a date component from its leading ASCII digits; anything else is 0.
fn leading_digits(s: &str) -> u32 {
    let digits: String = s
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[^@\s]+@(?:[-a-z0-9]+\.)+[a-z]{2,}$").expect("email pattern compiles")
    })
}

/// Restricted email format: `local@domain` where the domain is dotted labels
/// ending in a TLD of two or more letters, the local part does not end in a
/// dot, and no `..` appears anywhere in the address. The `..` rule is
/// independent of the pattern and also rejects doubled dots in the domain.
pub fn email_format_valid(email: &str) -> bool {
    if email.contains("..") {
        return false;
    }
    match email.split_once('@') {
        Some((local, _)) if local.ends_with('.') => return false,
        _ => {}
    }
    email_pattern().is_match(email)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
