//! CSV export for validated registration entries.
//!
//! Produces one document per entry: a fixed 16-column header row followed by
//! exactly one data row. Output is a UTF-8 string; the line separator is a
//! required caller choice with no hidden default.

use chrono::NaiveTime;

use crate::error::CoreError;
use crate::registration::RegistrationEntry;
use crate::types::Timestamp;
use crate::validation::FieldErrors;

/// Timestamp and birthday cells share one format.
const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Header labels, in column order.
pub const CSV_COLUMNS: [&str; 16] = [
    "受付日時",
    "氏名（漢字）",
    "氏名（ひらがな）",
    "性別",
    "生年月日",
    "在籍高専",
    "所属学科",
    "学年",
    "連絡先メールアドレス",
    "Twitter ID",
    "Facebook URL",
    "Github ID",
    "応募動機・意気込み",
    "Web上にある作品・ブログなど",
    "高専ベンチャーをどの経緯で知りましたか？",
    "今後のお知らせ",
];

/// Row separator for the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\r\n`, what the downstream spreadsheet tooling expects.
    Crlf,
    /// `\n`.
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

/// Export options. All fields are explicit; callers decide the separator.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub line_ending: LineEnding,
}

/// Serialize one validated entry into a two-row CSV document.
///
/// `submitted_at` becomes the first column. The birthday column is the
/// validated birth date at midnight. Fails with a field-keyed error if the
/// entry's birthday does not form a real date (i.e. the entry was never
/// validated).
pub fn export_entry(
    entry: &RegistrationEntry,
    submitted_at: Timestamp,
    options: &CsvOptions,
) -> Result<String, CoreError> {
    let birthday = entry.birthday().ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add("birthday", "must be a valid date");
        CoreError::invalid(errors)
    })?;

    let referral = entry
        .referral_sources
        .iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("/");

    let cells: [String; 16] = [
        submitted_at.format(DATETIME_FORMAT).to_string(),
        entry.name_kanji.clone(),
        entry.name_kana.clone(),
        entry.gender.clone(),
        birthday.and_time(NaiveTime::MIN).format(DATETIME_FORMAT).to_string(),
        entry.school.clone(),
        entry.major.clone(),
        entry.grade.clone(),
        entry.email.clone(),
        prefixed_handle("http://twitter.com/", &entry.twitter),
        entry.facebook.clone(),
        prefixed_handle("http://github.com/", &entry.github),
        entry.motivation.clone(),
        entry.portfolio.clone(),
        referral,
        entry.mail_opt_in.clone(),
    ];

    let sep = options.line_ending.as_str();
    let header = CSV_COLUMNS
        .iter()
        .map(|c| csv_escape(c))
        .collect::<Vec<_>>()
        .join(",");
    let row = cells
        .iter()
        .map(|c| csv_escape(c))
        .collect::<Vec<_>>()
        .join(",");

    Ok(format!("{header}{sep}{row}{sep}"))
}

/// Empty if the handle is blank, otherwise the handle under its service URL.
fn prefixed_handle(prefix: &str, handle: &str) -> String {
    if handle.trim().is_empty() {
        String::new()
    } else {
        format!("{prefix}{handle}")
    }
}

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry() -> RegistrationEntry {
        RegistrationEntry::from_map(
            json!({
                "name_kanji": "高専 太郎",
                "name_kana": "こうせん たろう",
                "email": "taro@example.com",
                "gender": "男性",
                "birth_year": "1995",
                "birth_month": "2",
                "birth_day": "28",
                "school": "仙台高等専門学校",
                "grade": "本科4年生",
                "major": "情報工学科",
                "chat_handle": "taro.kosen",
                "twitter": "foo",
                "github": "taro-gh",
                "facebook": "https://facebook.com/taro",
                "motivation": "起業に興味があります",
                "portfolio": "https://taro.example.com",
                "referral_sources": ["その他", "", "友人・先輩に勧められたから"],
                "mail_opt_in": "1",
            })
            .as_object()
            .unwrap(),
        )
    }

    fn submitted_at() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2014, 3, 1, 9, 5, 0).unwrap()
    }

    fn export(entry: &RegistrationEntry, line_ending: LineEnding) -> String {
        export_entry(entry, submitted_at(), &CsvOptions { line_ending }).unwrap()
    }

    #[test]
    fn produces_header_and_one_data_row() {
        let csv = export(&entry(), LineEnding::Crlf);
        let rows: Vec<&str> = csv.split("\r\n").filter(|r| !r.is_empty()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].split(',').count(), 16);
        assert_eq!(rows[1].split(',').count(), 16);
    }

    #[test]
    fn data_row_cell_values() {
        let csv = export(&entry(), LineEnding::Lf);
        let rows: Vec<&str> = csv.lines().collect();
        let cells: Vec<&str> = rows[1].split(',').collect();
        assert_eq!(cells[0], "2014/03/01 09:05");
        assert_eq!(cells[1], "高専 太郎");
        assert_eq!(cells[4], "1995/02/28 00:00");
        // major comes before grade in the data row
        assert_eq!(cells[6], "情報工学科");
        assert_eq!(cells[7], "本科4年生");
        assert_eq!(cells[15], "1");
    }

    #[test]
    fn twitter_handle_is_prefixed() {
        let csv = export(&entry(), LineEnding::Lf);
        assert!(csv.contains("http://twitter.com/foo"));
        assert!(csv.contains("http://github.com/taro-gh"));
    }

    #[test]
    fn blank_twitter_renders_empty() {
        let mut e = entry();
        e.twitter = String::new();
        let csv = export(&e, LineEnding::Lf);
        assert!(!csv.contains("twitter.com"));
    }

    #[test]
    fn referral_answers_joined_with_slash_dropping_blanks() {
        let csv = export(&entry(), LineEnding::Lf);
        assert!(csv.contains("その他/友人・先輩に勧められたから"));
    }

    #[test]
    fn crlf_line_endings() {
        let csv = export(&entry(), LineEnding::Crlf);
        assert_eq!(csv.matches("\r\n").count(), 2);
        assert!(csv.ends_with("\r\n"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut e = entry();
        e.motivation = "起業,開発".into();
        let csv = export(&e, LineEnding::Lf);
        assert!(csv.contains("\"起業,開発\""));
    }

    #[test]
    fn invalid_birthday_fails_export() {
        let mut e = entry();
        e.birth_day = "31".into(); // 1995-02-31
        let err = export_entry(&e, submitted_at(), &CsvOptions { line_ending: LineEnding::Crlf });
        assert!(matches!(err, Err(CoreError::Invalid(_))));
    }
}
