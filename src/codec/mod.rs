//! Custom field values: raw form input to the GraphQL input shape for its field type.
//!
//! Coercion is best effort and never fails an operation. Input that has no
//! valid representation for its type (a non-numeric NUMBER, a LOCATION that is
//! not two numbers, an empty selection) is [`Encoded::Skipped`] with a reason.
//! Input the API can still store as text (an unrecognized CURRENCY or COUNTRY)
//! degrades to [`CustomFieldValue::Text`].

pub mod parse;

use serde::Serialize;

use crate::graphql::literal::Literal;
use crate::model::CustomFieldType;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomFieldValue {
    Text { text: String },
    Number { number: f64 },
    Checked { checked: bool },
    Options { ids: Vec<String> },
    DateRange { start: String, end: String },
    Location { latitude: f64, longitude: f64 },
    Currency { amount: f64, code: Option<String> },
    Country { code: String, name: String },
}

impl CustomFieldValue {
    fn text(s: impl Into<String>) -> Self {
        CustomFieldValue::Text { text: s.into() }
    }

    /// The `setTodoCustomField` input fields carrying this value.
    pub fn input_fields(&self) -> Vec<(&'static str, Literal)> {
        match self {
            CustomFieldValue::Text { text } => vec![("text", Literal::string(text.as_str()))],
            CustomFieldValue::Number { number } => vec![("number", Literal::Float(*number))],
            CustomFieldValue::Checked { checked } => vec![("checked", Literal::Boolean(*checked))],
            CustomFieldValue::Options { ids } => {
                vec![("customFieldOptionIds", Literal::strings(ids.iter().cloned()))]
            }
            CustomFieldValue::DateRange { start, end } => vec![
                ("startDate", Literal::string(start.as_str())),
                ("endDate", Literal::string(end.as_str())),
            ],
            CustomFieldValue::Location {
                latitude,
                longitude,
            } => vec![
                ("latitude", Literal::Float(*latitude)),
                ("longitude", Literal::Float(*longitude)),
            ],
            CustomFieldValue::Currency { amount, code } => {
                let mut fields = vec![("number", Literal::Float(*amount))];
                if let Some(code) = code {
                    fields.push(("currency", Literal::string(code.as_str())));
                }
                fields
            }
            CustomFieldValue::Country { code, name } => vec![
                ("countryCodes", Literal::strings([code.as_str()])),
                ("text", Literal::string(name.as_str())),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Value(CustomFieldValue),
    /// Nothing should be sent for this field.
    Skipped(String),
}

impl Encoded {
    pub fn value(self) -> Option<CustomFieldValue> {
        match self {
            Encoded::Value(v) => Some(v),
            Encoded::Skipped(_) => None,
        }
    }
}

const CHECKED_WORDS: &[&str] = &["true", "1", "checked"];

pub fn encode(field_type: CustomFieldType, raw: &str) -> Encoded {
    use CustomFieldType::*;

    if raw.trim().is_empty() {
        return Encoded::Skipped("no value given".into());
    }

    match field_type {
        TextSingle | TextMulti | Phone | Email | Url => Encoded::Value(CustomFieldValue::text(raw)),
        Number | StarRating => encode_number(raw, raw),
        Percent => encode_number(raw, raw.trim().trim_end_matches('%')),
        Checkbox => {
            let checked = CHECKED_WORDS
                .iter()
                .any(|w| w.eq_ignore_ascii_case(raw.trim()));
            Encoded::Value(CustomFieldValue::Checked { checked })
        }
        SelectSingle => Encoded::Value(CustomFieldValue::Options {
            ids: vec![raw.trim().to_string()],
        }),
        SelectMulti => {
            let ids: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
            if ids.is_empty() {
                return Encoded::Skipped(format!("no option ids in \"{raw}\""));
            }
            Encoded::Value(CustomFieldValue::Options { ids })
        }
        Date => encode_date(raw),
        Location => encode_location(raw),
        Currency => match parse::currency(raw) {
            Some((amount, code)) => Encoded::Value(CustomFieldValue::Currency { amount, code }),
            None => Encoded::Value(CustomFieldValue::text(raw.trim())),
        },
        Country => match parse::country(raw) {
            Some((code, name)) => Encoded::Value(CustomFieldValue::Country { code, name }),
            None => Encoded::Value(CustomFieldValue::text(raw.trim())),
        },
    }
}

fn encode_number(raw: &str, digits: &str) -> Encoded {
    match parse::number(digits) {
        Some(number) => Encoded::Value(CustomFieldValue::Number { number }),
        None => Encoded::Skipped(format!("\"{raw}\" is not a number")),
    }
}

fn encode_date(raw: &str) -> Encoded {
    let parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [single] => Encoded::Value(CustomFieldValue::text(parse::normalize_date(single))),
        [start, end] => Encoded::Value(CustomFieldValue::DateRange {
            start: parse::normalize_date(start),
            end: parse::normalize_date(end),
        }),
        _ => Encoded::Skipped(format!("\"{raw}\" is not a date or a start,end pair")),
    }
}

fn encode_location(raw: &str) -> Encoded {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if let [lat, lng] = parts.as_slice() {
        if let (Some(latitude), Some(longitude)) = (parse::number(lat), parse::number(lng)) {
            return Encoded::Value(CustomFieldValue::Location {
                latitude,
                longitude,
            });
        }
    }
    Encoded::Skipped(format!("\"{raw}\" is not a latitude,longitude pair"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::Arguments;
    use CustomFieldType::*;

    fn render(field_type: CustomFieldType, raw: &str) -> String {
        let value = encode(field_type, raw).value().expect("value expected");
        let mut args = Arguments::new();
        args.extend(value.input_fields());
        args.to_string()
    }

    #[test]
    fn text_types_pass_through_escaped() {
        for t in [TextSingle, TextMulti, Phone, Email, Url] {
            assert_eq!(render(t, "a \"b\"\nc"), r#"text: "a \"b\"\nc""#);
        }
    }

    #[test]
    fn numbers_render_as_numbers() {
        assert_eq!(render(Number, "42"), "number: 42");
        assert_eq!(render(StarRating, "4"), "number: 4");
        assert_eq!(render(Percent, "75%"), "number: 75");
        assert_eq!(render(Number, " -1.25 "), "number: -1.25");
    }

    #[test]
    fn malformed_number_is_skipped() {
        assert!(matches!(encode(Number, "forty"), Encoded::Skipped(_)));
        assert!(matches!(encode(Percent, "%"), Encoded::Skipped(_)));
    }

    #[test]
    fn checkbox_truthy_words() {
        for raw in ["true", "1", "checked", "TRUE", "Checked"] {
            assert_eq!(render(Checkbox, raw), "checked: true", "{raw}");
        }
        for raw in ["false", "0", "no", "yes"] {
            assert_eq!(render(Checkbox, raw), "checked: false", "{raw}");
        }
    }

    #[test]
    fn select_single_wraps_one_id() {
        assert_eq!(render(SelectSingle, " opt_1 "), r#"customFieldOptionIds: ["opt_1"]"#);
    }

    #[test]
    fn select_multi_keeps_order_and_drops_empties() {
        let value = encode(SelectMulti, "a, b,,c ").value().unwrap();
        assert_eq!(
            value,
            CustomFieldValue::Options {
                ids: vec!["a".into(), "b".into(), "c".into()]
            }
        );
        assert_eq!(render(SelectMulti, "a,b,c"), r#"customFieldOptionIds: ["a", "b", "c"]"#);
    }

    #[test]
    fn select_multi_of_only_commas_is_skipped() {
        assert!(matches!(encode(SelectMulti, " , ,"), Encoded::Skipped(_)));
    }

    #[test]
    fn single_date_is_normalized_text() {
        assert_eq!(render(Date, "2023-12-31"), r#"text: "2023-12-31T00:00:00.000Z""#);
    }

    #[test]
    fn date_pair_becomes_range() {
        assert_eq!(
            render(Date, "2023-12-01, 2023-12-31"),
            r#"startDate: "2023-12-01T00:00:00.000Z", endDate: "2023-12-31T00:00:00.000Z""#
        );
    }

    #[test]
    fn unparseable_date_part_passes_through() {
        assert_eq!(
            render(Date, "2023-12-01,someday"),
            r#"startDate: "2023-12-01T00:00:00.000Z", endDate: "someday""#
        );
    }

    #[test]
    fn too_many_date_parts_is_skipped() {
        assert!(matches!(encode(Date, "2023-01-01,2023-02-01,2023-03-01"), Encoded::Skipped(_)));
    }

    #[test]
    fn location_pair() {
        assert_eq!(
            render(Location, "37.7749,-122.4194"),
            "latitude: 37.7749, longitude: -122.4194"
        );
    }

    #[test]
    fn malformed_location_is_skipped() {
        assert!(matches!(encode(Location, "abc,def"), Encoded::Skipped(_)));
        assert!(matches!(encode(Location, "37.7"), Encoded::Skipped(_)));
        assert!(matches!(encode(Location, "1,2,3"), Encoded::Skipped(_)));
    }

    #[test]
    fn currency_with_code_either_side() {
        assert_eq!(render(Currency, "100 USD"), r#"number: 100, currency: "USD""#);
        assert_eq!(render(Currency, "USD100"), r#"number: 100, currency: "USD""#);
        assert_eq!(render(Currency, "250"), "number: 250");
    }

    #[test]
    fn unrecognized_currency_degrades_to_text() {
        assert_eq!(render(Currency, "about $5"), r#"text: "about $5""#);
    }

    #[test]
    fn country_code_and_name() {
        assert_eq!(
            render(Country, "United Kingdom,gb"),
            r#"countryCodes: ["GB"], text: "United Kingdom""#
        );
        assert_eq!(render(Country, "JP"), r#"countryCodes: ["JP"], text: "JP""#);
    }

    #[test]
    fn unrecognized_country_degrades_to_text() {
        assert_eq!(render(Country, "Atlantis"), r#"text: "Atlantis""#);
    }

    #[test]
    fn blank_input_is_skipped_for_every_type() {
        for t in CustomFieldType::ALL {
            assert!(matches!(encode(t, "   "), Encoded::Skipped(_)), "{t}");
        }
    }
}
