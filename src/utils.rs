use crate::record::Date;
use crate::regex::Regex;
use std::sync::LazyLock;

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:[-/](\d{1,2})?(?:[-/](\d{1,2})?)?)?(?:[-/ ].*)?$").unwrap()
});

/// Expands abbreviated page ranges, e.g. `1234-45` becomes `1234-1245`.
///
/// Ranges with mismatched prefixes or non numeric parts are returned as-is.
pub fn format_page_numbers(page_range: &str) -> String {
    let Some((from, to)) = page_range.split_once('-') else {
        return page_range.to_string();
    };
    if to.contains('-') {
        return page_range.to_string();
    }

    let (from_prefix, from_num) = split_prefix_and_number(from);
    let (to_prefix, to_num) = split_prefix_and_number(to);

    if from_prefix != to_prefix && !from_prefix.is_empty() && !to_prefix.is_empty() {
        return page_range.to_string();
    }
    let (Some(from_num), Some(to_num)) = (from_num, to_num) else {
        return page_range.to_string();
    };

    let completed_to = if to_num.len() < from_num.len() {
        format!("{}{}", &from_num[..from_num.len() - to_num.len()], to_num)
    } else {
        to_num.to_string()
    };

    if from_num == completed_to {
        return format!("{}{}", from_prefix, from_num);
    }

    format!("{}{}-{}{}", from_prefix, from_num, from_prefix, completed_to)
}

/// Splits `R575` into (`R`, `575`). The number is `None` unless the rest is all digits.
fn split_prefix_and_number(input: &str) -> (&str, Option<&str>) {
    match input.find(|c: char| c.is_ascii_digit()) {
        Some(index) => {
            let number = &input[index..];
            if number.chars().all(|c| c.is_ascii_digit()) {
                (&input[..index], Some(number))
            } else {
                (&input[..index], None)
            }
        }
        None => (input, None),
    }
}

/// Normalizes a DOI by removing URL prefixes, `doi:` markers and whitespace.
///
/// Returns `None` when the input does not contain a DOI.
pub fn format_doi(doi_str: &str) -> Option<String> {
    let doi = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .replace(|c: char| c.is_whitespace(), "")
        .to_lowercase();

    // Everything before the registrant prefix is a resolver URL or marker.
    let pos = doi.find("10.")?;
    Some(doi[pos..].to_string())
}

/// Parses `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and RIS style `YYYY/MM/DD/other` dates.
///
/// Out of range months or days are dropped rather than rejected.
pub fn parse_date(input: &str) -> Option<Date> {
    let captures = DATE_REGEX.captures(input.trim())?;
    let year = captures.get(1)?.as_str().parse::<i32>().ok()?;
    let month = captures
        .get(2)
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .filter(|m| (1..=12).contains(m));
    let day = month.and_then(|_| {
        captures
            .get(3)
            .and_then(|d| d.as_str().parse::<u8>().ok())
            .filter(|d| (1..=31).contains(d))
    });
    Some(Date { year, month, day })
}

/// Splits a personal name into (family, given).
///
/// Handles "Family, Given" as well as "Family Given" forms.
pub fn parse_author_name(name: &str) -> (String, String) {
    if let Some((family, given)) = name.split_once(',') {
        return (family.trim().to_string(), given.trim().to_string());
    }
    let mut parts = name.split_whitespace();
    let family = parts.next().unwrap_or_default().to_string();
    let given = parts.collect::<Vec<_>>().join(" ");
    (family, given)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1234-45", "1234-1245")]
    #[case("1234", "1234")]
    #[case("123-456", "123-456")]
    #[case("R575-82", "R575-R582")]
    #[case("12-345", "12-345")]
    #[case("A94-A95", "A94-A95")]
    #[case("01-Apr", "01-Apr")]
    #[case("101-101", "101")]
    #[case("e071674", "e071674")]
    fn test_format_page_numbers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_page_numbers(input), expected);
    }

    #[rstest]
    #[case("10.1000/test", Some("10.1000/test"))]
    #[case("10.1000/test [doi]", Some("10.1000/test"))]
    #[case("https://doi.org/10.1000/TEST", Some("10.1000/test"))]
    #[case("http://dx.doi.org/10.1000/test", Some("10.1000/test"))]
    #[case("doi: 10.1000/test", Some("10.1000/test"))]
    #[case("https://doi.org/10.1000/v10.2", Some("10.1000/v10.2"))]
    #[case("", None)]
    #[case("invalid", None)]
    fn test_format_doi(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(format_doi(input).as_deref(), expected);
    }

    #[rstest]
    #[case("2023", Some((2023, None, None)))]
    #[case("2023-04", Some((2023, Some(4), None)))]
    #[case("2023-04-09", Some((2023, Some(4), Some(9))))]
    #[case("2023/12/25/Christmas edition", Some((2023, Some(12), Some(25))))]
    #[case("1998///", Some((1998, None, None)))]
    #[case("2023-13-01", Some((2023, None, None)))]
    #[case("Spring 2023", None)]
    #[case("", None)]
    fn test_parse_date(
        #[case] input: &str,
        #[case] expected: Option<(i32, Option<u8>, Option<u8>)>,
    ) {
        let parsed = parse_date(input).map(|d| (d.year, d.month, d.day));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_author_name() {
        assert_eq!(
            parse_author_name("Smith, John"),
            ("Smith".to_string(), "John".to_string())
        );
        assert_eq!(
            parse_author_name("Duan JJ"),
            ("Duan".to_string(), "JJ".to_string())
        );
        assert_eq!(
            parse_author_name("Smith-Jones, John-Paul"),
            ("Smith-Jones".to_string(), "John-Paul".to_string())
        );
        assert_eq!(parse_author_name("Smith"), ("Smith".to_string(), String::new()));
        assert_eq!(parse_author_name(""), (String::new(), String::new()));
    }
}
