// ABOUTME: Word splitting and casing used to present carrier-supplied names
// ABOUTME: Title case splits camel-case humps and non-alphanumeric runs into words
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Title-case `input`
///
/// Words are separated at runs of non-alphanumeric characters and at
/// camel-case boundaries (`fooBar`, `XMLHttp`). Each word is lower-cased and
/// its first letter upper-cased; words are joined with single spaces.
///
/// ```
/// use trackit_core::formatters::title_case;
///
/// assert_eq!(title_case("NEW YORK"), "New York");
/// assert_eq!(title_case("saint-louis"), "Saint Louis");
/// ```
#[must_use]
pub fn title_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| upper_case_first(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character and leave the rest untouched
#[must_use]
pub fn upper_case_first(input: &str) -> String {
    let mut chars = input.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_some_and(|p| {
                p.is_lowercase() || p.is_numeric() || (p.is_uppercase() && next_is_lower)
            });
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_upper_input() {
        assert_eq!(title_case("CHICAGO"), "Chicago");
        assert_eq!(title_case("NEW ZEALAND"), "New Zealand");
    }

    #[test]
    fn test_title_case_collapses_separators() {
        assert_eq!(title_case("  saint--louis  "), "Saint Louis");
        assert_eq!(title_case("ground_residential"), "Ground Residential");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case(" - "), "");
    }

    #[test]
    fn test_title_case_splits_camel_case() {
        assert_eq!(title_case("fooBar"), "Foo Bar");
        assert_eq!(title_case("XMLHttpRequest"), "Xml Http Request");
        assert_eq!(title_case("UPS GROUND"), "Ups Ground");
    }

    #[test]
    fn test_title_case_splits_after_digits() {
        assert_eq!(title_case("2ND DAY AIR"), "2 Nd Day Air");
        assert_eq!(title_case("NEXT DAY AIR SAVER"), "Next Day Air Saver");
    }

    #[test]
    fn test_upper_case_first() {
        assert_eq!(upper_case_first("delivered"), "Delivered");
        assert_eq!(upper_case_first("out for delivery"), "Out for delivery");
        assert_eq!(upper_case_first(""), "");
    }
}
