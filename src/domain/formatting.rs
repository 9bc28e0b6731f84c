/// Capitalize every word of a title, preserving apostrophes and hyphens.
///
/// Examples: "harry potter and the sorcerer's stone" becomes
/// "Harry Potter And The Sorcerer's Stone", "twenty-three" becomes "Twenty-Three".
/// Whitespace runs collapse to a single space.
pub fn capitalize_words(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalize_segment)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first ASCII letter of a segment and lower-case what follows it.
/// Leading non-letters (quotes, digits) are kept as-is.
fn capitalize_segment(segment: &str) -> String {
    let Some(idx) = segment.find(|c: char| c.is_ascii_alphabetic()) else {
        return segment.to_string();
    };

    let (prefix, rest) = segment.split_at(idx);
    let mut chars = rest.chars();
    let first = chars.next().map(|c| c.to_ascii_uppercase());

    let mut out = String::with_capacity(segment.len());
    out.push_str(prefix);
    out.extend(first);
    out.push_str(&chars.as_str().to_lowercase());
    out
}
