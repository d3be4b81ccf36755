//! Display text helpers.

/// Length of description and extract text.
pub const DESCRIPTION_LENGTH: usize = 320;
/// Length of carousel titles.
pub const TITLE_LENGTH: usize = 80;

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max` characters, marking cuts with `...`.
pub fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }

    if max < ELLIPSIS.len() {
        return text.chars().take(max).collect();
    }

    let mut shortened: String = text.chars().take(max - ELLIPSIS.len()).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}

/// Strip tags, decode entities, and trim.
pub fn clean_html(html: &str) -> String {
    decode_entities(&strip_tags(html)).trim().to_owned()
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut quote: Option<char> = None;

    for ch in html.chars() {
        if in_tag {
            match (quote, ch) {
                (Some(open), _) if ch == open => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '>') => in_tag = false,
                _ => {}
            }
        } else if ch == '<' {
            in_tag = true;
        } else {
            text.push(ch);
        }
    }

    text
}

fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];

        let entity = rest
            .char_indices()
            .take(12)
            .find(|(_, ch)| *ch == ';')
            .and_then(|(end, _)| decode_entity(&rest[1..end]).map(|ch| (ch, end)));

        match entity {
            Some((ch, end)) => {
                decoded.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "pound" => '\u{a3}',
        "euro" => '\u{20ac}',
        "copy" => '\u{a9}',
        "eacute" => '\u{e9}',
        _ => return None,
    };
    Some(ch)
}
