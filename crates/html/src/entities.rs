//! Entity decoding on the way in, minimal escaping on the way out.
//!
//! Decoding follows the HTML character-reference rules: the full named set (from
//! `html_escape::NAMED_ENTITIES`), the legacy names that may omit their semicolon, and
//! decimal/hex numeric references. Escaping only touches what must be escaped for the
//! markup to re-parse to the same tree.
use html_escape::NAMED_ENTITIES;

// The names a document may write without a trailing `;` (`&copy 2024`, `&amp co`).
const LEGACY_NAMES: &[&[u8]] = &[
    b"AElig", b"AMP", b"Aacute", b"Acirc", b"Agrave", b"Aring", b"Atilde", b"Auml", b"COPY",
    b"Ccedil", b"ETH", b"Eacute", b"Ecirc", b"Egrave", b"Euml", b"GT", b"Iacute", b"Icirc",
    b"Igrave", b"Iuml", b"LT", b"Ntilde", b"Oacute", b"Ocirc", b"Ograve", b"Oslash", b"Otilde",
    b"Ouml", b"QUOT", b"REG", b"THORN", b"Uacute", b"Ucirc", b"Ugrave", b"Uuml", b"Yacute",
    b"aacute", b"acirc", b"acute", b"aelig", b"agrave", b"amp", b"aring", b"atilde", b"auml",
    b"brvbar", b"ccedil", b"cedil", b"cent", b"copy", b"curren", b"deg", b"divide", b"eacute",
    b"ecirc", b"egrave", b"eth", b"euml", b"frac12", b"frac14", b"frac34", b"gt", b"iacute",
    b"icirc", b"iexcl", b"igrave", b"iquest", b"iuml", b"laquo", b"lt", b"macr", b"micro",
    b"middot", b"nbsp", b"not", b"ntilde", b"oacute", b"ocirc", b"ograve", b"ordf", b"ordm",
    b"oslash", b"otilde", b"ouml", b"para", b"plusmn", b"pound", b"quot", b"raquo", b"reg",
    b"sect", b"shy", b"sup1", b"sup2", b"sup3", b"szlig", b"thorn", b"times", b"uacute",
    b"ucirc", b"ugrave", b"uml", b"uuml", b"yacute", b"yen", b"yuml",
];
const MAX_LEGACY_LEN: usize = 6;
const MAX_NAME_LEN: usize = 32; // longest entry is 31 bytes

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Where a reference appears. Attribute values keep a legacy name followed by `=` or an
/// alphanumeric literal, so query strings like `?a=1&copy=2` are not rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefContext {
    Text,
    Attribute,
}

enum Decoded {
    Named(&'static str),
    Scalar(char),
}

/// Decode named and numeric character references.
///
/// - Named: any entry of the HTML named set followed by `;`, or a legacy name without it.
/// - Numeric: `&#123` and `&#x1F4A9`, semicolon optional, valid scalar values only.
/// - Anything else (unknown names, overlong digit runs, surrogates) is kept as-is.
pub(crate) fn decode_entities(s: &str, context: RefContext) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut copy_start = 0;

    while i < bytes.len() {
        let Some(rel) = memchr::memchr(b'&', &bytes[i..]) else {
            break;
        };
        i += rel;
        out.push_str(&s[copy_start..i]);

        match reference_at(bytes, i, context) {
            Some((Decoded::Named(value), len)) => {
                out.push_str(value);
                i += len;
            }
            Some((Decoded::Scalar(ch), len)) => {
                out.push(ch);
                i += len;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
        copy_start = i;
    }

    out.push_str(&s[copy_start..]);
    out
}

/// The reference starting at the `&` at `at`, with its length in bytes.
fn reference_at(bytes: &[u8], at: usize, context: RefContext) -> Option<(Decoded, usize)> {
    let start = at + 1;
    match bytes.get(start) {
        Some(b'#') => {
            numeric_reference(bytes, start + 1).map(|(ch, end)| (Decoded::Scalar(ch), end - at))
        }
        Some(b) if b.is_ascii_alphanumeric() => named_reference(bytes, start, context)
            .map(|(value, end)| (Decoded::Named(value), end - at)),
        _ => None,
    }
}

fn named_reference(
    bytes: &[u8],
    start: usize,
    context: RefContext,
) -> Option<(&'static str, usize)> {
    // Bounded scan to avoid quadratic behavior on adversarial input.
    let run = bytes[start..]
        .iter()
        .take(MAX_NAME_LEN)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    let name = &bytes[start..start + run];

    if bytes.get(start + run) == Some(&b';') {
        if let Some(value) = lookup(name) {
            return Some((value, start + run + 1));
        }
    }

    // Longest legacy prefix wins; `&notit;` reads as `¬` followed by `it;`.
    let legacy_len = (2..=run.min(MAX_LEGACY_LEN))
        .rev()
        .find(|&len| LEGACY_NAMES.contains(&&name[..len]))?;
    let end = start + legacy_len;
    if context == RefContext::Attribute {
        if let Some(&next) = bytes.get(end) {
            if next == b'=' || next.is_ascii_alphanumeric() {
                return None;
            }
        }
    }
    lookup(&name[..legacy_len]).map(|value| (value, end))
}

fn lookup(name: &[u8]) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(entry, _)| entry.cmp(&name))
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}

/// `start` is just past `&#`. Returns the character and the index past the reference.
fn numeric_reference(bytes: &[u8], start: usize) -> Option<(char, usize)> {
    let (digits_start, max_digits, radix) = match bytes.get(start) {
        Some(b'x') | Some(b'X') => (start + 1, MAX_HEX_DIGITS, 16),
        _ => (start, MAX_DEC_DIGITS, 10),
    };
    let digits = bytes[digits_start..]
        .iter()
        .take(max_digits + 1)
        .take_while(|&&b| (b as char).is_digit(radix))
        .count();
    if digits == 0 || digits > max_digits {
        return None;
    }
    let digits_end = digits_start + digits;
    let text = std::str::from_utf8(&bytes[digits_start..digits_end]).ok()?;
    let ch = u32::from_str_radix(text, radix).ok().and_then(char::from_u32)?;
    let end = if bytes.get(digits_end) == Some(&b';') {
        digits_end + 1
    } else {
        digits_end
    };
    Some((ch, end))
}

/// Escape a text node for output outside raw-text elements.
pub(crate) fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value for output inside double quotes.
pub(crate) fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
