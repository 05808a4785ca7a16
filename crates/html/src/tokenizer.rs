//! Lenient HTML tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`, first character alphabetic.
//! Attribute names additionally accept any byte that is not whitespace, `=`, `>`, `/` or a quote.
//!
//! This is not the HTML5 state machine. It never fails: input it cannot classify as markup is
//! kept as text, and unknown `<!…>`/`<?…>` constructs are kept verbatim as raw tokens so they
//! survive a load/save round trip.
//!
//! `script`/`style` bodies are raw text. `title`/`textarea` bodies are escapable raw text:
//! no markup inside, but references are decoded.
use crate::entities::{RefContext, decode_entities};
use crate::types::{AtomId, AtomTable, Token, TokenStream};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";
const CDATA_START: &[u8] = b"<![CDATA[";
const CDATA_END: &str = "]]>";

// it only attempts matches starting at ASCII <
// < cannot appear in UTF-8 continuation bytes
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";
const TITLE_CLOSE_TAG: &[u8] = b"</title";
const TEXTAREA_CLOSE_TAG: &[u8] = b"</textarea";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_tag_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn is_attr_name_byte(c: u8) -> bool {
    !c.is_ascii_whitespace() && !matches!(c, b'=' | b'>' | b'/' | b'"' | b'\'')
}

/// Whether the `<` at `i` opens markup. Anything else is literal text, the way browsers
/// treat `a < b` or `<3`.
fn opens_markup(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i + 1).copied() {
        Some(b'!') | Some(b'?') => true,
        Some(b'/') => bytes.get(i + 2).is_some_and(|b| b.is_ascii_alphabetic()),
        Some(b) => b.is_ascii_alphabetic(),
        None => false,
    }
}

fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let hay_bytes = haystack.as_bytes();
    let len = hay_bytes.len();
    let n = close_tag.len();
    debug_assert!(close_tag.starts_with(b"</"));
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &hay_bytes[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if starts_with_ignore_ascii_case_at(hay_bytes, i, close_tag) {
            let mut k = i + n;
            // Only ASCII whitespace is accepted before `>`; `</scriptx>` stays rawtext.
            while k < len && hay_bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay_bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub(crate) fn is_rawtext_element(name: &str) -> bool {
    name == "script" || name == "style"
}

pub(crate) fn is_rcdata_element(name: &str) -> bool {
    name == "title" || name == "textarea"
}

fn close_tag_for(name: &str) -> Option<&'static [u8]> {
    match name {
        "script" => Some(SCRIPT_CLOSE_TAG),
        "style" => Some(STYLE_CLOSE_TAG),
        "title" => Some(TITLE_CLOSE_TAG),
        "textarea" => Some(TEXTAREA_CLOSE_TAG),
        _ => None,
    }
}

/// Tokenizes into a token stream with interned tag/attribute names to reduce allocations.
pub fn tokenize(input: &str) -> TokenStream {
    let mut out = Vec::new();
    let mut atoms = AtomTable::new();
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    // Invariant: we scan by byte, but any slice endpoints must be UTF-8 char boundaries.
    // Slices are only cut at ASCII structural bytes, so endpoints stay on boundaries.
    while i < len {
        if bytes[i] != b'<' || !opens_markup(bytes, i) {
            let start = i;
            i += 1;
            while i < len {
                match memchr(b'<', &bytes[i..]) {
                    Some(rel) => {
                        i += rel;
                        if opens_markup(bytes, i) {
                            break;
                        }
                        i += 1;
                    }
                    None => i = len,
                }
            }
            let decoded = decode_entities(&input[start..i], RefContext::Text);
            if !decoded.is_empty() {
                out.push(Token::Text(decoded));
            }
            continue;
        }

        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            match input[body_start..].find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + HTML_COMMENT_END.len();
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    i = len;
                }
            }
            continue;
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let end = rest.find('>').unwrap_or(rest.len());
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i = (i + 2 + end + 1).min(len);
            continue;
        }

        if bytes[i + 1] == b'!' || bytes[i + 1] == b'?' {
            let end = if bytes[i..].starts_with(CDATA_START) {
                input[i..].find(CDATA_END).map(|e| i + e + CDATA_END.len())
            } else {
                memchr(b'>', &bytes[i..]).map(|e| i + e + 1)
            }
            .unwrap_or(len);
            out.push(Token::Raw(input[i..end].to_string()));
            i = end;
            continue;
        }

        if bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < len && is_tag_name_byte(bytes[j]) {
                j += 1;
            }
            let name = atoms.intern_ascii_lowercase(&input[start..j]);
            j = memchr(b'>', &bytes[j..]).map(|e| j + e + 1).unwrap_or(len);
            out.push(Token::EndTag(name));
            i = j;
            continue;
        }

        let (tag, after_tag) = read_start_tag(input, i + 1, &mut atoms);
        let (name, self_closing) = (tag.name, tag.self_closing);
        out.push(Token::StartTag {
            name: tag.name,
            attributes: tag.attributes,
            self_closing: tag.self_closing,
        });
        i = after_tag;

        let name_str = atoms.resolve(name);
        let close_tag = if self_closing {
            None
        } else {
            close_tag_for(name_str)
        };
        if let Some(close_tag) = close_tag {
            // Raw text is kept byte for byte; escapable raw text only has its references decoded.
            let (body_end, resume) = match find_rawtext_close_tag(&input[i..], close_tag) {
                Some((rel_start, rel_end)) => (i + rel_start, i + rel_end),
                None => {
                    log::trace!(target: "html.tokenizer", "unterminated <{name_str}> runs to end of input");
                    (len, len)
                }
            };
            let raw = &input[i..body_end];
            if !raw.is_empty() {
                let body = if is_rcdata_element(name_str) {
                    decode_entities(raw, RefContext::Text)
                } else {
                    raw.to_string()
                };
                out.push(Token::Text(body));
            }
            out.push(Token::EndTag(name));
            i = resume;
        }
    }
    log::trace!(target: "html.tokenizer", "tokenized {} bytes into {} tokens", len, out.len());
    TokenStream::new(out, atoms)
}

struct StartTag {
    name: AtomId,
    attributes: Vec<(AtomId, Option<String>)>,
    self_closing: bool,
}

/// Reads a start tag whose name begins at `start` (just past `<`).
/// Returns the tag and the index just past the closing `>`.
fn read_start_tag(input: &str, start: usize, atoms: &mut AtomTable) -> (StartTag, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut k = start;
    while k < len && is_tag_name_byte(bytes[k]) {
        k += 1;
    }
    let name = atoms.intern_ascii_lowercase(&input[start..k]);
    let mut attributes: Vec<(AtomId, Option<String>)> = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let name_start = k;
        while k < len && is_attr_name_byte(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            // Stray quote or `=`; skip it rather than looping forever.
            k += 1;
            continue;
        }
        let attribute_name = atoms.intern_ascii_lowercase(&input[name_start..k]);

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let vstart = k;
                k = memchr(quote, &bytes[k..]).map(|e| k + e).unwrap_or(len);
                let raw = &input[vstart..k];
                if k < len {
                    k += 1;
                }
                Some(decode_entities(raw, RefContext::Attribute))
            } else {
                // A `/` belongs to an unquoted value: `href=/docs/>` is `/docs/`.
                let vstart = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    k += 1;
                }
                Some(decode_entities(&input[vstart..k], RefContext::Attribute))
            }
        } else {
            None
        };
        attributes.push((attribute_name, value));
    }

    if is_void_element(atoms.resolve(name)) {
        self_closing = true;
    }

    (
        StartTag {
            name,
            attributes,
            self_closing,
        },
        k,
    )
}
