//! Grammar productions of the value notation
//!
//! Scalar productions are a recognizer (`is_*`) that tests whether a whole
//! literal matches it, paired with a constructor (`parse_*`) that builds the
//! value from a literal the recognizer accepted. There is no tokenizer:
//! composites find their comma split points by asking which prefixes are
//! complete elements, see [`Grammar`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use valnote_core::Value;

use crate::error::{DecodeError, DecodeResult};

fn malformed(data: &str) -> DecodeError {
    DecodeError::MalformedLiteral(data.to_string())
}

pub(crate) fn is_null(data: &str) -> bool {
    data == "null"
}

pub(crate) fn is_boolean(data: &str) -> bool {
    matches!(data, "true" | "false")
}

pub(crate) fn parse_boolean(data: &str) -> bool {
    data == "true"
}

/// Exactly three characters bounded by `'`. The middle one is taken as-is.
pub(crate) fn is_character(data: &str) -> bool {
    let mut chars = data.chars();
    matches!(
        (chars.next(), chars.next(), chars.next(), chars.next()),
        (Some('\''), Some(_), Some('\''), None)
    )
}

pub(crate) fn parse_character(data: &str) -> DecodeResult<char> {
    data.chars().nth(1).ok_or_else(|| malformed(data))
}

pub(crate) fn is_integer(data: &str) -> bool {
    let digits = data.strip_prefix(|c| c == '+' || c == '-').unwrap_or(data);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn parse_integer(data: &str) -> DecodeResult<i64> {
    data.parse().map_err(|_| malformed(data))
}

/// An integer, or two integer literals joined by the first `.`.
///
/// The fractional side is checked with the integer recognizer, so a sign is
/// accepted there (`1.-2`); the decimal parser then rejects such literals.
pub(crate) fn is_float(data: &str) -> bool {
    if is_integer(data) {
        return true;
    }
    match data.split_once('.') {
        Some((whole, fraction)) => is_integer(whole) && is_integer(fraction),
        None => false,
    }
}

pub(crate) fn parse_float(data: &str) -> DecodeResult<f64> {
    data.parse().map_err(|_| malformed(data))
}

/// Bounded by `"`, with every inner `"` escaped by an odd run of
/// backslashes and an even run before the closing quote.
pub(crate) fn is_string(data: &str) -> bool {
    let bytes = data.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return false;
    }

    let mut backslashes = 0usize;
    for &b in &bytes[1..bytes.len() - 1] {
        if b == b'\\' {
            backslashes += 1;
            continue;
        }
        if b == b'"' && backslashes % 2 == 0 {
            return false;
        }
        backslashes = 0;
    }
    backslashes % 2 == 0
}

/// Strips the quotes and the backslash in front of each inner `"`.
/// Any other backslash is kept.
pub(crate) fn parse_string(data: &str) -> String {
    let inner = &data[1..data.len() - 1];
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'"') {
            continue;
        }
        value.push(c);
    }
    value
}

pub(crate) fn is_identifier(data: &str) -> bool {
    let mut chars = data.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

pub(crate) fn is_namespace(data: &str) -> bool {
    is_identifier(data)
}

/// `name` or `namespace::name`
pub(crate) fn is_variable(data: &str) -> bool {
    match data.split_once("::") {
        Some((namespace, name)) => is_namespace(namespace) && is_identifier(name),
        None => is_identifier(data),
    }
}

/// Split a comma-separated interior into its top-level elements.
///
/// `element` recognizes and builds one element, returning `None` when the
/// text is not an element. The first comma whose prefix is an element and
/// whose suffix is again a valid list wins; failing every comma, the whole
/// interior has to be a single element. An empty interior is a list of zero
/// elements. Returns `None` if no split makes every element valid.
pub(crate) fn split_list<'a, T>(
    data: &'a str,
    mut element: impl FnMut(&'a str) -> Option<T>,
) -> Option<Vec<T>> {
    let mut elements: Vec<T> = Vec::new();
    // (element start, comma ending it) for every element accepted so far
    let mut splits: Vec<(usize, usize)> = Vec::new();
    // Starts from which the rest of the interior is known not to be a list
    let mut dead_ends: HashSet<usize> = HashSet::new();
    let mut start = 0;
    let mut from = 0;

    loop {
        let rest = &data[start..];
        if rest.is_empty() {
            return Some(elements);
        }

        let mut accepted = None;
        for (i, _) in data[from..].match_indices(',') {
            let comma = from + i;
            if dead_ends.contains(&(comma + 1)) {
                continue;
            }
            if let Some(item) = element(&data[start..comma]) {
                accepted = Some((comma, item));
                break;
            }
        }

        match accepted {
            Some((comma, item)) => {
                elements.push(item);
                splits.push((start, comma));
                start = comma + 1;
                from = start;
            }
            None => {
                if let Some(item) = element(rest) {
                    elements.push(item);
                    return Some(elements);
                }
                // Backtrack: retry the previous element with a later comma.
                dead_ends.insert(start);
                let (prev_start, prev_comma) = splits.pop()?;
                elements.pop();
                start = prev_start;
                from = prev_comma + 1;
            }
        }
    }
}

fn interior(data: &str, open: char, close: char) -> Option<&str> {
    data.strip_prefix(open)?.strip_suffix(close)
}

/// Scalar productions in precedence order: null, boolean, character,
/// integer, float, string
fn parse_scalar(data: &str) -> Option<DecodeResult<Value>> {
    let value = if is_null(data) {
        Ok(Value::Null)
    } else if is_boolean(data) {
        Ok(Value::Bool(parse_boolean(data)))
    } else if is_character(data) {
        parse_character(data).map(Value::Char)
    } else if is_integer(data) {
        parse_integer(data).map(Value::Integer)
    } else if is_float(data) {
        parse_float(data).and_then(|f| Value::float(f).map_err(|_| malformed(data)))
    } else if is_string(data) {
        Ok(Value::String(parse_string(data)))
    } else {
        return None;
    };
    Some(value)
}

/// Maximum nesting of composites inside one literal
pub(crate) const MAX_DEPTH: usize = 128;

/// A production's outcome: `None` if the text does not match it, otherwise
/// the value built from it
type Parsed<T> = Option<DecodeResult<T>>;

/// Composite productions over one literal.
///
/// Recognition and construction are a single pass: each production returns
/// the value it built, or `None` if the text does not match. Results for
/// values and tuples are remembered per span of the literal, so trying a
/// dictionary and then a tuple on the same text never repeats the work
/// below it.
pub(crate) struct Grammar<'a> {
    source: &'a str,
    depth: usize,
    too_deep: bool,
    values: HashMap<(usize, usize), Parsed<Value>>,
    tuples: HashMap<(usize, usize), Parsed<(Value, Value)>>,
}

impl<'a> Grammar<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            depth: 0,
            too_deep: false,
            values: HashMap::new(),
            tuples: HashMap::new(),
        }
    }

    /// Whether the literal nests deeper than [`MAX_DEPTH`]. Once set, every
    /// production fails.
    pub(crate) fn too_deep(&self) -> bool {
        self.too_deep
    }

    /// Span of `data` within the literal. `data` is always a subslice of it.
    fn span(&self, data: &str) -> (usize, usize) {
        let start = data.as_ptr() as usize - self.source.as_ptr() as usize;
        (start, start + data.len())
    }

    /// Top-level production chain: the scalars, then vector, set,
    /// dictionary and tuple. Symbols are not part of it.
    pub(crate) fn literal(&mut self, data: &'a str) -> Parsed<Value> {
        if let Some(scalar) = parse_scalar(data) {
            return Some(scalar);
        }
        if let Some(items) = self.vector(data) {
            return Some(items.map(Value::Vector));
        }
        if let Some(items) = self.set(data) {
            return Some(items.map(Value::Set));
        }
        if let Some(map) = self.dictionary(data) {
            return Some(map.map(Value::Dictionary));
        }
        self.tuple(data)
            .map(|pair| pair.map(|(first, second)| Value::Tuple(Box::new(first), Box::new(second))))
    }

    /// Element of a vector, set or tuple: a literal, or else a variable
    pub(crate) fn value(&mut self, data: &'a str) -> Parsed<Value> {
        let span = self.span(data);
        if let Some(known) = self.values.get(&span) {
            return known.clone();
        }

        let parsed = self
            .literal(data)
            .or_else(|| is_variable(data).then(|| Ok(Value::Symbol(data.to_string()))));
        self.values.insert(span, parsed.clone());
        parsed
    }

    /// Run a production one nesting level down
    fn nested<T>(&mut self, production: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.too_deep {
            return None;
        }
        if self.depth == MAX_DEPTH {
            self.too_deep = true;
            return None;
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    /// Elements of a value-list, each already built
    fn value_list(&mut self, inner: &'a str) -> Option<Vec<DecodeResult<Value>>> {
        self.nested(|grammar| split_list(inner, |element| grammar.value(element)))
    }

    pub(crate) fn vector(&mut self, data: &'a str) -> Parsed<Vec<Value>> {
        let inner = interior(data, '[', ']')?;
        let items = self.value_list(inner)?;
        Some(items.into_iter().collect())
    }

    pub(crate) fn set(&mut self, data: &'a str) -> Parsed<BTreeSet<Value>> {
        let inner = interior(data, '{', '}')?;
        let items = self.value_list(inner)?;
        Some(items.into_iter().collect())
    }

    /// `(` exactly two values `)`
    pub(crate) fn tuple(&mut self, data: &'a str) -> Parsed<(Value, Value)> {
        let span = self.span(data);
        if let Some(known) = self.tuples.get(&span) {
            return known.clone();
        }

        let parsed = interior(data, '(', ')')
            .and_then(|inner| self.value_list(inner))
            .and_then(|items| <[DecodeResult<Value>; 2]>::try_from(items).ok())
            .map(|[first, second]| first.and_then(|first| second.map(|second| (first, second))));
        self.tuples.insert(span, parsed.clone());
        parsed
    }

    /// `(` comma-separated tuples `)`. Bare values are never dictionary
    /// entries; later entries overwrite earlier ones with an equal key.
    pub(crate) fn dictionary(&mut self, data: &'a str) -> Parsed<BTreeMap<Value, Value>> {
        let inner = interior(data, '(', ')')?;
        let entries = self.nested(|grammar| split_list(inner, |entry| grammar.tuple(entry)))?;

        let mut map = BTreeMap::new();
        for entry in entries {
            let (key, value) = match entry {
                Ok(pair) => pair,
                Err(e) => return Some(Err(e)),
            };
            map.insert(key, value);
        }
        Some(Ok(map))
    }
}

/// Try the literal productions in precedence order.
///
/// Returns `None` when no production recognizes the literal. A literal
/// nested deeper than [`MAX_DEPTH`] is malformed.
pub(crate) fn parse_literal(data: &str) -> Parsed<Value> {
    let mut grammar = Grammar::new(data);
    let parsed = grammar.literal(data);
    if grammar.too_deep() {
        return Some(Err(malformed(data)));
    }
    parsed
}
