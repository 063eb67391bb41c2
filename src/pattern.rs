//! Shell pattern translation
//!
//! Include and exclude patterns follow shell `fnmatch` rules: `*` matches any
//! run of characters, `?` any single character and `[seq]` / `[!seq]` a
//! character class. Everything else is literal, including braces, commas,
//! `**`, a leading `^` inside a class and a `[` that is never closed.
//! [`to_glob`] rewrites such a pattern into the subset of glob syntax that
//! means the same thing.

/// Characters that change meaning at some position inside a glob class
const CLASS_SPECIALS: [char; 4] = [']', '-', '^', '!'];

/// Characters that must be quoted outside a class
const LITERAL_SPECIALS: [char; 7] = ['*', '?', '[', ']', '{', '}', ','];

/// Rewrite a shell pattern as an equivalent glob
///
/// Returns `None` for a pattern that can never match, such as one holding
/// the empty class `[z-a]`.
#[must_use]
pub fn to_glob(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                glob.push('*');
            },
            '?' => glob.push('?'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    Class::parse(&chars[i..end]).write(&mut glob)?;
                    i = end + 1;
                },
                None => push_literal(&mut glob, '['),
            },
            c => push_literal(&mut glob, c),
        }
    }

    Some(glob)
}

/// Index of the `]` closing a class whose body starts at `start`
///
/// A `]` right after the opening bracket (or after `[!`) belongs to the body.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j..].iter().position(|&c| c == ']').map(|p| j + p)
}

fn push_literal(glob: &mut String, c: char) {
    if LITERAL_SPECIALS.contains(&c) {
        glob.push('[');
        glob.push(c);
        glob.push(']');
    } else {
        glob.push(c);
    }
}

/// A parsed shell character class
#[derive(Debug, PartialEq, Eq)]
struct Class {
    negated: bool,
    /// Inclusive ranges, reversed ones already dropped
    ranges:  Vec<(char, char)>,
}

impl Class {
    /// Parse the text between the brackets
    fn parse(body: &[char]) -> Self {
        let (negated, body) = match body.split_first() {
            Some((&'!', rest)) => (true, rest),
            _ => (false, body),
        };

        let mut ranges = Vec::new();
        let mut p = 0;
        while p < body.len() {
            if p + 2 < body.len() && body[p + 1] == '-' {
                // `z-a` is empty
                if body[p] <= body[p + 2] {
                    ranges.push((body[p], body[p + 2]));
                }
                p += 3;
            } else {
                ranges.push((body[p], body[p]));
                p += 1;
            }
        }

        Self { negated, ranges }
    }

    /// Append the class as glob syntax, `None` when it can never match
    fn write(&self, glob: &mut String) -> Option<()> {
        let mut specials = Vec::new();
        let mut clean = Vec::new();
        for &(lo, hi) in &self.ranges {
            split_range(lo, hi, &mut specials, &mut clean);
        }
        specials.sort_unstable();
        specials.dedup();

        if specials.is_empty() && clean.is_empty() {
            if self.negated {
                glob.push('?');
                return Some(());
            }
            return None;
        }

        let has = |c: char| specials.contains(&c);

        // `]` is literal first, `-` first or last, `!` and `^` anywhere but first
        let mut body = String::new();
        let dash_first = !has(']') && has('-');
        if has(']') {
            body.push(']');
        } else if dash_first {
            body.push('-');
        }
        for (lo, hi) in clean {
            body.push(lo);
            if lo != hi {
                body.push('-');
                body.push(hi);
            }
        }
        for c in ['^', '!'] {
            if has(c) {
                body.push(c);
            }
        }
        if has('-') && !dash_first {
            body.push('-');
        }

        if self.negated {
            glob.push_str("[!");
            glob.push_str(&body);
            glob.push(']');
        } else if body.starts_with(&['^', '!'][..]) {
            // Only `^` and `!` are left, neither can open a class
            if body.chars().count() == 1 {
                glob.push_str(&body);
            } else {
                glob.push_str("{^,!}");
            }
        } else {
            glob.push('[');
            glob.push_str(&body);
            glob.push(']');
        }

        Some(())
    }
}

/// Peel class specials off the ends of a range so they can be placed safely
fn split_range(lo: char, hi: char, specials: &mut Vec<char>, clean: &mut Vec<(char, char)>) {
    let (mut lo, mut hi) = (u32::from(lo), u32::from(hi));
    let special = |c: u32| char::from_u32(c).is_some_and(|c| CLASS_SPECIALS.contains(&c));

    while lo <= hi && special(lo) {
        specials.extend(char::from_u32(lo));
        lo += 1;
    }
    while lo <= hi && special(hi) {
        specials.extend(char::from_u32(hi));
        hi -= 1;
    }
    if lo <= hi
        && let (Some(lo), Some(hi)) = (char::from_u32(lo), char::from_u32(hi))
    {
        clean.push((lo, hi));
    }
}
