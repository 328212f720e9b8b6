// MIT LICENSE
//
// Copyright (c) 2021 Dash Core Group
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Visualize

use core::fmt;
use std::io::{Result, Write};

use itertools::Itertools;

static DIGEST_PREFIX_LEN: usize = 8;
static DIGEST_SUFFIX_LEN: usize = 4;
static STR_LEN: usize = 24;
static INDENT_SPACES: usize = 4;

/// Pretty plain-text visualization of merklelab components.
pub trait Visualize {
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>>;
}

/// Wrapper struct with a `Debug` implementation that shows a hex digest in a
/// shortened, human-friendly way.
#[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone)]
pub struct DebugDigest(pub String);

impl fmt::Debug for DebugDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shorten_digest(&self.0))
    }
}

/// A `io::Write` proxy to prepend padding and symbols to draw trees
pub struct Drawer<W: Write> {
    level: usize,
    write: W,
}

impl<W: Write> Drawer<W> {
    pub fn new(write: W) -> Self {
        Drawer { level: 0, write }
    }

    pub fn down(&mut self) {
        self.level += 1;
    }

    pub fn up(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        let lines_iter = buf.split(|c| *c == b'\n');
        let sep = if self.level > 0 {
            let mut result = " ".repeat(INDENT_SPACES * self.level - 1);
            result.insert(0, '\n');
            result
        } else {
            String::from("\n")
        };
        let interspersed_lines_iter = Itertools::intersperse(lines_iter, sep.as_bytes());
        for line in interspersed_lines_iter {
            self.write.write_all(line)?;
        }
        Ok(())
    }

    /// Starts a new line at the current indentation.
    pub fn newline(&mut self) -> Result<()> {
        self.write(b"\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.write.write_all(b"\n")?;
        self.write.flush()?;
        Ok(())
    }
}

/// Shortens a hex digest to `prefix..suffix`; short strings are kept as is.
pub fn shorten_digest(digest: &str) -> String {
    if digest.len() > DIGEST_PREFIX_LEN + DIGEST_SUFFIX_LEN + 2 && digest.is_ascii() {
        let suffix_start = digest.len() - DIGEST_SUFFIX_LEN;
        format!(
            "{}..{}",
            &digest[..DIGEST_PREFIX_LEN],
            &digest[suffix_start..]
        )
    } else {
        digest.to_owned()
    }
}

/// Hex-encodes raw bytes and shortens the result like a digest.
pub fn to_hex(bytes: &[u8]) -> String {
    shorten_digest(&hex::encode(bytes))
}

/// Truncates free text (payloads) to a fixed number of characters.
pub fn truncate_text(text: &str) -> String {
    if text.chars().count() > STR_LEN {
        let mut short: String = text.chars().take(STR_LEN).collect();
        short.push('…');
        short
    } else {
        text.to_owned()
    }
}

impl Visualize for str {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(format!("\"{}\"", truncate_text(self)).as_bytes())?;
        Ok(drawer)
    }
}

impl Visualize for String {
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>> {
        self.as_str().visualize(drawer)
    }
}

impl Visualize for [u8] {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(format!("[hex: {}]", to_hex(self)).as_bytes())?;
        Ok(drawer)
    }
}

impl<T: Visualize + ?Sized> Visualize for &T {
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>> {
        (*self).visualize(drawer)
    }
}

impl<T: Visualize> Visualize for Option<T> {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        Ok(if let Some(v) = self {
            v.visualize(drawer)?
        } else {
            drawer.write(b"None")?;
            drawer
        })
    }
}

/// `visualize` shortcut to write straight into stdout offhand
pub fn visualize_stdout<T: Visualize + ?Sized>(value: &T) {
    let mut out = std::io::stdout();
    let drawer = Drawer::new(&mut out);
    value
        .visualize(drawer)
        .and_then(|mut drawer| drawer.flush())
        .expect("IO error when trying to `visualize`");
}

/// `visualize` shortcut to write into provided buffer, should be a `Vec` not a
/// slice because slices won't grow if needed.
pub fn visualize_to_vec<T: Visualize + ?Sized>(v: &mut Vec<u8>, value: &T) {
    let drawer = Drawer::new(v);
    value
        .visualize(drawer)
        .expect("error while writing into vector");
}

/// `visualize` shortcut returning the drawing as a `String`.
pub fn visualize_to_string<T: Visualize + ?Sized>(value: &T) -> String {
    let mut v = Vec::new();
    visualize_to_vec(&mut v, value);
    String::from_utf8_lossy(&v).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_digest() {
        let digest = "a591a6d40bf420404a011733cfb7b190d62c65bf0bcda32b57b277d9ad9f146e";
        assert_eq!(shorten_digest(digest), "a591a6d4..146e");
        assert_eq!(shorten_digest("abcd"), "abcd");
        assert_eq!(format!("{:?}", DebugDigest(digest.to_owned())), "a591a6d4..146e");
    }

    #[test]
    fn test_drawer_indents_nested_lines() {
        let mut out = Vec::new();
        let mut drawer = Drawer::new(&mut out);
        drawer.write(b"root").unwrap();
        drawer.down();
        drawer.newline().unwrap();
        drawer.write(b"child").unwrap();
        drawer.up();
        drawer.newline().unwrap();
        drawer.write(b"sibling").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "root\n   child\nsibling");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("TX_A"), "TX_A");
        let long = "x".repeat(40);
        let short = truncate_text(&long);
        assert_eq!(short.chars().count(), STR_LEN + 1);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn test_option_and_str() {
        let some: Option<&str> = Some("TX_B");
        assert_eq!(visualize_to_string(&some), "\"TX_B\"");
        let none: Option<&str> = None;
        assert_eq!(visualize_to_string(&none), "None");
        assert_eq!(visualize_to_string(&b"\xde\xad"[..]), "[hex: dead]");
    }
}
