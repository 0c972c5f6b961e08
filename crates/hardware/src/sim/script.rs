//! Poke script parsing.
//!
//! This module turns script text into timed memory events. It handles:
//! 1. **Integers:** C-style base inference (`0x` hex, leading `0` octal, else decimal);
//!    unparseable text reads as 0 rather than failing.
//! 2. **Payloads:** Hex digit strings decoded two characters per byte.
//! 3. **Lines:** `SAMPLE:ADDRESS=HEXBYTES`, with both `=...` and the payload optional.
//! 4. **Pokes:** `ADDRESS=HEXBYTES` arguments written once before playback starts.
//!
//! Parsing never rejects a line. Malformed input degrades to zero fields or an
//! empty payload; a blank line therefore becomes a termination sentinel at sample 0.

use std::fmt;

use crate::common::HarnessError;

/// One timed write (or the termination sentinel) from the script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptEvent {
    /// Sample count at which the event becomes due.
    pub due: u32,
    /// Raw address of the first payload byte.
    pub address: u16,
    /// Bytes written to successive addresses.
    pub payload: Vec<u8>,
}

impl ScriptEvent {
    /// Returns `true` for the termination sentinel (empty payload at address 0).
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.payload.is_empty() && self.address == 0
    }

    /// Parses one script line.
    ///
    /// Without a `:` the sample text doubles as the address text, so `"7"` yields
    /// `{7, 7, []}`. Trailing whitespace in the payload is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use acpsim_core::sim::script::ScriptEvent;
    ///
    /// let event = ScriptEvent::parse_line("0x10:0x8000=aabb");
    /// assert_eq!(event.due, 16);
    /// assert_eq!(event.address, 0x8000);
    /// assert_eq!(event.payload, vec![0xAA, 0xBB]);
    /// ```
    pub fn parse_line(line: &str) -> Self {
        let (due_text, rest) = match line.split_once(':') {
            Some((due, rest)) => (due, Some(rest)),
            None => (line, None),
        };
        let (address_text, payload_text) = match rest {
            None => (due_text, ""),
            Some(rest) => rest.split_once('=').unwrap_or((rest, "")),
        };

        Self {
            due: parse_c_integer(due_text) as u32,
            address: parse_c_integer(address_text) as u16,
            payload: decode_hex_payload(payload_text.trim_end()),
        }
    }
}

impl fmt::Display for ScriptEvent {
    /// Canonical form: `0x<due>:0x<addr>=<hex>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}:0x{:x}=", self.due, self.address)?;
        for byte in &self.payload {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A one-shot write applied before the sample-0 replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poke {
    /// Raw address of the first byte.
    pub address: u16,
    /// Bytes written to successive addresses.
    pub bytes: Vec<u8>,
}

impl Poke {
    /// Parses an `ADDRESS=HEXBYTES` argument.
    ///
    /// Unlike script lines, a missing `=` is an error here since the argument
    /// would otherwise silently do nothing.
    pub fn parse(arg: &str) -> Result<Self, HarnessError> {
        let (address, bytes) = arg
            .split_once('=')
            .ok_or_else(|| HarnessError::Poke(arg.to_string()))?;
        Ok(Self {
            address: parse_c_integer(address) as u16,
            bytes: decode_hex_payload(bytes.trim_end()),
        })
    }
}

/// Parses an unsigned integer with the base inferred from its prefix.
///
/// Mirrors `strtoul(text, NULL, 0)`: leading whitespace and one sign are
/// skipped, `0x`/`0X` selects hex, a leading `0` selects octal, and the longest
/// run of valid digits is used. No digits yields 0, overflow saturates, and a
/// minus sign negates modulo 2^64. Callers truncate to the field width.
pub fn parse_c_integer(text: &str) -> u64 {
    let text = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let bytes = text.as_bytes();
    let (radix, digits) = match bytes {
        [b'0', b'x' | b'X', next, ..] if next.is_ascii_hexdigit() => (16, &text[2..]),
        [b'0', ..] => (8, text),
        _ => (10, text),
    };

    let mut value: u64 = 0;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        match value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(next) => value = next,
            None => return u64::MAX,
        }
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Decodes a hex string two characters per byte, high nibble first.
///
/// Each pair decodes its longest valid hex prefix: `"ab"` is `0xAB`, a lone
/// trailing `"c"` is `0x0C`, and a pair with no leading hex digit is `0x00`.
pub fn decode_hex_payload(text: &str) -> Vec<u8> {
    text.as_bytes().chunks(2).map(decode_pair).collect()
}

fn decode_pair(pair: &[u8]) -> u8 {
    pair.iter()
        .map_while(|&b| char::from(b).to_digit(16))
        .fold(0u8, |acc, nibble| (acc << 4) | nibble as u8)
}

/// Parses a whole script, one event per line, in file order.
///
/// Sorting is the timeline's job; see
/// [`ScriptTimeline::new`](crate::sim::timeline::ScriptTimeline::new).
pub fn parse_script(text: &str) -> Vec<ScriptEvent> {
    text.lines()
        .enumerate()
        .map(|(number, line)| {
            if line.trim().is_empty() {
                tracing::warn!(
                    "script line {} is blank; it reads as a stop at sample 0",
                    number + 1
                );
            }
            ScriptEvent::parse_line(line)
        })
        .collect()
}
