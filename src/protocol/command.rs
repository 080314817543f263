//! Command definitions
//!
//! A command is an ordered list of opaque byte-string arguments. The first
//! argument is the operation name. Argument order is part of the protocol, so
//! the builder only ever appends.

use std::fmt;

use bytes::Bytes;

/// An outgoing request, built argument by argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<Bytes>,
}

impl Command {
    /// Start a command with its operation name
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        Self {
            args: vec![Bytes::copy_from_slice(name.as_ref())],
        }
    }

    /// Build a command from a full argument list (name first)
    ///
    /// Returns `None` if the list is empty.
    pub fn from_args<I, A>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        let args: Vec<Bytes> = args
            .into_iter()
            .map(|a| Bytes::copy_from_slice(a.as_ref()))
            .collect();
        if args.is_empty() {
            None
        } else {
            Some(Self { args })
        }
    }

    // =========================================================================
    // Appending (by mutable reference)
    // =========================================================================

    /// Append raw bytes
    pub fn arg(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.args.push(Bytes::copy_from_slice(bytes.as_ref()));
        self
    }

    /// Append a UTF-8 string
    pub fn arg_str(&mut self, s: &str) -> &mut Self {
        self.arg(s.as_bytes())
    }

    /// Append an integer in base 10
    pub fn arg_int(&mut self, value: i64) -> &mut Self {
        self.args.push(Bytes::from(value.to_string()));
        self
    }

    /// Append an integer in the given base
    ///
    /// # Panics
    /// If `radix` is outside `2..=36`.
    pub fn arg_int_radix(&mut self, value: i64, radix: u32) -> &mut Self {
        self.args.push(Bytes::from(format_radix(value, radix)));
        self
    }

    /// Append a boolean as `true` / `false`
    pub fn arg_bool(&mut self, value: bool) -> &mut Self {
        self.arg(if value { "true" } else { "false" })
    }

    // =========================================================================
    // Appending (by value, for one-expression construction)
    // =========================================================================

    /// Owned form of [`Command::arg`]
    pub fn with_arg(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.arg(bytes);
        self
    }

    /// Owned form of [`Command::arg_str`]
    pub fn with_str(mut self, s: &str) -> Self {
        self.arg_str(s);
        self
    }

    /// Owned form of [`Command::arg_int`]
    pub fn with_int(mut self, value: i64) -> Self {
        self.arg_int(value);
        self
    }

    /// Owned form of [`Command::arg_int_radix`]
    ///
    /// # Panics
    /// If `radix` is outside `2..=36`.
    pub fn with_radix(mut self, value: i64, radix: u32) -> Self {
        self.arg_int_radix(value, radix);
        self
    }

    /// Owned form of [`Command::arg_bool`]
    pub fn with_bool(mut self, value: bool) -> Self {
        self.arg_bool(value);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Operation name (first argument)
    pub fn name(&self) -> &[u8] {
        &self.args[0]
    }

    /// All arguments, name included
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    /// Number of arguments, name included
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Always false: a command carries at least its name
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&String::from_utf8_lossy(arg))?;
        }
        Ok(())
    }
}

/// Format a signed integer in base 2..=36 using lowercase digits
fn format_radix(value: i64, radix: u32) -> String {
    assert!(
        (2..=36).contains(&radix),
        "radix must be in 2..=36, got {radix}"
    );

    let mut magnitude = value.unsigned_abs();
    if magnitude == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(65);
    while magnitude > 0 {
        let digit = (magnitude % radix as u64) as u32;
        // digit < radix <= 36, so from_digit always succeeds
        digits.push(char::from_digit(digit, radix).unwrap_or('0'));
        magnitude /= radix as u64;
    }
    if value < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}
