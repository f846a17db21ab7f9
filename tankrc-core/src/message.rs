use crate::error::ParseFailure;

/// Base contract shared by the request, reply and event families.
///
/// A message is self-describing: it supplies its own command name, its own
/// token parser and its own parameter serializer, which is what lets the
/// registries stay pure name→factory tables with no per-type branching in
/// the links. Wire text is the only persisted form, so
/// serialize → parse → serialize must be the identity for every valid
/// field value.
pub trait Message: std::fmt::Debug + Send {
    /// Wire token identifying this message type.
    fn command_name(&self) -> &'static str;

    /// Fill the message's fields from the argument tokens (command name
    /// excluded).
    fn parse(&mut self, args: &[&str]) -> Result<(), ParseFailure>;

    /// Append this message's parameters to `out`, each preceded by a
    /// single space.
    fn write_parameters(&self, out: &mut String);

    /// The complete newline-terminated wire line.
    fn to_wire(&self) -> String {
        let mut line = String::with_capacity(32);
        line.push_str(self.command_name());
        self.write_parameters(&mut line);
        line.push('\n');
        line
    }
}

/// Token-level parse helpers used by message implementations.
pub mod parse {
    use crate::error::ParseFailure;

    /// Require an exact argument count.
    pub fn expect_args(args: &[&str], expected: usize) -> Result<(), ParseFailure> {
        if args.len() != expected {
            return Err(ParseFailure::InvalidArgumentCount {
                expected,
                got: args.len(),
            });
        }
        Ok(())
    }

    /// Parse one floating-point token. `NaN` is never a valid argument.
    pub fn float(token: &str) -> Result<f64, ParseFailure> {
        let value = token
            .parse::<f64>()
            .map_err(|_| ParseFailure::ParseError(token.to_string()))?;
        if value.is_nan() {
            return Err(ParseFailure::InvalidArguments(format!("{token:?} is NaN")));
        }
        Ok(value)
    }

    /// Parse one floating-point token and clamp it into `[lo, hi]`.
    pub fn float_clamped(token: &str, lo: f64, hi: f64) -> Result<f64, ParseFailure> {
        Ok(float(token)?.clamp(lo, hi))
    }

    /// Parse a non-negative integer token (list lengths).
    pub fn count(token: &str) -> Result<usize, ParseFailure> {
        token
            .parse::<usize>()
            .map_err(|_| ParseFailure::ParseError(token.to_string()))
    }

    /// Parse a `0`/`1` flag token.
    pub fn flag(token: &str) -> Result<bool, ParseFailure> {
        match token {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(ParseFailure::InvalidArguments(format!(
                "{token:?} is not a 0/1 flag"
            ))),
        }
    }
}
