use std::num::IntErrorKind;

/// A bot command parsed from message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Todo,
    /// Throw darts; the count is the raw request, before capping.
    Dart(i64),
    /// Roll dice; the count is the raw request, before capping.
    Dice(i64),
    ShowAdmins,
    Unknown(String),
}

impl Command {
    /// Parse `/name[@bot] [args…]`. Returns `None` for text that is not a command.
    ///
    /// Dice counts default to 1 when missing or not an integer.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let word = parts.next()?;
        let name = word.split('@').next().unwrap_or(word).to_lowercase();

        let count = parse_count(parts.next());

        Some(match name.as_str() {
            "start" => Command::Start,
            "todo" => Command::Todo,
            "dart" => Command::Dart(count),
            "dice" => Command::Dice(count),
            "showadmins" => Command::ShowAdmins,
            _ => Command::Unknown(name),
        })
    }
}

// Out-of-range numbers saturate instead of falling back to 1.
fn parse_count(arg: Option<&str>) -> i64 {
    let Some(arg) = arg else {
        return 1;
    };
    match arg.parse::<i64>() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 1,
        },
    }
}
