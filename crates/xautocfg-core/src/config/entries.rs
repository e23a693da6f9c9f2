// Xautocfg Config Entries
// Closed set of sections and the (section, key) -> setter table

use std::path::Path;

use strum_macros::{AsRefStr, Display, EnumString};

use super::{interval_from_rate, Config};
use crate::paths::expand_tilde;

/// A `[name]` section of the config file.
///
/// Before the first header no section is open; that state is represented
/// as `Option<Section>::None` by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    /// Repeat settings, hook commands are accepted here too
    Keyboard,
    /// Hook commands only
    Scripts,
}

/// Why a value was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("expected a non-negative integer, got '{0}'")]
    NotANumber(String),

    #[error("rate must be greater than 0")]
    ZeroRate,

    #[error("{0}ms is larger than the X server accepts ({max}ms)", max = u16::MAX)]
    TooLarge(u32),

    #[error("HOME env not set, can't expand '~'")]
    NoHome,
}

/// Applies one parsed value to the config under construction
pub type Setter = fn(&mut Config, &str, Option<&Path>) -> Result<(), ValueError>;

/// Every key the config file understands, per section.
///
/// `on_connect`/`on_disconnect` are older spellings of `on_enable`/`on_disable`.
const ENTRIES: &[(Section, &str, Setter)] = &[
    (Section::Keyboard, "delay", set_delay),
    (Section::Keyboard, "rate", set_rate),
    (Section::Keyboard, "interval", set_interval),
    (Section::Keyboard, "on_enable", set_on_enable),
    (Section::Keyboard, "on_connect", set_on_enable),
    (Section::Keyboard, "on_disable", set_on_disable),
    (Section::Keyboard, "on_disconnect", set_on_disable),
    (Section::Scripts, "on_enable", set_on_enable),
    (Section::Scripts, "on_connect", set_on_enable),
    (Section::Scripts, "on_disable", set_on_disable),
    (Section::Scripts, "on_disconnect", set_on_disable),
];

/// Find the setter for `key` inside `section`
pub fn lookup_entry(section: Section, key: &str) -> Option<Setter> {
    ENTRIES
        .iter()
        .find(|(s, k, _)| *s == section && *k == key)
        .map(|(_, _, setter)| *setter)
}

fn parse_u32(value: &str) -> Result<u32, ValueError> {
    value
        .parse::<u32>()
        .map_err(|_| ValueError::NotANumber(value.to_string()))
}

/// Delays and intervals travel to the X server as 16-bit values
fn parse_ms(value: &str) -> Result<u32, ValueError> {
    let ms = parse_u32(value)?;
    if ms > u32::from(u16::MAX) {
        return Err(ValueError::TooLarge(ms));
    }
    Ok(ms)
}

fn parse_command(value: &str, home: Option<&Path>) -> Result<Option<String>, ValueError> {
    if value.is_empty() {
        return Ok(None);
    }
    expand_tilde(value, home).map(Some).ok_or(ValueError::NoHome)
}

fn set_delay(config: &mut Config, value: &str, _home: Option<&Path>) -> Result<(), ValueError> {
    config.repeat_delay_ms = parse_ms(value)?;
    Ok(())
}

fn set_rate(config: &mut Config, value: &str, _home: Option<&Path>) -> Result<(), ValueError> {
    let rate = parse_u32(value)?;
    config.repeat_interval_ms = interval_from_rate(rate).ok_or(ValueError::ZeroRate)?;
    Ok(())
}

fn set_interval(config: &mut Config, value: &str, _home: Option<&Path>) -> Result<(), ValueError> {
    config.repeat_interval_ms = parse_ms(value)?;
    Ok(())
}

fn set_on_enable(config: &mut Config, value: &str, home: Option<&Path>) -> Result<(), ValueError> {
    config.on_enable_command = parse_command(value, home)?;
    Ok(())
}

fn set_on_disable(config: &mut Config, value: &str, home: Option<&Path>) -> Result<(), ValueError> {
    config.on_disable_command = parse_command(value, home)?;
    Ok(())
}
