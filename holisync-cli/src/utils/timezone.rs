//! Picks the default timezone handed to the ICS normalizer.

use anyhow::{Context, Result};
use chrono_tz::Tz;

/// `--timezone`, else the configured one, else the system zone, else UTC.
///
/// A name given explicitly must be valid; an unknown system zone falls back
/// to UTC with a warning.
pub fn resolve(flag: Option<&str>, configured: Option<&str>) -> Result<Tz> {
    if let Some(name) = flag.or(configured) {
        return name
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .with_context(|| format!("Unknown timezone '{}'", name));
    }

    Ok(system_timezone())
}

fn system_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(timezone = %name, "system timezone not recognised, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine system timezone, using UTC");
            Tz::UTC
        }
    }
}
