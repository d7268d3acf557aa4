//! Mine-local time primitives.
//!
//! Event timestamps on the wire are nanoseconds since the Unix epoch. All
//! display formatting happens in mine-local time, which is a fixed UTC
//! offset selected per site. Wall-clock access goes through the `Clock`
//! trait so every consumer is testable with a fixed instant.

/// Divisor turning an epoch-nanosecond timestamp into the render-time scalar.
pub const TIME_RATIO: f64 = 1e10;

pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            Err(_) => 0,
        }
    }
}

/// Fixed instant, for tests.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OffsetParseError {
    BadFormat,
}

impl std::fmt::Display for OffsetParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UTC offset must look like \"+10:00\" or \"-06:30\"")
    }
}

impl std::error::Error for OffsetParseError {}

/// Fixed UTC offset, in signed minutes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UtcOffset {
    minutes: i32,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset { minutes: 0 };

    /// Parses `"+HH:MM"` / `"-HH:MM"`. The sign applies to the minute part
    /// too, so `"-00:30"` is thirty minutes behind UTC. Empty input is UTC.
    pub fn parse(s: &str) -> Result<Self, OffsetParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(UtcOffset::UTC);
        }
        let negative = s.starts_with('-');
        let body = s.strip_prefix(['+', '-']).unwrap_or(s);
        let (h, m) = body.split_once(':').ok_or(OffsetParseError::BadFormat)?;
        let hours: i32 = h.parse().map_err(|_| OffsetParseError::BadFormat)?;
        let minutes: i32 = m.parse().map_err(|_| OffsetParseError::BadFormat)?;
        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(OffsetParseError::BadFormat);
        }
        let total = hours * 60 + minutes;
        Ok(UtcOffset {
            minutes: if negative { -total } else { total },
        })
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn ms(&self) -> i64 {
        self.minutes as i64 * 60_000
    }
}

/// Broken-down civil date/time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Civil {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

// Proleptic Gregorian conversion (Howard Hinnant's civil_from_days).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u64;
    let mp = if m > 2 { m - 3 } else { m + 9 } as u64;
    let doy = (153 * mp + 2) / 5 + d as u64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe as i64 - 719_468
}

/// Breaks an epoch-millisecond instant into civil time at the given offset.
pub fn civil_from_epoch_ms(epoch_ms: i64, offset: UtcOffset) -> Civil {
    let local_secs = epoch_ms.div_euclid(1000) + offset.minutes as i64 * 60;
    let days = local_secs.div_euclid(86_400);
    let sod = local_secs.rem_euclid(86_400) as u32;
    let (year, month, day) = civil_from_days(days);
    Civil {
        year,
        month,
        day,
        hour: sod / 3600,
        minute: (sod / 60) % 60,
        second: sod % 60,
    }
}

/// Parses the UTC instant format produced by [`MineClock::query_instant_days_ago`]
/// (`"YYYY-MM-DDTHH:MM:SS.mmmZ"`, fractional part optional) back to epoch
/// milliseconds.
pub fn parse_iso_utc_ms(s: &str) -> Option<i64> {
    let s = s.strip_suffix('Z')?;
    let (date, time) = s.split_once('T')?;

    let mut dp = date.split('-');
    let year: i64 = dp.next()?.parse().ok()?;
    let month: u32 = dp.next()?.parse().ok()?;
    let day: u32 = dp.next()?.parse().ok()?;
    if dp.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let (hms, frac) = match time.split_once('.') {
        Some((hms, frac)) => (hms, frac),
        None => (time, ""),
    };
    let mut tp = hms.split(':');
    let hour: i64 = tp.next()?.parse().ok()?;
    let minute: i64 = tp.next()?.parse().ok()?;
    let second: i64 = tp.next().unwrap_or("0").parse().ok()?;
    if tp.next().is_some() || hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    let millis: i64 = if frac.is_empty() {
        0
    } else {
        let digits: String = frac.chars().take(3).collect();
        let v: i64 = digits.parse().ok()?;
        match digits.len() {
            1 => v * 100,
            2 => v * 10,
            _ => v,
        }
    };

    let days = days_from_civil(year, month, day);
    Some((days * 86_400 + hour * 3600 + minute * 60 + second) * 1000 + millis)
}

fn iso_utc(epoch_ms: i64) -> String {
    let c = civil_from_epoch_ms(epoch_ms, UtcOffset::UTC);
    let millis = epoch_ms.rem_euclid(1000);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        c.year, c.month, c.day, c.hour, c.minute, c.second, millis
    )
}

/// Site clock combining a wall clock with the mine's UTC offset.
#[derive(Debug, Copy, Clone)]
pub struct MineClock<C> {
    pub clock: C,
    pub offset: UtcOffset,
}

impl<C: Clock> MineClock<C> {
    pub fn new(clock: C, offset: UtcOffset) -> Self {
        MineClock { clock, offset }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// UTC instant string for backend time-window queries.
    ///
    /// Zero or negative means "right now". Otherwise the window starts at
    /// mine-local midnight `nb_days` whole days back, expressed in UTC.
    pub fn query_instant_days_ago(&self, nb_days: f64) -> String {
        let now_ms = self.clock.now_ms();
        if nb_days <= 0.0 {
            return iso_utc(now_ms);
        }
        let mine = civil_from_epoch_ms(now_ms, self.offset);
        let midnight_local_secs = days_from_civil(mine.year, mine.month, mine.day) * 86_400;
        let mut epoch_ms = (midnight_local_secs - self.offset.minutes as i64 * 60) * 1000;
        if nb_days > 1.0 {
            let back = (nb_days - 1.0).trunc() as i64;
            epoch_ms -= back * 86_400_000;
        }
        iso_utc(epoch_ms)
    }

    /// Mine-local `"HH:MM:SS"` for an epoch-nanosecond event timestamp.
    pub fn format_epoch_time(&self, epoch_ns: i64) -> String {
        let c = civil_from_epoch_ms(epoch_ns / 1_000_000, self.offset);
        format!("{:02}:{:02}:{:02}", c.hour, c.minute, c.second)
    }

    /// Mine-local `"YYYY/MM/DD"` for an epoch-nanosecond event timestamp.
    pub fn format_epoch_date(&self, epoch_ns: i64) -> String {
        let c = civil_from_epoch_ms(epoch_ns / 1_000_000, self.offset);
        format!("{:04}/{:02}/{:02}", c.year, c.month, c.day)
    }

    /// Mine-local `"YYYY-MM-DD HH:MM"`, truncated to the minute.
    pub fn stamp_hours_ago(&self, hours: f64) -> String {
        let epoch_ms = self.clock.now_ms() - (hours * 3_600_000.0) as i64;
        let c = civil_from_epoch_ms(epoch_ms, self.offset);
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            c.year, c.month, c.day, c.hour, c.minute
        )
    }
}

const TIME_UNITS: [(&str, &str, f64); 3] = [
    ("month", "months", 30.0),
    ("week", "weeks", 7.0),
    ("day", "days", 1.0),
];

/// Greedy month/week/day label for a day count ("now" below one day).
pub fn short_time_label(days: f64) -> String {
    if days < 1.0 {
        return "now".to_string();
    }
    let mut remain = days;
    let mut parts = Vec::new();
    for (label, plural, base) in TIME_UNITS {
        if remain >= base {
            let count = (remain / base).floor() as i64;
            parts.push(count.to_string());
            parts.push(if remain / base >= 2.0 { plural } else { label }.to_string());
            remain %= base;
        }
    }
    parts.join(" ")
}

/// Coarse "how long ago" label for an hour count.
pub fn hours_ago_label(hours: f64) -> String {
    if hours > 0.9 {
        return format!("{} hours ago", hours.round() as i64);
    }
    let minutes = hours * 60.0;
    if minutes < 1.0 {
        return "now".to_string();
    }
    format!("{} minutes ago", minutes.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_sign_applies_to_minutes() {
        assert_eq!(UtcOffset::parse("+10:00").unwrap().minutes(), 600);
        assert_eq!(UtcOffset::parse("-06:30").unwrap().minutes(), -390);
        assert_eq!(UtcOffset::parse("-00:30").unwrap().minutes(), -30);
        assert_eq!(UtcOffset::parse("").unwrap(), UtcOffset::UTC);
        assert!(UtcOffset::parse("10").is_err());
        assert!(UtcOffset::parse("+25:00").is_err());
    }

    #[test]
    fn civil_conversion_round_trips_known_instants() {
        // 2019-03-04T05:06:07Z
        let ms = 1_551_675_967_000_i64;
        let c = civil_from_epoch_ms(ms, UtcOffset::UTC);
        assert_eq!((c.year, c.month, c.day), (2019, 3, 4));
        assert_eq!((c.hour, c.minute, c.second), (5, 6, 7));

        // Same instant at +10:00 is mid-afternoon.
        let c = civil_from_epoch_ms(ms, UtcOffset::parse("+10:00").unwrap());
        assert_eq!((c.hour, c.minute), (15, 6));

        // Epoch itself.
        let c = civil_from_epoch_ms(0, UtcOffset::UTC);
        assert_eq!((c.year, c.month, c.day, c.hour), (1970, 1, 1, 0));
    }

    #[test]
    fn query_instant_now_and_midnight_windows() {
        // 2019-03-04T05:06:07Z at a +10:00 mine (local 15:06).
        let mc = MineClock::new(
            FixedClock(1_551_675_967_000),
            UtcOffset::parse("+10:00").unwrap(),
        );
        assert_eq!(mc.query_instant_days_ago(0.0), "2019-03-04T05:06:07.000Z");
        // One day back means mine-local midnight of today, i.e. 14:00 UTC
        // the previous civil day.
        assert_eq!(mc.query_instant_days_ago(1.0), "2019-03-03T14:00:00.000Z");
        // Three days back: two further midnights.
        assert_eq!(mc.query_instant_days_ago(3.0), "2019-03-01T14:00:00.000Z");
    }

    #[test]
    fn epoch_formatting_uses_mine_time() {
        let mc = MineClock::new(FixedClock(0), UtcOffset::parse("+10:00").unwrap());
        // 2019-03-04T05:06:07Z in nanoseconds.
        let ns = 1_551_675_967_000_000_000_i64;
        assert_eq!(mc.format_epoch_time(ns), "15:06:07");
        assert_eq!(mc.format_epoch_date(ns), "2019/03/04");
    }

    #[test]
    fn iso_instants_parse_back_to_epoch_ms() {
        assert_eq!(
            parse_iso_utc_ms("2019-03-04T05:06:07.000Z"),
            Some(1_551_675_967_000)
        );
        assert_eq!(
            parse_iso_utc_ms("2019-03-04T05:06:07.5Z"),
            Some(1_551_675_967_500)
        );
        assert_eq!(parse_iso_utc_ms("1970-01-01T00:00:00Z"), Some(0));
        assert_eq!(parse_iso_utc_ms("not a date"), None);
        assert_eq!(parse_iso_utc_ms("2019-03-04 05:06:07Z"), None);
    }

    #[test]
    fn short_labels_decompose_greedily() {
        assert_eq!(short_time_label(0.5), "now");
        assert_eq!(short_time_label(1.0), "1 day");
        assert_eq!(short_time_label(3.0), "3 days");
        assert_eq!(short_time_label(7.0), "1 week");
        assert_eq!(short_time_label(14.0), "2 weeks");
        assert_eq!(short_time_label(32.0), "1 month 2 days");
        assert_eq!(short_time_label(91.25), "3 months 1 day");
    }

    #[test]
    fn hours_ago_labels() {
        assert_eq!(hours_ago_label(0.005), "now");
        assert_eq!(hours_ago_label(0.5), "30 minutes ago");
        assert_eq!(hours_ago_label(5.2), "5 hours ago");
    }
}
