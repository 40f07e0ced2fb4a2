use chrono::{DateTime, Duration, Utc};

/// Wall-clock source for sessions. Tests use a fixed clock and advance it.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Whole seconds between two instants, clamped at zero.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_seconds().max(0) as u64
}

#[cfg(test)]
pub(crate) fn test_clock() -> Clock {
    // 2023-11-14T22:13:20Z
    Clock::fixed(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let mut clock = test_clock();
        let start = clock.now();
        clock.advance(Duration::seconds(90));
        assert_eq!(seconds_between(start, clock.now()), 90);
    }

    #[test]
    fn test_seconds_between_never_negative() {
        let clock = test_clock();
        let earlier = clock.now() - Duration::seconds(5);
        assert_eq!(seconds_between(clock.now(), earlier), 0);
    }
}
