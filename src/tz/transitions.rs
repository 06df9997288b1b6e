use crate::tz::posix::PosixTimeZone;

/// A single offset change in a zone's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    /// The UTC epoch second at which the new offset takes effect.
    pub(crate) at: i64,
    /// The offset in seconds that applied before this transition.
    pub(crate) offset_before: i32,
    /// The offset in seconds in effect from this transition on.
    pub(crate) offset_after: i32,
}

/// The offset history of a named zone: an ordered transition table from the
/// TZif data plus an optional POSIX rule covering the far future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ZoneData {
    /// The offset in seconds for instants before the first transition.
    pub(crate) initial_offset: i32,
    /// Transitions ordered by their `at` second.
    pub(crate) transitions: Vec<Transition>,
    /// Rule for instants past the end of the table.
    pub(crate) posix: Option<PosixTimeZone>,
}

impl ZoneData {
    /// A zone pinned to a single offset with no transitions.
    pub(crate) fn fixed(offset_seconds: i32) -> Self {
        Self {
            initial_offset: offset_seconds,
            transitions: Vec::new(),
            posix: None,
        }
    }

    /// The offset in effect at the given UTC epoch second.
    pub(crate) fn offset_at(&self, epoch_seconds: i64) -> i32 {
        match self.transitions.last() {
            Some(last) if epoch_seconds >= last.at => match &self.posix {
                Some(posix) => posix.offset_at(epoch_seconds),
                // RFC 8536 calls times past a footer-less table unspecified;
                // extending the final offset is the conventional reading.
                None => last.offset_after,
            },
            _ => {
                let idx = self.transitions.partition_point(|t| t.at <= epoch_seconds);
                if idx == 0 {
                    self.initial_offset
                } else {
                    self.transitions[idx - 1].offset_after
                }
            }
        }
    }

    /// The UTC second of the first transition strictly after `epoch_seconds`.
    pub(crate) fn next_transition(&self, epoch_seconds: i64) -> Option<i64> {
        let idx = self.transitions.partition_point(|t| t.at <= epoch_seconds);
        match self.transitions.get(idx) {
            Some(transition) => Some(transition.at),
            None => self.posix.as_ref().and_then(|p| p.next_transition(epoch_seconds)),
        }
    }

    /// The UTC second of the last transition strictly before `epoch_seconds`.
    pub(crate) fn previous_transition(&self, epoch_seconds: i64) -> Option<i64> {
        if let (Some(last), Some(posix)) = (self.transitions.last(), &self.posix) {
            if epoch_seconds > last.at {
                if let Some(at) = posix.previous_transition(epoch_seconds) {
                    if at > last.at {
                        return Some(at);
                    }
                }
            }
        }
        let idx = self.transitions.partition_point(|t| t.at < epoch_seconds);
        if idx == 0 {
            None
        } else {
            Some(self.transitions[idx - 1].at)
        }
    }
}
