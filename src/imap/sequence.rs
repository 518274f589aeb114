//! Sequence-set handling for fetch requests.

use std::str::FromStr;

/// One element of a sequence set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqRange {
    /// A single message number.
    Single(u32),
    /// A closed range, inclusive on both ends.
    Range(u32, u32),
    /// An open range from a number to the end of the mailbox.
    From(u32),
}

/// A parsed sequence set in the textual form `1`, `2:5`, `3:*` or a
/// comma-separated list of those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSet {
    ranges: Vec<SeqRange>,
}

impl SequenceSet {
    pub fn new(ranges: Vec<SeqRange>) -> Self {
        Self { ranges }
    }

    /// Set containing a single message number.
    pub fn single(n: u32) -> Self {
        Self {
            ranges: vec![SeqRange::Single(n)],
        }
    }

    pub fn ranges(&self) -> &[SeqRange] {
        &self.ranges
    }

    /// Expand against a mailbox of `count` messages.
    ///
    /// Open ranges clamp to `count` and contribute nothing when they start
    /// past the end. Explicitly named numbers are kept even when out of
    /// range, so a fetch can answer each one individually. Numbers appear
    /// in request order and are not deduplicated.
    pub fn resolve(&self, count: usize) -> Vec<u32> {
        let last = count as u32;
        let mut numbers = Vec::new();

        for range in &self.ranges {
            match *range {
                SeqRange::Single(n) => numbers.push(n),
                SeqRange::Range(start, end) => numbers.extend(start..=end),
                SeqRange::From(start) => {
                    if start <= last {
                        numbers.extend(start..=last);
                    }
                }
            }
        }

        numbers
    }
}

impl FromStr for SequenceSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(format!("invalid sequence set: {s}"));
            }

            let range = parse_range(part).ok_or_else(|| format!("invalid sequence set: {s}"))?;
            ranges.push(range);
        }

        Ok(Self::new(ranges))
    }
}

fn parse_range(part: &str) -> Option<SeqRange> {
    match part.split_once(':') {
        None => parse_number(part).map(SeqRange::Single),
        // A star may sit on either side of an open range
        Some(("*", end)) => parse_number(end).map(SeqRange::From),
        Some((start, "*")) => parse_number(start).map(SeqRange::From),
        Some((start, end)) => {
            let a = parse_number(start)?;
            let b = parse_number(end)?;
            if a <= b {
                Some(SeqRange::Range(a, b))
            } else {
                Some(SeqRange::Range(b, a))
            }
        }
    }
}

fn parse_number(s: &str) -> Option<u32> {
    match s.parse::<u32>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        let set: SequenceSet = "4".parse().unwrap();
        assert_eq!(set.ranges(), &[SeqRange::Single(4)]);
    }

    #[test]
    fn test_parse_closed_range() {
        let set: SequenceSet = "2:5".parse().unwrap();
        assert_eq!(set.ranges(), &[SeqRange::Range(2, 5)]);
    }

    #[test]
    fn test_parse_reversed_range_normalizes() {
        let set: SequenceSet = "5:2".parse().unwrap();
        assert_eq!(set.ranges(), &[SeqRange::Range(2, 5)]);
    }

    #[test]
    fn test_parse_open_range() {
        let set: SequenceSet = "3:*".parse().unwrap();
        assert_eq!(set.ranges(), &[SeqRange::From(3)]);
    }

    #[test]
    fn test_parse_open_range_star_first() {
        let set: SequenceSet = "*:3".parse().unwrap();
        assert_eq!(set.ranges(), &[SeqRange::From(3)]);
    }

    #[test]
    fn test_parse_list_with_spaces() {
        let set: SequenceSet = "1, 3:4, 7:*".parse().unwrap();
        assert_eq!(
            set.ranges(),
            &[SeqRange::Single(1), SeqRange::Range(3, 4), SeqRange::From(7)]
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!("".parse::<SequenceSet>().is_err());
        assert!("1,,3".parse::<SequenceSet>().is_err());
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!("0".parse::<SequenceSet>().is_err());
        assert!("0:4".parse::<SequenceSet>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("a".parse::<SequenceSet>().is_err());
        assert!("1:b".parse::<SequenceSet>().is_err());
        assert!("*".parse::<SequenceSet>().is_err());
    }

    #[test]
    fn test_resolve_keeps_explicit_numbers() {
        let set: SequenceSet = "2,999".parse().unwrap();
        assert_eq!(set.resolve(3), vec![2, 999]);
    }

    #[test]
    fn test_resolve_expands_closed_range() {
        let set: SequenceSet = "2:5".parse().unwrap();
        assert_eq!(set.resolve(10), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_resolve_clamps_open_range() {
        let set: SequenceSet = "3:*".parse().unwrap();
        assert_eq!(set.resolve(5), vec![3, 4, 5]);
    }

    #[test]
    fn test_resolve_open_range_past_end_is_empty() {
        let set: SequenceSet = "7:*".parse().unwrap();
        assert!(set.resolve(5).is_empty());
    }

    #[test]
    fn test_resolve_mixed() {
        let set: SequenceSet = "1,4:*".parse().unwrap();
        assert_eq!(set.resolve(6), vec![1, 4, 5, 6]);
    }

    #[test]
    fn test_single_constructor() {
        assert_eq!(SequenceSet::single(9).resolve(20), vec![9]);
    }

    #[test]
    fn test_prebuilt_ranges() {
        let set = SequenceSet::new(vec![SeqRange::Single(2), SeqRange::From(5)]);

        assert_eq!(set.ranges().len(), 2);
        assert_eq!(set.resolve(6), vec![2, 5, 6]);
    }
}
