use alloc::borrow::Cow;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Level-of-detail offsets of a sequence batch.
///
/// Every level holds absolute row offsets: `level[i]..level[i + 1]` are the rows of the
/// `i`-th segment of that level. Levels go from coarse to fine, and every boundary of a
/// coarse level is also a boundary of the next level.
///
/// A LoD without levels describes a tensor where each row is its own sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lod {
    levels: Vec<Vec<usize>>,
}

impl Lod {
    /// Creates a LoD without checking its levels.
    ///
    /// Use [Lod::validate] before handing it to an operation, or build it with
    /// [Lod::from_levels].
    pub fn new(levels: Vec<Vec<usize>>) -> Self {
        Self { levels }
    }

    /// Creates a LoD and checks that it describes `rows` rows.
    pub fn from_levels(levels: Vec<Vec<usize>>, rows: usize) -> Result<Self> {
        let lod = Self::new(levels);
        lod.validate(rows)?;

        Ok(lod)
    }

    /// The LoD where each of the `rows` rows is a sequence of length one.
    pub fn implicit(rows: usize) -> Self {
        Self::new(vec![(0..=rows).collect()])
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Whether the LoD has no level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The offsets of the given level.
    pub fn level(&self, index: usize) -> Option<&[usize]> {
        self.levels.get(index).map(Vec::as_slice)
    }

    /// All levels, coarse to fine.
    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    /// Number of segments of the given level.
    pub fn num_segments(&self, index: usize) -> Option<usize> {
        self.level(index).map(|level| level.len().saturating_sub(1))
    }

    /// The first level, or the implicit one-row-per-sequence level when the LoD is empty.
    pub fn top_level(&self, rows: usize) -> Cow<'_, [usize]> {
        match self.levels.first() {
            Some(level) => Cow::Borrowed(level.as_slice()),
            None => Cow::Owned((0..=rows).collect()),
        }
    }

    /// Checks every level and the nesting between consecutive levels.
    pub fn validate(&self, rows: usize) -> Result<()> {
        for (index, level) in self.levels.iter().enumerate() {
            check_offsets(level, rows).map_err(|err| match err {
                Error::InvalidArgument { reason } => {
                    Error::invalid_argument(format!("LoD level {index}: {reason}"))
                }
                err => err,
            })?;
        }

        for (index, pair) in self.levels.windows(2).enumerate() {
            if !is_nested(&pair[0], &pair[1]) {
                return Err(Error::invalid_argument(format!(
                    "LoD level {index} has boundaries that are not in level {}",
                    index + 1
                )));
            }
        }

        Ok(())
    }
}

impl From<Vec<Vec<usize>>> for Lod {
    fn from(levels: Vec<Vec<usize>>) -> Self {
        Self::new(levels)
    }
}

/// Checks that `offsets` starts at zero, never decreases and ends at `rows`.
///
/// A batch without rows may have no sequence at all, its offsets being `[0]`.
pub fn check_offsets(offsets: &[usize], rows: usize) -> Result<()> {
    let (first, last) = match (offsets.first(), offsets.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(Error::invalid_argument("offsets need at least one entry")),
    };

    if first != 0 {
        return Err(Error::invalid_argument(format!(
            "offsets must start at 0, got {first}"
        )));
    }

    if let Some(pos) = offsets.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(Error::invalid_argument(format!(
            "offsets must be non-decreasing, got {} after {} at position {}",
            offsets[pos + 1],
            offsets[pos],
            pos + 1
        )));
    }

    if last != rows {
        return Err(Error::invalid_argument(format!(
            "offsets end at {last} but the tensor has {rows} rows"
        )));
    }

    Ok(())
}

/// Length of every segment delimited by `offsets`.
pub fn segment_lengths(offsets: &[usize]) -> impl Iterator<Item = usize> + '_ {
    offsets.windows(2).map(|pair| pair[1] - pair[0])
}

fn is_nested(coarse: &[usize], fine: &[usize]) -> bool {
    let mut cursor = 0;

    for value in coarse {
        while cursor < fine.len() && fine[cursor] < *value {
            cursor += 1;
        }

        if cursor == fine.len() || fine[cursor] != *value {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_valid_offsets() {
        assert!(check_offsets(&[0, 1, 1, 4], 4).is_ok());
        assert!(check_offsets(&[0, 0], 0).is_ok());
    }

    #[test]
    fn should_reject_offsets_not_starting_at_zero() {
        let err = check_offsets(&[1, 2, 3], 3).unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn should_reject_decreasing_offsets() {
        let err = check_offsets(&[0, 3, 2, 4], 4).unwrap_err();

        assert!(err.to_string().contains("non-decreasing"));
    }

    #[test]
    fn should_reject_offsets_not_matching_rows() {
        assert!(check_offsets(&[0, 2, 3], 4).is_err());
        assert!(check_offsets(&[0], 2).is_err());
        assert!(check_offsets(&[], 0).is_err());
    }

    #[test]
    fn should_accept_single_offset_without_rows() {
        assert!(check_offsets(&[0], 0).is_ok());
        assert!(Lod::new(vec![vec![0, 0], vec![0]]).validate(0).is_ok());
    }

    #[test]
    fn should_prefix_offset_errors_with_level() {
        let lod = Lod::new(vec![vec![0, 2, 1, 3]]);

        let err = lod.validate(3).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid argument: LoD level 0: offsets must be non-decreasing, got 1 after 2 at \
             position 2"
        );
    }

    #[test]
    fn should_validate_nested_levels() {
        let lod = Lod::new(vec![vec![0, 2, 5], vec![0, 1, 2, 2, 5]]);

        assert!(lod.validate(5).is_ok());
    }

    #[test]
    fn should_reject_levels_not_nested() {
        let lod = Lod::new(vec![vec![0, 3, 5], vec![0, 2, 5]]);

        let err = lod.validate(5).unwrap_err();

        assert!(err.to_string().contains("not in level 1"));
    }

    #[test]
    fn should_fall_back_to_implicit_top_level() {
        let lod = Lod::default();

        assert_eq!(&*lod.top_level(3), &[0, 1, 2, 3]);
        assert_eq!(Lod::implicit(2).level(0), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn should_compute_segment_lengths() {
        let lengths: Vec<_> = segment_lengths(&[0, 2, 2, 5]).collect();

        assert_eq!(lengths, vec![2, 0, 3]);
    }
}
