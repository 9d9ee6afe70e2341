use crate::{lod::check_offsets, Error, Lod, Result};

/// Placement of one input sequence in the expanded output.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First input row of the sequence.
    pub input_start: usize,
    /// Number of rows of the sequence.
    pub length: usize,
    /// First output row of the replicas.
    pub output_start: usize,
    /// Number of replicas.
    pub repeat: usize,
}

impl Segment {
    /// Number of output rows covered by the replicas.
    pub fn output_length(&self) -> usize {
        self.length * self.repeat
    }
}

/// Where every input sequence lands once expanded.
///
/// Building the plan is the sequential prefix sum over the repeat counts; once it is
/// known, every output row can be written independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandPlan {
    segments: Vec<Segment>,
    input_rows: usize,
    output_rows: usize,
}

impl ExpandPlan {
    /// Plans the expansion of the sequences delimited by `input_offsets`, sequence `i`
    /// being repeated `repeats[i]` times.
    pub fn new(input_offsets: &[usize], repeats: &[usize]) -> Result<Self> {
        let input_rows = input_offsets.last().copied().unwrap_or(0);
        check_offsets(input_offsets, input_rows)?;

        let num_segments = input_offsets.len() - 1;
        if repeats.len() != num_segments {
            return Err(Error::invalid_argument(format!(
                "got {} repeat counts for {num_segments} sequences",
                repeats.len()
            )));
        }

        let mut segments = Vec::with_capacity(num_segments);
        let mut output_rows: usize = 0;

        for (i, repeat) in repeats.iter().enumerate() {
            let input_start = input_offsets[i];
            let length = input_offsets[i + 1] - input_start;
            let output_length = length
                .checked_mul(*repeat)
                .filter(|output_length| output_rows.checked_add(*output_length).is_some())
                .ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "repeating sequence {i} {repeat} times overflows the row count"
                    ))
                })?;

            segments.push(Segment::new(input_start, length, output_rows, *repeat));
            output_rows += output_length;
        }

        Ok(Self {
            segments,
            input_rows,
            output_rows,
        })
    }

    /// Recovers the plan of a previous expansion from the first LoD level of its output.
    ///
    /// The repeat count of sequence `i` is the length of output group `i` divided by the
    /// length of input sequence `i`.
    pub fn from_output_offsets(output_offsets: &[usize], input_offsets: &[usize]) -> Result<Self> {
        let input_rows = input_offsets.last().copied().unwrap_or(0);
        check_offsets(input_offsets, input_rows)?;
        let output_rows = output_offsets.last().copied().unwrap_or(0);
        check_offsets(output_offsets, output_rows)?;

        if output_offsets.len() != input_offsets.len() {
            return Err(Error::shape_mismatch(format!(
                "the output has {} sequences but the input has {}",
                output_offsets.len() - 1,
                input_offsets.len() - 1
            )));
        }

        let mut segments = Vec::with_capacity(input_offsets.len() - 1);

        for i in 0..input_offsets.len() - 1 {
            let length = input_offsets[i + 1] - input_offsets[i];
            let output_length = output_offsets[i + 1] - output_offsets[i];

            let repeat = match length {
                0 if output_length == 0 => 0,
                0 => {
                    return Err(Error::shape_mismatch(format!(
                        "sequence {i} is empty but owns {output_length} output rows"
                    )))
                }
                length if output_length % length == 0 => output_length / length,
                length => {
                    return Err(Error::shape_mismatch(format!(
                        "sequence {i} has {length} rows, which does not divide its \
                         {output_length} output rows"
                    )))
                }
            };

            segments.push(Segment::new(
                input_offsets[i],
                length,
                output_offsets[i],
                repeat,
            ));
        }

        Ok(Self {
            segments,
            input_rows,
            output_rows,
        })
    }

    /// The planned sequences.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of input rows.
    pub fn input_rows(&self) -> usize {
        self.input_rows
    }

    /// Number of output rows.
    pub fn output_rows(&self) -> usize {
        self.output_rows
    }

    /// The repeat count of every sequence.
    pub fn repeats(&self) -> Vec<usize> {
        self.segments.iter().map(|segment| segment.repeat).collect()
    }

    /// One group per input sequence, spanning all of its replicas.
    pub fn output_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.segments.len() + 1);
        offsets.push(0);
        offsets.extend(
            self.segments
                .iter()
                .map(|segment| segment.output_start + segment.output_length()),
        );

        offsets
    }

    /// One boundary after every replica.
    pub fn replica_offsets(&self) -> Vec<usize> {
        let mut offsets = vec![0];

        for segment in self.segments.iter() {
            for replica in 1..=segment.repeat {
                offsets.push(segment.output_start + replica * segment.length);
            }
        }

        offsets
    }

    /// The input row copied to each output row.
    pub fn source_rows(&self) -> Vec<usize> {
        let mut sources = Vec::with_capacity(self.output_rows);

        for segment in self.segments.iter() {
            for _ in 0..segment.repeat {
                sources.extend(segment.input_start..segment.input_start + segment.length);
            }
        }

        sources
    }

    /// Where the replicas of every input row live: the first output row, the distance
    /// between two replicas and the number of replicas.
    pub fn replicas_of_rows(&self) -> Vec<RowReplicas> {
        let mut replicas = Vec::with_capacity(self.input_rows);

        for segment in self.segments.iter() {
            replicas.extend((0..segment.length).map(|position| {
                RowReplicas::new(
                    segment.output_start + position,
                    segment.length,
                    segment.repeat,
                )
            }));
        }

        replicas
    }

    /// The LoD of the expanded output given the LoD of the input.
    ///
    /// The first level groups the replicas of each input sequence. When the input had
    /// its own LoD, the second level marks every replica and the finer input levels are
    /// repeated along with their sequence.
    pub fn expand_lod(&self, input: &Lod) -> Lod {
        let mut levels = vec![self.output_offsets()];

        if !input.is_empty() {
            levels.push(self.replica_offsets());
            levels.extend(
                input
                    .levels()
                    .iter()
                    .skip(1)
                    .map(|level| self.repeat_level(level)),
            );
        }

        Lod::new(levels)
    }

    fn repeat_level(&self, level: &[usize]) -> Vec<usize> {
        let mut result = vec![0];
        let mut cursor = 0;

        for segment in self.segments.iter() {
            let end = segment.input_start + segment.length;
            // Empty sub-sequences sitting on a boundary belong to the sequence that ends there.
            let last = level.partition_point(|offset| *offset <= end) - 1;
            let inner = &level[cursor..=last];

            for _ in 0..segment.repeat {
                for pair in inner.windows(2) {
                    let previous = result[result.len() - 1];
                    result.push(previous + pair[1] - pair[0]);
                }
            }

            cursor = last;
        }

        result
    }
}

/// The replicas of a single input row in the expanded output.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowReplicas {
    /// Output row of the first replica.
    pub first: usize,
    /// Distance between two consecutive replicas.
    pub stride: usize,
    /// Number of replicas.
    pub count: usize,
}
