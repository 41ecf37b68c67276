//! Morphological sequence operations
//!
//! A [`MorphSequence`] is a validated list of brick morphology, rank
//! reduction, expansion and border steps that [`morph_sequence`] applies in
//! order to a running bitmap.
//!
//! # Sequence String Format
//!
//! Operations are separated by `+` and whitespace is ignored.
//! Each operation begins with a case-insensitive character:
//!
//! - `d<w>.<h>` - Dilation with a w x h brick
//! - `e<w>.<h>` - Erosion with a w x h brick
//! - `o<w>.<h>` - Opening with a w x h brick
//! - `c<w>.<h>` - Closing with a w x h brick (border-safe)
//! - `r<levels>` - Rank reduction cascade, 1 to 4 digits each in 1..=4
//!   (`r23` reduces twice, at levels 2 then 3)
//! - `x<factor>` - Replicative expansion by 2, 4 or 8
//! - `b<size>` - Add an OFF border of `size` pixels; first step only
//!
//! Each rank level halves the image and each expansion by `f` multiplies it
//! by `f`. When a border is added the reductions and expansions must cancel
//! out, so that the border can be removed again after the last step.
//!
//! # Examples
//!
//! ```
//! use jbraster_morph::sequence::{MorphSequence, morph_sequence};
//! use jbraster_morph::BoundaryCondition;
//! use jbraster_core::Bitmap;
//!
//! let seq: MorphSequence = "b32 + o1.3 + r1 + x2".parse().unwrap();
//! assert_eq!(seq.len(), 4);
//!
//! let bm = Bitmap::new(100, 100).unwrap();
//! let out = morph_sequence(&bm, &seq, BoundaryCondition::Asymmetric).unwrap();
//! assert_eq!((out.width(), out.height()), (100, 100));
//! ```

use std::str::FromStr;

use crate::binary::{BoundaryCondition, close_safe_brick, dilate_brick, erode_brick, open_brick};
use crate::{MorphError, MorphResult};
use jbraster_core::Bitmap;
use jbraster_transform::{expand_binary_power2, reduce_rank_binary_cascade};

/// One step of a morphological sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MorphOp {
    /// Dilation with a brick
    Dilate { width: u32, height: u32 },
    /// Erosion with a brick
    Erode { width: u32, height: u32 },
    /// Opening (erosion followed by dilation)
    Open { width: u32, height: u32 },
    /// Border-safe closing (dilation followed by erosion)
    Close { width: u32, height: u32 },
    /// Cascade of 2x rank reductions, one per level
    RankReduce { levels: Vec<u8> },
    /// Replicative expansion
    Expand { factor: u32 },
    /// OFF border added around the image, removed after the last step
    AddBorder { size: u32 },
}

impl MorphOp {
    /// Change in the number of 2x reductions this step applies
    fn net_reduction(&self) -> i32 {
        match self {
            MorphOp::RankReduce { levels } => levels.len() as i32,
            MorphOp::Expand { factor } => -(factor.trailing_zeros() as i32),
            _ => 0,
        }
    }

    fn validate(&self, index: usize) -> MorphResult<()> {
        let bad = |msg: String| Err(MorphError::InvalidSequence(format!("op {}: {msg}", index + 1)));
        match self {
            MorphOp::Dilate { width, height }
            | MorphOp::Erode { width, height }
            | MorphOp::Open { width, height }
            | MorphOp::Close { width, height } => {
                if *width == 0 || *height == 0 {
                    return bad(format!("brick must be > 0, got {width}x{height}"));
                }
            }
            MorphOp::RankReduce { levels } => {
                if levels.is_empty() || levels.len() > 4 {
                    return bad(format!("rank reduction needs 1 to 4 levels, got {}", levels.len()));
                }
                if let Some(l) = levels.iter().find(|l| !(1..=4).contains(*l)) {
                    return bad(format!("rank level {l} not in 1..=4"));
                }
            }
            MorphOp::Expand { factor } => {
                if !matches!(factor, 2 | 4 | 8) {
                    return bad(format!("expansion factor must be 2, 4 or 8, got {factor}"));
                }
            }
            MorphOp::AddBorder { size } => {
                if index != 0 {
                    return bad("border may only be added as the first step".to_string());
                }
                if *size == 0 {
                    return bad("border size must be > 0".to_string());
                }
            }
        }
        Ok(())
    }

    fn parse(op_str: &str) -> MorphResult<Self> {
        let mut chars = op_str.chars();
        let Some(first) = chars.next() else {
            return Err(MorphError::InvalidSequence("empty operation".to_string()));
        };
        let rest = chars.as_str();

        match first.to_ascii_lowercase() {
            c @ ('d' | 'e' | 'o' | 'c') => {
                let (width, height) = parse_dimensions(rest)?;
                Ok(match c {
                    'd' => MorphOp::Dilate { width, height },
                    'e' => MorphOp::Erode { width, height },
                    'o' => MorphOp::Open { width, height },
                    _ => MorphOp::Close { width, height },
                })
            }
            'r' => {
                let levels = rest
                    .chars()
                    .map(|c| {
                        c.to_digit(10).map(|d| d as u8).ok_or_else(|| {
                            MorphError::InvalidSequence(format!(
                                "invalid rank level {c:?} in '{op_str}'"
                            ))
                        })
                    })
                    .collect::<MorphResult<Vec<u8>>>()?;
                Ok(MorphOp::RankReduce { levels })
            }
            'x' => Ok(MorphOp::Expand {
                factor: parse_number(rest, op_str)?,
            }),
            'b' => Ok(MorphOp::AddBorder {
                size: parse_number(rest, op_str)?,
            }),
            other => Err(MorphError::InvalidSequence(format!(
                "unknown operation '{other}' in '{op_str}'"
            ))),
        }
    }
}

fn parse_number(s: &str, op_str: &str) -> MorphResult<u32> {
    s.parse()
        .map_err(|_| MorphError::InvalidSequence(format!("invalid number '{s}' in '{op_str}'")))
}

/// Parse dimensions from a string like "3.5" -> (3, 5)
fn parse_dimensions(dim_str: &str) -> MorphResult<(u32, u32)> {
    let Some((w, h)) = dim_str.split_once('.') else {
        return Err(MorphError::InvalidSequence(format!(
            "invalid dimensions format '{dim_str}', expected 'width.height'"
        )));
    };
    let width: u32 = w.parse().map_err(|_| {
        MorphError::InvalidSequence(format!("invalid width '{w}' in '{dim_str}'"))
    })?;
    let height: u32 = h.parse().map_err(|_| {
        MorphError::InvalidSequence(format!("invalid height '{h}' in '{dim_str}'"))
    })?;
    Ok((width, height))
}

/// A validated morphological sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphSequence {
    ops: Vec<MorphOp>,
}

impl MorphSequence {
    /// Build a sequence from steps, validating every step and the border rule.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSequence`] if the list is empty, a step
    /// is out of range, a border is added anywhere but first, or a border
    /// is added while the net reduction does not return to zero.
    pub fn new(ops: Vec<MorphOp>) -> MorphResult<Self> {
        if ops.is_empty() {
            return Err(MorphError::InvalidSequence("empty sequence".to_string()));
        }
        for (i, op) in ops.iter().enumerate() {
            op.validate(i)?;
        }
        let netred: i32 = ops.iter().map(MorphOp::net_reduction).sum();
        let has_border = matches!(ops.first(), Some(MorphOp::AddBorder { .. }));
        if has_border && netred != 0 {
            return Err(MorphError::InvalidSequence(format!(
                "border added but net reduction is {netred}, not 0"
            )));
        }
        Ok(Self { ops })
    }

    /// Parse a sequence string such as `"b32 + d3.3 + r23 + x4"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jbraster_morph::sequence::MorphSequence;
    ///
    /// let seq = MorphSequence::parse("d3.3 + e5.5").unwrap();
    /// assert_eq!(seq.ops().len(), 2);
    /// ```
    pub fn parse(sequence: &str) -> MorphResult<Self> {
        if sequence.trim().is_empty() {
            return Err(MorphError::InvalidSequence("empty sequence".to_string()));
        }

        let mut ops = Vec::new();
        for (i, part) in sequence.split('+').enumerate() {
            let op_str: String = part.chars().filter(|c| !c.is_whitespace()).collect();
            if op_str.is_empty() {
                return Err(MorphError::InvalidSequence(format!(
                    "empty operation at position {}",
                    i + 1
                )));
            }
            ops.push(MorphOp::parse(&op_str)?);
        }
        Self::new(ops)
    }

    pub fn ops(&self) -> &[MorphOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Border size added by the first step, or 0
    pub fn border(&self) -> u32 {
        match self.ops.first() {
            Some(MorphOp::AddBorder { size }) => *size,
            _ => 0,
        }
    }
}

impl FromStr for MorphSequence {
    type Err = MorphError;

    fn from_str(s: &str) -> MorphResult<Self> {
        Self::parse(s)
    }
}

/// Run a sequence on a binary bitmap.
///
/// Each step is logged at `debug` level. A border added by the first step
/// is removed from the final result.
pub fn morph_sequence(
    src: &Bitmap,
    seq: &MorphSequence,
    bc: BoundaryCondition,
) -> MorphResult<Bitmap> {
    let mut current = src.clone();
    for (i, op) in seq.ops().iter().enumerate() {
        current = execute_op(&current, op, bc)?;
        log::debug!(
            "morph sequence step {}: {:?} -> {}x{}",
            i + 1,
            op,
            current.width(),
            current.height()
        );
    }
    let border = seq.border();
    if border > 0 {
        current = current.remove_border(border)?;
    }
    Ok(current)
}

fn execute_op(bm: &Bitmap, op: &MorphOp, bc: BoundaryCondition) -> MorphResult<Bitmap> {
    match op {
        MorphOp::Dilate { width, height } => dilate_brick(bm, *width, *height),
        MorphOp::Erode { width, height } => erode_brick(bm, *width, *height, bc),
        MorphOp::Open { width, height } => open_brick(bm, *width, *height, bc),
        MorphOp::Close { width, height } => close_safe_brick(bm, *width, *height, bc),
        MorphOp::RankReduce { levels } => {
            let levels: Vec<i32> = levels.iter().map(|&l| l as i32).collect();
            Ok(reduce_rank_binary_cascade(bm, &levels)?)
        }
        MorphOp::Expand { factor } => Ok(expand_binary_power2(bm, *factor)?),
        MorphOp::AddBorder { size } => Ok(bm.add_border(*size, false)?),
    }
}
