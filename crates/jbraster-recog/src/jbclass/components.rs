//! Component extraction for symbol classification

use super::types::JbComponent;
use crate::error::{RecogError, RecogResult};
use jbraster_core::{Bitmap, Bitmaps, Boxa, SizeRelation, SizeSelect};
use jbraster_morph::{BoundaryCondition, MorphSequence, close_brick, dilate_brick, morph_sequence};
use jbraster_region::{ConnectivityType, conn_components_bb, conn_components_bitmaps};
use jbraster_transform::{expand_replicate, reduce_rank_binary_cascade};

/// Resolution above which the page is reduced before building a word mask
const MAX_WORD_COMP_RES: u32 = 200;

/// Resolution assumed when the bitmap carries none
const DEFAULT_XRES: u32 = 150;

/// Number of 2x1 dilations tried when sizing the word mask
const MAX_WORD_DILATIONS: usize = 12;

/// Closing that joins the pieces of a character (dots, broken strokes)
const CHARACTER_CLOSING: &str = "c1.6";

/// Extract the components of `src` of the given kind.
///
/// Components wider than `max_width` or taller than `max_height` are
/// dropped. Returns the component bitmaps (each carrying its box) and the
/// boxes locating them in `src`.
///
/// - [`JbComponent::ConnComps`]: 8-connected components.
/// - [`JbComponent::Characters`]: 8-connected components of `src` closed
///   with a 1x6 vertical brick; each bitmap is the closed component ANDed
///   with `src`, so the closing never adds pixels.
/// - [`JbComponent::Words`]: 4-connected components of a word mask (see
///   [`word_mask_by_dilation`]), each bitmap clipped from `src`. Pages
///   above 200 ppi are reduced by 2 or 4 before the mask is built.
pub fn get_components(
    src: &Bitmap,
    kind: JbComponent,
    max_width: u32,
    max_height: u32,
) -> RecogResult<(Bitmaps, Boxa)> {
    let comps = match kind {
        JbComponent::ConnComps => conn_components_bitmaps(src, ConnectivityType::EightWay)?.1,
        JbComponent::Characters => character_components(src)?,
        JbComponent::Words => word_components(src)?,
    };

    let kept = comps.select_by_size(
        max_width,
        max_height,
        SizeSelect::IfBoth,
        SizeRelation::LessThanOrEqual,
    );
    log::debug!(
        "get_components: {:?} kept {} of {} (max {}x{})",
        kind,
        kept.len(),
        comps.len(),
        max_width,
        max_height
    );
    let boxa = kept.boxes().clone();
    Ok((kept, boxa))
}

fn character_components(src: &Bitmap) -> RecogResult<Bitmaps> {
    let sequence: MorphSequence = CHARACTER_CLOSING.parse()?;
    let closed = morph_sequence(src, &sequence, BoundaryCondition::default())?;
    let (_, comps) = conn_components_bitmaps(&closed, ConnectivityType::EightWay)?;

    let (bitmaps, boxes) = comps.into_parts();
    let mut out = Bitmaps::with_capacity(bitmaps.len());
    for (comp, b) in bitmaps.into_iter().zip(boxes) {
        let (orig, _) = src
            .clip_rectangle(&b)?
            .ok_or_else(|| RecogError::InvalidParameter(format!("component box {b:?} outside image")))?;
        out.push_with_box(comp.and(&orig)?, b)?;
    }
    Ok(out)
}

fn word_components(src: &Bitmap) -> RecogResult<Bitmaps> {
    let res = resolution_or_default(src);
    let (reduced, factor) = if res <= MAX_WORD_COMP_RES {
        (src.clone(), 1)
    } else if res <= 2 * MAX_WORD_COMP_RES {
        (reduce_rank_binary_cascade(src, &[1])?, 2)
    } else {
        (reduce_rank_binary_cascade(src, &[1, 1])?, 4)
    };

    let (mask, size) = word_mask_by_dilation(&reduced)?;
    let mask = expand_replicate(&mask, factor, factor)?;
    log::debug!("word_components: {res} ppi, reduction {factor}, closing size {size}");

    let boxa = conn_components_bb(&mask, ConnectivityType::FourWay)?;
    let mut out = Bitmaps::with_capacity(boxa.len());
    for b in boxa {
        if let Some((word, clipped)) = src.clip_rectangle(&b)? {
            out.push_with_box(word, clipped)?;
        }
    }
    Ok(out)
}

fn resolution_or_default(bm: &Bitmap) -> u32 {
    match bm.xres() {
        0 => DEFAULT_XRES,
        res => res,
    }
}

/// Word mask by horizontal closing, with the closing size chosen from the
/// page itself.
///
/// The page is dilated by a 2x1 brick up to 12 times, counting 4-connected
/// components after each step. Once the count falls below 30% of the
/// undilated count, letters have merged into words; the step where that
/// happens (plus one, plus one more above 110 ppi, at least 2) sets the
/// size of the closing. Returns the mask and the closing width.
pub fn word_mask_by_dilation(src: &Bitmap) -> RecogResult<(Bitmap, u32)> {
    let mut counts = Vec::with_capacity(MAX_WORD_DILATIONS + 1);
    let mut dilated = src.clone();
    counts.push(conn_components_bb(&dilated, ConnectivityType::FourWay)?.len());
    for _ in 0..MAX_WORD_DILATIONS {
        dilated = dilate_brick(&dilated, 2, 1)?;
        counts.push(conn_components_bb(&dilated, ConnectivityType::FourWay)?.len());
    }

    let total = counts[0] as f64;
    let mut ibest = 2u32;
    for (i, &n) in counts.iter().enumerate().skip(1) {
        if (n as f64) < 0.3 * total {
            ibest = i as u32 + 1;
            break;
        }
    }
    if resolution_or_default(src) > 110 {
        ibest += 1;
    }
    let ibest = ibest.max(2);
    log::debug!("word_mask_by_dilation: counts {counts:?}, closing {}x1", ibest + 1);

    let mask = close_brick(src, ibest + 1, 1, BoundaryCondition::default())?;
    Ok((mask, ibest + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [u32; 6] = [4, 5, 4, 3, 6, 4];

    /// Six "words" of block letters, two pixels apart inside a word and ten
    /// pixels apart between words, with every length multiplied by `scale`.
    fn words_page(scale: i32) -> Bitmap {
        let mut bm = Bitmap::new(220 * scale as u32, 20 * scale as u32).unwrap();
        let mut x = 5;
        for letters in WORDS {
            for _ in 0..letters {
                bm.set_region(x * scale, 6 * scale, 4 * scale, 6 * scale).unwrap();
                x += 6;
            }
            x += 8;
        }
        bm
    }

    #[test]
    fn test_conn_comps_size_filter() {
        let mut bm = Bitmap::new(40, 20).unwrap();
        bm.set_region(1, 1, 5, 5).unwrap();
        bm.set_region(10, 1, 20, 3).unwrap();
        bm.set_pixel(35, 15, true).unwrap();

        let (all, boxes) = get_components(&bm, JbComponent::ConnComps, 100, 100).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(boxes.len(), 3);

        let (small, boxes) = get_components(&bm, JbComponent::ConnComps, 10, 10).unwrap();
        assert_eq!(small.dimensions(), vec![(5, 5), (1, 1)]);
        assert_eq!(boxes.get(1).unwrap().x, 35);
    }

    #[test]
    fn test_characters_join_dots() {
        // An "i": stem with a dot two pixels above it
        let mut bm = Bitmap::new(12, 20).unwrap();
        bm.set_region(5, 4, 2, 2).unwrap();
        bm.set_region(5, 8, 2, 8).unwrap();

        let (cc, _) = get_components(&bm, JbComponent::ConnComps, 50, 50).unwrap();
        assert_eq!(cc.len(), 2);

        let (chars, boxes) = get_components(&bm, JbComponent::Characters, 50, 50).unwrap();
        assert_eq!(chars.len(), 1);
        assert_eq!(boxes.get(0).unwrap().h, 12);
        // the closing bridges the gap, but only original pixels are kept
        assert_eq!(chars.get(0).unwrap().count_pixels(), bm.count_pixels());
    }

    #[test]
    fn test_word_mask_merges_letters() {
        let page = words_page(1);
        let (mask, size) = word_mask_by_dilation(&page).unwrap();
        // letters merge after two dilations; +1 for the default 150 ppi
        assert_eq!(size, 5);
        let words = conn_components_bb(&mask, ConnectivityType::FourWay).unwrap();
        assert_eq!(words.len(), WORDS.len());
    }

    #[test]
    fn test_words_at_high_resolution() {
        let page = words_page(1);
        let (words, boxes) = get_components(&page, JbComponent::Words, 200, 200).unwrap();
        assert_eq!(words.len(), WORDS.len());
        assert_eq!(boxes.get(0).unwrap(), jbraster_core::Box::new_unchecked(5, 6, 22, 6));

        // The same page drawn at 300 ppi is reduced by 2 before masking.
        let mut big = words_page(2);
        big.set_resolution(300, 300);
        let (words, boxes) = get_components(&big, JbComponent::Words, 200, 200).unwrap();
        assert_eq!(words.len(), WORDS.len());
        assert_eq!(boxes.get(0).unwrap(), jbraster_core::Box::new_unchecked(10, 12, 44, 12));
        let total: u64 = words.iter().map(|w| w.count_pixels()).sum();
        assert_eq!(total, big.count_pixels());
    }
}
