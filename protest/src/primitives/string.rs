//! String generator: a vector of shrinkable code points under the hood,
//! concatenated back into a `String` once shrinking settles.
//!
//! Length bounds are measured in UTF-16 code units, not codepoints: a
//! codepoint at or above U+10000 counts as 2 toward `min_len`/`max_len`.

use crate::generator::Arbitrary;
use crate::lazy_stream::LazyStream;
use crate::rng::Rng;
use crate::shrinkable::Shrinkable;

const SURROGATE_LOW: u32 = 0xd800;
const SURROGATE_HIGH: u32 = 0xdfff;
const MAX_CODE_POINT: u32 = 0x10ffff;
const MAX_BMP_CODE_POINT: u32 = 0xffff;

/// String generator with a UTF-16-code-unit length in `[min_len, max_len]`.
/// Never emits a surrogate codepoint (U+D800-U+DFFF).
pub fn string(min_len: usize, max_len: usize) -> Arbitrary<String> {
    Arbitrary::new(move |rng: &mut Rng| {
        let target_len = rng.gen_range_usize(min_len, max_len);
        let mut elems: Vec<Shrinkable<char>> = Vec::new();
        let mut remaining = target_len;
        while remaining > 0 {
            // Forcing a BMP char (weight 1) when exactly one unit of budget
            // is left guarantees the loop lands on target_len exactly,
            // since every other step's weight is <= remaining.
            let c = if remaining == 1 {
                random_bmp_char(rng)
            } else {
                random_char(rng)
            };
            remaining -= char_weight(c);
            elems.push(char_shrinkable(c));
        }
        shrink_string_vector(elems, min_len).map(|chars: Vec<char>| chars.into_iter().collect())
    })
}

fn char_weight(c: char) -> usize {
    if c as u32 >= 0x10000 {
        2
    } else {
        1
    }
}

fn utf16_len(chars: &[char]) -> usize {
    chars.iter().copied().map(char_weight).sum()
}

fn weighted_len_of(elems: &[Shrinkable<char>]) -> usize {
    elems.iter().map(|s| char_weight(s.value)).sum()
}

fn random_char_in_range(rng: &mut Rng, max_code_point: u32) -> char {
    loop {
        let candidate = rng.gen_range_u64(0x20, max_code_point as u64) as u32;
        if (SURROGATE_LOW..=SURROGATE_HIGH).contains(&candidate) {
            continue;
        }
        if let Some(c) = char::from_u32(candidate) {
            return c;
        }
    }
}

fn random_char(rng: &mut Rng) -> char {
    random_char_in_range(rng, MAX_CODE_POINT)
}

/// A char guaranteed to weigh 1 toward UTF-16 length (never a supplementary-
/// plane codepoint).
fn random_bmp_char(rng: &mut Rng) -> char {
    random_char_in_range(rng, MAX_BMP_CODE_POINT)
}

/// Shrink a single code point toward `'a'` if it sits above it, otherwise
/// toward 0, skipping the surrogate range on every candidate.
fn char_shrinkable(value: char) -> Shrinkable<char> {
    Shrinkable::new(value, move || char_children(value as u32))
}

fn char_children(code_point: u32) -> LazyStream<Shrinkable<char>> {
    let target = if code_point > b'a' as u32 { b'a' as u32 } else { 0 };
    if code_point == target {
        return LazyStream::empty();
    }
    bisect_code_point(target, code_point)
}

fn bisect_code_point(floor: u32, value: u32) -> LazyStream<Shrinkable<char>> {
    if floor >= value {
        return LazyStream::empty();
    }
    let mid = floor + (value - floor) / 2;
    if (SURROGATE_LOW..=SURROGATE_HIGH).contains(&mid) || char::from_u32(mid).is_none() {
        return bisect_code_point(floor, mid).concat(bisect_code_point(mid + 1, value));
    }
    let node = char_shrinkable(char::from_u32(mid).unwrap());
    LazyStream::cons(node, move || {
        bisect_code_point(floor, mid).concat(bisect_code_point(mid + 1, value))
    })
}

/// Length-then-element shrink over a vector of code points, weighting each
/// element by its UTF-16 code-unit count rather than by 1 per element, so
/// `min_len`/`max_len` are honored even when supplementary-plane chars are
/// present. Mirrors `vector_shrink::shrink_vector`'s structure.
fn shrink_string_vector(elems: Vec<Shrinkable<char>>, min_len: usize) -> Shrinkable<Vec<char>> {
    let value: Vec<char> = elems.iter().map(|s| s.value.clone()).collect();
    Shrinkable::new(value, move || {
        let length_shrinks = binary_search_string_lengths(0, elems.len(), min_len, elems.clone());
        let element_shrinks = string_element_shrink_from_position(elems.clone(), min_len, 0);
        length_shrinks.concat(element_shrinks)
    })
}

/// Binary search over index bounds `[floor_idx, ceil_idx)`, same halving
/// shape as `vector_shrink::binary_search_lengths`, but a candidate prefix
/// is only emitted when its weighted length still meets `min_len` — a
/// supplementary-plane char's weight of 2 means the right element count
/// isn't known up front, only discoverable by measuring the prefix.
fn binary_search_string_lengths(
    floor_idx: usize,
    ceil_idx: usize,
    min_len: usize,
    elems: Vec<Shrinkable<char>>,
) -> LazyStream<Shrinkable<Vec<char>>> {
    if floor_idx >= ceil_idx {
        return LazyStream::empty();
    }
    let mid = floor_idx + (ceil_idx - floor_idx) / 2;
    let truncated: Vec<Shrinkable<char>> = elems[..mid].to_vec();
    if weighted_len_of(&truncated) < min_len {
        // Too short: only more elements (the upper half) can recover.
        return binary_search_string_lengths(mid + 1, ceil_idx, min_len, elems);
    }
    let node = shrink_string_vector(truncated, min_len);
    let elems2 = elems.clone();
    LazyStream::cons(node, move || {
        binary_search_string_lengths(floor_idx, mid, min_len, elems2.clone())
            .concat(binary_search_string_lengths(mid, ceil_idx, min_len, elems2))
    })
}

fn string_element_shrink_from_position(
    elems: Vec<Shrinkable<char>>,
    min_len: usize,
    position: usize,
) -> LazyStream<Shrinkable<Vec<char>>> {
    if position >= elems.len() {
        return LazyStream::Empty;
    }
    let children = elems[position].children();
    let at_position = string_child_variants_at(elems.clone(), min_len, position, children);
    let elems2 = elems.clone();
    at_position.concat_thunk(std::rc::Rc::new(move || {
        string_element_shrink_from_position(elems2.clone(), min_len, position + 1)
    }))
}

/// Per-position element shrink, holding every other position fixed.
/// A char can only shrink toward a lower codepoint, so weighted length is
/// non-increasing here; only the lower bound needs guarding.
fn string_child_variants_at(
    elems: Vec<Shrinkable<char>>,
    min_len: usize,
    position: usize,
    children: LazyStream<Shrinkable<char>>,
) -> LazyStream<Shrinkable<Vec<char>>> {
    match children {
        LazyStream::Empty => LazyStream::Empty,
        LazyStream::Cons(head, tail) => {
            let mut replaced = elems.clone();
            replaced[position] = head;
            let elems2 = elems.clone();
            if weighted_len_of(&replaced) < min_len {
                return string_child_variants_at(elems2, min_len, position, tail());
            }
            let node = shrink_string_vector(replaced, min_len);
            LazyStream::cons(node, move || {
                string_child_variants_at(elems2.clone(), min_len, position, tail())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_strings_respect_length_bounds() {
        let gen = string(1, 8);
        let mut rng = Rng::from_seed_string("string-seed");
        for _ in 0..20 {
            let value = gen.generate(&mut rng).value;
            let chars: Vec<char> = value.chars().collect();
            let len = utf16_len(&chars);
            assert!(len >= 1 && len <= 8);
        }
    }

    #[test]
    fn supplementary_plane_char_counts_as_two_toward_length() {
        // U+1F600 is above U+10000 and must weigh 2, not 1.
        let chars = vec!['\u{1F600}'];
        assert_eq!(utf16_len(&chars), 2);
        assert_ne!(utf16_len(&chars), chars.len());
    }

    #[test]
    fn generated_strings_can_land_exactly_on_an_odd_target_length() {
        let gen = string(3, 3);
        let mut rng = Rng::from_seed_string("odd-length-seed");
        for _ in 0..20 {
            let value = gen.generate(&mut rng).value;
            let chars: Vec<char> = value.chars().collect();
            assert_eq!(utf16_len(&chars), 3);
        }
    }

    #[test]
    fn never_generates_a_surrogate_code_point() {
        let gen = string(0, 40);
        let mut rng = Rng::from_seed_string("surrogate-seed");
        for _ in 0..10 {
            let value = gen.generate(&mut rng).value;
            for c in value.chars() {
                let cp = c as u32;
                assert!(!(SURROGATE_LOW..=SURROGATE_HIGH).contains(&cp));
            }
        }
    }

    #[test]
    fn char_shrink_terminates_at_lowercase_a_or_zero() {
        let tree = char_shrinkable('z');
        for child in tree.children().to_vec() {
            assert!((child.value as u32) < 'z' as u32);
        }
    }
}
