use std::collections::HashMap;

/// Similarity of two strings in `[0, 1]`, computed as `2 * M / T` where `M` is the
/// number of characters covered by recursively found longest common blocks and `T`
/// is the combined character count. Two empty strings are identical.
#[must_use]
pub fn ratio(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_characters(&left, &right);
    2.0 * matched as f64 / total as f64
}

fn matching_characters(left: &[char], right: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (index, ch) in right.iter().enumerate() {
        positions.entry(*ch).or_default().push(index);
    }

    let mut matched = 0;
    let mut pending = vec![(0, left.len(), 0, right.len())];
    while let Some((left_lo, left_hi, right_lo, right_hi)) = pending.pop() {
        let block = longest_block(left, &positions, left_lo, left_hi, right_lo, right_hi);
        if block.size == 0 {
            continue;
        }

        matched += block.size;
        if left_lo < block.left && right_lo < block.right {
            pending.push((left_lo, block.left, right_lo, block.right));
        }
        let left_end = block.left + block.size;
        let right_end = block.right + block.size;
        if left_end < left_hi && right_end < right_hi {
            pending.push((left_end, left_hi, right_end, right_hi));
        }
    }

    matched
}

#[derive(Debug, Clone, Copy)]
struct Block {
    left: usize,
    right: usize,
    size: usize,
}

/// Longest common run inside the given ranges; the earliest one wins on ties.
fn longest_block(
    left: &[char],
    positions: &HashMap<char, Vec<usize>>,
    left_lo: usize,
    left_hi: usize,
    right_lo: usize,
    right_hi: usize,
) -> Block {
    let mut best = Block {
        left: left_lo,
        right: right_lo,
        size: 0,
    };
    // run length of the match ending at right index j, for the previous left row
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for (i, ch) in left.iter().enumerate().take(left_hi).skip(left_lo) {
        let mut next_lengths = HashMap::new();
        if let Some(indices) = positions.get(ch) {
            for &j in indices {
                if j < right_lo {
                    continue;
                }
                if j >= right_hi {
                    break;
                }
                let previous = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0);
                let length = previous + 1;
                next_lengths.insert(j, length);
                if length > best.size {
                    best = Block {
                        left: i + 1 - length,
                        right: j + 1 - length,
                        size: length,
                    };
                }
            }
        }
        run_lengths = next_lengths;
    }

    best
}
