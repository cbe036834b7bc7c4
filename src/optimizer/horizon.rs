use std::ops::Range;

/// Splits `0..total_steps` into consecutive windows of `window_len` steps.
///
/// The final window is shorter when `total_steps` is not a multiple of
/// `window_len`; it is still solved with every constraint intact. With
/// `window_len >= total_steps` this degenerates to the single
/// perfect-foresight window.
pub fn windows(total_steps: usize, window_len: usize) -> impl Iterator<Item = Range<usize>> {
    assert!(window_len > 0, "window length must be positive");
    (0..total_steps)
        .step_by(window_len)
        .map(move |start| start..(start + window_len).min(total_steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_window_covers_whole_horizon() {
        let w: Vec<_> = windows(8760, 8760).collect();
        assert_eq!(w, vec![0..8760]);
    }

    #[test]
    fn day_windows_are_consecutive_and_non_overlapping() {
        let w: Vec<_> = windows(72, 24).collect();
        assert_eq!(w, vec![0..24, 24..48, 48..72]);
    }

    #[test]
    fn final_window_may_be_shorter() {
        let w: Vec<_> = windows(30, 24).collect();
        assert_eq!(w, vec![0..24, 24..30]);
    }

    #[test]
    fn empty_horizon_yields_no_windows() {
        assert_eq!(windows(0, 24).count(), 0);
    }

    proptest! {
        #[test]
        fn windows_partition_the_horizon(total in 0usize..2000, len in 1usize..100) {
            let covered: Vec<usize> = windows(total, len).flatten().collect();
            let expected: Vec<usize> = (0..total).collect();
            prop_assert_eq!(covered, expected);
        }

        #[test]
        fn only_the_last_window_is_short(total in 1usize..2000, len in 1usize..100) {
            let w: Vec<_> = windows(total, len).collect();
            for r in &w[..w.len() - 1] {
                prop_assert_eq!(r.len(), len);
            }
            prop_assert!(w[w.len() - 1].len() <= len);
        }
    }
}
