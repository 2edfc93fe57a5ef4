//! Guess evaluation
//!
//! A guess is right when the chosen cup and the ball cup map to the same
//! slot under the accumulated arrangement.

use super::permutation::{Permutation, PermutationError};

/// Was the ball under `selected`?
///
/// `ball_cup` is the original slot of the cup hiding the ball and `selected`
/// the cup the player picked. Both are compared through their images under
/// `cups`.
pub fn evaluate_guess(
    cups: &Permutation,
    ball_cup: usize,
    selected: usize,
) -> Result<bool, PermutationError> {
    let actual = cups.apply(ball_cup)?;
    let chosen = cups.apply(selected)?;
    log::debug!("Ball lands at {actual}, selection lands at {chosen}");
    Ok(actual == chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_arrangement() {
        let cups = Permutation::identity(3);
        assert_eq!(evaluate_guess(&cups, 1, 1), Ok(true));
        assert_eq!(evaluate_guess(&cups, 1, 0), Ok(false));
    }

    #[test]
    fn test_matches_image_equality() {
        let cups = Permutation::new(vec![2, 0, 1]).unwrap();
        for ball in 0..3 {
            for selected in 0..3 {
                let expected = cups.as_slice()[ball] == cups.as_slice()[selected];
                assert_eq!(evaluate_guess(&cups, ball, selected), Ok(expected));
            }
        }
        assert_eq!(evaluate_guess(&cups, 0, 0), Ok(true));
        assert_eq!(evaluate_guess(&cups, 0, 2), Ok(false));
    }

    #[test]
    fn test_out_of_range_selection() {
        let cups = Permutation::identity(3);
        assert!(evaluate_guess(&cups, 0, 3).is_err());
        assert!(evaluate_guess(&cups, 9, 0).is_err());
    }
}
