use crate::ir::{NormalizedWord, Word};

use super::{LayoutError, LayoutResult};

/// Sorts a copy of `words` by descending score and divides each score by
/// the total. Ties keep their input order.
pub fn normalize_words(words: &[Word]) -> LayoutResult<Vec<NormalizedWord>> {
    if words.is_empty() {
        return Err(LayoutError::InvalidInput(
            "at least one word is required".to_string(),
        ));
    }
    for word in words {
        if !word.score.is_finite() || word.score <= 0.0 {
            return Err(LayoutError::InvalidInput(format!(
                "word '{}' has non-positive score {}",
                word.text, word.score
            )));
        }
    }

    let mut order: Vec<usize> = (0..words.len()).collect();
    // sort_by is stable, so equal scores stay in input order.
    order.sort_by(|a, b| words[*b].score.total_cmp(&words[*a].score));

    let total: f64 = words.iter().map(|w| w.score).sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(LayoutError::InvalidInput(format!(
            "total score must be positive and finite, got {total}"
        )));
    }

    Ok(order
        .into_iter()
        .map(|index| NormalizedWord {
            text: words[index].text.clone(),
            score: words[index].score / total,
            index,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_sum_to_one() {
        let words = vec![
            Word::new("a", 3.0),
            Word::new("b", 0.7),
            Word::new("c", 12.25),
            Word::new("d", 0.05),
        ];
        let normalized = normalize_words(&words).unwrap();
        let sum: f64 = normalized.iter().map(|w| w.score).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sorts_descending_with_stable_ties() {
        let words = vec![
            Word::new("low", 1.0),
            Word::new("tie-first", 2.0),
            Word::new("high", 5.0),
            Word::new("tie-second", 2.0),
        ];
        let normalized = normalize_words(&words).unwrap();
        let texts: Vec<&str> = normalized.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["high", "tie-first", "tie-second", "low"]);
        assert_eq!(normalized[1].index, 1);
        assert_eq!(normalized[2].index, 3);
    }

    #[test]
    fn leaves_caller_slice_untouched() {
        let words = vec![Word::new("small", 1.0), Word::new("big", 9.0)];
        let before = words.clone();
        let _ = normalize_words(&words).unwrap();
        assert_eq!(words, before);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            normalize_words(&[]),
            Err(LayoutError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_zero_scores() {
        let words = vec![Word::new("a", 0.0), Word::new("b", 0.0)];
        assert!(matches!(
            normalize_words(&words),
            Err(LayoutError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_nan_and_negative_scores() {
        assert!(normalize_words(&[Word::new("nan", f64::NAN)]).is_err());
        assert!(normalize_words(&[Word::new("a", 2.0), Word::new("neg", -1.0)]).is_err());
    }
}
