use crate::rng::RandomSource;

use super::{Layout, LayoutError, LayoutResult};

/// Shuffles a copy of `palette` and hands its colors out cyclically in
/// commit order. The shuffled palette is stored on the layout and returned.
pub fn assign_colors(
    layout: &mut Layout,
    palette: &[String],
    rng: &mut dyn RandomSource,
) -> LayoutResult<Vec<String>> {
    if palette.is_empty() {
        return Err(LayoutError::InvalidInput(
            "color palette must not be empty".to_string(),
        ));
    }
    let mut shuffled = palette.to_vec();
    shuffle(&mut shuffled, rng);
    for (position, word) in layout.words.iter_mut().enumerate() {
        word.color_index = position % shuffled.len();
    }
    layout.palette = shuffled.clone();
    Ok(shuffled)
}

/// Fisher-Yates.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Word;
    use crate::layout::geometry::Rect;
    use crate::layout::types::WordLayout;
    use crate::rng::XorShift64Star;

    fn layout_with(count: usize) -> Layout {
        let mut layout = Layout::empty(100.0, 100.0, 0.0, "Arial");
        for i in 0..count {
            layout.words.push(WordLayout {
                word: Word::new(format!("w{i}"), 1.0),
                rect: Rect::new(i as f64, 0.0, 1.0, 1.0),
                font_size: 10.0,
                opacity: 1.0,
                color_index: 0,
                source_index: i,
                ascent: 7.0,
                descent: 2.0,
                attempts: 1,
                shrinks: 0,
            });
        }
        layout
    }

    fn palette(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn colors_cycle_in_commit_order() {
        let mut layout = layout_with(7);
        let mut rng = XorShift64Star::new(9);
        let shuffled = assign_colors(&mut layout, &palette(&["a", "b", "c"]), &mut rng).unwrap();
        let indices: Vec<usize> = layout.words.iter().map(|w| w.color_index).collect();
        assert_eq!(indices, [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(layout.palette, shuffled);
        assert_eq!(layout.color_of(&layout.words[4]), Some(shuffled[1].as_str()));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let original = palette(&["red", "green", "blue", "cyan", "magenta"]);
        let mut layout = layout_with(1);
        let mut rng = XorShift64Star::new(1234);
        let mut shuffled = assign_colors(&mut layout, &original, &mut rng).unwrap();
        shuffled.sort();
        let mut expected = original.clone();
        expected.sort();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn caller_palette_is_not_reordered() {
        let original = palette(&["1", "2", "3", "4", "5", "6"]);
        let copy = original.clone();
        let mut layout = layout_with(3);
        let mut rng = XorShift64Star::new(77);
        let _ = assign_colors(&mut layout, &original, &mut rng).unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn shuffle_reaches_every_position() {
        let mut rng = XorShift64Star::new(2024);
        let mut first_seen = [false; 4];
        for _ in 0..200 {
            let mut items = [0usize, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            first_seen[items[0]] = true;
        }
        assert!(first_seen.iter().all(|s| *s));
    }

    #[test]
    fn empty_palette_is_rejected() {
        let mut layout = layout_with(2);
        let mut rng = XorShift64Star::new(1);
        assert!(matches!(
            assign_colors(&mut layout, &[], &mut rng),
            Err(LayoutError::InvalidInput(_))
        ));
    }
}
