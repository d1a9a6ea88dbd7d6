use proptest::prelude::*;
use wordcloud_rs::{
    ApproximateMetrics, Canvas, Layout, LayoutConfig, Theme, Word, XorShift64Star,
    compute_layout, intersects, is_in_bounds, normalize_words,
};

fn word_list() -> impl Strategy<Value = Vec<Word>> {
    prop::collection::vec(("[A-Za-z]{1,12}", 0.1f64..10.0), 1..20).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(text, score)| Word::new(text, score))
            .collect()
    })
}

fn lay_out(words: &[Word], seed: u64) -> Layout {
    let config = LayoutConfig {
        padding: 4.0,
        base_font_size: 500.0,
        ..LayoutConfig::default()
    };
    let mut rng = XorShift64Star::new(seed);
    compute_layout(
        words,
        Canvas::new(1000, 800),
        &Theme::dark(),
        &config,
        &mut ApproximateMetrics,
        &mut rng,
    )
    .expect("sparse canvas should always fit")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn placed_rects_never_overlap(words in word_list(), seed in any::<u64>()) {
        let layout = lay_out(&words, seed);
        prop_assert_eq!(layout.words.len(), words.len());
        for (i, a) in layout.words.iter().enumerate() {
            for b in layout.words.iter().skip(i + 1) {
                prop_assert!(!intersects(&a.rect, &b.rect), "{:?} overlaps {:?}", a.rect, b.rect);
            }
        }
    }

    #[test]
    fn placed_rects_stay_on_canvas(words in word_list(), seed in any::<u64>()) {
        let layout = lay_out(&words, seed);
        for word in &layout.words {
            prop_assert!(is_in_bounds(&word.rect, 1000.0, 800.0), "{:?}", word.rect);
            prop_assert!(word.font_size > 0.0);
        }
    }

    #[test]
    fn normalized_scores_sum_to_one(words in word_list()) {
        let normalized = normalize_words(&words).unwrap();
        let total: f64 = normalized.iter().map(|w| w.score).sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "sum was {}", total);
        for pair in normalized.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn same_seed_same_layout(words in word_list(), seed in any::<u64>()) {
        let first = lay_out(&words, seed);
        let second = lay_out(&words, seed);
        prop_assert_eq!(first.words.len(), second.words.len());
        for (a, b) in first.words.iter().zip(&second.words) {
            prop_assert_eq!(&a.word.text, &b.word.text);
            prop_assert_eq!(a.rect, b.rect);
            prop_assert_eq!(a.font_size, b.font_size);
        }
    }
}
