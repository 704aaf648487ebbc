use spectral_watermark as wm;
mod util;
use util::{generate_fixed_normal_sequence, norm, textured_image};

#[test]
fn test_single_simple() {
    // ================ Start of embedding section. ================

    let orig_image = textured_image(128, 96, 7);
    let config = wm::WatermarkConfig::new(1000, 0.1);

    // Create a (fixed) watermark to embed.
    let embedded_mark = wm::Watermark::from(generate_fixed_normal_sequence(1, 1000));

    // Write the watermark.
    let writer = wm::Writer::new(orig_image.clone(), config).unwrap();
    let res = writer.mark_with(&embedded_mark).unwrap();
    assert_eq!(res.dimensions(), orig_image.dimensions());

    // ================ End of embedding section. ================

    // ================ Start of extraction section. ================

    let reader = wm::Reader::base(&orig_image, config).unwrap();
    let derived = wm::Reader::derived(&res);
    let extracted_mark = reader.extract(&derived).unwrap();
    assert_eq!(extracted_mark.len(), embedded_mark.len());

    // ================ End of extraction section. ================

    // Only float rounding separates the extracted mark from the inserted mark.
    let max_error = embedded_mark
        .data()
        .iter()
        .zip(extracted_mark.data().iter())
        .map(|(av, bv)| (*av - *bv).abs())
        .fold(0.0, f64::max);
    assert!(max_error < 0.01, "max error {max_error}");

    // ================ Start of testing section. ================

    let tester = wm::Tester::new(extracted_mark.data());
    let embedded_sim = tester.similarity(embedded_mark.data()).unwrap();

    // Recovery is near exact, so the similarity is the norm of the mark, about sqrt(1000).
    assert!((embedded_sim.similarity - norm(embedded_mark.data())).abs() < 0.01);
    assert!(embedded_sim.exceeds_sigma(25.0));

    // ================ End of testing section. ================

    // Create a new watermark, and calculate that similarity.
    let random_mark = generate_fixed_normal_sequence(0xBAAAAAAD, 1000);
    let random_sim = tester.similarity(&random_mark).unwrap();

    // An unrelated mark is N(0, 1) distributed.
    assert!(!random_sim.exceeds_sigma(4.0));
    assert!(embedded_sim.similarity - random_sim.similarity > 2.0);
}

#[test]
fn test_seeded_embedding_is_reproducible() {
    let image = textured_image(64, 64, 3);
    let config = wm::WatermarkConfig::new(200, 0.3);

    let (marked_a, mark_a) = wm::embed_seeded(&image, config, Some(99)).unwrap();
    let (marked_b, mark_b) = wm::embed_seeded(&image, config, Some(99)).unwrap();
    assert_eq!(mark_a, mark_b);
    assert_eq!(marked_a, marked_b);

    let (_, mark_c) = wm::embed_seeded(&image, config, Some(100)).unwrap();
    assert_ne!(mark_a, mark_c);

    // Every call draws a new watermark from the source it is given.
    let (_, mark_d) = wm::embed_seeded(&image, config, None).unwrap();
    let (_, mark_e) = wm::embed_seeded(&image, config, None).unwrap();
    assert_ne!(mark_d, mark_e);
}

#[test]
fn test_non_square_image() {
    let image = textured_image(75, 40, 11);
    let config = wm::WatermarkConfig::new(300, 0.5);
    let (marked, mark) = util::embed_watermark_into(&image, config, 12);
    let extracted = wm::extract(&image, &marked, config).unwrap();
    let sim = wm::similarity(mark.data(), extracted.data()).unwrap();
    assert!((sim - norm(mark.data())).abs() < 0.01, "similarity {sim}");
}
