// tests/extract_engine.rs
mod common;

use common::ScriptedQa;
use gold_rate_finder::config::RatesConfig;
use gold_rate_finder::extract::PriceExtractor;
use gold_rate_finder::qa_adapter::MockQa;
use std::sync::Arc;

fn extractor(qa: Arc<ScriptedQa>) -> PriceExtractor {
    PriceExtractor::new(qa, &RatesConfig::default()).expect("extractor")
}

#[tokio::test]
async fn single_accepted_answer_is_returned() {
    let qa = Arc::new(ScriptedQa::new(vec![("tola", Ok("Rs 550,000"))]));
    let ex = extractor(qa.clone());
    let got = ex
        .best_price("Markets were calm. Gold per tola is now 550,000 rupees. Nothing else.")
        .await;
    assert_eq!(got, Some(550_000));
    assert_eq!(qa.call_count(), 1, "only the candidate sentence reaches QA");
}

#[tokio::test]
async fn maximum_of_accepted_answers_wins() {
    let qa = Arc::new(ScriptedQa::new(vec![
        ("ten grams", Ok("480,000")),
        ("per tola", Ok("610,000")),
    ]));
    let ex = extractor(qa.clone());
    let text = "Gold for ten grams sold at 480,000. Gold per tola sold at 610,000.";
    assert_eq!(ex.best_price(text).await, Some(610_000));
    assert_eq!(qa.call_count(), 2);
}

#[tokio::test]
async fn no_accepted_answer_means_no_price() {
    let qa = Arc::new(ScriptedQa::new(vec![("tola", Ok("12 grams"))]));
    let ex = extractor(qa);
    assert_eq!(ex.best_price("Gold per tola at 532,400.").await, None);
}

#[tokio::test]
async fn text_without_candidates_never_calls_qa() {
    let qa = Arc::new(ScriptedQa::new(vec![]));
    let ex = extractor(qa.clone());
    assert_eq!(ex.best_price("Gold up 12 points. Silver at 5,100!").await, None);
    assert_eq!(ex.best_price("").await, None);
    assert_eq!(qa.call_count(), 0);
}

#[tokio::test]
async fn failing_inference_skips_only_that_unit() {
    let qa = Arc::new(ScriptedQa::new(vec![
        ("broken", Err("model overloaded")),
        ("works", Ok("523,000")),
    ]));
    let ex = extractor(qa.clone());
    let text = "This broken sentence says 600,000. This one works at 523,000.";
    assert_eq!(ex.best_price(text).await, Some(523_000));
    assert_eq!(qa.call_count(), 2);
}

#[tokio::test]
async fn extract_unit_propagates_inference_errors() {
    let qa = Arc::new(ScriptedQa::new(vec![("x", Err("boom"))]));
    let ex = extractor(qa);
    assert!(ex.extract_unit("x 532,400").await.is_err());
}

#[tokio::test]
async fn range_gate_after_extraction_is_exclusive() {
    let qa = Arc::new(ScriptedQa::new(vec![
        ("lower", Ok("400,000")),
        ("upper", Ok("900,000")),
        ("just above", Ok("400,001")),
        ("just below", Ok("899,999")),
    ]));
    let ex = extractor(qa);
    assert_eq!(ex.extract_unit("lower 532,400").await.unwrap(), None);
    assert_eq!(ex.extract_unit("upper 532,400").await.unwrap(), None);
    assert_eq!(ex.extract_unit("just above 532,400").await.unwrap(), Some(400_001));
    assert_eq!(ex.extract_unit("just below 532,400").await.unwrap(), Some(899_999));
}

#[tokio::test]
async fn answer_outside_range_is_discarded_even_if_precheck_passed() {
    // Pre-check sees 532,400 but QA picks the per-gram figure.
    let qa = Arc::new(ScriptedQa::new(vec![("gram", Ok("45,640"))]));
    let ex = extractor(qa);
    assert_eq!(
        ex.best_price("Per gram Rs45,640 and per tola Rs532,400.").await,
        None
    );
}

#[tokio::test]
async fn retargeted_range_changes_acceptance() {
    let cfg = RatesConfig::from_toml_str(
        r#"
[range]
min = 1000
max = 10000

[candidates]
min_digits = 4
max_digits = 5
"#,
    )
    .unwrap();
    let ex = PriceExtractor::new(Arc::new(MockQa), &cfg).unwrap();
    assert_eq!(ex.best_price("Silver per tola is Rs5,100 today.").await, Some(5_100));
    assert_eq!(ex.best_price("Gold per tola is Rs532,400 today.").await, None);
}
