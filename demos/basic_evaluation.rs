//! Basic evaluation example demonstrating core functionality.

use image::{Rgb, RgbImage};
use layout_eval::detection::classify_boxes;
use layout_eval::image_io::{encode_png, png_data_uri};
use layout_eval::metrics::calculate_iou;
use layout_eval::{
    evaluate, evaluate_layout, load_ground_truth_from_str, normalize_ground_truth, BoundingBox,
    EvaluationOptions, LabeledBox, PrecomputedDetector,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Layout Evaluation Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 60.0, 60.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 80.0, 80.0);
    let iou = calculate_iou(&bbox1, &bbox2);
    println!("   IoU between overlapping boxes: {:.4}", iou);
    println!();

    // Example 2: Load and normalize ground truth
    println!("2. Loading Ground Truth");
    let ground_truth_json = r#"{
        "categories": [
            {"id": 1, "name": "Title"},
            {"id": 2, "name": "Text"},
            {"id": 3, "name": "Table"}
        ],
        "annotations": [
            {"id": 1, "category_id": 1, "bbox": [40.0, 20.0, 320.0, 40.0]},
            {"id": 2, "category_id": 2, "bbox": [40.0, 80.0, 320.0, 120.0]},
            {"id": 3, "category_id": 3, "bbox": [40.0, 220.0, 320.0, 140.0]}
        ]
    }"#;

    let document = load_ground_truth_from_str(ground_truth_json)?;
    let ground_truth = normalize_ground_truth(&document)?;
    println!("   Loaded {} ground truth regions", ground_truth.len());
    println!(
        "   Labels: {:?}",
        ground_truth.iter().map(|b| b.label.as_str()).collect::<Vec<_>>()
    );
    println!();

    // Example 3: Classify text regions from a line detector
    println!("3. Classifying Detected Regions");
    let polygons = vec![
        vec![[42.0, 22.0], [358.0, 22.0], [358.0, 58.0], [42.0, 58.0]],
        vec![[40.0, 84.0], [362.0, 84.0], [362.0, 98.0], [40.0, 98.0]],
    ];
    for region in classify_boxes(&polygons, EvaluationOptions::default().title_min_height) {
        println!("   {:?} -> {}", region.bbox.to_array(), region.label);
    }
    println!();

    // Example 4: Greedy matching
    println!("4. Matching Predictions");
    let predictions = vec![
        LabeledBox::new(BoundingBox::new(42.0, 22.0, 358.0, 58.0), "title"),
        LabeledBox::new(BoundingBox::new(40.0, 84.0, 362.0, 196.0), "text"),
        LabeledBox::new(BoundingBox::new(40.0, 380.0, 360.0, 420.0), "text"),
    ];
    let evaluation = evaluate(&predictions, &ground_truth, 0.5);
    for outcome in &evaluation.matches.outcomes {
        println!(
            "   ├─ {} {:<6} {:?}",
            outcome.status(),
            outcome.labeled_box().label,
            outcome.bbox().to_array()
        );
    }
    println!();

    // Example 5: Metrics
    println!("5. Metrics");
    let metrics = &evaluation.metrics;
    println!("   ├─ Precision: {:.4}", metrics.precision());
    println!("   ├─ Recall: {:.4}", metrics.recall());
    println!("   ├─ F1 Score: {:.4}", metrics.f1());
    println!("   └─ Mean IoU: {:.4}", metrics.iou_mean());
    println!();
    println!("   Report: {}", serde_json::to_string(&metrics.report())?);
    println!();

    // Example 6: Full page evaluation with overlay
    println!("6. Page Evaluation With Overlay");
    let page = RgbImage::from_pixel(400, 440, Rgb([255, 255, 255]));
    let detector = PrecomputedDetector::new(predictions);
    let result = evaluate_layout(
        &encode_png(&page)?,
        ground_truth_json.as_bytes(),
        &detector,
        &EvaluationOptions::default(),
    )?;
    let uri = png_data_uri(&result.overlay)?;
    println!("   Overlay: {}x{}", result.overlay.width(), result.overlay.height());
    println!("   Data URI length: {} bytes", uri.len());
    println!();

    println!("=== Example Complete ===");

    Ok(())
}
