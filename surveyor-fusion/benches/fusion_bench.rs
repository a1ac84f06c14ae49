use criterion::{black_box, criterion_group, criterion_main, Criterion};

use surveyor_core::models::{EvidenceItem, EvidenceSource, NormalizedEvidence};
use surveyor_fusion::FusionEngine;

fn bench_fuse_three_sources(c: &mut Criterion) {
    let engine = FusionEngine::default();
    let evidence = NormalizedEvidence::from_items([
        EvidenceItem::observed(EvidenceSource::Segmentation, 0.9, 0.9),
        EvidenceItem::observed(EvidenceSource::ExternalAssessor, 0.8, 0.7),
        EvidenceItem::observed(EvidenceSource::StructuralGraph, 0.85, 0.8),
    ]);

    c.bench_function("fuse_three_sources", |b| {
        b.iter(|| engine.fuse(black_box(&evidence)));
    });
}

fn bench_normalize_json(c: &mut Criterion) {
    let engine = FusionEngine::default();
    let payload = serde_json::json!({
        "segmentation": {
            "damage_types": {
                "crack": { "confidence": 0.9, "instance_count": 3 },
                "mold": { "confidence": 0.6, "instance_count": 1 }
            },
            "overall_confidence": 0.85
        },
        "external_assessor": {
            "severity": "full",
            "confidence": 80,
            "damage_type": "crack"
        }
    });

    c.bench_function("normalize_json_then_fuse", |b| {
        b.iter(|| {
            let evidence = engine.normalizer().normalize_json(black_box(&payload));
            engine.fuse(&evidence)
        });
    });
}

criterion_group!(benches, bench_fuse_three_sources, bench_normalize_json);
criterion_main!(benches);
