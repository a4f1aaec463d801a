// benches/extract.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chapero::{
    distance,
    document::{HtmlDocument, RenderedDocument},
    scrape,
};

/// ~1200 chapas, 30 per row, every seventh one a gray badge.
fn synthetic_board() -> String {
    let badge = "width:22px;height:22px;border-radius:50%;background-color:#c8c8c8";
    let mut rows = String::new();
    for row in 0..40u32 {
        rows.push_str("<tr>");
        for col in 0..30u32 {
            let c = 10_000 + row * 30 + col;
            if c % 7 == 0 {
                rows.push_str(&format!(r#"<td><span style="{badge}">{c}</span></td>"#));
            } else {
                rows.push_str(&format!("<td>{c}</td>"));
            }
        }
        rows.push_str("</tr>");
    }
    format!("<div>LAB 10001 FES 10300 NOC 10600 NOC-FES 10900</div><table>{rows}</table>")
}

fn bench_extract(c: &mut Criterion) {
    let html = synthetic_board();

    c.bench_function("parse_html", |b| {
        b.iter(|| {
            let doc = HtmlDocument::parse("bench", black_box(&html));
            black_box(doc.elements().len())
        })
    });

    let doc = HtmlDocument::parse("bench", &html);
    c.bench_function("extract", |b| {
        b.iter(|| {
            let snap = scrape::extract(black_box(&doc)).unwrap();
            black_box(snap.ordered().len())
        })
    });

    let snap = scrape::extract(&doc).unwrap();
    c.bench_function("compute_distances", |b| {
        b.iter(|| {
            let rep = distance::compute_distances(black_box("11150"), &snap).unwrap();
            black_box(rep.recommended.map(|r| r.distance))
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
