// tests/common/mod.rs
//
// Synthetic chapero board: legend line with the four doors, a matrix of
// roster cells, and round gray badges on the "no contratado" numbers.
#![allow(dead_code)]

pub const BADGE: &str = "width:22px;height:22px;border-radius:50%;background-color:#c8c8c8";

/// `flagged` are rendered as badges; everything else as plain cells.
pub fn board_html(chapas: &[u32], flagged: &[u32], doors: [u32; 4]) -> String {
    let mut rows = String::new();
    for chunk in chapas.chunks(10) {
        rows.push_str("<tr>");
        for c in chunk {
            if flagged.contains(c) {
                rows.push_str(&format!(r#"<td><span style="{BADGE}">{c}</span></td>"#));
            } else {
                rows.push_str(&format!("<td>{c}</td>"));
            }
        }
        rows.push_str("</tr>\n");
    }
    format!(
        r#"<html><head><title>Chapero por especialidades</title></head><body>
<div class="cab">LAB {} &nbsp; FES {} &nbsp; NOC {} &nbsp; NOC-FES {}</div>
<table class="censo">
{rows}</table>
</body></html>"#,
        doors[0], doors[1], doors[2], doors[3]
    )
}

/// 2001..=2040, every fifth one flagged (2005, 2010, …).
pub fn standard_board() -> String {
    let chapas: Vec<u32> = (2001..=2040).collect();
    let flagged: Vec<u32> = chapas.iter().copied().filter(|c| c % 5 == 0).collect();
    board_html(&chapas, &flagged, [2001, 2011, 2021, 2031])
}

pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let d = std::env::temp_dir().join(format!("chapero-it-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&d).unwrap();
    d
}
