//! Tests for page dump loading and JSON output.

use std::io::Write;

use pagelayout::render::{pages_to_json, JsonFormat};
use pagelayout::{load_pages_file, normalize_pages, BlockContent, LayoutOptions, NormalizedPage};

const DUMP: &str = r#"[
  {
    "width": 612,
    "height": 792,
    "stream": "1 1 0 rg 100 680 24 12 re f",
    "blocks": [
      {
        "type": "text",
        "bbox": [100, 100, 140, 112],
        "lines": [
          {
            "bbox": [100, 100, 140, 112],
            "spans": [
              {
                "kind": "text",
                "bbox": [100, 100, 140, 112],
                "font": "Helvetica",
                "size": 12,
                "color": 0,
                "chars": [
                  {"bbox": [100, 100, 108, 112], "c": "a"},
                  {"bbox": [108, 100, 116, 112], "c": "b"},
                  {"bbox": [116, 100, 124, 112], "c": "c"},
                  {"bbox": [124, 100, 132, 112], "c": "d"},
                  {"bbox": [132, 100, 140, 112], "c": "e"}
                ]
              }
            ]
          }
        ]
      },
      {
        "type": "table",
        "bbox": [100, 140, 400, 300],
        "rows": [["a", "b"], ["c", "d"]]
      }
    ]
  },
  {"width": 612, "height": 792}
]"#;

fn dump_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DUMP.as_bytes()).unwrap();
    file
}

#[test]
fn test_dump_to_normalized_json() {
    let file = dump_file();
    let pages = load_pages_file(file.path()).unwrap();
    assert_eq!(pages.len(), 2);

    let normalized = normalize_pages(pages, &LayoutOptions::default()).unwrap();
    let json = pages_to_json(&normalized, JsonFormat::Compact).unwrap();

    assert!(json.contains(r#""text":"abc""#));
    assert!(json.contains(r#""type":"highlight""#));
    assert!(json.contains(r#""after_space":28.0"#));
    assert!(json.contains(r#""issue":"no_margin_candidate""#));
}

#[test]
fn test_normalized_json_reads_back() {
    let file = dump_file();
    let normalized =
        normalize_pages(load_pages_file(file.path()).unwrap(), &LayoutOptions::default()).unwrap();
    let json = pages_to_json(&normalized, JsonFormat::Pretty).unwrap();

    let back: Vec<NormalizedPage> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0].layout.blocks.len(), 2);
    assert!(matches!(
        back[0].layout.blocks[1].content,
        BlockContent::Table { .. }
    ));
    let texts: Vec<String> = back[0].layout.blocks[0].lines().unwrap()[0]
        .spans
        .iter()
        .filter_map(|s| s.as_text().map(|t| t.text.clone()))
        .collect();
    assert_eq!(texts, vec!["abc", "de"]);
    assert_eq!(back[1].issues.len(), 1);
}
