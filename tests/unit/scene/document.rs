use super::*;

const FRAGMENT: &str = r##"{
  "root": {
    "id": "frag_root",
    "children": [
      {
        "type": "material",
        "id": "child",
        "ref": "frag_root",
        "fill": "#ff0000",
        "children": [{ "type": "circle", "center": { "x": 0, "y": 0 }, "radius": 5 }]
      }
    ]
  }
}"##;

#[test]
fn fragment_parses_from_str_and_reader() {
    let a = Fragment::from_json_str(FRAGMENT).unwrap();
    let b = Fragment::from_reader(FRAGMENT.as_bytes()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.root.id, "frag_root");
    assert_eq!(a.root.children.len(), 1);
}

#[test]
fn fragment_json_survives_pretty_printing() {
    let a = Fragment::from_json_str(FRAGMENT).unwrap();
    let s = a.to_json_pretty().unwrap();
    assert_eq!(Fragment::from_json_str(&s).unwrap(), a);
}

#[test]
fn parse_errors_are_serde_errors() {
    let err = Frame::from_json_str("{ \"viewport\": 3 }").unwrap_err();
    assert!(matches!(err, SceneLinkError::Serde(_)));
    assert!(err.to_string().contains("parse frame JSON"));
}

#[test]
fn missing_file_reports_path() {
    let err = Frame::from_path("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("definitely/not/here.json"));
}

fn nested_materials(levels: usize) -> String {
    let mut node = r#"{ "type": "circle", "center": { "x": 0, "y": 0 }, "radius": 1 }"#.to_owned();
    for i in (0..levels).rev() {
        let parent = if i == 0 { "root".to_owned() } else { format!("m{}", i - 1) };
        node = format!(
            r#"{{ "type": "material", "id": "m{i}", "ref": "{parent}", "children": [{node}] }}"#
        );
    }
    format!(
        r##"{{
          "viewport": {{ "halfWidth": 1, "halfHeight": 1, "scaleMode": "fit" }},
          "root": {{ "id": "root", "fill": "#000", "stroke": "#fff", "strokeWidth": 1,
            "children": [{node}] }}
        }}"##
    )
}

#[test]
fn deep_trees_parse_past_serde_json_default_limit() {
    let frame = Frame::from_json_str(&nested_materials(80)).unwrap();
    assert!(crate::schema::validate::validate_frame(&frame).is_valid());
}

#[test]
fn nesting_beyond_node_limit_is_a_depth_error() {
    let text = "[".repeat(5000);
    let err = Frame::from_json_str(&text).unwrap_err();
    assert!(matches!(
        err,
        SceneLinkError::DepthExceeded { limit: DEFAULT_MAX_DEPTH }
    ));
}

#[test]
fn brackets_inside_strings_do_not_count() {
    assert!(!nesting_exceeds(r#"{ "url": "[[[[[[\"{{{{" }"#, 1));
    assert!(nesting_exceeds("[[]]", 1));
}
